use crate::commands::load_state;
use crate::config::Config;
use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use mailcraft_common::RealFileSystem;
use mailcraft_render::RenderClient;
use mailcraft_state::{generate_filename, EditorState, ExportImportService, DEFAULT_FILENAME};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Html,
    EmailTemplate,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Document file (.json) or state token
    pub input: String,

    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ExportFormat,

    /// File name without extension (defaults to a timestamped name)
    #[arg(long)]
    pub filename: Option<String>,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Use this already rendered HTML file instead of the render service
    #[arg(long)]
    pub html: Option<String>,
}

pub async fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let state = load_state(&args.input, &config, cwd)?;

    let out_dir = match &args.out_dir {
        Some(dir) => PathBuf::from(cwd).join(dir),
        None => config.get_out_dir(cwd),
    };
    let service = ExportImportService::new(RealFileSystem, out_dir);
    let filename = args
        .filename
        .clone()
        .unwrap_or_else(|| generate_filename(DEFAULT_FILENAME));

    let path = match args.format {
        ExportFormat::Json => service.export_as_json(Some(&state), &filename)?,
        ExportFormat::Html => {
            let html = rendered_html(&args, &state, &config, cwd).await?;
            service.export_as_html(&html, &filename)?
        }
        ExportFormat::EmailTemplate => {
            let html = rendered_html(&args, &state, &config, cwd).await?;
            service.export_as_email_template(&html, &filename)?
        }
    };

    println!("  {} {}", "✓".green(), path.display());
    Ok(())
}

async fn rendered_html(
    args: &ExportArgs,
    state: &EditorState,
    config: &Config,
    cwd: &str,
) -> Result<String> {
    if let Some(html) = &args.html {
        return Ok(std::fs::read_to_string(PathBuf::from(cwd).join(html))?);
    }
    let client = RenderClient::new(config.render_config());
    Ok(client.render_html(&state.tree()?).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcraft_document::NodeTree;
    use mailcraft_state::encode_state;
    use std::fs;

    fn token() -> String {
        let state = EditorState::from_tree(&NodeTree::empty_document(), "1.0.0").unwrap();
        encode_state(&state).unwrap()
    }

    #[tokio::test]
    async fn test_export_json_from_token() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        let args = ExportArgs {
            input: token(),
            format: ExportFormat::Json,
            filename: Some("welcome".to_string()),
            out_dir: None,
            html: None,
        };
        export(args, &cwd).await.unwrap();

        let written = fs::read_to_string(dir.path().join("exports/welcome.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["version"], "1.0.0");
    }

    #[tokio::test]
    async fn test_email_template_from_html_file() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        fs::write(dir.path().join("body.html"), "<table></table>").unwrap();

        let args = ExportArgs {
            input: token(),
            format: ExportFormat::EmailTemplate,
            filename: Some("welcome".to_string()),
            out_dir: Some("out".to_string()),
            html: Some("body.html".to_string()),
        };
        export(args, &cwd).await.unwrap();

        let written =
            fs::read_to_string(dir.path().join("out/welcome-email-template.html")).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(written.contains("<table></table>"));
    }

    #[tokio::test]
    async fn test_empty_html_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        fs::write(dir.path().join("empty.html"), "").unwrap();

        let args = ExportArgs {
            input: token(),
            format: ExportFormat::Html,
            filename: Some("welcome".to_string()),
            out_dir: None,
            html: Some("empty.html".to_string()),
        };
        let err = export(args, &cwd).await.unwrap_err();
        assert_eq!(err.to_string(), "No HTML content provided");
        assert!(!dir.path().join("exports").exists());
    }
}
