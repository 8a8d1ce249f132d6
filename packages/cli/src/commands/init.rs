use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mailcraft_common::RealFileSystem;
use mailcraft_document::NodeTree;
use mailcraft_state::{EditorState, ExportImportService, DEFAULT_FILENAME};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory exports are written to
    #[arg(short, long, default_value = "exports")]
    pub out_dir: String,

    /// HTML render service URL
    #[arg(short, long)]
    pub render_url: Option<String>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Mailcraft project...".bright_blue().bold());

    let config = Config {
        out_dir: args.out_dir,
        render_url: args.render_url,
        ..Config::default()
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    // Starter document: the empty frame in export format
    let starter = PathBuf::from(cwd).join(format!("{}.json", DEFAULT_FILENAME));
    if !starter.exists() {
        let state = EditorState::from_tree(&NodeTree::empty_document(), &config.state_version)?;
        ExportImportService::new(RealFileSystem, cwd).export_as_json(Some(&state), DEFAULT_FILENAME)?;
        println!("  {} Created {}.json", "✓".green(), DEFAULT_FILENAME);
    }

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    if config.render_url.is_none() {
        println!("  1. Set renderUrl in {} or SSR_EXPORT_HTML_URL", DEFAULT_CONFIG_NAME);
    } else {
        println!("  1. Check renderUrl in {}", DEFAULT_CONFIG_NAME);
    }
    println!("  2. Run: mailcraft export {}.json --format email-template", DEFAULT_FILENAME);
    println!("  3. Check output in {}/", config.out_dir);

    Ok(())
}
