use crate::commands::load_state;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mailcraft_render::{Preview, RenderClient, DATA_APPLIED};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Document file (.json) or state token
    pub input: String,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Rendered HTML file with placeholders
    pub html: String,

    /// JSON data file; without it the placeholder skeleton is printed
    #[arg(short, long)]
    pub data: Option<String>,
}

/// Render a document through the HTML service and print it
pub async fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let state = load_state(&args.input, &config, cwd)?;

    let client = RenderClient::new(config.render_config());
    let html = client.render_html(&state.tree()?).await?;
    println!("{}", html);
    Ok(())
}

pub fn preview(args: PreviewArgs, cwd: &str) -> Result<()> {
    let template = std::fs::read_to_string(PathBuf::from(cwd).join(&args.html))?;
    let mut preview = Preview::new(template);

    let Some(data) = args.data else {
        println!("{}", preview.data);
        return Ok(());
    };

    preview.set_data(std::fs::read_to_string(PathBuf::from(cwd).join(data))?);
    let document = preview.apply()?.to_string();
    eprintln!("{} {}", "✓".green(), DATA_APPLIED);
    println!("{}", document);
    Ok(())
}
