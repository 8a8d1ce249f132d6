mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    decode, encode, export, import, init, preview, render, settings, DecodeArgs, EncodeArgs,
    ExportArgs, ImportArgs, InitArgs, PreviewArgs, RenderArgs, SettingsArgs,
};
use tracing_subscriber::EnvFilter;

/// Mailcraft CLI - email template documents from the command line
#[derive(Parser, Debug)]
#[command(name = "mailcraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Mailcraft project
    Init(InitArgs),

    /// Encode a document file as a state token
    Encode(EncodeArgs),

    /// Decode a state token
    Decode(DecodeArgs),

    /// Check that a file can be imported
    Import(ImportArgs),

    /// Export a document as JSON, HTML or an email template
    Export(ExportArgs),

    /// Render a document to HTML
    Render(RenderArgs),

    /// Fill rendered HTML placeholders with data
    Preview(PreviewArgs),

    /// Show or change editor settings
    Settings(SettingsArgs),
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?.display().to_string();

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Encode(args) => encode(args, &cwd),
        Command::Decode(args) => decode(args, &cwd),
        Command::Import(args) => import(args, &cwd),
        Command::Export(args) => export(args, &cwd).await,
        Command::Render(args) => render(args, &cwd).await,
        Command::Preview(args) => preview(args, &cwd),
        Command::Settings(args) => settings(args, &cwd),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
