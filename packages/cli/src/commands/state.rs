use crate::commands::load_state;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use mailcraft_common::{Outline, RealFileSystem};
use mailcraft_state::{
    decode_state, encode_state, validate_editor_state, ExportImportService, StateFormat,
};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Document file (.json) to encode
    pub input: String,
}

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// State token to decode
    pub token: String,

    /// Print the node outline instead of the JSON
    #[arg(long)]
    pub outline: bool,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// File to check (.json)
    pub input: String,
}

/// Print the state token for a document
pub fn encode(args: EncodeArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let state = load_state(&args.input, &config, cwd)?;
    println!("{}", encode_state(&state)?);
    Ok(())
}

pub fn decode(args: DecodeArgs, _cwd: &str) -> Result<()> {
    let state = decode_state(&args.token).ok_or_else(|| anyhow!("Invalid state token"))?;
    let tree = state.tree()?;

    if args.outline {
        println!("{} {}", "version".bright_white(), state.version);
        println!("{}", Outline::of(&tree));
    } else {
        let export = serde_json::json!({ "json": tree.to_value()?, "version": state.version });
        println!("{}", serde_json::to_string_pretty(&export)?);
    }
    Ok(())
}

/// Report which importable shape a file has
pub fn import(args: ImportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let service = ExportImportService::new(RealFileSystem, config.get_out_dir(cwd));
    let path = PathBuf::from(cwd).join(&args.input);
    let imported = service.import_from_json(Some(&path))?;

    let validation = validate_editor_state(&imported.data);
    if !validation.valid {
        let message = validation.message.unwrap_or_default();
        return Err(anyhow!("{}: {}", imported.filename, message));
    }

    println!(
        "{} {} ({})",
        "✓".green(),
        imported.filename,
        describe(&imported.data, validation.is_encoded, validation.format)
    );
    Ok(())
}

fn describe(data: &Value, is_encoded: bool, format: Option<StateFormat>) -> String {
    if is_encoded {
        return "encoded state".to_string();
    }
    match format {
        Some(StateFormat::Export) => format!(
            "export, version {}",
            data.get("version").and_then(Value::as_str).unwrap_or("?")
        ),
        Some(StateFormat::Framework) => "craftjs state".to_string(),
        Some(StateFormat::Raw) => "raw node map".to_string(),
        None => "unknown".to_string(),
    }
}
