use crate::config::Config;
use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use mailcraft_common::RealFileSystem;
use mailcraft_state::{Direction, FileStore, SettingsStore, SettingsUpdate, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    Ltr,
    Rtl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    OneDark,
    Unicorn,
}

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[arg(long, value_enum)]
    pub direction: Option<DirectionArg>,

    #[arg(long)]
    pub responsive_font_sizes: Option<bool>,

    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,
}

impl SettingsArgs {
    fn update(&self) -> SettingsUpdate {
        SettingsUpdate {
            direction: self.direction.map(|d| match d {
                DirectionArg::Ltr => Direction::Ltr,
                DirectionArg::Rtl => Direction::Rtl,
            }),
            responsive_font_sizes: self.responsive_font_sizes,
            theme: self.theme.map(|t| match t {
                ThemeArg::Light => Theme::Light,
                ThemeArg::OneDark => Theme::OneDark,
                ThemeArg::Unicorn => Theme::Unicorn,
            }),
        }
    }
}

/// Show the stored settings, merging in any given flags first
pub fn settings(args: SettingsArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = FileStore::new(RealFileSystem, config.get_settings_path(cwd));
    let mut settings = SettingsStore::open(store);

    let update = args.update();
    if update != SettingsUpdate::default() {
        settings.save(&update)?;
        println!("  {} Saved {}", "✓".green(), config.settings_path);
    }

    println!("{}", serde_json::to_string_pretty(settings.settings())?);
    Ok(())
}
