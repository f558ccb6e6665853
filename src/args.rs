//! Command line arguments

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(short, long)]
    pub ui: Option<Ui>,

    /// JSON file with timing overrides.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed for the shuffle.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Milliseconds between automatic plays.
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Play the deal saved in this JSON file.
    #[arg(long)]
    pub deal: Option<PathBuf>,

    /// Save the first deal to this JSON file.
    #[arg(long)]
    pub save_deal: Option<PathBuf>,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, ValueEnum, Default)]
pub enum Ui {
    #[cfg_attr(not(feature = "tui"), default)]
    Console,
    #[cfg(feature = "tui")]
    #[default]
    Tui,
    /// Play a game without timers or claims.
    Simulate,
}
