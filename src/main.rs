use std::fs::File;
use std::path::Path;

use anyhow::Context;
use clap::Parser;

mod args;
mod deck;
mod pileup;
use self::args::{Args, Ui};
use self::pileup::{cli_main, simulate_main, Config, Options};
#[cfg(feature = "tui")]
use self::pileup::tui_main;

/// Logs go to stderr, filtered by `RUST_LOG`, unless a log file is given.
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// Builds the game configuration from the config file, then the flags.
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(interval_ms) = args.interval_ms {
        config.autoplay_interval_ms = interval_ms;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;
    let options = Options {
        config: load_config(&args)?,
        deal_path: args.deal.clone(),
        save_deal_path: args.save_deal.clone(),
    };
    log::debug!("{options:?}");
    match args.ui.unwrap_or_default() {
        Ui::Console => cli_main(&options),
        #[cfg(feature = "tui")]
        Ui::Tui => tui_main(&options),
        Ui::Simulate => simulate_main(&options),
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("pileup").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_file() {
        let path = std::env::temp_dir().join(format!("pileup-config-{}.json", std::process::id()));
        let mut file = File::create(&path).unwrap();
        write!(file, r#"{{"seed": 1, "autoplay_interval_ms": 500, "message_ms": 9}}"#).unwrap();
        drop(file);
        let path_arg = path.to_str().unwrap();

        let config = load_config(&parse(&["--config", path_arg])).unwrap();
        assert_eq!(config.seed, Some(1));
        assert_eq!(config.autoplay_interval_ms, 500);

        let args = parse(&["--config", path_arg, "--seed", "7", "--interval-ms", "250"]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.autoplay_interval_ms, 250);
        assert_eq!(config.message_ms, 9);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_zero_interval_flag() {
        assert!(load_config(&parse(&["--interval-ms", "0"])).is_err());
        let config = load_config(&parse(&[])).unwrap();
        assert_eq!(config, Config::default());
    }
}
