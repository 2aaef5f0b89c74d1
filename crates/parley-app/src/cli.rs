use std::path::PathBuf;

use clap::Parser;

/// parley: chat with an OpenRouter-hosted model from the terminal.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Model identifier override, e.g. `openai/gpt-4o-mini`.
    #[arg(short = 'm', long)]
    pub model: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = Args::parse_from([
            "parley",
            "--config",
            "/tmp/parley.toml",
            "--log-level",
            "debug",
            "-m",
            "openai/gpt-4o-mini",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/parley.toml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.model.as_deref(), Some("openai/gpt-4o-mini"));
    }

    #[test]
    fn no_arguments_is_valid() {
        let args = Args::parse_from(["parley"]);
        assert!(args.config.is_none());
        assert!(args.model.is_none());
    }
}
