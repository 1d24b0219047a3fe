//! Element alchemy, played from the terminal.
//!
//! ```bash
//! cargo run -p alchemy -- --save saves/inventory.json --language Turkish
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).

mod headless;

use alchemy_core::{SessionConfig, SessionError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let config = parse_config_from_args(SessionConfig::from_env()?, &args);
    match headless::run_headless(config).await {
        Err(e) => match startup_hint(&e) {
            Some(hint) => {
                eprintln!("Error: {e}");
                eprintln!("{hint}");
                std::process::exit(1);
            }
            None => Err(e.into()),
        },
        Ok(()) => Ok(()),
    }
}

/// Extra guidance for errors the user can fix before starting again.
fn startup_hint(error: &SessionError) -> Option<&'static str> {
    match error {
        SessionError::NoApiKey => {
            Some("Please set it in .env file or with: export GEMINI_API_KEY=your_key_here")
        }
        _ => None,
    }
}

/// Apply command line overrides on top of the environment config.
fn parse_config_from_args(mut config: SessionConfig, args: &[String]) -> SessionConfig {
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--save" => {
                if let Some(path) = args.get(i + 1) {
                    config = config.with_save_path(path);
                    i += 1;
                }
            }
            "--language" => {
                if let Some(language) = args.get(i + 1) {
                    config = config.with_language(language.clone());
                    i += 1;
                }
            }
            "--model" => {
                if let Some(model) = args.get(i + 1) {
                    config = config.with_model(model.clone());
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    config
}

fn print_help() {
    println!("Element alchemy - combine elements to discover new ones");
    println!();
    println!("Usage: alchemy [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --save <path>      Load the inventory from and autosave it to <path>");
    println!("  --language <lang>  Language new elements are named in (default: Turkish)");
    println!("  --model <model>    Gemini model to use");
    println!("  -h, --help         Show this help");
    println!();
    println!("Environment:");
    println!("  GEMINI_API_KEY        Gemini API key (API_KEY is also accepted)");
    println!("  ALCHEMY_MODEL         Same as --model");
    println!("  ALCHEMY_LANGUAGE      Same as --language");
    println!("  ALCHEMY_SAVE_PATH     Same as --save");
    println!("  ALCHEMY_TIMEOUT_SECS  Generation timeout in seconds (default: 30)");
    println!("  RUST_LOG              Log filter (default: warn)");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_config_from_args() {
        let config = parse_config_from_args(
            SessionConfig::default(),
            &args(&["alchemy", "--save", "inv.json", "--language", "English"]),
        );
        assert_eq!(config.save_path.as_deref(), Some(Path::new("inv.json")));
        assert_eq!(config.language, "English");
        assert!(config.model.is_none());
    }

    #[test]
    fn test_startup_hint_only_for_missing_key() {
        assert!(startup_hint(&SessionError::NoApiKey).is_some());
        assert!(startup_hint(&SessionError::UnknownElement("Lava".into())).is_none());
    }

    #[test]
    fn test_missing_flag_value_is_ignored() {
        let config = parse_config_from_args(SessionConfig::default(), &args(&["alchemy", "--model"]));
        assert!(config.model.is_none());
    }
}
