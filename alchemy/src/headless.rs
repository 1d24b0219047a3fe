//! Headless mode for the alchemy game.
//!
//! A line-oriented stand-in for the workbench:
//! - `A + B` combines two owned elements
//! - Lines starting with `#` are commands (list, save, load, help, quit)

use alchemy_core::{CombineOutcome, GameSession, SessionConfig, SessionError};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// A parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Combine(&'a str, &'a str),
    List,
    Save(Option<&'a str>),
    Load(Option<&'a str>),
    Help,
    Quit,
    Unknown,
}

fn parse_line(line: &str) -> Command<'_> {
    if let Some(command) = line.strip_prefix('#') {
        let mut parts = command.split_whitespace();
        return match parts.next() {
            Some("quit") | Some("exit") => Command::Quit,
            Some("list") => Command::List,
            Some("save") => Command::Save(parts.next()),
            Some("load") => Command::Load(parts.next()),
            Some("help") => Command::Help,
            _ => Command::Unknown,
        };
    }

    // A spaced ` + ` wins so that names containing `+` can still be combined.
    let split = line.split_once(" + ").or_else(|| line.split_once('+'));
    match split {
        Some((first, second)) if !first.trim().is_empty() && !second.trim().is_empty() => {
            Command::Combine(first.trim(), second.trim())
        }
        _ => Command::Unknown,
    }
}

/// Run the game in headless mode.
pub async fn run_headless(config: SessionConfig) -> Result<(), SessionError> {
    let mut session = GameSession::new(config).await?;

    println!("=== Element Alchemy ===");
    print_inventory(&session);
    println!();
    print_help();
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Command::Quit => {
                println!("Goodbye!");
                break;
            }
            Command::List => print_inventory(&session),
            Command::Help => print_help(),
            Command::Save(path) => {
                let path = path
                    .map(PathBuf::from)
                    .or_else(|| session.save_path().map(PathBuf::from));
                let Some(path) = path else {
                    println!("[ERROR] Usage: #save <path>");
                    continue;
                };
                match session.save(&path).await {
                    Ok(()) => println!("[SAVED] Inventory saved to {}", path.display()),
                    Err(e) => println!("[ERROR] Save failed: {e}"),
                }
            }
            Command::Load(Some(path)) => match session.load_inventory(path).await {
                Ok(()) => {
                    println!("[LOADED] Inventory loaded from {path}");
                    print_inventory(&session);
                }
                Err(e) => println!("[ERROR] Load failed: {e}"),
            },
            Command::Load(None) => println!("[ERROR] Usage: #load <path>"),
            Command::Combine(first, second) => {
                let status = format!("[MIXING] {first} + {second}...");
                print!("{status}");
                stdout.flush().ok();

                let outcome = session.combine_names(first, second).await;
                print!("\r{}\r", " ".repeat(status.chars().count()));
                stdout.flush().ok();

                match outcome {
                    Ok(CombineOutcome::Discovered(e)) => println!("[NEW] Yeni Keşif: {e}!"),
                    Ok(CombineOutcome::Known(e)) => println!("[KNOWN] {e}"),
                    Ok(CombineOutcome::Nothing) => {
                        println!("[NOTHING] Bu kombinasyon bir şey oluşturmadı.")
                    }
                    Err(e) => println!("[ERROR] {e}"),
                }
            }
            Command::Unknown => {
                println!("[ERROR] Unknown input. Type #help for help.");
            }
        }
        stdout.flush().ok();
    }

    Ok(())
}

fn print_inventory(session: &GameSession) {
    println!("[INVENTORY] {} elements", session.inventory().len());
    for element in session.inventory() {
        let marker = if element.is_new { " *" } else { "" };
        println!("  {element}{marker}");
    }
}

fn print_help() {
    println!("Commands:");
    println!("  A + B        - Combine two elements you own");
    println!("                 (use spaces around + if a name contains +)");
    println!("  #list        - Show your inventory");
    println!("  #save [path] - Save the inventory");
    println!("  #load <path> - Load a saved inventory");
    println!("  #help        - Show this help");
    println!("  #quit        - Exit the game");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_combine() {
        assert_eq!(parse_line("Ateş + Su"), Command::Combine("Ateş", "Su"));
        assert_eq!(parse_line("Toprak+Toprak"), Command::Combine("Toprak", "Toprak"));
        assert_eq!(parse_line("Ateş +"), Command::Unknown);
    }

    #[test]
    fn test_parse_combine_name_with_plus() {
        assert_eq!(parse_line("Su+Ateş + Hava"), Command::Combine("Su+Ateş", "Hava"));
        assert_eq!(parse_line("Hava + C++"), Command::Combine("Hava", "C++"));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("#quit"), Command::Quit);
        assert_eq!(parse_line("#list"), Command::List);
        assert_eq!(parse_line("#save inv.json"), Command::Save(Some("inv.json")));
        assert_eq!(parse_line("#save"), Command::Save(None));
        assert_eq!(parse_line("#load"), Command::Load(None));
        assert_eq!(parse_line("#dance"), Command::Unknown);
    }
}
