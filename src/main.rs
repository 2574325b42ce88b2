use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use versioned_states::StateStore;
use versioned_states::logging::{LogConfig, LogFormat, init_logging};
use versioned_states::session::{self, DEFAULT_SESSION_FILE};
use versioned_states::summary::{Summary, render_input};

#[derive(Parser)]
#[command(name = "vs", about = "Track a state per item for each version")]
struct Cli {
    /// Session file holding the working store between commands
    #[arg(long, global = true, env = "VS_SESSION", default_value = DEFAULT_SESSION_FILE)]
    session: PathBuf,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Set the pending items (comma- or newline-separated; stdin when omitted)
    Input { text: Option<String> },
    /// Show the pending items
    Show,
    /// Record a state for every pending item under a version
    Add {
        #[arg(long, default_value = "")]
        version: String,
        #[arg(short, long, default_value = "")]
        state: String,
    },
    /// Undo the last add
    Back,
    /// Replace the states with a JSON states file
    Load { path: PathBuf },
    /// Write the states to a JSON file
    Save { path: PathBuf },
    /// Write the item × version matrix to a CSV file
    Export { path: PathBuf },
    /// Load item descriptions from a CSV file with item and description columns
    #[command(name = "load-desc")]
    LoadDesc { path: PathBuf },
    /// Show per-version state counts
    Summary,
    /// Show where the session lives and when it last changed
    Status,
    /// Discard the session
    Reset,
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(
        &LogConfig::from_verbosity(cli.verbose)
            .with_format(cli.log_format)
            .with_ansi(std::io::stderr().is_terminal()),
    );
    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let session_path = cli.session.as_path();
    match cli.command {
        Cmd::Input { text } => {
            let text = match text.as_deref() {
                Some("-") | None => read_stdin(std::io::stdin().is_terminal())?,
                Some(text) => text.to_string(),
            };
            let mut s = load(session_path)?;
            s.set_input(&text);
            save(session_path, &s)?;
            print_input(&s);
            Ok(())
        }
        Cmd::Show => {
            let s = load(session_path)?;
            print_input(&s);
            Ok(())
        }
        Cmd::Add { version, state } => {
            let mut s = load(session_path)?;
            s.add(&version, &state)?;
            save(session_path, &s)?;
            print!("{}", Summary::of(&s));
            Ok(())
        }
        Cmd::Back => {
            let mut s = load(session_path)?;
            s.back();
            save(session_path, &s)?;
            print!("{}", Summary::of(&s));
            Ok(())
        }
        Cmd::Load { path } => {
            let mut s = load(session_path)?;
            s.load(&path)?;
            save(session_path, &s)?;
            print!("{}", Summary::of(&s));
            Ok(())
        }
        Cmd::Save { path } => {
            let s = load(session_path)?;
            if s.states().is_none() {
                println!("nothing to save");
                return Ok(());
            }
            let path = with_extension(path, "json");
            s.save(&path)?;
            println!("saved {}", path.display());
            Ok(())
        }
        Cmd::Export { path } => {
            let s = load(session_path)?;
            if s.states().is_none() {
                println!("nothing to export");
                return Ok(());
            }
            let path = with_extension(path, "csv");
            s.export(&path)?;
            println!("exported {}", path.display());
            Ok(())
        }
        Cmd::LoadDesc { path } => {
            let mut s = load(session_path)?;
            s.load_descriptions(&path)?;
            save(session_path, &s)?;
            print!("{}", Summary::of(&s));
            Ok(())
        }
        Cmd::Summary => {
            let s = load(session_path)?;
            print!("{}", Summary::of(&s));
            Ok(())
        }
        Cmd::Status => {
            println!("  Session: {}", session_path.display());
            match session::read(session_path)? {
                Some(found) => {
                    println!("  Updated: {}", found.updated_at.format("%Y-%m-%d %H:%M"));
                    let versions = found.store.states().map_or(0, |m| m.len());
                    println!("  Versions: {versions}");
                }
                None => println!("  (no session yet)"),
            }
            Ok(())
        }
        Cmd::Reset => {
            if session::remove(session_path)? {
                println!("session cleared");
            } else {
                println!("no session to clear");
            }
            Ok(())
        }
        Cmd::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "vs", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn load(path: &Path) -> Result<StateStore> {
    session::load(path).with_context(|| format!("failed to open session {}", path.display()))
}

fn save(path: &Path, s: &StateStore) -> Result<()> {
    session::save(path, s).with_context(|| format!("failed to write session {}", path.display()))
}

/// Read the whole of stdin. Fails on a terminal instead of blocking for EOF.
fn read_stdin(is_terminal: bool) -> Result<String> {
    if is_terminal {
        bail!("no input text given; pass it as an argument or pipe it on stdin");
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("failed to read input from stdin")?;
    Ok(text)
}

fn print_input(s: &StateStore) {
    match s.input() {
        Some(items) => println!("{}", render_input(items)),
        None => println!("no input"),
    }
}

/// Append `.ext` unless the path already ends with it.
fn with_extension(path: PathBuf, ext: &str) -> PathBuf {
    if path.extension().is_some_and(|e| e == ext) {
        return path;
    }
    let mut name = path.into_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
