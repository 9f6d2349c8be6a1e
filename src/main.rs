//! padmap - bind keyboard keys to the buttons of a Pico macropad.
//!
//! Non-interactive commands edit the binding file directly; `-i` opens the
//! interactive session with the navigable binding list.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use padmap::board;
use padmap::cli::{BindArgs, ClearArgs, CliContext, KeysArgs, ListArgs, RemoveArgs};
use padmap::config::Config;
use padmap::device::{self, DeviceChannel};
use padmap::session::{self, SessionOptions};

/// Bind keyboard keys to the buttons of a Raspberry Pi Pico macropad
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Start the interactive rebinding session
    #[arg(short, long)]
    interactive: bool,

    /// Board directory (skips auto-detection)
    #[arg(long, value_name = "PATH")]
    path: Option<PathBuf>,

    /// Serial port of the board (skips auto-detection)
    #[arg(long, value_name = "PORT")]
    port: Option<String>,

    /// Preview changes without writing or reloading
    #[arg(long)]
    dry_run: bool,

    /// In the interactive session, write once on exit instead of per change
    #[arg(long)]
    defer_write: bool,

    /// Do not notify the board after writing
    #[arg(long)]
    no_reload: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every button with its bound key
    List(ListArgs),
    /// Bind a pad button to a keyboard key
    Bind(BindArgs),
    /// Remove the binding of a pad button
    Remove(RemoveArgs),
    /// Remove all bindings
    Clear(ClearArgs),
    /// List the key names accepted by bind
    Keys(KeysArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();

    // Commands that never touch the board.
    if let Some(Command::Keys(args)) = &cli.command {
        return args.execute();
    }

    let reload = !cli.no_reload && config.reload;
    let path = cli.path.or(config.board_path);
    let port = cli.port.or(config.port);

    let board_dir = board::locate(path.as_deref())?;

    if cli.interactive {
        let options = SessionOptions {
            dry_run: cli.dry_run,
            defer_write: cli.defer_write,
            reload,
        };
        // Resolve the port before the session starts; the channel itself
        // opens lazily on the first reload notification.
        let channel = if reload && !cli.dry_run {
            Some(DeviceChannel::new(device::locate_port(port.as_deref())?))
        } else {
            None
        };
        return session::run_interactive(&board_dir, options, channel);
    }

    let ctx = CliContext {
        board_dir,
        dry_run: cli.dry_run,
        reload,
        port,
    };

    match cli.command {
        Some(Command::List(args)) => args.execute(&ctx),
        Some(Command::Bind(args)) => args.execute(&ctx),
        Some(Command::Remove(args)) => args.execute(&ctx),
        Some(Command::Clear(args)) => args.execute(&ctx),
        Some(Command::Keys(_)) | None => ListArgs::default().execute(&ctx),
    }
}
