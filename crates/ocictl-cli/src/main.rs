//! Command-line interface for `ocictl`.
//!
//! Extensions discovered under the per-user data directory are registered
//! as top-level subcommands before argument parsing, so they show up in
//! help output and dispatch like built-in commands.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum};
use ocictl_core::config::Config;
use ocictl_core::extension::{ExtensionManager, RunContext};
use ocictl_core::spec::Spec;

/// ocictl - Open Cloud Initiative command line tool.
#[derive(Parser, Debug)]
#[command(name = "ocictl", version, about = "Open Cloud Initiative command line tool")]
#[command(arg_required_else_help = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Dry run.
    #[arg(short, long, global = true)]
    dry: bool,

    /// Run as root.
    #[arg(short, long, global = true)]
    root: bool,

    /// Force overwriting existing files.
    #[arg(short, long, global = true)]
    force: bool,
}

/// Built-in commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default configuration file.
    Init,
    /// Manage extensions.
    Extension {
        #[command(subcommand)]
        command: ExtensionCommand,
    },
}

/// Extension management subcommands.
#[derive(Subcommand, Debug)]
enum ExtensionCommand {
    /// List all extensions.
    List {
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    // The verbose flag is needed before clap runs: extension registration
    // (and its logging) happens ahead of argument parsing.
    let verbose = std::env::args().any(|arg| arg == "-v" || arg == "--verbose");
    init_tracing(verbose);

    let mut manager = ExtensionManager::new();
    let extensions_dir = Config::extensions_dir()?;
    if extensions_dir.is_dir() {
        manager
            .scan(&extensions_dir)
            .with_context(|| format!("scanning {}", extensions_dir.display()))?;
    } else {
        tracing::debug!(dir = %extensions_dir.display(), "no extension directory, skipping scan");
    }

    let mut command = Args::command();
    let mut registered: Vec<String> = Vec::new();
    for extension in manager.list_extensions() {
        if command.find_subcommand(extension.name()).is_some() {
            tracing::warn!(
                name = extension.name(),
                "extension name collides with a builtin command, skipping"
            );
            continue;
        }
        registered.push(extension.name().to_string());
        command = command.subcommand(extension.command());
    }
    let matches = command.get_matches();

    run(&matches, manager, &registered)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(matches: &ArgMatches, mut manager: ExtensionManager, registered: &[String]) -> Result<()> {
    match matches.subcommand() {
        // Extension subcommands exist only in the dynamic command tree, so
        // their flags are read from the raw matches.
        Some((name, sub_matches)) if registered.iter().any(|r| r == name) => {
            let config = config_from_matches(matches)?;
            if config.flags.dry {
                manager.enable_dry_run_mode();
            }
            run_extension(&config, &manager, name, sub_matches)
        }
        _ => {
            let args = Args::from_arg_matches(matches)?;
            let config = config_from_args(&args)?;
            if config.flags.dry {
                manager.enable_dry_run_mode();
            }
            match args.command {
                Some(Command::Init) => run_init(&config),
                Some(Command::Extension {
                    command: ExtensionCommand::List { output },
                }) => run_extension_list(&manager, output),
                None => {
                    Args::command().print_help()?;
                    Ok(())
                }
            }
        }
    }
}

fn config_from_args(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(file) => Config::with_file(file.clone()),
        None => Config::new(),
    };
    config.flags.verbose = args.verbose;
    config.flags.dry = args.dry;
    config.flags.root = args.root;
    config.flags.force = args.force;
    config.init()?;
    Ok(config)
}

fn config_from_matches(matches: &ArgMatches) -> Result<Config> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(file) => Config::with_file(file.clone()),
        None => Config::new(),
    };
    config.flags.verbose = matches.get_flag("verbose");
    config.flags.dry = matches.get_flag("dry");
    config.flags.root = matches.get_flag("root");
    config.flags.force = matches.get_flag("force");
    config.init()?;
    Ok(config)
}

/// Execute a discovered extension's command.
///
/// The configuration is loaded and validated first; a spec that fails
/// validation stops the extension from running at all.
fn run_extension(
    config: &Config,
    manager: &ExtensionManager,
    name: &str,
    matches: &ArgMatches,
) -> Result<()> {
    config.load_spec()?;
    tracing::debug!(folder = %config.spec().folder, "configuration validated");

    let extension = manager
        .get(name)
        .ok_or_else(|| anyhow!("extension not found: {name}"))?;

    let args: Vec<String> = matches
        .get_many::<String>("args")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let ctx = RunContext {
        dry_run: manager.dry_run(),
    };
    extension.run(&ctx, &args)?;
    Ok(())
}

/// Write a default spec document and set up the working folders.
fn run_init(config: &Config) -> Result<()> {
    let spec = Spec::default();
    spec.write(&config.file, config.flags.force)?;

    let extensions_dir = Config::extensions_dir()?;
    fs::create_dir_all(&extensions_dir)
        .with_context(|| format!("creating {}", extensions_dir.display()))?;

    println!("Wrote {}", config.file.display());
    Ok(())
}

/// Print the registry in discovery order.
fn run_extension_list(manager: &ExtensionManager, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            let listing: Vec<serde_json::Value> = manager
                .list_extensions()
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "name": e.name(),
                        "version": e.version(),
                        "owner": e.owner(),
                        "path": e.path(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        OutputFormat::Text => {
            if manager.is_empty() {
                println!("No extensions installed.");
                return Ok(());
            }
            for extension in manager.list_extensions() {
                println!(
                    "{}\t{}\t{}\t{}",
                    extension.name(),
                    extension.version(),
                    extension.owner(),
                    extension.path()
                );
            }
        }
    }
    Ok(())
}
