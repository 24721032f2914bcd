use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use code_explainer::commands::{
    explain_command, init_config_command, list_backends_command, list_classes_command,
    ExplainArgs, ModeArg,
};
use tracing_subscriber::EnvFilter;

/// Explain decompiled Objective-C classes and procedures with a language model.
///
/// This CLI is a thin wrapper around `explainer-core` (exposed in code as
/// `explainer_core`). All substantive logic lives in the library.
#[derive(Parser, Debug)]
#[command(
    name = "code-explainer",
    version,
    about = "Explain decompiled Objective-C classes and procedures",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Explain classes or the current procedure of a host snapshot.
    ///
    /// Without `--mode` an interactive menu is shown.
    Explain {
        /// Host snapshot JSON (segments, labels, procedures, instructions).
        #[arg(long)]
        snapshot: PathBuf,

        /// Optional config JSON. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Explanation backend name (see `backends`).
        #[arg(long, default_value = "openai")]
        backend: String,

        /// Operating mode; prompts interactively when omitted.
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Class name for `--mode class`.
        #[arg(long)]
        class: Option<String>,

        /// Make the procedure covering this address current (hex `0x...` or decimal).
        #[arg(long)]
        at: Option<String>,

        /// Override the answer language from the config.
        #[arg(long)]
        language: Option<String>,

        /// Write comments produced by `--mode asm` back into the snapshot file.
        #[arg(long, default_value_t = false)]
        save_comments: bool,
    },

    /// List classes and methods that would be explained, without calling a backend.
    Classes {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Only show this class.
        #[arg(long)]
        class: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List available explanation backends.
    Backends {
        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Write a config file populated with the defaults.
    InitConfig {
        #[arg(long, default_value = "explainer.json")]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Explain {
            snapshot,
            config,
            backend,
            mode,
            class,
            at,
            language,
            save_comments,
        } => {
            let args =
                ExplainArgs { snapshot, config, backend, mode, class, at, language, save_comments };
            explain_command(&args)?
        }
        Command::Classes { snapshot, config, class, json } => {
            list_classes_command(&snapshot, config.as_deref(), class.as_deref(), json)?
        }
        Command::Backends { json } => list_backends_command(json)?,
        Command::InitConfig { path, force } => init_config_command(&path, force)?,
    }

    Ok(())
}
