use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use explainer_core::host::{SnapshotDocument, TerminalPrompter};
use explainer_core::services::explainer::select_mode;
use explainer_core::services::explanation::default_backend_registry;
use explainer_core::{Explainer, Mode, RunSummary};
use tracing::info;

use crate::{load_config, parse_address};

/// Operating mode as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Every class in the code segment.
    AllClasses,
    /// One class, named with `--class`.
    Class,
    /// The current procedure's pseudo-code.
    Pseudo,
    /// The current procedure's basic blocks, commented per block.
    Asm,
}

#[derive(Debug, Clone)]
pub struct ExplainArgs {
    pub snapshot: PathBuf,
    pub config: Option<PathBuf>,
    pub backend: String,
    pub mode: Option<ModeArg>,
    pub class: Option<String>,
    pub at: Option<String>,
    pub language: Option<String>,
    pub save_comments: bool,
}

impl ExplainArgs {
    pub fn new(snapshot: impl Into<PathBuf>) -> Self {
        Self {
            snapshot: snapshot.into(),
            config: None,
            backend: "openai".to_string(),
            mode: None,
            class: None,
            at: None,
            language: None,
            save_comments: false,
        }
    }
}

fn resolve_mode(mode: ModeArg, class: Option<&str>) -> Mode {
    match mode {
        ModeArg::AllClasses => Mode::AllClasses,
        ModeArg::Class => Mode::NamedClass(class.unwrap_or_default().to_string()),
        ModeArg::Pseudo => Mode::PseudoProcedure,
        ModeArg::Asm => Mode::AsmProcedure,
    }
}

/// Run one explanation pass against a host snapshot, printing the report to `out`.
///
/// Without `--mode` the interactive menu is read from stdin.
pub fn explain_command_to(args: &ExplainArgs, out: &mut dyn Write) -> Result<Option<RunSummary>> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(language) = &args.language {
        config = config.with_language(language.clone());
    }

    let registry = default_backend_registry(&config);
    let backend = registry.get(&args.backend).ok_or_else(|| {
        anyhow!("Unknown backend '{}'. Available: {}", args.backend, registry.names().join(", "))
    })?;

    let mut doc = SnapshotDocument::load(&args.snapshot).with_context(|| {
        format!("Failed to load host snapshot at {}", args.snapshot.display())
    })?;
    if let Some(at) = &args.at {
        let address = parse_address(at)?;
        doc.select_procedure(address)
            .with_context(|| format!("Failed to select procedure at {}", at))?;
    }

    let mode = match args.mode {
        Some(mode) => resolve_mode(mode, args.class.as_deref()),
        None => {
            let stdin = io::stdin();
            let mut prompter = TerminalPrompter::new(stdin.lock(), io::stdout());
            match select_mode(&mut prompter, out)? {
                Some(mode) => mode,
                None => return Ok(None),
            }
        }
    };

    let explainer = Explainer::new(&config, backend);
    let summary = explainer.run(&mut doc, &mode, out).context("Explanation run failed")?;

    if args.save_comments && summary.comments_written > 0 {
        doc.save().with_context(|| {
            format!("Failed to save comments to {}", args.snapshot.display())
        })?;
        info!(count = summary.comments_written, "saved comments to snapshot");
    }

    Ok(Some(summary))
}

/// `explain` subcommand: report on stdout followed by a one-line summary.
pub fn explain_command(args: &ExplainArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Some(summary) = explain_command_to(args, &mut out)? {
        writeln!(
            out,
            "[-] Done: {} explained, {} failed, {} skipped, {} comments written.",
            summary.units_explained,
            summary.units_failed,
            summary.units_skipped,
            summary.comments_written
        )?;
    }
    Ok(())
}
