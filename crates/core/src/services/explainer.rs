use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::{collect_classes, parse_label, InclusionPolicy};
use crate::config::ExplainerConfig;
use crate::host::{BlockRange, Document, HostError, Prompter, Segment};
use crate::model::{ClassGroup, CodeBlock, ExplanationResult};
use crate::render::{
    render_asm_block, render_pseudo, render_pseudo_with_signature, wrap_text, ASM_HEADER,
};
use crate::services::explanation::{BackendError, ExplanationBackend};

/// Comment written at a block whose instructions the host could not decode.
pub const ASM_FALLBACK_COMMENT: &str = "Cannot recognize this procedure's instructions.";

/// Buttons of the mode menu, in menu order.
pub const MODE_BUTTONS: [&str; 5] =
    ["[-] All Classes", "[-] Name Class", "[-] Pseudo Code", "[-] ASM Instruction", "[-] Cancel"];

const END_RULE_DASHES: usize = 107;

/// One-shot operating mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    AllClasses,
    NamedClass(String),
    PseudoProcedure,
    AsmProcedure,
}

#[derive(Debug, Error)]
pub enum ExplainError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub methods_found: usize,
    pub units_explained: usize,
    pub units_failed: usize,
    pub units_skipped: usize,
    pub comments_written: usize,
}

/// Present the mode menu and resolve the chosen mode.
///
/// Cancelled menus and cancelled or empty class names print a notice and yield `None`.
pub fn select_mode(prompter: &mut dyn Prompter, out: &mut dyn Write) -> io::Result<Option<Mode>> {
    let mode = match prompter.choose("Select explaining type:", &MODE_BUTTONS) {
        Some(0) => Mode::AllClasses,
        Some(1) => match prompter.ask("Please input the class name:") {
            None => {
                writeln!(out, "Cancel Explaining!")?;
                return Ok(None);
            }
            Some(name) if name.is_empty() => {
                writeln!(out, "Class name can not be empty!")?;
                return Ok(None);
            }
            Some(name) => Mode::NamedClass(name),
        },
        Some(2) => Mode::PseudoProcedure,
        Some(3) => Mode::AsmProcedure,
        _ => {
            writeln!(out, "[-] Cancel Explaining!")?;
            return Ok(None);
        }
    };
    Ok(Some(mode))
}

pub fn class_prompt(class_name: &str, codes: &str, language: &str) -> String {
    format!(
        "Can you describe and breakdown what class {class_name} does? and don't forget to explain \
         the instruction set meaning in the pseudo code\nHere is pseudo code:\n{codes}\n{}",
        language_instruction(language)
    )
}

pub fn procedure_prompt(codes: &str, language: &str) -> String {
    format!(
        "Can you describe and breakdown what this procedure does? include parameters? and don't \
         forget to explain the instruction set meaning in the pseudo code\nHere is pseudo code:\n\
         {codes}\n{}",
        language_instruction(language)
    )
}

pub fn asm_prompt(codes: &str, language: &str) -> String {
    format!(
        "Can you describe and breakdown what this procedure asm code does? include parameters? and \
         don't forget to explain the instruction set meaning in the asm code\nHere is asm code:\n\
         {codes}\n{}",
        language_instruction(language)
    )
}

fn language_instruction(language: &str) -> String {
    format!("Please answer only in {language}.")
}

fn end_rule() -> String {
    "-".repeat(END_RULE_DASHES)
}

/// Display names for the current procedure's label.
struct ProcedureLabel {
    signature: String,
    class_suffix: String,
}

/// Drives one run: aggregate or select code, prompt the backend, route the replies.
///
/// Backend calls are strictly sequential. In the multi-unit modes a failure on the
/// first call aborts the run; later failures are reported and the run moves on.
pub struct Explainer<'a> {
    config: &'a ExplainerConfig,
    backend: &'a dyn ExplanationBackend,
}

impl<'a> Explainer<'a> {
    pub fn new(config: &'a ExplainerConfig, backend: &'a dyn ExplanationBackend) -> Self {
        Self { config, backend }
    }

    pub fn run(
        &self,
        doc: &mut dyn Document,
        mode: &Mode,
        out: &mut dyn Write,
    ) -> Result<RunSummary, ExplainError> {
        info!(?mode, backend = self.backend.name(), "starting run");
        match mode {
            Mode::AllClasses => self.explain_classes(doc, None, out),
            Mode::NamedClass(name) if name.is_empty() => {
                writeln!(out, "Class name can not be empty!")?;
                Ok(RunSummary::default())
            }
            Mode::NamedClass(name) => self.explain_classes(doc, Some(name), out),
            Mode::PseudoProcedure => self.explain_pseudo_procedure(doc, out),
            Mode::AsmProcedure => self.explain_asm_procedure(doc, out),
        }
    }

    /// Submit `prompt` once and wrap the reply to the configured width.
    pub fn ask(&self, prompt: &str) -> Result<ExplanationResult, BackendError> {
        let raw_text = self.backend.explain(prompt)?;
        let wrapped_text = wrap_text(&raw_text, self.config.wrap_width);
        Ok(ExplanationResult { raw_text, wrapped_text })
    }

    pub fn explain_classes(
        &self,
        doc: &dyn Document,
        class_filter: Option<&str>,
        out: &mut dyn Write,
    ) -> Result<RunSummary, ExplainError> {
        let mut summary = RunSummary::default();
        let Some(segment) = doc.text_segment(&self.config.text_segment) else {
            writeln!(out, "[-] No segment found in document.")?;
            return Ok(summary);
        };

        let policy = InclusionPolicy::from_config(self.config).with_class_filter(class_filter);
        let index = collect_classes(segment, &policy);
        summary.methods_found = index.total_methods;
        writeln!(out, "[-] Total method found : {}", index.total_methods)?;
        if let (Some(name), true) = (class_filter, index.is_empty()) {
            writeln!(out, "[-] No methods found for class {name}.")?;
        }

        let mut calls = 0usize;
        for group in &index.groups {
            writeln!(out, "\n***** START {} *****", group.class_name)?;
            let codes = class_bundle(segment, group);
            writeln!(
                out,
                "Explaining class name {}:\n{}\n***** END {} *****",
                group.class_name, codes, group.class_name
            )?;
            if codes.is_empty() {
                writeln!(out, "[-] No pseudo code for class {}, skipping.", group.class_name)?;
                summary.units_skipped += 1;
                continue;
            }

            let prompt = class_prompt(&group.class_name, &codes, &self.config.language);
            let first = calls == 0;
            calls += 1;
            match self.ask(&prompt) {
                Ok(result) => {
                    writeln!(
                        out,
                        "Description for class {}: \n{}\n{}\n",
                        group.class_name,
                        result.raw_text,
                        end_rule()
                    )?;
                    summary.units_explained += 1;
                }
                Err(err) => {
                    let unit = format!("class {}", group.class_name);
                    self.unit_failed(err, first, &unit, out, &mut summary)?
                }
            }
        }
        Ok(summary)
    }

    pub fn explain_pseudo_procedure(
        &self,
        doc: &dyn Document,
        out: &mut dyn Write,
    ) -> Result<RunSummary, ExplainError> {
        let mut summary = RunSummary::default();
        let Some(procedure) = doc.current_procedure() else {
            writeln!(out, "[-] Oppss.. No current procedure found.")?;
            summary.units_skipped += 1;
            return Ok(summary);
        };
        let address = procedure.entry_point();
        let label = self.procedure_label(doc, address);

        let Some(block) = render_pseudo_with_signature(procedure, &label.signature) else {
            writeln!(out, "[-] No pseudo code for procedure at address 0x{address:X}.")?;
            summary.units_skipped += 1;
            return Ok(summary);
        };

        writeln!(
            out,
            "Explaining procedure func {} at address 0x{address:X}{}:\n{}",
            label.signature,
            label.class_suffix,
            block.text()
        )?;
        let result = self.ask(&procedure_prompt(block.text(), &self.config.language))?;
        writeln!(
            out,
            "Description for method func {} at address 0x{address:X}{}: \n{}\n{}\n",
            label.signature,
            label.class_suffix,
            result.raw_text,
            end_rule()
        )?;
        summary.units_explained += 1;
        Ok(summary)
    }

    pub fn explain_asm_procedure(
        &self,
        doc: &mut dyn Document,
        out: &mut dyn Write,
    ) -> Result<RunSummary, ExplainError> {
        let mut summary = RunSummary::default();
        let (address, blocks) = match doc.current_procedure() {
            Some(procedure) => {
                let blocks: Vec<BlockRange> = (0..procedure.basic_block_count())
                    .filter_map(|i| procedure.basic_block(i))
                    .collect();
                (procedure.entry_point(), blocks)
            }
            None => {
                writeln!(out, "[-] Oppss.. No current procedure found.")?;
                summary.units_skipped += 1;
                return Ok(summary);
            }
        };
        let label = self.procedure_label(&*doc, address);

        let mut calls = 0usize;
        for (idx, block) in blocks.into_iter().enumerate() {
            let code = match self.instruction_segment(&*doc) {
                Some(segment) => render_asm_block(segment, block),
                None => CodeBlock::Asm {
                    start: block.start,
                    lines: Vec::new(),
                    text: format!("{ASM_HEADER}\n"),
                },
            };

            if code.is_empty_listing() {
                writeln!(
                    out,
                    "{}. No instructions recognized at address 0x{:X}; writing fallback comment.",
                    idx + 1,
                    block.start
                )?;
                doc.set_comment(block.start, ASM_FALLBACK_COMMENT)?;
                summary.comments_written += 1;
                summary.units_skipped += 1;
                continue;
            }

            writeln!(
                out,
                "{}. Explaining procedure func {} instruction set at address 0x{:X}{}:\n{}",
                idx + 1,
                label.signature,
                block.start,
                label.class_suffix,
                code.text()
            )?;
            let prompt = asm_prompt(code.text(), &self.config.language);
            let first = calls == 0;
            calls += 1;
            match self.ask(&prompt) {
                Ok(result) => {
                    doc.set_comment(block.start, &result.wrapped_text)?;
                    info!(address = block.start, "wrote explanation comment");
                    summary.comments_written += 1;
                    summary.units_explained += 1;
                    writeln!(
                        out,
                        "Description for instruction set at address 0x{:X}{}: \n{}\n{}\n",
                        block.start,
                        label.class_suffix,
                        result.raw_text,
                        end_rule()
                    )?;
                }
                Err(err) => self.unit_failed(
                    err,
                    first,
                    &format!("block at 0x{:X}", block.start),
                    out,
                    &mut summary,
                )?,
            }
        }
        Ok(summary)
    }

    fn unit_failed(
        &self,
        err: BackendError,
        first_call: bool,
        unit: &str,
        out: &mut dyn Write,
        summary: &mut RunSummary,
    ) -> Result<(), ExplainError> {
        if first_call {
            return Err(err.into());
        }
        warn!(unit, error = %err, "explanation failed");
        writeln!(out, "[-] Failed to explain {unit}: {err}")?;
        summary.units_failed += 1;
        Ok(())
    }

    fn instruction_segment<'d>(&self, doc: &'d dyn Document) -> Option<&'d dyn Segment> {
        doc.current_segment().or_else(|| doc.text_segment(&self.config.text_segment))
    }

    /// Signature and class suffix for the procedure at `address`.
    ///
    /// Labels that are not methods fall back to the raw label, or `sub_<HEX>`.
    fn procedure_label(&self, doc: &dyn Document, address: u64) -> ProcedureLabel {
        let label = self
            .instruction_segment(doc)
            .and_then(|s| s.name_at_address(address))
            .or_else(|| {
                doc.text_segment(&self.config.text_segment).and_then(|s| s.name_at_address(address))
            });
        match (label, label.and_then(parse_label)) {
            (_, Some(parsed)) => ProcedureLabel {
                signature: parsed.signature(),
                class_suffix: format!(" in class {}", parsed.class_name),
            },
            (Some(raw), None) => {
                ProcedureLabel { signature: format!("{raw}()"), class_suffix: String::new() }
            }
            (None, None) => ProcedureLabel {
                signature: format!("sub_{address:X}()"),
                class_suffix: String::new(),
            },
        }
    }
}

/// Concatenate the pseudo-code of every member that decompiles.
fn class_bundle(segment: &dyn Segment, group: &ClassGroup) -> String {
    let mut codes = String::new();
    for record in &group.members {
        let Some(procedure) = segment.procedure_at_index(record.procedure_index) else { continue };
        if let Some(block) = render_pseudo(procedure, record) {
            codes.push_str(block.text());
        }
    }
    codes
}
