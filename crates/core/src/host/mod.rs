//! Host environment abstraction.
//!
//! The decompiling host owns segments, procedures, and instruction tables. The core
//! only borrows them for the duration of one run through these traits, and the only
//! mutation it performs is `Document::set_comment`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::JumpKind;

pub mod prompt;
pub mod snapshot;

pub use prompt::{Prompter, ScriptedPrompter, TerminalPrompter};
pub use snapshot::SnapshotDocument;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Failed to read host snapshot {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("Failed to parse host snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to write host snapshot {path}: {source}")]
    Write { path: String, source: std::io::Error },
    #[error("No procedure covers address 0x{0:X}")]
    NoProcedureAt(u64),
}

/// One decoded instruction as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub address: u64,
    /// Mnemonic text, e.g. `mov`.
    pub text: String,
    /// Formatted operands, in order.
    #[serde(default)]
    pub arguments: Vec<String>,
    pub length: u64,
    #[serde(default)]
    pub jump: JumpKind,
}

impl Instruction {
    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }
}

/// Half-open address range `[start, end)` of one basic block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRange {
    pub start: u64,
    pub end: u64,
}

impl BlockRange {
    pub fn contains(&self, address: u64) -> bool {
        address >= self.start && address < self.end
    }
}

pub trait Procedure {
    fn entry_point(&self) -> u64;
    fn basic_block_count(&self) -> usize;
    fn basic_block(&self, index: usize) -> Option<BlockRange>;
    /// Decompiled pseudo-code, or `None` when the host cannot decompile it.
    fn decompile(&self) -> Option<String>;
}

pub trait Segment {
    fn name(&self) -> &str;
    fn procedure_count(&self) -> usize;
    fn procedure_at_index(&self, index: usize) -> Option<&dyn Procedure>;
    fn name_at_address(&self, address: u64) -> Option<&str>;
    fn instruction_at_address(&self, address: u64) -> Option<Instruction>;
}

pub trait Document {
    fn segment_count(&self) -> usize;
    fn segment_at_index(&self, index: usize) -> Option<&dyn Segment>;
    fn segment_by_name(&self, name: &str) -> Option<&dyn Segment>;
    fn current_segment(&self) -> Option<&dyn Segment>;
    fn current_procedure(&self) -> Option<&dyn Procedure>;
    /// Overwrite the comment at `address`.
    fn set_comment(&mut self, address: u64, comment: &str) -> Result<(), HostError>;

    /// The named code segment, falling back to the first segment.
    fn text_segment(&self, name: &str) -> Option<&dyn Segment> {
        self.segment_by_name(name).or_else(|| self.segment_at_index(0))
    }
}
