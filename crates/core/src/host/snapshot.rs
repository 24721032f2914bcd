use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::host::{BlockRange, Document, HostError, Instruction, Procedure, Segment};

/// Serializable host state: segments, labels, procedures, instructions, and comments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_segment: Option<String>,
    /// Entry address of the procedure the host UI has selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_procedure: Option<u64>,
    #[serde(default)]
    pub segments: Vec<SnapshotSegment>,
    #[serde(default)]
    pub comments: BTreeMap<u64, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSegment {
    pub name: String,
    #[serde(default)]
    pub labels: BTreeMap<u64, String>,
    #[serde(default)]
    pub procedures: Vec<SnapshotProcedure>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    #[serde(skip)]
    instruction_index: HashMap<u64, usize>,
}

impl SnapshotSegment {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn with_label(mut self, address: u64, label: impl Into<String>) -> Self {
        self.labels.insert(address, label.into());
        self
    }

    pub fn with_procedure(mut self, procedure: SnapshotProcedure) -> Self {
        self.procedures.push(procedure);
        self
    }

    pub fn with_instruction(mut self, instruction: Instruction) -> Self {
        self.instruction_index.insert(instruction.address, self.instructions.len());
        self.instructions.push(instruction);
        self
    }

    fn reindex(&mut self) {
        self.instruction_index =
            self.instructions.iter().enumerate().map(|(idx, insn)| (insn.address, idx)).collect();
    }

    fn find_procedure(&self, address: u64) -> Option<&SnapshotProcedure> {
        self.procedures.iter().find(|p| p.entry == address).or_else(|| {
            self.procedures.iter().find(|p| p.basic_blocks.iter().any(|b| b.contains(address)))
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotProcedure {
    pub entry: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pseudo_code: Option<String>,
    #[serde(default)]
    pub basic_blocks: Vec<BlockRange>,
}

impl SnapshotProcedure {
    pub fn new(entry: u64) -> Self {
        Self { entry, ..Default::default() }
    }

    pub fn with_pseudo_code(mut self, code: impl Into<String>) -> Self {
        self.pseudo_code = Some(code.into());
        self
    }

    pub fn with_block(mut self, start: u64, end: u64) -> Self {
        self.basic_blocks.push(BlockRange { start, end });
        self
    }
}

impl Procedure for SnapshotProcedure {
    fn entry_point(&self) -> u64 {
        self.entry
    }

    fn basic_block_count(&self) -> usize {
        self.basic_blocks.len()
    }

    fn basic_block(&self, index: usize) -> Option<BlockRange> {
        self.basic_blocks.get(index).copied()
    }

    fn decompile(&self) -> Option<String> {
        self.pseudo_code.clone()
    }
}

impl Segment for SnapshotSegment {
    fn name(&self) -> &str {
        &self.name
    }

    fn procedure_count(&self) -> usize {
        self.procedures.len()
    }

    fn procedure_at_index(&self, index: usize) -> Option<&dyn Procedure> {
        self.procedures.get(index).map(|p| p as &dyn Procedure)
    }

    fn name_at_address(&self, address: u64) -> Option<&str> {
        self.labels.get(&address).map(String::as_str)
    }

    fn instruction_at_address(&self, address: u64) -> Option<Instruction> {
        self.instruction_index.get(&address).and_then(|idx| self.instructions.get(*idx)).cloned()
    }
}

/// JSON-backed host document.
///
/// Stands in for a live decompiler session: it answers the same queries and keeps
/// written comments keyed by address, which `save` persists back to disk.
#[derive(Debug, Clone, Default)]
pub struct SnapshotDocument {
    data: SnapshotData,
    path: Option<PathBuf>,
}

impl SnapshotDocument {
    pub fn new(mut data: SnapshotData) -> Self {
        for segment in &mut data.segments {
            segment.reindex();
        }
        Self { data, path: None }
    }

    pub fn from_json(body: &str) -> Result<Self, HostError> {
        let data: SnapshotData = serde_json::from_str(body)?;
        Ok(Self::new(data))
    }

    /// Load a snapshot file; `save` writes back to the same path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let path = path.as_ref();
        let body = fs::read_to_string(path)
            .map_err(|source| HostError::Read { path: path.display().to_string(), source })?;
        let mut doc = Self::from_json(&body)?;
        doc.path = Some(path.to_path_buf());
        debug!(path = %path.display(), segments = doc.data.segments.len(), "loaded host snapshot");
        Ok(doc)
    }

    pub fn comments(&self) -> &BTreeMap<u64, String> {
        &self.data.comments
    }

    pub fn to_json_pretty(&self) -> Result<String, HostError> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), HostError> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        fs::write(path, json)
            .map_err(|source| HostError::Write { path: path.display().to_string(), source })
    }

    /// Persist to the path this snapshot was loaded from. No-op for in-memory snapshots.
    pub fn save(&self) -> Result<(), HostError> {
        match &self.path {
            Some(path) => self.save_to(path),
            None => Ok(()),
        }
    }

    /// Make the procedure covering `address` current, along with its segment.
    pub fn select_procedure(&mut self, address: u64) -> Result<(), HostError> {
        let (segment, entry) = self
            .data
            .segments
            .iter()
            .find_map(|seg| seg.find_procedure(address).map(|p| (seg.name.clone(), p.entry)))
            .ok_or(HostError::NoProcedureAt(address))?;
        self.data.current_segment = Some(segment);
        self.data.current_procedure = Some(entry);
        Ok(())
    }
}

impl Document for SnapshotDocument {
    fn segment_count(&self) -> usize {
        self.data.segments.len()
    }

    fn segment_at_index(&self, index: usize) -> Option<&dyn Segment> {
        self.data.segments.get(index).map(|s| s as &dyn Segment)
    }

    fn segment_by_name(&self, name: &str) -> Option<&dyn Segment> {
        self.data.segments.iter().find(|s| s.name == name).map(|s| s as &dyn Segment)
    }

    fn current_segment(&self) -> Option<&dyn Segment> {
        if let Some(name) = &self.data.current_segment {
            return self.segment_by_name(name);
        }
        let entry = self.data.current_procedure?;
        self.data
            .segments
            .iter()
            .find(|s| s.procedures.iter().any(|p| p.entry == entry))
            .map(|s| s as &dyn Segment)
    }

    fn current_procedure(&self) -> Option<&dyn Procedure> {
        let entry = self.data.current_procedure?;
        self.data
            .segments
            .iter()
            .flat_map(|s| s.procedures.iter())
            .find(|p| p.entry == entry)
            .map(|p| p as &dyn Procedure)
    }

    fn set_comment(&mut self, address: u64, comment: &str) -> Result<(), HostError> {
        self.data.comments.insert(address, comment.to_string());
        Ok(())
    }
}
