//! Core data model for labels, procedures, class groups, and rendered code.
//!
//! Everything here is derived from what the host reports during one pipeline run.
//! None of these types own host state; a `ProcedureRecord` is a side table entry
//! keyed by the procedure's entry address.

use serde::{Deserialize, Serialize};

/// Whether a method label designates a class-level (`+`) or instance-level (`-`) method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    ClassMethod,
    InstanceMethod,
}

impl MethodKind {
    /// The leading label symbol for this kind.
    pub fn symbol(self) -> char {
        match self {
            MethodKind::ClassMethod => '+',
            MethodKind::InstanceMethod => '-',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(MethodKind::ClassMethod),
            '-' => Some(MethodKind::InstanceMethod),
            _ => None,
        }
    }
}

/// Structured form of an Objective-C method label such as `-[Foo bar:baz:]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLabel {
    pub kind: MethodKind,
    pub class_name: String,
    /// Method name with colons replaced by spaces and the kind symbol prepended
    /// (`-[Foo bar:baz:]` yields `-bar baz `).
    pub raw_method_name: String,
    pub param_count: usize,
}

impl ParsedLabel {
    /// Synthesized argument list, numbered from 2 (`arg2: Any, arg3: Any`).
    ///
    /// Arguments 0 and 1 are the implicit receiver and selector.
    pub fn params(&self) -> String {
        (0..self.param_count).map(|i| format!("arg{}: Any", i + 2)).collect::<Vec<_>>().join(", ")
    }

    /// Rendered signature used in pseudo-code bundles: `<method>(<params>)`.
    pub fn signature(&self) -> String {
        format!("{}({})", self.raw_method_name, self.params())
    }
}

/// A procedure accepted by the inclusion policy during one traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureRecord {
    /// Position in the owning segment's procedure table.
    pub procedure_index: usize,
    pub entry_address: u64,
    pub label_name: String,
    pub parsed_label: Option<ParsedLabel>,
    pub rendered_signature: String,
}

impl ProcedureRecord {
    pub fn new(
        procedure_index: usize,
        entry_address: u64,
        label_name: impl Into<String>,
        parsed: ParsedLabel,
    ) -> Self {
        let rendered_signature = parsed.signature();
        Self {
            procedure_index,
            entry_address,
            label_name: label_name.into(),
            parsed_label: Some(parsed),
            rendered_signature,
        }
    }

    pub fn class_name(&self) -> Option<&str> {
        self.parsed_label.as_ref().map(|p| p.class_name.as_str())
    }
}

/// Accepted procedures of one class, in segment scan order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGroup {
    pub class_name: String,
    pub members: Vec<ProcedureRecord>,
}

impl ClassGroup {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self { class_name: class_name.into(), members: Vec::new() }
    }
}

/// Host-reported jump classification for a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpKind {
    #[default]
    None,
    Conditional,
    Unconditional,
}

impl JumpKind {
    /// Marker appended to an assembly line, if any.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            JumpKind::None => None,
            JumpKind::Conditional => Some("; Conditional Jump"),
            JumpKind::Unconditional => Some("; Unconditional Jump"),
        }
    }
}

/// Rendered text for one unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeBlock {
    /// A decompiled function body wrapped in a synthesized signature.
    Pseudo { text: String },
    /// Assembly listing for one basic block.
    Asm { start: u64, lines: Vec<String>, text: String },
}

impl CodeBlock {
    pub fn text(&self) -> &str {
        match self {
            CodeBlock::Pseudo { text } | CodeBlock::Asm { text, .. } => text,
        }
    }

    /// True when an assembly block recognized no instructions.
    pub fn is_empty_listing(&self) -> bool {
        matches!(self, CodeBlock::Asm { lines, .. } if lines.is_empty())
    }
}

/// Backend reply and its reflowed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationResult {
    pub raw_text: String,
    pub wrapped_text: String,
}
