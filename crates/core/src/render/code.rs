use tracing::debug;

use crate::host::{BlockRange, Procedure, Segment};
use crate::model::{CodeBlock, ProcedureRecord};

/// First line of every assembly listing.
pub const ASM_HEADER: &str = "---------- ASM_CODE ----------";

/// Wrap a procedure's decompiled text in its synthesized signature.
///
/// Returns `None` when the host cannot decompile the procedure; the procedure then
/// contributes nothing to its class bundle.
pub fn render_pseudo(procedure: &dyn Procedure, record: &ProcedureRecord) -> Option<CodeBlock> {
    render_pseudo_with_signature(procedure, &record.rendered_signature)
}

pub fn render_pseudo_with_signature(
    procedure: &dyn Procedure,
    signature: &str,
) -> Option<CodeBlock> {
    let Some(body) = procedure.decompile() else {
        debug!(entry = procedure.entry_point(), "host produced no pseudo-code");
        return None;
    };
    let text = format!("func {signature} {{\n{body}\n}}\n\n");
    Some(CodeBlock::Pseudo { text })
}

/// Render one basic block as an annotated assembly listing.
///
/// Walks `[block.start, block.end)` asking `segment` for the instruction at each
/// address. A gap advances by one byte. The address strictly increases every step,
/// so the walk always ends inside the block's range.
pub fn render_asm_block(segment: &dyn Segment, block: BlockRange) -> CodeBlock {
    let mut lines = Vec::new();
    let mut address = block.start;

    while address < block.end {
        match segment.instruction_at_address(address) {
            Some(insn) => {
                let mut line = format!("0x{address:X}: {}", insn.text);
                for arg in &insn.arguments {
                    line.push(' ');
                    line.push_str(arg);
                }
                if let Some(marker) = insn.jump.marker() {
                    line.push_str(marker);
                }
                lines.push(line);
                address = address.saturating_add(insn.length.max(1));
            }
            None => address = address.saturating_add(1),
        }
    }

    let mut text = String::from(ASM_HEADER);
    text.push('\n');
    for line in &lines {
        text.push_str(line);
        text.push('\n');
    }
    CodeBlock::Asm { start: block.start, lines, text }
}
