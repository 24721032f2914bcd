//! Text rendering: pseudo-code bundles, per-block assembly listings, and the
//! indentation-preserving wrapper used for host comments.

pub mod code;
pub mod wrap;

pub use code::{render_asm_block, render_pseudo, render_pseudo_with_signature, ASM_HEADER};
pub use wrap::wrap_text;
