//! Symbol classification: label parsing, inclusion policy, and class aggregation.

pub mod classes;
pub mod label;
pub mod policy;

pub use classes::{collect_classes, ClassIndex};
pub use label::parse_label;
pub use policy::InclusionPolicy;
