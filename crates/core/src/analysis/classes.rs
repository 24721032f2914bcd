use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::policy::InclusionPolicy;
use crate::host::Segment;
use crate::model::{ClassGroup, ProcedureRecord};

/// Result of one aggregation pass over a segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassIndex {
    /// Groups in order of each class's first accepted procedure.
    pub groups: Vec<ClassGroup>,
    pub total_methods: usize,
}

impl ClassIndex {
    pub fn get(&self, class_name: &str) -> Option<&ClassGroup> {
        self.groups.iter().find(|g| g.class_name == class_name)
    }

    pub fn class_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.class_name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Group every accepted procedure of `segment` by class, preserving scan order.
pub fn collect_classes(segment: &dyn Segment, policy: &InclusionPolicy<'_>) -> ClassIndex {
    let mut index = ClassIndex::default();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for i in 0..segment.procedure_count() {
        let Some(procedure) = segment.procedure_at_index(i) else { continue };
        let address = procedure.entry_point();
        let Some(label) = segment.name_at_address(address) else { continue };
        let Some(parsed) = policy.accept(label) else {
            debug!(address, label, "label skipped");
            continue;
        };

        let slot = *slots.entry(parsed.class_name.clone()).or_insert_with(|| {
            index.groups.push(ClassGroup::new(parsed.class_name.clone()));
            index.groups.len() - 1
        });
        index.groups[slot].members.push(ProcedureRecord::new(i, address, label, parsed));
        index.total_methods += 1;
    }

    info!(
        segment = segment.name(),
        classes = index.groups.len(),
        methods = index.total_methods,
        "collected classes"
    );
    index
}
