use explainer_core::analysis::{collect_classes, InclusionPolicy};
use explainer_core::host::snapshot::{SnapshotProcedure, SnapshotSegment};
use explainer_core::ExplainerConfig;

/// Ten procedures: six accepted methods across three classes, interleaved with
/// unlabeled, non-method, ignored-prefix, and placeholder labels.
fn mixed_segment() -> SnapshotSegment {
    let labels = [
        (0x1000, Some("-[Foo alpha]")),
        (0x1010, Some("_main")),
        (0x1020, Some("+[Bar make:]")),
        (0x1030, None),
        (0x1040, Some("-[Foo beta:gamma:]")),
        (0x1050, Some("-[SDWebImageManager load:]")),
        (0x1060, Some("-[Baz run]")),
        (0x1070, Some("-[ClassName methodName:]")),
        (0x1080, Some("-[Bar reset]")),
        (0x1090, Some("+[Foo shared]")),
    ];
    let mut segment = SnapshotSegment::new("__TEXT");
    for (address, label) in labels {
        segment = segment.with_procedure(SnapshotProcedure::new(address));
        if let Some(label) = label {
            segment = segment.with_label(address, label);
        }
    }
    segment
}

#[test]
fn groups_accepted_methods_by_class_in_scan_order() {
    let config = ExplainerConfig::default();
    let policy = InclusionPolicy::from_config(&config);
    let index = collect_classes(&mixed_segment(), &policy);

    assert_eq!(index.class_names(), vec!["Foo", "Bar", "Baz"]);
    assert_eq!(index.total_methods, 6);
    let member_total: usize = index.groups.iter().map(|g| g.members.len()).sum();
    assert_eq!(member_total, index.total_methods);

    let foo = index.get("Foo").expect("Foo group");
    let addresses: Vec<u64> = foo.members.iter().map(|m| m.entry_address).collect();
    assert_eq!(addresses, vec![0x1000, 0x1040, 0x1090]);
    assert_eq!(foo.members[1].rendered_signature, "-beta gamma (arg2: Any, arg3: Any)");
    assert_eq!(foo.members[1].procedure_index, 4);

    for group in &index.groups {
        for member in &group.members {
            assert_eq!(member.class_name(), Some(group.class_name.as_str()));
        }
    }
}

#[test]
fn class_filter_keeps_only_matching_class() {
    let config = ExplainerConfig::default();
    let policy = InclusionPolicy::from_config(&config).with_class_filter(Some("Bar"));
    let index = collect_classes(&mixed_segment(), &policy);

    assert_eq!(index.class_names(), vec!["Bar"]);
    assert_eq!(index.total_methods, 2);
    assert_eq!(index.groups[0].members[0].label_name, "+[Bar make:]");
}

#[test]
fn unknown_filter_yields_no_groups() {
    let config = ExplainerConfig::default();
    let policy = InclusionPolicy::from_config(&config).with_class_filter(Some("Nope"));
    let index = collect_classes(&mixed_segment(), &policy);
    assert!(index.is_empty());
    assert_eq!(index.total_methods, 0);
}

#[test]
fn empty_ignore_lists_accept_every_method_label() {
    let prefixes: Vec<String> = Vec::new();
    let labels: Vec<String> = Vec::new();
    let policy = InclusionPolicy::new(&prefixes, &labels);
    let index = collect_classes(&mixed_segment(), &policy);
    assert_eq!(index.total_methods, 8);
    assert_eq!(index.class_names(), vec!["Foo", "Bar", "SDWebImageManager", "Baz", "ClassName"]);
}
