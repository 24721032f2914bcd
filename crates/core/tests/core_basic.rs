use explainer_core::{analysis, version};

#[test]
fn version_is_non_empty() {
    let v = version();
    assert!(!v.is_empty());
}

#[test]
fn parse_label_smoke() {
    let parsed = analysis::parse_label("-[AppDelegate application:didFinishLaunchingWithOptions:]")
        .expect("method label");
    assert_eq!(parsed.class_name, "AppDelegate");
    assert_eq!(parsed.param_count, 2);
    assert_eq!(
        parsed.signature(),
        "-application didFinishLaunchingWithOptions (arg2: Any, arg3: Any)"
    );
}
