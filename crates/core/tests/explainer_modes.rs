use std::sync::Mutex;

use explainer_core::host::snapshot::{SnapshotData, SnapshotProcedure, SnapshotSegment};
use explainer_core::host::{Instruction, ScriptedPrompter, SnapshotDocument};
use explainer_core::model::JumpKind;
use explainer_core::services::explainer::{select_mode, ASM_FALLBACK_COMMENT};
use explainer_core::services::explanation::{BackendError, EchoBackend, ExplanationBackend};
use explainer_core::{Explainer, ExplainerConfig, Mode};

/// Records every prompt and replies from a script; `None` entries fail.
struct ScriptedBackend {
    replies: Mutex<Vec<Option<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn new(replies: &[Option<&str>]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().rev().map(|r| r.map(str::to_string)).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ExplanationBackend for ScriptedBackend {
    fn explain(&self, prompt: &str) -> Result<String, BackendError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop().flatten() {
            Some(reply) => Ok(reply),
            None => Err(BackendError::Remote("scripted failure".into())),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

fn foo_document() -> SnapshotDocument {
    let segment = SnapshotSegment::new("__TEXT")
        .with_label(0x1000, "-[Foo bar:]")
        .with_procedure(SnapshotProcedure::new(0x1000).with_pseudo_code("return 1;"));
    SnapshotDocument::new(SnapshotData {
        current_procedure: Some(0x1000),
        segments: vec![segment],
        ..Default::default()
    })
}

fn three_class_document() -> SnapshotDocument {
    let segment = SnapshotSegment::new("__TEXT")
        .with_label(0x1000, "-[Alpha one]")
        .with_label(0x1010, "-[Beta two]")
        .with_label(0x1020, "-[Gamma three]")
        .with_label(0x1030, "-[Alpha four]")
        .with_procedure(SnapshotProcedure::new(0x1000).with_pseudo_code("a1();"))
        .with_procedure(SnapshotProcedure::new(0x1010).with_pseudo_code("b2();"))
        .with_procedure(SnapshotProcedure::new(0x1020).with_pseudo_code("g3();"))
        .with_procedure(SnapshotProcedure::new(0x1030));
    SnapshotDocument::new(SnapshotData { segments: vec![segment], ..Default::default() })
}

fn run(
    doc: &mut SnapshotDocument,
    backend: &dyn ExplanationBackend,
    mode: Mode,
) -> (String, explainer_core::RunSummary) {
    let config = ExplainerConfig::default();
    let explainer = Explainer::new(&config, backend);
    let mut out = Vec::new();
    let summary = explainer.run(doc, &mode, &mut out).expect("run");
    (String::from_utf8(out).unwrap(), summary)
}

#[test]
fn pseudo_mode_echo_contains_rendered_block() {
    let mut doc = foo_document();
    let (report, summary) = run(&mut doc, &EchoBackend, Mode::PseudoProcedure);

    let block = "-bar (arg2: Any) {\nreturn 1;\n}";
    let description = report.split("Description for method").nth(1).expect("description");
    assert!(description.contains(block), "report was:\n{report}");
    assert!(report.contains("at address 0x1000 in class Foo"));
    assert_eq!(summary.units_explained, 1);
    assert!(doc.comments().is_empty());
}

#[test]
fn every_prompt_names_the_answer_language() {
    let config = ExplainerConfig::default().with_language("German");
    let backend = ScriptedBackend::new(&[Some("ok")]);
    let explainer = Explainer::new(&config, &backend);
    let mut doc = foo_document();
    explainer.run(&mut doc, &Mode::PseudoProcedure, &mut Vec::new()).unwrap();
    assert!(backend.prompts()[0].contains("Please answer only in German."));
}

#[test]
fn pseudo_mode_without_current_procedure_skips_backend() {
    let mut doc = SnapshotDocument::new(SnapshotData {
        segments: vec![SnapshotSegment::new("__TEXT")],
        ..Default::default()
    });
    let backend = ScriptedBackend::new(&[]);
    let (report, summary) = run(&mut doc, &backend, Mode::PseudoProcedure);
    assert!(report.contains("No current procedure found"));
    assert!(backend.prompts().is_empty());
    assert_eq!(summary.units_skipped, 1);
}

#[test]
fn pseudo_mode_backend_failure_fails_the_run() {
    let config = ExplainerConfig::default();
    let backend = ScriptedBackend::new(&[None]);
    let explainer = Explainer::new(&config, &backend);
    let mut doc = foo_document();
    let err = explainer.run(&mut doc, &Mode::PseudoProcedure, &mut Vec::new()).unwrap_err();
    assert!(err.to_string().contains("scripted failure"));
}

#[test]
fn asm_mode_empty_block_writes_fallback_without_backend() {
    let segment = SnapshotSegment::new("__TEXT")
        .with_label(0x2000, "-[Foo empty]")
        .with_procedure(SnapshotProcedure::new(0x2000).with_block(0x2000, 0x2000));
    let mut doc = SnapshotDocument::new(SnapshotData {
        current_procedure: Some(0x2000),
        segments: vec![segment],
        ..Default::default()
    });
    let backend = ScriptedBackend::new(&[]);
    let (_, summary) = run(&mut doc, &backend, Mode::AsmProcedure);

    assert!(backend.prompts().is_empty());
    assert_eq!(doc.comments().get(&0x2000).map(String::as_str), Some(ASM_FALLBACK_COMMENT));
    assert_eq!(summary.comments_written, 1);
}

#[test]
fn asm_mode_comments_each_block_with_wrapped_reply() {
    let long_reply = "  This block compares the first argument against zero and branches to the \
                      epilogue when it is nil, otherwise it falls through into the message send.";
    let segment = SnapshotSegment::new("__TEXT")
        .with_label(0x3000, "-[Foo check:]")
        .with_procedure(
            SnapshotProcedure::new(0x3000).with_block(0x3000, 0x3008).with_block(0x3008, 0x300C),
        )
        .with_instruction(Instruction {
            address: 0x3000,
            text: "cmp".into(),
            arguments: vec!["x2".into(), "#0x0".into()],
            length: 4,
            jump: JumpKind::None,
        })
        .with_instruction(Instruction {
            address: 0x3004,
            text: "b.eq".into(),
            arguments: vec!["0x3010".into()],
            length: 4,
            jump: JumpKind::Conditional,
        })
        .with_instruction(Instruction {
            address: 0x3008,
            text: "ret".into(),
            arguments: vec![],
            length: 4,
            jump: JumpKind::None,
        });
    let mut doc = SnapshotDocument::new(SnapshotData {
        current_procedure: Some(0x3000),
        segments: vec![segment],
        ..Default::default()
    });
    let backend = ScriptedBackend::new(&[Some(long_reply), Some("Returns.")]);
    let (_, summary) = run(&mut doc, &backend, Mode::AsmProcedure);

    let prompts = backend.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("0x3004: b.eq 0x3010; Conditional Jump"));
    assert!(prompts[1].contains("0x3008: ret"));
    assert!(!prompts[1].contains("0x3000"));

    let first = doc.comments().get(&0x3000).expect("comment for first block");
    assert!(first.lines().count() > 1);
    for line in first.lines() {
        assert!(line.starts_with("  "));
        assert!(line.chars().count() <= 80);
    }
    assert_eq!(doc.comments().get(&0x3008).map(String::as_str), Some("Returns."));
    assert_eq!(summary.comments_written, 2);
    assert_eq!(summary.units_explained, 2);
}

#[test]
fn asm_mode_rerun_overwrites_comments() {
    let segment = SnapshotSegment::new("__TEXT")
        .with_procedure(SnapshotProcedure::new(0x4000).with_block(0x4000, 0x4004))
        .with_instruction(Instruction {
            address: 0x4000,
            text: "ret".into(),
            arguments: vec![],
            length: 4,
            jump: JumpKind::None,
        });
    let mut doc = SnapshotDocument::new(SnapshotData {
        current_procedure: Some(0x4000),
        segments: vec![segment],
        ..Default::default()
    });
    run(&mut doc, &ScriptedBackend::new(&[Some("first")]), Mode::AsmProcedure);
    run(&mut doc, &ScriptedBackend::new(&[Some("second")]), Mode::AsmProcedure);
    assert_eq!(doc.comments().len(), 1);
    assert_eq!(doc.comments().get(&0x4000).map(String::as_str), Some("second"));
}

#[test]
fn all_classes_mode_issues_one_call_per_class_in_scan_order() {
    let mut doc = three_class_document();
    let backend = ScriptedBackend::new(&[Some("A"), Some("B"), Some("G")]);
    let (report, summary) = run(&mut doc, &backend, Mode::AllClasses);

    let prompts = backend.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[0].contains("class Alpha"));
    assert!(prompts[0].contains("func -one() {\na1();\n}"));
    // -[Alpha four] has no pseudo-code and contributes nothing.
    assert!(!prompts[0].contains("-four"));
    assert!(prompts[1].contains("class Beta"));
    assert!(prompts[2].contains("class Gamma"));

    assert!(report.contains("[-] Total method found : 4"));
    assert_eq!(summary.methods_found, 4);
    assert_eq!(summary.units_explained, 3);
}

#[test]
fn class_failure_after_first_call_is_reported_and_run_continues() {
    let mut doc = three_class_document();
    let backend = ScriptedBackend::new(&[Some("A"), None, Some("G")]);
    let (report, summary) = run(&mut doc, &backend, Mode::AllClasses);

    assert_eq!(backend.prompts().len(), 3);
    assert!(report.contains("[-] Failed to explain class Beta"));
    assert!(report.contains("Description for class Gamma"));
    assert_eq!(summary.units_failed, 1);
    assert_eq!(summary.units_explained, 2);
}

#[test]
fn class_failure_on_first_call_aborts_run() {
    let config = ExplainerConfig::default();
    let backend = ScriptedBackend::new(&[None, Some("B"), Some("G")]);
    let explainer = Explainer::new(&config, &backend);
    let mut doc = three_class_document();
    let err = explainer.run(&mut doc, &Mode::AllClasses, &mut Vec::new()).unwrap_err();
    assert!(err.to_string().contains("scripted failure"));
    assert_eq!(backend.prompts().len(), 1);
}

#[test]
fn named_class_mode_filters_to_one_class() {
    let mut doc = three_class_document();
    let backend = ScriptedBackend::new(&[Some("B")]);
    let (report, summary) = run(&mut doc, &backend, Mode::NamedClass("Beta".into()));
    assert_eq!(backend.prompts().len(), 1);
    assert!(backend.prompts()[0].contains("class Beta"));
    assert!(report.contains("[-] Total method found : 1"));
    assert_eq!(summary.units_explained, 1);
}

#[test]
fn named_class_mode_with_empty_name_makes_no_calls() {
    let mut doc = three_class_document();
    let backend = ScriptedBackend::new(&[]);
    let (report, _) = run(&mut doc, &backend, Mode::NamedClass(String::new()));
    assert!(report.contains("Class name can not be empty!"));
    assert!(backend.prompts().is_empty());
}

#[test]
fn named_class_filter_must_match_exactly() {
    let mut doc = three_class_document();
    let backend = ScriptedBackend::new(&[]);
    let (report, summary) = run(&mut doc, &backend, Mode::NamedClass(" Beta ".into()));
    assert_eq!(summary.methods_found, 0);
    assert!(report.contains("[-] Total method found : 0"));
    assert!(backend.prompts().is_empty());
}

#[test]
fn select_mode_resolves_menu_and_class_prompt() {
    let mut out = Vec::new();
    let mut prompter = ScriptedPrompter::new().with_choice(Some(1)).with_answer(Some("Foo"));
    assert_eq!(select_mode(&mut prompter, &mut out).unwrap(), Some(Mode::NamedClass("Foo".into())));

    let mut prompter = ScriptedPrompter::new().with_choice(Some(3));
    assert_eq!(select_mode(&mut prompter, &mut out).unwrap(), Some(Mode::AsmProcedure));

    let mut prompter = ScriptedPrompter::new().with_choice(Some(1)).with_answer(None);
    assert_eq!(select_mode(&mut prompter, &mut out).unwrap(), None);

    let mut prompter = ScriptedPrompter::new().with_choice(Some(1)).with_answer(Some(""));
    assert_eq!(select_mode(&mut prompter, &mut out).unwrap(), None);

    let mut prompter = ScriptedPrompter::new().with_choice(Some(4));
    assert_eq!(select_mode(&mut prompter, &mut out).unwrap(), None);

    let shown = String::from_utf8(out).unwrap();
    assert!(shown.contains("Cancel Explaining!"));
    assert!(shown.contains("Class name can not be empty!"));
}
