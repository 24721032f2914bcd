use explainer_core::services::explanation::{
    default_backend_registry, BackendError, BackendRegistry, EchoBackend, ExplanationBackend,
};
use explainer_core::ExplainerConfig;

struct FailingBackend;

impl ExplanationBackend for FailingBackend {
    fn explain(&self, _prompt: &str) -> Result<String, BackendError> {
        Err(BackendError::Transport("connection refused".into()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

#[test]
fn backend_registry_registers_and_resolves() {
    let mut registry = BackendRegistry::new();
    registry.register(FailingBackend).register(EchoBackend);
    assert_eq!(registry.names(), vec!["echo".to_string(), "failing".to_string()]);
    assert!(registry.get("missing").is_none());

    let failing = registry.get("failing").expect("failing backend");
    assert!(failing.explain("x").is_err());
}

#[test]
fn echo_backend_returns_prompt() {
    assert_eq!(EchoBackend.explain("describe -[Foo bar]").unwrap(), "describe -[Foo bar]");
}

#[test]
fn default_registry_contains_compiled_backends() {
    let registry = default_backend_registry(&ExplainerConfig::default());
    assert!(registry.get("echo").is_some());
    #[cfg(feature = "openai-backend")]
    assert!(registry.get("openai").is_some());
}
