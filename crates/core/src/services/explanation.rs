use std::collections::HashMap;

use thiserror::Error;

use crate::config::ExplainerConfig;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("No API key configured; set api_key in the config or {}", crate::config::API_KEY_ENV)]
    MissingCredential,
    #[error("Explanation request failed: {0}")]
    Transport(String),
    #[error("Explanation backend returned an error: {0}")]
    Remote(String),
    #[error("Malformed explanation response: {0}")]
    MalformedResponse(String),
}

/// Turns a prompt into free-form explanation text.
///
/// Calls block until the reply (or an error) arrives; there are no retries.
pub trait ExplanationBackend: Send + Sync {
    fn explain(&self, prompt: &str) -> Result<String, BackendError>;
    fn name(&self) -> &'static str;
}

/// Registry for explanation backends; callers select by name.
#[derive(Default)]
pub struct BackendRegistry {
    backends: HashMap<String, Box<dyn ExplanationBackend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self { backends: HashMap::new() }
    }

    pub fn register<B: ExplanationBackend + 'static>(&mut self, backend: B) -> &mut Self {
        self.backends.insert(backend.name().to_string(), Box::new(backend));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn ExplanationBackend> {
        self.backends.get(name).map(|b| &**b)
    }

    /// Sorted backend names for error messages/help.
    pub fn names(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.backends.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Returns the prompt unchanged. Handy for inspecting prompts without network access.
pub struct EchoBackend;

impl ExplanationBackend for EchoBackend {
    fn explain(&self, prompt: &str) -> Result<String, BackendError> {
        Ok(prompt.to_string())
    }

    fn name(&self) -> &'static str {
        "echo"
    }
}

/// Registry populated with every backend compiled into this build.
pub fn default_backend_registry(config: &ExplainerConfig) -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register(EchoBackend);
    #[cfg(feature = "openai-backend")]
    {
        match crate::services::backends::OpenAiBackend::from_config(config) {
            Ok(backend) => {
                registry.register(backend);
            }
            Err(err) => tracing::warn!(error = %err, "openai backend unavailable"),
        }
    }
    #[cfg(not(feature = "openai-backend"))]
    let _ = config;
    registry
}
