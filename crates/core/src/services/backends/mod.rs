#[cfg(feature = "openai-backend")]
pub mod openai;

#[cfg(feature = "openai-backend")]
pub use openai::OpenAiBackend;
