pub mod backends;
pub mod explainer;
pub mod explanation;
