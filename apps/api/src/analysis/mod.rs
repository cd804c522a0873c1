// Analysis pipeline: prompt construction, the model-backed analyzer, and
// persistence of the returned report.
// All model calls go through llm_client.

pub mod analyzer;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod repository;
