// Code review: prompt, retry policy, reply normalization, and the HTTP handler.
// All model calls go through llm_client via the TextGenerator seam.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod retry;
pub mod reviewer;
