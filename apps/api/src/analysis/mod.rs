// Resume analysis: prompt, model call with result normalization, and the
// upload endpoint. All model calls go through llm_client.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
