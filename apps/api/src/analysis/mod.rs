// Résumé / job description match analysis.
// Prompt construction, the single LLM call, and normalization of the reply.
// All LLM calls go through llm_client; nothing here talks to a provider directly.

pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod presentation;
pub mod prompt_builder;
pub mod prompts;
pub mod result;
pub mod service;
