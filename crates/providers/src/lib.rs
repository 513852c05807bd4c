//! LLM provider implementations for Deskline.
//!
//! The help desk talks to any OpenAI-compatible `/v1/chat/completions`
//! endpoint (OpenAI, OpenRouter, Ollama, vLLM, ...), which covers every
//! deployment we have needed so far.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
