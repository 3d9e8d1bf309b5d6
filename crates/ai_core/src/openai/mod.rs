//! OpenAI-compatible chat-completion backend (Groq, OpenAI, local gateways)

mod client;

pub use client::ChatCompletionEngine;
