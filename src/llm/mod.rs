//! Language-model completion calls
//!
//! Agents and the itinerary generator only see [`CompletionModel`]; the
//! OpenAI-compatible HTTP client is one implementation of it.

use async_trait::async_trait;

use crate::Result;

pub mod openai;

pub use openai::OpenAiClient;

/// A single prompt sent to the model
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Instructions describing who the model acts as
    pub system: String,
    /// The task and its data
    pub prompt: String,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
        }
    }
}

/// Something that turns a prompt into generated text.
///
/// Implementations fail with `SafarAiError::Model` when the call errors,
/// times out or yields no text.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;
    use crate::SafarAiError;

    /// Model double that replays a fixed reply and records every request
    pub struct ScriptedModel {
        reply: std::result::Result<String, String>,
        pub requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedModel {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn last_prompt(&self) -> String {
            self.requests
                .lock()
                .unwrap()
                .last()
                .map(|r| r.prompt.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl CompletionModel for ScriptedModel {
        async fn complete(&self, request: CompletionRequest) -> Result<String> {
            self.requests.lock().unwrap().push(request);
            self.reply.clone().map_err(SafarAiError::model)
        }
    }
}
