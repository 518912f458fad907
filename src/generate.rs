//! Grounded answer generation.
//!
//! Assembles the retrieved context and the user's question into a grounded
//! chat prompt and invokes a completion provider. When retrieval produced
//! no usable context the generator returns [`NO_CONTEXT_FALLBACK`] without
//! calling the provider at all.

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::OpenAiConfig;

/// Returned when no retrieved context survives the relevance filter.
pub const NO_CONTEXT_FALLBACK: &str =
    "I don't have enough information about that in the company documents.";

/// Separator between context passages in the prompt.
const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Sampling temperature for answers; low to keep output context-faithful.
const ANSWER_TEMPERATURE: f32 = 0.1;

const SYSTEM_PROMPT: &str = r#"You are an internal AI assistant for Acme Tech Solutions.

Rules:
- Answer ONLY using the provided context.
- If the user asks specifically about "all products", list them all based on the context.
- If answer is not present -> say "I don't have enough information about that."
- Never use outside knowledge.
- Be professional and concise."#;

/// Produces a chat completion from a system and user message.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String>;
}

/// Generate the final answer for `query` from the retrieved `contexts`.
///
/// The query passed here is the ORIGINAL user query, not the normalized
/// form used for embedding; the model should see the question as asked.
pub async fn generate_answer(
    chat: &dyn ChatProvider,
    query: &str,
    contexts: &[String],
) -> Result<String> {
    if contexts.is_empty() {
        return Ok(NO_CONTEXT_FALLBACK.to_string());
    }

    let context_block = contexts.join(CONTEXT_SEPARATOR);
    let user_prompt = build_user_prompt(&context_block, query);

    chat.complete(SYSTEM_PROMPT, &user_prompt, ANSWER_TEMPERATURE)
        .await
}

fn build_user_prompt(context: &str, query: &str) -> String {
    format!(
        "Context:\n{}\n\nUser Question:\n{}\n\nAnswer:",
        context, query
    )
}

// ============ OpenAI chat provider ============

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Chat provider backed by the OpenAI chat completions API.
///
/// No retry: a failed completion surfaces as a request-level error and the
/// caller decides whether to ask again.
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl OpenAiChat {
    pub fn new(config: &OpenAiConfig, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.chat_model.clone(),
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiChat {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt.to_string(),
                },
            ],
            temperature,
        };

        let url = format!("{}/chat/completions", self.api_base);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body_text) {
                bail!("OpenAI API error {}: {}", status, api_error.error.message);
            }
            bail!("OpenAI API error {}: {}", status, body_text);
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("OpenAI response contained no completion text"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records prompts and counts invocations.
    struct RecordingChat {
        calls: AtomicUsize,
        last_user_prompt: Mutex<Option<String>>,
    }

    impl RecordingChat {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_user_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ChatProvider for RecordingChat {
        async fn complete(
            &self,
            system_prompt: &str,
            user_prompt: &str,
            temperature: f32,
        ) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_user_prompt.lock().unwrap() = Some(user_prompt.to_string());
            assert!(system_prompt.contains("Acme Tech Solutions"));
            assert!((temperature - 0.1).abs() < f32::EPSILON);
            Ok("generated answer".to_string())
        }
    }

    #[tokio::test]
    async fn test_empty_contexts_skips_provider() {
        let chat = RecordingChat::new();
        let answer = generate_answer(&chat, "what is acmeflow?", &[]).await.unwrap();
        assert_eq!(answer, NO_CONTEXT_FALLBACK);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_contexts_joined_with_separator() {
        let chat = RecordingChat::new();
        let contexts = vec!["first passage".to_string(), "second passage".to_string()];
        let answer = generate_answer(&chat, "What is AcmeFlow?", &contexts)
            .await
            .unwrap();
        assert_eq!(answer, "generated answer");
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);

        let prompt = chat.last_user_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("first passage\n\n---\n\nsecond passage"));
        assert!(prompt.contains("User Question:\nWhat is AcmeFlow?"));
        assert!(prompt.ends_with("Answer:"));
    }

    #[test]
    fn test_system_prompt_constraints() {
        assert!(SYSTEM_PROMPT.contains("Answer ONLY using the provided context"));
        assert!(SYSTEM_PROMPT.contains("all products"));
        assert!(SYSTEM_PROMPT.contains("Never use outside knowledge"));
    }

    #[test]
    fn test_build_user_prompt_shape() {
        let prompt = build_user_prompt("ctx", "query?");
        assert_eq!(prompt, "Context:\nctx\n\nUser Question:\nquery?\n\nAnswer:");
    }
}
