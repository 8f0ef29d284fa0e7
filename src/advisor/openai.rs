use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{parse::extract_substitutes, AdvisorError, Substitute, SubstituteAdvisor, SubstituteRequest};
use crate::config::AiConfig;

const SYSTEM_PROMPT: &str = "You are a cooking assistant. Suggest practical ingredient substitutions.";

/// Chat-completions backed advisor.
#[derive(Debug, Clone)]
pub struct OpenAiAdvisor {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiAdvisor {
    pub fn new(cfg: &AiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn prompt(request: &SubstituteRequest<'_>) -> String {
        format!(
            "Recipe: {}\nMissing ingredients: {}\nIngredients on hand: {}\n\
             Reply with JSON only: [{{\"original\": \"missing ingredient\", \
             \"substitute\": \"replacement\", \"note\": \"how to use it\"}}]",
            request.recipe_title,
            request.missing.join(", "),
            request.held.join(", "),
        )
    }

    async fn complete(&self, prompt: String) -> Result<String, AdvisorError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT.to_string() },
                ChatMessage { role: "user", content: prompt },
            ],
            temperature: 0.3,
        };

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(AdvisorError::Status { status, body });
        }

        let parsed: ChatResponse = res.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AdvisorError::EmptyResponse)
    }

    async fn try_suggest(&self, request: SubstituteRequest<'_>) -> Result<Vec<Substitute>, AdvisorError> {
        let content = self.complete(Self::prompt(&request)).await?;
        extract_substitutes(&content).ok_or(AdvisorError::Unparsable)
    }
}

#[async_trait]
impl SubstituteAdvisor for OpenAiAdvisor {
    async fn suggest(&self, request: SubstituteRequest<'_>) -> Option<Vec<Substitute>> {
        match self.try_suggest(request).await {
            Ok(subs) => {
                debug!(count = subs.len(), recipe = request.recipe_title, "substitutes received");
                Some(subs)
            }
            Err(e) => {
                warn!(error = %e, recipe = request.recipe_title, "substitute advisor unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(base_url: &str) -> AiConfig {
        AiConfig {
            api_key: "sk-test".into(),
            model: "gpt-3.5-turbo".into(),
            base_url: base_url.into(),
            timeout_secs: 1,
        }
    }

    #[test]
    fn trailing_slash_is_dropped_from_base_url() {
        let advisor = OpenAiAdvisor::new(&cfg("https://api.example.com/v1/")).unwrap();
        assert_eq!(advisor.base_url, "https://api.example.com/v1");
    }

    #[test]
    fn prompt_lists_missing_and_held() {
        let missing = vec!["pork".to_string(), "leek".to_string()];
        let held = vec!["kimchi".to_string()];
        let p = OpenAiAdvisor::prompt(&SubstituteRequest {
            recipe_title: "kimchi stew",
            missing: &missing,
            held: &held,
        });
        assert!(p.contains("kimchi stew"));
        assert!(p.contains("pork, leek"));
        assert!(p.contains("kimchi"));
    }

    #[test]
    fn chat_response_tolerates_null_content() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
                .unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }

    #[tokio::test]
    async fn unreachable_service_yields_none() {
        // Port 9 (discard) on localhost is not an HTTP server.
        let advisor = OpenAiAdvisor::new(&cfg("http://127.0.0.1:9")).unwrap();
        let missing = vec!["pork".to_string()];
        let out = advisor
            .suggest(SubstituteRequest {
                recipe_title: "stew",
                missing: &missing,
                held: &[],
            })
            .await;
        assert!(out.is_none());
    }
}
