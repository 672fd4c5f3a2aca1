//! Interpretation of computed charts.
//!
//! `AppState` carries an `Arc<dyn Interpreter>`. Production uses
//! `LlmInterpreter`; tests swap in a canned implementation.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::analysis::models::{Charts, Interpretation};
use crate::analysis::prompts::{INTERPRET_PROMPT_TEMPLATE, INTERPRET_ROLE, NO_QUESTION};
use crate::errors::AppError;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmClient;

#[async_trait]
pub trait Interpreter: Send + Sync {
    async fn interpret(
        &self,
        charts: &Charts,
        question: Option<&str>,
    ) -> Result<Interpretation, AppError>;
}

/// Asks the chat model for all three readings in a single JSON call.
pub struct LlmInterpreter {
    llm: LlmClient,
}

impl LlmInterpreter {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Interpreter for LlmInterpreter {
    async fn interpret(
        &self,
        charts: &Charts,
        question: Option<&str>,
    ) -> Result<Interpretation, AppError> {
        let prompt = build_prompt(charts, question)?;
        let system = format!("{INTERPRET_ROLE}\n{JSON_ONLY_SYSTEM}");

        let interpretation: Interpretation = self.llm.call_json(&prompt, &system).await?;

        let blank = interpretation.blank_fields();
        if !blank.is_empty() {
            warn!("LLM left fields blank: {}", blank.join(", "));
            return Err(AppError::Llm(format!(
                "model returned empty text for: {}",
                blank.join(", ")
            )));
        }

        info!(
            "Interpretation received from {} ({} / {} / {} chars)",
            self.llm.model(),
            interpretation.bazi.chars().count(),
            interpretation.ziwei.chars().count(),
            interpretation.zhouyi.chars().count(),
        );

        Ok(interpretation)
    }
}

fn build_prompt(charts: &Charts, question: Option<&str>) -> Result<String, AppError> {
    let bazi_json = serde_json::to_string_pretty(&charts.bazi)
        .map_err(|e| AppError::Internal(e.into()))?;
    let ziwei_json = serde_json::to_string_pretty(&charts.ziwei)
        .map_err(|e| AppError::Internal(e.into()))?;
    let zhouyi_json = serde_json::to_string_pretty(&charts.zhouyi)
        .map_err(|e| AppError::Internal(e.into()))?;

    let question = question
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or(NO_QUESTION);

    Ok(INTERPRET_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{bazi_json}", &bazi_json)
        .replace("{ziwei_json}", &ziwei_json)
        .replace("{zhouyi_json}", &zhouyi_json)
        .replace("{question}", question))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::divination::bazi::analyze_bazi;
    use crate::divination::zhouyi::cast_by_time;
    use crate::divination::ziwei::generate_ziwei_chart;
    use crate::divination::{BirthMoment, Gender};
    use crate::llm_client::{LlmConfig, DEFAULT_MODEL};

    fn charts() -> Charts {
        let birth = BirthMoment::new(1990, 5, 17, 14, Gender::Male).unwrap();
        let cast_at = NaiveDate::from_ymd_opt(2024, 2, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Charts {
            bazi: analyze_bazi(&birth),
            ziwei: generate_ziwei_chart(&birth).unwrap(),
            zhouyi: cast_by_time(cast_at).unwrap(),
        }
    }

    fn interpreter_for(server: &MockServer) -> LlmInterpreter {
        let mut config = LlmConfig::new(
            "test-key".to_string(),
            server.base_url(),
            DEFAULT_MODEL.to_string(),
        );
        config.retry_base_delay = Duration::from_millis(1);
        LlmInterpreter::new(LlmClient::new(config).unwrap())
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
    }

    #[test]
    fn test_prompt_embeds_all_charts() {
        let charts = charts();
        let prompt = build_prompt(&charts, Some("  事业  ")).unwrap();

        assert!(prompt.contains(&charts.bazi.pattern));
        assert!(prompt.contains("土五局"));
        assert!(prompt.contains("山水蒙"));
        assert!(prompt.contains("求测事项：事业"));
        assert!(!prompt.contains("{bazi_json}"));
    }

    #[test]
    fn test_prompt_without_question_uses_placeholder() {
        let prompt = build_prompt(&charts(), Some("   ")).unwrap();
        assert!(prompt.contains(NO_QUESTION));
    }

    #[tokio::test]
    async fn test_interpret_parses_single_json_call() {
        let server = MockServer::start_async().await;
        let body = json!({ "bazi": "八字解读", "ziwei": "紫微解读", "zhouyi": "卦象解读" });
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions").body_contains("山水蒙");
                then.status(200)
                    .json_body(completion(&format!("```json\n{body}\n```")));
            })
            .await;

        let result = interpreter_for(&server)
            .interpret(&charts(), None)
            .await
            .unwrap();

        assert_eq!(result.bazi, "八字解读");
        assert_eq!(result.zhouyi, "卦象解读");
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_blank_reading_is_an_llm_error() {
        let server = MockServer::start_async().await;
        let body = json!({ "bazi": "八字解读", "ziwei": "", "zhouyi": "卦象解读" });
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).json_body(completion(&body.to_string()));
            })
            .await;

        let err = interpreter_for(&server)
            .interpret(&charts(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(msg) if msg.contains("ziwei")));
    }

    #[tokio::test]
    async fn test_malformed_reply_is_an_llm_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).json_body(completion("这不是 JSON"));
            })
            .await;

        let err = interpreter_for(&server)
            .interpret(&charts(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }
}
