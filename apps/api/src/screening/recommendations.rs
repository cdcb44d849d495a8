//! Recommendation Requester — free-text mentoring advice for one resume.
//!
//! The response is opaque prose. Nothing downstream parses it for structure.

use crate::llm_client::prompts::fill_template;
use crate::llm_client::ModelService;
use crate::screening::analysis::format_context;
use crate::screening::prompts::RECOMMENDATION_PROMPT_TEMPLATE;
use crate::screening::retriever::ScoredChunk;
use crate::screening::ScreeningError;

pub fn build_recommendation_prompt(context: &str, job_description: &str) -> String {
    fill_template(
        RECOMMENDATION_PROMPT_TEMPLATE,
        &[("context", context), ("job_description", job_description)],
    )
}

pub async fn request_recommendations(
    model: &dyn ModelService,
    context: &[ScoredChunk],
    job_description: &str,
) -> Result<String, ScreeningError> {
    let prompt = build_recommendation_prompt(&format_context(context), job_description);
    let raw = model.generate(&prompt).await.map_err(ScreeningError::Model)?;
    Ok(raw.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct EchoModel {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ModelService for EchoModel {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.seen.lock().unwrap().push(prompt.to_string());
            Ok("\n  * Learn Kafka\n* Ship a side project  \n".to_string())
        }
    }

    #[test]
    fn test_prompt_lists_four_categories() {
        let prompt = build_recommendation_prompt("ctx", "jd text");
        assert!(prompt.starts_with("You are a senior career mentor."));
        for item in [
            "1. Skill recommendations",
            "2. Project recommendations",
            "3. Resume wording improvements",
            "4. 2-week learning plan",
        ] {
            assert!(prompt.contains(item), "missing {item}");
        }
        assert!(prompt.contains("<context>\nctx\n</context>"));
        assert!(prompt.contains("jd text"));
    }

    #[tokio::test]
    async fn test_response_is_trimmed_but_otherwise_untouched() {
        let model = EchoModel {
            seen: Mutex::new(vec![]),
        };
        let text = request_recommendations(&model, &[], "Rust role").await.unwrap();
        assert_eq!(text, "* Learn Kafka\n* Ship a side project");
        assert_eq!(model.seen.lock().unwrap().len(), 1);
    }
}
