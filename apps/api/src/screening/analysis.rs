//! Analysis Requester — asks the model to score one resume against the job
//! description and validates the JSON it returns.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::llm_client::prompts::{fill_template, JSON_ONLY_RULES, UNBIASED_INSTRUCTION};
use crate::llm_client::{strip_json_fences, ModelService};
use crate::screening::prompts::ANALYSIS_PROMPT_TEMPLATE;
use crate::screening::retriever::ScoredChunk;
use crate::screening::ScreeningError;

/// Validated model assessment of one resume.
///
/// Skill lists have set semantics: duplicates are dropped, first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub skills_found: Vec<String>,
    pub missing_skills: Vec<String>,
    pub skills_score: u8,
    pub experience_score: u8,
    pub projects_score: u8,
    pub clarity_score: u8,
}

/// Renders retrieved chunks as the `<context>` body shared by both prompts.
pub fn format_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|c| format!("[page {}] {}", c.chunk.page, c.chunk.text.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_analysis_prompt(context: &str, job_description: &str) -> String {
    fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("unbiased_instruction", UNBIASED_INSTRUCTION),
            ("json_rules", JSON_ONLY_RULES),
            ("context", context),
            ("job_description", job_description),
        ],
    )
}

/// One model call, no retries. The raw response travels with any parse error.
pub async fn request_analysis(
    model: &dyn ModelService,
    context: &[ScoredChunk],
    job_description: &str,
) -> Result<AnalysisResult, ScreeningError> {
    let prompt = build_analysis_prompt(&format_context(context), job_description);
    let raw = model.generate(&prompt).await.map_err(ScreeningError::Model)?;
    debug!("Analysis response: {} chars", raw.len());
    parse_analysis_response(&raw)
}

/// Parses a model response into an `AnalysisResult`.
///
/// The whole response (minus code fences) is tried as JSON first. If that fails,
/// the first balanced top-level `{...}` object in the text is used instead.
pub fn parse_analysis_response(raw: &str) -> Result<AnalysisResult, ScreeningError> {
    let malformed = |reason: String| ScreeningError::MalformedResponse {
        reason,
        raw: raw.to_string(),
    };

    let value = match serde_json::from_str::<Value>(strip_json_fences(raw)) {
        Ok(value) => value,
        Err(_) => {
            let object = extract_first_object(raw)
                .ok_or_else(|| malformed("no JSON object found in response".to_string()))?;
            warn!("Model response was not pure JSON; using embedded object");
            serde_json::from_str::<Value>(object)
                .map_err(|e| malformed(format!("embedded JSON object is invalid: {e}")))?
        }
    };

    let object = value
        .as_object()
        .ok_or_else(|| malformed("response JSON is not an object".to_string()))?;

    validate_analysis(object).map_err(malformed)
}

/// Returns the first balanced `{...}` span, skipping braces inside strings.
fn extract_first_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

fn validate_analysis(object: &Map<String, Value>) -> Result<AnalysisResult, String> {
    Ok(AnalysisResult {
        skills_found: string_set(object, "skills_found")?,
        missing_skills: string_set(object, "missing_skills")?,
        skills_score: score(object, "skills_score")?,
        experience_score: score(object, "experience_score")?,
        projects_score: score(object, "projects_score")?,
        clarity_score: score(object, "clarity_score")?,
    })
}

fn field<'a>(object: &'a Map<String, Value>, name: &str) -> Result<&'a Value, String> {
    object
        .get(name)
        .ok_or_else(|| format!("missing required field `{name}`"))
}

fn string_set(object: &Map<String, Value>, name: &str) -> Result<Vec<String>, String> {
    let items = field(object, name)?
        .as_array()
        .ok_or_else(|| format!("field `{name}` must be an array of strings"))?;

    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let s = item
            .as_str()
            .ok_or_else(|| format!("field `{name}` must contain only strings"))?;
        if !out.iter().any(|existing| existing == s) {
            out.push(s.to_string());
        }
    }
    Ok(out)
}

fn score(object: &Map<String, Value>, name: &str) -> Result<u8, String> {
    let value = field(object, name)?;
    // integral floats such as 80.0 are accepted
    let n = value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        })
        .ok_or_else(|| format!("field `{name}` must be an integer from 0 to 100"))?;

    if n > 100 {
        return Err(format!("field `{name}` is {n}, expected 0 to 100"));
    }
    Ok(n as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::chunker::Chunk;

    fn expected() -> AnalysisResult {
        AnalysisResult {
            skills_found: vec!["Python".to_string()],
            missing_skills: vec![],
            skills_score: 80,
            experience_score: 70,
            projects_score: 90,
            clarity_score: 60,
        }
    }

    #[test]
    fn test_parses_object_surrounded_by_prose() {
        let raw = "Here is the result: {\"skills_found\": [\"Python\"], \"missing_skills\": [], \"skills_score\": 80, \"experience_score\": 70, \"projects_score\": 90, \"clarity_score\": 60} Thanks!";
        assert_eq!(parse_analysis_response(raw).unwrap(), expected());
    }

    #[test]
    fn test_parses_pure_json_and_fenced_json() {
        let json = r#"{"skills_found":["Python"],"missing_skills":[],"skills_score":80,"experience_score":70,"projects_score":90,"clarity_score":60}"#;
        assert_eq!(parse_analysis_response(json).unwrap(), expected());
        let fenced = format!("```json\n{json}\n```");
        assert_eq!(parse_analysis_response(&fenced).unwrap(), expected());
    }

    #[test]
    fn test_no_object_is_malformed() {
        let err = parse_analysis_response("I cannot evaluate this resume.").unwrap_err();
        match err {
            ScreeningError::MalformedResponse { reason, raw } => {
                assert!(reason.contains("no JSON object"));
                assert_eq!(raw, "I cannot evaluate this resume.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_field_is_named() {
        let raw = r#"{"skills_found":[],"missing_skills":[],"skills_score":1,"experience_score":2,"projects_score":3}"#;
        let err = parse_analysis_response(raw).unwrap_err();
        assert!(err.to_string().contains("clarity_score"), "{err}");
        assert_eq!(err.raw_response(), Some(raw));
    }

    #[test]
    fn test_out_of_range_and_wrong_types_rejected() {
        let over = r#"{"skills_found":[],"missing_skills":[],"skills_score":101,"experience_score":2,"projects_score":3,"clarity_score":4}"#;
        assert!(parse_analysis_response(over).unwrap_err().to_string().contains("skills_score"));

        let negative = r#"{"skills_found":[],"missing_skills":[],"skills_score":-1,"experience_score":2,"projects_score":3,"clarity_score":4}"#;
        assert!(parse_analysis_response(negative).is_err());

        let text_score = r#"{"skills_found":[],"missing_skills":[],"skills_score":"high","experience_score":2,"projects_score":3,"clarity_score":4}"#;
        assert!(parse_analysis_response(text_score).is_err());

        let not_list = r#"{"skills_found":"Rust","missing_skills":[],"skills_score":1,"experience_score":2,"projects_score":3,"clarity_score":4}"#;
        assert!(parse_analysis_response(not_list).unwrap_err().to_string().contains("skills_found"));
    }

    #[test]
    fn test_integral_float_scores_accepted_and_duplicates_dropped() {
        let raw = r#"{"skills_found":["Rust","Go","Rust"],"missing_skills":["K8s"],"skills_score":80.0,"experience_score":70,"projects_score":90,"clarity_score":60,"notes":"extra keys ignored"}"#;
        let parsed = parse_analysis_response(raw).unwrap();
        assert_eq!(parsed.skills_found, vec!["Rust", "Go"]);
        assert_eq!(parsed.skills_score, 80);
        assert_eq!(parsed.missing_skills, vec!["K8s"]);
    }

    #[test]
    fn test_non_object_json_is_malformed() {
        assert!(matches!(
            parse_analysis_response("[1, 2, 3]"),
            Err(ScreeningError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_extract_first_object_is_balanced() {
        let text = r#"pre {"a": {"b": "}"}, "c": "\"{"} mid {"d": 1} post"#;
        assert_eq!(
            extract_first_object(text),
            Some(r#"{"a": {"b": "}"}, "c": "\"{"}"#)
        );
        assert_eq!(extract_first_object("no braces"), None);
        assert_eq!(extract_first_object("{ unterminated"), None);
    }

    #[test]
    fn test_prompt_contains_context_and_jd() {
        let chunks = vec![ScoredChunk {
            chunk: Chunk {
                index: 0,
                page: 2,
                offset: 0,
                text: "Built Kafka pipelines".to_string(),
            },
            similarity: 0.9,
        }];
        let prompt = build_analysis_prompt(&format_context(&chunks), "Need a Kafka engineer");
        assert!(prompt.contains("<context>\n[page 2] Built Kafka pipelines\n</context>"));
        assert!(prompt.contains("Job Description:\nNeed a Kafka engineer"));
        assert!(prompt.contains("\"clarity_score\": 0"));
        assert!(prompt.contains("Return ONLY valid JSON"));
        assert!(!prompt.contains("{context}"));
    }
}
