// Prompt templates for the screening pipeline.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Analysis prompt template.
/// Replace: {unbiased_instruction}, {context}, {job_description}, {json_rules}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an unbiased technical recruiter.

{unbiased_instruction}

<context>
{context}
</context>

Job Description:
{job_description}

{json_rules}

Return EXACTLY this structure:
{
  "skills_found": [],
  "missing_skills": [],
  "skills_score": 0,
  "experience_score": 0,
  "projects_score": 0,
  "clarity_score": 0
}
Every score is an integer from 0 to 100."#;

/// Recommendation prompt template.
/// Replace: {context}, {job_description}
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"You are a senior career mentor.

<context>
{context}
</context>

Job Description:
{job_description}

Provide:
1. Skill recommendations
2. Project recommendations
3. Resume wording improvements
4. 2-week learning plan"#;
