// Shared prompt fragments.
// Each service that needs model calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments only.

/// Instruction block that keeps the model from reacting to identity signals.
/// The sanitizer strips most of these fields already; this covers what slips through.
pub const UNBIASED_INSTRUCTION: &str = "Use ONLY the resume context below.\n\
    Ignore name, age, gender, college, and location.";

/// Rules appended to any prompt whose answer is parsed as JSON.
pub const JSON_ONLY_RULES: &str = "IMPORTANT RULES:\n\
    - Return ONLY valid JSON\n\
    - Do NOT include explanations\n\
    - Do NOT include markdown\n\
    - Do NOT include text before or after JSON";

/// Fills `{key}` placeholders in a single pass over the template.
///
/// Substituted values are never rescanned, so a job description that happens to
/// contain `{context}` cannot pull resume text into the wrong slot.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let hit = values.iter().find(|(key, _)| {
            tail.len() > key.len() + 1
                && tail[1..].starts_with(key)
                && tail[1 + key.len()..].starts_with('}')
        });
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
