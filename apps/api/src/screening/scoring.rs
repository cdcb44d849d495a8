//! Score Aggregator — weighted combination of the four analysis sub-scores.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::screening::analysis::AnalysisResult;
use crate::screening::ScreeningError;

/// Weight coefficients for one role. Non-negative; no fixed sum required.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    pub skills: f64,
    pub experience: f64,
    pub projects: f64,
    pub clarity: f64,
}

impl WeightSet {
    fn is_valid(&self) -> bool {
        [self.skills, self.experience, self.projects, self.clarity]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
    }
}

/// Role name → weights. Loaded once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleWeights(BTreeMap<String, WeightSet>);

impl Default for RoleWeights {
    fn default() -> Self {
        let mut roles = BTreeMap::new();
        roles.insert(
            "Backend Developer".to_string(),
            WeightSet {
                skills: 0.4,
                experience: 0.3,
                projects: 0.2,
                clarity: 0.1,
            },
        );
        roles.insert(
            "GenAI Engineer".to_string(),
            WeightSet {
                skills: 0.35,
                experience: 0.2,
                projects: 0.35,
                clarity: 0.1,
            },
        );
        RoleWeights(roles)
    }
}

impl RoleWeights {
    pub fn new(roles: BTreeMap<String, WeightSet>) -> Result<Self> {
        let weights = RoleWeights(roles);
        weights.validate()?;
        Ok(weights)
    }

    /// Reads a JSON object of `{ "<role>": { "skills": .., ... } }`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read role weights from {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Invalid role weights in {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let roles: BTreeMap<String, WeightSet> = serde_json::from_str(text)?;
        Self::new(roles)
    }

    fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            bail!("role weight table must define at least one role");
        }
        for (role, weights) in &self.0 {
            if role.trim().is_empty() {
                bail!("role names must not be blank");
            }
            if !weights.is_valid() {
                bail!("weights for role '{role}' must be finite and non-negative");
            }
        }
        Ok(())
    }

    pub fn get(&self, role: &str) -> Result<&WeightSet, ScreeningError> {
        self.0
            .get(role)
            .ok_or_else(|| ScreeningError::UnknownRole(role.to_string()))
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains_key(role)
    }

    /// Roles in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &WeightSet)> {
        self.0.iter()
    }
}

/// `Σ score × weight`, rounded to 2 decimal places. No normalization.
pub fn compute_final_score(
    analysis: &AnalysisResult,
    role: &str,
    role_weights: &RoleWeights,
) -> Result<f64, ScreeningError> {
    let w = role_weights.get(role)?;
    let raw = f64::from(analysis.skills_score) * w.skills
        + f64::from(analysis.experience_score) * w.experience
        + f64::from(analysis.projects_score) * w.projects
        + f64::from(analysis.clarity_score) * w.clarity;
    Ok(round2(raw))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(skills: u8, experience: u8, projects: u8, clarity: u8) -> AnalysisResult {
        AnalysisResult {
            skills_found: vec![],
            missing_skills: vec![],
            skills_score: skills,
            experience_score: experience,
            projects_score: projects,
            clarity_score: clarity,
        }
    }

    #[test]
    fn test_weighted_example_is_77() {
        let weights = RoleWeights::default();
        let score = compute_final_score(&analysis(80, 70, 90, 60), "Backend Developer", &weights)
            .unwrap();
        assert_eq!(score, 77.0);
    }

    #[test]
    fn test_unknown_role_is_error() {
        let err = compute_final_score(&analysis(1, 1, 1, 1), "Chef", &RoleWeights::default())
            .unwrap_err();
        assert!(matches!(err, ScreeningError::UnknownRole(ref r) if r == "Chef"));
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let weights = RoleWeights::from_json_str(
            r#"{"X": {"skills": 0.333, "experience": 0.0, "projects": 0.0, "clarity": 0.0}}"#,
        )
        .unwrap();
        // 77 * 0.333 = 25.641
        assert_eq!(compute_final_score(&analysis(77, 0, 0, 0), "X", &weights).unwrap(), 25.64);
    }

    #[test]
    fn test_weights_need_not_sum_to_one() {
        let weights = RoleWeights::from_json_str(
            r#"{"Heavy": {"skills": 1.0, "experience": 1.0, "projects": 1.0, "clarity": 1.0}}"#,
        )
        .unwrap();
        assert_eq!(
            compute_final_score(&analysis(100, 100, 100, 100), "Heavy", &weights).unwrap(),
            400.0
        );
    }

    #[test]
    fn test_default_roles_present() {
        let weights = RoleWeights::default();
        assert!(weights.contains("Backend Developer"));
        assert!(weights.contains("GenAI Engineer"));
        let names: Vec<&String> = weights.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Backend Developer", "GenAI Engineer"]);
    }

    #[test]
    fn test_invalid_tables_rejected() {
        assert!(RoleWeights::from_json_str("{}").is_err());
        assert!(RoleWeights::from_json_str(
            r#"{"X": {"skills": -0.1, "experience": 0.0, "projects": 0.0, "clarity": 0.0}}"#
        )
        .is_err());
        assert!(RoleWeights::from_json_str(r#"{"X": {"skills": 0.1}}"#).is_err());
    }
}
