//! Result Ranker — orders records by final score, highest first.

use crate::models::resume::ResumeRecord;

/// Stable: records with equal scores keep their input order.
pub fn rank_records(mut records: Vec<ResumeRecord>) -> Vec<ResumeRecord> {
    records.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::analysis::AnalysisResult;

    fn record(name: &str, score: f64) -> ResumeRecord {
        ResumeRecord {
            resume: name.to_string(),
            final_score: score,
            analysis: AnalysisResult {
                skills_found: vec![],
                missing_skills: vec![],
                skills_score: 0,
                experience_score: 0,
                projects_score: 0,
                clarity_score: 0,
            },
            recommendations: String::new(),
        }
    }

    #[test]
    fn test_descending_with_stable_ties() {
        let ranked = rank_records(vec![
            record("a.pdf", 77.0),
            record("b.pdf", 91.5),
            record("c.pdf", 91.5),
            record("d.pdf", 40.0),
        ]);
        let order: Vec<(&str, f64)> = ranked
            .iter()
            .map(|r| (r.resume.as_str(), r.final_score))
            .collect();
        assert_eq!(
            order,
            vec![("b.pdf", 91.5), ("c.pdf", 91.5), ("a.pdf", 77.0), ("d.pdf", 40.0)]
        );
    }

    #[test]
    fn test_empty_and_single() {
        assert!(rank_records(vec![]).is_empty());
        assert_eq!(rank_records(vec![record("x.pdf", 1.0)]).len(), 1);
    }
}
