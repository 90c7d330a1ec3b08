//! The per-document analysis pipeline: two-path extraction for the résumé and
//! the job description, reconciliation, then scoring. Everything here is
//! synchronous and pure apart from the two adapter calls; a run either
//! completes with a full `Analysis` or fails with one clear reason.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::extract;
use crate::llm::LlmClient;
use crate::models::candidate::CandidateRecord;
use crate::models::requirement::RequirementRecord;
use crate::screening::matching::{match_candidate, MatchResult};
use crate::screening::reconcile::{
    clean_candidate, merge_candidates, resolve_requirement, RequirementSource,
};

/// The full outcome of one pipeline invocation.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub candidate: CandidateRecord,
    pub requirement: RequirementRecord,
    pub requirement_source: RequirementSource,
    pub match_result: MatchResult,
}

/// Analyzes one résumé against one job description.
///
/// The résumé path REQUIRES a successful AI extraction — any adapter failure
/// is fatal for the request. The JD path never is: when AI extraction fails
/// or its position check does not pass, the entire requirement record is
/// recomputed from pattern extraction. The asymmetry is deliberate and must
/// be kept.
pub async fn analyze(cv_text: &str, jd_text: &str, llm: &LlmClient) -> Result<Analysis, AppError> {
    let ai_fields = llm.extract_candidate(cv_text).await?;
    let ai_candidate = clean_candidate(ai_fields);
    let pattern_candidate = clean_candidate(extract::extract_candidate_fields(cv_text));
    let candidate = merge_candidates(ai_candidate, pattern_candidate);

    let ai_requirement = match llm.extract_requirement(jd_text).await {
        Ok(fields) => Some(fields),
        Err(e) => {
            warn!("JD AI extraction unavailable, using pattern extraction: {e}");
            None
        }
    };
    let (requirement, requirement_source) = resolve_requirement(ai_requirement, jd_text);

    let match_result = match_candidate(
        &candidate.skills,
        &requirement.skills,
        candidate.position.as_deref(),
        requirement.position.as_deref(),
        candidate.years_experience,
        requirement.years,
    );

    info!(
        score = match_result.score,
        requirement_source = ?requirement_source,
        matched = match_result.matched_skills.len(),
        missing = match_result.missing_skills.len(),
        "analysis complete"
    );

    Ok(Analysis {
        candidate,
        requirement,
        requirement_source,
        match_result,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::llm::{LlmError, ProviderKind, TextGenerator};

    /// Returns one canned body for candidate calls and another for JD calls,
    /// keyed on the prompt contents.
    struct SplitGenerator {
        candidate_body: String,
        requirement_body: String,
    }

    #[async_trait]
    impl TextGenerator for SplitGenerator {
        async fn generate(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            if prompt.contains("RÉSUMÉ:") {
                Ok(self.candidate_body.clone())
            } else {
                Ok(self.requirement_body.clone())
            }
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    /// Fails JD calls only; candidate calls succeed.
    struct JdFailingGenerator {
        candidate_body: String,
    }

    #[async_trait]
    impl TextGenerator for JdFailingGenerator {
        async fn generate(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            if prompt.contains("RÉSUMÉ:") {
                Ok(self.candidate_body.clone())
            } else {
                Err(LlmError::EmptyContent)
            }
        }
    }

    const CV_TEXT: &str = "Nguyen Van An\nData Engineer\nan.nguyen@example.com\n0987654321\nSkills: Python, SQL, AWS\n5 years experience\n";
    const JD_TEXT: &str = "TUYỂN DATA ENGINEER\n3 năm kinh nghiệm\nYêu cầu: Python, SQL, Docker, AWS\n";

    fn candidate_body() -> String {
        r#"{"name": "Nguyen Van An", "email": "an.nguyen@example.com", "phone": "0987654321",
            "position": "Data Engineer", "years_experience": 5,
            "skills": ["python", "sql", "aws"]}"#
            .to_string()
    }

    #[tokio::test]
    async fn test_full_run_with_ai_jd_result() {
        let llm = LlmClient::with_generator(
            Arc::new(SplitGenerator {
                candidate_body: candidate_body(),
                requirement_body:
                    r#"{"position": "Data Engineer", "years": 3, "skills": ["python", "sql", "docker", "aws"]}"#
                        .to_string(),
            }),
            ProviderKind::Gemini,
        );
        let analysis = analyze(CV_TEXT, JD_TEXT, &llm).await.unwrap();
        assert_eq!(analysis.requirement_source, RequirementSource::Ai);
        // 3/4 exact (45) + exact title (20) + experience met (20) = 85
        assert_eq!(analysis.match_result.score, 85.0);
        assert_eq!(
            analysis.match_result.missing_skills,
            vec!["docker".to_string()]
        );
    }

    #[tokio::test]
    async fn test_candidate_ai_failure_is_fatal() {
        let llm = LlmClient::with_generator(Arc::new(FailingGenerator), ProviderKind::OpenAi);
        let result = analyze(CV_TEXT, JD_TEXT, &llm).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_jd_ai_failure_falls_back_to_patterns() {
        let llm = LlmClient::with_generator(
            Arc::new(JdFailingGenerator {
                candidate_body: candidate_body(),
            }),
            ProviderKind::Anthropic,
        );
        let analysis = analyze(CV_TEXT, JD_TEXT, &llm).await.unwrap();
        assert_eq!(analysis.requirement_source, RequirementSource::Pattern);
        assert_eq!(analysis.requirement.position.as_deref(), Some("Data Engineer"));
        assert_eq!(analysis.requirement.years, 3);
    }

    #[tokio::test]
    async fn test_jd_null_position_discards_ai_skills_wholesale() {
        let llm = LlmClient::with_generator(
            Arc::new(SplitGenerator {
                candidate_body: candidate_body(),
                requirement_body: r#"{"position": "null", "skills": ["invented"]}"#.to_string(),
            }),
            ProviderKind::Gemini,
        );
        let analysis = analyze(CV_TEXT, JD_TEXT, &llm).await.unwrap();
        assert_eq!(analysis.requirement_source, RequirementSource::Pattern);
        assert!(!analysis.requirement.skills.contains(&"invented".to_string()));
        assert!(analysis.requirement.skills.contains(&"python".to_string()));
    }

    #[tokio::test]
    async fn test_pattern_fields_fill_ai_gaps() {
        // AI result has no phone; the pattern extractor finds it in the text.
        let llm = LlmClient::with_generator(
            Arc::new(SplitGenerator {
                candidate_body: r#"{"name": "Nguyen Van An", "skills": ["python"]}"#.to_string(),
                requirement_body: r#"{"position": "Data Engineer", "skills": []}"#.to_string(),
            }),
            ProviderKind::Gemini,
        );
        let analysis = analyze(CV_TEXT, JD_TEXT, &llm).await.unwrap();
        assert_eq!(analysis.candidate.phone.as_deref(), Some("0987654321"));
        assert_eq!(analysis.candidate.email.as_deref(), Some("an.nguyen@example.com"));
        // AI skill list comes first, pattern-only skills appended
        assert_eq!(analysis.candidate.skills[0], "python");
        assert!(analysis.candidate.skills.contains(&"sql".to_string()));
    }
}
