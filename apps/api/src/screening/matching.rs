//! Deterministic candidate/requirement scoring. Three independently capped
//! components — skills (60), title (20), experience (20) — are summed and
//! clamped to 100.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

const SKILLS_CAP: f64 = 60.0;
const TITLE_CAP: f64 = 20.0;
const EXPERIENCE_CAP: f64 = 20.0;
/// Reward per candidate skill when the JD lists no required skills, and its
/// cap. Experience without an explicit requirement is rewarded the same way,
/// deliberately below the full component cap.
const UNREQUESTED_SKILL_POINTS: f64 = 5.0;
const UNREQUESTED_SKILLS_CAP: f64 = 30.0;
const UNREQUESTED_EXPERIENCE_CAP: f64 = 10.0;

const ROLE_FAMILY: &[&str] = &["engineer", "developer", "analyst", "scientist", "manager"];

/// Outcome of matching one candidate against one requirement record.
/// `matched_skills` and `missing_skills` are disjoint by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Composite score in [0, 100], rounded to 2 decimals.
    pub score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

/// Computes the weighted compatibility between candidate and requirement.
pub fn match_candidate(
    candidate_skills: &[String],
    required_skills: &[String],
    candidate_position: Option<&str>,
    target_position: Option<&str>,
    candidate_years: u32,
    required_years: u32,
) -> MatchResult {
    let candidate_set: BTreeSet<String> = normalize_set(candidate_skills);
    let required_set: BTreeSet<String> = normalize_set(required_skills);

    let (skills_score, matched, missing) = skills_component(&candidate_set, &required_set);
    let title_score = title_component(candidate_position, target_position);
    let experience_score = experience_component(candidate_years, required_years);

    let total = (skills_score + title_score + experience_score).min(100.0);

    MatchResult {
        score: round2(total),
        matched_skills: matched.into_iter().collect(),
        missing_skills: missing.into_iter().collect(),
    }
}

fn normalize_set(skills: &[String]) -> BTreeSet<String> {
    skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Skills component, capped at 60. Exact matches count in full; for each
/// required skill without an exact match, a substring relationship in either
/// direction with any candidate skill counts as a partial match at half
/// weight (first satisfying skill wins, no double counting). With no
/// required skills at all, the candidate's own skill count earns up to 30.
fn skills_component(
    candidate_set: &BTreeSet<String>,
    required_set: &BTreeSet<String>,
) -> (f64, BTreeSet<String>, BTreeSet<String>) {
    if required_set.is_empty() {
        let score = (candidate_set.len() as f64 * UNREQUESTED_SKILL_POINTS).min(UNREQUESTED_SKILLS_CAP);
        return (score, BTreeSet::new(), BTreeSet::new());
    }

    let exact: BTreeSet<String> = required_set.intersection(candidate_set).cloned().collect();

    let partial: BTreeSet<String> = required_set
        .iter()
        .filter(|req| !exact.contains(*req))
        .filter(|req| {
            candidate_set
                .iter()
                .any(|cand| cand.contains(req.as_str()) || req.contains(cand.as_str()))
        })
        .cloned()
        .collect();

    let required_count = required_set.len() as f64;
    let exact_score = exact.len() as f64 / required_count * SKILLS_CAP;
    let partial_score = partial.len() as f64 / required_count * SKILLS_CAP * 0.5;
    let score = (exact_score + partial_score).min(SKILLS_CAP);

    let matched: BTreeSet<String> = exact.union(&partial).cloned().collect();
    let missing: BTreeSet<String> = required_set.difference(&matched).cloned().collect();
    (score, matched, missing)
}

/// Title component, capped at 20, evaluated only when both titles are
/// present: exact case-insensitive match 20, substring containment either
/// direction 15, two or more shared >3-char words 12, one shared word 8,
/// both titles in the same role family 5, otherwise 0.
fn title_component(candidate_position: Option<&str>, target_position: Option<&str>) -> f64 {
    let (candidate, target) = match (candidate_position, target_position) {
        (Some(c), Some(t)) if !c.trim().is_empty() && !t.trim().is_empty() => {
            (c.trim().to_lowercase(), t.trim().to_lowercase())
        }
        _ => return 0.0,
    };

    if candidate == target {
        return TITLE_CAP;
    }
    if candidate.contains(&target) || target.contains(&candidate) {
        return 15.0;
    }

    let candidate_words: BTreeSet<&str> =
        candidate.split_whitespace().filter(|w| w.len() > 3).collect();
    let target_words: BTreeSet<&str> = target.split_whitespace().filter(|w| w.len() > 3).collect();
    let common = candidate_words.intersection(&target_words).count();
    if common >= 2 {
        return 12.0;
    }
    if common == 1 {
        return 8.0;
    }

    let in_family = |title: &str| ROLE_FAMILY.iter().any(|word| title.contains(word));
    if in_family(&candidate) && in_family(&target) {
        return 5.0;
    }
    0.0
}

/// Experience component, capped at 20. Meeting the requirement earns the full
/// 20; partial experience earns proportionally. With no stated requirement,
/// experience still earns a modest 2 points per year up to 10.
fn experience_component(candidate_years: u32, required_years: u32) -> f64 {
    if required_years > 0 {
        if candidate_years >= required_years {
            return EXPERIENCE_CAP;
        }
        if candidate_years > 0 {
            return (candidate_years as f64 / required_years as f64 * EXPERIENCE_CAP)
                .min(EXPERIENCE_CAP);
        }
        return 0.0;
    }
    if candidate_years > 0 {
        return (candidate_years as f64 * 2.0).min(UNREQUESTED_EXPERIENCE_CAP);
    }
    0.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
