//! Skill extraction against a fixed vocabulary of recognized terms. When a
//! skills-section header is present the search window narrows to the 20 lines
//! that follow it; otherwise the whole document is scanned.

use super::contains_word;

/// The recognized skill vocabulary. Matching is case-insensitive and
/// word-bounded; results keep vocabulary order and are de-duplicated.
pub const SKILL_VOCABULARY: &[&str] = &[
    // Programming languages
    "python", "java", "javascript", "typescript", "c++", "c#", "go", "rust", "php", "ruby",
    "swift", "kotlin", "scala", "r", "matlab",
    // Web frameworks
    "react", "vue", "angular", "next.js", "nuxt.js", "svelte", "django", "flask", "fastapi",
    "spring", "express", "nest.js", "laravel", "rails", "asp.net",
    // Databases
    "sql", "mysql", "postgresql", "mongodb", "redis", "elasticsearch", "cassandra", "dynamodb",
    "oracle", "sqlite", "mariadb",
    // Cloud & DevOps
    "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "jenkins", "gitlab ci",
    "github actions", "ci/cd", "ansible", "chef", "puppet", "prometheus", "grafana",
    // Data & ML
    "machine learning", "deep learning", "data science", "data engineering", "pandas", "numpy",
    "scikit-learn", "tensorflow", "pytorch", "keras", "spark", "hadoop", "kafka", "airflow",
    "dbt", "snowflake", "tableau", "power bi", "looker",
    // Tools & practices
    "git", "linux", "bash", "shell scripting", "rest api", "graphql", "microservices", "agile",
    "scrum", "jira", "confluence",
    // Mobile
    "react native", "flutter", "ios", "android",
    // Testing
    "jest", "pytest", "selenium", "cypress", "junit",
];

const SECTION_HEADERS: &[&str] = &["skills", "kỹ năng", "technical skills", "technologies", "tech stack"];

/// Vocabulary terms present in the text. A skills-section header restricts
/// the search to its 20 following lines.
pub fn extract_skills(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();

    let search_text = lines
        .iter()
        .position(|line| {
            let lower = line.to_lowercase();
            SECTION_HEADERS.iter().any(|kw| lower.contains(kw))
        })
        .map(|i| lines[i..(i + 20).min(lines.len())].join("\n").to_lowercase())
        .unwrap_or_else(|| text.to_lowercase());

    let mut found = Vec::new();
    for skill in SKILL_VOCABULARY {
        if contains_word(&search_text, skill) && !found.contains(&skill.to_string()) {
            found.push(skill.to_string());
        }
    }
    found
}
