//! Keyword vocabularies used by resume extraction.
//!
//! Built once at startup and shared read-only through `AppState`. The built-in lists
//! can be replaced wholesale by a JSON file (`VOCABULARY_PATH`):
//!
//! ```json
//! { "skills": ["Rust", "Go"], "education": ["Bachelor", "Master"] }
//! ```
//!
//! A list missing from the file keeps its built-in default.

use std::collections::HashSet;

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_SKILLS: &[&str] = &[
    "Java",
    "Python",
    "JavaScript",
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "Spring",
    "Django",
    "SQL",
    "MySQL",
    "PostgreSQL",
    "MongoDB",
    "Redis",
    "HTML",
    "CSS",
    "Bootstrap",
    "Tailwind",
    "Git",
    "Docker",
    "Kubernetes",
    "AWS",
    "Azure",
    "GCP",
    "Jenkins",
    "CI/CD",
    "REST",
    "GraphQL",
    "Microservices",
    "Agile",
    "Scrum",
    "Machine Learning",
    "AI",
    "Data Science",
    "Hadoop",
    "Spark",
];

const DEFAULT_EDUCATION: &[&str] = &[
    "Bachelor",
    "Master",
    "PhD",
    "Degree",
    "University",
    "College",
    "Institute",
    "B.Tech",
    "B.E.",
    "M.Tech",
    "M.E.",
    "MBA",
    "MCA",
    "BCA",
    "B.Sc",
    "M.Sc",
];

/// A vocabulary entry: the label reported to callers and its lowercased search needle.
#[derive(Debug, Clone)]
struct Term {
    label: String,
    needle: String,
}

#[derive(Debug, Clone)]
pub struct Vocabulary {
    skills: Vec<Term>,
    education: Vec<Term>,
}

#[derive(Debug, Deserialize)]
struct VocabularyFile {
    skills: Option<Vec<String>>,
    education: Option<Vec<String>>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS.iter().copied(), DEFAULT_EDUCATION.iter().copied())
    }
}

impl Vocabulary {
    /// Builds a vocabulary, dropping blank and case-insensitive duplicate terms.
    /// Order is preserved; it is the order extraction results are reported in.
    pub fn new<S, E>(skills: S, education: E) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            skills: build_terms(skills),
            education: build_terms(education),
        }
    }

    /// Loads the vocabulary from `path`, or the built-in lists when no path is configured.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary file '{path}'"))?;
        Self::from_json(&raw).with_context(|| format!("Invalid vocabulary file '{path}'"))
    }

    fn from_json(raw: &str) -> Result<Self> {
        let file: VocabularyFile = serde_json::from_str(raw)?;
        let defaults = Self::default();
        Ok(Self {
            skills: file.skills.map(build_terms).unwrap_or(defaults.skills),
            education: file.education.map(build_terms).unwrap_or(defaults.education),
        })
    }

    /// Skill labels whose needle occurs in `text_lower`, in vocabulary order.
    pub fn skills_in<'a>(&'a self, text_lower: &str) -> Vec<&'a str> {
        contained(&self.skills, text_lower)
    }

    /// Degree and institution labels occurring in `text_lower`, in vocabulary order.
    pub fn education_in<'a>(&'a self, text_lower: &str) -> Vec<&'a str> {
        contained(&self.education, text_lower)
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    pub fn education_count(&self) -> usize {
        self.education.len()
    }
}

fn build_terms<I>(labels: I) -> Vec<Term>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut seen = HashSet::new();
    labels
        .into_iter()
        .map(Into::into)
        .filter_map(|label| {
            let label = label.trim().to_string();
            let needle = label.to_lowercase();
            if needle.is_empty() || !seen.insert(needle.clone()) {
                return None;
            }
            Some(Term { label, needle })
        })
        .collect()
}

fn contained<'a>(terms: &'a [Term], text_lower: &str) -> Vec<&'a str> {
    terms
        .iter()
        .filter(|t| text_lower.contains(&t.needle))
        .map(|t| t.label.as_str())
        .collect()
}
