//! Resume Extractor: derives skills, experience, and education strings from raw resume text.
//!
//! Pure keyword and pattern matching. Every function takes text and returns a new value;
//! nothing here touches storage. `extract_file` is the only entry point that reads a
//! document, and it checks the format before any bytes are fetched.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ExtractionError;
use crate::extraction::reader::{DocumentFormat, DocumentReader};
use crate::extraction::vocabulary::Vocabulary;

const EXPERIENCE_SECTION_LIMIT: usize = 100;
const EDUCATION_SECTION_LIMIT: usize = 200;

/// `5 years`, `3-5 yrs`, `5+ years of experience`, `3 to 5 years exp`.
static EXPERIENCE_YEARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\d+)\s*(?:[-+]|to)?\s*(\d*)\s*(?:years?|yrs?)\s*(?:of\s*)?(?:experience|exp)?",
    )
    .unwrap()
});

static WORK_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)work\s*experience|professional\s*experience|employment\s*history").unwrap()
});

static WORK_SECTION_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)education|skills|projects").unwrap());

static EDUCATION_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)education|qualification|academic").unwrap());

static EDUCATION_SECTION_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)experience|skills|projects").unwrap());

/// Derived record produced once per resume. Re-extraction replaces it entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub raw_text: String,
    /// Comma-joined vocabulary labels, in vocabulary order.
    pub skills: String,
    pub experience: String,
    pub education: String,
}

#[derive(Debug, Clone)]
pub struct ResumeExtractor {
    vocabulary: Arc<Vocabulary>,
}

impl ResumeExtractor {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    /// Runs all three extractors over `raw_text`.
    pub fn extract(&self, raw_text: &str) -> ExtractedDocument {
        ExtractedDocument {
            raw_text: raw_text.to_string(),
            skills: self.extract_skills(raw_text),
            experience: extract_experience(raw_text),
            education: self.extract_education(raw_text),
        }
    }

    /// Reads the stored document behind `storage_key` and extracts it.
    ///
    /// Unsupported extensions fail before the reader is consulted.
    pub async fn extract_file(
        &self,
        reader: &dyn DocumentReader,
        storage_key: &str,
    ) -> Result<ExtractedDocument, ExtractionError> {
        let format = DocumentFormat::from_path(storage_key)?;
        let text = reader.read_text(storage_key, format).await?;
        debug!(
            storage_key,
            format = format.extension(),
            chars = text.len(),
            "Read resume text"
        );
        Ok(self.extract(&text))
    }

    pub fn extract_skills(&self, text: &str) -> String {
        self.vocabulary.skills_in(&text.to_lowercase()).join(", ")
    }

    /// Labeled education section first; otherwise degree/institution keywords.
    pub fn extract_education(&self, text: &str) -> String {
        if let Some(section) = labeled_section(
            text,
            &EDUCATION_HEADING,
            &EDUCATION_SECTION_END,
            EDUCATION_SECTION_LIMIT,
        ) {
            return section;
        }
        self.vocabulary.education_in(&text.to_lowercase()).join(", ")
    }
}

/// Years pattern first (`"5 years"` or `"3-5 years"`), then the first 100 characters of a
/// work-experience section, else empty.
pub fn extract_experience(text: &str) -> String {
    if let Some(caps) = EXPERIENCE_YEARS.captures(text) {
        let start = caps.get(1).map_or("", |m| m.as_str());
        let end = caps.get(2).map_or("", |m| m.as_str());
        return if end.is_empty() {
            format!("{start} years")
        } else {
            format!("{start}-{end} years")
        };
    }

    labeled_section(
        text,
        &WORK_HEADING,
        &WORK_SECTION_END,
        EXPERIENCE_SECTION_LIMIT,
    )
    .unwrap_or_default()
}

/// Text following the first `heading` match up to the next `end` match (or end of text),
/// trimmed and capped at `limit` characters with a trailing ellipsis when cut.
fn labeled_section(text: &str, heading: &Regex, end: &Regex, limit: usize) -> Option<String> {
    let body_start = heading.find(text)?.end();
    let rest = &text[body_start..];
    let body = match end.find(rest) {
        Some(m) => &rest[..m.start()],
        None => rest,
    };
    Some(truncate_chars(body.trim(), limit))
}

fn truncate_chars(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn extractor() -> ResumeExtractor {
        ResumeExtractor::new(Arc::new(Vocabulary::default()))
    }

    // ── skills ─────────────────────────────────────────────────────────────

    #[test]
    fn test_skills_and_years_from_one_liner() {
        let doc = extractor().extract("5 years of experience with Java and React, Remote friendly");
        assert_eq!(doc.skills, "Java, React");
        assert_eq!(doc.experience, "5 years");
    }

    #[test]
    fn test_skills_follow_vocabulary_not_document_order() {
        let skills = extractor().extract_skills("Docker, then Python, then GraphQL");
        assert_eq!(skills, "Python, Docker, GraphQL");
    }

    #[test]
    fn test_skills_are_case_insensitive_substrings() {
        let skills = extractor().extract_skills("POSTGRESQL and node.js");
        // "postgresql" also contains "sql"
        assert_eq!(skills, "Node.js, SQL, PostgreSQL");
    }

    #[test]
    fn test_no_skills_yields_empty_string() {
        assert_eq!(extractor().extract_skills("Enjoys hiking and chess"), "");
    }

    #[test]
    fn test_injected_vocabulary_is_used() {
        let vocab = Vocabulary::new(vec!["Rust"], Vec::<String>::new());
        let extractor = ResumeExtractor::new(Arc::new(vocab));
        assert_eq!(extractor.extract_skills("Rust and Java"), "Rust");
    }

    // ── experience ─────────────────────────────────────────────────────────

    #[test]
    fn test_experience_range() {
        assert_eq!(extract_experience("Has 3-5 years in backend"), "3-5 years");
    }

    #[test]
    fn test_experience_range_with_to() {
        assert_eq!(extract_experience("3 to 5 yrs of experience"), "3-5 years");
    }

    #[test]
    fn test_experience_plus_drops_plus() {
        assert_eq!(extract_experience("10+ years experience"), "10 years");
    }

    #[test]
    fn test_experience_single_year_abbreviation() {
        assert_eq!(extract_experience("1 yr exp in QA"), "1 years");
    }

    #[test]
    fn test_experience_section_short() {
        let text = "Jane Roe\nWork Experience\nBackend engineer at Acme\nEducation\nBSc Physics";
        assert_eq!(extract_experience(text), "Backend engineer at Acme");
    }

    #[test]
    fn test_experience_section_truncated_at_100_chars() {
        let body = "Led the payments platform team at Acme Corp, owning settlement, \
                    reconciliation and ledger services end to end for the whole company";
        assert!(body.chars().count() > 100);
        let text = format!("PROFESSIONAL EXPERIENCE\n{body}\nProjects\nLedger rewrite");

        let experience = extract_experience(&text);
        let expected: String = body.chars().take(100).collect();
        assert_eq!(experience, format!("{expected}..."));
    }

    #[test]
    fn test_experience_section_runs_to_end_of_text() {
        let text = "Employment History: Acme, Globex";
        assert_eq!(extract_experience(text), ": Acme, Globex");
    }

    #[test]
    fn test_experience_empty_when_nothing_matches() {
        assert_eq!(extract_experience("Curious generalist"), "");
    }

    // ── education ──────────────────────────────────────────────────────────

    #[test]
    fn test_education_section_bounded_by_next_heading() {
        let text = "Education\nB.Tech in Computer Science, XYZ University\nSkills\nJava";
        assert_eq!(
            extractor().extract_education(text),
            "B.Tech in Computer Science, XYZ University"
        );
    }

    #[test]
    fn test_education_section_truncated_at_200_chars() {
        let body = "a".repeat(250);
        let text = format!("Academic background\n{body}");
        let education = extractor().extract_education(&text);
        assert_eq!(education, format!("background\n{}...", "a".repeat(189)));
        assert_eq!(education.chars().count(), 203);
    }

    #[test]
    fn test_education_keyword_fallback() {
        let text = "Holds a Master degree from Stanford University";
        assert_eq!(
            extractor().extract_education(text),
            "Master, Degree, University"
        );
    }

    #[test]
    fn test_education_empty_when_nothing_matches() {
        assert_eq!(extractor().extract_education("Self-taught"), "");
    }

    // ── whole record ───────────────────────────────────────────────────────

    #[test]
    fn test_extract_keeps_source_text_verbatim() {
        let text = "Work Experience\nDocker wrangler\nEducation\nMBA";
        let doc = extractor().extract(text);
        assert_eq!(doc.raw_text, text);
        assert_eq!(doc.skills, "Docker");
        assert_eq!(doc.experience, "Docker wrangler");
        assert_eq!(doc.education, "MBA");
    }

    /// Counts reads and hands back fixed text.
    #[derive(Default)]
    struct CountingReader {
        reads: AtomicUsize,
    }

    #[async_trait]
    impl DocumentReader for CountingReader {
        async fn read_text(
            &self,
            _storage_key: &str,
            _format: DocumentFormat,
        ) -> Result<String, ExtractionError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok("Java".to_string())
        }
    }

    #[tokio::test]
    async fn test_extract_file_rejects_txt_without_reading() {
        let reader = CountingReader::default();
        let result = extractor().extract_file(&reader, "resumes/x/cv.txt").await;

        assert_eq!(result, Err(ExtractionError::UnsupportedFormat("txt".to_string())));
        assert_eq!(reader.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_extract_file_reads_supported_format_once() {
        let reader = CountingReader::default();
        let doc = extractor()
            .extract_file(&reader, "resumes/x/cv.PDF")
            .await
            .unwrap();

        assert_eq!(doc.skills, "Java");
        assert_eq!(reader.reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_truncate_chars_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("éééé", 2), "éé...");
        assert_eq!(truncate_chars("éé", 2), "éé");
    }
}
