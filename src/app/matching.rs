//! Keyword matching between a vacancy description and course subjects.
//!
//! Subjects come from the `[Subjects]` section, one array of keywords per
//! subject. A subject's score is the share of its keywords found in the
//! vacancy text. Keywords may be phrases; they match on whole words.

use std::cmp::Reverse;

use toml::Value;

use crate::config::Settings;
use crate::error::ConfigError;

/// Section listing subjects and their keywords.
pub const SUBJECTS_SECTION: &str = "Subjects";

/// A course subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    /// Display name.
    pub name: String,
    /// Keywords, normalized to lowercase words separated by single spaces.
    pub keywords: Vec<String>,
}

/// How well a vacancy covers one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectScore {
    /// Subject name.
    pub subject: String,
    /// Keywords found in the vacancy, in declaration order.
    pub matched: Vec<String>,
    /// Number of keywords the subject declares.
    pub total: usize,
}

impl SubjectScore {
    /// Share of matched keywords, rounded down to a whole percent.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.matched.len() * 100 / self.total
        }
    }
}

/// Lowercases `text` and joins its alphanumeric words with single spaces.
///
/// `+` and `#` count as word characters so "C++" and "C#" survive.
pub fn normalize(text: &str) -> String {
    text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reads `[Subjects]`, keeping declaration order.
///
/// # Errors
///
/// Fails if the section is missing, is not a table, or a subject's value is
/// not an array of strings.
pub fn load_subjects(settings: &Settings) -> Result<Vec<Subject>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidSection {
        section: SUBJECTS_SECTION.to_string(),
        reason,
    };

    let section = settings
        .tree()
        .get(SUBJECTS_SECTION)
        .ok_or_else(|| invalid("section is missing".to_string()))?;
    let Value::Table(entries) = section else {
        return Err(invalid(format!("expected a table, found {}", section.type_str())));
    };

    entries
        .iter()
        .map(|(name, value)| {
            let keywords = value
                .as_array()
                .ok_or_else(|| invalid(format!("'{name}' must be an array of keywords")))?
                .iter()
                .map(|kw| {
                    kw.as_str()
                        .map(normalize)
                        .ok_or_else(|| invalid(format!("'{name}' contains a non-string keyword")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Subject {
                name: name.clone(),
                keywords: keywords.into_iter().filter(|k| !k.is_empty()).collect(),
            })
        })
        .collect()
}

/// Scores `subjects` against `text`, best match first.
pub fn score<'a>(
    text: &str,
    subjects: impl IntoIterator<Item = &'a Subject>,
) -> Vec<SubjectScore> {
    let haystack = format!(" {} ", normalize(text));

    let mut scores: Vec<SubjectScore> = subjects
        .into_iter()
        .map(|subject| SubjectScore {
            subject: subject.name.clone(),
            matched: subject
                .keywords
                .iter()
                .filter(|kw| haystack.contains(&format!(" {kw} ")))
                .cloned()
                .collect(),
            total: subject.keywords.len(),
        })
        .collect();

    // Stable sort keeps declaration order among equal scores.
    scores.sort_by_key(|s| Reverse(s.percent()));
    scores
}
