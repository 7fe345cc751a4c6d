use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub document_id: String,
    pub title: String,
    pub filename: String,
    pub source_path: String,
    pub checksum: String,
    pub total_words: usize,
    pub total_lines: usize,
    pub sections_count: usize,
    pub chapters_count: usize,
    pub reading_time_minutes: usize,
    pub topics: Vec<String>,
    pub difficulty_level: Difficulty,
    pub processed_at: DateTime<Utc>,
}

impl Document {
    pub fn has_topic(&self, topic: &str) -> bool {
        let wanted = topic.to_lowercase();
        self.topics.iter().any(|own| own.to_lowercase() == wanted)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub section_id: String,
    pub title: String,
    pub content: String,
    pub level: usize,
    pub word_count: usize,
    pub start_line: usize,
    pub end_line: usize,
    pub parent_section: Option<String>,
    pub subsections: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty level: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DifficultyFilter {
    #[default]
    Any,
    Only(Difficulty),
}

impl DifficultyFilter {
    pub fn accepts(&self, level: Difficulty) -> bool {
        match self {
            DifficultyFilter::Any => true,
            DifficultyFilter::Only(wanted) => *wanted == level,
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("any") {
            Ok(DifficultyFilter::Any)
        } else {
            value.parse().map(DifficultyFilter::Only)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub document_id: String,
    pub section_id: String,
    pub section_title: String,
    pub content_snippet: String,
    pub relevance_score: f64,
    /// Character ranges inside the snippet.
    pub match_positions: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicCount {
    pub topic: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorpusStats {
    pub total_documents: usize,
    pub total_sections: usize,
    pub total_words: usize,
    pub average_words_per_document: f64,
    pub topics_distribution: Vec<TopicCount>,
    pub difficulty_distribution: BTreeMap<Difficulty, usize>,
    pub indexed_words: usize,
    pub average_reading_time_minutes: f64,
}

#[derive(Debug, Clone)]
pub struct InterpreterOptions {
    pub words_per_minute: usize,
    pub snippet_length: usize,
    pub min_token_chars: usize,
    pub max_topics: usize,
    pub topic_threshold: usize,
    pub title_scan_lines: usize,
    pub file_extension: &'static str,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
            snippet_length: 200,
            min_token_chars: 3,
            max_topics: 5,
            topic_threshold: 2,
            title_scan_lines: 10,
            file_extension: "txt",
        }
    }
}

impl InterpreterOptions {
    pub fn validate(&self) -> Result<(), crate::IngestError> {
        if self.words_per_minute == 0 {
            return Err(crate::IngestError::InvalidOptions(
                "words_per_minute must be greater than zero".to_string(),
            ));
        }
        if self.snippet_length == 0 {
            return Err(crate::IngestError::InvalidOptions(
                "snippet_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
