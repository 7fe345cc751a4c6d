use crate::extractor::SectionExtractor;
use crate::models::{Difficulty, InterpreterOptions};
use regex::Regex;

const TOPIC_KEYWORDS: [(&str, &[&str]); 8] = [
    (
        "programming",
        &[
            "python", "javascript", "code", "programming", "algorithm", "function", "class",
            "object",
        ],
    ),
    (
        "web development",
        &["html", "css", "web", "website", "frontend", "backend", "api"],
    ),
    (
        "learning",
        &["learning", "study", "education", "knowledge", "skill", "practice"],
    ),
    (
        "memory",
        &["memory", "retention", "recall", "memorization", "mnemonics"],
    ),
    (
        "database",
        &["database", "sql", "query", "table", "index", "normalization"],
    ),
    (
        "testing",
        &["test", "testing", "unit test", "integration", "quality"],
    ),
    (
        "design patterns",
        &["pattern", "singleton", "factory", "observer", "strategy"],
    ),
    (
        "data structures",
        &["array", "list", "tree", "graph", "stack", "queue"],
    ),
];

const COMPLEX_TERMS: [&str; 8] = [
    "implementation",
    "optimization",
    "architecture",
    "polymorphism",
    "encapsulation",
    "abstraction",
    "inheritance",
    "algorithm",
];

const LONG_WORD_AVERAGE: f64 = 5.0;
const COMPLEX_TERM_THRESHOLD: usize = 10;
const LONG_SENTENCE_AVERAGE: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TextSummary {
    pub title: String,
    pub total_words: usize,
    pub total_lines: usize,
    pub reading_time_minutes: usize,
    pub topics: Vec<String>,
    pub difficulty: Difficulty,
}

pub struct MetadataSummarizer<'a> {
    extractor: &'a SectionExtractor,
    options: &'a InterpreterOptions,
    sentence_break_re: Regex,
}

impl<'a> MetadataSummarizer<'a> {
    pub fn new(extractor: &'a SectionExtractor, options: &'a InterpreterOptions) -> Self {
        Self {
            extractor,
            options,
            sentence_break_re: Regex::new(r"[.!?]+").expect("valid regex"),
        }
    }

    pub fn summarize(&self, content: &str, filename: &str) -> TextSummary {
        let total_words = content.split_whitespace().count();

        TextSummary {
            title: self.extract_title(content, filename),
            total_words,
            total_lines: content.split('\n').count(),
            reading_time_minutes: reading_time_minutes(total_words, self.options.words_per_minute),
            topics: self.extract_topics(content),
            difficulty: self.assess_difficulty(content),
        }
    }

    // numbered headings mentioning "chapter" name a chapter, not the book
    pub fn extract_title(&self, content: &str, filename: &str) -> String {
        for line in content.split('\n').take(self.options.title_scan_lines) {
            let stripped = line.trim();
            if stripped.starts_with('#') {
                return self.extractor.clean_header(stripped);
            }
            if self.extractor.is_chapter_heading(stripped)
                && !stripped.to_lowercase().contains("chapter")
            {
                return self.extractor.clean_header(stripped);
            }
        }

        let stem = filename
            .strip_suffix(&format!(".{}", self.options.file_extension))
            .unwrap_or(filename);
        title_case(&stem.replace(['_', '-'], " "))
    }

    pub fn extract_topics(&self, content: &str) -> Vec<String> {
        let lowered = content.to_lowercase();

        TOPIC_KEYWORDS
            .iter()
            .filter(|(_, keywords)| {
                let hits: usize = keywords
                    .iter()
                    .map(|keyword| lowered.matches(keyword).count())
                    .sum();
                hits > self.options.topic_threshold
            })
            .map(|(topic, _)| (*topic).to_string())
            .take(self.options.max_topics)
            .collect()
    }

    pub fn assess_difficulty(&self, content: &str) -> Difficulty {
        let words: Vec<&str> = content.split_whitespace().collect();

        let average_word_length = if words.is_empty() {
            0.0
        } else {
            let letters: usize = words.iter().map(|word| word.chars().count()).sum();
            letters as f64 / words.len() as f64
        };

        let lowered = content.to_lowercase();
        let complex_count: usize = COMPLEX_TERMS
            .iter()
            .map(|term| lowered.matches(term).count())
            .sum();

        // Splitting always yields at least one fragment, even for empty text.
        let sentences = self.sentence_break_re.split(content).count();
        let average_sentence_length = words.len() as f64 / sentences as f64;

        let score = [
            average_word_length > LONG_WORD_AVERAGE,
            complex_count > COMPLEX_TERM_THRESHOLD,
            average_sentence_length > LONG_SENTENCE_AVERAGE,
        ]
        .iter()
        .filter(|signal| **signal)
        .count();

        match score {
            0 => Difficulty::Beginner,
            1 => Difficulty::Intermediate,
            _ => Difficulty::Advanced,
        }
    }
}

pub fn reading_time_minutes(total_words: usize, words_per_minute: usize) -> usize {
    total_words.div_ceil(words_per_minute.max(1))
}

pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_alphabetic = false;

    for character in text.chars() {
        if character.is_alphabetic() {
            if previous_alphabetic {
                result.extend(character.to_lowercase());
            } else {
                result.extend(character.to_uppercase());
            }
            previous_alphabetic = true;
        } else {
            result.push(character);
            previous_alphabetic = false;
        }
    }

    result
}
