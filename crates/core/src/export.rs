use crate::error::ExportError;
use crate::models::{Difficulty, Section};
use crate::store::Corpus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const STOP_WORDS: [&str; 37] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "should", "could", "can", "may", "might", "this", "that", "these", "those",
];

const TECHNICAL_INDICATORS: [&str; 8] = [
    "programming",
    "algorithm",
    "method",
    "technique",
    "principle",
    "concept",
    "pattern",
    "structure",
];

const WORD_FREQUENCY_TOP: usize = 20;
const CONCEPT_CANDIDATES: usize = 50;
const MAX_KEY_CONCEPTS: usize = 15;
const MIN_FREQUENCY_CHARS: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSummary {
    pub metadata: SummaryMetadata,
    pub structure: SummaryStructure,
    pub content_summary: ContentSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMetadata {
    pub book_id: String,
    pub title: String,
    pub total_words: usize,
    pub reading_time_minutes: usize,
    pub topics: Vec<String>,
    pub difficulty_level: Difficulty,
    pub processed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStructure {
    pub sections_count: usize,
    pub chapters: Vec<ChapterOutline>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterOutline {
    pub section_id: String,
    pub title: String,
    pub word_count: usize,
    pub subsections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSummary {
    pub word_frequency: Vec<WordCount>,
    pub key_concepts: Vec<String>,
}

impl BookSummary {
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), ExportError> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

impl Corpus {
    pub fn export_summary(&self, document_id: &str) -> Result<BookSummary, ExportError> {
        let document = self
            .get_document(document_id)
            .ok_or_else(|| ExportError::UnknownDocument(document_id.to_string()))?;
        let sections = self.get_sections(document_id).unwrap_or_default();

        let chapters = sections
            .iter()
            .filter(|section| section.level == 1)
            .map(|section| ChapterOutline {
                section_id: section.section_id.clone(),
                title: section.title.clone(),
                word_count: section.word_count,
                subsections: section.subsections.clone(),
            })
            .collect();

        Ok(BookSummary {
            metadata: SummaryMetadata {
                book_id: document.document_id.clone(),
                title: document.title.clone(),
                total_words: document.total_words,
                reading_time_minutes: document.reading_time_minutes,
                topics: document.topics.clone(),
                difficulty_level: document.difficulty_level,
                processed_at: document.processed_at,
            },
            structure: SummaryStructure {
                sections_count: sections.len(),
                chapters,
            },
            content_summary: ContentSummary {
                word_frequency: self.word_frequency(sections, WORD_FREQUENCY_TOP),
                key_concepts: self.key_concepts(sections),
            },
        })
    }

    /// Most frequent content words; ties keep first-occurrence order.
    pub fn word_frequency(&self, sections: &[Section], top_n: usize) -> Vec<WordCount> {
        let mut counts: Vec<WordCount> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for section in sections {
            for word in self.tokenizer().tokenize(&section.content) {
                if word.chars().count() < MIN_FREQUENCY_CHARS || is_stop_word(&word) {
                    continue;
                }
                match positions.get(&word) {
                    Some(&position) => counts[position].count += 1,
                    None => {
                        positions.insert(word.clone(), counts.len());
                        counts.push(WordCount { word, count: 1 });
                    }
                }
            }
        }

        counts.sort_by(|left, right| right.count.cmp(&left.count));
        counts.truncate(top_n);
        counts
    }

    pub fn key_concepts(&self, sections: &[Section]) -> Vec<String> {
        self.word_frequency(sections, CONCEPT_CANDIDATES)
            .into_iter()
            .filter(|entry| {
                entry.count > 3
                    && (entry.word.chars().count() > 6
                        || TECHNICAL_INDICATORS
                            .iter()
                            .any(|indicator| entry.word.contains(indicator)))
            })
            .map(|entry| entry.word)
            .take(MAX_KEY_CONCEPTS)
            .collect()
    }
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::SectionExtractor;
    use crate::ingest::process_text;
    use crate::models::InterpreterOptions;
    use tempfile::tempdir;

    fn corpus(text: &str) -> Corpus {
        let extractor = SectionExtractor::new();
        let options = InterpreterOptions::default();
        let document = process_text(
            text,
            "guide.txt",
            "guide.txt",
            String::new(),
            &extractor,
            &options,
        );
        Corpus::from_documents(vec![document], options)
    }

    #[test]
    fn unknown_document_is_an_error() {
        let corpus = corpus("# Guide\nbody\n");
        assert!(matches!(
            corpus.export_summary("missing"),
            Err(ExportError::UnknownDocument(_))
        ));
    }

    #[test]
    fn outline_lists_top_level_chapters() -> Result<(), Box<dyn std::error::Error>> {
        let corpus = corpus("# One\nfirst body\n## Sub\nsub body\n# Two\nsecond body\n");
        let summary = corpus.export_summary("guide")?;

        assert_eq!(summary.structure.sections_count, 3);
        let titles: Vec<&str> = summary
            .structure
            .chapters
            .iter()
            .map(|chapter| chapter.title.as_str())
            .collect();
        assert_eq!(titles, vec!["One", "Two"]);
        assert_eq!(summary.structure.chapters[0].subsections, vec!["section_002".to_string()]);
        assert_eq!(summary.metadata.book_id, "guide");
        Ok(())
    }

    #[test]
    fn frequency_drops_stop_words_and_short_words() -> Result<(), Box<dyn std::error::Error>> {
        let corpus = corpus("# Guide\nthese these these recursion recursion loop loop loop cat\n");
        let summary = corpus.export_summary("guide")?;

        assert_eq!(
            summary.content_summary.word_frequency,
            vec![
                WordCount {
                    word: "loop".to_string(),
                    count: 3
                },
                WordCount {
                    word: "recursion".to_string(),
                    count: 2
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn repeated_words_accumulate_across_sections() -> Result<(), Box<dyn std::error::Error>> {
        let corpus = corpus("# One
graph graph tree
# Two
graph tree tree tree
");
        let sections = corpus.get_sections("guide").ok_or("missing sections")?;
        let frequency = corpus.word_frequency(sections, 10);

        assert_eq!(frequency[0].word, "tree");
        assert_eq!(frequency[0].count, 4);
        assert_eq!(frequency[1].word, "graph");
        assert_eq!(frequency[1].count, 3);
        assert_eq!(corpus.word_frequency(sections, 1).len(), 1);
        Ok(())
    }

    #[test]
    fn key_concepts_need_repetition_and_weight() -> Result<(), Box<dyn std::error::Error>> {
        let body = "recursion ".repeat(4) + &"patterns ".repeat(4) + &"simple ".repeat(5);
        let corpus = corpus(&format!("# Guide\n{body}\n"));
        let summary = corpus.export_summary("guide")?;

        assert_eq!(
            summary.content_summary.key_concepts,
            vec!["recursion".to_string(), "patterns".to_string()]
        );
        Ok(())
    }

    #[test]
    fn summary_writes_pretty_json() -> Result<(), Box<dyn std::error::Error>> {
        let corpus = corpus("# Guide\nbody text\n");
        let summary = corpus.export_summary("guide")?;
        let dir = tempdir()?;
        let path = dir.path().join("guide.json");

        summary.write_json(&path)?;
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(value["metadata"]["difficulty_level"], "beginner");
        assert_eq!(value["structure"]["sections_count"], 1);
        assert_eq!(value["content_summary"]["word_frequency"][0]["word"], "body");
        assert_eq!(value["content_summary"]["word_frequency"][0]["count"], 1);
        Ok(())
    }
}
