use crate::index::{InvertedIndex, Location, Tokenizer};
use crate::ingest::{ingest_folder_best_effort, ProcessedDocument, SkippedFile};
use crate::models::{
    CorpusStats, Difficulty, DifficultyFilter, Document, InterpreterOptions, SearchResult, Section,
    TopicCount,
};
use crate::query::QueryEngine;
use crate::traits::SectionLookup;
use crate::IngestError;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::info;

const TOPIC_DISTRIBUTION_LIMIT: usize = 10;

struct Entry {
    processed: ProcessedDocument,
    section_positions: HashMap<String, usize>,
}

impl Entry {
    fn new(processed: ProcessedDocument) -> Self {
        let section_positions = processed
            .sections
            .iter()
            .enumerate()
            .map(|(position, section)| (section.section_id.clone(), position))
            .collect();
        Self {
            processed,
            section_positions,
        }
    }

    fn section(&self, section_id: &str) -> Option<&Section> {
        self.section_positions
            .get(section_id)
            .map(|position| &self.processed.sections[*position])
    }
}

pub struct Corpus {
    root: Option<PathBuf>,
    options: InterpreterOptions,
    tokenizer: Tokenizer,
    entries: HashMap<String, Entry>,
    order: Vec<String>,
    index: InvertedIndex,
    skipped_files: Vec<SkippedFile>,
}

impl Corpus {
    pub fn load(folder: &Path, options: InterpreterOptions) -> Result<Self, IngestError> {
        let report = ingest_folder_best_effort(folder, &options)?;
        let mut corpus = Self::from_documents(report.documents, options);
        corpus.root = Some(folder.to_path_buf());
        corpus.skipped_files = report.skipped_files;
        Ok(corpus)
    }

    /// A later document with an already used id replaces the earlier one.
    pub fn from_documents(documents: Vec<ProcessedDocument>, options: InterpreterOptions) -> Self {
        let mut entries = HashMap::new();
        let mut order = Vec::new();

        for processed in documents {
            let document_id = processed.document.document_id.clone();
            if entries.insert(document_id.clone(), Entry::new(processed)).is_none() {
                order.push(document_id);
            }
        }

        let tokenizer = Tokenizer::new();
        let index = InvertedIndex::build(
            &tokenizer,
            order.iter().filter_map(|document_id| {
                entries.get(document_id).map(|entry| {
                    (document_id.as_str(), entry.processed.sections.as_slice())
                })
            }),
            options.min_token_chars,
        );

        info!(books = order.len(), "loaded and processed books");

        Self {
            root: None,
            options,
            tokenizer,
            entries,
            order,
            index,
            skipped_files: Vec::new(),
        }
    }

    pub fn reload(&self) -> Result<Self, IngestError> {
        match &self.root {
            Some(root) => Self::load(root, self.options.clone()),
            None => Ok(Self::from_documents(
                self.order
                    .iter()
                    .filter_map(|document_id| self.entries.get(document_id))
                    .map(|entry| entry.processed.clone())
                    .collect(),
                self.options.clone(),
            )),
        }
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn skipped_files(&self) -> &[SkippedFile] {
        &self.skipped_files
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> + '_ {
        self.order
            .iter()
            .filter_map(|document_id| self.entries.get(document_id))
            .map(|entry| &entry.processed.document)
    }

    pub fn get_document(&self, document_id: &str) -> Option<&Document> {
        self.entries
            .get(document_id)
            .map(|entry| &entry.processed.document)
    }

    pub fn get_sections(&self, document_id: &str) -> Option<&[Section]> {
        self.entries
            .get(document_id)
            .map(|entry| entry.processed.sections.as_slice())
    }

    pub fn get_section(&self, document_id: &str, section_id: &str) -> Option<&Section> {
        self.entries.get(document_id)?.section(section_id)
    }

    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        QueryEngine::new(&self.index, &self.tokenizer, self.options.snippet_length)
            .search(self, query, limit)
    }

    pub fn get_documents_by_topic(&self, topic: &str) -> Vec<&Document> {
        let mut matching: Vec<&Document> = self
            .documents()
            .filter(|document| document.has_topic(topic))
            .collect();
        matching.sort_by(|left, right| left.title.cmp(&right.title));
        matching
    }

    /// Most shared topics first.
    pub fn recommend(&self, user_topics: &[String], difficulty: DifficultyFilter) -> Vec<&Document> {
        let mut scored: Vec<(usize, &Document)> = self
            .documents()
            .filter(|document| difficulty.accepts(document.difficulty_level))
            .map(|document| {
                let shared = user_topics
                    .iter()
                    .filter(|topic| document.has_topic(topic))
                    .count();
                (shared, document)
            })
            .filter(|(shared, _)| *shared > 0)
            .collect();

        scored.sort_by(|left, right| right.0.cmp(&left.0));
        scored.into_iter().map(|(_, document)| document).collect()
    }

    pub fn stats(&self) -> CorpusStats {
        let total_documents = self.len();
        let total_sections = self
            .entries
            .values()
            .map(|entry| entry.processed.sections.len())
            .sum();
        let total_words: usize = self.documents().map(|document| document.total_words).sum();
        let total_reading: usize = self
            .documents()
            .map(|document| document.reading_time_minutes)
            .sum();

        let mut topics: Vec<TopicCount> = Vec::new();
        let mut difficulty_distribution: BTreeMap<Difficulty, usize> = BTreeMap::new();
        for document in self.documents() {
            for topic in &document.topics {
                match topics.iter_mut().find(|entry| &entry.topic == topic) {
                    Some(entry) => entry.count += 1,
                    None => topics.push(TopicCount {
                        topic: topic.clone(),
                        count: 1,
                    }),
                }
            }
            *difficulty_distribution
                .entry(document.difficulty_level)
                .or_insert(0) += 1;
        }
        topics.sort_by(|left, right| right.count.cmp(&left.count));
        topics.truncate(TOPIC_DISTRIBUTION_LIMIT);

        let average = |total: usize| {
            if total_documents == 0 {
                0.0
            } else {
                total as f64 / total_documents as f64
            }
        };

        CorpusStats {
            total_documents,
            total_sections,
            total_words,
            average_words_per_document: average(total_words),
            topics_distribution: topics,
            difficulty_distribution,
            indexed_words: self.index.len(),
            average_reading_time_minutes: average(total_reading),
        }
    }
}

impl SectionLookup for Corpus {
    fn resolve(&self, location: &Location) -> Option<(&Document, &Section)> {
        let entry = self.entries.get(&location.document_id)?;
        let section = entry.section(&location.section_id)?;
        Some((&entry.processed.document, section))
    }
}
