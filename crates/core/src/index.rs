use crate::models::Section;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::info;

#[derive(Debug, Clone)]
pub struct Tokenizer {
    word_re: Regex,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            word_re: Regex::new(r"\w+").expect("valid regex"),
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.word_re
            .find_iter(&lowered)
            .map(|token| token.as_str().to_string())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub document_id: String,
    pub section_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Location>>,
}

impl InvertedIndex {
    pub fn build<'a, I>(tokenizer: &Tokenizer, documents: I, min_token_chars: usize) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [Section])>,
    {
        let mut postings: HashMap<String, Vec<Location>> = HashMap::new();

        for (document_id, sections) in documents {
            for section in sections {
                let mut seen = HashSet::new();
                for token in tokenizer.tokenize(&section.content) {
                    if token.chars().count() < min_token_chars || !seen.insert(token.clone()) {
                        continue;
                    }
                    postings.entry(token).or_default().push(Location {
                        document_id: document_id.to_string(),
                        section_id: section.section_id.clone(),
                    });
                }
            }
        }

        info!(unique_words = postings.len(), "built word index");

        Self { postings }
    }

    pub fn postings(&self, token: &str) -> Option<&[Location]> {
        self.postings.get(token).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn snapshot(&self) -> Vec<(String, Vec<Location>)> {
        let mut entries: Vec<(String, Vec<Location>)> = self
            .postings
            .iter()
            .map(|(token, locations)| {
                let mut locations = locations.clone();
                locations.sort();
                (token.clone(), locations)
            })
            .collect();
        entries.sort_by(|left, right| left.0.cmp(&right.0));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: &str, content: &str) -> Section {
        Section {
            section_id: id.to_string(),
            title: id.to_string(),
            content: content.to_string(),
            level: 1,
            word_count: content.split_whitespace().count(),
            start_line: 0,
            end_line: 0,
            parent_section: None,
            subsections: Vec::new(),
        }
    }

    #[test]
    fn tokenizer_lowercases_word_runs() {
        let tokenizer = Tokenizer::new();
        assert_eq!(
            tokenizer.tokenize("Hello, World! snake_case x2"),
            vec!["hello", "world", "snake_case", "x2"]
        );
        assert!(tokenizer.tokenize("  ...  ").is_empty());
    }

    #[test]
    fn short_tokens_are_not_indexed() {
        let tokenizer = Tokenizer::new();
        let sections = vec![section("section_001", "a to the python")];
        let index = InvertedIndex::build(&tokenizer, [("book", sections.as_slice())], 3);

        assert!(index.postings("a").is_none());
        assert!(index.postings("to").is_none());
        assert_eq!(index.postings("the").map(<[Location]>::len), Some(1));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn locations_are_deduplicated_per_token() {
        let tokenizer = Tokenizer::new();
        let first = vec![
            section("section_001", "rust rust RUST"),
            section("section_002", "more rust"),
        ];
        let second = vec![section("section_001", "rust")];
        let index = InvertedIndex::build(
            &tokenizer,
            [("one", first.as_slice()), ("two", second.as_slice())],
            3,
        );

        let postings = index.postings("rust").unwrap();
        assert_eq!(postings.len(), 3);
        let unique: HashSet<&Location> = postings.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn empty_corpus_builds_empty_index() {
        let tokenizer = Tokenizer::new();
        let index = InvertedIndex::build(&tokenizer, std::iter::empty::<(&str, &[Section])>(), 3);
        assert!(index.is_empty());
    }
}
