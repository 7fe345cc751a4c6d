use crate::index::{InvertedIndex, Location, Tokenizer};
use crate::models::SearchResult;
use crate::traits::SectionLookup;
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

pub struct QueryEngine<'a> {
    index: &'a InvertedIndex,
    tokenizer: &'a Tokenizer,
    snippet_length: usize,
}

impl<'a> QueryEngine<'a> {
    pub fn new(index: &'a InvertedIndex, tokenizer: &'a Tokenizer, snippet_length: usize) -> Self {
        Self {
            index,
            tokenizer,
            snippet_length,
        }
    }

    pub fn search<L>(&self, lookup: &L, query: &str, limit: usize) -> Vec<SearchResult>
    where
        L: SectionLookup + ?Sized,
    {
        let query_tokens = self.tokenizer.tokenize(query);
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let ranked = self.rank(&query_tokens);
        debug!(query, candidates = ranked.len(), limit, "ranked search candidates");

        ranked
            .into_iter()
            .take(limit)
            .filter_map(|(location, matches)| {
                let (document, section) = lookup.resolve(location)?;
                let snippet = build_snippet(&section.content, &query_tokens, self.snippet_length);
                let match_positions = match_positions(&snippet, &query_tokens);

                Some(SearchResult {
                    document_id: location.document_id.clone(),
                    section_id: location.section_id.clone(),
                    section_title: format!("{} - {}", document.title, section.title),
                    content_snippet: snippet,
                    relevance_score: matches as f64 / query_tokens.len() as f64,
                    match_positions,
                })
            })
            .collect()
    }

    pub fn rank(&self, query_tokens: &[String]) -> Vec<(&'a Location, usize)> {
        let mut scored: Vec<(&'a Location, usize)> = Vec::new();
        let mut positions: HashMap<&'a Location, usize> = HashMap::new();

        for token in query_tokens {
            let Some(postings) = self.index.postings(token) else {
                continue;
            };
            for location in postings {
                match positions.get(location) {
                    Some(&position) => scored[position].1 += 1,
                    None => {
                        positions.insert(location, scored.len());
                        scored.push((location, 1));
                    }
                }
            }
        }

        scored.sort_by(|left, right| right.1.cmp(&left.1));
        scored
    }
}

/// Snippets match raw substrings, looser than the whole-token ranking, so a
/// window may centre on a hit inside a longer word.
pub fn build_snippet(content: &str, query_tokens: &[String], snippet_length: usize) -> String {
    let chars: Vec<char> = content.chars().collect();
    let lowered = content.to_lowercase();

    let first_hit = query_tokens
        .iter()
        .filter_map(|token| lowered.find(token.as_str()))
        .min()
        .map(|byte_offset| lowered[..byte_offset].chars().count())
        .unwrap_or(0)
        .min(chars.len());

    let start = first_hit.saturating_sub(snippet_length / 2);
    let end = (start + snippet_length).min(chars.len());

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str("...");
    }
    snippet.extend(&chars[start..end]);
    if end < chars.len() {
        snippet.push_str("...");
    }
    snippet
}

pub fn match_positions(text: &str, query_tokens: &[String]) -> Vec<(usize, usize)> {
    let lowered = text.to_lowercase();
    let mut positions: Vec<(usize, usize)> = Vec::new();

    for token in query_tokens {
        let token_chars = token.chars().count();
        for (byte_offset, _) in lowered.match_indices(token.as_str()) {
            let start = lowered[..byte_offset].chars().count();
            positions.push((start, start + token_chars));
        }
    }

    positions.sort_unstable();
    positions.dedup();
    positions
}
