use crate::models::Section;
use regex::Regex;

const SHOUTED_HEADING_MAX_CHARS: usize = 50;
const SHOUTED_HEADING_MAX_WORDS: usize = 8;

#[derive(Debug, Clone)]
pub struct SectionExtractor {
    numbered_heading_re: Regex,
    markdown_prefix_re: Regex,
    numbered_prefix_re: Regex,
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionExtractor {
    pub fn new() -> Self {
        Self {
            numbered_heading_re: Regex::new(r"(?i)^(?:chapter|part|section) \d+")
                .expect("valid regex"),
            markdown_prefix_re: Regex::new(r"^#+\s*").expect("valid regex"),
            numbered_prefix_re: Regex::new(r"(?i)^(?:chapter|part|section)\s*\d+:?\s*")
                .expect("valid regex"),
        }
    }

    /// Markdown markers win over numbered and shouted headings.
    pub fn heading_level(&self, line: &str) -> Option<usize> {
        let markers = markdown_level(line);
        if markers > 0 {
            return Some(markers);
        }

        if self.is_chapter_heading(line) {
            return Some(1);
        }

        None
    }

    pub fn is_chapter_heading(&self, line: &str) -> bool {
        if self.numbered_heading_re.is_match(line) {
            return true;
        }

        line.chars().count() < SHOUTED_HEADING_MAX_CHARS
            && is_upper_case(line)
            && line.split_whitespace().count() < SHOUTED_HEADING_MAX_WORDS
    }

    pub fn clean_header(&self, header: &str) -> String {
        let without_markers = self.markdown_prefix_re.replace(header, "");
        let without_prefix = self.numbered_prefix_re.replace(&without_markers, "");
        without_prefix.trim().to_string()
    }

    pub fn extract(&self, content: &str) -> Vec<Section> {
        let lines: Vec<&str> = content.split('\n').collect();
        let mut sections = Vec::new();
        let mut current: Option<OpenSection> = None;
        let mut counter = 0usize;

        for (line_number, line) in lines.iter().enumerate() {
            let stripped = line.trim();

            match self.heading_level(stripped) {
                Some(level) => {
                    if let Some(open) = current.take() {
                        if let Some(section) = open.close(line_number.saturating_sub(1)) {
                            sections.push(section);
                        }
                    }

                    // empty sections still consume an id
                    counter += 1;
                    current = Some(OpenSection {
                        section_id: format!("section_{counter:03}"),
                        title: self.clean_header(stripped),
                        level,
                        start_line: line_number,
                        lines: Vec::new(),
                    });
                }
                None => {
                    if stripped.is_empty() {
                        continue;
                    }
                    if let Some(open) = current.as_mut() {
                        open.lines.push(*line);
                    }
                }
            }
        }

        if let Some(open) = current.take() {
            if let Some(section) = open.close(lines.len().saturating_sub(1)) {
                sections.push(section);
            }
        }

        link_hierarchy(&mut sections);
        sections
    }
}

struct OpenSection<'a> {
    section_id: String,
    title: String,
    level: usize,
    start_line: usize,
    lines: Vec<&'a str>,
}

impl OpenSection<'_> {
    fn close(self, end_line: usize) -> Option<Section> {
        let content = self.lines.join("\n").trim().to_string();
        if content.is_empty() {
            return None;
        }

        Some(Section {
            section_id: self.section_id,
            title: self.title,
            word_count: content.split_whitespace().count(),
            content,
            level: self.level,
            start_line: self.start_line,
            end_line,
            parent_section: None,
            subsections: Vec::new(),
        })
    }
}

// parent = nearest preceding section with a strictly lower level
fn link_hierarchy(sections: &mut [Section]) {
    let mut links = Vec::new();
    for (child, section) in sections.iter().enumerate() {
        let parent = sections[..child]
            .iter()
            .rposition(|candidate| candidate.level < section.level);
        if let Some(parent) = parent {
            links.push((child, parent));
        }
    }

    for (child, parent) in links {
        let child_id = sections[child].section_id.clone();
        sections[child].parent_section = Some(sections[parent].section_id.clone());
        sections[parent].subsections.push(child_id);
    }
}

fn markdown_level(line: &str) -> usize {
    line.chars().take_while(|c| *c == '#').count()
}

fn is_upper_case(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}
