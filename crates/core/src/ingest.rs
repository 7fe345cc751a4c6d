use crate::extractor::SectionExtractor;
use crate::metadata::MetadataSummarizer;
use crate::models::{Document, InterpreterOptions, Section};
use crate::IngestError;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

pub fn discover_text_files(folder: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for item in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match item {
            Ok(entry) => entry,
            Err(error) => {
                warn!(folder = %folder.display(), reason = %error, "unreadable directory entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let matches_extension = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == extension);

        if matches_extension {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    files
}

pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub document: Document,
    pub sections: Vec<Section>,
}

pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

pub struct IngestionReport {
    pub documents: Vec<ProcessedDocument>,
    pub skipped_files: Vec<SkippedFile>,
}

/// A missing folder is an empty corpus, not an error.
pub fn ingest_folder_best_effort(
    folder: &Path,
    options: &InterpreterOptions,
) -> Result<IngestionReport, IngestError> {
    options.validate()?;

    if !folder.is_dir() {
        warn!(folder = %folder.display(), "books directory does not exist");
        return Ok(IngestionReport {
            documents: Vec::new(),
            skipped_files: Vec::new(),
        });
    }

    let extractor = SectionExtractor::new();
    let mut documents = Vec::new();
    let mut skipped_files = Vec::new();

    for path in discover_text_files(folder, options.file_extension) {
        match process_file(&path, &extractor, options) {
            Ok(processed) => {
                info!(
                    title = %processed.document.title,
                    sections = processed.sections.len(),
                    "processed book"
                );
                documents.push(processed);
            }
            Err(error) => {
                warn!(path = %path.display(), reason = %error, "skipped book");
                skipped_files.push(SkippedFile {
                    path,
                    reason: error.to_string(),
                });
            }
        }
    }

    Ok(IngestionReport {
        documents,
        skipped_files,
    })
}

pub fn process_file(
    path: &Path,
    extractor: &SectionExtractor,
    options: &InterpreterOptions,
) -> Result<ProcessedDocument, IngestError> {
    let bytes = fs::read(path)?;
    let checksum = digest_bytes(&bytes);
    let content = String::from_utf8(bytes)
        .map_err(|error| IngestError::InvalidUtf8(format!("{}: {error}", path.display())))?;

    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            IngestError::MissingFileName(format!("path missing filename: {}", path.display()))
        })?;

    Ok(process_text(
        &content,
        filename,
        &path.to_string_lossy(),
        checksum,
        extractor,
        options,
    ))
}

pub fn process_text(
    content: &str,
    filename: &str,
    source_path: &str,
    checksum: String,
    extractor: &SectionExtractor,
    options: &InterpreterOptions,
) -> ProcessedDocument {
    let sections = extractor.extract(content);
    let summary = MetadataSummarizer::new(extractor, options).summarize(content, filename);

    let document_id = filename
        .strip_suffix(&format!(".{}", options.file_extension))
        .unwrap_or(filename)
        .to_string();

    let document = Document {
        document_id,
        title: summary.title,
        filename: filename.to_string(),
        source_path: source_path.to_string(),
        checksum,
        total_words: summary.total_words,
        total_lines: summary.total_lines,
        sections_count: sections.len(),
        chapters_count: sections.iter().filter(|section| section.level == 1).count(),
        reading_time_minutes: summary.reading_time_minutes,
        topics: summary.topics,
        difficulty_level: summary.difficulty,
        processed_at: Utc::now(),
    };

    ProcessedDocument { document, sections }
}
