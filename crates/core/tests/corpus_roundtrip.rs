use booklens_core::{Corpus, Difficulty, InterpreterOptions};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_books(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(
        dir.join("python_basics.txt"),
        "# Python Basics\n\n# Chapter 1: Variables\nPython stores values in variables.\n\
         A variable is a name.\n\n## Naming\nNames use snake_case by convention.\n\n\
         # Chapter 2: Functions\nA function groups code. Python functions use def.\n",
    )?;
    fs::write(
        dir.join("memory-guide.txt"),
        "MEMORY TECHNIQUES\nRecall improves with spaced practice.\n\n\
         Part 1: Palaces\nThe memory palace is a mnemonic device.\n\n\
         SUMMARY\nMemory retention needs practice and recall.\n",
    )?;
    fs::write(dir.join("empty.txt"), "")?;
    fs::write(dir.join("notes.md"), "# ignored\nnot a book\n")?;
    Ok(())
}

#[test]
fn load_builds_documents_sections_and_index() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_books(dir.path())?;

    let corpus = Corpus::load(dir.path(), InterpreterOptions::default())?;
    assert_eq!(corpus.len(), 3);
    assert!(corpus.skipped_files().is_empty());

    let python = corpus.get_document("python_basics").ok_or("python book missing")?;
    assert_eq!(python.title, "Python Basics");
    assert_eq!(python.sections_count, 3);
    assert_eq!(python.chapters_count, 2);

    let memory = corpus.get_document("memory-guide").ok_or("memory book missing")?;
    assert_eq!(memory.title, "MEMORY TECHNIQUES");
    assert_eq!(memory.sections_count, 3);
    assert!(memory.topics.contains(&"memory".to_string()));

    let empty = corpus.get_document("empty").ok_or("empty book missing")?;
    assert_eq!(empty.total_words, 0);
    assert_eq!(empty.sections_count, 0);
    assert!(empty.topics.is_empty());
    assert_eq!(empty.difficulty_level, Difficulty::Beginner);
    Ok(())
}

#[test]
fn structural_invariants_hold_for_every_document() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_books(dir.path())?;
    let corpus = Corpus::load(dir.path(), InterpreterOptions::default())?;

    for document in corpus.documents() {
        assert_eq!(
            document.reading_time_minutes,
            document.total_words.div_ceil(200)
        );

        let sections = corpus
            .get_sections(&document.document_id)
            .ok_or("sections missing")?;
        let section_words: usize = sections.iter().map(|section| section.word_count).sum();
        assert!(section_words <= document.total_words);

        for (position, section) in sections.iter().enumerate() {
            let Some(parent_id) = &section.parent_section else {
                continue;
            };
            let parent_position = sections
                .iter()
                .position(|candidate| &candidate.section_id == parent_id)
                .ok_or("dangling parent")?;
            assert!(parent_position < position);
            assert!(sections[parent_position].level < section.level);
            assert!(sections[parent_position]
                .subsections
                .contains(&section.section_id));
        }
    }
    Ok(())
}

#[test]
fn unique_token_search_ranks_its_section_first() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_books(dir.path())?;
    let corpus = Corpus::load(dir.path(), InterpreterOptions::default())?;

    let results = corpus.search("mnemonic", 10);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document_id, "memory-guide");
    assert_eq!(results[0].section_title, "MEMORY TECHNIQUES - Palaces");
    assert!(results[0].relevance_score > 0.0);
    assert!(results[0].content_snippet.contains("mnemonic"));

    let results = corpus.search("PYTHON", 10);
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|result| result.relevance_score == 1.0));

    assert!(corpus.search("a to", 10).is_empty());
    Ok(())
}

#[test]
fn reloading_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_books(dir.path())?;

    let first = Corpus::load(dir.path(), InterpreterOptions::default())?;
    let second = first.reload()?;

    assert_eq!(first.len(), second.len());
    for document in first.documents() {
        let again = second
            .get_document(&document.document_id)
            .ok_or("document lost on reload")?;
        assert_eq!(document.total_words, again.total_words);
        assert_eq!(document.topics, again.topics);
        assert_eq!(document.difficulty_level, again.difficulty_level);
        assert_eq!(document.checksum, again.checksum);
    }
    assert_eq!(first.index().snapshot(), second.index().snapshot());
    Ok(())
}

#[test]
fn export_and_stats_cover_the_corpus() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    write_books(dir.path())?;
    let corpus = Corpus::load(dir.path(), InterpreterOptions::default())?;

    let stats = corpus.stats();
    assert_eq!(stats.total_documents, 3);
    assert_eq!(stats.total_sections, 6);
    assert_eq!(stats.indexed_words, corpus.index().len());

    let summary = corpus.export_summary("python_basics")?;
    let json = summary.to_json_pretty()?;
    assert!(json.contains("\"book_id\": \"python_basics\""));
    assert_eq!(summary.structure.chapters.len(), 2);
    Ok(())
}

#[test]
fn missing_directory_is_an_empty_corpus() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let corpus = Corpus::load(&dir.path().join("nowhere"), InterpreterOptions::default())?;
    assert!(corpus.is_empty());
    assert!(corpus.search("python", 10).is_empty());
    Ok(())
}
