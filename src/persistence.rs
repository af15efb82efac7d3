// File: src/persistence.rs
use crate::core::assignment::{ChordMapDocument, MIN_CHORD_KEYS};
use crate::core::engine::FrequencySnapshot;
use crate::core::types::{KeyEvent, Word};
use crate::error::{ChordError, Result};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Writes through a temp file in the target directory, then renames it into
/// place, so a crash never leaves a half-written artifact.
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<()>,
{
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir).map_err(|e| ChordError::io(parent_dir, e))?;

    let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| ChordError::io(parent_dir, e))?;
    {
        let mut writer = BufWriter::new(&temp_file);
        write(&mut writer)?;
        writer.flush().map_err(|e| ChordError::io(path, e))?;
    }
    temp_file.persist(path).map_err(|e| ChordError::io(path, e.error))?;
    Ok(())
}

/// Reads a key log: one key token per line, in time order. Blank lines are skipped.
pub fn read_key_log(path: &Path) -> Result<Vec<KeyEvent>> {
    let file = File::open(path).map_err(|e| ChordError::io(path, e))?;
    let mut events = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| ChordError::io(path, e))?;
        let token = line.trim_end_matches(['\r', '\n']);
        if !token.is_empty() {
            events.push(KeyEvent::parse(token));
        }
    }
    info!(path = %path.display(), events = events.len(), "key log loaded");
    Ok(events)
}

pub fn save_chord_map(document: &ChordMapDocument, path: &Path) -> Result<()> {
    write_atomically(path, |writer| {
        serde_json::to_writer_pretty(&mut *writer, document).map_err(|e| ChordError::json(path, e))?;
        writeln!(writer).map_err(|e| ChordError::io(path, e))
    })?;
    info!(path = %path.display(), words = document.words.len(), ngrams = document.ngrams.len(), "chord map saved");
    Ok(())
}

/// Parses a chord map without checking its chords. Evaluation only reads
/// the word keys and n-grams, so maps with single-key chords still load.
pub fn read_chord_map(path: &Path) -> Result<ChordMapDocument> {
    let file = File::open(path).map_err(|e| ChordError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| ChordError::json(path, e))
}

/// Checks that every chord has at least two keys and belongs to one word.
pub fn validate_chord_map(document: &ChordMapDocument) -> Result<()> {
    let mut seen = HashSet::new();
    for (word, chord) in &document.words {
        if chord.chars().count() < MIN_CHORD_KEYS {
            return Err(ChordError::InvalidChordMap(format!(
                "chord '{}' for '{}' has fewer than {} keys",
                chord, word, MIN_CHORD_KEYS
            )));
        }
        if !seen.insert(chord.as_str()) {
            return Err(ChordError::InvalidChordMap(format!(
                "chord '{}' is assigned to more than one word",
                chord
            )));
        }
    }
    Ok(())
}

/// Loads a chord map, rejecting chords shorter than two keys or shared by
/// two words.
pub fn load_chord_map(path: &Path) -> Result<ChordMapDocument> {
    let document = read_chord_map(path)?;
    validate_chord_map(&document)?;
    Ok(document)
}

pub fn save_snapshot(snapshot: &FrequencySnapshot, path: &Path) -> Result<()> {
    write_atomically(path, |writer| Ok(bincode::serialize_into(writer, snapshot)?))?;
    info!(path = %path.display(), "frequency snapshot saved");
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<FrequencySnapshot> {
    let file = File::open(path).map_err(|e| ChordError::io(path, e))?;
    let mut snapshot: FrequencySnapshot = bincode::deserialize_from(BufReader::new(file))?;
    snapshot.words.reindex();
    snapshot.ngrams.reindex();
    Ok(snapshot)
}

/// Writes the word stream as space-separated text, usable as an evaluation corpus.
pub fn save_corpus(words: &[Word], path: &Path) -> Result<()> {
    write_atomically(path, |writer| {
        writer.write_all(words.join(" ").as_bytes()).map_err(|e| ChordError::io(path, e))
    })
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| ChordError::io(path, e))
}
