//! Dictionary module.
//!
//! Scans the sounds directory for `.wav` files and maps each file stem to its sound.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File extension recognised as a sound, compared case-insensitively.
const SOUND_EXTENSION: &str = ".wav";

/// One recognised key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    /// Absolute path of the sound file.
    pub sound_path: PathBuf,
    /// Picture for the key. Never populated yet.
    #[allow(dead_code)]
    pub picture_path: Option<PathBuf>,
}

/// Mapping from word key to entry. Built once at startup, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashMap<String, WordEntry>,
}

impl Dictionary {
    /// Loads every `*.wav` file directly inside `dir`.
    ///
    /// A missing or unreadable directory gives an empty dictionary.
    pub fn load(dir: &Path) -> Self {
        let mut dictionary = Self::default();

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Cannot read sounds directory {}: {}", dir.display(), e);
                return dictionary;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }

            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                log::warn!("Skipping non-UTF-8 file name {:?}", entry.file_name());
                continue;
            };

            if let Some(key) = word_key(file_name) {
                let sound_path = absolute(&entry.path());
                log::debug!("Word '{}' -> {}", key, sound_path.display());
                dictionary.insert(key, sound_path);
            }
        }

        dictionary
    }

    /// Adds or replaces an entry. The last insert for a key wins.
    pub fn insert(&mut self, key: impl Into<String>, sound_path: PathBuf) {
        self.words.insert(
            key.into(),
            WordEntry {
                sound_path,
                picture_path: None,
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<&WordEntry> {
        self.words.get(key)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates over the keys in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.words.keys().map(String::as_str)
    }
}

/// Strips a trailing `.wav` (any case) from `file_name`.
///
/// Returns `None` when the name has no such suffix or nothing is left before it.
fn word_key(file_name: &str) -> Option<&str> {
    let split = file_name.len().checked_sub(SOUND_EXTENSION.len())?;
    if !file_name.is_char_boundary(split) {
        return None;
    }
    let (stem, extension) = file_name.split_at(split);
    if !extension.eq_ignore_ascii_case(SOUND_EXTENSION) || stem.is_empty() {
        return None;
    }
    Some(stem)
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
