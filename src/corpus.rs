//! Word and prompt corpus loading.
//!
//! The dictionary is a newline-delimited word list. The prompt corpus is a JSON
//! array of `{"wpp", "infix", "words"}` records, either read from disk or
//! derived from the dictionary with [`build_prompts`]. Either file may be
//! gzip-compressed, in which case its name ends in `.gz`.

use crate::error::CorpusError;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

pub const EMBEDDED_DICTIONARY: &str = include_str!("resources/dictionary.txt");

/// File names looked up in the corpus directory, plain before compressed.
pub const DICTIONARY_FILE_NAMES: [&str; 2] = ["dictionary.txt", "dictionary.txt.gz"];
pub const PROMPTS_FILE_NAMES: [&str; 2] = ["prompts.json", "prompts.json.gz"];
const CORPUS_DIR_NAME: &str = "bomb-party";

/// Prompt lengths the generator considers by default.
pub const DEFAULT_PROMPT_LENGTHS: RangeInclusive<usize> = 2..=3;
/// Prompts matched by fewer words than this are not worth writing out.
pub const GENERATE_MIN_WORDS: u32 = 10;

/// A letter sequence the player must find inside a dictionary word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    #[serde(rename = "wpp")]
    frequency: u32,
    #[serde(rename = "infix")]
    text: String,
    #[serde(rename = "words")]
    examples: Vec<String>,
}

impl Prompt {
    pub fn new(text: impl Into<String>, frequency: u32, examples: Vec<String>) -> Self {
        Self {
            frequency,
            text: text.into(),
            examples,
        }
    }

    /// Number of dictionary words containing this prompt.
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    fn into_lowercase(self) -> Self {
        Self {
            frequency: self.frequency,
            text: self.text.to_lowercase(),
            examples: self.examples.iter().map(|w| w.to_lowercase()).collect(),
        }
    }
}

pub fn load_dictionary_from_str(data: &str) -> Vec<String> {
    data.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

/// Opens a corpus file for reading, decompressing it when the name ends in `.gz`.
fn open_corpus_file(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

pub fn load_dictionary_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, CorpusError> {
    let path = path.as_ref();
    let read_error = |source| CorpusError::Read {
        path: path.to_path_buf(),
        source,
    };
    let reader = open_corpus_file(path).map_err(read_error)?;
    let mut words = Vec::new();
    for line in reader.lines() {
        let word = line.map_err(read_error)?.trim().to_lowercase();
        if !word.is_empty() {
            words.push(word);
        }
    }
    Ok(words)
}

pub fn load_prompts_from_str(data: &str) -> Result<Vec<Prompt>, CorpusError> {
    let prompts: Vec<Prompt> = serde_json::from_str(data)?;
    Ok(prompts.into_iter().map(Prompt::into_lowercase).collect())
}

pub fn load_prompts_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Prompt>, CorpusError> {
    let path = path.as_ref();
    let read_error = |source| CorpusError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut data = String::new();
    open_corpus_file(path)
        .and_then(|mut reader| reader.read_to_string(&mut data))
        .map_err(read_error)?;
    load_prompts_from_str(&data)
}

/// Writes `prompts` as JSON, gzip-compressed when `path` ends in `.gz`.
pub fn write_prompts_to_file<P: AsRef<Path>>(
    path: P,
    prompts: &[Prompt],
) -> Result<(), CorpusError> {
    let path = path.as_ref();
    let write_error = |source| CorpusError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_error)?;
    if is_gzip(path) {
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        serde_json::to_writer(&mut encoder, prompts)?;
        encoder.finish().and_then(|mut w| w.flush()).map_err(write_error)
    } else {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, prompts)?;
        writer.flush().map_err(write_error)
    }
}

/// Derives a prompt corpus from a dictionary.
///
/// Every run of `lengths` consecutive ASCII lowercase letters found in a word
/// is a candidate. Its frequency is the number of distinct words containing it
/// and those words become its examples. Candidates below `min_words` are
/// dropped; the result is ordered by prompt text.
pub fn build_prompts(
    words: &[String],
    lengths: RangeInclusive<usize>,
    min_words: u32,
) -> Vec<Prompt> {
    let mut matches: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    for word in words {
        let chars: Vec<char> = word.chars().collect();
        for len in lengths.clone().filter(|&len| len > 0) {
            for window in chars.windows(len) {
                if window.iter().all(char::is_ascii_lowercase) {
                    matches
                        .entry(window.iter().collect())
                        .or_default()
                        .insert(word.as_str());
                }
            }
        }
    }

    matches
        .into_iter()
        .filter_map(|(text, containing)| {
            let frequency = u32::try_from(containing.len()).unwrap_or(u32::MAX);
            (frequency >= min_words).then(|| {
                Prompt::new(
                    text,
                    frequency,
                    containing.into_iter().map(str::to_owned).collect(),
                )
            })
        })
        .collect()
}

/// Where the dictionary comes from when none is given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionarySource {
    File(PathBuf),
    Embedded,
}

impl DictionarySource {
    pub fn load(&self) -> Result<Vec<String>, CorpusError> {
        match self {
            Self::File(path) => load_dictionary_from_file(path),
            Self::Embedded => Ok(load_dictionary_from_str(EMBEDDED_DICTIONARY)),
        }
    }
}

impl std::fmt::Display for DictionarySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Embedded => f.write_str("built-in sample dictionary"),
        }
    }
}

/// Per-user directory holding `dictionary.txt` and `prompts.json`.
pub fn default_corpus_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(CORPUS_DIR_NAME))
}

pub fn resolve_dictionary(explicit: Option<&Path>, corpus_dir: Option<&Path>) -> DictionarySource {
    if let Some(path) = explicit {
        return DictionarySource::File(path.to_path_buf());
    }
    corpus_dir
        .and_then(|dir| find_corpus_file(dir, &DICTIONARY_FILE_NAMES))
        .map_or(DictionarySource::Embedded, DictionarySource::File)
}

/// `None` means the prompts should be generated from the dictionary.
pub fn resolve_prompts(explicit: Option<&Path>, corpus_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    corpus_dir.and_then(|dir| find_corpus_file(dir, &PROMPTS_FILE_NAMES))
}

fn find_corpus_file(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| (*w).to_string()).collect()
    }

    #[test]
    fn test_load_dictionary_from_str_normalizes() {
        let dictionary = load_dictionary_from_str("Planet\n  plant \n\nZEBRA\r\n");
        assert_eq!(dictionary, words(&["planet", "plant", "zebra"]));
    }

    #[test]
    fn test_embedded_dictionary_is_clean() {
        let dictionary = load_dictionary_from_str(EMBEDDED_DICTIONARY);
        assert!(dictionary.len() > 1000);
        assert!(
            dictionary
                .iter()
                .all(|w| w.chars().all(|c| c.is_ascii_lowercase()))
        );
    }

    #[test]
    fn test_load_prompts_from_str() {
        let json = r#"[{"wpp": 120, "infix": "AN", "words": ["Plant", "banana"]}]"#;
        let prompts = load_prompts_from_str(json).unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].frequency(), 120);
        assert_eq!(prompts[0].text(), "an");
        assert_eq!(prompts[0].examples(), &words(&["plant", "banana"])[..]);
    }

    #[test]
    fn test_load_prompts_rejects_malformed_json() {
        let result = load_prompts_from_str(r#"[{"wpp": -1, "infix": "an"}]"#);
        assert!(matches!(result, Err(CorpusError::Json(_))));
    }

    #[test]
    fn test_load_dictionary_missing_file() {
        let path = std::env::temp_dir().join("bomb_party_missing_dictionary.txt");
        let _ = fs::remove_file(&path);
        match load_dictionary_from_file(&path) {
            Err(CorpusError::Read { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("Expected read error, got {other:?}"),
        }
    }

    #[test]
    fn test_build_prompts_counts_distinct_words() {
        let dictionary = words(&["planet", "plant", "plan", "plant", "apple"]);
        let prompts = build_prompts(&dictionary, 2..=3, 1);

        let pla = prompts.iter().find(|p| p.text() == "pla").unwrap();
        assert_eq!(pla.frequency(), 3);
        assert_eq!(pla.examples(), &words(&["plan", "planet", "plant"])[..]);

        let pl = prompts.iter().find(|p| p.text() == "pl").unwrap();
        assert_eq!(pl.frequency(), 4);
    }

    #[test]
    fn test_build_prompts_applies_min_words_and_orders_by_text() {
        let dictionary = words(&["planet", "plant", "apple"]);
        let prompts = build_prompts(&dictionary, 2..=2, 2);
        let texts: Vec<&str> = prompts.iter().map(Prompt::text).collect();
        assert_eq!(texts, vec!["an", "la", "pl"]);
    }

    #[test]
    fn test_build_prompts_skips_non_letter_runs() {
        let dictionary = words(&["e-mail", "o'clock"]);
        let prompts = build_prompts(&dictionary, 2..=2, 1);
        assert!(prompts.iter().all(|p| p.text().chars().all(|c| c.is_ascii_lowercase())));
        assert!(prompts.iter().any(|p| p.text() == "ma"));
        assert!(!prompts.iter().any(|p| p.text().contains('-')));
    }

    #[test]
    fn test_write_then_load_prompts_file() {
        let path = std::env::temp_dir().join("bomb_party_corpus_unit_test.json");
        let prompts = vec![Prompt::new("an", 2, words(&["plant", "banana"]))];

        write_prompts_to_file(&path, &prompts).unwrap();
        let loaded = load_prompts_from_file(&path).unwrap();
        assert_eq!(loaded, prompts);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_gzipped_dictionary() {
        let path = std::env::temp_dir().join("bomb_party_dictionary_unit_test.txt.gz");
        {
            let file = File::create(&path).unwrap();
            let mut encoder = GzEncoder::new(file, Compression::default());
            encoder.write_all(b"Planet\nplant\n\n").unwrap();
            encoder.finish().unwrap();
        }

        let dictionary = load_dictionary_from_file(&path).unwrap();
        assert_eq!(dictionary, words(&["planet", "plant"]));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_then_load_gzipped_prompts_file() {
        let path = std::env::temp_dir().join("bomb_party_corpus_unit_test.json.gz");
        let prompts = vec![
            Prompt::new("an", 2, words(&["plant", "banana"])),
            Prompt::new("pla", 1, words(&["plant"])),
        ];

        write_prompts_to_file(&path, &prompts).unwrap();
        let raw = fs::read(&path).unwrap();
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);

        let loaded = load_prompts_from_file(&path).unwrap();
        assert_eq!(loaded, prompts);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_plain_file_with_gz_name_is_a_read_error() {
        let path = std::env::temp_dir().join("bomb_party_not_really_gzip.txt.gz");
        fs::write(&path, "planet\n").unwrap();

        assert!(matches!(
            load_dictionary_from_file(&path),
            Err(CorpusError::Read { .. })
        ));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_resolve_finds_gzipped_corpus_in_dir() {
        let dir = std::env::temp_dir().join("bomb_party_gz_corpus_dir");
        fs::create_dir_all(&dir).unwrap();
        let dictionary = dir.join("dictionary.txt.gz");
        let prompts = dir.join("prompts.json.gz");
        fs::write(&dictionary, "").unwrap();
        fs::write(&prompts, "").unwrap();

        assert_eq!(
            resolve_dictionary(None, Some(&dir)),
            DictionarySource::File(dictionary.clone())
        );
        assert_eq!(resolve_prompts(None, Some(&dir)), Some(prompts.clone()));

        fs::remove_file(&dictionary).unwrap();
        fs::remove_file(&prompts).unwrap();
    }

    #[test]
    fn test_resolve_dictionary_prefers_explicit_path() {
        let explicit = Path::new("/tmp/words.txt");
        assert_eq!(
            resolve_dictionary(Some(explicit), None),
            DictionarySource::File(explicit.to_path_buf())
        );
    }

    #[test]
    fn test_resolve_falls_back_when_corpus_dir_empty() {
        let dir = std::env::temp_dir().join("bomb_party_empty_corpus_dir");
        let _ = fs::create_dir_all(&dir);
        assert_eq!(resolve_dictionary(None, Some(&dir)), DictionarySource::Embedded);
        assert_eq!(resolve_prompts(None, Some(&dir)), None);
        assert_eq!(resolve_dictionary(None, None), DictionarySource::Embedded);
    }
}
