use include_dir::{include_dir, Dir};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::difficulty::DifficultyTable;
use crate::settings::Language;

static WORDS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/words");

const FALLBACK_EN: [&str; 3] = ["test", "word", "typing"];
const FALLBACK_RU: [&str; 3] = ["тест", "слово", "печать"];

/// Supplies words for new falling entities. Never fails.
pub trait WordCatalog {
    fn get_word(&mut self, language: Language, tier: u8) -> String;
}

/// Word lists read from `{lang}_{tier}.txt`, first from an optional
/// directory on disk, then from the lists built into the binary.
pub struct WordProvider {
    words_dir: Option<PathBuf>,
    cache: HashMap<(Language, u8), Vec<String>>,
    rng: StdRng,
}

impl WordProvider {
    pub fn new(words_dir: Option<PathBuf>) -> Self {
        Self {
            words_dir,
            cache: HashMap::new(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(words_dir: Option<PathBuf>, seed: u64) -> Self {
        Self {
            words_dir,
            cache: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Full list for a language and tier, loading it on first use
    pub fn words(&mut self, language: Language, tier: u8) -> &[String] {
        let tier = DifficultyTable::clamp_tier(tier);
        let words_dir = self.words_dir.as_deref();
        self.cache
            .entry((language, tier))
            .or_insert_with(|| load_words(words_dir, language, tier))
            .as_slice()
    }
}

impl Default for WordProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

impl WordCatalog for WordProvider {
    fn get_word(&mut self, language: Language, tier: u8) -> String {
        let tier = DifficultyTable::clamp_tier(tier);
        let words_dir = self.words_dir.as_deref();
        let words = self
            .cache
            .entry((language, tier))
            .or_insert_with(|| load_words(words_dir, language, tier));
        words
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| fallback_words(language).swap_remove(0))
    }
}

/// Hands out a fixed list of words in order, wrapping around.
/// Useful wherever spawns need to be predictable.
#[derive(Debug, Clone)]
pub struct SequenceCatalog {
    words: Vec<String>,
    next: usize,
}

impl SequenceCatalog {
    pub fn new<S: Into<String>>(words: impl IntoIterator<Item = S>) -> Self {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            next: 0,
        }
    }
}

impl WordCatalog for SequenceCatalog {
    fn get_word(&mut self, language: Language, _tier: u8) -> String {
        if self.words.is_empty() {
            return fallback_words(language).swap_remove(0);
        }
        let word = self.words[self.next % self.words.len()].clone();
        self.next += 1;
        word
    }
}

fn file_name(language: Language, tier: u8) -> String {
    format!("{}_{}.txt", language.code(), tier)
}

fn parse_words(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

fn load_words(words_dir: Option<&Path>, language: Language, tier: u8) -> Vec<String> {
    let name = file_name(language, tier);

    if let Some(dir) = words_dir {
        let path = dir.join(&name);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let words = parse_words(&contents);
                if !words.is_empty() {
                    return words;
                }
                log::debug!("word list {} is empty, using built-in list", path.display());
            }
            Err(e) => {
                log::debug!("cannot read word list {}: {e}", path.display());
            }
        }
    }

    let embedded = WORDS_DIR
        .get_file(&name)
        .and_then(|f| f.contents_utf8())
        .map(parse_words)
        .unwrap_or_default();
    if !embedded.is_empty() {
        return embedded;
    }

    log::debug!("no words for {name}, using fallback set");
    fallback_words(language)
}

pub fn fallback_words(language: Language) -> Vec<String> {
    let words: &[&str] = match language {
        Language::En => &FALLBACK_EN,
        Language::Ru => &FALLBACK_RU,
    };
    words.iter().map(|w| w.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_embedded_lists_exist_for_every_tier() {
        let mut provider = WordProvider::with_seed(None, 1);
        for language in [Language::Ru, Language::En] {
            for tier in 1..=3 {
                let words = provider.words(language, tier);
                assert!(!words.is_empty(), "{language} tier {tier} is empty");
                assert!(words.iter().all(|w| !w.trim().is_empty()));
            }
        }
    }

    #[test]
    fn test_get_word_comes_from_the_list() {
        let mut provider = WordProvider::with_seed(None, 7);
        let list = provider.words(Language::En, 2).to_vec();
        for _ in 0..20 {
            let word = provider.get_word(Language::En, 2);
            assert!(list.contains(&word));
        }
    }

    #[test]
    fn test_unknown_tier_uses_first_tier() {
        let mut provider = WordProvider::with_seed(None, 3);
        let first = provider.words(Language::Ru, 1).to_vec();
        assert_eq!(provider.words(Language::Ru, 42), first.as_slice());
    }

    #[test]
    fn test_words_dir_overrides_builtin() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("en_1.txt"), "alpha\n\n  beta  \n").unwrap();

        let mut provider = WordProvider::with_seed(Some(dir.path().to_path_buf()), 5);
        assert_eq!(provider.words(Language::En, 1), ["alpha", "beta"]);
    }

    #[test]
    fn test_missing_or_empty_file_falls_back_to_builtin() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("en_2.txt"), "\n   \n").unwrap();

        let mut provider = WordProvider::with_seed(Some(dir.path().to_path_buf()), 5);
        let mut builtin = WordProvider::with_seed(None, 5);
        assert_eq!(
            provider.words(Language::En, 2),
            builtin.words(Language::En, 2)
        );
        assert_eq!(
            provider.words(Language::Ru, 3),
            builtin.words(Language::Ru, 3)
        );
    }

    #[test]
    fn test_parse_words() {
        assert_eq!(parse_words("a\r\n b \n\nc"), vec!["a", "b", "c"]);
        assert!(parse_words("").is_empty());
    }

    #[test]
    fn test_fallback_words_are_never_empty() {
        assert_eq!(fallback_words(Language::En), vec!["test", "word", "typing"]);
        assert_eq!(fallback_words(Language::Ru).len(), 3);
    }

    #[test]
    fn test_sequence_catalog_wraps() {
        let mut catalog = SequenceCatalog::new(["one", "two"]);
        assert_eq!(catalog.get_word(Language::En, 1), "one");
        assert_eq!(catalog.get_word(Language::En, 1), "two");
        assert_eq!(catalog.get_word(Language::En, 1), "one");

        let mut empty = SequenceCatalog::new(Vec::<String>::new());
        assert_eq!(empty.get_word(Language::En, 1), "test");
    }
}
