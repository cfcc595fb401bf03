//! Question bank
//!
//! Categories of charades prompts, read from a JSON object keyed by category
//! name with string-array values. Category order follows the file.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StorageError;

/// Name used for the all-categories round
pub const RANDOM_CHALLENGE: &str = "Random Challenge";
/// Bank file looked for next to the executable's working directory
pub const DEFAULT_BANK_FILE: &str = "words.json";

/// A named list of prompts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionBank {
    categories: Vec<Category>,
}

impl Default for QuestionBank {
    /// Built-in fallback when no bank file is available
    fn default() -> Self {
        Self {
            categories: vec![Category {
                name: "Default".to_string(),
                questions: vec![
                    "Apple".to_string(),
                    "Banana".to_string(),
                    "Watermelon".to_string(),
                ],
            }],
        }
    }
}

impl QuestionBank {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Parse a bank document. Non-string entries inside a category are
    /// rejected along with the whole document.
    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let map: Map<String, Value> = serde_json::from_str(json)?;
        let mut categories = Vec::with_capacity(map.len());
        for (name, value) in map {
            let questions: Vec<String> = serde_json::from_value(value)?;
            categories.push(Category { name, questions });
        }
        Ok(Self { categories })
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Load from `path`, falling back to the built-in bank if the file is
    /// missing or unreadable
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(bank) => {
                log::info!(
                    "Loaded {} categories from {}",
                    bank.categories.len(),
                    path.display()
                );
                bank
            }
            Err(e) => {
                log::warn!("Using built-in question bank ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.questions.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Every question of every category, in bank order
    pub fn all_questions(&self) -> Vec<String> {
        self.categories
            .iter()
            .flat_map(|c| c.questions.iter().cloned())
            .collect()
    }

    /// Questions for the all-categories round. Prompts listed under more than
    /// one category appear once.
    pub fn random_challenge(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.all_questions()
            .into_iter()
            .filter(|q| seen.insert(q.clone()))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        let map: Map<String, Value> = self
            .categories
            .iter()
            .map(|c| (c.name.clone(), Value::from(c.questions.clone())))
            .collect();
        Ok(serde_json::to_string_pretty(&map)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "Animals": ["Cat", "Dog", "Owl"],
        "Food": ["Pizza", "Sushi"],
        "Night": ["Owl", "Moon"]
    }"#;

    #[test]
    fn test_parse_keeps_file_order() {
        let bank = QuestionBank::from_json(SAMPLE).unwrap();
        let names: Vec<&str> = bank.names().collect();
        assert_eq!(names, vec!["Animals", "Food", "Night"]);
        assert_eq!(bank.get("Food").unwrap(), ["Pizza", "Sushi"]);
        assert!(bank.get("Sports").is_none());
    }

    #[test]
    fn test_random_challenge_drops_duplicates() {
        let bank = QuestionBank::from_json(SAMPLE).unwrap();
        assert_eq!(bank.all_questions().len(), 7);
        assert_eq!(
            bank.random_challenge(),
            vec!["Cat", "Dog", "Owl", "Pizza", "Sushi", "Moon"]
        );
    }

    #[test]
    fn test_rejects_malformed_documents() {
        assert!(QuestionBank::from_json("[1, 2]").is_err());
        assert!(QuestionBank::from_json(r#"{"Numbers": [1, 2]}"#).is_err());
        assert!(QuestionBank::from_json("not json").is_err());
    }

    #[test]
    fn test_load_falls_back_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let bank = QuestionBank::load(dir.path().join("words.json"));
        assert_eq!(bank, QuestionBank::default());
    }

    #[test]
    fn test_load_falls_back_when_corrupt() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ broken").unwrap();
        assert_eq!(QuestionBank::load(file.path()), QuestionBank::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let bank = QuestionBank::load(file.path());
        assert_eq!(bank.categories().len(), 3);
    }

    #[test]
    fn test_json_written_back_reads_the_same() {
        let bank = QuestionBank::from_json(SAMPLE).unwrap();
        let json = bank.to_json().unwrap();
        assert_eq!(QuestionBank::from_json(&json).unwrap(), bank);
    }
}
