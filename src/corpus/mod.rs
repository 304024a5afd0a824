//! Corpus loading: one JSON file holding a `questions` array

pub mod schema;

pub use schema::{canonicalize_question, coerce_difficulty, parse_item, topic_list};

use crate::QuizItem;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a corpus file could not be linted
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: top level is not a JSON object", path.display())]
    NotARecord { path: PathBuf },

    #[error("{}: no questions array", path.display())]
    MissingQuestions { path: PathBuf },
}

impl CorpusError {
    pub fn path(&self) -> &Path {
        match self {
            CorpusError::Read { path, .. }
            | CorpusError::InvalidJson { path, .. }
            | CorpusError::NotARecord { path }
            | CorpusError::MissingQuestions { path } => path,
        }
    }
}

/// A loaded quiz bank
#[derive(Debug, Clone)]
pub struct Corpus {
    pub path: PathBuf,
    pub items: Vec<QuizItem>,
}

impl Corpus {
    /// Read and parse a corpus file
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let content = fs::read_to_string(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Parse corpus text; `path` is only used for reporting
    pub fn parse(path: &Path, content: &str) -> Result<Self, CorpusError> {
        let value: Value =
            serde_json::from_str(content).map_err(|source| CorpusError::InvalidJson {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_value(path, &value)
    }

    pub fn from_value(path: &Path, value: &Value) -> Result<Self, CorpusError> {
        let obj = value.as_object().ok_or_else(|| CorpusError::NotARecord {
            path: path.to_path_buf(),
        })?;
        let questions = obj
            .get("questions")
            .and_then(Value::as_array)
            .ok_or_else(|| CorpusError::MissingQuestions {
                path: path.to_path_buf(),
            })?;

        let items = questions
            .iter()
            .enumerate()
            .map(|(i, q)| parse_item(i, q))
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            items,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
