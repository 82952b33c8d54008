//! Error types for dungeon population and data loading.

use thiserror::Error;

/// Errors returned by the population pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DungeonError {
    /// A new layout arrived while a previous one is still being populated.
    #[error("Dungeon population already in progress")]
    Busy,

    /// `clear_room` was asked for an active room that does not exist.
    #[error("Active room index {index} out of range (have {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors that can occur when loading RON data files.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },
}

/// Read and parse a RON data file.
pub fn load_ron<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, DataLoadError> {
    let file = std::path::Path::new(path);
    if !file.exists() {
        return Err(DataLoadError::FileNotFound(path.to_string()));
    }
    let contents = std::fs::read_to_string(file).map_err(|e| DataLoadError::ReadError {
        path: path.to_string(),
        details: e.to_string(),
    })?;
    ron::from_str(&contents).map_err(|e| DataLoadError::ParseError {
        path: path.to_string(),
        details: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported() {
        let result: Result<u32, _> = load_ron("assets/data/does_not_exist.ron");
        assert!(matches!(result, Err(DataLoadError::FileNotFound(_))));
    }

    #[test]
    fn index_error_names_bounds() {
        let err = DungeonError::IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "Active room index 4 out of range (have 2)");
    }
}
