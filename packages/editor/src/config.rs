use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::charset::Charset;
use crate::codec::{CodeCharactersCase, CodeType};
use crate::errors::EditorError;
use crate::undo_stack::UndoLimits;

pub const DEFAULT_CONFIG_NAME: &str = "bined.config.json";

/// How typed input is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditOperation {
    #[default]
    Insert,
    Overwrite,
}

/// What kinds of changes the document accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditMode {
    ReadOnly,
    /// Any edit, the document may grow and shrink
    #[default]
    Expanding,
    /// Only overwrites that keep the document size
    InPlace,
}

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    #[serde(default)]
    pub code_type: CodeType,

    #[serde(default)]
    pub code_characters_case: CodeCharactersCase,

    #[serde(default)]
    pub charset: Charset,

    #[serde(default)]
    pub edit_operation: EditOperation,

    #[serde(default)]
    pub edit_mode: EditMode,

    #[serde(default)]
    pub undo: UndoLimits,
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults when absent
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json_str(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            code_type: CodeType::Hexadecimal,
            code_characters_case: CodeCharactersCase::Upper,
            charset: Charset::Utf8,
            edit_operation: EditOperation::Insert,
            edit_mode: EditMode::Expanding,
            undo: UndoLimits::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "codeType": "octal",
            "codeCharactersCase": "lower",
            "charset": "utf16-le",
            "editOperation": "overwrite",
            "editMode": "inPlace",
            "undo": { "maxCount": 10, "maxSize": 4096 }
        }"#;

        let config = EditorConfig::from_json_str(json).unwrap();
        assert_eq!(config.code_type, CodeType::Octal);
        assert_eq!(config.code_characters_case, CodeCharactersCase::Lower);
        assert_eq!(config.charset, Charset::Utf16Le);
        assert_eq!(config.edit_operation, EditOperation::Overwrite);
        assert_eq!(config.edit_mode, EditMode::InPlace);
        assert_eq!(config.undo, UndoLimits { max_count: 10, max_size: 4096 });
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = EditorConfig::from_json_str(r#"{ "undo": { "maxSize": 64 } }"#).unwrap();
        assert_eq!(config.code_type, CodeType::Hexadecimal);
        assert_eq!(config.edit_mode, EditMode::Expanding);
        assert_eq!(config.undo.max_count, 1024);
        assert_eq!(config.undo.max_size, 64);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(EditorConfig::load(dir.path()).unwrap(), EditorConfig::default());

        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "codeType": "binary" }"#,
        )
        .unwrap();
        assert_eq!(EditorConfig::load(dir.path()).unwrap().code_type, CodeType::Binary);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let result = EditorConfig::from_json_str(r#"{ "codeType": "base64" }"#);
        assert!(matches!(result, Err(EditorError::Config(_))));
    }
}
