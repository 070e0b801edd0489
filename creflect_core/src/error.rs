use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CreflectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("unsupported flag `{flag}` (line {line})")]
    UnsupportedFlag { flag: String, line: usize },

    #[error("flag `{flag}` requires an argument (line {line})")]
    MissingFlagArgument { flag: String, line: usize },

    #[error("unknown case style `{style}` (line {line})")]
    UnknownCaseStyle { style: String, line: usize },

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, CreflectError>;

impl CreflectError {
    pub fn read_input(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CreflectError::ReadInput {
            path: path.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        CreflectError::Config(message.into())
    }

    pub fn unsupported_flag(flag: impl Into<String>, line: usize) -> Self {
        CreflectError::UnsupportedFlag {
            flag: flag.into(),
            line,
        }
    }

    pub fn missing_flag_argument(flag: impl Into<String>, line: usize) -> Self {
        CreflectError::MissingFlagArgument {
            flag: flag.into(),
            line,
        }
    }

    pub fn unknown_case_style(style: impl Into<String>, line: usize) -> Self {
        CreflectError::UnknownCaseStyle {
            style: style.into(),
            line,
        }
    }
}
