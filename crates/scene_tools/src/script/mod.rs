//! Scene script reading
//!
//! Scene scripts are line based. The first character of a line selects the
//! statement kind:
//!
//! - `@type name` creates an object of a registered type
//! - `$attr values...` sets an attribute on the current object
//! - `:cmd args...` runs a command on the current object
//!
//! Values are numbers (starting with a digit, `-` or `.`) or a single
//! quoted string. [`parser`] turns lines into [`ScriptEvent`]s and
//! [`reader`] folds the events for `dblock` and `camera` objects back into a
//! [`SceneDocument`](crate::export::SceneDocument).

pub mod parser;
pub mod reader;

pub use parser::{parse_line, AttribData, ScriptEvent, MAX_NUMBER_VALUES, MAX_STRING_LEN};
pub use reader::SceneScriptReader;

use std::path::PathBuf;
use thiserror::Error;

/// Scene script errors
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The script file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Script path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A value token is neither a number nor a quoted string
    #[error("line {line}: invalid character in script token '{token}'")]
    InvalidToken {
        /// 1-based line number
        line: usize,
        /// Offending token
        token: String,
    },

    /// A number token could not be converted
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber {
        /// 1-based line number
        line: usize,
        /// Offending token
        token: String,
    },

    /// Too many numbers or too long a string on one line
    #[error("line {line}: {what}")]
    ValueTooLarge {
        /// 1-based line number
        line: usize,
        /// Which limit was exceeded
        what: String,
    },

    /// Numbers and a string on the same line
    #[error("line {line}: numbers and strings cannot be mixed")]
    MixedValues {
        /// 1-based line number
        line: usize,
    },
}

impl ScriptError {
    /// Line the error was found on, if it came from a script line
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Io { .. } => None,
            Self::InvalidToken { line, .. }
            | Self::InvalidNumber { line, .. }
            | Self::ValueTooLarge { line, .. }
            | Self::MixedValues { line } => Some(*line),
        }
    }
}
