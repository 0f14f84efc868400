//! Line tokenizer for scene scripts

use super::ScriptError;

/// Most numbers one statement can carry
pub const MAX_NUMBER_VALUES: usize = 64;

/// Longest string value in bytes
pub const MAX_STRING_LEN: usize = 255;

/// Values following a statement name
#[derive(Debug, Clone, PartialEq)]
pub enum AttribData {
    /// Number list; integers and hex values are widened to `f32`
    Numbers(Vec<f32>),
    /// Quoted string without its quotes
    Text(String),
}

impl Default for AttribData {
    fn default() -> Self {
        Self::Numbers(Vec::new())
    }
}

impl AttribData {
    /// Numbers, or `None` for a string value
    pub fn numbers(&self) -> Option<&[f32]> {
        match self {
            Self::Numbers(values) => Some(values),
            Self::Text(_) => None,
        }
    }

    /// String, or `None` for a number list
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Numbers(_) => None,
        }
    }
}

/// One parsed statement
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptEvent {
    /// `@type name`
    Create {
        /// Object type without the `@`
        type_name: String,
        /// Object name, empty when missing
        name: String,
    },
    /// `$name values...`
    Attribute {
        /// Attribute name without the `$`
        name: String,
        /// Attribute values
        data: AttribData,
    },
    /// `:name args...`
    Command {
        /// Command name without the `:`
        name: String,
        /// Command arguments
        args: AttribData,
    },
}

/// Parse one script line
///
/// Blank lines and lines starting with any other character yield `None`.
/// `line_number` is only used for error reporting.
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<ScriptEvent>, ScriptError> {
    let line = line.trim_end_matches('\r');
    let mut tokens = line.split_whitespace();
    let Some(head) = tokens.next() else {
        return Ok(None);
    };

    let mut chars = head.chars();
    let event = match chars.next() {
        Some('@') => ScriptEvent::Create {
            type_name: chars.as_str().to_string(),
            name: tokens.next().unwrap_or_default().to_string(),
        },
        Some('$') => ScriptEvent::Attribute {
            name: chars.as_str().to_string(),
            data: parse_values(tokens, line_number)?,
        },
        Some(':') => ScriptEvent::Command {
            name: chars.as_str().to_string(),
            args: parse_values(tokens, line_number)?,
        },
        _ => return Ok(None),
    };
    Ok(Some(event))
}

fn parse_values<'a>(tokens: impl Iterator<Item = &'a str>, line: usize) -> Result<AttribData, ScriptError> {
    let mut numbers = Vec::new();
    let mut text: Option<String> = None;

    for token in tokens {
        if let Some(quoted) = token.strip_prefix('"') {
            let value = quoted.strip_suffix('"').unwrap_or(quoted);
            if value.len() > MAX_STRING_LEN {
                return Err(ScriptError::ValueTooLarge {
                    line,
                    what: format!("attribute string too long '{value}'"),
                });
            }
            text = Some(value.to_string());
        } else if token.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.') {
            if numbers.len() >= MAX_NUMBER_VALUES {
                return Err(ScriptError::ValueTooLarge {
                    line,
                    what: "too many attribute values".to_string(),
                });
            }
            numbers.push(parse_number(token, line)?);
        } else {
            return Err(ScriptError::InvalidToken { line, token: token.to_string() });
        }
    }

    match text {
        Some(_) if !numbers.is_empty() => Err(ScriptError::MixedValues { line }),
        Some(text) => Ok(AttribData::Text(text)),
        None => Ok(AttribData::Numbers(numbers)),
    }
}

fn parse_number(token: &str, line: usize) -> Result<f32, ScriptError> {
    let invalid = || ScriptError::InvalidNumber { line, token: token.to_string() };

    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())? as f32;
        return Ok(if negative { -value } else { value });
    }

    token.parse::<f32>().map_err(|_| invalid())
}
