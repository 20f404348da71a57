use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidSetFormat(String),

    #[error("Invalid {kind} value for '{key}': '{value}'")]
    InvalidValue {
        key: String,
        value: String,
        kind: &'static str,
    },

    #[error("Cell must have exactly 3 lengths, got {0}")]
    InvalidCellLength(usize),
}

/// Splits a `KEY=VALUE` override at the first `=`. Keys are trimmed; values are kept
/// verbatim so that keyword strings may contain `=` themselves.
pub fn parse_set_value(kv_pair: &str) -> Result<(&str, &str), ParseError> {
    match kv_pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(ParseError::InvalidSetFormat(kv_pair.to_string())),
    }
}

/// Parses a typed override value, reporting the key on failure.
pub fn parse_value<T: std::str::FromStr>(
    key: &str,
    value: &str,
    kind: &'static str,
) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        kind,
    })
}

/// Parses cell lengths given as `a,b,c` (spaces allowed).
pub fn parse_cell(value: &str) -> Result<[f64; 3], ParseError> {
    let lengths = value
        .split([',', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| parse_value::<f64>("cell", part, "float"))
        .collect::<Result<Vec<_>, _>>()?;
    cell_from_slice(&lengths)
}

pub fn cell_from_slice(lengths: &[f64]) -> Result<[f64; 3], ParseError> {
    <[f64; 3]>::try_from(lengths).map_err(|_| ParseError::InvalidCellLength(lengths.len()))
}
