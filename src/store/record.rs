use thiserror::Error;

pub const FIELD_DELIMITER: char = '|';

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("expected {expected} '|'-separated fields, found {found}")]
pub struct FieldCountError {
    pub expected: usize,
    pub found: usize,
}

/// Split a stored line into exactly `N` trimmed fields.
pub fn split_fields<const N: usize>(line: &str) -> Result<[&str; N], FieldCountError> {
    let fields: Vec<&str> = line
        .trim_end_matches(['\r', '\n'])
        .split(FIELD_DELIMITER)
        .map(str::trim)
        .collect();
    <[&str; N]>::try_from(fields).map_err(|fields| FieldCountError {
        expected: N,
        found: fields.len(),
    })
}
