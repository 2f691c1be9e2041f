//! Filename splitter.
//!
//! A valid filename has the shape `<head>.<tail>`: it is not blank, holds at
//! least one dot, and its first two dot-separated segments are both non-blank
//! with no space touching the dot between them. Acceptance looks only at the
//! first two segments, while extraction splits at the *last* dot, so
//! `a.b.c.pdf` has stem `a.b.c` and extension `pdf`.

use crate::error::ContractError;

/// Returns `true` when `name` has the `<head>.<tail>` shape.
pub fn is_valid_file_name(name: &str) -> bool {
    if is_blank(name) {
        return false;
    }

    let mut segments = name.split('.');
    let (Some(head), Some(tail)) = (segments.next(), segments.next()) else {
        // No dot at all.
        return false;
    };

    !is_blank(head) && !is_blank(tail) && !head.ends_with(' ') && !tail.starts_with(' ')
}

/// Split a valid filename at its last dot into `(stem, ext)`.
pub fn split_file_name(name: &str) -> Result<(&str, &str), ContractError> {
    if !is_valid_file_name(name) {
        return Err(ContractError::InvalidFileName(name.to_string()));
    }
    name.rsplit_once('.')
        .ok_or_else(|| ContractError::InvalidFileName(name.to_string()))
}

/// `true` when `s` is empty or made only of Unicode `White_Space`
/// characters, the set `str::trim` strips. That set includes no-break
/// spaces, so `"\u{a0}"` is blank.
pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
