// src/grading/answer_key.rs

use super::GradingError;

/// Converts a single answer letter into a 0-based alternative index.
///
/// Surrounding whitespace is ignored and the letter is case-insensitive.
/// Returns `None` for anything that is not exactly one ASCII letter.
pub fn letter_index(letter: &str) -> Option<usize> {
    let mut chars = letter.trim().chars();
    let first = chars.next()?;
    if chars.next().is_some() || !first.is_ascii_alphabetic() {
        return None;
    }
    Some((first.to_ascii_uppercase() as u8 - b'A') as usize)
}

/// Resolves a question's stored answer key against its alternatives.
///
/// Fails with `InvalidAnswerKey` when the key is not a letter or points past
/// the last alternative.
pub fn resolve_answer_key(
    question_id: i64,
    alternatives: &[String],
    key: &str,
) -> Result<usize, GradingError> {
    match letter_index(key) {
        Some(index) if index < alternatives.len() => Ok(index),
        _ => Err(GradingError::InvalidAnswerKey {
            question_id,
            key: key.to_string(),
        }),
    }
}

/// Resolves a submitted answer. Missing, blank, or malformed answers count as no selection.
pub fn resolve_submitted(answer: Option<&str>) -> Option<usize> {
    answer.and_then(letter_index)
}
