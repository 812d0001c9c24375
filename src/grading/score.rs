// src/grading/score.rs

use super::GradingError;

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Grade on a 0–10 scale, unrounded.
///
/// `total` must be positive; a zero total is reported as `EmptyQuestionSet`
/// for `quiz_id` instead of producing NaN. Callers round with [`round2`]
/// only when presenting a single grade, so averages see the exact value.
pub fn grade_on_ten(quiz_id: i64, correct: usize, total: usize) -> Result<f64, GradingError> {
    if total == 0 {
        return Err(GradingError::EmptyQuestionSet(quiz_id));
    }
    Ok(correct as f64 / total as f64 * 10.0)
}

/// Formats a grade for display, e.g. `6.50`.
pub fn format_grade(grade: f64) -> String {
    format!("{:.2}", grade)
}

/// Formats a ratio in percent with a trailing `%`, e.g. `65.00%`.
/// A zero denominator yields `0.00%`.
pub fn format_percentage(numerator: i64, denominator: i64) -> String {
    let percentage = if denominator > 0 {
        numerator as f64 / denominator as f64 * 100.0
    } else {
        0.0
    };
    format!("{:.2}%", percentage)
}
