//! Pure round rules: the per-round timer and the question rotation.

/// Seconds left on a timer of `duration_secs` that started at `start_time`.
///
/// Floored at zero, so a round that expired long ago reports `0` rather than a
/// negative value.
pub fn seconds_left(start_time: i64, duration_secs: i64, now: i64) -> i64 {
    let elapsed = now - start_time;
    (duration_secs - elapsed).max(0)
}

/// Question for 1-based round `number`, cycling through `questions`
pub fn question_for_round(questions: &[String], number: u32) -> Option<&str> {
    if questions.is_empty() || number == 0 {
        return None;
    }
    let idx = (number as usize - 1) % questions.len();
    Some(questions[idx].as_str())
}

/// Whether advancing to round `next` runs past the configured game length
pub fn is_game_over(next: u32, total_rounds: u32) -> bool {
    next > total_rounds
}
