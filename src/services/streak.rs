use chrono::{DateTime, TimeZone, Utc};

use crate::models::habit::Habit;

/// Compute the next state of a habit for a completion toggle.
///
/// `now` carries the time zone used for the day-boundary check. Production
/// callers pass `Local::now()`, so "today" is the calendar day of the
/// evaluating process. The function is pure; committing the result to the
/// store is the caller's job, as is resolving the habit from the latest
/// snapshot beforehand.
///
/// Streak rules:
/// - completing on a fresh calendar day increments the streak
/// - un-completing on the same day as the prior completion decrements it,
///   floored at zero
/// - completing again on an already-completed day, or un-completing a stale
///   flag from an earlier day, leaves the streak alone
pub fn apply_completion_toggle<Tz: TimeZone>(
    current: &Habit,
    completed: bool,
    now: DateTime<Tz>,
) -> Habit {
    let is_new_day = match current.last_completed {
        None => true,
        Some(last) => last.with_timezone(&now.timezone()).date_naive() != now.date_naive(),
    };

    let streak = if completed && is_new_day {
        current.streak + 1
    } else if !completed && !is_new_day {
        // Undoing today's completion must not punish progress earned on
        // earlier days, hence the stale-flag case above leaves it unchanged.
        (current.streak - 1).max(0)
    } else {
        current.streak
    };

    Habit {
        streak,
        completed_today: completed,
        last_completed: completed.then(|| now.with_timezone(&Utc)),
        ..current.clone()
    }
}
