use crate::models::{AppData, HabitEntry, PeriodStat, PeriodView};
use crate::period::{Frequency, friendly_label, period_key};
use chrono::NaiveDate;

/// Completion totals for the period instance containing `now`, one entry per
/// requested frequency in the order given.
pub fn dashboard_stats(data: &AppData, frequencies: &[Frequency], now: NaiveDate) -> Vec<PeriodStat> {
    frequencies
        .iter()
        .map(|&frequency| {
            let key = period_key(frequency, now);
            let mut total = 0usize;
            let mut done = 0usize;
            for habit in data.habits.list().iter().filter(|h| h.frequency == frequency) {
                total += 1;
                if data.completions.is_completed(frequency, &key, &habit.id) {
                    done += 1;
                }
            }

            PeriodStat {
                frequency,
                total,
                done,
                percent: percent(done, total),
            }
        })
        .collect()
}

fn percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (done as f64 / total as f64 * 100.0).round() as u32
}

/// Habits of one frequency with their completion flag for the period
/// containing `now`, earliest time of day first. Habits without a time sort
/// as midnight; ties keep insertion order.
pub fn period_view(data: &AppData, frequency: Frequency, now: NaiveDate) -> PeriodView {
    let key = period_key(frequency, now);
    let mut habits: Vec<HabitEntry> = data
        .habits
        .list()
        .iter()
        .filter(|habit| habit.frequency == frequency)
        .map(|habit| HabitEntry {
            completed: data.completions.is_completed(frequency, &key, &habit.id),
            habit: habit.clone(),
        })
        .collect();
    habits.sort_by_key(|entry| entry.habit.minute_of_day());

    PeriodView {
        frequency,
        label: friendly_label(frequency, now),
        title: frequency.title().to_string(),
        period_key: key,
        habits,
    }
}
