use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::period::Frequency;

/// habit id -> done flag for one period instance.
pub type PeriodCompletions = BTreeMap<String, bool>;

/// frequency -> period key -> habit id -> done.
///
/// A missing entry at any level reads as "not completed". Frequency keys are
/// the lowercase names so the document matches what earlier versions wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionStore {
    by_frequency: BTreeMap<String, BTreeMap<String, PeriodCompletions>>,
}

impl CompletionStore {
    pub fn is_completed(&self, frequency: Frequency, period_key: &str, habit_id: &str) -> bool {
        self.by_frequency
            .get(frequency.as_str())
            .and_then(|periods| periods.get(period_key))
            .and_then(|habits| habits.get(habit_id))
            .copied()
            .unwrap_or(false)
    }

    /// Completion flags recorded for one period instance, empty if none.
    pub fn period(&self, frequency: Frequency, period_key: &str) -> PeriodCompletions {
        self.by_frequency
            .get(frequency.as_str())
            .and_then(|periods| periods.get(period_key))
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_completed(
        &mut self,
        frequency: Frequency,
        period_key: &str,
        habit_id: &str,
        done: bool,
    ) -> &PeriodCompletions {
        let habits = self
            .by_frequency
            .entry(frequency.as_str().to_string())
            .or_default()
            .entry(period_key.to_string())
            .or_default();
        habits.insert(habit_id.to_string(), done);
        habits
    }

    pub fn clear_period(&mut self, frequency: Frequency, period_key: &str) {
        self.by_frequency
            .entry(frequency.as_str().to_string())
            .or_default()
            .insert(period_key.to_string(), PeriodCompletions::new());
    }

    /// Drops `habit_id` from every period of every frequency. Returns how many
    /// entries were removed.
    pub fn remove_habit(&mut self, habit_id: &str) -> usize {
        let mut removed = 0;
        for periods in self.by_frequency.values_mut() {
            for habits in periods.values_mut() {
                if habits.remove(habit_id).is_some() {
                    removed += 1;
                }
            }
        }
        removed
    }

    pub fn clear(&mut self) {
        self.by_frequency.clear();
    }
}
