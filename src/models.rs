use serde::{Deserialize, Serialize};

use crate::completions::CompletionStore;
use crate::habits::{Habit, HabitStore};
use crate::period::Frequency;

/// Both persisted documents, kept together so a habit delete and its
/// completion cleanup happen under one lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppData {
    pub habits: HabitStore,
    pub completions: CompletionStore,
}

impl AppData {
    pub fn new(habits: HabitStore, completions: CompletionStore) -> Self {
        Self { habits, completions }
    }

    /// Deletes the habit and every completion entry recorded for it.
    pub fn delete_habit(&mut self, habit_id: &str) -> Option<Habit> {
        let removed = self.habits.remove(habit_id)?;
        self.completions.remove_habit(habit_id);
        Some(removed)
    }

    /// Replaces every habit with the starter set and drops the completion
    /// entries of the replaced habits. Returns how many entries were dropped.
    pub fn reseed(&mut self) -> usize {
        let replaced: Vec<String> = self.habits.list().iter().map(|h| h.id.clone()).collect();
        self.habits.seed_samples();
        replaced
            .iter()
            .map(|id| self.completions.remove_habit(id))
            .sum()
    }

    /// Wipes all habits and history, then restores the starter habits.
    pub fn clear_all(&mut self) {
        self.habits.clear();
        self.completions.clear();
        self.habits.seed_samples();
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub habit_id: String,
    pub completed: bool,
}

/// Optional evaluation date for read endpoints (`YYYY-MM-DD`).
#[derive(Debug, Default, Deserialize)]
pub struct AtQuery {
    pub at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub frequencies: Option<String>,
    pub at: Option<String>,
}

/// Selected period of the page, carried in the query string and forms.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub period: String,
    pub period_key: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodStat {
    pub frequency: Frequency,
    pub total: usize,
    pub done: usize,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitEntry {
    #[serde(flatten)]
    pub habit: Habit,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodView {
    pub frequency: Frequency,
    pub period_key: String,
    pub label: String,
    pub title: String,
    pub habits: Vec<HabitEntry>,
}
