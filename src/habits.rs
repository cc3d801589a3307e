use chrono::{NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;
use crate::period::Frequency;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    #[serde(default)]
    pub trigger: String,
    /// 24-hour "HH:MM".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub action: String,
    pub goal: String,
    pub frequency: Frequency,
    /// Milliseconds since the Unix epoch. Informational only.
    #[serde(default)]
    pub created_at: i64,
}

impl Habit {
    /// Minutes since midnight, 0 when the habit has no usable time.
    pub fn minute_of_day(&self) -> u32 {
        self.time
            .as_deref()
            .and_then(parse_time)
            .map(|time| time.hour() * 60 + time.minute())
            .unwrap_or(0)
    }
}

/// Unvalidated habit fields as submitted by a client or the page form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HabitDraft {
    #[serde(default)]
    pub trigger: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub frequency: String,
}

impl HabitDraft {
    pub fn new(
        trigger: &str,
        time: &str,
        action: &str,
        goal: &str,
        frequency: Frequency,
    ) -> Self {
        Self {
            trigger: trigger.to_string(),
            time: Some(time.to_string()),
            action: action.to_string(),
            goal: goal.to_string(),
            frequency: frequency.as_str().to_string(),
        }
    }

    fn into_habit(self) -> Result<Habit, ValidationError> {
        let action = self.action.trim();
        if action.is_empty() {
            return Err(ValidationError::MissingField("action"));
        }
        let goal = self.goal.trim();
        if goal.is_empty() {
            return Err(ValidationError::MissingField("goal"));
        }
        if self.frequency.trim().is_empty() {
            return Err(ValidationError::MissingField("frequency"));
        }
        let frequency = self.frequency.parse::<Frequency>()?;

        let time = match self.time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let parsed =
                    parse_time(raw).ok_or_else(|| ValidationError::InvalidTime(raw.to_string()))?;
                Some(parsed.format("%H:%M").to_string())
            }
        };

        Ok(Habit {
            id: Uuid::new_v4().to_string(),
            trigger: self.trigger.trim().to_string(),
            time,
            action: action.to_string(),
            goal: goal.to_string(),
            frequency,
            created_at: Utc::now().timestamp_millis(),
        })
    }
}

pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

/// Habits in insertion order. Serialized as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitStore {
    habits: Vec<Habit>,
}

impl HabitStore {
    pub fn list(&self) -> &[Habit] {
        &self.habits
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn get(&self, habit_id: &str) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == habit_id)
    }

    pub fn add(&mut self, draft: HabitDraft) -> Result<Habit, ValidationError> {
        let habit = draft.into_habit()?;
        self.habits.push(habit.clone());
        Ok(habit)
    }

    /// Removes the habit, returning it. Absent ids are a no-op.
    pub fn remove(&mut self, habit_id: &str) -> Option<Habit> {
        let index = self.habits.iter().position(|habit| habit.id == habit_id)?;
        Some(self.habits.remove(index))
    }

    pub fn clear(&mut self) {
        self.habits.clear();
    }

    /// Replaces every habit with the starter set.
    pub fn seed_samples(&mut self) {
        self.habits.clear();
        for draft in sample_drafts() {
            // Sample drafts are always valid.
            if let Ok(habit) = draft.into_habit() {
                self.habits.push(habit);
            }
        }
    }
}

pub fn sample_drafts() -> Vec<HabitDraft> {
    vec![
        HabitDraft::new("Wake up", "05:45", "thank God", "gratitude", Frequency::Daily),
        HabitDraft::new("Brush", "06:00", "wash my face", "self-care", Frequency::Daily),
        HabitDraft::new("Toilet", "06:15", "do 10 pushups", "fitness", Frequency::Daily),
        HabitDraft::new(
            "Tea",
            "06:30",
            "read a book for 20 minutes",
            "reading",
            Frequency::Daily,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(action: &str, goal: &str, frequency: &str) -> HabitDraft {
        HabitDraft {
            trigger: String::new(),
            time: None,
            action: action.to_string(),
            goal: goal.to_string(),
            frequency: frequency.to_string(),
        }
    }

    #[test]
    fn add_appends_in_insertion_order() {
        let mut store = HabitStore::default();
        let first = store.add(draft("stretch", "mobility", "daily")).unwrap();
        let second = store.add(draft("review budget", "money", "monthly")).unwrap();

        let ids: Vec<&str> = store.list().iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec![first.id.as_str(), second.id.as_str()]);
        assert_eq!(second.frequency, Frequency::Monthly);
        assert!(first.created_at > 0);
    }

    #[test]
    fn add_trims_fields_and_allows_empty_trigger() {
        let mut store = HabitStore::default();
        let mut input = draft("  read  ", " learning ", "weekly");
        input.trigger = "   ".to_string();
        input.time = Some("7:05".to_string());
        let habit = store.add(input).unwrap();

        assert_eq!(habit.action, "read");
        assert_eq!(habit.goal, "learning");
        assert_eq!(habit.trigger, "");
        assert_eq!(habit.time.as_deref(), Some("07:05"));
    }

    #[test]
    fn add_rejects_invalid_drafts_without_mutation() {
        let mut store = HabitStore::default();

        assert_eq!(
            store.add(draft(" ", "goal", "daily")),
            Err(ValidationError::MissingField("action"))
        );
        assert_eq!(
            store.add(draft("act", "", "daily")),
            Err(ValidationError::MissingField("goal"))
        );
        assert_eq!(
            store.add(draft("act", "goal", "")),
            Err(ValidationError::MissingField("frequency"))
        );
        assert_eq!(
            store.add(draft("act", "goal", "hourly")),
            Err(ValidationError::UnknownFrequency("hourly".to_string()))
        );

        let mut bad_time = draft("act", "goal", "daily");
        bad_time.time = Some("25:99".to_string());
        assert_eq!(
            store.add(bad_time),
            Err(ValidationError::InvalidTime("25:99".to_string()))
        );

        assert!(store.is_empty());
    }

    #[test]
    fn empty_time_is_stored_as_absent() {
        let mut store = HabitStore::default();
        let mut input = draft("act", "goal", "daily");
        input.time = Some(String::new());
        let habit = store.add(input).unwrap();
        assert_eq!(habit.time, None);
        assert_eq!(habit.minute_of_day(), 0);
    }

    #[test]
    fn ids_are_unique_under_rapid_adds() {
        let mut store = HabitStore::default();
        for _ in 0..500 {
            store.add(draft("act", "goal", "daily")).unwrap();
        }
        let mut ids: Vec<&str> = store.list().iter().map(|h| h.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn remove_is_a_noop_for_unknown_ids() {
        let mut store = HabitStore::default();
        let habit = store.add(draft("act", "goal", "daily")).unwrap();

        assert!(store.remove("missing").is_none());
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.remove(&habit.id).map(|h| h.id), Some(habit.id));
        assert!(store.is_empty());
    }

    #[test]
    fn seed_samples_replaces_existing_habits() {
        let mut store = HabitStore::default();
        store.add(draft("act", "goal", "yearly")).unwrap();
        store.seed_samples();

        let actions: Vec<&str> = store.list().iter().map(|h| h.action.as_str()).collect();
        assert_eq!(
            actions,
            vec!["thank God", "wash my face", "do 10 pushups", "read a book for 20 minutes"]
        );
        assert!(store.list().iter().all(|h| h.frequency == Frequency::Daily));
    }

    #[test]
    fn habit_json_uses_camel_case() {
        let mut store = HabitStore::default();
        store.add(draft("act", "goal", "quarterly")).unwrap();
        let json = serde_json::to_value(&store).unwrap();
        let first = &json[0];
        assert!(first.get("createdAt").is_some());
        assert_eq!(first["frequency"], "quarterly");
        assert!(first.get("time").is_none());
    }
}
