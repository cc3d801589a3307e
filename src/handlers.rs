use crate::completions::PeriodCompletions;
use crate::errors::{AppError, ValidationError};
use crate::habits::{Habit, HabitDraft};
use crate::models::{
    AtQuery, CompletionRequest, DashboardQuery, PeriodQuery, PeriodStat, PeriodView, ToggleForm,
};
use crate::period::{Frequency, period_key};
use crate::state::AppState;
use crate::stats::{dashboard_stats, period_view};
use crate::storage::{persist_completions, persist_data, persist_habits};
use crate::ui::render_index;
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use chrono::{Local, NaiveDate};
use tracing::info;

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Html<String>, AppError> {
    let frequency = selected_period(query.period.as_deref())?;
    let today = today();
    let data = state.data.lock().await;
    let stats = dashboard_stats(&data, &Frequency::ALL, today);
    let view = period_view(&data, frequency, today);
    Ok(Html(render_index(&stats, &view)))
}

pub async fn list_habits(State(state): State<AppState>) -> Json<Vec<Habit>> {
    let data = state.data.lock().await;
    Json(data.habits.list().to_vec())
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(draft): Json<HabitDraft>,
) -> Result<(StatusCode, Json<Habit>), AppError> {
    let habit = add_habit(&state, draft).await?;
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
) -> Result<StatusCode, AppError> {
    remove_habit(&state, &habit_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_completions(
    State(state): State<AppState>,
    Path((frequency, period_key)): Path<(String, String)>,
) -> Result<Json<PeriodCompletions>, AppError> {
    let frequency = frequency.parse::<Frequency>()?;
    let data = state.data.lock().await;
    Ok(Json(data.completions.period(frequency, &period_key)))
}

pub async fn set_completion(
    State(state): State<AppState>,
    Path((frequency, period_key)): Path<(String, String)>,
    Json(payload): Json<CompletionRequest>,
) -> Result<Json<PeriodCompletions>, AppError> {
    let frequency = frequency.parse::<Frequency>()?;
    let updated = apply_completion(
        &state,
        frequency,
        &period_key,
        &payload.habit_id,
        payload.completed,
    )
    .await?;
    Ok(Json(updated))
}

pub async fn reset_completions(
    State(state): State<AppState>,
    Path((frequency, period_key)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let frequency = frequency.parse::<Frequency>()?;
    reset_period(&state, frequency, &period_key).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Vec<PeriodStat>>, AppError> {
    let frequencies = parse_frequencies(query.frequencies.as_deref())?;
    let now = resolve_date(query.at.as_deref())?;
    let data = state.data.lock().await;
    Ok(Json(dashboard_stats(&data, &frequencies, now)))
}

pub async fn get_period(
    State(state): State<AppState>,
    Path(frequency): Path<String>,
    Query(query): Query<AtQuery>,
) -> Result<Json<PeriodView>, AppError> {
    let frequency = frequency.parse::<Frequency>()?;
    let now = resolve_date(query.at.as_deref())?;
    let data = state.data.lock().await;
    Ok(Json(period_view(&data, frequency, now)))
}

pub async fn seed(State(state): State<AppState>) -> Result<Json<Vec<Habit>>, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let dropped = next.reseed();
    persist_data(&state.paths, &next).await?;
    *data = next;
    info!(
        habits = data.habits.list().len(),
        dropped, "seeded sample habits"
    );
    Ok(Json(data.habits.list().to_vec()))
}

pub async fn reset_all(State(state): State<AppState>) -> Result<Json<Vec<Habit>>, AppError> {
    let habits = clear_all(&state).await?;
    Ok(Json(habits))
}

pub async fn form_add(
    State(state): State<AppState>,
    Form(draft): Form<HabitDraft>,
) -> Result<Redirect, AppError> {
    let habit = add_habit(&state, draft).await?;
    Ok(redirect_to(habit.frequency))
}

pub async fn form_delete(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
    Form(form): Form<PeriodQuery>,
) -> Result<Redirect, AppError> {
    let frequency = selected_period(form.period.as_deref())?;
    remove_habit(&state, &habit_id).await?;
    Ok(redirect_to(frequency))
}

pub async fn form_toggle(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
    Form(form): Form<ToggleForm>,
) -> Result<Redirect, AppError> {
    let frequency = form.period.parse::<Frequency>()?;
    apply_completion(&state, frequency, &form.period_key, &habit_id, form.completed).await?;
    Ok(redirect_to(frequency))
}

pub async fn form_reset_period(
    State(state): State<AppState>,
    Form(form): Form<PeriodQuery>,
) -> Result<Redirect, AppError> {
    let frequency = selected_period(form.period.as_deref())?;
    let key = period_key(frequency, today());
    reset_period(&state, frequency, &key).await?;
    Ok(redirect_to(frequency))
}

pub async fn form_reset_all(State(state): State<AppState>) -> Result<Redirect, AppError> {
    clear_all(&state).await?;
    Ok(Redirect::to("/"))
}

// Each mutation runs on a copy that replaces the shared data only once it is
// on disk, so a failed write leaves nothing behind in memory.

async fn add_habit(state: &AppState, draft: HabitDraft) -> Result<Habit, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.habits.clone();
    let habit = next.add(draft)?;
    persist_habits(&state.paths, &next).await?;
    data.habits = next;
    info!(id = %habit.id, frequency = %habit.frequency, "habit added");
    Ok(habit)
}

async fn remove_habit(state: &AppState, habit_id: &str) -> Result<(), AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    if next.delete_habit(habit_id).is_some() {
        persist_data(&state.paths, &next).await?;
        *data = next;
        info!(id = %habit_id, "habit removed");
    }
    Ok(())
}

async fn apply_completion(
    state: &AppState,
    frequency: Frequency,
    period_key: &str,
    habit_id: &str,
    done: bool,
) -> Result<PeriodCompletions, AppError> {
    if habit_id.trim().is_empty() {
        return Err(ValidationError::MissingField("habitId").into());
    }
    if period_key.trim().is_empty() {
        return Err(ValidationError::MissingField("periodKey").into());
    }

    let mut data = state.data.lock().await;
    let mut next = data.completions.clone();
    let updated = next.set_completed(frequency, period_key, habit_id, done).clone();
    persist_completions(&state.paths, &next).await?;
    data.completions = next;
    Ok(updated)
}

async fn reset_period(state: &AppState, frequency: Frequency, period_key: &str) -> Result<(), AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.completions.clone();
    next.clear_period(frequency, period_key);
    persist_completions(&state.paths, &next).await?;
    data.completions = next;
    info!(%frequency, period_key, "period reset");
    Ok(())
}

async fn clear_all(state: &AppState) -> Result<Vec<Habit>, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    next.clear_all();
    persist_data(&state.paths, &next).await?;
    *data = next;
    info!("all habits and history cleared");
    Ok(data.habits.list().to_vec())
}

fn selected_period(raw: Option<&str>) -> Result<Frequency, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Frequency::Daily),
        Some(value) => value.parse(),
    }
}

fn parse_frequencies(raw: Option<&str>) -> Result<Vec<Frequency>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Frequency::ALL.to_vec()),
        Some(list) => list
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect(),
    }
}

/// Evaluation date for a read. Re-derived from the clock on every request.
fn resolve_date(raw: Option<&str>) -> Result<NaiveDate, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(today()),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(value.to_string())),
    }
}

fn redirect_to(frequency: Frequency) -> Redirect {
    Redirect::to(&format!("/?period={frequency}"))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppData;
    use crate::storage::DataPaths;
    use std::path::PathBuf;

    fn unique_dir(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("habit_tracker_handlers_{tag}_{}_{nanos}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    /// State whose writes of `blocked_file` fail: its temp file is a directory.
    fn state_with_blocked_write(tag: &str, data: AppData, blocked_file: &str) -> AppState {
        let dir = unique_dir(tag);
        std::fs::create_dir_all(dir.join(format!("{blocked_file}.tmp"))).unwrap();
        AppState::new(DataPaths::in_dir(&dir), data)
    }

    fn draft(action: &str, frequency: Frequency) -> HabitDraft {
        HabitDraft::new("", "07:00", action, "goal", frequency)
    }

    #[tokio::test]
    async fn failed_add_leaves_habits_unchanged() {
        let state = state_with_blocked_write("add", AppData::default(), "habits.json");

        let result = create_habit(State(state.clone()), Json(draft("stretch", Frequency::Daily))).await;

        assert!(result.is_err());
        assert!(state.data.lock().await.habits.is_empty());
    }

    #[tokio::test]
    async fn failed_delete_keeps_habit_and_completions() {
        let mut data = AppData::default();
        let habit = data.habits.add(draft("stretch", Frequency::Daily)).unwrap();
        data.completions.set_completed(Frequency::Daily, "2025-01-01", &habit.id, true);
        let state = state_with_blocked_write("delete", data.clone(), "completions.json");

        let result = delete_habit(State(state.clone()), Path(habit.id.clone())).await;

        assert!(result.is_err());
        assert_eq!(*state.data.lock().await, data);
        // Neither document was renamed into place.
        assert!(!state.paths.habits.exists());
        assert!(!state.paths.completions.exists());
    }

    #[tokio::test]
    async fn failed_completion_and_reset_leave_completions_unchanged() {
        let mut data = AppData::default();
        let habit = data.habits.add(draft("review", Frequency::Weekly)).unwrap();
        data.completions.set_completed(Frequency::Weekly, "2025-W01", &habit.id, true);
        let state = state_with_blocked_write("completion", data.clone(), "completions.json");

        let toggled = set_completion(
            State(state.clone()),
            Path(("weekly".to_string(), "2025-W01".to_string())),
            Json(CompletionRequest {
                habit_id: habit.id.clone(),
                completed: false,
            }),
        )
        .await;
        assert!(toggled.is_err());

        let reset = reset_completions(
            State(state.clone()),
            Path(("weekly".to_string(), "2025-W01".to_string())),
        )
        .await;
        assert!(reset.is_err());

        assert_eq!(*state.data.lock().await, data);
    }

    #[tokio::test]
    async fn failed_clear_all_and_seed_leave_data_unchanged() {
        let mut data = AppData::default();
        let habit = data.habits.add(draft("plan", Frequency::Yearly)).unwrap();
        data.completions.set_completed(Frequency::Yearly, "2025", &habit.id, true);
        let state = state_with_blocked_write("clear", data.clone(), "habits.json");

        assert!(reset_all(State(state.clone())).await.is_err());
        assert!(seed(State(state.clone())).await.is_err());
        assert_eq!(*state.data.lock().await, data);
    }

    #[tokio::test]
    async fn successful_add_is_persisted_and_visible() {
        let state = AppState::new(DataPaths::in_dir(unique_dir("ok")), AppData::default());

        let (status, Json(habit)) = create_habit(State(state.clone()), Json(draft("walk", Frequency::Daily)))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(state.data.lock().await.habits.get(&habit.id), Some(&habit));
        let on_disk: crate::habits::HabitStore = crate::storage::load_document(&state.paths.habits).await;
        assert_eq!(on_disk.get(&habit.id), Some(&habit));
    }

    #[test]
    fn selected_period_defaults_to_daily() {
        assert_eq!(selected_period(None), Ok(Frequency::Daily));
        assert_eq!(selected_period(Some(" ")), Ok(Frequency::Daily));
        assert_eq!(selected_period(Some("yearly")), Ok(Frequency::Yearly));
        assert!(selected_period(Some("hourly")).is_err());
    }

    #[test]
    fn parse_frequencies_keeps_caller_order() {
        assert_eq!(
            parse_frequencies(Some("yearly, daily")),
            Ok(vec![Frequency::Yearly, Frequency::Daily])
        );
        assert_eq!(parse_frequencies(None), Ok(Frequency::ALL.to_vec()));
        assert_eq!(
            parse_frequencies(Some("daily,never")),
            Err(ValidationError::UnknownFrequency("never".to_string()))
        );
    }

    #[test]
    fn resolve_date_parses_explicit_dates() {
        assert_eq!(
            resolve_date(Some("2025-01-01")),
            Ok(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
        );
        assert_eq!(
            resolve_date(Some("01/01/2025")),
            Err(ValidationError::InvalidDate("01/01/2025".to_string()))
        );
        assert!(resolve_date(None).is_ok());
    }
}
