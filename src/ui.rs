use crate::habits::{Habit, parse_time};
use crate::models::{HabitEntry, PeriodStat, PeriodView};
use crate::period::Frequency;
use chrono::Timelike;
use std::fmt::Write;

pub fn render_index(stats: &[PeriodStat], view: &PeriodView) -> String {
    let period = view.frequency.as_str();
    INDEX_HTML
        .replace("{{DASHBOARD}}", &render_dashboard(stats))
        .replace("{{PERIOD_OPTIONS}}", &render_period_options(view.frequency))
        .replace("{{FREQUENCY_OPTIONS}}", &render_period_options(view.frequency))
        .replace("{{LIST_TITLE}}", &escape_html(&view.title))
        .replace("{{PERIOD_LABEL}}", &escape_html(&view.label))
        .replace("{{EMPTY_HIDDEN}}", if view.habits.is_empty() { "" } else { "hidden" })
        .replace("{{PERIOD_NAME}}", view.frequency.label())
        .replace("{{PERIOD}}", period)
        // Last, so user text is never scanned for placeholders.
        .replace("{{HABIT_LIST}}", &render_habit_list(view))
}

fn render_dashboard(stats: &[PeriodStat]) -> String {
    let mut out = String::new();
    for stat in stats {
        let _ = write!(
            out,
            r#"<div class="stat-card">
        <div class="stat-title">{label}</div>
        <div class="stat-value">{percent}% <span class="muted">({done}/{total})</span></div>
        <div class="progress"><span style="width:{percent}%"></span></div>
      </div>
      "#,
            label = stat.frequency.label(),
            percent = stat.percent,
            done = stat.done,
            total = stat.total,
        );
    }
    out
}

fn render_period_options(selected: Frequency) -> String {
    let mut out = String::new();
    for frequency in Frequency::ALL {
        let marker = if frequency == selected { " selected" } else { "" };
        let _ = write!(
            out,
            r#"<option value="{value}"{marker}>{label}</option>"#,
            value = frequency.as_str(),
            label = frequency.label(),
        );
    }
    out
}

fn render_habit_list(view: &PeriodView) -> String {
    let mut out = String::new();
    for entry in &view.habits {
        render_habit_item(&mut out, view, entry);
    }
    out
}

fn render_habit_item(out: &mut String, view: &PeriodView, entry: &HabitEntry) {
    let habit = &entry.habit;
    let id = escape_html(&habit.id);
    let period = view.frequency.as_str();
    let time = habit.time.as_deref().and_then(format_time_display).unwrap_or_default();
    let goal = if habit.goal.trim().is_empty() { "-" } else { habit.goal.as_str() };

    let _ = write!(
        out,
        r#"<li class="habit-item{done_class}">
        <form class="checkbox" method="post" action="/habits/{id}/toggle">
          <input type="hidden" name="period" value="{period}" />
          <input type="hidden" name="period_key" value="{key}" />
          <input type="hidden" name="completed" value="{next}" />
          <input type="checkbox" aria-label="Done"{checked} onchange="this.form.submit()" />
        </form>
        <div class="habit-time">{time}</div>
        <div class="habit-text">{text}</div>
        <div class="badge"><span class="dot"></span><span>{goal}</span></div>
        <form method="post" action="/habits/{id}/delete" onsubmit="return confirm('Delete this habit?');">
          <input type="hidden" name="period" value="{period}" />
          <button class="ghost" type="submit">Delete</button>
        </form>
      </li>
      "#,
        done_class = if entry.completed { " done" } else { "" },
        key = escape_html(&view.period_key),
        next = !entry.completed,
        checked = if entry.completed { " checked" } else { "" },
        time = time,
        text = escape_html(&describe_habit(habit)),
        goal = escape_html(goal),
    );
}

/// "6:05 AM" style rendering of a 24-hour "HH:MM" value.
pub fn format_time_display(raw: &str) -> Option<String> {
    let time = parse_time(raw)?;
    let (is_pm, hour) = time.hour12();
    let suffix = if is_pm { "PM" } else { "AM" };
    Some(format!("{hour}:{:02} {suffix}", time.minute()))
}

/// Implementation-intention sentence, e.g. "After Tea at 6:30 AM, I will read".
pub fn describe_habit(habit: &Habit) -> String {
    let trigger = habit.trigger.trim();
    let time = habit.time.as_deref().and_then(format_time_display);
    let lead = match (trigger.is_empty(), time) {
        (false, Some(time)) => format!("After {trigger} at {time}, "),
        (false, None) => format!("After {trigger}, "),
        (true, Some(time)) => format!("At {time}, "),
        (true, None) => String::new(),
    };
    format!("{lead}I will {}", habit.action)
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Tracker</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --muted: #5f5c57;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1, h2 {
      font-family: "Georgia", serif;
      margin: 0;
    }

    .subtitle, .muted {
      color: var(--muted);
    }

    .dashboard {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 14px;
    }

    .stat-card {
      background: #fff;
      border-radius: 18px;
      padding: 16px;
      display: grid;
      gap: 8px;
    }

    .stat-title {
      text-transform: uppercase;
      letter-spacing: 0.08em;
      font-size: 0.75rem;
      color: var(--muted);
    }

    .stat-value {
      font-size: 1.4rem;
      font-weight: 600;
    }

    .progress {
      height: 8px;
      background: #f1e6d8;
      border-radius: 999px;
      overflow: hidden;
    }

    .progress span {
      display: block;
      height: 100%;
      background: var(--accent);
    }

    .toolbar, .habit-form {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
      align-items: center;
    }

    input, select, button {
      font: inherit;
      padding: 8px 12px;
      border-radius: 12px;
      border: 1px solid #e3d6c4;
    }

    button {
      background: var(--accent-2);
      color: #fff;
      border: none;
      cursor: pointer;
    }

    button.ghost {
      background: transparent;
      color: var(--accent-2);
      border: 1px solid var(--accent-2);
    }

    button.danger {
      background: var(--accent);
    }

    .habit-list {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    .habit-item {
      display: grid;
      grid-template-columns: auto 90px 1fr auto auto;
      gap: 12px;
      align-items: center;
      background: #fff;
      border-radius: 16px;
      padding: 12px 16px;
    }

    .habit-item.done .habit-text {
      text-decoration: line-through;
      color: var(--muted);
    }

    .habit-time {
      font-variant-numeric: tabular-nums;
      color: var(--muted);
    }

    .badge {
      display: inline-flex;
      gap: 6px;
      align-items: center;
      font-size: 0.85rem;
    }

    .dot {
      width: 8px;
      height: 8px;
      border-radius: 50%;
      background: var(--accent);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Habit Tracker</h1>
      <p class="subtitle">Current period: <span id="currentPeriodLabel">{{PERIOD_LABEL}}</span></p>
    </header>

    <section id="dashboard" class="dashboard">
      {{DASHBOARD}}
    </section>

    <section>
      <form class="habit-form" id="habitForm" method="post" action="/habits">
        <input name="trigger" placeholder="After I..." />
        <input name="time" type="time" value="06:00" />
        <input name="action" placeholder="I will..." required />
        <input name="goal" placeholder="Goal" required />
        <select name="frequency" required>{{FREQUENCY_OPTIONS}}</select>
        <button type="submit">Add habit</button>
      </form>
    </section>

    <section>
      <div class="toolbar">
        <form method="get" action="/">
          <select id="periodSelect" name="period" onchange="this.form.submit()">{{PERIOD_OPTIONS}}</select>
        </form>
        <form method="post" action="/period/reset" onsubmit="return confirm('Reset all {{PERIOD}} checkboxes for {{PERIOD_LABEL}}?');">
          <input type="hidden" name="period" value="{{PERIOD}}" />
          <button class="ghost" id="clearCompletionsBtn" type="submit">Reset {{PERIOD_NAME}}</button>
        </form>
        <form method="post" action="/reset" onsubmit="return confirm('This will delete all habits and history. Continue?');">
          <button class="danger" id="clearAllBtn" type="submit">Clear all</button>
        </form>
      </div>
    </section>

    <section>
      <h2 id="listTitle">{{LIST_TITLE}}</h2>
      <p class="subtitle" id="listSubtitle">{{PERIOD_LABEL}}</p>
      <ul class="habit-list" id="habitList">
      {{HABIT_LIST}}
      </ul>
      <p class="muted" id="emptyState" {{EMPTY_HIDDEN}}>No habits for this period yet.</p>
    </section>
  </main>
</body>
</html>
"#;
