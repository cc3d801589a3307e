use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Yearly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::Yearly => "Yearly",
        }
    }

    /// Heading for the habit list of the current period instance.
    pub fn title(self) -> &'static str {
        match self {
            Frequency::Daily => "Today's Habits",
            Frequency::Weekly => "This Week's Habits",
            Frequency::Monthly => "This Month's Habits",
            Frequency::Quarterly => "This Quarter's Habits",
            Frequency::Yearly => "This Year's Habits",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Frequency::ALL
            .into_iter()
            .find(|frequency| frequency.as_str() == value)
            .ok_or_else(|| ValidationError::UnknownFrequency(value.to_string()))
    }
}

/// ISO-8601 (year, week) of the week containing `date`.
///
/// The Thursday of the week decides the year, so late December can land in
/// week 1 of the next year and early January in week 52/53 of the previous one.
pub fn iso_week(date: NaiveDate) -> (i32, u32) {
    let iso = date.iso_week();
    (iso.year(), iso.week())
}

pub fn quarter(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

/// Canonical key of the period instance containing `date`.
pub fn period_key(frequency: Frequency, date: NaiveDate) -> String {
    match frequency {
        Frequency::Daily => date.format("%Y-%m-%d").to_string(),
        Frequency::Weekly => {
            let (year, week) = iso_week(date);
            format!("{year}-W{week:02}")
        }
        Frequency::Monthly => date.format("%Y-%m").to_string(),
        Frequency::Quarterly => format!("{}-Q{}", date.year(), quarter(date)),
        Frequency::Yearly => date.year().to_string(),
    }
}

pub fn friendly_label(frequency: Frequency, date: NaiveDate) -> String {
    match frequency {
        Frequency::Daily => date.format("%Y-%m-%d").to_string(),
        Frequency::Weekly => {
            let (year, week) = iso_week(date);
            format!("Week {week}, {year}")
        }
        Frequency::Monthly => date.format("%B %Y").to_string(),
        Frequency::Quarterly => format!("Q{} {}", quarter(date), date.year()),
        Frequency::Yearly => date.year().to_string(),
    }
}
