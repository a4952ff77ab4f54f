//! Common types used across the platform

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date range for queries and report periods (inclusive bounds)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The full calendar month containing the given year/month.
    ///
    /// Returns `None` for an invalid month number.
    pub fn for_month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        let end = next_month.pred_opt()?;
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Directory label for report output: `"2024年03月"` for a whole month,
    /// `"{start}_to_{end}"` otherwise.
    pub fn dir_label(&self) -> String {
        let whole_month = self.start.day() == 1
            && self.start.month() == self.end.month()
            && self.start.year() == self.end.year()
            && self
                .end
                .succ_opt()
                .map(|d| d.month() != self.end.month())
                .unwrap_or(true);
        if whole_month {
            format!("{}年{:02}月", self.start.year(), self.start.month())
        } else {
            format!("{}_to_{}", self.start, self.end)
        }
    }
}

/// Supported languages for user-facing messages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Chinese,
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Chinese => "zh-TW",
            Language::English => "en",
        }
    }
}
