//! Seed selection and daily file naming.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Seed used when a custom argument has no leading digits
pub const FALLBACK_SEED: u64 = 12345;

/// Numeric seed plus the label that names the daily file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DailySeed {
    pub value: u64,
    /// `YYYY-MM-DD`, or `custom-<arg>` for non-date seeds with every character
    /// outside `[A-Za-z0-9_-]` replaced by `_`
    pub label: String,
}

impl DailySeed {
    /// Seed `YYYYMMDD` for a calendar date
    pub fn for_date(date: NaiveDate) -> Self {
        let value = date.year() as u64 * 10_000 + date.month() as u64 * 100 + date.day() as u64;
        Self {
            value,
            label: date.format("%Y-%m-%d").to_string(),
        }
    }

    /// Seed for tomorrow's local date
    pub fn tomorrow() -> Self {
        let today = Local::now().date_naive();
        Self::for_date(today.succ_opt().unwrap_or(today))
    }

    /// Interpret a command-line seed argument.
    ///
    /// Eight digits are read as `YYYYMMDD`. Anything else is a custom seed
    /// whose value is its leading decimal digits.
    pub fn parse(arg: &str) -> Self {
        let arg = arg.trim();
        if arg.len() == 8 && arg.bytes().all(|b| b.is_ascii_digit()) {
            return Self {
                value: leading_number(arg).unwrap_or(FALLBACK_SEED),
                label: format!("{}-{}-{}", &arg[..4], &arg[4..6], &arg[6..]),
            };
        }
        Self {
            value: leading_number(arg).unwrap_or(FALLBACK_SEED),
            label: format!("custom-{}", file_safe(arg)),
        }
    }

    /// Seed for an optional argument, defaulting to tomorrow
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some(arg) => Self::parse(arg),
            None => Self::tomorrow(),
        }
    }

    /// `daily-<label>.json`
    pub fn file_name(&self) -> String {
        format!("daily-{}.json", self.label)
    }
}

/// Keep a label usable as a single path component
fn file_safe(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn leading_number(s: &str) -> Option<u64> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse::<u64>().ok().filter(|&v| v != 0)
}
