use chrono::NaiveTime;
use std::fmt;
use std::str::FromStr;

use crate::error::TriggerTimeError;

/// One news article as returned by the content provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub body_text: String,
}

impl Article {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        body_text: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            body_text: body_text.into(),
        }
    }
}

/// Wall-clock time of day at which the daily briefing fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerTime(NaiveTime);

impl TriggerTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl Default for TriggerTime {
    fn default() -> Self {
        Self::new(7, 30).expect("07:30 is a valid time of day")
    }
}

impl FromStr for TriggerTime {
    type Err = TriggerTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| TriggerTimeError(s.to_string()))
    }
}

impl fmt::Display for TriggerTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}
