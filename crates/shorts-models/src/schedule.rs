//! Recurrence schedules.
//!
//! Schedules are a declarative description of "produce a video every so
//! often". The job runner does not execute them; they are persisted and
//! listed for the dashboard.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// How often a schedule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl ScheduleFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleFrequency::Daily => "daily",
            ScheduleFrequency::Weekly => "weekly",
            ScheduleFrequency::Monthly => "monthly",
        }
    }

    /// Parse from the persisted string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(ScheduleFrequency::Daily),
            "weekly" => Some(ScheduleFrequency::Weekly),
            "monthly" => Some(ScheduleFrequency::Monthly),
            _ => None,
        }
    }
}

impl fmt::Display for ScheduleFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recurring video-production schedule.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Schedule {
    /// Unique schedule ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Recurrence frequency
    pub frequency: ScheduleFrequency,
    /// Time of day, "HH:MM"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Days the schedule applies to (e.g. weekday names)
    #[serde(default)]
    pub days: Vec<String>,
    /// Where scripts come from (file path or topic description)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_source: Option<String>,
    /// Upload automatically after assembly
    #[serde(default)]
    pub auto_upload: bool,
    /// Whether the schedule is active
    #[serde(default = "default_active")]
    pub active: bool,
    /// Last time the schedule fired
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Utc>>,
    /// Next planned firing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_run: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Schedule {
    /// Create a new active schedule.
    pub fn new(name: impl Into<String>, frequency: ScheduleFrequency) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            frequency,
            time: None,
            days: Vec::new(),
            script_source: None,
            auto_upload: false,
            active: true,
            last_run: None,
            next_run: None,
            created_at: Utc::now(),
        }
    }
}
