//! Schedule repository.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use shorts_models::{Schedule, ScheduleFrequency};

use crate::error::{StoreError, StoreResult};
use crate::store::Store;

#[derive(FromRow)]
struct ScheduleRow {
    id: String,
    name: String,
    frequency: String,
    time: Option<String>,
    days: String,
    script_source: Option<String>,
    auto_upload: bool,
    active: bool,
    last_run: Option<DateTime<Utc>>,
    next_run: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ScheduleRow> for Schedule {
    type Error = StoreError;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        let frequency = ScheduleFrequency::parse(&row.frequency).ok_or_else(|| {
            StoreError::invalid_record(format!("schedule frequency {:?}", row.frequency))
        })?;
        let days: Vec<String> = serde_json::from_str(&row.days)?;

        Ok(Schedule {
            id: row.id,
            name: row.name,
            frequency,
            time: row.time,
            days,
            script_source: row.script_source,
            auto_upload: row.auto_upload,
            active: row.active,
            last_run: row.last_run,
            next_run: row.next_run,
            created_at: row.created_at,
        })
    }
}

impl Store {
    /// Insert a new schedule.
    pub async fn create_schedule(&self, schedule: &Schedule) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO schedules (id, name, frequency, time, days, script_source,
                                   auto_upload, active, last_run, next_run, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&schedule.id)
        .bind(&schedule.name)
        .bind(schedule.frequency.as_str())
        .bind(&schedule.time)
        .bind(serde_json::to_string(&schedule.days)?)
        .bind(&schedule.script_source)
        .bind(schedule.auto_upload)
        .bind(schedule.active)
        .bind(schedule.last_run)
        .bind(schedule.next_run)
        .bind(schedule.created_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// List schedules, newest first.
    pub async fn list_schedules(&self, active_only: bool) -> StoreResult<Vec<Schedule>> {
        let rows: Vec<ScheduleRow> = if active_only {
            sqlx::query_as("SELECT * FROM schedules WHERE active = 1 ORDER BY created_at DESC")
                .fetch_all(self.pool())
                .await?
        } else {
            sqlx::query_as("SELECT * FROM schedules ORDER BY created_at DESC")
                .fetch_all(self.pool())
                .await?
        };

        rows.into_iter().map(Schedule::try_from).collect()
    }
}
