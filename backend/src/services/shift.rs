//! System settings and shift resolution
//!
//! Shift boundaries live in the `system_config` table as HH:MM strings and
//! are re-read on every lookup, so a settings change takes effect on the
//! next sale.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Utc};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::models::{Shift, ShiftSchedule, SHIFT_SETTING_KEYS};
use shared::validation::validate_hhmm;

/// The counter's civil timezone (UTC+8, no DST)
const TAIPEI_OFFSET_SECS: i32 = 8 * 3600;

/// Current wall-clock time at the counter
pub fn taipei_now() -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(TAIPEI_OFFSET_SECS).unwrap();
    Utc::now().with_timezone(&offset)
}

/// Settings and shift resolution service
#[derive(Clone)]
pub struct ShiftService {
    db: PgPool,
}

impl ShiftService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All system settings as a key/value map
    pub async fn list_settings(&self) -> AppResult<HashMap<String, String>> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT key, value FROM system_config ORDER BY key",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Upsert a shift-boundary setting
    pub async fn update_setting(&self, key: &str, value: &str) -> AppResult<()> {
        if !SHIFT_SETTING_KEYS.contains(&key) {
            return Err(AppError::ValidationError(format!(
                "Unknown settings key: {}",
                key
            )));
        }
        validate_hhmm(value).map_err(|msg| AppError::Validation {
            field: key.to_string(),
            message: msg.to_string(),
            message_zh: "時間格式必須為 HH:MM".to_string(),
        })?;

        sqlx::query(
            r#"
            INSERT INTO system_config (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.db)
        .await?;

        tracing::info!("Updated setting {} = {}", key, value);
        Ok(())
    }

    /// The configured shift schedule, with defaults for missing values
    pub async fn schedule(&self) -> AppResult<ShiftSchedule> {
        let settings = self.list_settings().await?;
        Ok(ShiftSchedule::from_settings(&settings))
    }

    /// The shift covering the current wall-clock time
    pub async fn current_shift(&self) -> AppResult<Shift> {
        let schedule = self.schedule().await?;
        Ok(schedule.classify(taipei_now().time()))
    }
}
