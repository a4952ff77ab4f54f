//! Staff and farmer roster service
//!
//! The roster drives profit-sharing: each actor carries the commission rate
//! applied to the sales attributed to them.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::models::{ActorType, StaffFarmer};
use shared::validation::{validate_commission_rate, validate_name};

/// Roster service for staff members and supplying farmers
#[derive(Clone)]
pub struct RosterService {
    db: PgPool,
}

/// Row for roster queries
#[derive(Debug, sqlx::FromRow)]
struct ActorRow {
    id: i64,
    actor_type: String,
    name: String,
    commission_rate: Decimal,
}

impl ActorRow {
    fn into_actor(self) -> AppResult<StaffFarmer> {
        let actor_type = ActorType::parse(&self.actor_type).ok_or_else(|| {
            AppError::Internal(format!("Unknown actor type in roster: {}", self.actor_type))
        })?;
        Ok(StaffFarmer {
            id: self.id,
            actor_type,
            name: self.name,
            commission_rate: self.commission_rate,
        })
    }
}

/// Input for adding a roster entry
#[derive(Debug, Deserialize)]
pub struct CreateActorInput {
    pub actor_type: ActorType,
    pub name: String,
    pub commission_rate: Decimal,
}

impl RosterService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All roster entries
    pub async fn list(&self) -> AppResult<Vec<StaffFarmer>> {
        let rows = sqlx::query_as::<_, ActorRow>(
            "SELECT id, actor_type, name, commission_rate FROM staff_farmers ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(ActorRow::into_actor).collect()
    }

    /// Entries of one type
    pub async fn list_by_type(&self, actor_type: ActorType) -> AppResult<Vec<StaffFarmer>> {
        let rows = sqlx::query_as::<_, ActorRow>(
            r#"
            SELECT id, actor_type, name, commission_rate
            FROM staff_farmers
            WHERE actor_type = $1
            ORDER BY id
            "#,
        )
        .bind(actor_type.as_str())
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(ActorRow::into_actor).collect()
    }

    /// The staff and farmer name lists fed to the purchase/sale forms
    pub async fn staff_and_farmer_names(&self) -> AppResult<(Vec<String>, Vec<String>)> {
        let actors = self.list().await?;
        let mut staff = Vec::new();
        let mut farmers = Vec::new();
        for actor in actors {
            match actor.actor_type {
                ActorType::Staff => staff.push(actor.name),
                ActorType::Farmer => farmers.push(actor.name),
            }
        }
        Ok((staff, farmers))
    }

    /// Add a roster entry; names are unique within a type
    pub async fn create(&self, input: CreateActorInput) -> AppResult<StaffFarmer> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
            message_zh: "名稱不可為空且不可超過 64 字".to_string(),
        })?;
        validate_commission_rate(input.commission_rate).map_err(|msg| AppError::Validation {
            field: "commission_rate".to_string(),
            message: msg.to_string(),
            message_zh: "分潤比例必須介於 0 與 1 之間".to_string(),
        })?;

        let name = input.name.trim();

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM staff_farmers WHERE actor_type = $1 AND name = $2)",
        )
        .bind(input.actor_type.as_str())
        .bind(name)
        .fetch_one(&self.db)
        .await?;

        if exists {
            return Err(AppError::DuplicateEntry("name".to_string()));
        }

        let row = sqlx::query_as::<_, ActorRow>(
            r#"
            INSERT INTO staff_farmers (actor_type, name, commission_rate)
            VALUES ($1, $2, $3)
            RETURNING id, actor_type, name, commission_rate
            "#,
        )
        .bind(input.actor_type.as_str())
        .bind(name)
        .bind(input.commission_rate)
        .fetch_one(&self.db)
        .await?;

        row.into_actor()
    }
}
