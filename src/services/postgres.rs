use crate::models::{Lead, NewLead};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),
}

/// PostgreSQL client for captured leads
///
/// Every visitor who leaves contact details with a legacy match becomes a
/// row in `legacy_leads`, together with the legend they were matched to.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Store a lead and return the persisted record
    pub async fn record_lead(&self, lead: &NewLead) -> Result<Lead, PostgresError> {
        let query = r#"
            INSERT INTO legacy_leads (id, name, email, phone, age, height_cm, weight_kg, candidate_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            RETURNING id, name, email, phone, age, height_cm, weight_kg, candidate_id, created_at
        "#;

        let row = sqlx::query(query)
            .bind(uuid::Uuid::new_v4())
            .bind(&lead.name)
            .bind(&lead.email)
            .bind(&lead.phone)
            .bind(i16::from(lead.age))
            .bind(i32::from(lead.height_cm))
            .bind(i32::from(lead.weight_kg))
            .bind(&lead.candidate_id)
            .fetch_one(&self.pool)
            .await?;

        let stored = lead_from_row(&row)?;

        tracing::debug!(
            "Recorded lead {} matched to {}",
            stored.id,
            stored.candidate_id
        );

        Ok(stored)
    }

    /// Most recent leads, newest first
    pub async fn recent_leads(&self, limit: usize) -> Result<Vec<Lead>, PostgresError> {
        let query = r#"
            SELECT id, name, email, phone, age, height_cm, weight_kg, candidate_id, created_at
            FROM legacy_leads
            ORDER BY created_at DESC
            LIMIT $1
        "#;

        let rows = sqlx::query(query)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(lead_from_row).collect()
    }

    /// Lead counts per matched legend, most popular first
    pub async fn leads_per_candidate(&self) -> Result<Vec<CandidateLeadCount>, PostgresError> {
        let query = r#"
            SELECT candidate_id, COUNT(*) AS leads
            FROM legacy_leads
            GROUP BY candidate_id
            ORDER BY leads DESC, candidate_id ASC
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        Ok(rows
            .iter()
            .map(|row| CandidateLeadCount {
                candidate_id: row.get("candidate_id"),
                leads: row.get("leads"),
            })
            .collect())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn lead_from_row(row: &PgRow) -> Result<Lead, PostgresError> {
    let age: i16 = row.get("age");
    let height_cm: i32 = row.get("height_cm");
    let weight_kg: i32 = row.get("weight_kg");

    Ok(Lead {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        age: narrow(age, "age")?,
        height_cm: narrow(height_cm, "height_cm")?,
        weight_kg: narrow(weight_kg, "weight_kg")?,
        candidate_id: row.get("candidate_id"),
        created_at: row.get("created_at"),
    })
}

fn narrow<S, T>(value: S, column: &str) -> Result<T, PostgresError>
where
    S: Copy + std::fmt::Display,
    T: TryFrom<S>,
{
    T::try_from(value)
        .map_err(|_| PostgresError::InvalidValue(format!("{} out of range: {}", column, value)))
}

/// Number of leads captured for one legend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateLeadCount {
    pub candidate_id: String,
    pub leads: i64,
}
