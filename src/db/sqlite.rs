// SPDX-License-Identifier: MIT

//! SQLite client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (credentials + profile + shoe catalog snapshot)
//! - Activities (imported Strava activities, upsert by natural key)

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::AppError;
use crate::models::{Activity, NewActivity, User};

/// Schema statements executed at startup. `users.athlete_id` carries a
/// UNIQUE constraint so activity rows always join to exactly one user;
/// `activities(athlete_id, activity_id)` is the importer's upsert key.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        athlete_id INTEGER NOT NULL UNIQUE,
        access_token TEXT NOT NULL,
        refresh_token TEXT NOT NULL,
        expires_at INTEGER NOT NULL,
        scope TEXT NOT NULL DEFAULT '',
        name TEXT,
        shoes TEXT NOT NULL DEFAULT '[]'
    )",
    "CREATE TABLE IF NOT EXISTS activities (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        athlete_id INTEGER NOT NULL,
        activity_id INTEGER NOT NULL,
        start_date TEXT NOT NULL,
        activity_type TEXT NOT NULL,
        elapsed_time INTEGER NOT NULL DEFAULT 0,
        moving_time INTEGER NOT NULL DEFAULT 0,
        distance REAL,
        average_speed REAL,
        gear_id TEXT,
        pace REAL,
        UNIQUE(athlete_id, activity_id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_activities_athlete ON activities(athlete_id)",
];

/// SQLite database client.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Open (creating if missing) the database at `database_url` and ensure
    /// the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let db = Self { pool };
        db.init_schema().await?;

        tracing::info!(url = database_url, "Connected to SQLite");
        Ok(db)
    }

    /// In-memory database for tests. Pinned to a single connection so every
    /// statement sees the same memory database.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::Database(e.to_string()))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), AppError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Insert a user on first authorization, or update their credentials if
    /// the athlete is already known. Returns the internal user ID.
    pub async fn upsert_user_credentials(
        &self,
        athlete_id: i64,
        access_token: &str,
        refresh_token: &str,
        expires_at: i64,
        scope: &str,
    ) -> Result<i64, AppError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (athlete_id, access_token, refresh_token, expires_at, scope)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(athlete_id) DO UPDATE SET
                 access_token = excluded.access_token,
                 refresh_token = excluded.refresh_token,
                 expires_at = excluded.expires_at,
                 scope = excluded.scope
             RETURNING id",
        )
        .bind(athlete_id)
        .bind(access_token)
        .bind(refresh_token)
        .bind(expires_at)
        .bind(scope)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Store a refreshed token triple on the user row.
    pub async fn update_user_tokens(
        &self,
        athlete_id: i64,
        access_token: &str,
        refresh_token: &str,
        expires_at: i64,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET access_token = ?, refresh_token = ?, expires_at = ?
             WHERE athlete_id = ?",
        )
        .bind(access_token)
        .bind(refresh_token)
        .bind(expires_at)
        .bind(athlete_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store the display name and shoe catalog snapshot from a profile fetch.
    pub async fn update_user_profile(
        &self,
        athlete_id: i64,
        name: Option<&str>,
        shoes: &str,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET name = ?, shoes = ? WHERE athlete_id = ?")
            .bind(name)
            .bind(shoes)
            .bind(athlete_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Get a user by internal ID.
    pub async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Get a user by their Strava athlete ID.
    pub async fn get_user_by_athlete(&self, athlete_id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE athlete_id = ?")
            .bind(athlete_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// List all users (debug surface).
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    // ─── Activity Operations ─────────────────────────────────────

    /// Insert an imported activity, or update it in place if the
    /// `(athlete_id, activity_id)` pair already exists. Pace is always
    /// written as NULL; it is derived at report time.
    pub async fn upsert_activity(&self, activity: &NewActivity) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO activities (athlete_id, activity_id, start_date, activity_type,
                                     elapsed_time, moving_time, distance, average_speed,
                                     gear_id, pace)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NULL)
             ON CONFLICT(athlete_id, activity_id) DO UPDATE SET
                 start_date = excluded.start_date,
                 activity_type = excluded.activity_type,
                 elapsed_time = excluded.elapsed_time,
                 moving_time = excluded.moving_time,
                 distance = excluded.distance,
                 average_speed = excluded.average_speed,
                 gear_id = excluded.gear_id,
                 pace = NULL",
        )
        .bind(activity.athlete_id)
        .bind(activity.activity_id)
        .bind(&activity.start_date)
        .bind(&activity.activity_type)
        .bind(activity.elapsed_time)
        .bind(activity.moving_time)
        .bind(activity.distance)
        .bind(activity.average_speed)
        .bind(&activity.gear_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All stored activities for one athlete, in import order.
    pub async fn activities_for_athlete(&self, athlete_id: i64) -> Result<Vec<Activity>, AppError> {
        let activities =
            sqlx::query_as::<_, Activity>("SELECT * FROM activities WHERE athlete_id = ? ORDER BY id")
                .bind(athlete_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(activities)
    }

    /// List all stored activities (debug surface).
    pub async fn list_activities(&self) -> Result<Vec<Activity>, AppError> {
        let activities = sqlx::query_as::<_, Activity>("SELECT * FROM activities ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(activities)
    }
}
