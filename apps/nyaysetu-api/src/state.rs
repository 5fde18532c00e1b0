//! Application state and schema migrations

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::auth::Caller;
use crate::config::{Config, ProfileActionPolicy};
use crate::error::ApiError;

pub struct AppState {
    pub db: SqlitePool,
    pub profile_actions: ProfileActionPolicy,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self> {
        let db_url = config.database_url.clone().unwrap_or_else(|| {
            let data_dir = data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("nyaysetu");
            std::fs::create_dir_all(&data_dir).ok();
            format!("sqlite:{}/nyaysetu.db?mode=rwc", data_dir.display())
        });

        tracing::info!("Connecting to database: {}", db_url);

        let options = SqliteConnectOptions::from_str(&db_url)?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        Self::with_pool(pool, config.profile_actions).await
    }

    /// Wrap an existing pool, bringing its schema up to date.
    pub async fn with_pool(pool: SqlitePool, profile_actions: ProfileActionPolicy) -> Result<Self> {
        Self::run_migrations(&pool).await?;
        Ok(Self {
            db: pool,
            profile_actions,
        })
    }

    /// Check that `caller` may run owner-scoped actions on a profile owned by
    /// `owner_account_id`, under the configured policy.
    pub fn authorize_profile_action(
        &self,
        caller: &Caller,
        owner_account_id: i64,
    ) -> Result<(), ApiError> {
        match self.profile_actions {
            ProfileActionPolicy::AnyAuthenticated => Ok(()),
            ProfileActionPolicy::OwnerOnly if caller.account_id == owner_account_id => Ok(()),
            ProfileActionPolicy::OwnerOnly => Err(ApiError::not_owner()),
        }
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        tracing::info!("Running database migrations...");

        for statement in SCHEMA {
            sqlx::query(statement).execute(pool).await?;
        }

        tracing::info!("Migrations complete");
        Ok(())
    }
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        first_name TEXT NOT NULL DEFAULT '',
        last_name TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS residentials (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        house_number TEXT NOT NULL,
        landmark TEXT,
        city TEXT NOT NULL,
        state TEXT NOT NULL,
        pincode TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS incident_locations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        city TEXT NOT NULL,
        state TEXT NOT NULL,
        location TEXT NOT NULL,
        landmark TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS complaints (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
        full_name TEXT NOT NULL,
        contact_number TEXT NOT NULL,
        govt_id TEXT NOT NULL,
        dob TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        incident_datetime TEXT NOT NULL,
        residential_address_id INTEGER REFERENCES residentials(id) ON DELETE SET NULL,
        incident_location_id INTEGER REFERENCES incident_locations(id) ON DELETE SET NULL,
        photo TEXT,
        file_of_complaint TEXT,
        witness_name TEXT,
        witness_contact TEXT,
        privacy_option TEXT NOT NULL DEFAULT 'LAWYERS_ONLY'
            CHECK (privacy_option IN ('LAWYERS_ONLY', 'PUBLIC_WITH_IDENTITY', 'PUBLIC_ANONYMOUS')),
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_complaints_account ON complaints(account_id)",
    "CREATE INDEX IF NOT EXISTS idx_complaints_created_at ON complaints(created_at)",
    r#"
    CREATE TABLE IF NOT EXISTS cities (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS lawyer_profiles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id INTEGER NOT NULL UNIQUE REFERENCES accounts(id) ON DELETE CASCADE,
        specialization TEXT NOT NULL DEFAULT 'other',
        experience_years INTEGER NOT NULL DEFAULT 0 CHECK (experience_years >= 0),
        license_number TEXT NOT NULL UNIQUE,
        bio TEXT,
        contact_number TEXT,
        address TEXT,
        rating REAL NOT NULL DEFAULT 0.0,
        total_cases INTEGER NOT NULL DEFAULT 0 CHECK (total_cases >= 0),
        won_cases INTEGER NOT NULL DEFAULT 0 CHECK (won_cases >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS lawyer_service_cities (
        lawyer_id INTEGER NOT NULL REFERENCES lawyer_profiles(id) ON DELETE CASCADE,
        city_id INTEGER NOT NULL REFERENCES cities(id) ON DELETE CASCADE,
        PRIMARY KEY (lawyer_id, city_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS contact_requests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id INTEGER NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
        lawyer_id INTEGER NOT NULL REFERENCES lawyer_profiles(id) ON DELETE CASCADE,
        message TEXT,
        status TEXT NOT NULL DEFAULT 'pending',
        created_at TEXT NOT NULL,
        UNIQUE (account_id, lawyer_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_contact_requests_lawyer ON contact_requests(lawyer_id)",
];

/// Per-user data directory: `$XDG_DATA_HOME`, else the platform default
/// under `$HOME`.
fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
        return Some(PathBuf::from(xdg));
    }
    let home = PathBuf::from(std::env::var_os("HOME")?);
    if cfg!(target_os = "macos") {
        Some(home.join("Library/Application Support"))
    } else {
        Some(home.join(".local/share"))
    }
}
