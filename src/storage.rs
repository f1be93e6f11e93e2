// src/storage.rs
//! Application history persistence.
//!
//! One interface, two interchangeable backends, selected once from
//! configuration: a flat CSV log or a SQLite table.

use crate::config::{StorageBackend, StorageConfig};
use crate::types::ApplicationRecord;
use crate::utils::{ensure_parent_dir, normalize_username};
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

const CSV_HEADER: [&str; 5] = ["username", "job_identifier", "company", "location", "applied_at"];

pub enum ApplicationStore {
    Csv(CsvApplicationLog),
    Sqlite(SqliteApplicationRepository),
}

impl ApplicationStore {
    /// Open the backend named in `config`.
    pub async fn open(config: &StorageConfig) -> Result<Self> {
        match config.backend {
            StorageBackend::Csv => Ok(Self::Csv(CsvApplicationLog::new(config.path.clone()))),
            StorageBackend::Sqlite => Ok(Self::Sqlite(
                SqliteApplicationRepository::connect(&config.path).await?,
            )),
        }
    }

    /// Open for reading only. SQLite still needs its table before a query
    /// can run; the CSV log is left alone since a missing file already
    /// reads as an empty history.
    pub async fn open_read_only(config: &StorageConfig) -> Result<Self> {
        let store = Self::open(config).await?;
        if let Self::Sqlite(repo) = &store {
            repo.migrate().await?;
        }
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<()> {
        match self {
            Self::Csv(log) => log.migrate().await,
            Self::Sqlite(repo) => repo.migrate().await,
        }
    }

    pub async fn record(&self, application: &ApplicationRecord) -> Result<()> {
        let mut application = application.clone();
        if application.applied_at.is_none() {
            application.applied_at = Some(Utc::now());
        }

        match self {
            Self::Csv(log) => log.append(&application).await?,
            Self::Sqlite(repo) => repo.insert(&application).await?,
        }

        info!(
            "Recorded application: {} -> {}",
            application.username, application.job_identifier
        );
        Ok(())
    }

    pub async fn load_all(&self) -> Result<Vec<ApplicationRecord>> {
        match self {
            Self::Csv(log) => log.read_all().await,
            Self::Sqlite(repo) => repo.fetch_all().await,
        }
    }

    /// Applications for one user, username compared case-insensitively.
    pub async fn for_user(&self, username: &str) -> Result<Vec<ApplicationRecord>> {
        match self {
            Self::Csv(log) => {
                let wanted = normalize_username(username);
                let all = log.read_all().await?;
                Ok(all
                    .into_iter()
                    .filter(|app| normalize_username(&app.username) == wanted)
                    .collect())
            }
            Self::Sqlite(repo) => repo.fetch_for_user(username).await,
        }
    }

    /// Lowercased identifiers the user has applied to.
    pub async fn applied_titles(&self, username: &str) -> Result<HashSet<String>> {
        Ok(self
            .for_user(username)
            .await?
            .into_iter()
            .map(|app| app.job_identifier.to_lowercase())
            .collect())
    }
}

/// Append-only CSV log of applications.
pub struct CsvApplicationLog {
    path: PathBuf,
}

impl CsvApplicationLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with its header row if it does not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        ensure_parent_dir(&self.path).await?;
        if !self.path.exists() {
            let mut writer = csv::Writer::from_writer(vec![]);
            writer.write_record(CSV_HEADER)?;
            let header = writer
                .into_inner()
                .context("Failed to encode application log header")?;
            tokio::fs::write(&self.path, header)
                .await
                .with_context(|| format!("Failed to create {}", self.path.display()))?;
            info!("Created application log: {}", self.path.display());
        }
        Ok(())
    }

    pub async fn append(&self, application: &ApplicationRecord) -> Result<()> {
        self.migrate().await?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(vec![]);
        writer
            .serialize(application)
            .context("Failed to write application record")?;
        let row = writer
            .into_inner()
            .context("Failed to encode application record")?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        file.write_all(&row).await?;
        file.flush().await?;

        debug!("Appended {} bytes to {}", row.len(), self.path.display());
        Ok(())
    }

    /// A missing file is an empty history.
    pub async fn read_all(&self) -> Result<Vec<ApplicationRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_slice());

        let mut records = Vec::new();
        for result in reader.deserialize::<ApplicationRecord>() {
            records.push(result.with_context(|| {
                format!("Malformed application record in {}", self.path.display())
            })?);
        }
        Ok(records)
    }
}

pub struct SqliteApplicationRepository {
    pool: SqlitePool,
}

impl SqliteApplicationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_path: &Path) -> Result<Self> {
        ensure_parent_dir(database_path).await?;

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to connect to database: {}", database_path.display())
        })?;

        info!("Database connection established: {}", database_path.display());
        Ok(Self { pool })
    }

    /// Single-connection in-memory database, mostly for tests.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS applications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                job_title TEXT NOT NULL,
                company TEXT,
                location TEXT,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_applications_username ON applications(username);",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_applications_job_title ON applications(job_title);",
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations completed");
        Ok(())
    }

    pub async fn insert(&self, application: &ApplicationRecord) -> Result<()> {
        let applied_at = application.applied_at.unwrap_or_else(Utc::now);

        sqlx::query(
            r#"
            INSERT INTO applications (username, job_title, company, location, applied_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&application.username)
        .bind(&application.job_identifier)
        .bind(&application.company)
        .bind(&application.location)
        .bind(applied_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert application")?;

        Ok(())
    }

    pub async fn fetch_all(&self) -> Result<Vec<ApplicationRecord>> {
        let records = sqlx::query_as::<_, ApplicationRecord>(
            r#"
            SELECT username,
                   job_title AS job_identifier,
                   COALESCE(company, '') AS company,
                   COALESCE(location, '') AS location,
                   applied_at
            FROM applications
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load applications")?;

        Ok(records)
    }

    pub async fn fetch_for_user(&self, username: &str) -> Result<Vec<ApplicationRecord>> {
        let records = sqlx::query_as::<_, ApplicationRecord>(
            r#"
            SELECT username,
                   job_title AS job_identifier,
                   COALESCE(company, '') AS company,
                   COALESCE(location, '') AS location,
                   applied_at
            FROM applications
            WHERE LOWER(username) = LOWER(?)
            ORDER BY id ASC
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load user applications")?;

        Ok(records)
    }
}
