//! Primary store provider backed by SQLite.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tokio::sync::RwLock;

use super::{StoreError, StoreStats, SuggestionStore};
use crate::models::{Comment, Complexity, Difficulty, Suggestion, UpdateSuggestionRequest};

/// SQLite-backed suggestion store.
///
/// The pool lives behind a lock so `init` is idempotent and `close` is safe
/// without a prior successful `init`.
pub struct SqliteStore {
    db_path: PathBuf,
    pool: RwLock<Option<SqlitePool>>,
}

impl SqliteStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            pool: RwLock::new(None),
        }
    }

    async fn pool(&self) -> Result<SqlitePool, StoreError> {
        self.pool
            .read()
            .await
            .clone()
            .ok_or_else(|| StoreError::Unavailable("database not initialized".to_string()))
    }
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(format!("database error: {}", err))
}

/// Open the connection pool and run embedded migrations.
async fn open_pool(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS suggestions (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            author TEXT NOT NULL,
            category TEXT,
            complexity TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            estimated_dev_time REAL,
            status TEXT NOT NULL DEFAULT 'pending',
            created_at TEXT NOT NULL,
            last_modified TEXT NOT NULL,
            upvotes INTEGER NOT NULL DEFAULT 0,
            downvotes INTEGER NOT NULL DEFAULT 0,
            views INTEGER NOT NULL DEFAULT 0,
            favorites INTEGER NOT NULL DEFAULT 0,
            tags TEXT,
            comments TEXT,
            implementation TEXT,
            dependencies TEXT,
            version TEXT NOT NULL DEFAULT '1.0.0'
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_suggestions_created_at ON suggestions(created_at);
        CREATE INDEX IF NOT EXISTS idx_suggestions_status ON suggestions(status);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

const SELECT_COLUMNS: &str = "id, title, description, author, category, complexity, difficulty, \
     estimated_dev_time, status, created_at, last_modified, upvotes, downvotes, views, favorites, \
     tags, comments, implementation, dependencies, version";

fn suggestion_from_row(row: &SqliteRow) -> Result<Suggestion, StoreError> {
    let complexity_raw: String = row.get("complexity");
    let complexity = Complexity::from_str(&complexity_raw).ok_or_else(|| {
        StoreError::Unavailable(format!("corrupt complexity value: {}", complexity_raw))
    })?;
    let difficulty_raw: String = row.get("difficulty");
    let difficulty = Difficulty::from_str(&difficulty_raw)
        .unwrap_or_else(|| Difficulty::from_complexity(complexity));

    let tags: Vec<String> = row
        .get::<Option<String>, _>("tags")
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default();
    let comments: Vec<Comment> = row
        .get::<Option<String>, _>("comments")
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default();
    let implementation = row
        .get::<Option<String>, _>("implementation")
        .and_then(|s| serde_json::from_str(&s).ok());
    let dependencies: Vec<String> = row
        .get::<Option<String>, _>("dependencies")
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default();

    Ok(Suggestion {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        author: row.get("author"),
        category: row.get("category"),
        complexity,
        difficulty,
        estimated_dev_time: row.get("estimated_dev_time"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        last_modified: row.get("last_modified"),
        upvotes: row.get("upvotes"),
        downvotes: row.get("downvotes"),
        views: row.get("views"),
        favorites: row.get("favorites"),
        tags,
        comments,
        implementation,
        dependencies,
        version: row.get("version"),
    })
}

#[async_trait]
impl SuggestionStore for SqliteStore {
    async fn init(&self) -> Result<(), StoreError> {
        let mut guard = self.pool.write().await;
        if guard.is_some() {
            return Ok(());
        }
        let pool = open_pool(&self.db_path).await.map_err(unavailable)?;
        *guard = Some(pool);
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Suggestion>, StoreError> {
        let pool = self.pool().await?;
        let rows = sqlx::query(&format!(
            "SELECT {} FROM suggestions ORDER BY created_at, id",
            SELECT_COLUMNS
        ))
        .fetch_all(&pool)
        .await
        .map_err(unavailable)?;

        rows.iter().map(suggestion_from_row).collect()
    }

    async fn get(&self, id: &str) -> Result<Option<Suggestion>, StoreError> {
        let pool = self.pool().await?;
        let row = sqlx::query(&format!(
            "SELECT {} FROM suggestions WHERE id = ?",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&pool)
        .await
        .map_err(unavailable)?;

        row.as_ref().map(suggestion_from_row).transpose()
    }

    async fn save(&self, record: &Suggestion) -> Result<(), StoreError> {
        let pool = self.pool().await?;
        let tags_json = serde_json::to_string(&record.tags).unwrap_or_default();
        let comments_json = serde_json::to_string(&record.comments).unwrap_or_default();
        let implementation_json = record
            .implementation
            .as_ref()
            .map(|v| serde_json::to_string(v).unwrap_or_default());
        let dependencies_json = serde_json::to_string(&record.dependencies).unwrap_or_default();

        let result = sqlx::query(
            "INSERT INTO suggestions (id, title, description, author, category, complexity, \
             difficulty, estimated_dev_time, status, created_at, last_modified, upvotes, \
             downvotes, views, favorites, tags, comments, implementation, dependencies, version) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.author)
        .bind(&record.category)
        .bind(record.complexity.as_str())
        .bind(record.difficulty.as_str())
        .bind(record.estimated_dev_time)
        .bind(&record.status)
        .bind(&record.created_at)
        .bind(&record.last_modified)
        .bind(record.upvotes)
        .bind(record.downvotes)
        .bind(record.views)
        .bind(record.favorites)
        .bind(&tags_json)
        .bind(&comments_json)
        .bind(&implementation_json)
        .bind(&dependencies_json)
        .bind(&record.version)
        .execute(&pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.as_database_error().is_some_and(|d| d.is_unique_violation()) => Err(
                StoreError::Conflict(format!("Suggestion {} already exists", record.id)),
            ),
            Err(e) => Err(unavailable(e)),
        }
    }

    async fn update(
        &self,
        id: &str,
        request: &UpdateSuggestionRequest,
    ) -> Result<Suggestion, StoreError> {
        let mut existing = self
            .get(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Suggestion {} not found", id)))?;

        existing.apply_update(request, Utc::now());

        let pool = self.pool().await?;
        let tags_json = serde_json::to_string(&existing.tags).unwrap_or_default();
        let comments_json = serde_json::to_string(&existing.comments).unwrap_or_default();
        let implementation_json = existing
            .implementation
            .as_ref()
            .map(|v| serde_json::to_string(v).unwrap_or_default());
        let dependencies_json = serde_json::to_string(&existing.dependencies).unwrap_or_default();

        sqlx::query(
            "UPDATE suggestions SET title = ?, description = ?, author = ?, category = ?, \
             complexity = ?, difficulty = ?, estimated_dev_time = ?, status = ?, \
             last_modified = ?, upvotes = ?, downvotes = ?, views = ?, favorites = ?, tags = ?, \
             comments = ?, implementation = ?, dependencies = ?, version = ? WHERE id = ?",
        )
        .bind(&existing.title)
        .bind(&existing.description)
        .bind(&existing.author)
        .bind(&existing.category)
        .bind(existing.complexity.as_str())
        .bind(existing.difficulty.as_str())
        .bind(existing.estimated_dev_time)
        .bind(&existing.status)
        .bind(&existing.last_modified)
        .bind(existing.upvotes)
        .bind(existing.downvotes)
        .bind(existing.views)
        .bind(existing.favorites)
        .bind(&tags_json)
        .bind(&comments_json)
        .bind(&implementation_json)
        .bind(&dependencies_json)
        .bind(&existing.version)
        .bind(id)
        .execute(&pool)
        .await
        .map_err(unavailable)?;

        Ok(existing)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let pool = self.pool().await?;
        // Idempotent: deleting an absent id is a success.
        sqlx::query("DELETE FROM suggestions WHERE id = ?")
            .bind(id)
            .execute(&pool)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn get_stats(&self) -> Result<StoreStats, StoreError> {
        let pool = self.pool().await?;
        let row = sqlx::query("SELECT COUNT(*) AS total FROM suggestions")
            .fetch_one(&pool)
            .await
            .map_err(unavailable)?;
        Ok(StoreStats {
            total: row.get("total"),
        })
    }

    async fn close(&self) -> Result<(), StoreError> {
        if let Some(pool) = self.pool.write().await.take() {
            pool.close().await;
        }
        Ok(())
    }
}
