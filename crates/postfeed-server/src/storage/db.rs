//! SQLite post store (embedded, no external dependencies)

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use postfeed_core::ports::PostStore;
use postfeed_core::{validate_new_post, FileType, NewPost, Post, PostError};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

pub struct Database {
    pool: Arc<SqlitePool>,
    timeout: Duration,
    /// Serializes inserts so rowid order follows created_at
    write_lock: Mutex<()>,
}

impl Database {
    pub async fn new(database_url: &str, max_connections: u32, timeout: Duration) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        // Create parent directory if needed
        let filename = options.clone().get_filename();
        if let Some(parent) = filename.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(timeout)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to SQLite database at: {}", database_url))?;

        tracing::info!("SQLite connection established, ensuring schema...");

        Self::create_tables(&pool)
            .await
            .context("Failed to create posts table")?;

        tracing::info!("Database initialization complete");

        Ok(Self {
            pool: Arc::new(pool),
            timeout,
            write_lock: Mutex::new(()),
        })
    }

    async fn create_tables(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id TEXT PRIMARY KEY,
                caption TEXT NOT NULL,
                content TEXT,
                url TEXT,
                file_type TEXT,
                file_name TEXT,
                created_at DATETIME NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Check a connection out of the pool for the duration of one operation
    async fn connection(&self) -> postfeed_core::Result<PoolConnection<Sqlite>> {
        self.bounded(async { self.pool.acquire().await.map_err(PostError::storage) })
            .await
    }

    /// Bound a storage round-trip by the configured timeout
    async fn bounded<T, F>(&self, fut: F) -> postfeed_core::Result<T>
    where
        F: Future<Output = postfeed_core::Result<T>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| PostError::storage("database operation timed out"))?
    }
}

#[async_trait]
impl PostStore for Database {
    async fn list(&self, limit: Option<usize>) -> postfeed_core::Result<Vec<Post>> {
        let mut conn = self.connection().await?;

        let rows: Vec<PostRow> = self
            .bounded(async {
                match limit {
                    Some(limit) if limit > 0 => {
                        sqlx::query_as::<_, PostRow>(
                            r#"
                            SELECT id, caption, content, url, file_type, file_name, created_at
                            FROM posts ORDER BY rowid ASC LIMIT ?1
                            "#,
                        )
                        .bind(limit as i64)
                        .fetch_all(&mut *conn)
                        .await
                    }
                    _ => {
                        sqlx::query_as::<_, PostRow>(
                            r#"
                            SELECT id, caption, content, url, file_type, file_name, created_at
                            FROM posts ORDER BY rowid ASC
                            "#,
                        )
                        .fetch_all(&mut *conn)
                        .await
                    }
                }
                .map_err(PostError::storage)
            })
            .await?;

        rows.into_iter().map(Post::try_from).collect()
    }

    async fn get(&self, id: Uuid) -> postfeed_core::Result<Post> {
        let mut conn = self.connection().await?;

        let row: Option<PostRow> = self
            .bounded(async {
                sqlx::query_as::<_, PostRow>(
                    r#"
                    SELECT id, caption, content, url, file_type, file_name, created_at
                    FROM posts WHERE id = ?1
                    "#,
                )
                .bind(id.to_string())
                .fetch_optional(&mut *conn)
                .await
                .map_err(PostError::storage)
            })
            .await?;

        row.ok_or(PostError::NotFound)?.try_into()
    }

    async fn create(&self, new: NewPost) -> postfeed_core::Result<Post> {
        validate_new_post(&new)?;

        let _guard = self.write_lock.lock().await;
        let mut conn = self.connection().await?;
        let post = Post::from_new(new, Uuid::new_v4(), Utc::now());

        self.bounded(async {
            sqlx::query(
                r#"
                INSERT INTO posts (id, caption, content, url, file_type, file_name, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(post.id.to_string())
            .bind(&post.caption)
            .bind(&post.content)
            .bind(&post.url)
            .bind(post.file_type.map(|t| t.to_string()))
            .bind(&post.file_name)
            .bind(post.created_at)
            .execute(&mut *conn)
            .await
            .map_err(PostError::storage)
        })
        .await?;

        tracing::info!("Stored post {}", post.id);

        Ok(post)
    }

    async fn list_ordered_by_recency(&self) -> postfeed_core::Result<Vec<Post>> {
        let mut conn = self.connection().await?;

        let rows: Vec<PostRow> = self
            .bounded(async {
                sqlx::query_as::<_, PostRow>(
                    r#"
                    SELECT id, caption, content, url, file_type, file_name, created_at
                    FROM posts ORDER BY created_at DESC, rowid DESC
                    "#,
                )
                .fetch_all(&mut *conn)
                .await
                .map_err(PostError::storage)
            })
            .await?;

        rows.into_iter().map(Post::try_from).collect()
    }

    async fn close(&self) {
        tracing::info!("Closing SQLite pool");
        self.pool.close().await;
    }
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct PostRow {
    id: String,
    caption: String,
    content: Option<String>,
    url: Option<String>,
    file_type: Option<String>,
    file_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = PostError;

    fn try_from(r: PostRow) -> postfeed_core::Result<Self> {
        let id = Uuid::parse_str(&r.id)
            .map_err(|e| PostError::storage(format!("corrupt post id {}: {}", r.id, e)))?;
        let file_type = r
            .file_type
            .as_deref()
            .map(FileType::from_str)
            .transpose()
            .map_err(PostError::storage)?;

        Ok(Post {
            id,
            caption: r.caption,
            content: r.content,
            url: r.url,
            file_type,
            file_name: r.file_name,
            created_at: r.created_at,
        })
    }
}
