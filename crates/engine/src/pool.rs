//! Database connection pool with a reconnect-on-startup policy.
//!
//! [`DatabasePool`] owns the single pool handle of the process. It is built
//! explicitly at startup and handed to the [`Engine`] builder; nothing else
//! keeps a reference to the connection.
//!
//! When the first connection attempt fails the error goes back to the caller
//! and a background task keeps retrying every [`PoolOptions::retry_delay`]
//! until the database answers.
//!
//!  [`Engine`]: crate::Engine

use std::{
    pin::pin,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio::sync::{Notify, OnceCell};

use crate::{EngineError, ResultEngine};

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Settings used to open the pool.
#[derive(Clone, Debug)]
pub struct PoolOptions {
    pub url: String,
    pub max_connections: u32,
    pub retry_delay: Duration,
}

impl PoolOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

#[derive(Debug)]
pub struct DatabasePool {
    options: PoolOptions,
    connection: OnceCell<DatabaseConnection>,
    retrying: AtomicBool,
    ready: Notify,
}

impl DatabasePool {
    pub fn new(options: PoolOptions) -> Self {
        Self {
            options,
            connection: OnceCell::new(),
            retrying: AtomicBool::new(false),
            ready: Notify::new(),
        }
    }

    /// Open the pool and check that one connection can be acquired.
    ///
    /// On failure the error is logged and returned, and a background retry
    /// is scheduled. Only one retry loop runs at a time. Calling this on an
    /// initialized pool returns the existing handle.
    pub async fn initialize(self: &Arc<Self>) -> ResultEngine<DatabaseConnection> {
        match self.connect().await {
            Ok(db) => {
                tracing::info!("Successfully connected to the database");
                Ok(db)
            }
            Err(err) => {
                tracing::error!("error connecting to the database: {err}");
                self.schedule_retry();
                Err(err)
            }
        }
    }

    /// Return the live pool handle.
    pub fn get(&self) -> ResultEngine<&DatabaseConnection> {
        self.connection.get().ok_or(EngineError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.connection.initialized()
    }

    /// Wait until an attempt, foreground or background, has succeeded.
    pub async fn wait_ready(&self) -> DatabaseConnection {
        loop {
            let mut notified = pin!(self.ready.notified());
            notified.as_mut().enable();
            if let Some(db) = self.connection.get() {
                return db.clone();
            }
            notified.await;
        }
    }

    async fn connect(&self) -> ResultEngine<DatabaseConnection> {
        if let Some(db) = self.connection.get() {
            return Ok(db.clone());
        }

        let mut options = ConnectOptions::new(self.options.url.clone());
        options.max_connections(self.options.max_connections);

        let db = Database::connect(options).await?;
        db.ping().await?;

        // A concurrent attempt may have won the race; keep its handle.
        let _ = self.connection.set(db);
        self.ready.notify_waiters();

        self.get().cloned()
    }

    fn schedule_retry(self: &Arc<Self>) {
        if self.retrying.swap(true, Ordering::AcqRel) {
            return;
        }

        let pool = Arc::clone(self);
        tokio::spawn(async move {
            let delay = pool.options.retry_delay;
            loop {
                tokio::time::sleep(delay).await;
                match pool.connect().await {
                    Ok(_) => {
                        tracing::info!("Successfully connected to the database after retry");
                        break;
                    }
                    Err(err) => {
                        tracing::error!(
                            "error connecting to the database, retrying in {}s: {err}",
                            delay.as_secs_f32()
                        );
                    }
                }
            }
            pool.retrying.store(false, Ordering::Release);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db_path() -> std::path::PathBuf {
        let root =
            std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
        std::fs::create_dir_all(&root).unwrap();
        root.join(format!("pool_{}.db", uuid::Uuid::new_v4()))
    }

    #[test]
    fn options_defaults() {
        let options = PoolOptions::new("sqlite::memory:");
        assert_eq!(options.max_connections, 10);
        assert_eq!(options.retry_delay, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn get_before_initialize_fails() {
        let pool = DatabasePool::new(PoolOptions::new("sqlite::memory:"));
        assert_eq!(pool.get().unwrap_err(), EngineError::NotInitialized);
        assert!(!pool.is_initialized());
    }

    #[tokio::test]
    async fn initialize_memory_database() {
        let pool = Arc::new(DatabasePool::new(
            PoolOptions::new("sqlite::memory:").max_connections(1),
        ));
        pool.initialize().await.unwrap();
        assert!(pool.is_initialized());
        assert!(pool.get().is_ok());

        // Second call reuses the handle.
        pool.initialize().await.unwrap();
    }

    #[tokio::test]
    async fn failed_initialize_retries_in_background() {
        let path = test_db_path();
        let url = format!("sqlite:{}?mode=rw", path.display());
        let pool = Arc::new(DatabasePool::new(
            PoolOptions::new(url)
                .max_connections(1)
                .retry_delay(Duration::from_millis(50)),
        ));

        // The file does not exist yet and `mode=rw` refuses to create it.
        assert!(pool.initialize().await.is_err());
        assert_eq!(pool.get().unwrap_err(), EngineError::NotInitialized);

        std::fs::File::create(&path).unwrap();

        let db = tokio::time::timeout(Duration::from_secs(5), pool.wait_ready())
            .await
            .unwrap();
        db.ping().await.unwrap();
        assert!(pool.is_initialized());

        let _ = std::fs::remove_file(&path);
    }
}
