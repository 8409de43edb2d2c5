//! SeaORM storage backend
//!
//! Database storage for short link entries using SeaORM, supporting
//! SQLite, MySQL/MariaDB and PostgreSQL.

mod connection;
mod converters;
mod mutations;
mod query;
pub mod retry;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{Result, ShortLinkError};
use crate::storage::{EntryStore, EntryUnitOfWork, SeaOrmIdAllocator, ShortLinkEntry};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{entry_to_active_model, model_to_entry};
pub use mutations::SeaOrmUnitOfWork;

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(ShortLinkError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based entry store
#[derive(Clone)]
pub struct SeaOrmEntryStore {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmEntryStore {
    /// Connect, run migrations and return a ready store
    pub async fn new(database_url: &str, backend_name: &str, config: &DatabaseConfig) -> Result<Self> {
        if database_url.is_empty() {
            return Err(ShortLinkError::database_config("DATABASE_URL is not set"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url, config).await?
        } else {
            connect_generic(database_url, backend_name, config).await?
        };

        let store = SeaOrmEntryStore {
            db,
            backend_name: backend_name.to_string(),
            retry_config: retry::RetryConfig::from(config),
        };

        run_migrations(&store.db).await?;

        info!("{} entry store initialized", store.backend_name.to_uppercase());
        Ok(store)
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Id allocator sharing this store's connection pool
    pub fn id_allocator(&self) -> SeaOrmIdAllocator {
        SeaOrmIdAllocator::new(self.db.clone(), self.retry_config)
    }
}

#[async_trait]
impl EntryStore for SeaOrmEntryStore {
    fn backend_name(&self) -> &str {
        &self.backend_name
    }

    async fn create(&self, entry: ShortLinkEntry) -> Result<ShortLinkEntry> {
        self.insert_entry(entry).await
    }

    async fn fetch_by_id(&self, id: i64) -> Result<Option<ShortLinkEntry>> {
        self.load_by_id(id).await
    }

    async fn fetch_by_short_url(&self, short_url: &str) -> Result<Option<ShortLinkEntry>> {
        self.load_by_short_url(short_url, None).await
    }

    async fn find_by_short_url_and_flag(
        &self,
        short_url: &str,
        autogenerated: bool,
    ) -> Result<Option<ShortLinkEntry>> {
        self.load_by_short_url(short_url, Some(autogenerated)).await
    }

    async fn list_by_flag(
        &self,
        autogenerated: bool,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<ShortLinkEntry>> {
        self.load_page_by_flag(autogenerated, offset, limit).await
    }

    async fn update(&self, entry: ShortLinkEntry) -> Result<ShortLinkEntry> {
        self.save_entry(entry).await
    }

    async fn begin_isolated(&self) -> Result<Box<dyn EntryUnitOfWork>> {
        let uow = SeaOrmUnitOfWork::begin(&self.db, &self.backend_name).await?;
        Ok(Box::new(uow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("sqlite://links.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("sqlite::memory:").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("data/links.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("mariadb://u@h/db").unwrap(), "mysql");
        assert_eq!(infer_backend_from_url("postgresql://u@h/db").unwrap(), "postgres");
        assert!(infer_backend_from_url("redis://localhost").is_err());
    }
}
