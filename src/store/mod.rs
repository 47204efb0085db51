use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

use crate::entity::ValidationError;

pub mod jobs;
pub mod news;
pub mod products;
pub mod sales;
pub mod services;
pub mod users;

/// Errors from the persistence gateway.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("product {0} does not exist")]
    ForeignKey(i64),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Typed CRUD over the relational store, uniform across the five resources.
///
/// Implementations parse the wire payload, enforce the entity's field rules
/// and run the SQL; the HTTP handlers stay identical for every resource.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    /// Wire read form for list/retrieve/create/update responses.
    type Wire: Serialize + Send + 'static;

    async fn list(store: &Store) -> Result<Vec<Self::Wire>, StoreError>;
    async fn retrieve(store: &Store, id: i64) -> Result<Self::Wire, StoreError>;
    async fn create(store: &Store, payload: Value) -> Result<Self::Wire, StoreError>;
    async fn update(store: &Store, id: i64, payload: Value) -> Result<Self::Wire, StoreError>;
    async fn delete(store: &Store, id: i64) -> Result<(), StoreError>;
}

/// Connection-pool wrapper every gateway operation goes through.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if missing) the SQLite database behind the gateway.
    ///
    /// In-memory URLs are pinned to a single pooled connection that never
    /// expires: the database lives exactly as long as that connection.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = url
            .parse::<SqliteConnectOptions>()?
            .create_if_missing(true)
            // referential rules live in the gateway, not the engine
            .foreign_keys(false);

        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        Ok(Self { pool })
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Idempotent table provisioning, run once at startup.
    pub async fn bootstrap(&self) -> Result<(), StoreError> {
        for ddl in SCHEMA {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Liveness probe for the health endpoint.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        price TEXT NOT NULL,
        description TEXT NOT NULL,
        stock INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS services (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        price TEXT NOT NULL,
        description TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS news_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        date TEXT NOT NULL,
        description TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS job_postings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        publication_date TEXT NOT NULL,
        description TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS sales (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        product_id INTEGER NOT NULL,
        quantity INTEGER NOT NULL,
        date TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL,
        is_staff INTEGER NOT NULL DEFAULT 0,
        password_hash TEXT NOT NULL
    )",
];

/// Prices are stored as canonical two-fraction-digit text.
pub(crate) fn encode_price(price: &Decimal) -> String {
    let mut scaled = *price;
    scaled.rescale(2);
    scaled.to_string()
}

pub(crate) fn decode_price(raw: &str) -> Result<Decimal, StoreError> {
    raw.parse::<Decimal>().map_err(|_| {
        StoreError::Sqlx(sqlx::Error::Decode(
            format!("invalid stored price: {}", raw).into(),
        ))
    })
}
