//! PostgreSQL backend: descriptor-driven SQL with bound parameters and typed row decoding.

use crate::error::AppError;
use crate::migration;
use crate::model::{FieldKind, Registry, ResourceDescriptor};
use crate::sql::{self, PgBindValue, QueryBuf};
use crate::store::{ListQuery, Row, Store};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{ConnectOptions, PgPool, Postgres, Row as _};
use std::str::FromStr;
use uuid::Uuid;

pub struct PgStore {
    pool: PgPool,
    registry: Registry,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32, registry: Registry) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(PgStore { pool, registry })
    }

    /// Create tables and foreign keys for every registered resource.
    pub async fn migrate(&self) -> Result<(), AppError> {
        migration::apply_migrations(&self.pool, &self.registry).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn bind_all<'q>(sql: &'q str, params: &[Value]) -> Result<Query<'q, Postgres, PgArguments>, AppError> {
    let mut q = sqlx::query(sql);
    for p in params {
        q = q.bind(PgBindValue::from_json(p)?);
    }
    Ok(q)
}

fn json_or_null<T: serde::Serialize>(v: Option<T>) -> Value {
    v.and_then(|v| serde_json::to_value(v).ok()).unwrap_or(Value::Null)
}

/// Decode a row column by column using the declared kind of each field.
fn decode_row(resource: &ResourceDescriptor, row: &PgRow) -> Result<Row, AppError> {
    let mut out = Row::new();
    for f in resource.fields {
        let v = match f.kind {
            FieldKind::Id | FieldKind::Uuid => {
                json_or_null(row.try_get::<Option<Uuid>, _>(f.name)?.map(|u| u.to_string()))
            }
            FieldKind::Text => json_or_null(row.try_get::<Option<String>, _>(f.name)?),
            FieldKind::Bool => json_or_null(row.try_get::<Option<bool>, _>(f.name)?),
            FieldKind::Integer => json_or_null(row.try_get::<Option<i32>, _>(f.name)?),
            FieldKind::BigInt => json_or_null(row.try_get::<Option<i64>, _>(f.name)?),
            FieldKind::Timestamp => json_or_null(row.try_get::<Option<DateTime<Utc>>, _>(f.name)?),
        };
        out.insert(f.name.to_string(), v);
    }
    Ok(out)
}

impl PgStore {
    async fn fetch_optional(&self, resource: &ResourceDescriptor, q: QueryBuf) -> Result<Option<Row>, AppError> {
        let row = bind_all(&q.sql, &q.params)?.fetch_optional(&self.pool).await?;
        row.map(|r| decode_row(resource, &r)).transpose()
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list(&self, resource: &ResourceDescriptor, query: &ListQuery) -> Result<Vec<Row>, AppError> {
        let q = sql::select_list(resource, query);
        let rows = bind_all(&q.sql, &q.params)?.fetch_all(&self.pool).await?;
        rows.iter().map(|r| decode_row(resource, r)).collect()
    }

    async fn fetch(&self, resource: &ResourceDescriptor, id: Uuid) -> Result<Option<Row>, AppError> {
        self.fetch_optional(resource, sql::select_by_id(resource, &id.to_string()))
            .await
    }

    async fn insert(&self, resource: &ResourceDescriptor, row: Row) -> Result<Row, AppError> {
        let q = sql::insert(resource, &row);
        let r = bind_all(&q.sql, &q.params)?.fetch_one(&self.pool).await?;
        decode_row(resource, &r)
    }

    async fn update(&self, resource: &ResourceDescriptor, id: Uuid, row: Row) -> Result<Option<Row>, AppError> {
        self.fetch_optional(resource, sql::update(resource, &id.to_string(), &row))
            .await
    }

    async fn delete(&self, resource: &ResourceDescriptor, id: Uuid) -> Result<u64, AppError> {
        let q = sql::delete(resource, &id.to_string());
        let done = bind_all(&q.sql, &q.params)?.execute(&self.pool).await?;
        Ok(done.rows_affected())
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url).map_err(|e| {
        crate::error::ConfigError::Setting {
            name: "DATABASE_URL",
            detail: e.to_string(),
        }
    })?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "database created");
    }
    Ok(())
}

/// Split a connection URL into (url of the `postgres` maintenance db, target db name).
fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| crate::error::ConfigError::Setting {
            name: "DATABASE_URL",
            detail: "no database path".into(),
        })?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let mut parts = path_and_query.splitn(2, '?');
    let db_name = parts.next().unwrap_or("").trim();
    let query = parts.next().map(|q| format!("?{}", q)).unwrap_or_default();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres{}", base, query), db_name.to_string()))
}
