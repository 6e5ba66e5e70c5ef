//! Derive and apply the relational schema from resource descriptors.
//! Tables are created in registry order, then foreign keys, so relations may point either way.

use crate::error::AppError;
use crate::model::{FieldKind, Registry, ResourceDescriptor};
use crate::sql::quoted;
use sqlx::PgPool;

/// CREATE TABLE IF NOT EXISTS for one resource (no foreign keys).
pub fn create_table_sql(resource: &ResourceDescriptor) -> String {
    let mut col_defs: Vec<String> = Vec::new();
    for f in resource.fields {
        let mut def = format!("{} {}", quoted(f.name), f.kind.pg_type());
        match (f.kind, f.name) {
            (FieldKind::Id, _) => def.push_str(" PRIMARY KEY DEFAULT gen_random_uuid()"),
            (FieldKind::Timestamp, "created_at" | "updated_at") => {
                def.push_str(" NOT NULL DEFAULT NOW()")
            }
            _ => {
                if !f.nullable {
                    def.push_str(" NOT NULL");
                }
                if f.unique {
                    def.push_str(" UNIQUE");
                }
            }
        }
        col_defs.push(def);
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quoted(resource.name),
        col_defs.join(",\n  ")
    )
}

/// Constraint name for a relation, stable across runs.
fn fk_name(resource: &ResourceDescriptor, field: &str) -> String {
    format!("fk_{}_{}", resource.name, field)
}

/// ALTER TABLE ... ADD CONSTRAINT statements for every relation of `resource`.
pub fn foreign_key_sql(resource: &ResourceDescriptor) -> Vec<(String, String)> {
    resource
        .relations
        .iter()
        .map(|rel| {
            let name = fk_name(resource, rel.field);
            let sql = format!(
                "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} (\"id\") ON DELETE {}",
                quoted(resource.name),
                quoted(&name),
                quoted(rel.field),
                quoted(rel.target),
                rel.on_delete.sql()
            );
            (name, sql)
        })
        .collect()
}

/// Apply the schema for every registered resource. Idempotent.
pub async fn apply_migrations(pool: &PgPool, registry: &Registry) -> Result<(), AppError> {
    registry.validate()?;

    for resource in registry.resources() {
        sqlx::query(&create_table_sql(resource)).execute(pool).await?;
        tracing::debug!(table = resource.name, "table ensured");
    }

    for resource in registry.resources() {
        for (name, sql) in foreign_key_sql(resource) {
            let exists: (bool,) =
                sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_constraint WHERE conname = $1)")
                    .bind(&name)
                    .fetch_one(pool)
                    .await?;
            if !exists.0 {
                sqlx::query(&sql).execute(pool).await?;
                tracing::debug!(constraint = %name, "foreign key added");
            }
        }
    }

    tracing::info!(tables = registry.resources().len(), "schema applied");
    Ok(())
}
