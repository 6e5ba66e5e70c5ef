//! Typed resources: each entity struct is bound to its static descriptor at compile time.

use crate::error::{AppError, ConfigError};
use crate::model::ResourceDescriptor;
use crate::notify::Notification;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt::Debug;
use uuid::Uuid;

/// Settings the save hooks need.
#[derive(Clone, Copy, Debug)]
pub struct SaveContext {
    pub password_cost: u32,
}

impl Default for SaveContext {
    fn default() -> Self {
        SaveContext {
            password_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// An entity served by the generic controller. `Default` is the zero-valued factory.
pub trait Resource:
    Serialize + DeserializeOwned + Default + Clone + PartialEq + Debug + Send + Sync + 'static
{
    fn descriptor() -> &'static ResourceDescriptor;

    fn id(&self) -> Uuid;

    /// Runs before every persist. `previous` is the stored value on update.
    fn before_save(&mut self, _previous: Option<&Self>, _ctx: &SaveContext) -> Result<(), AppError> {
        Ok(())
    }

    /// Notification to send after a successful create.
    fn notification(&self) -> Option<Notification> {
        None
    }
}

/// Serialize a resource into a storage row.
pub fn to_row<R: Resource>(item: &R) -> Result<Map<String, Value>, AppError> {
    match serde_json::to_value(item) {
        Ok(Value::Object(m)) => Ok(m),
        Ok(_) => Err(AppError::Internal(format!(
            "{} did not serialize to an object",
            R::descriptor().name
        ))),
        Err(e) => Err(AppError::Internal(e.to_string())),
    }
}

/// Deserialize a client-supplied object; shape mismatches are validation errors.
pub fn from_body<R: Resource>(row: Map<String, Value>) -> Result<R, AppError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| AppError::Validation(e.to_string()))
}

/// Deserialize a stored row; a mismatch here is a storage bug, not a client error.
pub fn from_row<R: Resource>(row: Map<String, Value>) -> Result<R, AppError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| {
        AppError::Internal(format!("stored {} row is malformed: {}", R::descriptor().name, e))
    })
}

/// Checks that the zero value of `R` has exactly the descriptor's field set.
pub fn check_shape<R: Resource>() -> Result<(), ConfigError> {
    let descriptor = R::descriptor();
    let row = to_row(&R::default()).map_err(|e| ConfigError::ShapeMismatch {
        resource: descriptor.name.to_string(),
        detail: e.to_string(),
    })?;
    let actual: BTreeSet<&str> = row.keys().map(String::as_str).collect();
    let declared: BTreeSet<&str> = descriptor.fields.iter().map(|f| f.name).collect();
    if actual != declared {
        let missing: Vec<_> = declared.difference(&actual).collect();
        let extra: Vec<_> = actual.difference(&declared).collect();
        return Err(ConfigError::ShapeMismatch {
            resource: descriptor.name.to_string(),
            detail: format!("undeclared struct fields {:?}, missing struct fields {:?}", extra, missing),
        });
    }
    Ok(())
}
