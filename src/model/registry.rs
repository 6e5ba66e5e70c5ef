//! Registry of resource descriptors with referential checks.

use crate::error::ConfigError;
use crate::model::entities::{Ban, Channel, Friend, Member, Message, Reaction, Server, ServerRole, User};
use crate::model::{check_shape, Ownership, Resource, ResourceDescriptor};
use std::collections::HashSet;

#[derive(Clone, Debug, Default)]
pub struct Registry {
    resources: Vec<&'static ResourceDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every chat platform resource, in dependency order.
    pub fn standard() -> Result<Self, ConfigError> {
        let registry = Registry::new()
            .register::<User>()?
            .register::<Server>()?
            .register::<Channel>()?
            .register::<Message>()?
            .register::<Friend>()?
            .register::<ServerRole>()?
            .register::<Ban>()?
            .register::<Reaction>()?
            .register::<Member>()?;
        registry.validate()?;
        Ok(registry)
    }

    /// Add a typed resource after checking its struct matches its descriptor.
    pub fn register<R: Resource>(mut self) -> Result<Self, ConfigError> {
        check_shape::<R>()?;
        self.resources.push(R::descriptor());
        Ok(self)
    }

    pub fn resources(&self) -> &[&'static ResourceDescriptor] {
        &self.resources
    }

    pub fn get(&self, name: &str) -> Option<&'static ResourceDescriptor> {
        self.resources.iter().copied().find(|r| r.name == name)
    }

    /// Resources holding a relation to `target`, with the relating field.
    pub fn dependents_of<'a>(
        &'a self,
        target: &'a str,
    ) -> impl Iterator<Item = (&'static ResourceDescriptor, &'static crate::model::Relation)> + 'a {
        self.resources.iter().flat_map(move |r| {
            r.relations
                .iter()
                .filter(move |rel| rel.target == target)
                .map(move |rel| (*r, rel))
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for r in &self.resources {
            if !names.insert(r.name) {
                return Err(ConfigError::DuplicateResource(r.name.to_string()));
            }
        }

        for r in &self.resources {
            if !r.has_field("id") {
                return Err(ConfigError::MissingId {
                    resource: r.name.to_string(),
                });
            }
            for rel in r.relations {
                if !r.has_field(rel.field) {
                    return Err(ConfigError::MissingReference {
                        kind: "relation field",
                        id: format!("{}.{}", r.name, rel.field),
                    });
                }
                if !names.contains(rel.target) {
                    return Err(ConfigError::MissingReference {
                        kind: "relation target",
                        id: format!("{} -> {}", r.name, rel.target),
                    });
                }
            }
            if let Some(Ownership::Columns(cols)) = r.owner {
                if cols.is_empty() {
                    return Err(ConfigError::MissingReference {
                        kind: "owner column",
                        id: r.name.to_string(),
                    });
                }
                for c in cols {
                    if !r.has_field(c) {
                        return Err(ConfigError::MissingReference {
                            kind: "owner column",
                            id: format!("{}.{}", r.name, c),
                        });
                    }
                }
            }
            for f in r.sensitive.iter().chain(r.protected).chain(&r.author) {
                if !r.has_field(f) {
                    return Err(ConfigError::MissingReference {
                        kind: "field",
                        id: format!("{}.{}", r.name, f),
                    });
                }
            }
        }
        Ok(())
    }
}
