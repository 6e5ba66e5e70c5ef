//! Resource model: descriptors, typed entities, registry and field validation.

mod descriptor;
pub mod entities;
mod registry;
mod resource;
mod validation;

pub use descriptor::*;
pub use registry::Registry;
pub use resource::{check_shape, from_body, from_row, to_row, Resource, SaveContext};
pub use validation::RequestValidator;
