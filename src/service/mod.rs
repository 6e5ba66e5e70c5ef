//! ResourceController: generic CRUD for typed resources.

mod controller;
pub use controller::ResourceController;
