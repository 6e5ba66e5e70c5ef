//! Identity tokens, roles and password hashing.

mod claims;
pub mod password;
mod token;

pub use claims::{Claims, Role};
pub use token::TokenService;
