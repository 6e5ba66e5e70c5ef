//! Request extractors shared by handlers.

mod current_user;
mod json;

pub use current_user::CurrentUser;
pub use json::JsonBody;
