//! Chat platform entities.

mod ban;
mod channel;
mod friend;
mod member;
mod message;
mod reaction;
mod role;
mod server;
mod user;

pub use ban::{Ban, BANS};
pub use channel::{Channel, ChannelKind, CHANNELS};
pub use friend::{Friend, FriendStatus, FRIENDS};
pub use member::{Member, MEMBERS};
pub use message::{Message, MESSAGES};
pub use reaction::{Reaction, REACTIONS};
pub use role::{ServerRole, ROLES};
pub use server::{Server, SERVERS};
pub use user::{User, USERS};
