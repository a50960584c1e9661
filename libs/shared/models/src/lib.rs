pub mod auth;
pub mod error;
pub mod notification;
pub mod time;

pub use time::{TimeOfDay, TimeParseError};
