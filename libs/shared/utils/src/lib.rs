pub mod extractor;
pub mod jwt;
pub mod notifier;
pub mod state;
pub mod test_utils;

pub use notifier::{Notifier, TracingNotifier};
pub use state::AppState;
