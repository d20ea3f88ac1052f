//! Shared state and messaging between the UI thread and job tasks
//!
//! Job tasks run on the tokio runtime and talk to the UI only through
//! [`JobEvent`]s; application-wide settings and counters live in
//! [`SharedAppState`].

pub mod messages;
pub mod state;

pub use messages::JobEvent;
pub use state::{RuntimeState, SharedAppState};
