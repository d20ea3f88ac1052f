//! Desktop UI
//!
//! A single egui window that shows one of the three session views, with a
//! header for the theme toggle and a blocking notice for user-facing errors.

pub mod app;
pub mod components;
pub mod state;
pub mod theme;
pub mod views;

pub use app::{run, TextLensUi};
