//! Reusable UI components

pub mod drop_zone;
pub mod stat_card;

pub use drop_zone::DropZone;
pub use stat_card::StatCard;
