//! The three session views

pub mod processing;
pub mod result;
pub mod upload;

pub use processing::render_processing_view;
pub use result::render_result_view;
pub use upload::render_upload_view;
