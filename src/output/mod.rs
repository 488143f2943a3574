//! On-screen preview output.

pub mod window_output;

pub use window_output::PreviewRenderer;
