//! Umbra: real-time camera preview with a GPU vignette filter.
//!
//! Captures video from a webcam on a dedicated worker thread, darkens the
//! edges of each frame with a vignette shader, center-crops the result to
//! the window's aspect ratio, and presents it on screen.

pub mod capture;
pub mod config;
pub mod crop;
pub mod filter;
pub mod frame;
pub mod output;
pub mod util;
