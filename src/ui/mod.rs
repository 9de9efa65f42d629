//! UI layer: application orchestrator, color LUT, and analytics windows.

pub mod app;
pub mod colors;
pub mod window;
pub mod windows;
