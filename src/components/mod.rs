//! UI components.

pub mod isometric;
