//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, status bar and overlays
//! - `documents`: document list and detail panels
//! - `input`: keyboard event handling
//! - `styles`: color scheme and text styling

pub mod documents;
pub mod input;
pub mod render;
pub mod styles;
