//! City weather and clock widget - tui-dispatch application
//!
//! This library exposes the widget's modules for testing.

pub mod action;
pub mod api;
pub mod clock;
pub mod components;
pub mod effect;
pub mod error;
pub mod reducer;
pub mod state;
pub mod theme;
pub mod timers;
pub mod validate;
