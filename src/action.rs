//! Actions: user intents, timer ticks and query completions

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::state::{DeviceInstant, WeatherResult};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Search category =====
    /// City input text changed
    SearchInputChange(String),

    /// Submit the raw input (button or Enter)
    SearchSubmit(String),

    // ===== Weather category =====
    /// Result: query with the given sequence number succeeded
    WeatherDidLoad(u64, WeatherResult),

    /// Result: query with the given sequence number failed
    WeatherDidError(u64, QueryError),

    // ===== Uncategorized (global) =====
    /// Show the local clock and start its timer
    Start(DeviceInstant),

    /// Base tick; advances every controller timer
    Tick(DeviceInstant),

    /// Force a re-render (cursor movement etc.)
    Render,

    /// Exit the application; cancels all timers
    Quit,
}
