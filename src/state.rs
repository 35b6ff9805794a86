//! Application state - single source of truth

use chrono::Local;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_ICON_HOST;
use crate::clock::ClockReading;
use crate::theme::Theme;
use crate::timers::Timers;

/// Base tick of the runtime; every controller timer counts these.
pub const TICK_MS: u64 = 100;
/// Both clock timers repaint once a second.
pub const CLOCK_PERIOD_MS: u64 = 1_000;
/// Message/blank toggle cadence of a blinking error.
pub const BLINK_PERIOD_MS: u64 = 2_500;
/// How long a blinking error stays before the local clock returns.
pub const ERROR_DURATION_MS: u64 = 5_000;

/// A wall-clock reading of the device.
///
/// Ticks carry one of these so the reducer never reads the system clock itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DeviceInstant {
    /// Milliseconds since the Unix epoch (UTC).
    pub utc_millis: i64,
    /// Device local time minus UTC, in seconds.
    pub utc_offset_secs: i32,
}

impl DeviceInstant {
    pub fn new(utc_millis: i64, utc_offset_secs: i32) -> Self {
        Self {
            utc_millis,
            utc_offset_secs,
        }
    }

    pub fn now() -> Self {
        let now = Local::now();
        Self {
            utc_millis: now.timestamp_millis(),
            utc_offset_secs: now.offset().local_minus_utc(),
        }
    }
}

/// Current weather for one city, as returned by the provider
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherResult {
    pub name: String,
    pub country: String,
    pub temperature: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    /// Coarse category such as "Rain" or "Clear"; drives the theme
    pub condition: String,
    pub description: String,
    pub icon: String,
    pub utc_offset_secs: i32,
}

impl WeatherResult {
    /// "Paris, FR", or just the name when the provider sent no country
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }

    pub fn icon_url(&self, icon_host: &str) -> String {
        format!(
            "{}/img/wn/{}@2x.png",
            icon_host.trim_end_matches('/'),
            self.icon
        )
    }

    /// Terminal stand-in for the provider's icon image.
    pub fn icon_emoji(&self) -> &'static str {
        match self.icon.get(..2).unwrap_or_default() {
            "01" => "\u{2600}\u{fe0f}",
            "02" => "\u{1f324}\u{fe0f}",
            "03" | "04" => "\u{2601}\u{fe0f}",
            "09" | "10" => "\u{1f327}\u{fe0f}",
            "11" => "\u{26c8}\u{fe0f}",
            "13" => "\u{2744}\u{fe0f}",
            "50" => "\u{1f32b}\u{fe0f}",
            _ => "\u{1f321}\u{fe0f}",
        }
    }
}

/// A transient message that toggles with a blank row until it expires
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BlinkingError {
    pub message: String,
    pub visible: bool,
}

/// What the display region shows. Exactly one is active.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum ViewState {
    #[default]
    LocalClock,
    Loading,
    Result(WeatherResult),
    BlinkingError(BlinkingError),
}

impl ViewState {
    pub fn is_local_clock(&self) -> bool {
        matches!(self, ViewState::LocalClock)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn result(&self) -> Option<&WeatherResult> {
        match self {
            ViewState::Result(result) => Some(result),
            _ => None,
        }
    }

    pub fn blinking_error(&self) -> Option<&BlinkingError> {
        match self {
            ViewState::BlinkingError(error) => Some(error),
            _ => None,
        }
    }
}

/// Timer periods expressed in base ticks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Timing {
    pub tick_ms: u64,
    pub clock_period_ticks: u32,
    pub blink_period_ticks: u32,
    pub error_duration_ticks: u32,
}

impl Timing {
    /// Convert millisecond durations into whole ticks (never less than one).
    pub fn from_millis(tick_ms: u64, clock_ms: u64, blink_ms: u64, error_ms: u64) -> Self {
        let tick_ms = tick_ms.max(1);
        let ticks = |ms: u64| u32::try_from((ms / tick_ms).max(1)).unwrap_or(u32::MAX);
        Self {
            tick_ms,
            clock_period_ticks: ticks(clock_ms),
            blink_period_ticks: ticks(blink_ms),
            error_duration_ticks: ticks(error_ms),
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::from_millis(TICK_MS, CLOCK_PERIOD_MS, BLINK_PERIOD_MS, ERROR_DURATION_MS)
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// LocalClock → Loading → Result / BlinkingError → LocalClock
    #[debug(section = "View", label = "State", debug_fmt)]
    pub view: ViewState,

    /// Last rendered clock reading (local or city, whichever timer runs)
    #[debug(section = "View", label = "Clock", debug_fmt)]
    pub clock: Option<ClockReading>,

    /// Background theme derived from the last successful result
    #[debug(section = "View", label = "Theme", debug_fmt)]
    pub theme: Theme,

    /// Sequence number of the latest issued query
    #[debug(section = "Query", label = "Sequence")]
    pub request_seq: u64,

    // --- Controller internals (skipped) ---
    /// Clock and blink timer handles
    #[debug(skip)]
    pub timers: Timers,

    /// Device time as of the last tick
    #[debug(skip)]
    pub now: DeviceInstant,

    #[debug(skip)]
    pub timing: Timing,

    // --- Input (skipped) ---
    /// Current text of the city input
    #[debug(skip)]
    pub search_input: String,

    #[debug(skip)]
    pub icon_host: String,
}

impl AppState {
    pub fn new(timing: Timing) -> Self {
        Self {
            view: ViewState::LocalClock,
            clock: None,
            theme: Theme::default(),
            request_seq: 0,
            timers: Timers::default(),
            now: DeviceInstant::default(),
            timing,
            search_input: String::new(),
            icon_host: DEFAULT_ICON_HOST.to_string(),
        }
    }

    pub fn with_icon_host(mut self, icon_host: impl Into<String>) -> Self {
        self.icon_host = icon_host.into();
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Timing::default())
    }
}
