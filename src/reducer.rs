//! Reducer - the display controller as a pure function: (state, action) -> DispatchResult

use tracing::{debug, info, warn};
use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::clock::ClockReading;
use crate::effect::Effect;
use crate::error::QueryError;
use crate::state::{AppState, BlinkingError, ViewState, WeatherResult};
use crate::theme::Theme;
use crate::timers::{BlinkEvent, ClockSource};
use crate::validate::validate_query;

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Search actions =====
        Action::SearchInputChange(text) => {
            state.search_input = text;
            DispatchResult::changed()
        }

        Action::SearchSubmit(raw) => match validate_query(&raw) {
            Err(error) => {
                debug!(input = %raw, %error, "search rejected");
                show_blinking_error(state, error.to_string());
                DispatchResult::changed()
            }
            Ok(query) => {
                state.timers.stop_clock();
                state.timers.stop_blink();
                state.clock = None;
                state.view = ViewState::Loading;
                state.request_seq += 1;
                info!(city = query.as_str(), seq = state.request_seq, "search submitted");
                DispatchResult::changed_with(Effect::FetchWeather {
                    city: query.into_inner(),
                    seq: state.request_seq,
                })
            }
        },

        // ===== Weather actions =====
        Action::WeatherDidLoad(seq, result) => {
            if seq != state.request_seq {
                debug!(seq, latest = state.request_seq, "stale result discarded");
                return DispatchResult::unchanged();
            }
            show_result(state, result);
            DispatchResult::changed()
        }

        Action::WeatherDidError(seq, error) => {
            if seq != state.request_seq {
                debug!(seq, latest = state.request_seq, "stale failure discarded");
                return DispatchResult::unchanged();
            }
            query_failed(state, &error);
            DispatchResult::changed()
        }

        // ===== Global actions =====
        Action::Start(now) => {
            state.now = now;
            state.timers.stop_all();
            show_local_clock(state);
            DispatchResult::changed()
        }

        Action::Tick(now) => {
            state.now = now;
            let outcome = state.timers.tick();
            if outcome.is_idle() {
                return DispatchResult::unchanged();
            }

            if let Some(source) = outcome.clock {
                state.clock = Some(ClockReading::read(source, now));
            }
            match outcome.blink {
                Some(BlinkEvent::Toggle) => {
                    if let ViewState::BlinkingError(error) = &mut state.view {
                        error.visible = !error.visible;
                    }
                }
                Some(BlinkEvent::Expired) => blinking_error_expired(state),
                None => {}
            }
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        Action::Quit => {
            state.timers.stop_all();
            DispatchResult::unchanged()
        }
    }
}

/// Start (or restart) the local clock and render it right away.
fn show_local_clock(state: &mut AppState) {
    state.view = ViewState::LocalClock;
    state
        .timers
        .start_clock(ClockSource::Local, state.timing.clock_period_ticks);
    state.clock = Some(ClockReading::read(ClockSource::Local, state.now));
}

fn show_result(state: &mut AppState, result: WeatherResult) {
    let source = ClockSource::City {
        utc_offset_secs: result.utc_offset_secs,
    };
    state.timers.stop_blink();
    state
        .timers
        .start_clock(source, state.timing.clock_period_ticks);
    state.clock = Some(ClockReading::read(source, state.now));
    state.theme = Theme::from_condition(&result.condition);
    info!(
        city = %result.display_name(),
        theme = ?state.theme,
        "weather loaded"
    );
    state.view = ViewState::Result(result);
}

fn query_failed(state: &mut AppState, error: &QueryError) {
    warn!(%error, "weather query failed");
    show_blinking_error(state, error.message());
}

/// Replace whatever is showing with a fresh blinking error.
///
/// Clocks stop while the error is up; a blink already running is restarted.
fn show_blinking_error(state: &mut AppState, message: String) {
    state.timers.stop_clock();
    state.timers.start_blink(
        state.timing.blink_period_ticks,
        state.timing.error_duration_ticks,
    );
    state.clock = None;
    state.view = ViewState::BlinkingError(BlinkingError {
        message,
        visible: true,
    });
}

fn blinking_error_expired(state: &mut AppState) {
    debug!("blinking error expired");
    show_local_clock(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DeviceInstant, Timing};
    use crate::timers::ClockKind;

    fn started() -> AppState {
        let mut state = AppState::new(Timing::from_millis(100, 1_000, 200, 500));
        reducer(&mut state, Action::Start(DeviceInstant::new(0, 0)));
        state
    }

    fn tick(state: &mut AppState, n: u32) {
        for _ in 0..n {
            let now = state.now;
            reducer(
                state,
                Action::Tick(DeviceInstant::new(now.utc_millis + 100, now.utc_offset_secs)),
            );
        }
    }

    #[test]
    fn test_start_shows_local_clock() {
        let state = started();
        assert!(state.view.is_local_clock());
        assert_eq!(state.timers.active_clock(), Some(ClockKind::Local));
        assert_eq!(
            state.clock.as_ref().map(|c| c.time.as_str()),
            Some("00:00:00")
        );
    }

    #[test]
    fn test_valid_submit_is_synchronously_loading() {
        let mut state = started();
        let result = reducer(&mut state, Action::SearchSubmit("  Tokyo ".into()));

        assert!(result.changed);
        assert!(state.view.is_loading());
        assert_eq!(state.timers.active_clock(), None);
        assert_eq!(
            result.effects,
            vec![Effect::FetchWeather {
                city: "Tokyo".into(),
                seq: 1
            }]
        );
    }

    #[test]
    fn test_invalid_submit_blinks_without_effect() {
        let mut state = started();
        let result = reducer(&mut state, Action::SearchSubmit("!!".into()));

        assert!(result.effects.is_empty());
        assert_eq!(
            state.view.blinking_error().map(|e| e.message.as_str()),
            Some("Only letters are allowed.")
        );
        assert_eq!(state.timers.active_clock(), None);
        assert!(state.timers.blink().is_some());
    }

    #[test]
    fn test_blink_toggles_then_expires() {
        let mut state = started();
        reducer(&mut state, Action::SearchSubmit("".into()));

        tick(&mut state, 2);
        assert_eq!(state.view.blinking_error().map(|e| e.visible), Some(false));
        tick(&mut state, 2);
        assert_eq!(state.view.blinking_error().map(|e| e.visible), Some(true));

        tick(&mut state, 1);
        assert!(state.view.is_local_clock());
        assert_eq!(state.timers.active_clock(), Some(ClockKind::Local));
        assert!(state.timers.blink().is_none());
    }

    #[test]
    fn test_new_error_restarts_blink() {
        let mut state = started();
        reducer(&mut state, Action::SearchSubmit("".into()));
        tick(&mut state, 4);
        reducer(&mut state, Action::SearchSubmit("a".into()));

        assert_eq!(
            state.view.blinking_error().map(|e| e.message.as_str()),
            Some("City name is too short.")
        );
        assert_eq!(state.timers.blink().map(|b| b.remaining_ticks()), Some(5));
    }

    #[test]
    fn test_valid_submit_during_error_cancels_blink() {
        let mut state = started();
        reducer(&mut state, Action::SearchSubmit("1".into()));
        reducer(&mut state, Action::SearchSubmit("Lima".into()));
        assert_eq!(state.timers.active_count(), 0);

        tick(&mut state, 10);
        assert!(state.view.is_loading());
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut state = started();
        reducer(&mut state, Action::SearchSubmit("Paris".into()));
        reducer(&mut state, Action::SearchSubmit("Rome".into()));

        let stale = reducer(
            &mut state,
            Action::WeatherDidError(1, QueryError::NotFound),
        );
        assert!(!stale.changed);
        assert!(state.view.is_loading());
    }

    #[test]
    fn test_result_starts_city_clock_and_theme() {
        let mut state = started();
        reducer(&mut state, Action::SearchSubmit("Oslo".into()));
        let result = WeatherResult {
            name: "Oslo".into(),
            condition: "Snow".into(),
            utc_offset_secs: 3600,
            ..Default::default()
        };
        reducer(&mut state, Action::WeatherDidLoad(1, result));

        assert!(state.view.result().is_some());
        assert_eq!(state.timers.active_clock(), Some(ClockKind::City));
        assert_eq!(state.theme, Theme::Snow);
        assert_eq!(
            state.clock.as_ref().map(|c| c.time.as_str()),
            Some("01:00:00")
        );
    }

    #[test]
    fn test_idle_tick_is_unchanged() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Tick(DeviceInstant::new(5_000, 0)));
        assert!(!result.changed);
        assert_eq!(state.now.utc_millis, 5_000);
    }

    #[test]
    fn test_quit_cancels_timers() {
        let mut state = started();
        reducer(&mut state, Action::SearchSubmit("?".into()));
        reducer(&mut state, Action::Quit);
        assert_eq!(state.timers.active_count(), 0);
    }
}
