//! Controller-owned timers driven by the runtime's base tick
//!
//! Every timer lives in `AppState`, so a controller instance owns all of its
//! timers and dropping or quitting it cannot leave one running. At most one
//! clock timer exists at a time: starting either clock replaces the other.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Identity of one started timer. A restart always yields a fresh handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct TimerHandle(pub u64);

/// Which clock a clock timer renders
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ClockKind {
    Local,
    City,
}

/// Where a clock timer reads its time from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ClockSource {
    Local,
    City { utc_offset_secs: i32 },
}

impl ClockSource {
    pub fn kind(self) -> ClockKind {
        match self {
            ClockSource::Local => ClockKind::Local,
            ClockSource::City { .. } => ClockKind::City,
        }
    }
}

/// Repeating counter that fires every `period_ticks` ticks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Interval {
    period_ticks: u32,
    elapsed: u32,
}

impl Interval {
    pub fn new(period_ticks: u32) -> Self {
        Self {
            period_ticks: period_ticks.max(1),
            elapsed: 0,
        }
    }

    /// Advance one tick; true when the period completes.
    pub fn advance(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed >= self.period_ticks {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClockTimer {
    pub handle: TimerHandle,
    pub source: ClockSource,
    interval: Interval,
}

/// Blink toggle plus the countdown to expiry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BlinkTimer {
    pub handle: TimerHandle,
    toggle: Interval,
    remaining_ticks: u32,
}

impl BlinkTimer {
    pub fn remaining_ticks(&self) -> u32 {
        self.remaining_ticks
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlinkEvent {
    Toggle,
    Expired,
}

/// What fired during one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub clock: Option<ClockSource>,
    pub blink: Option<BlinkEvent>,
}

impl TickOutcome {
    pub fn is_idle(&self) -> bool {
        self.clock.is_none() && self.blink.is_none()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Timers {
    next_handle: u64,
    clock: Option<ClockTimer>,
    blink: Option<BlinkTimer>,
}

impl Timers {
    fn allocate(&mut self) -> TimerHandle {
        self.next_handle += 1;
        TimerHandle(self.next_handle)
    }

    /// Start a clock timer, cancelling whichever clock was running.
    pub fn start_clock(&mut self, source: ClockSource, period_ticks: u32) -> TimerHandle {
        if let Some(previous) = self.clock.take() {
            tracing::trace!(handle = previous.handle.0, "clock timer replaced");
        }
        let handle = self.allocate();
        self.clock = Some(ClockTimer {
            handle,
            source,
            interval: Interval::new(period_ticks),
        });
        handle
    }

    pub fn stop_clock(&mut self) -> Option<TimerHandle> {
        self.clock.take().map(|timer| timer.handle)
    }

    /// Start the blink sub-timer, cancelling a blink already in progress.
    pub fn start_blink(&mut self, period_ticks: u32, duration_ticks: u32) -> TimerHandle {
        let handle = self.allocate();
        self.blink = Some(BlinkTimer {
            handle,
            toggle: Interval::new(period_ticks),
            remaining_ticks: duration_ticks.max(1),
        });
        handle
    }

    pub fn stop_blink(&mut self) -> Option<TimerHandle> {
        self.blink.take().map(|timer| timer.handle)
    }

    pub fn stop_all(&mut self) {
        self.clock = None;
        self.blink = None;
    }

    pub fn clock(&self) -> Option<&ClockTimer> {
        self.clock.as_ref()
    }

    pub fn active_clock(&self) -> Option<ClockKind> {
        self.clock.map(|timer| timer.source.kind())
    }

    pub fn blink(&self) -> Option<&BlinkTimer> {
        self.blink.as_ref()
    }

    pub fn active_count(&self) -> usize {
        usize::from(self.clock.is_some()) + usize::from(self.blink.is_some())
    }

    /// Advance every running timer by one base tick.
    ///
    /// An expired blink timer removes itself; expiry wins over a toggle that
    /// would land on the same tick.
    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if let Some(timer) = self.clock.as_mut() {
            if timer.interval.advance() {
                outcome.clock = Some(timer.source);
            }
        }

        if let Some(timer) = self.blink.as_mut() {
            timer.remaining_ticks = timer.remaining_ticks.saturating_sub(1);
            if timer.remaining_ticks == 0 {
                self.blink = None;
                outcome.blink = Some(BlinkEvent::Expired);
            } else if timer.toggle.advance() {
                outcome.blink = Some(BlinkEvent::Toggle);
            }
        }

        outcome
    }
}
