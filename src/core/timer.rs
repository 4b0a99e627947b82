//! Session timers
//!
//! Every timer the session arms is an explicit value advanced by elapsed
//! milliseconds from the session tick; there are no callbacks and no shared
//! handles. `Countdown` is a one-shot, `Ticker` a repeating interval, and
//! `AutoShift` the DAS/ARR pair for held directional keys.

use arrayvec::ArrayVec;

use crate::types::{MoveDir, ARR_MS, DAS_MS};

/// One-shot countdown. Armed with a duration, fires once, then disarms.
/// Re-arming restarts it; cancelling disarms it without firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown {
    remaining_ms: Option<u32>,
}

impl Countdown {
    pub fn arm(&mut self, duration_ms: u32) {
        self.remaining_ms = Some(duration_ms);
    }

    pub fn cancel(&mut self) {
        self.remaining_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining_ms.is_some()
    }

    pub fn remaining_ms(&self) -> Option<u32> {
        self.remaining_ms
    }

    /// Advance by `elapsed_ms`; true exactly once, when the countdown hits
    /// zero.
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        match self.remaining_ms {
            Some(remaining) if remaining <= elapsed_ms => {
                self.remaining_ms = None;
                true
            }
            Some(remaining) => {
                self.remaining_ms = Some(remaining - elapsed_ms);
                false
            }
            None => false,
        }
    }
}

/// Repeating interval timer. Reports how many whole intervals elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticker {
    interval_ms: u32,
    accumulated_ms: u32,
    running: bool,
}

impl Ticker {
    /// Create a stopped ticker with the given interval.
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            accumulated_ms: 0,
            running: false,
        }
    }

    /// Start, or restart from a full interval.
    pub fn restart(&mut self) {
        self.accumulated_ms = 0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.accumulated_ms = 0;
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by `elapsed_ms`, returning the number of intervals that
    /// completed.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if !self.running {
            return 0;
        }
        self.accumulated_ms += elapsed_ms;
        let fires = self.accumulated_ms / self.interval_ms;
        self.accumulated_ms %= self.interval_ms;
        fires
    }
}

/// Horizontal auto-shift: a held direction repeats after an initial delay
/// (DAS), then at a fixed rate (ARR). Releasing the key cancels both; if the
/// opposing key is still held, the delay re-arms for it.
#[derive(Debug, Clone)]
pub struct AutoShift {
    das_ms: u32,
    held_left: bool,
    held_right: bool,
    active: Option<MoveDir>,
    delay: Countdown,
    repeat: Ticker,
}

impl AutoShift {
    pub fn new() -> Self {
        Self::with_config(DAS_MS, ARR_MS)
    }

    pub fn with_config(das_ms: u32, arr_ms: u32) -> Self {
        Self {
            das_ms,
            held_left: false,
            held_right: false,
            active: None,
            delay: Countdown::default(),
            repeat: Ticker::new(arr_ms),
        }
    }

    fn start_shift(&mut self, dir: MoveDir) {
        self.active = Some(dir);
        self.delay.arm(self.das_ms);
        self.repeat.stop();
    }

    /// Register a key press. Returns true when this is a fresh press (the
    /// caller applies the immediate single shift); repeats from a key held
    /// down are ignored.
    pub fn key_down(&mut self, dir: MoveDir) -> bool {
        match dir {
            MoveDir::Left => {
                if self.held_left {
                    return false;
                }
                self.held_left = true;
            }
            MoveDir::Right => {
                if self.held_right {
                    return false;
                }
                self.held_right = true;
            }
            MoveDir::Down => return false,
        }
        self.start_shift(dir);
        true
    }

    /// Register a key release; falls back to the opposing key if held.
    pub fn key_up(&mut self, dir: MoveDir) {
        match dir {
            MoveDir::Left => self.held_left = false,
            MoveDir::Right => self.held_right = false,
            MoveDir::Down => return,
        }

        if self.active == Some(dir) {
            if dir == MoveDir::Left && self.held_right {
                self.start_shift(MoveDir::Right);
            } else if dir == MoveDir::Right && self.held_left {
                self.start_shift(MoveDir::Left);
            } else {
                self.cancel();
            }
        }
    }

    /// Drop all held state and disarm both timers.
    pub fn cancel(&mut self) {
        self.held_left = false;
        self.held_right = false;
        self.active = None;
        self.delay.cancel();
        self.repeat.stop();
    }

    /// Advance both timers, returning one entry per repeat shift due.
    pub fn advance(&mut self, elapsed_ms: u32) -> ArrayVec<MoveDir, 32> {
        let mut shifts = ArrayVec::new();
        let Some(dir) = self.active else {
            return shifts;
        };

        // Time left over after the delay fires feeds the repeat loop.
        let mut repeat_budget = elapsed_ms;
        if self.delay.is_armed() {
            let before = self.delay.remaining_ms().unwrap_or(0);
            if self.delay.advance(elapsed_ms) {
                self.repeat.restart();
                repeat_budget = elapsed_ms.saturating_sub(before);
            } else {
                return shifts;
            }
        }

        for _ in 0..self.repeat.advance(repeat_budget) {
            if shifts.try_push(dir).is_err() {
                break;
            }
        }
        shifts
    }
}

impl Default for AutoShift {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_fires_once() {
        let mut timer = Countdown::default();
        timer.arm(100);
        assert!(!timer.advance(99));
        assert!(timer.advance(1));
        assert!(!timer.advance(1000));
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_countdown_cancel_prevents_fire() {
        let mut timer = Countdown::default();
        timer.arm(50);
        timer.cancel();
        assert!(!timer.advance(1000));
    }

    #[test]
    fn test_rearm_restarts_countdown() {
        let mut timer = Countdown::default();
        timer.arm(100);
        timer.advance(90);
        timer.arm(100);
        assert!(!timer.advance(90));
        assert!(timer.advance(10));
    }

    #[test]
    fn test_ticker_counts_whole_intervals() {
        let mut ticker = Ticker::new(10);
        assert_eq!(ticker.advance(100), 0, "stopped ticker never fires");

        ticker.restart();
        assert_eq!(ticker.advance(25), 2);
        assert_eq!(ticker.advance(5), 1);
        ticker.stop();
        assert_eq!(ticker.advance(100), 0);
    }

    #[test]
    fn test_auto_shift_repeats_after_das() {
        let mut shift = AutoShift::with_config(100, 25);
        assert!(shift.key_down(MoveDir::Left));
        // Held key: no second immediate shift.
        assert!(!shift.key_down(MoveDir::Left));

        // Still inside the initial delay.
        assert!(shift.advance(99).is_empty());
        // Delay fires at 100; the 26ms excess covers one repeat.
        assert_eq!(shift.advance(26).as_slice(), &[MoveDir::Left]);
        assert_eq!(shift.advance(50).len(), 2);
    }

    #[test]
    fn test_auto_shift_release_stops_repeats() {
        let mut shift = AutoShift::with_config(100, 25);
        shift.key_down(MoveDir::Right);
        shift.advance(150);
        shift.key_up(MoveDir::Right);
        assert!(shift.advance(1000).is_empty());
    }

    #[test]
    fn test_auto_shift_release_falls_back_to_opposing_key() {
        let mut shift = AutoShift::with_config(100, 25);
        shift.key_down(MoveDir::Left);
        shift.key_down(MoveDir::Right);
        shift.key_up(MoveDir::Right);

        // Left is still held: a fresh delay runs, then left repeats.
        assert!(shift.advance(99).is_empty());
        assert_eq!(shift.advance(26).as_slice(), &[MoveDir::Left]);
    }

    #[test]
    fn test_auto_shift_ignores_down() {
        let mut shift = AutoShift::new();
        assert!(!shift.key_down(MoveDir::Down));
        assert!(shift.advance(10_000).is_empty());
    }
}
