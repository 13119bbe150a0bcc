//! Cyclic Pomodoro timer.
//!
//! Focus, short break and long break intervals alternate: after every
//! `sessions_per_cycle`-th focus the break is long, otherwise short, and any
//! break leads back to focus. The timer stops after each interval so the user
//! starts the next one explicitly.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::Tickable;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl PomodoroMode {
    pub fn label(self) -> &'static str {
        match self {
            PomodoroMode::Focus => "Focus",
            PomodoroMode::ShortBreak => "Short Break",
            PomodoroMode::LongBreak => "Long Break",
        }
    }

    pub fn is_break(self) -> bool {
        self != PomodoroMode::Focus
    }
}

/// Interval lengths in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroConfig {
    pub focus_secs: u64,
    pub short_break_secs: u64,
    pub long_break_secs: u64,
    pub sessions_per_cycle: u32,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            focus_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            sessions_per_cycle: 4,
        }
    }
}

impl PomodoroConfig {
    pub fn duration_of(&self, mode: PomodoroMode) -> u64 {
        match mode {
            PomodoroMode::Focus => self.focus_secs,
            PomodoroMode::ShortBreak => self.short_break_secs,
            PomodoroMode::LongBreak => self.long_break_secs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroTimer {
    config: PomodoroConfig,
    mode: PomodoroMode,
    time_left: u64,
    active: bool,
    sessions_completed: u32,
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new(PomodoroConfig::default())
    }
}

impl PomodoroTimer {
    pub fn new(config: PomodoroConfig) -> Self {
        Self {
            config,
            mode: PomodoroMode::Focus,
            time_left: config.focus_secs,
            active: false,
            sessions_completed: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> PomodoroMode {
        self.mode
    }

    pub fn time_left(&self) -> u64 {
        self.time_left
    }

    pub fn is_running(&self) -> bool {
        self.active
    }

    pub fn sessions_completed(&self) -> u32 {
        self.sessions_completed
    }

    /// Focus intervals completed in the current cycle.
    pub fn cycle_progress(&self) -> u32 {
        self.sessions_completed % self.config.sessions_per_cycle.max(1)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.active {
            return None;
        }
        self.active = true;
        Some(Event::TimerStarted {
            label: self.mode.label().to_string(),
            duration_secs: self.config.duration_of(self.mode),
            remaining_secs: self.time_left,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.active {
            return None;
        }
        self.active = false;
        Some(Event::TimerPaused {
            remaining_secs: self.time_left,
            at: Utc::now(),
        })
    }

    /// Start when stopped, pause when running.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.active {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Stop and reload the current mode's full duration.
    pub fn reset(&mut self) -> Option<Event> {
        self.active = false;
        self.time_left = self.config.duration_of(self.mode);
        Some(Event::TimerReset {
            mode: self.mode,
            remaining_secs: self.time_left,
            at: Utc::now(),
        })
    }

    /// Advance by one second. Returns an event when the interval elapses.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.active {
            return None;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left > 0 {
            return None;
        }
        Some(self.advance())
    }

    fn advance(&mut self) -> Event {
        self.active = false;
        let at = Utc::now();
        match self.mode {
            PomodoroMode::Focus => {
                let minutes = self.config.focus_secs / 60;
                self.sessions_completed += 1;
                let next = if self.sessions_completed % self.config.sessions_per_cycle.max(1) == 0 {
                    PomodoroMode::LongBreak
                } else {
                    PomodoroMode::ShortBreak
                };
                self.switch_to(next);
                tracing::debug!(sessions = self.sessions_completed, next = next.label(), "focus completed");
                Event::FocusCompleted {
                    minutes,
                    sessions_completed: self.sessions_completed,
                    next_mode: next,
                    at,
                }
            }
            mode => {
                self.switch_to(PomodoroMode::Focus);
                Event::BreakCompleted { mode, at }
            }
        }
    }

    fn switch_to(&mut self, mode: PomodoroMode) {
        self.mode = mode;
        self.time_left = self.config.duration_of(mode);
    }
}

impl Tickable for PomodoroTimer {
    fn tick(&mut self) -> Option<Event> {
        PomodoroTimer::tick(self)
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> PomodoroConfig {
        PomodoroConfig {
            focus_secs: 3,
            short_break_secs: 1,
            long_break_secs: 2,
            sessions_per_cycle: 4,
        }
    }

    fn run_interval(t: &mut PomodoroTimer) -> Event {
        t.start();
        loop {
            if let Some(ev) = t.tick() {
                return ev;
            }
        }
    }

    #[test]
    fn default_durations() {
        let t = PomodoroTimer::default();
        assert_eq!(t.mode(), PomodoroMode::Focus);
        assert_eq!(t.time_left(), 1500);
        let c = PomodoroConfig::default();
        assert_eq!(c.duration_of(PomodoroMode::ShortBreak), 300);
        assert_eq!(c.duration_of(PomodoroMode::LongBreak), 900);
    }

    #[test]
    fn focus_completion_reports_minutes_then_short_break() {
        let mut t = PomodoroTimer::default();
        match run_interval(&mut t) {
            Event::FocusCompleted {
                minutes,
                sessions_completed,
                next_mode,
                ..
            } => {
                assert_eq!(minutes, 25);
                assert_eq!(sessions_completed, 1);
                assert_eq!(next_mode, PomodoroMode::ShortBreak);
            }
            other => panic!("Expected FocusCompleted, got {other:?}"),
        }
        assert_eq!(t.mode(), PomodoroMode::ShortBreak);
        assert_eq!(t.time_left(), 300);
        assert!(!t.is_running());
    }

    #[test]
    fn every_fourth_focus_earns_long_break() {
        let mut t = PomodoroTimer::new(tiny());
        let mut breaks = Vec::new();
        for _ in 0..8 {
            run_interval(&mut t);
            breaks.push(t.mode());
            let back = run_interval(&mut t);
            assert!(matches!(back, Event::BreakCompleted { .. }));
            assert_eq!(t.mode(), PomodoroMode::Focus);
        }
        use PomodoroMode::*;
        assert_eq!(
            breaks,
            [ShortBreak, ShortBreak, ShortBreak, LongBreak, ShortBreak, ShortBreak, ShortBreak, LongBreak]
        );
        assert_eq!(t.sessions_completed(), 8);
        assert_eq!(t.cycle_progress(), 0);
    }

    #[test]
    fn pause_keeps_time_left() {
        let mut t = PomodoroTimer::default();
        t.toggle();
        t.tick();
        t.tick();
        t.toggle();
        assert!(!t.is_running());
        assert!(t.tick().is_none());
        assert_eq!(t.time_left(), 1498);
    }

    #[test]
    fn reset_reloads_current_mode() {
        let mut t = PomodoroTimer::new(tiny());
        run_interval(&mut t);
        t.start();
        assert_eq!(t.time_left(), 1);
        t.reset();
        assert_eq!(t.mode(), PomodoroMode::ShortBreak);
        assert_eq!(t.time_left(), 1);
        assert!(!t.is_running());

        let mut t = PomodoroTimer::default();
        t.start();
        for _ in 0..100 {
            t.tick();
        }
        t.reset();
        assert_eq!(t.time_left(), 1500);
        assert!(!t.is_running());
    }
}
