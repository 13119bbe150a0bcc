mod pomodoro;
mod session;
mod ticker;

pub use pomodoro::{PomodoroConfig, PomodoroMode, PomodoroTimer};
pub use session::{ActiveTimerSession, TimerState};
pub use ticker::{SharedTimer, Ticker, TickerHandle};

use crate::events::Event;

/// A countdown advanced one step per tick by a [`Ticker`].
pub trait Tickable: Send + 'static {
    /// Advance by one period. Returns an event on a state change worth reporting.
    fn tick(&mut self) -> Option<Event>;

    /// Whether the countdown is currently running.
    fn is_active(&self) -> bool;
}
