use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Subcommand;
use focusflow_core::{Event, PomodoroTimer, Ticker};
use tokio::sync::mpsc;

use super::{print_json, runtime, App, CliResult};

#[derive(Subcommand)]
pub enum PomodoroAction {
    /// Run focus/break intervals in the foreground; Ctrl-C stops
    Run {
        /// Number of focus blocks to complete before exiting
        #[arg(long, default_value = "1")]
        cycles: u32,
        /// Skip the break after the last focus block
        #[arg(long)]
        no_final_break: bool,
    },
    /// Print the configured interval lengths
    Config,
}

pub fn run(action: PomodoroAction) -> CliResult {
    let mut app = App::load()?;

    match action {
        PomodoroAction::Run {
            cycles,
            no_final_break,
        } => runtime()?.block_on(run_cycles(&mut app, cycles.max(1), no_final_break))?,
        PomodoroAction::Config => print_json(&app.config.timer.pomodoro())?,
    }
    Ok(())
}

enum Interval {
    Finished(Vec<Event>),
    Interrupted,
}

async fn run_cycles(app: &mut App, cycles: u32, no_final_break: bool) -> CliResult {
    let timer = Arc::new(Mutex::new(PomodoroTimer::new(app.config.timer.pomodoro())));
    let mut focus_done = 0;

    loop {
        {
            let mut guard = timer.lock().map_err(|_| "timer lock poisoned")?;
            if guard.mode().is_break() && focus_done >= cycles && no_final_break {
                break;
            }
            if let Some(event) = guard.start() {
                print_json(&event)?;
            }
        }

        let events = match run_interval(&timer).await? {
            Interval::Finished(events) => events,
            Interval::Interrupted => {
                eprintln!("interrupted; the unfinished interval was not recorded");
                break;
            }
        };

        for event in &events {
            print_json(event)?;
            if let Event::FocusCompleted { minutes, .. } = event {
                focus_done += 1;
                match app.manager.record_focus(*minutes) {
                    Ok(record) => print_json(&record)?,
                    Err(e) => eprintln!("failed to record focus block: {e}"),
                }
            }
        }

        let back_to_focus = events
            .iter()
            .any(|e| matches!(e, Event::BreakCompleted { .. }));
        if back_to_focus && focus_done >= cycles {
            break;
        }
    }
    Ok(())
}

/// Tick one interval to its end, collecting the events it produced.
async fn run_interval(timer: &Arc<Mutex<PomodoroTimer>>) -> CliResult<Interval> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = Ticker::spawn(Duration::from_secs(1), Arc::clone(timer), tx);

    let mut events = Vec::new();
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => events.push(event),
                // Ticker exits when the interval ends and the timer stops.
                None => return Ok(Interval::Finished(events)),
            },
            _ = tokio::signal::ctrl_c() => {
                handle.stop();
                let mut guard = timer.lock().map_err(|_| "timer lock poisoned")?;
                guard.pause();
                return Ok(Interval::Interrupted);
            }
        }
    }
}
