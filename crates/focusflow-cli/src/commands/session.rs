use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Subcommand;
use focusflow_core::manager::SessionOutcome;
use focusflow_core::{CoreError, Event, Ticker};
use tokio::sync::mpsc;

use super::{print_json, runtime, App, CliResult};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start the plan subject at INDEX (0-based)
    Start {
        index: usize,
    },
    /// Count down the active session in the foreground; Ctrl-C stops it early
    Run {
        /// Start this plan subject first
        #[arg(long)]
        index: Option<usize>,
    },
    /// Pause the active session
    Pause,
    /// Resume a paused session
    Resume,
    /// End the active session early
    Stop,
    /// Print the active session as JSON
    Status,
}

pub fn run(action: SessionAction) -> CliResult {
    let mut app = App::load()?;

    match action {
        SessionAction::Start { index } => {
            let session = app.manager.start_plan_subject(index)?;
            print_json(session)?;
        }
        SessionAction::Run { index } => {
            if let Some(index) = index {
                app.manager.start_plan_subject(index)?;
            }
            let outcome = runtime()?.block_on(drive(&mut app))?;
            report(&outcome)?;
        }
        SessionAction::Pause => {
            let session = app.manager.active_mut().ok_or(CoreError::NoActiveSession)?;
            match session.pause() {
                Some(event) => print_json(&event)?,
                None => println!("session is not running"),
            }
        }
        SessionAction::Resume => {
            let session = app.manager.active_mut().ok_or(CoreError::NoActiveSession)?;
            match session.resume() {
                Some(event) => print_json(&event)?,
                None => println!("session is not paused"),
            }
        }
        SessionAction::Stop => {
            let session = app.manager.active_mut().ok_or(CoreError::NoActiveSession)?;
            let event = session.stop().ok_or(CoreError::NoActiveSession)?;
            if let Some(outcome) = app.manager.handle_event(&event)? {
                report(&outcome)?;
            }
        }
        SessionAction::Status => match app.manager.active() {
            Some(session) => print_json(&serde_json::json!({
                "session": session,
                "state": session.state(),
                "progress": session.progress(),
            }))?,
            None => print_json(&serde_json::json!({ "session": null }))?,
        },
    }

    app.save()?;
    Ok(())
}

/// Tick the active session once per second until it completes or the user
/// interrupts, then close it through the manager.
async fn drive(app: &mut App) -> CliResult<SessionOutcome> {
    let mut session = app
        .manager
        .active()
        .cloned()
        .ok_or(CoreError::NoActiveSession)?;
    session.start();
    eprintln!(
        "Studying {} ({}) -- {} left. Ctrl-C to stop early.",
        session.subject,
        session.topic,
        mmss(session.time_left)
    );

    let timer = Arc::new(Mutex::new(session));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = Ticker::spawn(Duration::from_secs(1), Arc::clone(&timer), tx);

    let ended = loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) if event.is_session_end() => break event,
                Some(event) => print_json(&event)?,
                None => return Err("timer stopped unexpectedly".into()),
            },
            _ = tokio::signal::ctrl_c() => {
                handle.stop();
                let stopped = timer.lock().map_err(|_| "timer lock poisoned")?.stop();
                match stopped {
                    Some(event) => break event,
                    // Completed in the same instant; the end event is queued.
                    None => match rx.recv().await {
                        Some(event) => break event,
                        None => return Err("timer stopped unexpectedly".into()),
                    },
                }
            }
        }
    };

    if let Event::SessionEnded { time_left, .. } = &ended {
        if let Some(active) = app.manager.active_mut() {
            active.time_left = *time_left;
        }
    }
    let outcome = app
        .manager
        .handle_event(&ended)?
        .ok_or("session did not end")?;
    Ok(outcome)
}

fn report(outcome: &SessionOutcome) -> CliResult {
    if let Some(message) = &outcome.log_error {
        eprintln!("{message}");
    }
    print_json(outcome)
}

fn mmss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
