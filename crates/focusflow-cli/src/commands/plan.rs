use std::io::Read;
use std::path::PathBuf;

use clap::Subcommand;
use focusflow_core::CoreError;

use super::{print_json, App, CliResult};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Print the current plan as JSON
    Show,
    /// Extract a plan from an assistant reply (file, or stdin when omitted)
    Import {
        /// Markdown file containing the reply
        file: Option<PathBuf>,
    },
    /// Print the first subject not yet completed
    Next,
    /// Forget the current plan
    Clear,
}

pub fn run(action: PlanAction) -> CliResult {
    let mut app = App::load()?;

    match action {
        PlanAction::Show => {
            let plan = app.manager.plan().ok_or(CoreError::NoPlan)?;
            print_json(plan)?;
        }
        PlanAction::Import { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            if !app.manager.apply_reply(&text) {
                return Err("no study plan found in input".into());
            }
            app.save()?;
            if let Some(plan) = app.manager.plan() {
                print_json(plan)?;
            }
        }
        PlanAction::Next => {
            let plan = app.manager.plan().ok_or(CoreError::NoPlan)?;
            match plan.next_pending() {
                Some((index, subject)) => print_json(&serde_json::json!({
                    "index": index,
                    "subject": subject,
                    "duration_secs": subject.duration_secs(),
                }))?,
                None => println!("all subjects completed"),
            }
        }
        PlanAction::Clear => {
            app.manager.set_plan(None);
            app.save()?;
            println!("plan cleared");
        }
    }
    Ok(())
}
