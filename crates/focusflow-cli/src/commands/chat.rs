use std::io::{BufRead, Write};

use clap::Args;
use focusflow_core::{Assistant, GeminiClient};

use super::{runtime, App, CliResult};

#[derive(Args)]
pub struct ChatArgs {
    /// Send a single message and exit; starts an interactive session when omitted
    message: Option<String>,
}

pub fn run(args: ChatArgs) -> CliResult {
    let mut app = App::load()?;
    let client = GeminiClient::from_config(&app.config.assistant)?;
    let mut assistant = Assistant::new(client);
    let rt = runtime()?;

    if let Some(message) = args.message {
        let replies = rt.block_on(assistant.handle_message(&message, &mut app.manager));
        for reply in replies {
            println!("{}\n", reply.text);
        }
        app.save()?;
        return Ok(());
    }

    if let Some(welcome) = assistant.messages().first() {
        println!("{}\n", welcome.text);
    }
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if matches!(line, "exit" | "quit") {
            break;
        }

        let replies = rt.block_on(assistant.handle_message(line, &mut app.manager));
        for reply in replies {
            println!("\n{}\n", reply.text);
        }
        // Keep any new plan even if the session is interrupted later.
        app.save()?;
    }
    Ok(())
}
