use schedbot::agent::ScheduleAgent;
use schedbot::components::{GoogleCalendarHandle, LlmAgentHandle};
use schedbot::config::Config;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Session id used for the single console user
const CONSOLE_USER: &str = "console";

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Load configuration
    let config = Config::load()?;
    let config = Arc::new(RwLock::new(config));

    // Build the pipeline over standalone handles
    let llm = LlmAgentHandle::new(Arc::clone(&config));
    let calendar = {
        let config_read = config.read().await;
        if config_read.calendar_configured() {
            Some(GoogleCalendarHandle::new(Arc::clone(&config)))
        } else {
            None
        }
    };
    let agent = ScheduleAgent::new(Arc::clone(&config), llm.clone(), calendar.clone());

    {
        let config_read = config.read().await;
        println!("schedbot console - model {}", config_read.llm_model);
        if agent.calendar_enabled() {
            println!("Calendar features: enabled");
        } else {
            println!("Calendar features: disabled (set GOOGLE_CLIENT_ID / GOOGLE_CLIENT_SECRET)");
        }
    }
    println!("Type a scheduling request, or 'exit' to quit.\n");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            // EOF or a broken pipe ends the session like an explicit exit
            _ => break,
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" {
            break;
        }

        match agent.handle_message(CONSOLE_USER, input).await {
            Ok(reply) => println!("{}\n", reply),
            Err(e) => println!("Error: {}\n", e),
        }
    }

    // Shut the actors down before leaving
    llm.shutdown().await?;
    if let Some(calendar) = calendar {
        calendar.shutdown().await?;
    }

    println!("Bye!");
    Ok(())
}
