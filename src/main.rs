//! Register Intake - interactive driver for the registration form engine
//!
//! Reads line commands from stdin, feeds them to the form runtime, and prints
//! the resulting form view as JSON.

use anyhow::Result;
use register_intake::api::HttpAuthApi;
use register_intake::command::{self, Command, HELP};
use register_intake::{FormRuntime, IntakeConfig};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "register_intake=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = IntakeConfig::load()?;
    tracing::info!(base_url = %config.api_base_url, "starting registration intake");

    let api = HttpAuthApi::new(&config)?;
    let (mut runtime, mut events) = FormRuntime::new(&config, Arc::new(api));

    // Stdin is read on its own task so countdown ticks keep flowing while idle
    let (line_tx, mut lines) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        let mut reader = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = reader.next_line().await {
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    eprintln!("{HELP}");

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                match command::parse(&line) {
                    Ok(Some(Command::Event(event))) => {
                        runtime.handle(event).await;
                        print_view(&runtime)?;
                    }
                    Ok(Some(Command::TakeCorrelation)) => {
                        let key = runtime.form().verification().correlation_key().to_string();
                        match runtime.form_mut().take_correlation() {
                            Some(value) => println!("{key}={value}"),
                            None => println!("{key} is empty"),
                        }
                    }
                    Ok(Some(Command::Show)) => print_view(&runtime)?,
                    Ok(Some(Command::Help)) => eprintln!("{HELP}"),
                    Ok(Some(Command::Quit)) => break,
                    Ok(None) => {}
                    Err(err) => eprintln!("error: {err}"),
                }
            }
            Some(event) = events.recv() => {
                runtime.handle(event).await;
                let view = runtime.view();
                if view.countdown.is_some_and(|secs| secs % 30 == 0) || view.countdown.is_none() {
                    print_view(&runtime)?;
                }
            }
        }
    }

    Ok(())
}

fn print_view(runtime: &FormRuntime) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&runtime.view())?);
    Ok(())
}
