//! Basic usage example.
//!
//! Sends a two-turn conversation to the chat completions endpoint and prints
//! the first choice.
//!
//! Usage:
//!   INFUZU_API_KEY=your_key cargo run --example basic_usage

use infuzu_rs::{create_chat_completion, Message};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    if std::env::var("INFUZU_API_KEY").is_err() {
        eprintln!("Warning: INFUZU_API_KEY not set. The request will fail without it.");
    }

    let messages = vec![
        Message::system("You are a helpful assistant."),
        Message::user("What is the capital of France?"),
    ];

    let completion = create_chat_completion(&messages, None, None)?;

    if let Some(content) = completion.first_content() {
        println!("Response:\n{content}");
    }
    if let Some(usage) = &completion.usage {
        println!("\nUsage: {usage:?}");
    }

    Ok(())
}
