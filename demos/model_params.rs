//! Model selection example.
//!
//! Instead of naming a model outright, hand the server-side selector a
//! `ModelParams` directive: candidate lists, scoring weights, and cost caps.
//!
//! Usage:
//!   INFUZU_API_KEY=your_key cargo run --example model_params

use infuzu_rs::{Client, Message, ModelParams, ModelSelector, ModelWeights};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let client = Client::new()?;

    let messages = vec![Message::user(
        "Summarize the plot of Hamlet in two sentences.",
    )];

    let params = ModelParams::new()
        .llms(vec![
            "openai/gpt-4o".to_string(),
            "anthropic/claude-sonnet".to_string(),
        ])
        .weights(ModelWeights {
            price: Some(0.7),
            end_latency: Some(0.3),
            ..Default::default()
        })
        .max_output_cost(0.01);

    let completion =
        client.create_chat_completion(&messages, Some(&ModelSelector::from(params)))?;

    for choice in &completion.choices {
        if let Some(model) = &choice.model {
            println!(
                "served by {} (rank {:?})",
                model.ref_.as_deref().unwrap_or("<unknown>"),
                model.rank
            );
        }
        if let Some(content) = choice.message.as_ref().and_then(|m| m.content.as_deref()) {
            println!("{content}");
        }
        if let Some(latency) = &choice.latency {
            println!("latency: start={:?} end={:?}", latency.start, latency.end);
        }
    }

    Ok(())
}
