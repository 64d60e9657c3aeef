//! Basic usage: health check and one non-streaming chat turn.
//!
//! Start the backend, then run:
//!   cargo run --example basic -p chatstream-client

use chatstream_client::ChatClient;
use chatstream_types::ChatRequest;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let client = ChatClient::from_env()?;

    let health = client.health().await?;
    println!("Backend status: {}", health.status);

    let response = client
        .send_message(&ChatRequest::new("What is 12 * 7?"))
        .await?;
    println!("Session: {}", response.session_id);
    for call in &response.tool_calls {
        println!(
            "Tool {} {} -> {}",
            call.tool_name,
            serde_json::Value::Object(call.tool_input.clone()),
            call.tool_output
        );
    }
    println!("Reply: {}", response.reply);

    Ok(())
}
