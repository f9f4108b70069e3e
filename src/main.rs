//! Demo binary for TopicBus
//!
//! Loads configuration, sets up logging and runs a short fan-out session
//! against an in-process bus.

use topicbus::config::{Settings, load_config};
use topicbus::utils::logging;
use topicbus::{Bus, JsonMessage};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // logging is configured from the settings, so report this one directly
    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    logging::init(&settings.log);

    if let Err(e) = run(&settings).await {
        error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let bus = Bus::with_settings(&settings.bus)?;
    info!(capacity = bus.capacity(), "bus started");

    let mut first = bus.subscribe(["t1"]).await;
    let mut second = bus.subscribe(["t1"]).await;
    let mut other = bus.subscribe(["t2"]).await;

    bus.publish(JsonMessage::new(1, serde_json::json!("hi")), ["t1"])
        .await;
    for subscriber in [&mut first, &mut second] {
        if let Some(msg) = subscriber.recv().await {
            info!(subscriber = %subscriber.id(), id = msg.id, payload = %msg.payload, "received");
        }
    }

    bus.publish(
        JsonMessage::new(3, serde_json::json!({ "greeting": "hello" })),
        ["t2"],
    )
    .await;
    if let Some(msg) = other.recv().await {
        info!(subscriber = %other.id(), id = msg.id, payload = %msg.payload, "received");
    }

    bus.shutdown().await;
    bus.join().await;
    for subscriber in [&mut first, &mut second, &mut other] {
        if subscriber.recv().await.is_none() {
            info!(subscriber = %subscriber.id(), "stream ended");
        }
    }

    Ok(())
}
