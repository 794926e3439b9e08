//! Simple SDK Example
//!
//! Walks one player through join, position, leave against a running daemon.
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    cargo run --package radium-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --example simple -- practice
//!    ```

use radium_sdk::{JoinOutcome, RadiumQueueClient};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let queue = std::env::args().nth(1).unwrap_or_else(|| "practice".to_string());

    println!("Radium SDK - Simple Example");
    println!("===========================\n");

    // 1. Connect to daemon
    println!("1. Connecting to daemon...");
    let client = RadiumQueueClient::connect("http://127.0.0.1:9640").await?;
    println!("   ✓ Connected\n");

    // 2. Show queues
    println!("2. Queues:");
    for q in client.status().await?.queues {
        println!(
            "   - {} (waiting {}, in flight {}, paused {})",
            q.name, q.waiting, q.in_flight, q.paused
        );
    }
    println!();

    // 3. Join
    let player = Uuid::new_v4();
    println!("3. Joining {} as {}...", queue, player);
    match client.join(player, "Example", queue.as_str()).await? {
        JoinOutcome::Queued {
            tier_label,
            position,
            ..
        } => println!(
            "   ✓ Queued as {} at {} of {}\n",
            tier_label, position.position, position.total
        ),
        other => println!("   ⚠ {:?}\n", other),
    }

    // 4. Position
    let position = client.position(player).await?;
    println!(
        "4. Position: {:?} of {:?} in {:?}\n",
        position.position, position.total, position.queue
    );

    // 5. Leave
    println!("5. Leaving...");
    println!("   {:?}", client.leave(player).await?);

    println!("\n✓ Example completed successfully!");
    Ok(())
}
