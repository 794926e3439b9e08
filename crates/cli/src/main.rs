//! Radium CLI - Staff command-line interface for the queue daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9640";

#[derive(Parser)]
#[command(name = "radium")]
#[command(about = "Radium queue daemon CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "RADIUM_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Put a player in a queue
    Join {
        /// Player UUID
        player_id: String,

        /// Player name
        player_name: String,

        /// Queue (destination server) name
        queue: String,
    },

    /// Remove a player from whatever queue they are in
    Leave {
        /// Player UUID
        player_id: String,
    },

    /// Pause automatic promotion and new joins
    Pause {
        queue: String,

        /// Act on behalf of this player (permission checked); console otherwise
        #[arg(long = "as")]
        actor: Option<String>,
    },

    /// Resume a paused queue
    Unpause {
        queue: String,

        #[arg(long = "as")]
        actor: Option<String>,
    },

    /// Send the head of a queue now
    Send {
        queue: String,

        #[arg(long = "as")]
        actor: Option<String>,
    },

    /// Show a player's position
    Position {
        /// Player UUID
        player_id: String,
    },

    /// Drop a player that went offline (no message is sent)
    Disconnect {
        /// Player UUID
        player_id: String,
    },

    /// Show all queues
    Status,

    /// Re-read queue configuration
    Reload,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct QueueRow {
    name: String,
    #[tabled(display_with = "display_state")]
    paused: bool,
    auto_send: bool,
    waiting: usize,
    in_flight: usize,
    max_players: usize,
    priority_slots: u32,
    send_delay_seconds: u64,
}

fn display_state(paused: &bool) -> String {
    if *paused {
        "PAUSED".to_string()
    } else {
        "open".to_string()
    }
}

async fn call_rpc(url: &str, method: &str, params: Value) -> Result<Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

fn queue_command(queue: &str, actor: Option<String>) -> Value {
    match actor {
        Some(actor) => json!({ "queue": queue, "actor": actor }),
        None => json!({ "queue": queue }),
    }
}

fn print_pause(result: &Value) {
    let queue = result["queue"].as_str().unwrap_or_default();
    match result["outcome"].as_str().unwrap_or_default() {
        "paused" => println!("{}", format!("✓ Queue {} paused", queue).green().bold()),
        "unpaused" => println!("{}", format!("✓ Queue {} unpaused", queue).green().bold()),
        "already_paused" => println!("{}", format!("Queue {} is already paused", queue).yellow()),
        _ => println!("{}", format!("Queue {} is not paused", queue).yellow()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Join {
            player_id,
            player_name,
            queue,
        } => {
            let params = json!({
                "player_id": player_id,
                "player_name": player_name,
                "queue": queue,
            });
            let result = call_rpc(&cli.rpc_url, "queue.join.v1", params).await?;

            match result["outcome"].as_str().unwrap_or_default() {
                "queued" => println!(
                    "{} {} ({}) at {}/{}",
                    "✓ Queued in".green().bold(),
                    result["queue"].as_str().unwrap_or_default(),
                    result["tier_label"].as_str().unwrap_or_default(),
                    result["position"]["position"],
                    result["position"]["total"],
                ),
                "bypassed" => println!("{}", "✓ Bypassed the queue".green().bold()),
                "rejected" => println!(
                    "{} {}",
                    "✗ Rejected:".red().bold(),
                    result["error"]["reason"].as_str().unwrap_or_default()
                ),
                _ => println!("{}", "Join cancelled".yellow()),
            }
        }

        Commands::Leave { player_id } => {
            let result = call_rpc(&cli.rpc_url, "queue.leave.v1", json!({ "player_id": player_id })).await?;
            match result["queue"].as_str() {
                Some(queue) => println!("{}", format!("✓ Left {}", queue).green().bold()),
                None => println!("{}", "Player is not queued".yellow()),
            }
        }

        Commands::Pause { queue, actor } => {
            let result = call_rpc(&cli.rpc_url, "queue.pause.v1", queue_command(&queue, actor)).await?;
            print_pause(&result);
        }

        Commands::Unpause { queue, actor } => {
            let result = call_rpc(&cli.rpc_url, "queue.unpause.v1", queue_command(&queue, actor)).await?;
            print_pause(&result);
        }

        Commands::Send { queue, actor } => {
            let result = call_rpc(&cli.rpc_url, "queue.send.v1", queue_command(&queue, actor)).await?;
            if result["outcome"] == "empty" {
                println!("{}", format!("Queue {} is empty", queue).yellow());
            } else {
                let player = result["player_name"].as_str().unwrap_or_default();
                match result["resolution"]["resolution"].as_str().unwrap_or_default() {
                    "transferred" => {
                        println!("{}", format!("✓ Sent {} to {}", player, queue).green().bold())
                    }
                    "requeued" => println!(
                        "{} {} back at position {}",
                        "✗ Transfer failed,".red().bold(),
                        player,
                        result["resolution"]["position"]["position"]
                    ),
                    "cancelled" => println!("{}", format!("{} left before the transfer", player).yellow()),
                    _ => println!(
                        "{} {}",
                        "✗ Transfer failed:".red().bold(),
                        result["resolution"]["reason"].as_str().unwrap_or_default()
                    ),
                }
            }
        }

        Commands::Position { player_id } => {
            let result = call_rpc(&cli.rpc_url, "queue.position.v1", json!({ "player_id": player_id })).await?;
            match result["queue"].as_str() {
                Some(queue) => println!(
                    "  {} {} of {} in {}",
                    "Position:".bold(),
                    result["position"],
                    result["total"],
                    queue
                ),
                None => println!("{}", "Player is not queued".yellow()),
            }
        }

        Commands::Disconnect { player_id } => {
            let result = call_rpc(&cli.rpc_url, "player.disconnect.v1", json!({ "player_id": player_id })).await?;
            if result["removed"].as_bool().unwrap_or(false) {
                println!("{}", "✓ Player removed".green().bold());
            } else {
                println!("{}", "Player was not queued".yellow());
            }
        }

        Commands::Status => {
            println!("{}", "Queue Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "queue.status.v1", json!({})).await {
                Ok(result) => {
                    let rows: Vec<QueueRow> = serde_json::from_value(result["queues"].clone())
                        .context("Unexpected status payload")?;
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    if rows.is_empty() {
                        println!("  No queues configured");
                    } else {
                        println!("{}", Table::new(rows));
                    }
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }

        Commands::Reload => {
            println!("{}", "Reloading configuration...".cyan().bold());
            let result = call_rpc(&cli.rpc_url, "admin.reload.v1", json!({})).await?;

            println!("  {} {}", "Loaded:".bold(), result["loaded"]);
            println!("  {} {}", "Dropped:".bold(), result["dropped"]);
            println!("  {} {} players", "Evicted:".bold(), result["evicted"]);
            if let Some(rejected) = result["rejected"].as_array().filter(|r| !r.is_empty()) {
                for reason in rejected {
                    println!("  {} {}", "✗".red(), reason.as_str().unwrap_or_default());
                }
            }
        }
    }

    Ok(())
}
