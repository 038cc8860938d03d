//! Mortgage Advisor terminal chat

use anyhow::{bail, Context, Result};
use clap::Parser;
use mortgage_advisor::{Config, MortgageAdvisorApi, MortgageAdvisorModule};
use mortgage_advisor_chat::{format, RemoteClient};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const OPENING_MESSAGE: &str = "Hello";

#[derive(Debug, Parser)]
#[command(name = "mortgage-advisor-chat", version, about = "Chat with the AI Mortgage Advisor")]
struct Cli {
    /// Base URL of the mortgage advisor API
    #[arg(long, env = "API_BASE_URL", default_value = "http://localhost:8000")]
    api_base_url: String,

    /// Health probes before giving up on the API
    #[arg(long, default_value_t = 10)]
    wait_attempts: u32,

    #[arg(long, default_value_t = 2)]
    wait_interval_secs: u64,

    /// Run the advisor in-process instead of calling the API
    #[arg(long)]
    embedded: bool,

    /// Configuration file for --embedded
    #[arg(short, long, env = "MORTGAGE_ADVISOR_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    let client = connect(&cli).await?;
    run(client).await
}

async fn connect(cli: &Cli) -> Result<Arc<dyn MortgageAdvisorApi>> {
    if cli.embedded {
        let config = Config::load(cli.config.as_deref())?;
        let module = MortgageAdvisorModule::init(config).await?;
        return Ok(module.client());
    }

    let remote = RemoteClient::new(cli.api_base_url.clone())?;
    println!("Connecting to {} ...", remote.base_url());
    if !remote
        .wait_for_api(cli.wait_attempts, Duration::from_secs(cli.wait_interval_secs))
        .await
    {
        bail!(
            "cannot reach the mortgage advisor API at {}; is the server running?",
            remote.base_url()
        );
    }
    Ok(Arc::new(remote))
}

/// Start a conversation and print the advisor's greeting
async fn start(client: &dyn MortgageAdvisorApi) -> Result<String> {
    let id = client
        .start_conversation()
        .await
        .context("failed to start a conversation")?;
    let reply = client
        .send_message(OPENING_MESSAGE, Some(&id))
        .await
        .context("failed to greet the advisor")?;
    println!("\nAdvisor: {}\n", reply.response);
    Ok(id)
}

async fn run(client: Arc<dyn MortgageAdvisorApi>) -> Result<()> {
    println!("AI Mortgage Advisor. Commands: /reset, /history, /quit");
    let mut conversation_id = start(client.as_ref()).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" | "/exit" => break,
            "/reset" => match start(client.as_ref()).await {
                Ok(id) => conversation_id = id,
                Err(e) => eprintln!("Error: {:#}", e),
            },
            "/history" => match client.conversation_history(&conversation_id).await {
                Ok(messages) => println!("{}\n", format::format_transcript(&messages)),
                Err(e) => eprintln!("Error: {}", e),
            },
            message => match client.send_message(message, Some(&conversation_id)).await {
                Ok(reply) => {
                    conversation_id = reply.conversation_id;
                    println!("\nAdvisor: {}\n", reply.response);
                    if let Some(result) = reply.assessment_result {
                        println!("{}\n", format::format_assessment(&result));
                    }
                    if reply.conversation_complete {
                        println!("Assessment complete. Type /reset to start a new one or /quit to exit.\n");
                    }
                }
                Err(e) => eprintln!("Error: {}", e),
            },
        }
    }

    println!("Goodbye!");
    Ok(())
}
