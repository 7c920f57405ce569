mod builtin;
mod config;
mod error;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use mcp::{Handler, Server};
use runtime::{OpenAiBackend, Orchestrator};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{CONFIG_FILE, Config};
use error::Result;

#[derive(Parser)]
#[command(name = "toolcall")]
#[command(about = "Tool calling for local chat models over a plain-text protocol")]
#[command(long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the config file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Log filter when RUST_LOG is unset (e.g. "debug", "runtime=trace")
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question
    Ask {
        /// The question to ask
        prompt: String,
        /// Show the detected tool call and its output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Answer questions line by line; each line is independent
    Chat,
    /// Print the tool manifest sent to the model
    Tools,
    /// Serve the tools over MCP on stdin/stdout
    Serve,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so they never mix with answers or MCP traffic.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load_or_default(&cli.config)?;
    config.apply_env();
    let registry = builtin::registry(&config.python)?;

    match cli.command {
        Some(Commands::Ask { prompt, verbose }) => {
            cmd_ask(orchestrator(&config, registry)?, &prompt, verbose).await
        }
        Some(Commands::Chat) | None => cmd_chat(orchestrator(&config, registry)?).await,
        Some(Commands::Tools) => {
            println!("{}", registry.manifest());
            Ok(())
        }
        Some(Commands::Serve) => cmd_serve(registry).await,
    }
}

fn orchestrator(
    config: &Config,
    registry: tools::ToolRegistry,
) -> Result<Orchestrator<OpenAiBackend>> {
    let backend = config.backend()?;
    info!(%backend, "using completion backend");
    Ok(Orchestrator::new(backend)
        .with_registry(registry)
        .with_config(config.conversation()?)?)
}

async fn cmd_ask(
    orchestrator: Orchestrator<OpenAiBackend>,
    prompt: &str,
    verbose: bool,
) -> Result<()> {
    let exchange = orchestrator.run_traced(prompt).await?;

    if verbose {
        match &exchange.tool_call {
            Some(call) => {
                println!("tool call: {} {}", call.invocation.name, call.invocation.parameters);
                let label = if call.failed { "tool error" } else { "tool output" };
                println!("{label}: {}", call.output);
            }
            None => println!("tool call: none"),
        }
        println!(
            "tokens: {} in, {} out\n",
            exchange.usage.input_tokens, exchange.usage.output_tokens
        );
    }

    println!("{}", exchange.reply);
    Ok(())
}

async fn cmd_chat(orchestrator: Orchestrator<OpenAiBackend>) -> Result<()> {
    println!("toolcall v{}", env!("CARGO_PKG_VERSION"));
    println!("Backend: {}", orchestrator.backend());
    println!(
        "Tools: {}",
        orchestrator
            .registry()
            .manifest()
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("Type 'quit' or Ctrl+D to exit.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "exit" {
            break;
        }

        match orchestrator.run(input).await {
            Ok(response) => {
                println!("\n{response}\n");
            }
            Err(e) => {
                eprintln!("Error: {e}\n");
            }
        }
    }

    println!();
    Ok(())
}

async fn cmd_serve(registry: tools::ToolRegistry) -> Result<()> {
    let server = Server::new(Handler::new(Arc::new(registry)));
    server.run_stdio().await?;
    Ok(())
}
