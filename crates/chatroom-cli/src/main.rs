use std::path::PathBuf;

use anyhow::Result;
use chatroom_cli::cli::{execute, render, run_browse, CliCommand, CliConfig, ThemeChoice};
use chatroom_core::constants::{DEFAULT_COUNTRY_CODE, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use chatroom_core::tracing_setup::{init_tracing, init_tracing_with_default};
use chatroom_core::CoreRuntime;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chatroom-cli")]
#[command(about = "Local chatrooms with a simulated assistant")]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, short)]
    pretty: bool,

    /// Path to JSON config file (contains dataDir, searchDebounceMs)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Directory holding persisted state (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a chatroom
    Create {
        /// Chatroom title (defaults to "New Chat")
        title: Option<String>,
    },

    /// List chatrooms, newest first
    List {
        /// Only chatrooms whose title contains this text
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Search interactively: each stdin line replaces the query
    Browse,

    /// List messages in a chatroom, oldest first, one page at a time
    Messages {
        chatroom_id: String,
        #[arg(long, default_value_t = DEFAULT_PAGE)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: usize,
    },

    /// Send a message and wait for the assistant's reply
    Send { chatroom_id: String, text: String },

    /// Delete a chatroom and its messages
    Delete { chatroom_id: String },

    /// Show the theme, or set it
    Theme {
        #[arg(value_enum)]
        choice: Option<ThemeChoice>,
    },

    /// Sign in with a phone number
    Login {
        phone_number: String,
        #[arg(long, default_value = DEFAULT_COUNTRY_CODE)]
        country_code: String,
        /// One-time code (any 6 digits are accepted)
        #[arg(long)]
        otp: Option<String>,
    },

    /// Forget the signed-in identity
    Logout,

    /// Show the signed-in identity
    Whoami,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if cli.verbose {
        init_tracing_with_default("debug");
    } else {
        init_tracing();
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let file_config = match cli.config {
        Some(ref path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let mut runtime = CoreRuntime::new(file_config.core_config(cli.data_dir.clone()))?;

    let command = match cli.command {
        Some(Commands::Create { title }) => CliCommand::Create { title },
        Some(Commands::List { search }) => CliCommand::List { search },
        Some(Commands::Browse) => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            return run_browse(&runtime, stdin, std::io::stdout(), cli.pretty).await;
        }
        Some(Commands::Messages {
            chatroom_id,
            page,
            limit,
        }) => CliCommand::Messages {
            chatroom_id,
            page,
            limit,
        },
        Some(Commands::Send { chatroom_id, text }) => CliCommand::Send { chatroom_id, text },
        Some(Commands::Delete { chatroom_id }) => CliCommand::Delete { chatroom_id },
        Some(Commands::Theme { choice }) => CliCommand::Theme { choice },
        Some(Commands::Login {
            phone_number,
            country_code,
            otp,
        }) => CliCommand::Login {
            phone_number,
            country_code,
            otp,
        },
        Some(Commands::Logout) => CliCommand::Logout,
        Some(Commands::Whoami) => CliCommand::WhoAmI,
        None => {
            eprintln!("No command specified. Use --help for usage.");
            std::process::exit(1);
        }
    };

    let output = execute(&mut runtime, command).await?;
    println!("{}", render(&output, cli.pretty)?);

    if let Some(err) = runtime.chat().persistence_error() {
        tracing::warn!(error = %err, "changes were not saved");
    }
    Ok(())
}
