use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dash_chat::client::ChatClient;
use dash_chat::config::Config;
use dash_chat::render::{render_entry, render_history};
use dash_chat::session::{Chat, Notice};

#[derive(Parser)]
#[command(name = "dash-chat")]
#[command(about = "Chat with the estimate assistant and attach JSON or TXT context files")]
struct Cli {
    /// Server root URL (overrides config file and DASH_CHAT_URL)
    #[arg(short, long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive conversation
    Chat,
    /// Ask a single question and print the answer
    Ask {
        question: String,
    },
    /// Upload a context file
    Upload {
        path: PathBuf,
    },
}

/// Log to stderr so stdout carries only the conversation.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "dash_chat=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    tracing::debug!("Using server {}", config.base_url);

    let client = ChatClient::from_config(&config).context("Failed to build HTTP client")?;
    let mut chat = Chat::new(client, config.greeting.clone());

    match cli.command {
        Some(Commands::Ask { question }) => match chat.ask(question).await {
            Ok(entry) => print!("{}", render_entry(entry)),
            Err(notice) => anyhow::bail!("{}", notice),
        },
        Some(Commands::Upload { path }) => {
            chat.state_mut().choose_file(path)?;
            match chat.upload().await {
                Notice::Uploaded(message) => println!("{}", message),
                notice => anyhow::bail!("{}", notice),
            }
        }
        Some(Commands::Chat) | None => run_chat(&mut chat).await?,
    }

    Ok(())
}

/// One line typed at the chat prompt.
#[derive(Debug, PartialEq, Eq)]
enum ReplInput<'a> {
    Exit,
    Empty,
    History,
    /// `/file PATH`
    File(&'a str),
    /// `/upload [PATH]`
    Upload(Option<&'a str>),
    Question(&'a str),
}

/// Commands are recognised only when the first word matches exactly;
/// anything else is a question, sent untrimmed.
fn parse_input(line: &str) -> ReplInput<'_> {
    let line = line.trim_end_matches(['\r', '\n']);
    let command = line.trim();

    if command.eq_ignore_ascii_case("exit") || command.eq_ignore_ascii_case("quit") {
        return ReplInput::Exit;
    }
    if command.is_empty() {
        return ReplInput::Empty;
    }

    let (word, rest) = command
        .split_once(char::is_whitespace)
        .map(|(word, rest)| (word, rest.trim()))
        .unwrap_or((command, ""));

    match word {
        "/history" if rest.is_empty() => ReplInput::History,
        "/file" => ReplInput::File(rest),
        "/upload" if rest.is_empty() => ReplInput::Upload(None),
        "/upload" => ReplInput::Upload(Some(rest)),
        _ => ReplInput::Question(line),
    }
}

async fn run_chat(chat: &mut Chat<ChatClient>) -> anyhow::Result<()> {
    println!("Chat with our AI Assistant. Type 'exit' to quit.");
    println!("Commands: /file PATH, /upload [PATH], /history\n");
    print!("{}", render_history(chat.state().history()));

    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        match parse_input(&line) {
            ReplInput::Exit => break,
            ReplInput::Empty => continue,
            ReplInput::History => print!("{}", render_history(chat.state().history())),
            ReplInput::File(path) => match chat.state_mut().choose_file(path) {
                Ok(()) => println!("Selected {}", path),
                Err(e) => println!("{}", e),
            },
            ReplInput::Upload(path) => {
                if let Some(path) = path {
                    if let Err(e) = chat.state_mut().choose_file(path) {
                        println!("{}", e);
                        continue;
                    }
                }
                println!("Uploading...");
                println!("{}", chat.upload().await);
            }
            ReplInput::Question(question) => match chat.ask(question).await {
                Ok(entry) => print!("\n{}", render_entry(entry)),
                Err(notice) => println!("{}", notice),
            },
        }
    }

    Ok(())
}
