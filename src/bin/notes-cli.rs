use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::{json, Value};

use notes_api::security::sign;
use notes_api::security::signature::SIGNATURE_HEADER;
use notes_api::security::api_key::API_KEY_HEADER;

#[derive(Parser)]
#[command(name = "notes-cli")]
#[command(about = "Command-line client for the notes API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[arg(short, long, default_value = "dev-key")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the webhook signature of a body
    Sign {
        #[arg(long, default_value = "dev-secret")]
        secret: String,
        #[arg(long)]
        body: String,
    },
    /// Sign a body and post it to the demo webhook
    Webhook {
        #[arg(long, default_value = "dev-secret")]
        secret: String,
        #[arg(long, default_value = r#"{"event":"ping"}"#)]
        body: String,
    },
    /// Manage notes
    #[command(subcommand)]
    Notes(NotesCommand),
}

#[derive(Subcommand)]
enum NotesCommand {
    /// List notes, newest first
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 20)]
        size: usize,
    },
    /// Create a note
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
    },
    /// Search titles and bodies
    Search {
        #[arg(long)]
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(API_KEY_HEADER, HeaderValue::from_str(&cli.key)?);

    match cli.command {
        Commands::Sign { secret, body } => {
            println!("{}", sign(secret.as_bytes(), body.as_bytes()));
        }
        Commands::Webhook { secret, body } => {
            let signature = sign(secret.as_bytes(), body.as_bytes());
            let res = client
                .post(format!("{}/integrations/webhooks/demo", cli.url))
                .header(CONTENT_TYPE, "application/json")
                .header(SIGNATURE_HEADER, signature)
                .body(body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Notes(NotesCommand::List { page, size }) => {
            let res = client
                .get(format!("{}/notes", cli.url))
                .query(&[("page", page), ("size", size)])
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Notes(NotesCommand::Create { title, body }) => {
            let res = client
                .post(format!("{}/notes", cli.url))
                .headers(headers)
                .json(&json!({ "title": title, "body": body }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Notes(NotesCommand::Search { query }) => {
            let res = client
                .get(format!("{}/notes/search", cli.url))
                .query(&[("q", query)])
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
