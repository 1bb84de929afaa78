use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "lyrics-cli")]
#[command(about = "Query CLI for the lyrics proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Shared secret sent in the X-Proxy-Secret header.
    #[arg(short, long, env = "PROXY_SHARED_SECRET")]
    secret: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the proxy's endpoint listing
    Info,
    /// Fetch a flattened song record
    Song { id: u64 },
    /// Fetch a flattened artist record
    Artist { id: u64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert("x-proxy-secret", HeaderValue::from_str(&cli.secret)?);

    let path = match cli.command {
        Commands::Info => "/".to_string(),
        Commands::Song { id } => format!("/song/{}", id),
        Commands::Artist { id } => format!("/artist/{}", id),
    };

    let res = client
        .get(format!("{}{}", cli.url.trim_end_matches('/'), path))
        .headers(headers)
        .send()
        .await?;
    print_response(res).await?;

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    if let Some(cache_status) = res.headers().get("x-proxy-cache") {
        eprintln!("Cache: {}", cache_status.to_str().unwrap_or("?"));
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
