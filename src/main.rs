use clap::Parser;
use tickerboard::{Config, Error, QuoteHandler, QuoteResponse, models::QuoteRequest};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tickerboard", version, about = "Fetch normalized quotes for a list of symbols")]
struct Args {
    /// Symbols to quote, e.g. AAPL TCS.NS
    symbols: Vec<String>,

    /// Raw request body, e.g. '{"symbols":["AAPL"]}', used instead of positional symbols
    #[arg(long, conflicts_with = "symbols")]
    request: Option<String>,

    /// Pretty-print the JSON response
    #[arg(long)]
    pretty: bool,
}

fn print(response: &QuoteResponse, pretty: bool) -> Result<(), Error> {
    let json = if pretty {
        response.to_json_pretty()?
    } else {
        response.to_json()?
    };
    if response.status.is_success() {
        println!("{json}");
    } else {
        eprintln!("{json}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let body = match args.request {
        Some(body) => body,
        None => serde_json::to_string(&QuoteRequest {
            symbols: args.symbols,
        })?,
    };

    let response = match Config::from_env().and_then(|config| QuoteHandler::from_config(&config)) {
        Ok(handler) => handler.handle(&body).await,
        Err(e) => QuoteResponse::from_error(&e),
    };
    info!("Responding with status {}", response.status);
    print(&response, args.pretty)?;

    if !response.status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
