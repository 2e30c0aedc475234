//! Resource query builder CLI binary.
//!
//! Composes request URLs from command-line facets and optionally sends them.

use std::process::ExitCode;

use clap::Parser;
use rqbuilder::cli::{facet_rows, Cli, Command};
use rqbuilder::{Client, Query};
use tabled::Table;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match cli.client() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Check RQBUILDER_URL and RQBUILDER_APPEND_API");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &Client, command: Command) -> rqbuilder::Result<()> {
    match command {
        Command::Url(args) => {
            let builder = args.apply(client)?;
            println!("{}", builder.url()?);
        }
        Command::Explain(args) => {
            let builder = args.apply(client)?;
            println!("{}", builder.url()?);
            let query = Query::new(&builder.snapshot());
            if query.is_empty() {
                println!("\n(no query facets)");
            } else {
                println!("\n{}", Table::new(facet_rows(&query)));
            }
        }
        Command::Get(args) => {
            let builder = args.apply(client)?.get().await?;
            let data = builder.data().cloned().unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
    }
    Ok(())
}
