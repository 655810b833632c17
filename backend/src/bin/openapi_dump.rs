//! Print the OpenAPI document as JSON, to stdout or a file.

use std::path::PathBuf;

use clap::Parser;
use user_service::ApiDoc;
use utoipa::OpenApi;

/// Export the user service OpenAPI document.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump")]
struct Args {
    /// Write the document to this path instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Pretty-print the JSON.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let doc = ApiDoc::openapi();
    let json = if args.pretty {
        doc.to_pretty_json()?
    } else {
        doc.to_json()?
    };

    match args.output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
