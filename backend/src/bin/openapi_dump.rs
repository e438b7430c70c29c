//! Print the OpenAPI document as JSON or YAML.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use coffee_chat::ApiDoc;
use utoipa::OpenApi;

#[derive(Debug, Parser)]
#[command(name = "openapi-dump", about = "Write the coffee chat OpenAPI document")]
struct CliArgs {
    /// Emit YAML instead of JSON.
    #[arg(long)]
    yaml: bool,
    /// Write to this file instead of stdout.
    #[arg(long, value_name = "path")]
    output: Option<PathBuf>,
}

fn render(yaml: bool) -> io::Result<String> {
    let doc = ApiDoc::openapi();
    if yaml {
        doc.to_yaml().map_err(io::Error::other)
    } else {
        doc.to_pretty_json().map_err(io::Error::other)
    }
}

fn main() -> io::Result<()> {
    let args = CliArgs::parse();
    let rendered = render(args.yaml)?;
    match args.output {
        Some(path) => fs::write(path, rendered),
        None => writeln!(io::stdout().lock(), "{rendered}"),
    }
}
