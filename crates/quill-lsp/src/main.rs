//! Quill language server binary.
//!
//! Speaks LSP over stdin/stdout. The schema (and optionally datasets and
//! enabled plugins) are fixed at startup from the command line.

use std::path::PathBuf;

use quill_complete::StaticDatasets;
use quill_lsp::{ServerConfig, load_datasets, load_schema, run};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "\
Usage: quill-lsp --schema <file> [options]

Options:
  --schema <file>    Schema JSON file (required)
  --datasets <file>  Named datasets JSON file
  --plugin <name>    Enable a plugin gate (repeatable; default: all enabled)
  -V, --version      Show version
  -h, --help         Show this help
";

struct Args {
    schema: PathBuf,
    datasets: Option<PathBuf>,
    plugins: Vec<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut schema = None;
    let mut datasets = None;
    let mut plugins = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--schema" => {
                schema = Some(PathBuf::from(
                    args.next().ok_or("--schema requires a file path")?,
                ));
            }
            "--datasets" => {
                datasets = Some(PathBuf::from(
                    args.next().ok_or("--datasets requires a file path")?,
                ));
            }
            "--plugin" => {
                plugins.push(args.next().ok_or("--plugin requires a name")?);
            }
            "-V" | "--version" => {
                println!("quill-lsp {VERSION}");
                std::process::exit(0);
            }
            "-h" | "--help" => {
                print!("{USAGE}");
                std::process::exit(0);
            }
            other => return Err(format!("unrecognized argument: {other}")),
        }
    }

    Ok(Args {
        schema: schema.ok_or("--schema is required")?,
        datasets,
        plugins,
    })
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("quill-lsp: {message}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    let schema = load_schema(&args.schema)?;
    let datasets = match &args.datasets {
        Some(path) => load_datasets(path)?,
        None => StaticDatasets::new(),
    };

    let mut config = ServerConfig::new(schema, datasets);
    if !args.plugins.is_empty() {
        config = config.with_plugins(args.plugins);
    }

    run(config).await
}
