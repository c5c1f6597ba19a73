//! rollmill-flatten: flatten a value document into wire parameters
//!
//! Reads a JSON value document describing an object graph and prints the
//! flat parameter map.
//!
//! Usage:
//!   # Read from file, print the parameter map as JSON
//!   rollmill-flatten user.json --root user
//!
//!   # Read from stdin, print a query string
//!   echo '{"Object": {"type_name": "User", "fields": [
//!     {"name": "id", "kind": "Int", "value": {"Int": 1}}
//!   ]}}' | rollmill-flatten --query
//!
//!   # Render dates with a custom process-wide default pattern
//!   rollmill-flatten event.json --date-format "%d/%m/%Y"

use anyhow::{Context, Result};
use clap::Parser;
use rollmill::flatten::{to_query_string, Flattener, Value};
use std::fs;
use std::io::Read;

#[derive(Parser, Debug)]
#[command(name = "rollmill-flatten")]
#[command(about = "Flatten a value document into wire parameters", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Root name for the generated paths
    #[arg(long, default_value = "root")]
    root: String,

    /// Print a query string instead of a JSON object
    #[arg(long)]
    query: bool,

    /// Default date pattern for temporal values without a directive
    #[arg(long)]
    date_format: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(pattern) = args.date_format {
        rollmill::format::set_default_date_format(pattern);
    }

    let document = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };

    let value: Value =
        serde_json::from_str(&document).context("Failed to parse value document")?;

    let params = Flattener::new()
        .flatten_value(&value, &args.root)
        .context("Failed to flatten value")?;

    if args.query {
        println!("{}", to_query_string(&params));
    } else {
        let rendered =
            serde_json::to_string_pretty(&params).context("Failed to serialize parameters")?;
        println!("{}", rendered);
    }

    Ok(())
}
