//! avrodyn CLI - encode and decode Avro datums from the command line
//!
//! Commands:
//!   avrodyn encode --schema <avsc>        - JSON document to Avro datum
//!   avrodyn decode --schema <avsc>        - Avro datum to JSON document
//!   avrodyn fingerprint --schema <avsc>   - structural schema fingerprint

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use avrodyn::json::{value_from_json, value_to_json};
use avrodyn::{AvroSchema, Codec, CodecOptions, TargetType};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "avrodyn")]
#[command(about = "Schema-directed Avro encoder/decoder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON document into an Avro binary datum
    Encode {
        /// Path to the Avro schema (.avsc)
        #[arg(long, short)]
        schema: PathBuf,

        /// JSON input file (stdin when omitted)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Output file for the datum (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Codec options (JSON)
        #[arg(long)]
        options: Option<PathBuf>,
    },
    /// Decode an Avro binary datum and print it as JSON
    Decode {
        /// Path to the Avro schema (.avsc)
        #[arg(long, short)]
        schema: PathBuf,

        /// Datum input file (stdin when omitted)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Target type descriptor (JSON); decodes as `any` when omitted
        #[arg(long, short)]
        target: Option<PathBuf>,

        /// Codec options (JSON)
        #[arg(long)]
        options: Option<PathBuf>,
    },
    /// Print the structural fingerprint of a schema
    Fingerprint {
        /// Path to the Avro schema (.avsc)
        #[arg(long, short)]
        schema: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            schema,
            input,
            output,
            options,
        } => encode_command(&schema, input.as_deref(), output.as_deref(), options.as_deref()),
        Commands::Decode {
            schema,
            input,
            target,
            options,
        } => decode_command(&schema, input.as_deref(), target.as_deref(), options.as_deref()),
        Commands::Fingerprint { schema } => {
            let schema = load_schema(&schema)?;
            println!("{}", schema.fingerprint());
            Ok(())
        }
    }
}

fn encode_command(
    schema_path: &Path,
    input: Option<&Path>,
    output: Option<&Path>,
    options: Option<&Path>,
) -> anyhow::Result<()> {
    let schema = load_schema(schema_path)?;
    let codec = load_codec(options)?;

    let text = String::from_utf8(read_input(input)?).context("input is not valid UTF-8")?;
    let json: serde_json::Value = serde_json::from_str(&text).context("input is not valid JSON")?;
    let value = value_from_json(&json, schema.model())?;

    let bytes = codec.to_avro(&schema, &value)?;
    tracing::info!(len = bytes.len(), "encoded datum");

    match output {
        Some(path) => std::fs::write(path, &bytes)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => std::io::stdout().write_all(&bytes)?,
    }
    Ok(())
}

fn decode_command(
    schema_path: &Path,
    input: Option<&Path>,
    target: Option<&Path>,
    options: Option<&Path>,
) -> anyhow::Result<()> {
    let schema = load_schema(schema_path)?;
    let codec = load_codec(options)?;

    let target = match target {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<TargetType>(&text)
                .with_context(|| format!("invalid target descriptor in {}", path.display()))?
        }
        None => TargetType::Any,
    };

    let bytes = read_input(input)?;
    let value = codec.from_avro(&schema, &bytes, &target)?;
    tracing::info!(kind = %value.kind(), frozen = value.is_frozen(), "decoded datum");

    println!("{}", serde_json::to_string_pretty(&value_to_json(&value))?);
    Ok(())
}

fn load_schema(path: &Path) -> anyhow::Result<AvroSchema> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema {}", path.display()))?;
    let schema = AvroSchema::parse_str(&text)
        .with_context(|| format!("failed to load schema {}", path.display()))?;
    tracing::debug!(schema = %schema.model(), "loaded schema");
    Ok(schema)
}

fn load_codec(options: Option<&Path>) -> anyhow::Result<Codec> {
    let options = match options {
        Some(path) => CodecOptions::load(path)
            .with_context(|| format!("failed to load options {}", path.display()))?,
        None => CodecOptions::default(),
    };
    Ok(Codec::new(options))
}

fn read_input(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}
