use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::info;

use newsfold::config::{Config, EncoderBackend};
use newsfold::encoder::hashed::HashedEncoder;
use newsfold::encoder::onnx::OnnxEncoder;
use newsfold::encoder::traits::TextEncoder;
use newsfold::similarity::validate_threshold;

/// Newsfold: cluster near-duplicate news articles.
///
/// Groups articles whose descriptions are semantically near-identical and
/// merges each group into one record with summed duplicate counts and a
/// publish date range.
#[derive(Parser)]
#[command(name = "newsfold", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group near-duplicate articles from a JSON file
    Group {
        /// Path to a JSON array of article records
        input: PathBuf,

        /// Write the merged records as JSON instead of only printing a table
        #[arg(long)]
        output: Option<PathBuf>,

        /// Override the similarity threshold (default 0.75, within [-1, 1])
        #[arg(long)]
        threshold: Option<f64>,

        /// Embedding backend, mirroring the NEWSFOLD_ENCODER values
        #[arg(long, value_enum)]
        encoder: Option<EncoderArg>,
    },

    /// Download the ONNX sentence embedding model (~90 MB)
    DownloadModel,
}

/// CLI spelling of the encoder backends.
#[derive(Clone, Copy, ValueEnum)]
enum EncoderArg {
    /// Local ONNX sentence transformer (needs the downloaded model)
    Onnx,
    /// Deterministic hash vectors; only exact duplicate texts cluster
    Hashed,
}

impl From<EncoderArg> for EncoderBackend {
    fn from(arg: EncoderArg) -> Self {
        match arg {
            EncoderArg::Onnx => EncoderBackend::Onnx,
            EncoderArg::Hashed => EncoderBackend::Hashed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("newsfold=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Group {
            input,
            output,
            threshold,
            encoder,
        } => {
            let mut config = Config::load()?;
            if let Some(t) = threshold {
                validate_threshold(t)?;
                config.threshold = t;
            }
            if let Some(backend) = encoder {
                config.encoder_backend = backend.into();
            }

            let articles = newsfold::input::load_articles(&input)?;
            println!(
                "Loaded {} article(s) from {}",
                articles.len(),
                input.display()
            );

            let text_encoder: Box<dyn TextEncoder> = match config.encoder_backend {
                EncoderBackend::Onnx => {
                    config.require_encoder()?;
                    let dir = newsfold::encoder::download::embedding_model_dir(&config.model_dir);
                    Box::new(OnnxEncoder::load(&dir)?)
                }
                EncoderBackend::Hashed => {
                    println!(
                        "{}",
                        "Using the hashed encoder — only exact duplicate texts will cluster."
                            .dimmed()
                    );
                    Box::new(HashedEncoder)
                }
            };

            let merged =
                newsfold::pipeline::dedup::run(text_encoder.as_ref(), articles, config.threshold)
                    .await?;
            info!(groups = merged.len(), "Grouping complete");

            newsfold::output::terminal::display_groups(&merged);

            if let Some(path) = output {
                let json = serde_json::to_string_pretty(&merged)?;
                std::fs::write(&path, json)?;
                println!("Merged records written to {}", path.display());
            }
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            println!("Downloading model to {}...", config.model_dir.display());
            newsfold::encoder::download::download_model(&config.model_dir).await?;
            println!("\n{}", "Model ready. Next: newsfold group <input.json>".bold());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_accepts_both_encoder_backends() {
        let cli =
            Cli::try_parse_from(["newsfold", "group", "in.json", "--encoder", "hashed"]).unwrap();
        let Commands::Group { encoder, .. } = cli.command else {
            panic!("expected the group command");
        };
        assert!(matches!(encoder, Some(EncoderArg::Hashed)));

        let cli =
            Cli::try_parse_from(["newsfold", "group", "in.json", "--encoder", "onnx"]).unwrap();
        let Commands::Group { encoder, .. } = cli.command else {
            panic!("expected the group command");
        };
        assert!(matches!(encoder, Some(EncoderArg::Onnx)));
    }

    #[test]
    fn cli_rejects_unknown_encoder_backend() {
        assert!(Cli::try_parse_from(["newsfold", "group", "in.json", "--encoder", "tfidf"]).is_err());
    }

    #[test]
    fn cli_encoder_defaults_to_config() {
        let cli = Cli::try_parse_from(["newsfold", "group", "in.json"]).unwrap();
        let Commands::Group { encoder, .. } = cli.command else {
            panic!("expected the group command");
        };
        assert!(encoder.is_none());
    }
}
