use clap::{Parser, Subcommand};
use gallery_ingest::incoming::IncomingFile;
use gallery_ingest::naming::base_name;
use gallery_ingest::store::PictureStore;
use gallery_ingest::upload::Uploader;
use gallery_ingest::{config, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gallery-ingest")]
#[command(about = "Ingest pictures into a photo gallery store")]
#[command(long_about = "\
Ingest pictures into a photo gallery store

Each upload leaves two files in the target directory: a display copy fitted
into the display box and a thumbnail fitted into the thumbnail box. Names get
a fresh token, so repeated uploads of the same file never collide:

  public/uploads/pictures/
  ├── sunset-0192f1c4….jpg          # Display copy (default box 1000x800)
  └── sunset-0192f1c4…-thumb.jpg    # Thumbnail (default box 350x150)

If any step fails, every file the upload created is removed again.

Set RUST_LOG (e.g. RUST_LOG=gallery_ingest=debug) for step-by-step logs.
Run 'gallery-ingest gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (missing file means stock defaults)
    #[arg(long, default_value = "gallery-ingest.toml", global = true)]
    config: PathBuf,

    /// Picture store directory (overrides `target_dir` from the config)
    #[arg(long, global = true)]
    target_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload one JPEG or PNG picture
    Upload {
        /// Picture to ingest
        file: PathBuf,
        /// Display name (defaults to the file name without extension)
        #[arg(long)]
        name: Option<String>,
        /// Filename to name the upload after, if different from FILE
        #[arg(long)]
        original_name: Option<String>,
        /// Tag attached to the printed record
        #[arg(long)]
        tag: Option<String>,
        /// Description attached to the printed record
        #[arg(long)]
        description: Option<String>,
        /// Copy FILE into the store instead of moving it
        #[arg(long)]
        keep_source: bool,
        /// Print the picture record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a stored picture's display file and thumbnail
    Remove {
        /// Stored display file name
        stored: String,
        /// Stored thumbnail file name
        thumb: String,
    },
    /// Print a stock gallery-ingest.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Upload {
            file,
            name,
            original_name,
            tag,
            description,
            keep_source,
            json,
        } => {
            let config = load_config(&cli.config, cli.target_dir)?;
            let uploader = Uploader::from_config(&config);

            let mut incoming = match original_name {
                Some(original) => IncomingFile::new(&file, original),
                None => IncomingFile::from_path(&file),
            };
            if keep_source {
                incoming = incoming.keep_source();
            }
            let display_name =
                name.unwrap_or_else(|| base_name(incoming.original_name()).to_string());

            let outcome = uploader.upload(&incoming, &display_name)?;
            if outcome.failed {
                for line in output::format_upload_outcome(&outcome, &display_name) {
                    eprintln!("{}", line);
                }
                return Ok(ExitCode::FAILURE);
            }

            if json {
                if let Some(mut record) = outcome.record(&display_name) {
                    record.tag = tag;
                    record.description = description;
                    println!("{}", serde_json::to_string_pretty(&record)?);
                }
            } else {
                output::print_upload_outcome(&outcome, &display_name);
            }
        }
        Command::Remove { stored, thumb } => {
            let config = load_config(&cli.config, cli.target_dir)?;
            PictureStore::new(&config.target_dir).remove_picture(&stored, &thumb)?;
            output::print_removed(&stored, &thumb);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Logs go to stderr so `--json` output stays clean.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", env!("CARGO_CRATE_NAME"))));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(
    path: &Path,
    target_dir: Option<PathBuf>,
) -> Result<config::IngestConfig, config::ConfigError> {
    let mut config = config::load_config(path)?;
    if let Some(dir) = target_dir {
        config.target_dir = dir;
        config.validate()?;
    }
    Ok(config)
}
