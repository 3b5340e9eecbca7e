//! compressFly CLI
//!
//! Build, extract, inspect and maintain compressFly archives.

mod commands;
mod utils;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use compressfly_archive::{BuildOptions, CompressionAlgorithm, IgnoreRules};
use compressfly_core::Result as LibResult;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{
    CmdResult, CompressOptions, DecompressOptions, ViewOptions, cmd_compress, cmd_decompress,
    cmd_remove, cmd_update, cmd_validate, cmd_view,
};

#[derive(Parser)]
#[command(name = "compressfly")]
#[command(author, version, about = "File and directory archiver with RLE, Huffman and Lempel-Ziv codecs")]
#[command(long_about = "
compressFly packs files and folders into a single archive using one of three
codecs, and can extract, list, validate and edit those archives in place.

Examples:
  compressfly compress docs src -o project.cfly --codec lz
  compressfly compress data -o data.cfly --codec rle --chunk-width 4
  compressfly decompress project.cfly data.cfly -o restored
  compressfly view project.cfly --json
  compressfly validate project.cfly data.cfly
  compressfly remove project.cfly src/generated
  compressfly update project.cfly docs/README.md
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log every entry read or written (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress files and folders into a new archive
    #[command(alias = "c")]
    Compress {
        /// Files and folders to add
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Archive to create (replaced if it exists)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compression codec
        #[arg(long, value_enum, default_value_t = CodecChoice::Rle)]
        codec: CodecChoice,

        /// Window width in bytes for the RLE codec
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..))]
        chunk_width: u8,

        #[command(flatten)]
        ignore: IgnoreArgs,

        /// Keep a partially written archive when compression fails
        #[arg(long)]
        keep_partial: bool,
    },

    /// Extract one or more archives
    #[command(alias = "x")]
    Decompress {
        /// Archives to extract
        #[arg(required = true)]
        archives: Vec<PathBuf>,

        /// Existing directory to extract into (current directory if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Give up after this many seconds
        #[arg(long, default_value_t = 300)]
        timeout: u64,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// List the contents of one or more archives
    #[command(alias = "l")]
    View {
        /// Archives to list
        #[arg(required = true)]
        archives: Vec<PathBuf>,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,

        /// Include only entries matching pattern (glob syntax: *.txt, src/**/*)
        #[arg(short = 'I', long)]
        include: Vec<String>,

        /// Exclude entries matching pattern (glob syntax)
        #[arg(short = 'X', long)]
        exclude: Vec<String>,
    },

    /// Check that archives decode cleanly
    #[command(alias = "t")]
    Validate {
        /// Archives to check
        #[arg(required = true)]
        archives: Vec<PathBuf>,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Remove entries from an archive by path prefix
    #[command(alias = "rm")]
    Remove {
        /// Archive to edit
        archive: PathBuf,

        /// Path prefixes of the entries to remove
        #[arg(required = true)]
        prefixes: Vec<String>,
    },

    /// Re-add files and folders to an archive, replacing their old entries
    #[command(alias = "u")]
    Update {
        /// Archive to edit
        archive: PathBuf,

        /// Files and folders to add
        #[arg(required = true)]
        inputs: Vec<String>,

        #[command(flatten)]
        ignore: IgnoreArgs,
    },
}

/// Codec selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CodecChoice {
    /// Run-length encoding
    Rle,
    /// Huffman coding
    Huffman,
    /// Lempel-Ziv (LZ78) coding
    Lz,
}

impl CodecChoice {
    fn algorithm(self, chunk_width: u8) -> LibResult<CompressionAlgorithm> {
        match self {
            Self::Rle => CompressionAlgorithm::rle(chunk_width),
            Self::Huffman => Ok(CompressionAlgorithm::huffman()),
            Self::Lz => Ok(CompressionAlgorithm::lempel_ziv()),
        }
    }
}

/// Paths skipped while compressing.
#[derive(Debug, Clone, Default, Args)]
struct IgnoreArgs {
    /// Files to skip, by path as given
    #[arg(long, num_args = 1..)]
    ignore_files: Vec<String>,

    /// Folders to skip, with everything below them
    #[arg(long, num_args = 1..)]
    ignore_folders: Vec<String>,

    /// File suffixes to skip, e.g. .log
    #[arg(long, num_args = 1..)]
    ignore_extensions: Vec<String>,
}

impl From<IgnoreArgs> for IgnoreRules {
    fn from(args: IgnoreArgs) -> Self {
        Self {
            files: args.ignore_files,
            folders: args.ignore_folders,
            extensions: args.ignore_extensions,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> CmdResult {
    match cli.command {
        Commands::Compress {
            inputs,
            output,
            codec,
            chunk_width,
            ignore,
            keep_partial,
        } => {
            let algorithm = codec.algorithm(chunk_width)?;
            cmd_compress(&CompressOptions {
                inputs: &inputs,
                output: output.as_deref(),
                algorithm,
                build: BuildOptions {
                    ignore: ignore.into(),
                    remove_output_on_error: !keep_partial,
                },
            })
        }
        Commands::Decompress {
            archives,
            output,
            timeout,
            no_progress,
        } => cmd_decompress(&DecompressOptions {
            archives: &archives,
            output: output.as_deref(),
            timeout,
            progress: !no_progress,
        }),
        Commands::View {
            archives,
            json,
            include,
            exclude,
        } => cmd_view(&ViewOptions {
            archives: &archives,
            verbose: cli.verbose,
            json,
            include: &include,
            exclude: &exclude,
        }),
        Commands::Validate { archives, json } => cmd_validate(&archives, json),
        Commands::Remove { archive, prefixes } => cmd_remove(&archive, &prefixes),
        Commands::Update {
            archive,
            inputs,
            ignore,
        } => cmd_update(
            &archive,
            &inputs,
            &BuildOptions {
                ignore: ignore.into(),
                ..BuildOptions::default()
            },
        ),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
