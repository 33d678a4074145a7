//! CLI tool for editing tar archives in place.

mod commands;
mod detect;
mod exit_codes;
mod inputs;
mod output;
mod progress;
mod prompt;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use retar::{CodecMethod, CollisionPolicy};

use exit_codes::ExitCode;

/// In-place tar archive editor
#[derive(Parser)]
#[command(name = "retar")]
#[command(author, version, about = "In-place tar archive editor", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Compression algorithm (default: inferred from the archive extension)
    #[arg(long, short = 'A', value_enum, global = true)]
    algorithm: Option<Algorithm>,

    /// Compression level (0 = fastest, 9 = best)
    #[arg(long, short = 'L', default_value = "4", global = true)]
    level: u32,

    /// Number of compression threads (0 = single-threaded)
    #[arg(long, short = 't', default_value = "0", global = true)]
    threads: u32,

    /// What to do when an appended file already exists in the archive
    #[arg(long, value_enum, default_value = "rename", global = true)]
    on_collision: CollisionMode,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Suppress progress output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new archive, overwriting any existing file (alias: c)
    #[command(alias = "c")]
    Create {
        /// Archive file to create ('-' for stdout)
        archive: PathBuf,

        /// Files and directories to add (glob patterns supported)
        #[arg(required = true)]
        files: Vec<String>,

        /// Do not descend into directories
        #[arg(long)]
        no_recursion: bool,
    },

    /// Append files, renaming duplicates (alias: a)
    #[command(alias = "a")]
    Append {
        /// Archive file to append to (created if missing)
        archive: PathBuf,

        /// Files and directories to add (glob patterns supported)
        #[arg(required = true)]
        files: Vec<String>,

        /// Do not descend into directories
        #[arg(long)]
        no_recursion: bool,
    },

    /// Add files or replace members with the same name (alias: u)
    #[command(alias = "u")]
    Update {
        /// Archive file to update (created if missing)
        archive: PathBuf,

        /// Files and directories to add (glob patterns supported)
        #[arg(required = true)]
        files: Vec<String>,

        /// Do not descend into directories
        #[arg(long)]
        no_recursion: bool,
    },

    /// Delete members matching glob patterns or directory prefixes (alias: d)
    #[command(alias = "d")]
    Delete {
        /// Archive file to delete from
        archive: PathBuf,

        /// Member patterns, e.g. '*.tmp' or 'logs/'
        #[arg(required = true)]
        patterns: Vec<String>,
    },

    /// Rewrite the archive in canonical member order (alias: r)
    #[command(alias = "r")]
    Reorganize {
        /// Archive file to rewrite
        archive: PathBuf,
    },

    /// List archive contents (alias: l)
    #[command(alias = "l")]
    List {
        /// Archive file to list ('-' for stdin)
        archive: PathBuf,
    },

    /// Show member counts and total size (alias: s)
    #[command(alias = "s")]
    Stats {
        /// Archive file to inspect ('-' for stdin)
        archive: PathBuf,
    },

    /// Extract members from archive (alias: x)
    #[command(alias = "x")]
    Extract {
        /// Archive file to extract ('-' for stdin)
        archive: PathBuf,

        /// Member patterns to extract (default: everything)
        patterns: Vec<String>,

        /// Output directory
        #[arg(short = 'C', long, default_value = ".")]
        output: PathBuf,

        /// Write the content of selected files to stdout instead
        #[arg(short = 'O', long)]
        to_stdout: bool,

        /// Restore owner and group ids
        #[arg(long)]
        preserve_owner: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum CollisionMode {
    Ask,
    Rename,
    Skip,
    Fail,
}

impl From<CollisionMode> for CollisionPolicy {
    fn from(mode: CollisionMode) -> Self {
        match mode {
            CollisionMode::Ask => CollisionPolicy::ask(prompt::ConfirmPrompt),
            CollisionMode::Rename => CollisionPolicy::Rename,
            CollisionMode::Skip => CollisionPolicy::Skip,
            CollisionMode::Fail => CollisionPolicy::Fail,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    None,
    Gzip,
    Zlib,
    Bzip2,
    Xz,
    Lzma,
    Lz4,
    Zstd,
    /// Snappy framing; S2 streams using block extensions cannot be read
    S2,
    Brotli,
}

impl Algorithm {
    /// The codec to use; `None` writes a plain tar stream.
    pub fn method(self) -> Option<CodecMethod> {
        match self {
            Self::None => None,
            Self::Gzip => Some(CodecMethod::Gzip),
            Self::Zlib => Some(CodecMethod::Zlib),
            Self::Bzip2 => Some(CodecMethod::Bzip2),
            Self::Xz => Some(CodecMethod::Xz),
            Self::Lzma => Some(CodecMethod::Lzma),
            Self::Lz4 => Some(CodecMethod::Lz4),
            Self::Zstd => Some(CodecMethod::Zstd),
            Self::S2 => Some(CodecMethod::S2),
            Self::Brotli => Some(CodecMethod::Brotli),
        }
    }
}

fn main() {
    // First Ctrl+C stops before the archive is rewritten, the second exits
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            eprintln!("\nInterrupted");
            std::process::exit(exit_codes::USER_INTERRUPT);
        }
        eprintln!("\nCancelling, the archive is left unchanged (Ctrl+C again to abort)");
    })
    .ok();

    let cli = Cli::parse();

    let ctx = commands::Context {
        algorithm: cli.algorithm,
        level: cli.level,
        threads: cli.threads,
        collision: cli.on_collision,
        format: cli.format,
        quiet: cli.quiet,
        cancel,
    };

    let exit_code = match cli.command {
        Commands::Create {
            archive,
            files,
            no_recursion,
        } => commands::create(&ctx, &archive, &files, !no_recursion),

        Commands::Append {
            archive,
            files,
            no_recursion,
        } => commands::append(&ctx, &archive, &files, !no_recursion),

        Commands::Update {
            archive,
            files,
            no_recursion,
        } => commands::update(&ctx, &archive, &files, !no_recursion),

        Commands::Delete { archive, patterns } => commands::delete(&ctx, &archive, &patterns),

        Commands::Reorganize { archive } => commands::reorganize(&ctx, &archive),

        Commands::List { archive } => commands::list(&ctx, &archive),

        Commands::Stats { archive } => commands::stats(&ctx, &archive),

        Commands::Extract {
            archive,
            patterns,
            output,
            to_stdout,
            preserve_owner,
        } => commands::extract(
            &ctx,
            &commands::ExtractConfig {
                archive_path: &archive,
                patterns: &patterns,
                output_dir: &output,
                to_stdout,
                preserve_owner,
            },
        ),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}
