//! Command implementations for the CLI tool.

use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use console::style;
use retar::edit::{MemberSet, Operation, plan};
use retar::format::write_entries;
use retar::{
    ArchiveEditor, ArchiveStats, CollisionPolicy, CompressionOptions, EditOptions, Entry, EntrySource,
    ExtractOptions, MemberPattern, extract_to_dir, read_archive, read_entries, write_contents,
};

use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::inputs::expand_inputs;
use crate::output::create_formatter;
use crate::progress::CliProgress;
use crate::{Algorithm, CollisionMode, OutputFormat, detect};

/// Global settings shared by every command.
pub struct Context {
    pub algorithm: Option<Algorithm>,
    pub level: u32,
    pub threads: u32,
    pub collision: CollisionMode,
    pub format: OutputFormat,
    pub quiet: bool,
    pub cancel: Arc<AtomicBool>,
}

impl Context {
    /// Compression settings for `archive`, inferring the codec from its name
    /// unless one was given explicitly.
    fn compression(&self, archive: &Path) -> retar::Result<CompressionOptions> {
        let method = match self.algorithm {
            Some(algorithm) => algorithm.method(),
            None => detect::method_from_path(archive),
        };
        Ok(CompressionOptions::new()
            .method_opt(method)
            .level(self.level)?
            .threads(self.threads))
    }

    fn edit_options(&self, archive: &Path) -> retar::Result<EditOptions> {
        Ok(EditOptions::new()
            .compression(self.compression(archive)?)
            .collision(self.collision.into()))
    }

    fn progress(&self) -> CliProgress {
        CliProgress::new(
            self.quiet,
            self.collision == CollisionMode::Ask,
            Arc::clone(&self.cancel),
        )
    }
}

/// Configuration for the extract command.
pub struct ExtractConfig<'a> {
    pub archive_path: &'a Path,
    pub patterns: &'a [String],
    pub output_dir: &'a Path,
    pub to_stdout: bool,
    pub preserve_owner: bool,
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn report_error(e: &retar::Error) -> ExitCode {
    eprintln!("{} {}", style("Error:").for_stderr().red().bold(), e);
    error_to_exit_code(e)
}

fn require_file(archive: &Path, command: &str) -> Result<(), ExitCode> {
    if is_stdio(archive) {
        eprintln!(
            "{} {} needs an archive file, not '-'",
            style("Error:").for_stderr().red().bold(),
            command
        );
        return Err(ExitCode::BadArgs);
    }
    Ok(())
}

fn expand(files: &[String]) -> Result<Vec<PathBuf>, ExitCode> {
    expand_inputs(files).map_err(|e| {
        eprintln!("{} {}", style("Error:").for_stderr().red().bold(), e);
        ExitCode::BadArgs
    })
}

/// Runs a configured editor and prints its result.
fn run_editor(ctx: &Context, archive: &Path, editor: ArchiveEditor, verb: &str) -> ExitCode {
    let options = match ctx.edit_options(archive) {
        Ok(o) => o,
        Err(e) => return report_error(&e),
    };

    let mut progress = ctx.progress();
    progress.set_message(format!("{} {}", verb, archive.display()));

    let result = match editor.options(options).apply(&mut progress) {
        Ok(r) => r,
        Err(e) => {
            progress.finish_with_message("Failed");
            return report_error(&e);
        }
    };
    progress.finish();

    if !ctx.quiet || ctx.format == OutputFormat::Json {
        let formatter = create_formatter(ctx.format);
        print!(
            "{}",
            formatter.format_edit_result(&archive.display().to_string(), &result)
        );
    }

    if result.entries_skipped > 0 {
        ExitCode::Warning
    } else {
        ExitCode::Success
    }
}

/// Create command implementation
pub fn create(ctx: &Context, archive: &Path, files: &[String], recursive: bool) -> ExitCode {
    let files = match expand(files) {
        Ok(f) => f,
        Err(code) => return code,
    };

    if is_stdio(archive) {
        return create_to_stdout(ctx, &files, recursive);
    }

    let editor = files.into_iter().fold(ArchiveEditor::create(archive), |editor, file| {
        editor.operation(Operation::Add {
            source: EntrySource::Path(file),
            recursive,
        })
    });
    run_editor(ctx, archive, editor, "Creating")
}

/// Streams a new archive to stdout; there is no file to rewrite.
fn create_to_stdout(ctx: &Context, files: &[PathBuf], recursive: bool) -> ExitCode {
    let compression = match ctx.compression(Path::new("-")) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };
    let operations: Vec<Operation> = files
        .iter()
        .map(|file| Operation::Add {
            source: EntrySource::Path(file.clone()),
            recursive,
        })
        .collect();

    let mut progress = ctx.progress();
    let mut members = MemberSet::new();
    let policy: CollisionPolicy = ctx.collision.into();
    if let Err(e) = plan(&mut members, &operations, &policy, &mut progress) {
        progress.finish_with_message("Failed");
        return report_error(&e);
    }

    let entries = members.into_ordered();
    let stdout = BufWriter::new(io::stdout());
    if let Err(e) = write_entries(&entries, stdout, &compression) {
        progress.finish_with_message("Failed");
        return report_error(&e);
    }
    progress.finish();
    ExitCode::Success
}

/// Append command implementation
pub fn append(ctx: &Context, archive: &Path, files: &[String], recursive: bool) -> ExitCode {
    if let Err(code) = require_file(archive, "append") {
        return code;
    }
    let files = match expand(files) {
        Ok(f) => f,
        Err(code) => return code,
    };

    let editor = files
        .into_iter()
        .fold(ArchiveEditor::open_or_create(archive), |editor, file| {
            editor.operation(Operation::Add {
                source: EntrySource::Path(file),
                recursive,
            })
        });
    run_editor(ctx, archive, editor, "Appending to")
}

/// Update command implementation
pub fn update(ctx: &Context, archive: &Path, files: &[String], recursive: bool) -> ExitCode {
    if let Err(code) = require_file(archive, "update") {
        return code;
    }
    let files = match expand(files) {
        Ok(f) => f,
        Err(code) => return code,
    };

    let editor = files
        .into_iter()
        .fold(ArchiveEditor::open_or_create(archive), |editor, file| {
            editor.operation(Operation::Update {
                source: EntrySource::Path(file),
                recursive,
            })
        });
    run_editor(ctx, archive, editor, "Updating")
}

/// Delete command implementation
pub fn delete(ctx: &Context, archive: &Path, patterns: &[String]) -> ExitCode {
    if let Err(code) = require_file(archive, "delete") {
        return code;
    }

    let mut editor = ArchiveEditor::open(archive);
    for pattern in patterns {
        editor = match editor.delete(pattern) {
            Ok(e) => e,
            Err(e) => return report_error(&e),
        };
    }
    run_editor(ctx, archive, editor, "Deleting from")
}

/// Reorganize command implementation
pub fn reorganize(ctx: &Context, archive: &Path) -> ExitCode {
    if let Err(code) = require_file(archive, "reorganize") {
        return code;
    }
    run_editor(ctx, archive, ArchiveEditor::open(archive), "Reorganizing")
}

fn load_entries(ctx: &Context, archive: &Path) -> retar::Result<Vec<Entry>> {
    let method = ctx.compression(archive)?.method;
    if is_stdio(archive) {
        read_entries(BufReader::new(io::stdin()), method)
    } else {
        read_archive(archive, method)
    }
}

/// List command implementation
pub fn list(ctx: &Context, archive: &Path) -> ExitCode {
    let entries = match load_entries(ctx, archive) {
        Ok(e) => e,
        Err(e) => return report_error(&e),
    };

    let formatter = create_formatter(ctx.format);
    print!("{}", formatter.format_list(&entries));
    ExitCode::Success
}

/// Stats command implementation
pub fn stats(ctx: &Context, archive: &Path) -> ExitCode {
    let entries = match load_entries(ctx, archive) {
        Ok(e) => e,
        Err(e) => return report_error(&e),
    };

    let formatter = create_formatter(ctx.format);
    let stats = ArchiveStats::from_entries(&entries);
    print!(
        "{}",
        formatter.format_stats(&archive.display().to_string(), &stats)
    );
    ExitCode::Success
}

/// Extract command implementation
pub fn extract(ctx: &Context, config: &ExtractConfig<'_>) -> ExitCode {
    let patterns = match config
        .patterns
        .iter()
        .map(|p| MemberPattern::new(p))
        .collect::<retar::Result<Vec<_>>>()
    {
        Ok(p) => p,
        Err(e) => return report_error(&e),
    };

    let entries = match load_entries(ctx, config.archive_path) {
        Ok(e) => e,
        Err(e) => return report_error(&e),
    };

    if config.to_stdout {
        let stdout = io::stdout();
        return match write_contents(&entries, &patterns, stdout.lock()) {
            Ok(_) => ExitCode::Success,
            Err(e) => report_error(&e),
        };
    }

    let options = ExtractOptions::new()
        .patterns(patterns)
        .preserve_owner(config.preserve_owner);
    let result = match extract_to_dir(&entries, config.output_dir, &options) {
        Ok(r) => r,
        Err(e) => return report_error(&e),
    };

    if !ctx.quiet || ctx.format == OutputFormat::Json {
        let formatter = create_formatter(ctx.format);
        print!("{}", formatter.format_extract_result(&result));
    }

    if result.entries_skipped > 0 {
        ExitCode::Warning
    } else {
        ExitCode::Success
    }
}
