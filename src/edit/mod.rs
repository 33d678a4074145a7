//! Archive mutation.
//!
//! An edit reads the whole archive into a [`MemberSet`], applies the queued
//! [`Operation`]s in order, sorts the members into canonical order and
//! writes the archive back over the original file:
//!
//! 1. decode the file through the configured codec
//! 2. add, update and delete members, reporting each change
//! 3. sort by path segments and strip trailing `/` from names
//! 4. encode the complete new archive into memory
//! 5. truncate the file and write the new bytes
//!
//! Steps 1 to 4 never touch the file, so any failure there leaves it as it
//! was.
//!
//! # Example
//!
//! ```rust,no_run
//! use retar::edit::{ArchiveEditor, EditOptions};
//! use retar::progress::progress_fn;
//! use retar::{CodecMethod, CompressionOptions, Entry};
//!
//! let options = EditOptions::new()
//!     .compression(CompressionOptions::new().method(CodecMethod::Zstd));
//!
//! let result = ArchiveEditor::open("release.tar.zst")
//!     .options(options)
//!     .update(Entry::file("VERSION", b"1.4.2\n".to_vec()))
//!     .delete("debug/")?
//!     .apply(progress_fn(|event| eprintln!("{}", event)))?;
//!
//! println!(
//!     "kept {}, updated {}, deleted {}",
//!     result.entries_kept, result.entries_updated, result.entries_deleted
//! );
//! # Ok::<(), retar::Error>(())
//! ```

mod collision;
mod commit;
mod editor;
mod members;
mod operation;
mod pattern;
mod planner;
mod source;

pub use collision::{CollisionPolicy, CollisionPrompt, Resolution, collides, next_free_name};
pub use commit::commit;
pub use editor::{ArchiveEditor, EditOptions, EditResult};
pub use members::MemberSet;
pub use operation::{Operation, OperationBuilder};
pub use pattern::{MemberPattern, matches_any};
pub use planner::{PlanSummary, plan};
pub use source::EntrySource;
