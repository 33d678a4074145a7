//! Tar stream model: members, decoding, encoding and canonical order.
//!
//! An archive is read in full into a list of [`Entry`] values, edited in
//! memory, and written back as a fresh stream. Nothing here touches the
//! archive file except [`read_archive`].

pub mod decode;
pub mod encode;
pub mod entry;
pub mod order;

pub use decode::{read_archive, read_entries};
pub use encode::{encode_to_vec, write_entries};
pub use entry::{Entry, EntryKind};
pub use order::{compare_names, reorder};
