//! idx2c - convert IDX image/label corpora into C array literals.
//!
//! The crate decodes the big-endian IDX container the handwritten-digit
//! corpus ships in and writes the first N (image, label) pairs as C source
//! declarations, ready for embedding into another program.

pub mod error;
pub mod export;
pub mod fetch;
pub mod idx;

pub use error::{Error, FetchError, FormatError, RangeError, Result};
pub use export::{export_examples, write_examples, CountStyle, ExportOptions};
pub use idx::IdxArray;
