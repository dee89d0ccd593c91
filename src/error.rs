//! Error types for idx2c

use std::io;
use thiserror::Error;

/// Top-level conversion error
#[derive(Error, Debug)]
pub enum Error {
   #[error("I/O error: {0}")]
   Io(#[from] io::Error),

   #[error("format error: {0}")]
   Format(#[from] FormatError),

   #[error("range error: {0}")]
   Range(#[from] RangeError),

   #[error("fetch error: {0}")]
   Fetch(#[from] FetchError),
}

/// IDX header or shape inconsistencies
#[derive(Error, Debug)]
pub enum FormatError {
   #[error("file too short for an IDX header: {len} bytes")]
   TruncatedHeader { len: usize },

   #[error("reserved header bytes are not zero: {found:02X?}")]
   ReservedNotZero { found: [u8; 2] },

   #[error("unsupported element type tag 0x{0:02X}, only unsigned bytes (0x08) are handled")]
   UnsupportedElementType(u8),

   #[error("dimension count is zero")]
   ZeroDimensions,

   #[error("payload size mismatch: shape implies {expected} bytes, found {actual}")]
   PayloadSizeMismatch { expected: usize, actual: usize },

   #[error("expected a rank-{expected} array, found rank {actual}")]
   WrongRank { expected: usize, actual: usize },
}

/// Requested records exceed what the inputs provide
#[derive(Error, Debug)]
pub enum RangeError {
   #[error("image and label record counts disagree: {images} images, {labels} labels")]
   RecordCountMismatch { images: usize, labels: usize },

   #[error("requested {requested} examples but only {available} records are available")]
   NotEnoughRecords { requested: usize, available: usize },
}

/// Corpus download failures
#[derive(Error, Debug)]
pub enum FetchError {
   #[error("HTTP request failed: {0}")]
   Http(#[from] reqwest::Error),

   #[error("invalid progress bar template: {0}")]
   Template(#[from] indicatif::style::TemplateError),

   #[error("I/O error: {0}")]
   Io(#[from] io::Error),

   #[error("failed to download {filename} from all mirrors")]
   AllMirrorsFailed { filename: String },
}

pub type Result<T> = std::result::Result<T, Error>;
