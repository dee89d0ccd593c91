//! IDX container decoding.
//!
//! IDX is the big-endian binary format the handwritten-digit corpus ships in:
//! two reserved zero bytes, a one-byte element type tag, a one-byte dimension
//! count, that many big-endian u32 dimension sizes, then the raw payload in
//! row-major order.

use flate2::read::GzDecoder;
use image::{GrayImage, Luma};
use ndarray::{ArrayD, IxDyn};
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::{FormatError, Result};

/// Element type tag for unsigned 8-bit integers, the only one handled here.
pub const UNSIGNED_BYTE_TAG: u8 = 0x08;

/// An unsigned-byte array decoded from an IDX file: an owned payload buffer
/// plus the shape declared by the header. Payload length always equals the
/// product of the shape.
#[derive(Debug)]
pub struct IdxArray {
   shape: Vec<usize>,
   data: Vec<u8>,
}

impl IdxArray {
   /// Read and decode an IDX file. Paths ending in `.gz` are decompressed
   /// first, so the corpus files can be used as downloaded.
   pub fn open<P: AsRef<Path>>(path: P) -> Result<IdxArray> {
      let path = path.as_ref();
      let mut raw = fs::read(path)?;
      if path.extension().map_or(false, |ext| ext == "gz") {
         let mut decoder = GzDecoder::new(raw.as_slice());
         let mut decoded = Vec::new();
         decoder.read_to_end(&mut decoded)?;
         raw = decoded;
      }
      Ok(IdxArray::parse(&raw)?)
   }

   /// Decode an in-memory IDX file. The declared shape is validated against
   /// the payload length up front, so every accessor below can trust it.
   pub fn parse<D: AsRef<[u8]>>(data: &D) -> std::result::Result<IdxArray, FormatError> {
      let data = data.as_ref();
      if data.len() < 4 {
         return Err(FormatError::TruncatedHeader { len: data.len() });
      }
      if data[0] != 0 || data[1] != 0 {
         return Err(FormatError::ReservedNotZero {
            found: [data[0], data[1]],
         });
      }
      if data[2] != UNSIGNED_BYTE_TAG {
         return Err(FormatError::UnsupportedElementType(data[2]));
      }
      let ndim = data[3] as usize;
      if ndim == 0 {
         return Err(FormatError::ZeroDimensions);
      }

      let header_len = 4 + 4 * ndim;
      if data.len() < header_len {
         return Err(FormatError::TruncatedHeader { len: data.len() });
      }
      let shape: Vec<usize> = (0..ndim)
         .map(|d| {
            let at = 4 + 4 * d;
            u32::from_be_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]) as usize
         })
         .collect();

      let expected: usize = shape.iter().product();
      let payload = &data[header_len..];
      if payload.len() != expected {
         return Err(FormatError::PayloadSizeMismatch {
            expected,
            actual: payload.len(),
         });
      }

      Ok(IdxArray {
         shape,
         data: payload.to_vec(),
      })
   }

   pub fn shape(&self) -> &[usize] {
      &self.shape
   }

   pub fn ndim(&self) -> usize {
      self.shape.len()
   }

   /// Number of records, i.e. the leading dimension.
   pub fn num_records(&self) -> usize {
      self.shape[0]
   }

   /// Flat element count of a single record (product of the trailing
   /// dimensions; 1 for a rank-1 array of scalars).
   pub fn record_len(&self) -> usize {
      self.shape[1..].iter().product()
   }

   /// The bytes of record `index` in row-major order.
   ///
   /// Panics if `index >= num_records()`; use [`IdxArray::get`] for checked
   /// element access.
   pub fn record(&self, index: usize) -> &[u8] {
      let len = self.record_len();
      &self.data[index * len..(index + 1) * len]
   }

   /// Element at a full multi-index, computed as a row-major flat offset.
   /// Returns `None` if the index has the wrong rank or is out of bounds.
   pub fn get(&self, index: &[usize]) -> Option<u8> {
      if index.len() != self.shape.len() {
         return None;
      }
      let mut offset = 0;
      for (&i, &dim) in index.iter().zip(self.shape.iter()) {
         if i >= dim {
            return None;
         }
         offset = offset * dim + i;
      }
      Some(self.data[offset])
   }

   pub fn as_bytes(&self) -> &[u8] {
      &self.data
   }

   pub fn to_ndarray(&self) -> ArrayD<u8> {
      ArrayD::from_shape_vec(IxDyn(&self.shape), self.data.clone())
         .expect("shape and payload length are validated at construction")
   }

   /// Render record `index` of a rank-3 `[count, height, width]` array as a
   /// grayscale image. Returns `None` for other ranks or an out-of-bounds
   /// index.
   pub fn record_image(&self, index: usize) -> Option<GrayImage> {
      if self.shape.len() != 3 || index >= self.num_records() {
         return None;
      }
      let rows = self.shape[1];
      let cols = self.shape[2];
      let mut img = GrayImage::new(cols as u32, rows as u32);
      for (i, pixel) in self.record(index).iter().enumerate() {
         img.put_pixel((i % cols) as u32, (i / cols) as u32, Luma([*pixel]));
      }
      Some(img)
   }
}
