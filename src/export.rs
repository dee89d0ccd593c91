//! Writing example pairs as C declarations.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::error::{FormatError, RangeError, Result};
use crate::idx::IdxArray;

/// What to put between the brackets of the `example_<n>[..]` declaration.
///
/// The historical exporter wrote a literal `X`, leaving the element count for
/// manual editing; `Actual` substitutes the real flattened count instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountStyle {
   Placeholder,
   Actual,
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
   /// How many leading records to export.
   pub num_examples: usize,
   pub count_style: CountStyle,
}

impl Default for ExportOptions {
   fn default() -> Self {
      ExportOptions {
         num_examples: 10,
         count_style: CountStyle::Placeholder,
      }
   }
}

/// Decode the image and label files, then write the first
/// `options.num_examples` pairs to `output_path`.
pub fn export_examples<P: AsRef<Path>>(
   images_path: P,
   labels_path: P,
   output_path: P,
   options: &ExportOptions,
) -> Result<()> {
   let images = IdxArray::open(images_path)?;
   let labels = IdxArray::open(labels_path)?;
   write_examples(&images, &labels, output_path, options)
}

/// Write each pair as two lines:
///
/// ```text
/// float example_<n>[X] = {<comma-separated pixels>};
/// int label_<n> = <label>;
/// ```
///
/// Names are 1-based. The output file is truncated; nothing is written until
/// both arrays have passed the shape and bound checks, so an error means the
/// previous contents are either intact or fully replaced, never mixed with a
/// partial run of a different length than reported.
pub fn write_examples<P: AsRef<Path>>(
   images: &IdxArray,
   labels: &IdxArray,
   output_path: P,
   options: &ExportOptions,
) -> Result<()> {
   if images.ndim() != 3 {
      return Err(FormatError::WrongRank {
         expected: 3,
         actual: images.ndim(),
      }
      .into());
   }
   if labels.ndim() != 1 {
      return Err(FormatError::WrongRank {
         expected: 1,
         actual: labels.ndim(),
      }
      .into());
   }
   if images.num_records() != labels.num_records() {
      return Err(RangeError::RecordCountMismatch {
         images: images.num_records(),
         labels: labels.num_records(),
      }
      .into());
   }
   if options.num_examples > images.num_records() {
      return Err(RangeError::NotEnoughRecords {
         requested: options.num_examples,
         available: images.num_records(),
      }
      .into());
   }

   debug!(
      "exporting {} of {} records, image shape {:?}",
      options.num_examples,
      images.num_records(),
      images.shape()
   );

   let mut out = BufWriter::new(File::create(output_path)?);
   for i in 0..options.num_examples {
      let pixels = images.record(i);
      let flattened = pixels
         .iter()
         .map(u8::to_string)
         .collect::<Vec<_>>()
         .join(",");
      let count = match options.count_style {
         CountStyle::Placeholder => "X".to_string(),
         CountStyle::Actual => pixels.len().to_string(),
      };
      writeln!(out, "float example_{}[{}] = {{{}}};", i + 1, count, flattened)?;
      writeln!(out, "int label_{} = {};", i + 1, labels.record(i)[0])?;
   }
   out.flush()?;

   Ok(())
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::error::Error;
   use crate::idx::UNSIGNED_BYTE_TAG;
   use std::fs;
   use tempfile::TempDir;

   fn idx_bytes(shape: &[u32], payload: &[u8]) -> Vec<u8> {
      let mut bytes = vec![0, 0, UNSIGNED_BYTE_TAG, shape.len() as u8];
      for dim in shape {
         bytes.extend_from_slice(&dim.to_be_bytes());
      }
      bytes.extend_from_slice(payload);
      bytes
   }

   fn sample_arrays() -> (IdxArray, IdxArray) {
      let images = IdxArray::parse(&idx_bytes(&[2, 2, 2], &[1, 2, 3, 4, 5, 6, 7, 8])).unwrap();
      let labels = IdxArray::parse(&idx_bytes(&[2], &[7, 3])).unwrap();
      (images, labels)
   }

   #[test]
   fn writes_expected_declarations() {
      let (images, labels) = sample_arrays();
      let dir = TempDir::new().unwrap();
      let out = dir.path().join("examples.txt");

      let options = ExportOptions {
         num_examples: 2,
         ..ExportOptions::default()
      };
      write_examples(&images, &labels, &out, &options).unwrap();

      let text = fs::read_to_string(&out).unwrap();
      assert_eq!(
         text,
         "float example_1[X] = {1,2,3,4};\n\
          int label_1 = 7;\n\
          float example_2[X] = {5,6,7,8};\n\
          int label_2 = 3;\n"
      );
   }

   #[test]
   fn actual_count_style_substitutes_element_count() {
      let (images, labels) = sample_arrays();
      let dir = TempDir::new().unwrap();
      let out = dir.path().join("examples.txt");

      let options = ExportOptions {
         num_examples: 1,
         count_style: CountStyle::Actual,
      };
      write_examples(&images, &labels, &out, &options).unwrap();

      let text = fs::read_to_string(&out).unwrap();
      assert_eq!(text, "float example_1[4] = {1,2,3,4};\nint label_1 = 7;\n");
   }

   #[test]
   fn zero_examples_writes_empty_file() {
      let (images, labels) = sample_arrays();
      let dir = TempDir::new().unwrap();
      let out = dir.path().join("examples.txt");

      let options = ExportOptions {
         num_examples: 0,
         ..ExportOptions::default()
      };
      write_examples(&images, &labels, &out, &options).unwrap();
      assert_eq!(fs::read_to_string(&out).unwrap(), "");
   }

   #[test]
   fn rejects_too_many_examples() {
      let (images, labels) = sample_arrays();
      let dir = TempDir::new().unwrap();
      let out = dir.path().join("examples.txt");

      let options = ExportOptions {
         num_examples: 3,
         ..ExportOptions::default()
      };
      let err = write_examples(&images, &labels, &out, &options).unwrap_err();
      assert!(matches!(
         err,
         Error::Range(RangeError::NotEnoughRecords {
            requested: 3,
            available: 2
         })
      ));
      // Nothing is written when the bound check fails.
      assert!(!out.exists());
   }

   #[test]
   fn rejects_record_count_mismatch() {
      let (images, _) = sample_arrays();
      let labels = IdxArray::parse(&idx_bytes(&[3], &[7, 3, 1])).unwrap();
      let dir = TempDir::new().unwrap();
      let out = dir.path().join("examples.txt");

      let err = write_examples(&images, &labels, &out, &ExportOptions::default()).unwrap_err();
      assert!(matches!(
         err,
         Error::Range(RangeError::RecordCountMismatch {
            images: 2,
            labels: 3
         })
      ));
   }

   #[test]
   fn rejects_wrong_ranks() {
      let (images, labels) = sample_arrays();
      let dir = TempDir::new().unwrap();
      let out = dir.path().join("examples.txt");

      let err = write_examples(&labels, &labels, &out, &ExportOptions::default()).unwrap_err();
      assert!(matches!(
         err,
         Error::Format(FormatError::WrongRank {
            expected: 3,
            actual: 1
         })
      ));

      let err = write_examples(&images, &images, &out, &ExportOptions::default()).unwrap_err();
      assert!(matches!(
         err,
         Error::Format(FormatError::WrongRank {
            expected: 1,
            actual: 3
         })
      ));
   }
}
