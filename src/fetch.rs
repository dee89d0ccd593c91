//! Downloading the handwritten-digit corpus.
//!
//! The converter is usually pointed at files that are already on disk, but
//! `fetch` can pull the four corpus files from the public mirrors so a bare
//! checkout works end to end.

use flate2::read::GzDecoder;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::cmp::min;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::error::FetchError;

pub const MIRRORS: [&str; 2] = [
   "http://yann.lecun.com/exdb/mnist/",
   "https://ossci-datasets.s3.amazonaws.com/mnist/",
];

pub const GZ_FILENAMES: [&str; 4] = [
   "train-images-idx3-ubyte.gz",
   "train-labels-idx1-ubyte.gz",
   "t10k-images-idx3-ubyte.gz",
   "t10k-labels-idx1-ubyte.gz",
];

pub const RAW_FILENAMES: [&str; 4] = [
   "train-images.idx3-ubyte",
   "train-labels.idx1-ubyte",
   "t10k-images.idx3-ubyte",
   "t10k-labels.idx1-ubyte",
];

/// Download and extract any corpus files missing under `root`. Files that
/// already exist in their extracted form are left untouched.
pub fn fetch<P: AsRef<Path>>(root: &P) -> std::result::Result<(), FetchError> {
   let root = root.as_ref();
   let client = Client::new();
   let rt = Runtime::new()?;

   for (gz_filename, raw_filename) in GZ_FILENAMES.iter().zip(RAW_FILENAMES.iter()) {
      let raw_path = root.join(raw_filename);
      if raw_path.exists() {
         continue;
      }

      let mut downloaded = false;
      for mirror in MIRRORS.iter() {
         let url = format!("{}{}", mirror, gz_filename);
         match rt.block_on(download_with_pb(&client, &url, root, gz_filename)) {
            Ok(_) => {
               downloaded = true;
               break;
            }
            Err(e) => {
               warn!("failed to download (trying another mirror): {}", e);
               continue;
            }
         }
      }
      if !downloaded {
         return Err(FetchError::AllMirrorsFailed {
            filename: gz_filename.to_string(),
         });
      }
      extract_gz(&root.join(gz_filename), &raw_path)?;
   }

   Ok(())
}

async fn download_with_pb(
   client: &Client,
   url: &str,
   root: &Path,
   filename: &str,
) -> std::result::Result<(), FetchError> {
   info!("downloading {} ...", url);

   let res = client.get(url).send().await?.error_for_status()?;
   let total_size = res.content_length().unwrap_or(0);

   let pb = ProgressBar::new(total_size);
   pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.green}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})\n{msg}")?
        .progress_chars("#>-"));

   std::fs::create_dir_all(root)?;
   let fullpath = root.join(filename);
   let mut file = File::create(&fullpath)?;
   let mut downloaded: u64 = 0;
   let mut stream = res.bytes_stream();

   while let Some(item) = stream.next().await {
      let chunk = item?;
      file.write_all(&chunk)?;
      downloaded = min(downloaded + (chunk.len() as u64), total_size);
      pb.set_position(downloaded);
   }

   pb.finish_with_message(format!(
      "downloaded {} to {}",
      url,
      fullpath.to_str().unwrap_or(filename)
   ));

   Ok(())
}

/// Decompress a gzipped corpus file to its raw form.
pub fn extract_gz<P: AsRef<Path>>(gz_path: &P, raw_path: &P) -> std::result::Result<(), FetchError> {
   let gz_file = File::open(gz_path)?;
   let mut decoder = GzDecoder::new(gz_file);
   let mut buffer = Vec::new();
   decoder.read_to_end(&mut buffer)?;

   let mut raw_file = File::create(raw_path)?;
   raw_file.write_all(&buffer)?;

   Ok(())
}
