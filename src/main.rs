//! Command-line driver for the IDX to C-array converter.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use idx2c::export::{export_examples, CountStyle, ExportOptions};
use idx2c::fetch;
use idx2c::idx::IdxArray;

#[derive(Parser, Debug)]
#[command(name = "idx2c", version)]
#[command(about = "Convert IDX image/label corpora into C array literals")]
struct Cli {
   /// Enable debug output
   #[arg(short, long, global = true)]
   verbose: bool,

   /// Only print errors
   #[arg(short, long, global = true)]
   quiet: bool,

   #[command(subcommand)]
   command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
   /// Write the first N image/label pairs as C declarations
   Export {
      /// Images IDX file (plain or .gz)
      #[arg(long)]
      images: PathBuf,

      /// Labels IDX file (plain or .gz)
      #[arg(long)]
      labels: PathBuf,

      /// Output text file, overwritten if it exists
      #[arg(short, long, default_value = "mnist_examples.txt")]
      output: PathBuf,

      /// Number of examples to export
      #[arg(short = 'n', long, default_value_t = 10)]
      num_examples: usize,

      /// Emit the real element count instead of the literal "X"
      #[arg(long)]
      emit_count: bool,
   },

   /// Download the corpus files that are missing under the data directory
   Fetch {
      /// Directory to download into
      #[arg(long, default_value = "data")]
      root: PathBuf,
   },

   /// Save one record as a grayscale PNG
   Preview {
      /// Images IDX file (plain or .gz)
      #[arg(long)]
      images: PathBuf,

      /// Labels IDX file (plain or .gz)
      #[arg(long)]
      labels: PathBuf,

      /// Record index (0-based)
      #[arg(short, long, default_value_t = 0)]
      index: usize,

      /// Output PNG path, derived from the index and label when omitted
      #[arg(short, long)]
      output: Option<PathBuf>,
   },
}

fn setup_logging(verbose: bool, quiet: bool) {
   let level = if quiet {
      Level::ERROR
   } else if verbose {
      Level::DEBUG
   } else {
      Level::INFO
   };

   let subscriber = FmtSubscriber::builder()
      .with_max_level(level)
      .with_target(false)
      .finish();

   tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");
}

fn main() -> Result<()> {
   let cli = Cli::parse();
   setup_logging(cli.verbose, cli.quiet);

   match cli.command {
      Command::Export {
         images,
         labels,
         output,
         num_examples,
         emit_count,
      } => {
         let options = ExportOptions {
            num_examples,
            count_style: if emit_count {
               CountStyle::Actual
            } else {
               CountStyle::Placeholder
            },
         };
         export_examples(&images, &labels, &output, &options).with_context(|| {
            format!("exporting {} examples to {}", num_examples, output.display())
         })?;
         info!("wrote {} example pairs to {}", num_examples, output.display());
      }

      Command::Fetch { root } => {
         fetch::fetch(&root).context("fetching corpus files")?;
         info!("corpus files are present under {}", root.display());
      }

      Command::Preview {
         images,
         labels,
         index,
         output,
      } => {
         let images = IdxArray::open(&images)?;
         let labels = IdxArray::open(&labels)?;
         let label = labels
            .get(&[index])
            .with_context(|| format!("label record {} is out of range", index))?;
         let img = images
            .record_image(index)
            .with_context(|| format!("image record {} is out of range or not 2-D", index))?;
         let path =
            output.unwrap_or_else(|| PathBuf::from(format!("mnist_image_{}_{}.png", index, label)));
         img.save(&path)
            .with_context(|| format!("saving {}", path.display()))?;
         info!("saved record {} (label {}) to {}", index, label, path.display());
      }
   }

   Ok(())
}
