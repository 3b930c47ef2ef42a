//! Compare the word content of two text files.
//!
//! ```text
//! wordcmp compare a.txt b.txt -v
//! wordcmp histogram 7019 a.txt --hash sum-bytes -o buckets.csv --append
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use wordtable::builder::{DEFAULT_BUCKET_COUNT, TableBuilder};
use wordtable::ds::HashStrategy;
use wordtable::report::{Named, write_comparison, write_histogram};
use wordtable::table::WordTable;
use wordtable::tokenize::{FillOptions, fill_table_from_path};

#[derive(Parser)]
#[command(
    name = "wordcmp",
    about = "Word frequency comparison of text files",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print cosine similarity and the words unique to each file.
    Compare {
        file1: PathBuf,
        file2: PathBuf,
        /// List the differing words, not just their number.
        #[arg(short, long)]
        verbose: bool,
        /// Read at most this many words from each file.
        #[arg(short = 'n', long = "max-words")]
        max_words: Option<usize>,
        /// Fold ASCII letters to lowercase before counting.
        #[arg(long)]
        lowercase: bool,
        #[command(flatten)]
        table: TableArgs,
        #[command(flatten)]
        output: OutputArgs,
        /// Print table counters in Prometheus text format to stderr.
        #[cfg(feature = "metrics")]
        #[arg(long)]
        metrics: bool,
    },
    /// Print the chain length of every bucket as one CSV line.
    Histogram {
        buckets: usize,
        file: PathBuf,
        /// Hash strategy to measure.
        #[arg(long = "hash", default_value_t = HashStrategy::Murmur)]
        hasher: HashStrategy,
        /// Emit one line per hash strategy instead.
        #[arg(long, conflicts_with = "hasher")]
        all: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct TableArgs {
    /// Prime number of buckets per table.
    #[arg(long, default_value_t = DEFAULT_BUCKET_COUNT)]
    buckets: usize,
    /// Hash strategy used to place words in buckets.
    #[arg(long = "hash", default_value_t = HashStrategy::Murmur)]
    hasher: HashStrategy,
}

#[derive(Args)]
struct OutputArgs {
    /// Write to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Append to the output file instead of truncating it.
    #[arg(short, long, requires = "output")]
    append: bool,
}

impl OutputArgs {
    fn open(&self) -> io::Result<Box<dyn Write>> {
        match &self.output {
            Some(path) => {
                let file = if self.append {
                    OpenOptions::new().create(true).append(true).open(path)?
                } else {
                    File::create(path)?
                };
                Ok(Box::new(BufWriter::new(file)))
            },
            None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Compare {
            file1,
            file2,
            verbose,
            max_words,
            lowercase,
            table,
            output,
            #[cfg(feature = "metrics")]
            metrics,
        } => {
            let options = FillOptions {
                max_words,
                lowercase,
            };
            let first = load(&file1, &table, options)?;
            let second = load(&file2, &table, options)?;

            let name1 = file1.display().to_string();
            let name2 = file2.display().to_string();
            let mut out = output.open()?;
            write_comparison(
                &mut out,
                Named {
                    name: &name1,
                    table: &first,
                },
                Named {
                    name: &name2,
                    table: &second,
                },
                verbose,
            )?;
            out.flush()?;

            #[cfg(feature = "metrics")]
            if metrics {
                export_metrics(&name1, &first);
                export_metrics(&name2, &second);
            }
            Ok(())
        },
        Command::Histogram {
            buckets,
            file,
            hasher,
            all,
            output,
        } => {
            let strategies: &[HashStrategy] = if all {
                &HashStrategy::ALL
            } else {
                std::slice::from_ref(&hasher)
            };

            let mut out = output.open()?;
            for &strategy in strategies {
                let args = TableArgs {
                    buckets,
                    hasher: strategy,
                };
                let table = load(&file, &args, FillOptions::default())?;
                write_histogram(&mut out, &table)?;
            }
            out.flush()?;
            Ok(())
        },
    }
}

fn load(
    path: &Path,
    args: &TableArgs,
    options: FillOptions,
) -> Result<WordTable, Box<dyn std::error::Error>> {
    let mut table = TableBuilder::new(args.buckets)
        .hasher(args.hasher)
        .build()?;
    let stats = fill_table_from_path(&mut table, path, options)?;
    if stats.skipped_long > 0 {
        eprintln!(
            "warning: skipped {} overlong words in '{}'",
            stats.skipped_long,
            path.display()
        );
    }
    Ok(table)
}

#[cfg(feature = "metrics")]
fn export_metrics(name: &str, table: &WordTable) {
    use wordtable::metrics::exporter::PrometheusTextExporter;
    use wordtable::metrics::traits::{MetricsExporter, MetricsSnapshotProvider};

    eprintln!("# table: {}", name);
    let exporter = PrometheusTextExporter::new("wordtable", io::stderr());
    exporter.export(&table.snapshot());
}
