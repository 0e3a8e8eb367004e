use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use atlasdns::export::{self, ExportOptions};
use atlasdns::flatten::decode_abuf;
use atlasdns::{decode, flatten, flatten_parallel, load_file, ProbeResult};

#[derive(Parser)]
#[command(name = "atlasdns")]
#[command(version)]
#[command(about = "Decode and flatten DNS measurement results")]
struct Cli {
    /// Log decoding details (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Flatten a saved result file into one row per probe and query
    Parse {
        /// JSON result file to read
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// File to write; stdout when absent
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format; csv when writing a file, table otherwise
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Print the column names first (csv only)
        #[arg(long)]
        header: bool,

        /// Field delimiter (csv only)
        #[arg(short, long, default_value_t = ',')]
        delimiter: char,

        /// Text written for absent values (csv only)
        #[arg(long, default_value = "")]
        null: String,

        /// Decode probes on all cores
        #[arg(long)]
        parallel: bool,
    },
    /// Print every decoded response, probe by probe
    Dump {
        /// JSON result file to read
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Csv,
    Table,
    Json,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load(input: &Path) -> anyhow::Result<Vec<ProbeResult>> {
    load_file(input).with_context(|| format!("loading {}", input.display()))
}

fn parse(
    input: PathBuf,
    output: Option<PathBuf>,
    format: Option<Format>,
    options: ExportOptions,
    parallel: bool,
) -> anyhow::Result<()> {
    let probes = load(&input)?;
    let records = if parallel {
        flatten_parallel(&probes)
    } else {
        flatten(&probes)
    };
    info!("{} probes, {} records", probes.len(), records.len());

    let format = format.unwrap_or(if output.is_some() {
        Format::Csv
    } else {
        Format::Table
    });
    let writer: Box<dyn Write> = match output {
        Some(ref path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let written = match format {
        Format::Csv => export::write_delimited(&records, &options, writer),
        Format::Table => export::write_table(&records, writer),
        Format::Json => export::write_json_lines(&records, writer),
    };
    written.context("writing records")?;

    if let Some(path) = output {
        println!("Saved to {}", path.display());
    }
    Ok(())
}

fn dump(input: PathBuf) -> anyhow::Result<()> {
    let probes = load(&input)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for probe in probes.iter() {
        writeln!(out, "{}", probe.probe_id)?;
        for query in probe.queries() {
            match query.result.as_ref().and_then(|body| body.abuf.as_ref()) {
                Some(abuf) => match decode_abuf(abuf) {
                    Ok(buf) => match decode(&buf) {
                        Ok(message) => writeln!(out, "{}", message)?,
                        Err(err) => writeln!(out, "Undecodable result: {}", err)?,
                    },
                    Err(err) => writeln!(out, "Undecodable result: {}", err)?,
                },
                None => writeln!(out, "No result")?,
            }
            writeln!(out, "{}", "=".repeat(40))?;
        }
    }
    out.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Parse {
            input,
            output,
            format,
            header,
            delimiter,
            null,
            parallel,
        } => {
            if !delimiter.is_ascii() {
                bail!("delimiter must be a single ASCII character, got {:?}", delimiter);
            }
            let options = ExportOptions {
                delimiter: delimiter as u8,
                header,
                null,
            };
            parse(input, output, format, options, parallel)
        }
        Command::Dump { input } => dump(input),
    }
}
