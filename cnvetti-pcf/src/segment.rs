//! Implementation of the "cnvetti-pcf segment" command.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::str::FromStr;

use clap::ArgMatches;
use rayon::prelude::*;
use separator::Separatable;
use serde::Serialize;
use slog::Logger;

use lib_segment::{PiecewiseConstantFit, SegmentOptions};

use super::errors::*;

/// Format of the output file.
#[derive(Clone, Copy, Debug, EnumString, PartialEq)]
pub enum OutputFormat {
    /// One line per segment.
    Tsv,
    /// One JSON array with the fit of each series.
    Json,
}

/// Options for "cnvetti-pcf segment".
#[derive(Clone, Debug)]
pub struct SegmentCmdOptions {
    /// Path to input file, "-" for stdin.
    pub input: String,
    /// Path to output file, "-" for stdout.
    pub output: String,
    /// Output file format.
    pub output_format: OutputFormat,
    /// Number of series to segment in parallel.
    pub threads: usize,

    /// Parameters of the segmentation itself.
    pub segment: SegmentOptions,
}

impl SegmentCmdOptions {
    /// Build options from ArgMatches.
    pub fn new(matches: &ArgMatches) -> Result<Self> {
        let output_format = matches.value_of("output_format").unwrap_or("Tsv");
        let threads = matches.value_of("threads").unwrap_or("1");

        Ok(Self {
            input: matches.value_of("input").unwrap_or("-").to_string(),
            output: matches.value_of("output").unwrap_or("-").to_string(),
            output_format: OutputFormat::from_str(output_format)
                .chain_err(|| format!("Unknown output format: {}", output_format))?,
            threads: threads
                .parse::<usize>()
                .chain_err(|| format!("Invalid thread count: {}", threads))?,
            segment: SegmentOptions::new(matches)
                .chain_err(|| "Invalid segmentation parameters")?,
        })
    }
}

/// One ordered series of measurements, e.g., of one chromosome arm.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    /// Label of the series, "." if the input has no label column.
    pub label: String,
    /// The measurements.
    pub values: Vec<f64>,
}

/// Read series from lines with either one value or a label and a value.
///
/// Values with the same label are collected into one series, the series are returned in order
/// of first appearance.  Empty lines and lines starting with `#` are ignored.
pub fn read_series<R: BufRead>(reader: R) -> Result<Vec<Series>> {
    let mut result: Vec<Series> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').map(|s| s.trim()).collect();
        let (label, value) = match fields.as_slice() {
            [value] => (".", *value),
            [label, value] => (*label, *value),
            _ => {
                bail!(
                    "Line {}: expected one or two columns, found {}",
                    lineno + 1,
                    fields.len()
                );
            }
        };
        let value = value
            .parse::<f64>()
            .chain_err(|| format!("Line {}: invalid value {:?}", lineno + 1, value))?;
        if !value.is_finite() {
            bail!("Line {}: value {} is not finite", lineno + 1, value);
        }

        let idx = *index.entry(label.to_string()).or_insert_with(|| {
            result.push(Series {
                label: label.to_string(),
                values: Vec::new(),
            });
            result.len() - 1
        });
        result[idx].values.push(value);
    }

    Ok(result)
}

/// Write one line per segment.
pub fn write_tsv<W: Write>(
    writer: &mut W,
    series: &[Series],
    fits: &[PiecewiseConstantFit],
) -> Result<()> {
    writeln!(writer, "label\tstart\tend\tlength\tmean")?;
    for (series, fit) in series.iter().zip(fits.iter()) {
        for (start, end, mean) in fit.segments() {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}",
                series.label,
                start,
                end,
                end - start,
                mean
            )?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct LabeledFit<'a> {
    label: &'a str,
    #[serde(flatten)]
    fit: &'a PiecewiseConstantFit,
}

/// Write all fits as one JSON array.
pub fn write_json<W: Write>(
    writer: &mut W,
    series: &[Series],
    fits: &[PiecewiseConstantFit],
) -> Result<()> {
    let labeled: Vec<LabeledFit> = series
        .iter()
        .zip(fits.iter())
        .map(|(series, fit)| LabeledFit {
            label: &series.label,
            fit,
        })
        .collect();
    serde_json::to_writer_pretty(&mut *writer, &labeled)?;
    writeln!(writer)?;
    Ok(())
}

/// Segment all `series`, in parallel on `threads` threads.
pub fn segment_all(
    logger: &Logger,
    series: &[Series],
    options: &SegmentOptions,
    threads: usize,
) -> Result<Vec<PiecewiseConstantFit>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .chain_err(|| "Could not create thread pool")?;

    pool.install(|| {
        series
            .par_iter()
            .map(|s| -> Result<PiecewiseConstantFit> {
                let logger = logger.new(o!("label" => s.label.clone()));
                debug!(logger, "Segmenting {} values", s.values.len().separated_string());
                let fit = lib_segment::segment(&logger, &s.values, options)
                    .chain_err(|| format!("Could not segment series {}", s.label))?;
                debug!(logger, "=> {} segments", fit.len().separated_string());
                Ok(fit)
            })
            .collect::<Result<Vec<_>>>()
    })
}

/// Main entry point for the "segment" command.
pub fn run(logger: &Logger, options: &SegmentCmdOptions) -> Result<()> {
    info!(logger, "Running: cnvetti-pcf segment");
    info!(logger, "Options: {:?}", options);

    debug!(logger, "Reading input from {}", &options.input);
    let series = if options.input == "-" {
        let stdin = io::stdin();
        let lock = stdin.lock();
        read_series(lock)?
    } else {
        let file = File::open(&options.input)
            .chain_err(|| format!("Could not open input file {}", &options.input))?;
        read_series(BufReader::new(file))?
    };
    info!(
        logger,
        "Read {} series with {} values in total",
        series.len(),
        series
            .iter()
            .map(|s| s.values.len())
            .sum::<usize>()
            .separated_string()
    );

    let fits = segment_all(logger, &series, &options.segment, options.threads)?;
    info!(
        logger,
        "Found {} segments in total",
        fits.iter().map(|f| f.len()).sum::<usize>().separated_string()
    );

    debug!(logger, "Writing output to {}", &options.output);
    let mut writer: Box<dyn Write> = if options.output == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        Box::new(BufWriter::new(File::create(&options.output).chain_err(
            || format!("Could not open output file {}", &options.output),
        )?))
    };
    match options.output_format {
        OutputFormat::Tsv => write_tsv(&mut writer, &series, &fits)?,
        OutputFormat::Json => write_json(&mut writer, &series, &fits)?,
    }
    writer.flush()?;

    info!(logger, "Done. Have a nice day!");
    Ok(())
}
