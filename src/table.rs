// Tabular output assembly: header rows plus timestamped data rows

use std::io::Write;

use crate::csv::CsvWriter;
use crate::dlog::{DlogError, Header, Result, Sample};

/// Which optional header rows to emit ahead of the data rows.
#[derive(Debug, Clone, Copy)]
pub struct TableOptions {
    /// Emit the flattened key=value metadata row.
    pub include_log_header: bool,
    /// Emit the titled column row.
    pub include_column_header: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            include_log_header: true,
            include_column_header: true,
        }
    }
}

/// One `field=value` entry per header field, in the header's declared
/// field order.
pub fn log_header_row(header: &Header) -> Vec<String> {
    header
        .fields()
        .into_iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect()
}

/// `["Time", "Channel <id>", ...]` for the active channels, in order.
pub fn column_header_row(header: &Header) -> Vec<String> {
    let mut row = Vec::with_capacity(header.num_channels + 1);
    row.push("Time".to_string());
    for id in header.active_channels() {
        row.push(format!("Channel {id}"));
    }
    row
}

/// Lazy row producer: row `i` is `[i / sample_rate, ...channel values]`.
///
/// Non-restartable; pacing is driven entirely by the consumer. A sample
/// whose channel count does not match the header's active channel count
/// yields `MalformedSample` rather than a short or long row.
pub struct TimestampedRows<I> {
    samples: I,
    sample_rate: f64,
    num_channels: usize,
    index: usize,
}

/// Wrap a sample sequence in the timestamped row producer for `header`.
pub fn timestamped_rows<I>(header: &Header, samples: I) -> TimestampedRows<I::IntoIter>
where
    I: IntoIterator<Item = Result<Sample>>,
{
    TimestampedRows {
        samples: samples.into_iter(),
        sample_rate: header.sample_rate,
        num_channels: header.num_channels,
        index: 0,
    }
}

impl<I> Iterator for TimestampedRows<I>
where
    I: Iterator<Item = Result<Sample>>,
{
    type Item = Result<Vec<f64>>;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = match self.samples.next()? {
            Ok(sample) => sample,
            Err(e) => return Some(Err(e)),
        };

        if sample.channel.len() != self.num_channels {
            return Some(Err(DlogError::MalformedSample {
                index: self.index,
                expected: self.num_channels,
                got: sample.channel.len(),
            }));
        }

        let mut row = Vec::with_capacity(self.num_channels + 1);
        row.push(self.index as f64 / self.sample_rate);
        row.extend(sample.channel);
        self.index += 1;
        Some(Ok(row))
    }
}

/// One full conversion pass: optional log header row, optional column
/// header row, then every data row, written to `sink` as CSV.
///
/// The sink is flushed on every exit path; output already flushed before
/// a failure is left in place.
pub fn write_table<I, W>(
    header: &Header,
    samples: I,
    options: &TableOptions,
    sink: W,
) -> Result<()>
where
    I: IntoIterator<Item = Result<Sample>>,
    W: Write,
{
    let mut csv = CsvWriter::new(sink);

    if options.include_log_header {
        csv.write_row(log_header_row(header))?;
    }
    if options.include_column_header {
        csv.write_row(column_header_row(header))?;
    }

    for row in timestamped_rows(header, samples) {
        match row {
            Ok(values) => {
                csv.write_row(values.iter().map(f64::to_string))?;
            }
            Err(e) => {
                csv.flush()?;
                return Err(e);
            }
        }
    }

    csv.flush()?;
    Ok(())
}
