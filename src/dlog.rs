// Dlog Module
// Data model and binary decoder for instrument data-log files

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DlogError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("not a dlog file: bad magic {0:?}")]
    BadMagic([u8; 4]),

    #[error("unknown log format tag: {0}")]
    UnknownFormat(u8),

    #[error("unknown stop reason tag: {0}")]
    UnknownStopReason(u8),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("log ended early: expected {expected} samples, got {got}")]
    ExhaustedInput { expected: u32, got: u32 },

    #[error("sample {index} has {got} channel values, expected {expected}")]
    MalformedSample {
        index: usize,
        expected: usize,
        got: usize,
    },

    #[error("cannot format non-finite value: {0}")]
    NonFinite(f64),
}

pub type Result<T> = std::result::Result<T, DlogError>;

/// Recording layout variant of a log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DlogFormat {
    Legacy,
    Standard,
    Extended,
}

impl DlogFormat {
    /// Display name of the variant, as it appears in header summaries.
    pub fn name(self) -> &'static str {
        match self {
            DlogFormat::Legacy => "legacy",
            DlogFormat::Standard => "standard",
            DlogFormat::Extended => "extended",
        }
    }

    fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(DlogFormat::Legacy),
            1 => Ok(DlogFormat::Standard),
            2 => Ok(DlogFormat::Extended),
            other => Err(DlogError::UnknownFormat(other)),
        }
    }
}

/// Why the instrument stopped recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Manual,
    BufferFull,
    Trigger,
    Fault,
}

impl StopReason {
    pub fn name(self) -> &'static str {
        match self {
            StopReason::Manual => "manual",
            StopReason::BufferFull => "buffer_full",
            StopReason::Trigger => "trigger",
            StopReason::Fault => "fault",
        }
    }

    fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(StopReason::Manual),
            1 => Ok(StopReason::BufferFull),
            2 => Ok(StopReason::Trigger),
            3 => Ok(StopReason::Fault),
            other => Err(DlogError::UnknownStopReason(other)),
        }
    }
}

/// Decoded log header. Field declaration order is the schema order used
/// when the header is flattened into a key=value row.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub dlog_format: DlogFormat,
    pub stop_reason: StopReason,
    pub num_samples: u32,
    pub voltage_scale: f64,
    pub sample_rate: f64,
    pub delay: f64,
    pub num_channels: usize,
    pub channel_map: Vec<u8>,
}

impl Header {
    /// Identifiers of the channels actually recorded, in order.
    ///
    /// A channel map shorter than `num_channels` yields a truncated slice
    /// rather than an error; trailing map entries beyond `num_channels`
    /// are ignored.
    pub fn active_channels(&self) -> &[u8] {
        &self.channel_map[..self.num_channels.min(self.channel_map.len())]
    }

    /// All header fields as (name, rendered value) pairs, in declaration
    /// order. This is the fixed schema behind the key=value header row.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("dlog_format", self.dlog_format.name().to_string()),
            ("stop_reason", self.stop_reason.name().to_string()),
            ("num_samples", self.num_samples.to_string()),
            ("voltage_scale", self.voltage_scale.to_string()),
            ("sample_rate", self.sample_rate.to_string()),
            ("delay", self.delay.to_string()),
            ("num_channels", self.num_channels.to_string()),
            ("channel_map", format!("{:?}", self.channel_map)),
        ]
    }
}

/// One instant's reading across all active channels.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub channel: Vec<f64>,
}

const MAGIC: &[u8; 4] = b"DLOG";

// Fixed-size portion of the header, up to and including the map length.
const FIXED_HEADER_LEN: usize = 37;

/// A parsed log file: header plus a lazy stream of samples.
pub struct Dlog<R: Read> {
    pub header: Header,
    samples: SampleReader<R>,
}

impl Dlog<BufReader<File>> {
    /// Open and decode a log file. Sample data is streamed on demand, not
    /// read up front.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Dlog::from_reader(BufReader::new(file))
    }
}

impl<R: Read> Dlog<R> {
    /// Decode a log header from the given reader and set up the sample
    /// stream over the remaining bytes.
    pub fn from_reader(mut reader: R) -> Result<Self> {
        let mut fixed = [0u8; FIXED_HEADER_LEN];
        reader.read_exact(&mut fixed)?;

        if &fixed[0..4] != MAGIC {
            let mut magic = [0u8; 4];
            magic.copy_from_slice(&fixed[0..4]);
            return Err(DlogError::BadMagic(magic));
        }

        let dlog_format = DlogFormat::from_tag(fixed[4])?;
        let stop_reason = StopReason::from_tag(fixed[5])?;
        let num_channels = read_u16(&fixed[6..8])? as usize;
        let num_samples = read_u32(&fixed[8..12])?;
        let voltage_scale = read_f64(&fixed[12..20])?;
        let sample_rate = read_f64(&fixed[20..28])?;
        let delay = read_f64(&fixed[28..36])?;

        let map_len = fixed[36] as usize;
        let mut channel_map = vec![0u8; map_len];
        reader.read_exact(&mut channel_map)?;

        let header = Header {
            dlog_format,
            stop_reason,
            num_samples,
            voltage_scale,
            sample_rate,
            delay,
            num_channels,
            channel_map,
        };

        let samples = SampleReader {
            reader,
            num_channels,
            num_samples,
            read: 0,
        };

        Ok(Dlog { header, samples })
    }

    /// Consume the log, yielding its sample stream.
    pub fn into_samples(self) -> SampleReader<R> {
        self.samples
    }
}

/// Lazy, non-restartable stream of samples read off the log body.
///
/// Yields exactly `num_samples` items unless the underlying reader runs
/// out first, in which case one `ExhaustedInput` error is produced and
/// the stream ends.
pub struct SampleReader<R: Read> {
    reader: R,
    num_channels: usize,
    num_samples: u32,
    read: u32,
}

impl<R: Read> Iterator for SampleReader<R> {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.read == self.num_samples {
            return None;
        }

        let mut buf = vec![0u8; 4 * self.num_channels];
        if let Err(e) = self.reader.read_exact(&mut buf) {
            let err = if e.kind() == io::ErrorKind::UnexpectedEof {
                DlogError::ExhaustedInput {
                    expected: self.num_samples,
                    got: self.read,
                }
            } else {
                DlogError::Io(e)
            };
            // Fuse the stream after the first failure.
            self.read = self.num_samples;
            return Some(Err(err));
        }

        self.read += 1;
        let channel = buf
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64)
            .collect();
        Some(Ok(Sample { channel }))
    }
}

fn read_u16(bytes: &[u8]) -> Result<u16> {
    bytes
        .try_into()
        .map(u16::from_le_bytes)
        .map_err(|_| DlogError::ParseError("Failed to parse u16".to_string()))
}

fn read_u32(bytes: &[u8]) -> Result<u32> {
    bytes
        .try_into()
        .map(u32::from_le_bytes)
        .map_err(|_| DlogError::ParseError("Failed to parse u32".to_string()))
}

fn read_f64(bytes: &[u8]) -> Result<f64> {
    bytes
        .try_into()
        .map(f64::from_le_bytes)
        .map_err(|_| DlogError::ParseError("Failed to parse f64".to_string()))
}
