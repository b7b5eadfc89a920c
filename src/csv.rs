// Delimited-text row sink with standard quoting

use std::io::{BufWriter, Write};

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Writes rows of fields as CSV. Fields containing the delimiter, the
/// quote character, or line breaks are quoted, with embedded quotes
/// doubled. Rows are terminated with CRLF.
pub struct CsvWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(sink: W) -> Self {
        CsvWriter {
            writer: BufWriter::new(sink),
        }
    }

    /// Write one row, quoting fields as needed.
    pub fn write_row<I, S>(&mut self, fields: I) -> std::io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut first = true;
        for field in fields {
            if !first {
                write!(self.writer, "{DELIMITER}")?;
            }
            first = false;
            self.write_field(field.as_ref())?;
        }
        write!(self.writer, "\r\n")?;
        Ok(())
    }

    fn write_field(&mut self, field: &str) -> std::io::Result<()> {
        if !needs_quoting(field) {
            return write!(self.writer, "{field}");
        }
        write!(self.writer, "{QUOTE}")?;
        for c in field.chars() {
            if c == QUOTE {
                write!(self.writer, "{QUOTE}{QUOTE}")?;
            } else {
                write!(self.writer, "{c}")?;
            }
        }
        write!(self.writer, "{QUOTE}")
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

fn needs_quoting(field: &str) -> bool {
    field
        .chars()
        .any(|c| c == DELIMITER || c == QUOTE || c == '\n' || c == '\r')
}
