use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::persist::StorageError;

/// Buffered CSV writer for one period's output file. The header row is
/// written once at creation; records are streamed in afterwards.
#[derive(Debug)]
pub struct CsvSink {
    writer: BufWriter<File>,
}

impl CsvSink {
    pub fn create(path: &Path, header: &[&str]) -> Result<Self, StorageError> {
        let file = File::create(path)?;
        let mut sink = Self {
            writer: BufWriter::new(file),
        };
        sink.write_row(header)?;
        Ok(sink)
    }

    pub fn write_row<S: AsRef<str>>(&mut self, fields: &[S]) -> Result<(), StorageError> {
        let mut line = String::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                line.push(',');
            }
            push_field(&mut line, field.as_ref());
        }
        line.push('\n');
        self.writer.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Flush and close the sink. Called before moving on to the next period
    /// so files are complete on disk in period order.
    pub fn finish(mut self) -> Result<(), StorageError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Quote only where needed: fields containing the separator, quotes or line
/// breaks, with embedded quotes doubled.
fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        for ch in field.chars() {
            if ch == '"' {
                out.push('"');
            }
            out.push(ch);
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}
