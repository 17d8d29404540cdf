// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Write recorded samples as comma-separated rows.
//!
//! Anything that implements [`Columns`] can be written. The header row is
//! emitted once, before the first sample.

use std::io::Write;

use crate::Writer;

/// A record with a fixed set of named numeric columns.
pub trait Columns {
    /// Names of the columns, in the order returned by [`Columns::values`].
    fn names() -> Vec<&'static str>;

    /// Values of this record.
    fn values(&self) -> Vec<f64>;
}

/// Emits samples as rows to a [`Writer`].
pub struct TraceWriter {
    writer: Writer,
    header_written: bool,
}

impl TraceWriter {
    /// Create a [`TraceWriter`] that writes to `writer`.
    #[must_use]
    pub fn new(writer: Writer) -> Self {
        Self {
            writer,
            header_written: false,
        }
    }

    /// Write all `samples`, each prefixed with the `extra` columns.
    ///
    /// The `extra` columns allow multiple runs to share one output, for
    /// example by tagging each row with the gain of the run it came from.
    pub fn write_samples<T: Columns>(
        &mut self,
        extra: &[(&str, f64)],
        samples: &[T],
    ) -> std::io::Result<()> {
        if !self.header_written {
            let names: Vec<&str> = extra
                .iter()
                .map(|(name, _)| *name)
                .chain(T::names())
                .collect();
            writeln!(self.writer, "{}", names.join(","))?;
            self.header_written = true;
        }

        for sample in samples {
            let row: Vec<String> = extra
                .iter()
                .map(|(_, value)| *value)
                .chain(sample.values())
                .map(|v| v.to_string())
                .collect();
            writeln!(self.writer, "{}", row.join(","))?;
        }
        Ok(())
    }

    /// Flush any buffered rows to the underlying writer.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
