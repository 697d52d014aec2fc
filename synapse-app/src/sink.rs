use std::io::Write;

use anyhow::{Context, Result};
use synapse_core::SessionRecord;
use synapse_experiment::{SessionLog, SessionSink};

use crate::OutputFormat;

/// Writes each finished session to `out` and keeps it in a [`SessionLog`].
///
/// The first write failure is kept and reported by [`finish`](Self::finish);
/// later records are still logged in memory.
pub struct RecordWriter<W: Write> {
    out: W,
    format: OutputFormat,
    log: SessionLog,
    error: Option<anyhow::Error>,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            log: SessionLog::default(),
            error: None,
        }
    }

    fn write(&mut self, record: &SessionRecord) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, record)?;
                writeln!(self.out)?;
            }
            OutputFormat::Text => {
                write!(
                    self.out,
                    "[{}] level {} -> {} | {} | {}",
                    record.result.exercise,
                    record.result.level,
                    record.next_level,
                    record.label,
                    record.summary
                )?;
                if let Some(note) = &record.note {
                    write!(self.out, " | {note}")?;
                }
                writeln!(self.out)?;
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<SessionLog> {
        if let Some(err) = self.error.take() {
            return Err(err.context("failed to write session records"));
        }
        self.out.flush().context("failed to flush session records")?;
        Ok(self.log)
    }
}

impl<W: Write> SessionSink for RecordWriter<W> {
    fn record_session(&mut self, record: SessionRecord) {
        if self.error.is_none() {
            if let Err(err) = self.write(&record) {
                tracing::error!(error = %err, "session record not written");
                self.error = Some(err);
            }
        }
        self.log.record_session(record);
    }
}
