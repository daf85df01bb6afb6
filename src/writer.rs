//! The document writer turns planned events into TOML text.

use crate::planner::{Event, EventSink};
use crate::Result;
use std::io;

/// Writes events to an [`io::Write`] sink as they arrive.
///
/// Every line ends with `\n`. Headers are separated from what precedes them
/// by one blank line, except at the very start of the document.
///
/// ```rust
/// use serde_tomlw::planner::{Event, EventSink};
/// use serde_tomlw::DocumentWriter;
///
/// let mut writer = DocumentWriter::new(Vec::new());
/// writer.event(Event::key_value("title", "\"x\"")).unwrap();
/// writer.event(Event::Table { header: "owner".to_string() }).unwrap();
/// writer.event(Event::key_value("name", "\"y\"")).unwrap();
///
/// let text = String::from_utf8(writer.into_inner()).unwrap();
/// assert_eq!(text, "title = \"x\"\n\n[owner]\nname = \"y\"\n");
/// ```
#[derive(Debug)]
pub struct DocumentWriter<W> {
    inner: W,
    started: bool,
}

impl<W: io::Write> DocumentWriter<W> {
    pub fn new(inner: W) -> Self {
        DocumentWriter {
            inner,
            started: false,
        }
    }

    /// Flushes the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn separate(&mut self) -> io::Result<()> {
        if self.started {
            self.inner.write_all(b"\n")?;
        }
        Ok(())
    }
}

impl<W: io::Write> EventSink for DocumentWriter<W> {
    fn event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::KeyValue { key, value } => writeln!(self.inner, "{} = {}", key, value)?,
            Event::Table { header } => {
                self.separate()?;
                writeln!(self.inner, "[{}]", header)?;
            }
            Event::ArrayOfTables { header } => {
                self.separate()?;
                writeln!(self.inner, "[[{}]]", header)?;
            }
        }
        self.started = true;
        Ok(())
    }
}
