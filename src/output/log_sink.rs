// log_sink.rs - Destinations for the tag-delimited filtering decision trail

use quick_xml::escape::{escape, partial_escape};
use std::borrow::Cow;
use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::rc::Rc;

/// Section-structured writer consumed by filters and haplotype reports
pub trait LogSink {
    /// Open a named section with attributes
    fn open_section(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()>;

    /// Write inline text into the current section
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Close the named section
    fn close_section(&mut self, name: &str) -> io::Result<()>;

    /// Write pre-formatted markup without escaping
    fn write_markup(&mut self, markup: &str) -> io::Result<()> {
        self.write(markup)
    }

    /// Write text followed by a line break
    fn writeln(&mut self, text: &str) -> io::Result<()> {
        self.write(text)?;
        self.write("\n")
    }

    /// Self-contained record with attributes only
    fn empty_section(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        self.open_section(name, attrs)?;
        self.close_section(name)
    }

    /// Close anything still open and flush
    fn finish(&mut self) -> io::Result<()>;
}

/// Escape a value for use inside a double-quoted attribute
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    escape(value)
}

/// Escape character data
pub fn escape_text(text: &str) -> Cow<'_, str> {
    partial_escape(text)
}

fn format_attrs(attrs: &[(&str, &str)]) -> String {
    attrs
        .iter()
        .map(|(key, value)| format!(" {}=\"{}\"", key, escape_attr(value)))
        .collect()
}

/// XML writer keeping a stack of open sections so output stays well formed
pub struct XmlLogSink<W: Write> {
    writer: W,
    open: Vec<String>,
}

impl XmlLogSink<BufWriter<File>> {
    /// Create a sink writing to a new file
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> XmlLogSink<W> {
    pub fn new(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        Ok(Self {
            writer,
            open: Vec::new(),
        })
    }

    /// Sections currently open, outermost first
    pub fn open_sections(&self) -> &[String] {
        &self.open
    }

    /// Finish the document and hand back the writer
    pub fn into_inner(mut self) -> io::Result<W> {
        self.finish()?;
        Ok(self.writer)
    }
}

impl<W: Write> LogSink for XmlLogSink<W> {
    fn open_section(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        write!(self.writer, "<{}{}>", name, format_attrs(attrs))?;
        self.open.push(name.to_string());
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(escape_text(text).as_bytes())
    }

    fn write_markup(&mut self, markup: &str) -> io::Result<()> {
        self.writer.write_all(markup.as_bytes())
    }

    fn close_section(&mut self, name: &str) -> io::Result<()> {
        match self.open.last() {
            Some(current) if current == name => {
                self.open.pop();
                write!(self.writer, "</{}>", name)
            }
            Some(current) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot close <{}> while <{}> is open", name, current),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot close <{}>: no open section", name),
            )),
        }
    }

    fn empty_section(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        write!(self.writer, "<{}{}/>", name, format_attrs(attrs))
    }

    fn finish(&mut self) -> io::Result<()> {
        while let Some(name) = self.open.pop() {
            write!(self.writer, "</{}>", name)?;
        }
        self.writer.flush()
    }
}

/// Event captured by [`MemoryLogSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    Open { name: String, attrs: Vec<(String, String)> },
    Text(String),
    Close(String),
    Finished,
}

/// In-memory sink; clones share the same event list
#[derive(Debug, Clone, Default)]
pub struct MemoryLogSink {
    events: Rc<RefCell<Vec<LogEvent>>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events.borrow().clone()
    }

    /// All text written, concatenated
    pub fn text(&self) -> String {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                LogEvent::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl LogSink for MemoryLogSink {
    fn open_section(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        self.events.borrow_mut().push(LogEvent::Open {
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.events.borrow_mut().push(LogEvent::Text(text.to_string()));
        Ok(())
    }

    fn close_section(&mut self, name: &str) -> io::Result<()> {
        self.events.borrow_mut().push(LogEvent::Close(name.to_string()));
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.events.borrow_mut().push(LogEvent::Finished);
        Ok(())
    }
}
