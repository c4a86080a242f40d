//! Newline-delimited JSON log of match events.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

/// Writes one JSON object per line
pub struct EventLog<W: Write> {
    out: W,
    buf: Vec<u8>,
}

impl EventLog<BufWriter<File>> {
    /// Open `path` for appending, creating it if needed
    pub fn append_to(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> EventLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            buf: Vec::with_capacity(256),
        }
    }

    pub fn record(&mut self, event: &impl Serialize) -> io::Result<()> {
        self.buf.clear();
        serde_json::to_writer(&mut self.buf, event)?;
        self.buf.push(b'\n');
        self.out.write_all(&self.buf)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn one_object_per_line() {
        let mut log = EventLog::new(Vec::new());
        log.record(&json!({"type": "start", "seed": 7})).unwrap();
        log.record(&json!({"type": "game_over", "player": 1})).unwrap();

        let text = String::from_utf8(log.into_inner()).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["seed"], 7);
        assert_eq!(lines[1]["type"], "game_over");
    }
}
