use application::sink::SinkError;
use indexmap::IndexMap;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// 以首列为键的两列 csv 表
///
/// An upsert parses the whole table, replaces or appends the keyed row, and
/// writes the table back in its original row order.
#[derive(Debug, Clone)]
pub struct TabularFile {
    path: PathBuf,
    header: [String; 2],
}

impl TabularFile {
    pub fn new(path: impl Into<PathBuf>, header: [&str; 2]) -> Self {
        Self {
            path: path.into(),
            header: header.map(|h| h.to_string()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn upsert_row(&self, key: &str, value: &str) -> Result<(), SinkError> {
        let existing = self.read_rows()?;
        let mut rows = existing.clone().unwrap_or_default();

        if existing.is_some() && rows.get(key).map(String::as_str) == Some(value) {
            // 内容未变，文件保持原样
            return Ok(());
        }

        match rows.get_mut(key) {
            Some(current) => *current = value.to_string(),
            None => {
                rows.insert(key.to_string(), value.to_string());
            }
        }
        self.write_rows(&rows)
    }

    /// Rows keyed by the leading column; `None` when the file does not exist yet.
    pub fn read_rows(&self) -> Result<Option<IndexMap<String, String>>, SinkError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SinkError::Io(e.to_string())),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);
        let mut rows = IndexMap::new();
        for record in reader.records() {
            let record = record.map_err(|e| SinkError::Encode(e.to_string()))?;
            let key = record.get(0).unwrap_or_default().to_string();
            let value = record.get(1).unwrap_or_default().to_string();
            rows.insert(key, value);
        }
        Ok(Some(rows))
    }

    fn write_rows(&self, rows: &IndexMap<String, String>) -> Result<(), SinkError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(dir).map_err(|e| SinkError::Io(e.to_string()))?;

        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(tmp);
        writer
            .write_record(&self.header)
            .map_err(|e| SinkError::Encode(e.to_string()))?;
        for (key, value) in rows {
            writer
                .write_record([key, value])
                .map_err(|e| SinkError::Encode(e.to_string()))?;
        }

        let tmp = writer
            .into_inner()
            .map_err(|e| SinkError::Io(e.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|e| SinkError::Io(e.to_string()))?;
        Ok(())
    }
}
