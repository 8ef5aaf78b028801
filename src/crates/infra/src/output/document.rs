use application::sink::SinkError;
use domain::report::AlbumList;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// 整体覆盖写出，不做合并
///
/// The file holds a bare JSON array of titles; the country is only in the
/// file name.
pub fn write_document(path: &Path, value: &AlbumList) -> Result<(), SinkError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| SinkError::Io(e.to_string()))?;
    serde_json::to_writer(&mut tmp, &value.titles).map_err(|e| SinkError::Encode(e.to_string()))?;
    tmp.flush().map_err(|e| SinkError::Io(e.to_string()))?;
    tmp.persist(path)
        .map_err(|e| SinkError::Io(e.to_string()))?;
    Ok(())
}

pub fn read_document(path: &Path) -> Result<Vec<String>, SinkError> {
    let file = File::open(path).map_err(|e| SinkError::Io(e.to_string()))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| SinkError::Encode(e.to_string()))
}
