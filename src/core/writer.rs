use std::io::Write;
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{ExportError, Result};
use super::expander::OutputRecord;

/// The persisted artifact: one object with a single array field
#[derive(Debug, Clone)]
pub struct OutputDocument {
    field_name: String,
    records: Vec<OutputRecord>,
}

impl OutputDocument {
    pub fn new(field_name: impl Into<String>, records: Vec<OutputRecord>) -> Self {
        Self {
            field_name: field_name.into(),
            records,
        }
    }

    pub fn records(&self) -> &[OutputRecord] {
        &self.records
    }

    /// Compact JSON encoding
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl Serialize for OutputDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field_name, &self.records)?;
        map.end()
    }
}

/// Writes the document so the destination is either fully old or fully new
pub struct JsonWriter;

impl JsonWriter {
    pub fn new() -> Self {
        Self
    }

    /// Encode, write to a sibling temporary file, then rename over `path`
    pub fn write(&self, document: &OutputDocument, path: &Path) -> Result<()> {
        let bytes = document.to_json()?;

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| ExportError::write(path, e))?;
        temp.write_all(&bytes).map_err(|e| ExportError::write(path, e))?;
        temp.as_file().sync_all().map_err(|e| ExportError::write(path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o644))
                .map_err(|e| ExportError::write(path, e))?;
        }

        temp.persist(path).map_err(|e| ExportError::write(path, e.error))?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());

        Ok(())
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}
