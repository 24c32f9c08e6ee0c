use std::fs;
use std::path::Path;

use tend_core::{export_json, import_json};

use crate::error::{Result, StoreError};
use crate::store::Store;

impl Store {
    /// Import a JSON wire record, replacing the stored snapshot.
    /// Missing fields take their documented defaults.
    pub fn import_json_file(&self, path: &Path) -> Result<()> {
        let json = fs::read_to_string(path)?;
        self.import_json_str(&json)
    }

    pub fn import_json_str(&self, json: &str) -> Result<()> {
        let (progress, goals) = import_json(json)
            .map_err(|e| StoreError::InvalidData(format!("invalid JSON: {e}")))?;
        self.save_state(&progress, &goals)
    }

    /// Export the stored snapshot as a JSON wire record.
    pub fn export_json_file(&self, path: &Path) -> Result<()> {
        let json = self.export_json_string()?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn export_json_string(&self) -> Result<String> {
        let (progress, goals) = self.load_state()?;
        export_json(&progress, &goals)
            .map_err(|e| StoreError::InvalidData(format!("JSON export failed: {e}")))
    }
}
