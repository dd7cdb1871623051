use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::history::model::ActivityEdge;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityExport {
    pub data: ExportData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    pub api: ExportApi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportApi {
    pub activities: ExportActivities,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportActivities {
    pub edges: Vec<ActivityEdge>,
}

impl ActivityExport {
    pub fn new(edges: Vec<ActivityEdge>) -> Self {
        Self {
            data: ExportData {
                api: ExportApi {
                    activities: ExportActivities { edges },
                },
            },
        }
    }

    pub fn edges(&self) -> &[ActivityEdge] {
        &self.data.api.activities.edges
    }
}

/// Write the export as pretty JSON, replacing any existing file at `path`.
pub fn write_export(path: &Path, export: &ActivityExport) -> Result<PathBuf> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let data = serde_json::to_string_pretty(export)?;
    fs::write(path, format!("{data}\n"))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path.to_path_buf())
}
