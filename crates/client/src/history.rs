//! Ticket history kept on the submitter's machine.
//!
//! Guests have no server-side history, so the IDs of complaints they file
//! are remembered locally, newest first.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ClientResult;
use crate::models::{Complaint, ComplaintStatus};

/// A remembered ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub category: String,
    pub date: DateTime<FixedOffset>,
    /// Status when the ticket was filed; poll the API for the current one.
    pub status: ComplaintStatus,
}

impl From<&Complaint> for HistoryEntry {
    fn from(c: &Complaint) -> Self {
        Self {
            id: c.id.clone(),
            category: c.category.clone(),
            date: c.date,
            status: c.status,
        }
    }
}

impl HistoryEntry {
    /// An entry for a ticket filed just now.
    #[must_use]
    pub fn pending(id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            date: Utc::now().fixed_offset(),
            status: ComplaintStatus::Pending,
        }
    }
}

/// JSON-file backed list of [`HistoryEntry`].
#[derive(Debug, Clone)]
pub struct LocalHistory {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl LocalHistory {
    /// Open the history at `path`. A missing or corrupt file starts empty.
    pub async fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Discarding corrupt history file");
                Vec::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, entries })
    }

    /// Record a ticket and save. Re-adding an ID moves it to the front.
    pub async fn add(&mut self, entry: HistoryEntry) -> ClientResult<()> {
        self.entries.retain(|e| e.id != entry.id);
        self.entries.insert(0, entry);
        self.save().await
    }

    /// Remembered tickets, newest first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Forget every ticket and remove the file.
    pub async fn clear(&mut self) -> ClientResult<()> {
        self.entries.clear();
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// File backing this history.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_vec_pretty(&self.entries)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
