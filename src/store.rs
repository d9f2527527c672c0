use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use std::cell::RefCell;
use std::path::PathBuf;
use tracing::warn;

use crate::models::{ApplicationPatch, ApplicationRecord};

/// Current wall-clock time as an RFC 3339 string, millisecond precision.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

enum Backend {
    /// Durable JSON payload at a single path.
    File(PathBuf),
    /// Ephemeral stand-in for hosts without durable storage, and for tests.
    Memory(RefCell<Option<String>>),
}

/// Owns the durable representation of the full record collection: a single
/// JSON array, overwritten wholesale on every write. Storage is best-effort;
/// a missing or unparseable payload degrades to empty rather than failing
/// callers, and write errors are logged and swallowed.
pub struct RecordStore {
    backend: Backend,
}

impl RecordStore {
    /// Open the file-backed store at the default data location.
    pub fn open() -> Result<Self> {
        Self::open_at(Self::default_path()?)
    }

    /// Open a file-backed store at an explicit path.
    pub fn open_at(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self {
            backend: Backend::File(path),
        })
    }

    /// Ephemeral store with no durable backing.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(RefCell::new(None)),
        }
    }

    fn default_path() -> Result<PathBuf> {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "apptrack") {
            Ok(proj_dirs.data_dir().join("applications.json"))
        } else {
            Ok(PathBuf::from("applications.json"))
        }
    }

    /// Whether writes outlive the process.
    pub fn is_durable(&self) -> bool {
        matches!(self.backend, Backend::File(_))
    }

    pub fn path(&self) -> Option<&PathBuf> {
        match &self.backend {
            Backend::File(path) => Some(path),
            Backend::Memory(_) => None,
        }
    }

    fn read_payload(&self) -> Option<String> {
        match &self.backend {
            Backend::File(path) => match std::fs::read_to_string(path) {
                Ok(data) => Some(data),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
                Err(err) => {
                    warn!(path = %path.display(), %err, "failed to read store");
                    None
                }
            },
            Backend::Memory(slot) => slot.borrow().clone(),
        }
    }

    fn write_payload(&self, payload: &str) {
        match &self.backend {
            Backend::File(path) => {
                if let Err(err) = std::fs::write(path, payload) {
                    warn!(path = %path.display(), %err, "failed to write store");
                }
            }
            Backend::Memory(slot) => {
                *slot.borrow_mut() = Some(payload.to_string());
            }
        }
    }

    /// All records in insertion order. Missing payload and parse failures
    /// both yield an empty collection.
    pub fn load(&self) -> Vec<ApplicationRecord> {
        let Some(payload) = self.read_payload() else {
            return Vec::new();
        };
        match serde_json::from_str(&payload) {
            Ok(records) => records,
            Err(err) => {
                warn!(%err, "discarding unparseable store payload");
                Vec::new()
            }
        }
    }

    /// Overwrite the entire payload; subsequent load() reflects exactly
    /// `records`.
    pub fn save_all(&self, records: &[ApplicationRecord]) {
        match serde_json::to_string(records) {
            Ok(payload) => self.write_payload(&payload),
            Err(err) => warn!(%err, "failed to serialize records"),
        }
    }

    pub fn append(&self, record: ApplicationRecord) {
        let mut records = self.load();
        records.push(record);
        self.save_all(&records);
    }

    /// Merge a partial update into the record with this id and re-stamp
    /// updated_at. Unknown id is a no-op; returns whether anything changed.
    pub fn patch(&self, id: &str, patch: &ApplicationPatch) -> bool {
        let mut records = self.load();
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        apply_patch(record, patch);
        record.updated_at = now_iso();
        self.save_all(&records);
        true
    }

    /// Hard removal, no tombstone. Returns whether a record was removed.
    pub fn remove_by_id(&self, id: &str) -> bool {
        let mut records = self.load();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return false;
        }
        self.save_all(&records);
        true
    }

    pub fn find_by_id(&self, id: &str) -> Option<ApplicationRecord> {
        self.load().into_iter().find(|r| r.id == id)
    }

    /// Erase the persisted payload entirely.
    pub fn clear(&self) {
        match &self.backend {
            Backend::File(path) => {
                if let Err(err) = std::fs::remove_file(path) {
                    if err.kind() != std::io::ErrorKind::NotFound {
                        warn!(path = %path.display(), %err, "failed to clear store");
                    }
                }
            }
            Backend::Memory(slot) => {
                *slot.borrow_mut() = None;
            }
        }
    }
}

fn apply_patch(record: &mut ApplicationRecord, patch: &ApplicationPatch) {
    if let Some(company) = &patch.company {
        record.company = company.clone();
    }
    if let Some(position) = &patch.position {
        record.position = position.clone();
    }
    if let Some(status) = patch.status {
        record.status = status;
    }
    if let Some(priority) = patch.priority {
        record.priority = priority;
    }
    if let Some(applied_date) = &patch.applied_date {
        record.applied_date = Some(applied_date.clone());
    }
    if let Some(location) = &patch.location {
        record.location = Some(location.clone());
    }
    if let Some(salary) = &patch.salary {
        record.salary = Some(salary.clone());
    }
    if let Some(job_type) = patch.job_type {
        record.job_type = Some(job_type);
    }
    if let Some(description) = &patch.description {
        record.description = Some(description.clone());
    }
    if let Some(notes) = &patch.notes {
        record.notes = Some(notes.clone());
    }
    if let Some(url) = &patch.url {
        record.url = Some(url.clone());
    }
    if let Some(contact_email) = &patch.contact_email {
        record.contact_email = Some(contact_email.clone());
    }
    if let Some(contact_name) = &patch.contact_name {
        record.contact_name = Some(contact_name.clone());
    }
    if let Some(next_follow_up) = &patch.next_follow_up {
        record.next_follow_up = Some(next_follow_up.clone());
    }
}
