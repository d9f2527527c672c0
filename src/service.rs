use rand::distributions::Alphanumeric;
use rand::Rng;
use thiserror::Error;

use crate::models::{ApplicationDraft, ApplicationPatch, ApplicationRecord, Priority, Status};
use crate::store::{now_iso, RecordStore};

/// Failures surfaced across the service boundary as values, so a caller
/// can render a field-level message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{field} is required")]
    Validation { field: &'static str },
}

/// Orchestrates the record store with id and timestamp policy. The store
/// is injected rather than ambient, so tests run against an in-memory
/// backend through the same interface.
pub struct ApplicationService {
    store: RecordStore,
}

impl ApplicationService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Validate the draft, assign id and timestamps, and persist. Company
    /// and position must be non-empty after trimming.
    pub fn create(&self, draft: ApplicationDraft) -> Result<ApplicationRecord, ServiceError> {
        let company = draft.company.trim();
        if company.is_empty() {
            return Err(ServiceError::Validation { field: "company" });
        }
        let position = draft.position.trim();
        if position.is_empty() {
            return Err(ServiceError::Validation { field: "position" });
        }

        let now = now_iso();
        let record = ApplicationRecord {
            id: new_id(),
            company: company.to_string(),
            position: position.to_string(),
            status: draft.status.unwrap_or(Status::Wishlist),
            priority: draft.priority.unwrap_or(Priority::Medium),
            applied_date: draft.applied_date,
            location: draft.location,
            salary: draft.salary,
            job_type: draft.job_type,
            description: draft.description,
            notes: draft.notes,
            url: draft.url,
            contact_email: draft.contact_email,
            contact_name: draft.contact_name,
            next_follow_up: draft.next_follow_up,
            created_at: now.clone(),
            updated_at: now,
        };
        self.store.append(record.clone());
        Ok(record)
    }

    /// Merge a partial update and re-stamp updated_at. An unknown id is a
    /// silent no-op and returns None; created_at is never altered.
    pub fn update(&self, id: &str, patch: &ApplicationPatch) -> Option<ApplicationRecord> {
        if !self.store.patch(id, patch) {
            return None;
        }
        self.store.find_by_id(id)
    }

    /// Remove by id; absent ids are a no-op.
    pub fn delete(&self, id: &str) -> bool {
        self.store.remove_by_id(id)
    }

    pub fn get(&self, id: &str) -> Option<ApplicationRecord> {
        self.store.find_by_id(id)
    }

    /// The full collection in insertion order.
    pub fn list(&self) -> Vec<ApplicationRecord> {
        self.store.load()
    }
}

/// Timestamp plus random suffix; unique for practical input rates within
/// a process lifetime.
fn new_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    format!("app-{}-{}", chrono::Utc::now().timestamp_millis(), suffix)
}
