use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage of an application. Backward transitions are allowed;
/// the five values are the only constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Wishlist,
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl Status {
    /// Pipeline order, wishlist first.
    pub const ALL: [Status; 5] = [
        Status::Wishlist,
        Status::Applied,
        Status::Interview,
        Status::Offer,
        Status::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Wishlist => "wishlist",
            Status::Applied => "applied",
            Status::Interview => "interview",
            Status::Offer => "offer",
            Status::Rejected => "rejected",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Status::Wishlist => "Wishlist",
            Status::Applied => "Applied",
            Status::Interview => "Interview",
            Status::Offer => "Offer",
            Status::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One job application entry. Persisted as camelCase JSON; unknown fields
/// in old payloads are ignored, missing optionals default to absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: String,
    pub company: String,
    pub position: String,
    pub status: Status,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_date: Option<String>, // YYYY-MM-DD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_follow_up: Option<String>, // YYYY-MM-DD
    pub created_at: String, // RFC 3339
    pub updated_at: String, // RFC 3339
}

/// Create input: everything the user supplies; id and timestamps are
/// assigned by the service.
#[derive(Debug, Clone, Default)]
pub struct ApplicationDraft {
    pub company: String,
    pub position: String,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub applied_date: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub job_type: Option<JobType>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub url: Option<String>,
    pub contact_email: Option<String>,
    pub contact_name: Option<String>,
    pub next_follow_up: Option<String>,
}

/// Partial update. Fields left as None are untouched; id and created_at
/// can never be changed through a patch.
#[derive(Debug, Clone, Default)]
pub struct ApplicationPatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub applied_date: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub job_type: Option<JobType>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub url: Option<String>,
    pub contact_email: Option<String>,
    pub contact_name: Option<String>,
    pub next_follow_up: Option<String>,
}

impl ApplicationPatch {
    pub fn is_empty(&self) -> bool {
        self.company.is_none()
            && self.position.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.applied_date.is_none()
            && self.location.is_none()
            && self.salary.is_none()
            && self.job_type.is_none()
            && self.description.is_none()
            && self.notes.is_none()
            && self.url.is_none()
            && self.contact_email.is_none()
            && self.contact_name.is_none()
            && self.next_follow_up.is_none()
    }
}

/// Inclusive bounds over applied_date, either side optional.
#[derive(Debug, Clone, Default)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Filter criteria; every field optional, active ones combine with AND.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub status: Vec<Status>,
    pub priority: Vec<Priority>,
    pub job_type: Vec<JobType>,
    pub search: Option<String>,
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortField {
    Company,
    Position,
    Status,
    Priority,
    AppliedDate,
    Location,
    Salary,
    JobType,
    CreatedAt,
    UpdatedAt,
    NextFollowUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One calendar day within the trailing 30-day window and how many
/// applications were created on it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsSummary {
    pub total: usize,
    pub by_status: Vec<(Status, usize)>,
    pub by_priority: Vec<(Priority, usize)>,
    pub response_rate: f64,
    pub success_rate: f64,
    pub average_time_to_response: f64,
    pub trend: Vec<TrendPoint>,
}

impl AnalyticsSummary {
    pub fn status_count(&self, status: Status) -> usize {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn priority_count(&self, priority: Priority) -> usize {
        self.by_priority
            .iter()
            .find(|(p, _)| *p == priority)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}
