//! Request and response bodies of the REST API.

#![allow(missing_docs)]

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplaintStatus {
    Pending,
    Closed,
}

/// A complaint as listed on the dashboard or in a user's history.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: String,
    pub name: String,
    /// Absent for anonymous complaints.
    pub role: Option<String>,
    pub department: String,
    pub category: String,
    pub description: String,
    pub is_anonymous: bool,
    pub has_attachment: bool,
    pub user_id: Option<String>,
    pub status: ComplaintStatus,
    pub admin_response: Option<String>,
    pub date: DateTime<FixedOffset>,
    pub updated_at: Option<DateTime<FixedOffset>>,
}

/// Public status of a ticket.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatus {
    pub id: String,
    pub status: ComplaintStatus,
    pub category: String,
    pub date: DateTime<FixedOffset>,
    /// `"No updates yet"` until a reviewer responds.
    pub admin_response: String,
}

/// A complaint to file. Unset fields take server defaults.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComplaint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_anonymous: bool,
    pub has_attachment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl NewComplaint {
    /// A complaint in `category` with a description.
    #[must_use]
    pub fn new(category: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// File without a name or role attached.
    #[must_use]
    pub const fn anonymous(mut self) -> Self {
        self.is_anonymous = true;
        self
    }
}

/// Dashboard filter.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplaintStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Per-category count.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Dashboard counts.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: u64,
    pub pending: u64,
    pub closed: u64,
    pub by_category: Vec<CategoryCount>,
}

/// Result of clearing a user's history.
#[derive(Debug, Clone, Deserialize)]
pub struct ClearedHistory {
    pub message: String,
    pub deleted: u64,
}

/// An account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub department: String,
    pub role: String,
    pub created_at: DateTime<FixedOffset>,
}

impl User {
    /// Whether the account may use the dashboard.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Account registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_complaint_omits_unset_fields() {
        let json = serde_json::to_value(NewComplaint::new("Toilets", "leak").anonymous()).unwrap();

        assert_eq!(json["category"], "Toilets");
        assert_eq!(json["isAnonymous"], true);
        assert!(json.get("name").is_none());
        assert!(json.get("userId").is_none());
    }

    #[test]
    fn test_list_filter_query_shape() {
        let filter = ListFilter {
            status: Some(ComplaintStatus::Closed),
            ..Default::default()
        };
        let json = serde_json::to_value(filter).unwrap();

        assert_eq!(json, serde_json::json!({"status": "Closed"}));
    }

    #[test]
    fn test_ticket_status_parses() {
        let status: TicketStatus = serde_json::from_str(
            r#"{"id":"01abc","_id":"01abc","status":"Pending","category":"General",
                "date":"2025-01-01T10:00:00+00:00","adminResponse":"No updates yet"}"#,
        )
        .unwrap();

        assert_eq!(status.status, ComplaintStatus::Pending);
        assert_eq!(status.admin_response, "No updates yet");
    }
}
