//! Complaint entity.

#![allow(missing_docs)]

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name stored for anonymous or unnamed submissions.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Complaint category.
///
/// This is the one list of categories; the API serves it to clients and the
/// service validates submissions against it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum Category {
    #[sea_orm(string_value = "Infrastructure")]
    Infrastructure,
    #[sea_orm(string_value = "College Property")]
    #[serde(rename = "College Property")]
    CollegeProperty,
    #[sea_orm(string_value = "Toilets")]
    Toilets,
    #[sea_orm(string_value = "Classrooms")]
    Classrooms,
    #[sea_orm(string_value = "Other (Non-Moving)")]
    #[serde(rename = "Other (Non-Moving)")]
    OtherNonMoving,
    #[sea_orm(string_value = "General")]
    #[default]
    General,
    #[sea_orm(string_value = "Other")]
    Other,
}

impl Category {
    /// Every category, in the order clients should offer them.
    pub const ALL: [Self; 7] = [
        Self::Infrastructure,
        Self::CollegeProperty,
        Self::Toilets,
        Self::Classrooms,
        Self::OtherNonMoving,
        Self::General,
        Self::Other,
    ];

    /// The stored and serialized label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Infrastructure => "Infrastructure",
            Self::CollegeProperty => "College Property",
            Self::Toilets => "Toilets",
            Self::Classrooms => "Classrooms",
            Self::OtherNonMoving => "Other (Non-Moving)",
            Self::General => "General",
            Self::Other => "Other",
        }
    }

    /// Parse an exact label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of the person filing a complaint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ComplaintRole {
    #[sea_orm(string_value = "Student")]
    #[default]
    Student,
    #[sea_orm(string_value = "Staff")]
    Staff,
}

impl ComplaintRole {
    /// The stored and serialized label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Staff => "Staff",
        }
    }

    /// Parse an exact label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Student" => Some(Self::Student),
            "Staff" => Some(Self::Staff),
            _ => None,
        }
    }
}

/// Complaint status. `Closed` is terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ComplaintStatus {
    #[sea_orm(string_value = "Pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "Closed")]
    Closed,
}

impl ComplaintStatus {
    /// The stored and serialized label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Closed => "Closed",
        }
    }

    /// Parse an exact label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Pending" => Some(Self::Pending),
            "Closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// Complaint model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "complaints")]
pub struct Model {
    /// Ticket ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Submitter display name, `Anonymous` for anonymous submissions.
    pub name: String,
    pub role: ComplaintRole,
    pub department: String,
    pub category: Category,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(default_value = false)]
    pub is_anonymous: bool,
    #[sea_orm(default_value = false)]
    pub has_attachment: bool,
    /// Submitting account, absent for guest submissions.
    #[sea_orm(nullable)]
    pub user_id: Option<String>,
    pub status: ComplaintStatus,
    /// Reviewer resolution text.
    #[sea_orm(column_type = "Text", nullable)]
    pub admin_response: Option<String>,
    /// Submission time.
    pub date: DateTimeWithTimeZone,
    /// Last status or response change.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether the complaint has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == ComplaintStatus::Closed
    }

    /// Role as shown to reviewers; withheld for anonymous complaints.
    #[must_use]
    pub const fn visible_role(&self) -> Option<ComplaintRole> {
        if self.is_anonymous {
            None
        } else {
            Some(self.role)
        }
    }

    /// Name as shown to reviewers.
    #[must_use]
    pub fn visible_name(&self) -> &str {
        if self.is_anonymous {
            ANONYMOUS_NAME
        } else {
            &self.name
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
