//! Complaint service.

#![allow(missing_docs)]

use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;
use yellowshield_common::{AppError, AppResult, Config, IdGenerator, is_id_alphabet};
use yellowshield_db::{
    entities::complaint::{self, ANONYMOUS_NAME, Category, ComplaintRole, ComplaintStatus},
    repositories::{CategoryCount, ComplaintFilter, ComplaintRepository},
};

/// Department stored when none is given.
pub const DEFAULT_DEPARTMENT: &str = "General";

/// Description stored when none is given.
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Header row of the CSV export.
pub const CSV_HEADER: &str =
    "ID,Name,Role,Department,Category,Date,Status,Description,Admin Response";

/// Input for filing a complaint. Every field is optional; missing or blank
/// values fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintInput {
    #[validate(length(max = 256))]
    pub name: Option<String>,

    pub role: Option<String>,

    #[validate(length(max = 128))]
    pub department: Option<String>,

    pub category: Option<String>,

    #[validate(length(max = 10000))]
    pub description: Option<String>,

    #[serde(default)]
    pub is_anonymous: bool,

    #[serde(default)]
    pub has_attachment: bool,

    pub user_id: Option<String>,
}

/// Aggregate counts for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintStats {
    pub total: u64,
    pub pending: u64,
    pub closed: u64,
    pub by_category: Vec<CategoryCount>,
}

/// Complaint service for business logic.
#[derive(Clone)]
pub struct ComplaintService {
    complaint_repo: ComplaintRepository,
    id_gen: IdGenerator,
    min_suffix_len: usize,
}

impl ComplaintService {
    /// Create a new complaint service.
    #[must_use]
    pub fn new(complaint_repo: ComplaintRepository, config: &Config) -> Self {
        Self {
            complaint_repo,
            id_gen: IdGenerator::new(),
            min_suffix_len: config.lookup.min_suffix_len,
        }
    }

    /// File a new complaint.
    pub async fn create(&self, input: CreateComplaintInput) -> AppResult<complaint::Model> {
        input.validate()?;

        let category = match non_blank(input.category.as_deref()) {
            Some(label) => Category::parse(label)
                .ok_or_else(|| AppError::Validation(format!("Invalid category: {label}")))?,
            None => Category::General,
        };

        let role = match non_blank(input.role.as_deref()) {
            Some(label) => ComplaintRole::parse(label)
                .ok_or_else(|| AppError::Validation(format!("Invalid role: {label}")))?,
            None => ComplaintRole::Student,
        };

        let name = if input.is_anonymous {
            ANONYMOUS_NAME
        } else {
            non_blank(input.name.as_deref()).unwrap_or(ANONYMOUS_NAME)
        };

        let model = complaint::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name.to_string()),
            role: Set(role),
            department: Set(non_blank(input.department.as_deref())
                .unwrap_or(DEFAULT_DEPARTMENT)
                .to_string()),
            category: Set(category),
            description: Set(non_blank(input.description.as_deref())
                .unwrap_or(DEFAULT_DESCRIPTION)
                .to_string()),
            is_anonymous: Set(input.is_anonymous),
            has_attachment: Set(input.has_attachment),
            user_id: Set(non_blank(input.user_id.as_deref()).map(ToString::to_string)),
            status: Set(ComplaintStatus::Pending),
            admin_response: Set(None),
            date: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.complaint_repo.create(model).await?;
        info!(
            complaint_id = %created.id,
            category = %created.category,
            anonymous = created.is_anonymous,
            "Complaint filed"
        );

        Ok(created)
    }

    /// All complaints, newest first.
    pub async fn list(&self) -> AppResult<Vec<complaint::Model>> {
        self.complaint_repo.find_all(&ComplaintFilter::default()).await
    }

    /// Complaints matching a dashboard filter, newest first.
    pub async fn list_filtered(&self, filter: &ComplaintFilter) -> AppResult<Vec<complaint::Model>> {
        self.complaint_repo.find_all(filter).await
    }

    /// Look up a complaint by ticket ID or a unique ticket suffix.
    pub async fn get_by_id(&self, id: &str) -> AppResult<complaint::Model> {
        let needle = normalize_id(id);
        if !is_id_alphabet(&needle) {
            return Err(AppError::ComplaintNotFound(id.to_string()));
        }

        if let Some(found) = self.complaint_repo.find_by_id(&needle).await? {
            return Ok(found);
        }

        if needle.len() < self.min_suffix_len {
            return Err(AppError::ComplaintNotFound(id.to_string()));
        }

        // Two rows are enough to tell unique from ambiguous.
        let mut matches = self.complaint_repo.find_by_id_suffix(&needle, 2).await?;
        if matches.len() == 1 {
            Ok(matches.remove(0))
        } else {
            Err(AppError::ComplaintNotFound(id.to_string()))
        }
    }

    /// Record the reviewer's response and close the complaint.
    pub async fn respond(&self, id: &str, response: &str) -> AppResult<complaint::Model> {
        let response = response.trim();
        if response.is_empty() {
            return Err(AppError::Validation("Response text is required".to_string()));
        }

        let existing = self.complaint_repo.get_by_id(&normalize_id(id)).await?;
        let mut active: complaint::ActiveModel = existing.into();
        active.admin_response = Set(Some(response.to_string()));
        active.status = Set(ComplaintStatus::Closed);
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.complaint_repo.update(active).await?;
        info!(complaint_id = %updated.id, "Complaint answered and closed");

        Ok(updated)
    }

    /// Close a complaint without touching its response.
    pub async fn close(&self, id: &str) -> AppResult<complaint::Model> {
        let existing = self.complaint_repo.get_by_id(&normalize_id(id)).await?;
        if existing.is_closed() {
            return Ok(existing);
        }

        let mut active: complaint::ActiveModel = existing.into();
        active.status = Set(ComplaintStatus::Closed);
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.complaint_repo.update(active).await?;
        info!(complaint_id = %updated.id, "Complaint closed");

        Ok(updated)
    }

    /// Permanently delete a complaint.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let id = normalize_id(id);
        if self.complaint_repo.delete(&id).await? == 0 {
            return Err(AppError::ComplaintNotFound(id));
        }

        info!(complaint_id = %id, "Complaint deleted");
        Ok(())
    }

    /// A user's complaints, newest first.
    pub async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<complaint::Model>> {
        let user_id = require_user_id(user_id)?;
        self.complaint_repo.find_by_user(user_id).await
    }

    /// Delete all of a user's complaints. Returns how many were removed.
    pub async fn clear_by_user(&self, user_id: &str) -> AppResult<u64> {
        let user_id = require_user_id(user_id)?;
        let deleted = self.complaint_repo.delete_by_user(user_id).await?;
        info!(user_id = %user_id, deleted, "Complaint history cleared");

        Ok(deleted)
    }

    /// Dashboard counts, all derived from one grouped query.
    pub async fn stats(&self) -> AppResult<ComplaintStats> {
        let rows = self.complaint_repo.count_by_status_and_category().await?;

        let mut stats = ComplaintStats::default();
        let mut by_category: BTreeMap<String, i64> = BTreeMap::new();

        for row in rows {
            let Some(status) = ComplaintStatus::parse(&row.status) else {
                warn!(status = %row.status, "Skipping complaints with unknown status");
                continue;
            };
            let count = u64::try_from(row.count).unwrap_or_default();

            stats.total += count;
            match status {
                ComplaintStatus::Pending => stats.pending += count,
                ComplaintStatus::Closed => stats.closed += count,
            }
            *by_category.entry(row.category).or_default() += row.count;
        }

        stats.by_category = by_category
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();

        Ok(stats)
    }

    /// Export the (filtered) complaint list as CSV.
    pub async fn export_csv(&self, filter: &ComplaintFilter) -> AppResult<String> {
        let complaints = self.complaint_repo.find_all(filter).await?;
        Ok(complaints_to_csv(&complaints))
    }

    /// Categories a complaint may be filed under.
    #[must_use]
    pub const fn categories(&self) -> &'static [Category] {
        &Category::ALL
    }
}

/// Render complaints as CSV, one row per complaint after [`CSV_HEADER`].
#[must_use]
pub fn complaints_to_csv(complaints: &[complaint::Model]) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for c in complaints {
        let role = c.visible_role().map_or("", ComplaintRole::as_str);
        let date = c.date.to_rfc3339();
        let response = c.admin_response.as_deref().unwrap_or("");

        let fields = [
            c.id.as_str(),
            c.visible_name(),
            role,
            c.department.as_str(),
            c.category.as_str(),
            date.as_str(),
            c.status.as_str(),
            c.description.as_str(),
            response,
        ];
        let row: Vec<String> = fields.iter().map(|f| escape_csv(f)).collect();
        csv.push_str(&row.join(","));
        csv.push('\n');
    }

    csv
}

fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Ids are stored lowercase; lookups ignore case and surrounding space.
fn normalize_id(id: &str) -> String {
    id.trim().to_lowercase()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn require_user_id(user_id: &str) -> AppResult<&str> {
    non_blank(Some(user_id)).ok_or_else(|| AppError::Validation("User ID required".to_string()))
}
