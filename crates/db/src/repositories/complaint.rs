//! Complaint repository.

#![allow(missing_docs)]

use std::sync::Arc;

use crate::entities::{
    Complaint,
    complaint::{self, Category, ComplaintStatus},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, sea_query::LikeExpr,
};
use serde::Serialize;
use yellowshield_common::{AppError, AppResult};

/// Dashboard filter for complaint listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    pub status: Option<ComplaintStatus>,
    pub category: Option<Category>,
    /// Free text matched against id, name, department and description.
    pub search: Option<String>,
}

/// Complaints filed under one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Row of the status-by-category aggregate.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct StatusCategoryCount {
    pub status: String,
    pub category: String,
    pub count: i64,
}

/// Complaint repository for database operations.
#[derive(Clone)]
pub struct ComplaintRepository {
    db: Arc<DatabaseConnection>,
}

impl ComplaintRepository {
    /// Create a new complaint repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a new complaint.
    pub async fn create(&self, model: complaint::ActiveModel) -> AppResult<complaint::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a complaint by its exact ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<complaint::Model>> {
        Complaint::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a complaint by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<complaint::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ComplaintNotFound(id.to_string()))
    }

    /// Find complaints whose ID ends with `suffix`.
    ///
    /// `suffix` is used in a LIKE pattern as-is, so callers must only pass
    /// ID-alphabet characters.
    pub async fn find_by_id_suffix(
        &self,
        suffix: &str,
        limit: u64,
    ) -> AppResult<Vec<complaint::Model>> {
        Complaint::find()
            .filter(complaint::Column::Id.ends_with(suffix))
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List complaints matching a filter, newest first.
    pub async fn find_all(&self, filter: &ComplaintFilter) -> AppResult<Vec<complaint::Model>> {
        let mut query = Complaint::find()
            .order_by_desc(complaint::Column::Date)
            .order_by_desc(complaint::Column::Id);

        if let Some(status) = filter.status {
            query = query.filter(complaint::Column::Status.eq(status));
        }

        if let Some(category) = filter.category {
            query = query.filter(complaint::Column::Category.eq(category));
        }

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", escape_like(search));
            let like = || LikeExpr::new(pattern.clone()).escape('\\');
            query = query.filter(
                Condition::any()
                    .add(complaint::Column::Id.like(like()))
                    .add(complaint::Column::Name.like(like()))
                    .add(complaint::Column::Department.like(like()))
                    .add(complaint::Column::Description.like(like())),
            );
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a user's complaints, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<complaint::Model>> {
        Complaint::find()
            .filter(complaint::Column::UserId.eq(user_id))
            .order_by_desc(complaint::Column::Date)
            .order_by_desc(complaint::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a complaint.
    pub async fn update(&self, model: complaint::ActiveModel) -> AppResult<complaint::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a complaint by ID. Returns the number of rows removed.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = Complaint::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Delete every complaint filed by a user. Returns the number removed.
    pub async fn delete_by_user(&self, user_id: &str) -> AppResult<u64> {
        let result = Complaint::delete_many()
            .filter(complaint::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Count all complaints.
    pub async fn count(&self) -> AppResult<u64> {
        Complaint::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count complaints per `(status, category)` pair.
    ///
    /// A single grouped query, so totals derived from the rows always agree
    /// with each other.
    pub async fn count_by_status_and_category(&self) -> AppResult<Vec<StatusCategoryCount>> {
        Complaint::find()
            .select_only()
            .column(complaint::Column::Status)
            .column(complaint::Column::Category)
            .column_as(complaint::Column::Id.count(), "count")
            .group_by(complaint::Column::Status)
            .group_by(complaint::Column::Category)
            .order_by_asc(complaint::Column::Category)
            .order_by_asc(complaint::Column::Status)
            .into_model::<StatusCategoryCount>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Escape LIKE wildcards so user text matches literally.
fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
