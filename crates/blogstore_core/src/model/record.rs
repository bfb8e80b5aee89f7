//! Record domain model.
//!
//! # Responsibility
//! - Define the canonical blog-post record owned by the store.
//! - Enforce the non-empty title/body rule at the input boundary.
//!
//! # Invariants
//! - `id` is stable and never reused for another record.
//! - Every record held by a store has non-empty trimmed `title` and `body`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned to a record at creation time.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type RecordId = Uuid;

/// Fixed category set for record filtering.
///
/// Matches the filter dropdown of the original widget; records may also
/// carry no category at all (`Option<Category>` on [`Record`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Technology,
    Health,
    Travel,
    Food,
}

/// A single blog-post record.
///
/// Construction goes through [`RecordStore::add`], which assigns the id and
/// validates the draft; deserialization from a persisted mirror is re-checked
/// at restore time.
///
/// [`RecordStore::add`]: crate::store::RecordStore::add
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Stable unique ID, immutable for the record lifetime.
    pub id: RecordId,
    /// Non-empty trimmed title text.
    pub title: String,
    /// Non-empty trimmed body text.
    pub body: String,
    /// Optional category label used by list filtering.
    pub category: Option<Category>,
}

impl Record {
    /// Checks the stored-record invariant: trimmed title and body are
    /// non-empty.
    ///
    /// Used on restore to reject a tampered or hand-edited mirror instead of
    /// admitting records the mutation boundary would never have accepted.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.title.trim().is_empty() {
            return Err(RecordValidationError::EmptyTitle);
        }
        if self.body.trim().is_empty() {
            return Err(RecordValidationError::EmptyBody);
        }
        Ok(())
    }
}

/// Input shape for `add`/`update` operations.
///
/// A draft carries no id; identity is assigned by the store on `add` and
/// supplied separately on `update`. `category: None` on an update means
/// "keep the existing category", not "clear it".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub title: String,
    pub body: String,
    pub category: Option<Category>,
}

impl RecordDraft {
    /// Creates a draft without a category.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            category: None,
        }
    }

    /// Sets the category on a draft.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Validates the draft and returns the trimmed `(title, body)` pair that
    /// will actually be stored.
    pub(crate) fn validated(&self) -> Result<(String, String), RecordValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(RecordValidationError::EmptyTitle);
        }
        let body = self.body.trim();
        if body.is_empty() {
            return Err(RecordValidationError::EmptyBody);
        }
        Ok((title.to_string(), body.to_string()))
    }
}

/// Validation failure for record text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Title is empty after trimming whitespace.
    EmptyTitle,
    /// Body is empty after trimming whitespace.
    EmptyBody,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "record title must not be empty"),
            Self::EmptyBody => write!(f, "record body must not be empty"),
        }
    }
}

impl Error for RecordValidationError {}
