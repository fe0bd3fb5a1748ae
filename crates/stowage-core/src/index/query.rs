//! Filter, sort, and pagination specification for index searches.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::entry::DocumentIndexEntry;

/// Field an index search can be ordered by.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortField {
    /// Order by derived file name.
    FileName,
    /// Order by stored size.
    Size,
    /// Order by content type.
    ContentType,
    /// Order by upload timestamp.
    #[default]
    UploadedAt,
}

impl SortField {
    /// Parses a sort-field name, falling back to [`SortField::UploadedAt`]
    /// for unrecognized values.
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// Compares two entries by this field in ascending order.
    pub fn compare(&self, a: &DocumentIndexEntry, b: &DocumentIndexEntry) -> Ordering {
        match self {
            SortField::FileName => a.file_name.cmp(&b.file_name),
            SortField::Size => a.size.cmp(&b.size),
            SortField::ContentType => a.content_type.cmp(&b.content_type),
            SortField::UploadedAt => a.uploaded_at.cmp(&b.uploaded_at),
        }
    }
}

/// A filter/sort/page specification for index searches.
///
/// All filter fields are optional; absence means "no constraint". Filters
/// combine conjunctively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentIndexQuery {
    /// Exact bucket match.
    pub bucket: Option<String>,
    /// Prefix match on the object key.
    pub key_prefix: Option<String>,
    /// Case-sensitive substring match on the derived file name.
    pub file_name: Option<String>,
    /// Exact content-type match.
    pub content_type: Option<String>,
    /// Exact uploader match.
    pub uploaded_by: Option<String>,
    /// Inclusive lower bound on `uploaded_at`.
    pub uploaded_from: Option<OffsetDateTime>,
    /// Inclusive upper bound on `uploaded_at`.
    pub uploaded_to: Option<OffsetDateTime>,
    /// Conjunctive tag constraints: every key must be present on the entry
    /// with an exactly matching value.
    pub tags: HashMap<String, String>,
    /// 1-based page number.
    pub page: i64,
    /// Page size, must be positive.
    pub page_size: i64,
    /// Sort field; unrecognized inputs fall back to `uploaded_at`.
    pub sort_by: SortField,
    /// Whether to sort in descending order.
    pub sort_descending: bool,
}

impl Default for DocumentIndexQuery {
    fn default() -> Self {
        Self {
            bucket: None,
            key_prefix: None,
            file_name: None,
            content_type: None,
            uploaded_by: None,
            uploaded_from: None,
            uploaded_to: None,
            tags: HashMap::new(),
            page: 1,
            page_size: 50,
            sort_by: SortField::UploadedAt,
            sort_descending: true,
        }
    }
}

impl DocumentIndexQuery {
    /// Number of entries to skip for the requested page.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.page_size.max(1)
    }

    /// Number of entries to take for the requested page.
    pub fn limit(&self) -> i64 {
        self.page_size.max(1)
    }

    /// Evaluates the conjunctive filter predicate against one entry.
    ///
    /// This is the canonical definition of the query semantics; every store
    /// implementation must agree with it.
    pub fn matches(&self, entry: &DocumentIndexEntry) -> bool {
        if let Some(bucket) = &self.bucket {
            if entry.bucket != *bucket {
                return false;
            }
        }

        if let Some(prefix) = &self.key_prefix {
            if !entry.key.starts_with(prefix.as_str()) {
                return false;
            }
        }

        if let Some(file_name) = &self.file_name {
            if !entry.file_name.contains(file_name.as_str()) {
                return false;
            }
        }

        if let Some(content_type) = &self.content_type {
            if entry.content_type != *content_type {
                return false;
            }
        }

        if let Some(uploaded_by) = &self.uploaded_by {
            if entry.uploaded_by.as_deref() != Some(uploaded_by.as_str()) {
                return false;
            }
        }

        if let Some(from) = self.uploaded_from {
            if entry.uploaded_at < from {
                return false;
            }
        }

        if let Some(to) = self.uploaded_to {
            if entry.uploaded_at > to {
                return false;
            }
        }

        // Missing keys or mismatched values exclude the entry
        self.tags
            .iter()
            .all(|(k, v)| entry.tags.get(k) == Some(v))
    }

    /// Compares two entries according to the requested sort field and
    /// direction.
    ///
    /// Ties are left `Equal` so stable sorts preserve insertion order.
    pub fn compare(&self, a: &DocumentIndexEntry, b: &DocumentIndexEntry) -> Ordering {
        let ordering = self.sort_by.compare(a, b);
        if self.sort_descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}
