/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: User accounts and role promotion
/// - `packages`: Subscription packages
/// - `businesses`: Business lifecycle and bulk operations
/// - `teachers`, `students`: Profiles linked to a business

pub mod businesses;
pub mod health;
pub mod packages;
pub mod students;
pub mod teachers;
pub mod users;

use serde::{Deserialize, Deserializer, Serialize};
use tutorhub_shared::services::Page;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiResult;

/// Pagination query parameters (`?limit=&offset=`)
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

/// Profile listing filter (`?business_id=&limit=&offset=`)
#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    pub business_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ProfileQuery {
    pub fn page(&self) -> Page {
        Page::new(self.limit, self.offset)
    }
}

/// Paginated list response
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, total: i64, page: Page) -> Self {
        Self {
            items,
            total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

/// Body of the status-change endpoints
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// 0 = inactive, 1 = active
    pub status: i32,
}

/// Runs the DTO's `validator` rules
pub(crate) fn validate_request<T: Validate>(req: &T) -> ApiResult<()> {
    req.validate()?;
    Ok(())
}

/// Distinguishes an explicit `null` from an absent field
///
/// Used with `#[serde(default, deserialize_with = "deserialize_some")]` on
/// `Option<Option<T>>` fields: absent leaves the value alone, `null` clears it.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_some")]
        note: Option<Option<String>>,
    }

    #[test]
    fn test_deserialize_some_distinguishes_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.note, None);

        let cleared: Patch = serde_json::from_str(r#"{"note": null}"#).unwrap();
        assert_eq!(cleared.note, Some(None));

        let set: Patch = serde_json::from_str(r#"{"note": "hi"}"#).unwrap();
        assert_eq!(set.note, Some(Some("hi".to_string())));
    }

    #[test]
    fn test_list_query_clamps() {
        let page = ListQuery {
            limit: Some(1000),
            offset: Some(-5),
        }
        .page();
        assert_eq!(page.limit, Page::MAX_LIMIT);
        assert_eq!(page.offset, 0);
    }
}
