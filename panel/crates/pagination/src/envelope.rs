//! Page-numbered list envelope.

use serde::{Deserialize, Serialize};

/// One page of items plus the totals the server reported alongside it.
///
/// Matches the `{ "data": [...], "total_pages": n }` shape. Optional totals
/// are kept when present; any other envelope field is ignored.
///
/// # Examples
/// ```
/// use pagination::Paginated;
///
/// let body = br#"{"page":2,"per_page":6,"total":12,"total_pages":2,"data":[1,2]}"#;
/// let page: Paginated<u8> = Paginated::from_slice(body).expect("valid envelope");
/// assert_eq!(page.data, vec![1, 2]);
/// assert_eq!(page.total_pages, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items on this page, in server order.
    pub data: Vec<T>,
    /// Total number of pages the server reports.
    pub total_pages: u32,
    /// Page number echoed by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size echoed by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    /// Total number of items across all pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl<T> Paginated<T> {
    /// Build an envelope carrying only items and the page total.
    #[must_use]
    pub const fn new(data: Vec<T>, total_pages: u32) -> Self {
        Self {
            data,
            total_pages,
            page: None,
            per_page: None,
            total: None,
        }
    }

    /// Convert every item, keeping the totals.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `convert`.
    pub fn try_map<U, E, F>(self, convert: F) -> Result<Paginated<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        let data = self
            .data
            .into_iter()
            .map(convert)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Paginated {
            data,
            total_pages: self.total_pages,
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        })
    }
}

impl<T> Paginated<T>
where
    T: for<'de> Deserialize<'de>,
{
    /// Decode an envelope from a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the body is not a valid envelope.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}
