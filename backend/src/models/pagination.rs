//! Paging and sort-direction helpers shared by the list endpoints.

use serde::{Deserialize, Deserializer, Serialize};

/// Largest page any list endpoint will return.
pub const MAX_PAGE_SIZE: usize = 100;
/// Page size used when the client sends none (or garbage).
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Sort direction. Only an explicit `"asc"` sorts ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    pub fn lenient(value: Option<&str>) -> Self {
        match value {
            Some("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub fn apply(&self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Normalised 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build from raw query values: non-positive values fall back to the
    /// defaults and the page size is capped at [`MAX_PAGE_SIZE`].
    pub fn from_raw(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page.filter(|p| *p > 0).map(|p| p as usize).unwrap_or(1);
        let page_size = page_size
            .filter(|s| *s > 0)
            .map(|s| s as usize)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        Self { page, page_size }
    }

    /// Build from raw query values, clamping instead of defaulting: the page
    /// is at least 1 and the page size lies in `[1, MAX_PAGE_SIZE]`. Absent
    /// values still take the defaults.
    pub fn clamped(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1) as usize;
        let page_size = page_size
            .unwrap_or(DEFAULT_PAGE_SIZE as i64)
            .clamp(1, MAX_PAGE_SIZE as i64) as usize;
        Self { page, page_size }
    }

    /// Rows to skip; saturates instead of overflowing on absurd pages.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Slice one page out of an already filtered and sorted collection.
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(self.offset())
            .take(self.page_size)
            .cloned()
            .collect()
    }
}

/// Integer query value that reads garbage as absent, so the caller's
/// default applies instead of the request being rejected.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.trim().parse().ok()))
}

/// Flag query value: `true`/`1`/`yes` are set, anything else is not.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|v| matches!(v.trim(), "true" | "1" | "yes")))
}

/// One page of results plus the unpaged total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub items: Vec<T>,
}

impl<T> Paged<T> {
    pub fn new(total: usize, request: PageRequest, items: Vec<T>) -> Self {
        Self {
            total,
            page: request.page,
            page_size: request.page_size,
            items,
        }
    }

    pub fn empty(request: PageRequest) -> Self {
        Self::new(0, request, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults_and_clamps() {
        assert_eq!(PageRequest::from_raw(None, None), PageRequest::default());
        assert_eq!(PageRequest::from_raw(Some(0), Some(-5)).page, 1);
        assert_eq!(PageRequest::from_raw(Some(0), Some(-5)).page_size, 20);
        assert_eq!(PageRequest::from_raw(Some(3), Some(500)).page_size, 100);
        assert_eq!(PageRequest::from_raw(Some(3), Some(10)).offset(), 20);
    }

    #[test]
    fn test_page_request_clamped() {
        assert_eq!(PageRequest::clamped(None, None), PageRequest::default());
        let req = PageRequest::clamped(Some(-3), Some(0));
        assert_eq!((req.page, req.page_size), (1, 1));
        let req = PageRequest::clamped(Some(2), Some(1000));
        assert_eq!((req.page, req.page_size), (2, 100));
    }

    #[test]
    fn test_huge_page_saturates() {
        let req = PageRequest::clamped(Some(i64::MAX), Some(100));
        assert_eq!(req.offset(), usize::MAX);
        assert!(req.slice(&[1, 2, 3]).is_empty());
        let req = PageRequest::from_raw(Some(i64::MAX), Some(i64::MAX));
        assert_eq!(req.page_size, MAX_PAGE_SIZE);
        assert!(req.slice(&[1, 2, 3]).is_empty());
    }

    #[test]
    fn test_lenient_query_values() {
        #[derive(Deserialize)]
        struct Q {
            #[serde(default, deserialize_with = "lenient_i64")]
            n: Option<i64>,
            #[serde(default, deserialize_with = "lenient_bool")]
            flag: Option<bool>,
        }
        let q: Q = serde_json::from_str(r#"{"n": "abc", "flag": "nope"}"#).unwrap();
        assert_eq!((q.n, q.flag), (None, Some(false)));
        let q: Q = serde_json::from_str(r#"{"n": " 42 ", "flag": "true"}"#).unwrap();
        assert_eq!((q.n, q.flag), (Some(42), Some(true)));
        let q: Q = serde_json::from_str("{}").unwrap();
        assert_eq!((q.n, q.flag), (None, None));
    }

    #[test]
    fn test_slice_past_end_is_empty() {
        let req = PageRequest::from_raw(Some(4), Some(2));
        let items = vec![1, 2, 3, 4, 5];
        assert!(req.slice(&items).is_empty());
        let req = PageRequest::from_raw(Some(3), Some(2));
        assert_eq!(req.slice(&items), vec![5]);
    }

    #[test]
    fn test_sort_dir_lenient() {
        assert_eq!(SortDir::lenient(Some("asc")), SortDir::Asc);
        assert_eq!(SortDir::lenient(Some("ASC")), SortDir::Desc);
        assert_eq!(SortDir::lenient(None), SortDir::Desc);
    }
}
