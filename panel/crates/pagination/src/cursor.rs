//! One-based page cursor used by page-numbered list endpoints.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

/// Query parameter carrying the requested page number.
pub const PAGE_QUERY_PARAM: &str = "page";

/// Errors raised while constructing a [`PageNumber`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageNumberError {
    /// Page numbers start at one.
    #[error("page numbers start at 1, got 0")]
    Zero,
    /// The input was not a non-negative integer.
    #[error("invalid page number '{raw}'")]
    NotANumber {
        /// Raw input that failed to parse.
        raw: String,
    },
}

/// A one-based page index.
///
/// ## Invariants
/// - The value is always `>= 1`.
/// - No upper bound is enforced; callers may move past the last page the
///   server reported.
///
/// # Examples
/// ```
/// use pagination::PageNumber;
///
/// let page = PageNumber::new(2).expect("non-zero page");
/// assert_eq!(page.next().get(), 3);
/// assert_eq!(page.previous(), Some(PageNumber::FIRST));
/// assert_eq!(PageNumber::FIRST.previous(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageNumber(NonZeroU32);

impl PageNumber {
    /// The first page.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Validate and construct a page number.
    ///
    /// # Errors
    ///
    /// Returns [`PageNumberError::Zero`] when `value` is zero.
    pub const fn new(value: u32) -> Result<Self, PageNumberError> {
        match NonZeroU32::new(value) {
            Some(value) => Ok(Self(value)),
            None => Err(PageNumberError::Zero),
        }
    }

    /// Raw page number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// The following page, without clamping to any known total.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// The preceding page, or `None` on the first page.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match NonZeroU32::new(self.0.get() - 1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Return a copy of `base` whose `page` query parameter is set to this
    /// page. Other query pairs are kept; any existing `page` pair is replaced.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageNumber;
    /// use url::Url;
    ///
    /// let base = Url::parse("https://example.test/api/users?page=9&per_page=6").unwrap();
    /// let page = PageNumber::new(2).unwrap();
    /// assert_eq!(
    ///     page.apply_to(&base).as_str(),
    ///     "https://example.test/api/users?per_page=6&page=2"
    /// );
    /// ```
    #[must_use]
    pub fn apply_to(self, base: &Url) -> Url {
        let retained: Vec<(String, String)> = base
            .query_pairs()
            .filter(|(key, _)| key != PAGE_QUERY_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let mut url = base.clone();
        url.set_query(None);
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &retained {
                pairs.append_pair(key, value);
            }
            pairs.append_pair(PAGE_QUERY_PARAM, &self.to_string());
        }
        url
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for PageNumber {
    type Error = PageNumberError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for PageNumber {
    type Err = PageNumberError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| PageNumberError::NotANumber {
                raw: raw.to_owned(),
            })?;
        Self::new(value)
    }
}

impl From<PageNumber> for u32 {
    fn from(value: PageNumber) -> Self {
        value.get()
    }
}
