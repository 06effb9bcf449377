//! Page cursor and list envelope primitives shared by the panel's directory
//! adapters.
//!
//! The remote directory pages by one-based page number and answers with a
//! `{ data, total_pages }` envelope. [`PageNumber`] models the cursor and
//! [`Paginated`] the envelope so adapters and the domain agree on both.

mod cursor;
mod envelope;

pub use cursor::{PAGE_QUERY_PARAM, PageNumber, PageNumberError};
pub use envelope::Paginated;
