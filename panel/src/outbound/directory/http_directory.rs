//! Reqwest-backed user directory adapter.
//!
//! This adapter owns transport details only: URL building, headers, timeout
//! and HTTP error mapping, and JSON decoding into domain records.

use std::time::Duration;

use async_trait::async_trait;
use pagination::{PageNumber, Paginated};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use zeroize::Zeroizing;

use super::dto::{UserDto, UserUpdateDto};
use crate::domain::ports::{UserDirectory, UserDirectoryError, UserPage};
use crate::domain::{UserEdit, UserId};

const API_KEY_HEADER: &str = "x-api-key";
const USERS_PATH: &str = "users";

/// Directory adapter speaking the `GET/PUT/DELETE users` JSON API.
pub struct HttpUserDirectory {
    client: Client,
    base_url: Url,
    api_key: Option<Zeroizing<String>>,
}

impl HttpUserDirectory {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let directory = HttpUserDirectory::new(base_url, Duration::from_secs(10));
    /// assert!(directory.is_ok() || directory.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
            api_key: None,
        })
    }

    /// Send `api_key` in the `x-api-key` header of every request.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Zeroizing::new(api_key.into()));
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, UserDirectoryError> {
        self.base_url.join(path).map_err(|error| {
            UserDirectoryError::invalid_request(format!("cannot build '{path}' URL: {error}"))
        })
    }

    fn user_endpoint(&self, id: UserId) -> Result<Url, UserDirectoryError> {
        self.endpoint(&format!("{USERS_PATH}/{id}"))
    }

    fn prepare(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(reqwest::header::ACCEPT, "application/json");
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key.as_str()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, UserDirectoryError> {
        let response = self
            .prepare(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn fetch_page(&self, page: PageNumber) -> Result<UserPage, UserDirectoryError> {
        let url = page.apply_to(&self.endpoint(USERS_PATH)?);
        let body = self.send(self.client.get(url)).await?;
        parse_page(&body)
    }

    async fn update_user(&self, id: UserId, edit: &UserEdit) -> Result<(), UserDirectoryError> {
        let url = self.user_endpoint(id)?;
        self.send(self.client.put(url).json(&UserUpdateDto::from(edit)))
            .await
            .map(drop)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), UserDirectoryError> {
        let url = self.user_endpoint(id)?;
        self.send(self.client.delete(url)).await.map(drop)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn parse_page(body: &[u8]) -> Result<UserPage, UserDirectoryError> {
    let decoded: Paginated<UserDto> = Paginated::from_slice(body).map_err(|error| {
        UserDirectoryError::decode(format!("invalid users page payload: {error}"))
    })?;
    decoded
        .try_map(UserDto::into_domain)
        .map_err(UserDirectoryError::decode)
}

fn map_transport_error(error: reqwest::Error) -> UserDirectoryError {
    if error.is_timeout() {
        UserDirectoryError::timeout(error.to_string())
    } else {
        UserDirectoryError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> UserDirectoryError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_owned()
    } else {
        body_preview
    };
    UserDirectoryError::status(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network directory mapping helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://reqres.in/api", "https://reqres.in/api/users?page=2")]
    #[case("https://reqres.in/api/", "https://reqres.in/api/users?page=2")]
    #[case("http://127.0.0.1:9000", "http://127.0.0.1:9000/users?page=2")]
    fn page_urls_extend_the_base_path(#[case] base: &str, #[case] expected: &str) {
        let directory = HttpUserDirectory::new(
            Url::parse(base).expect("base url"),
            Duration::from_secs(1),
        )
        .expect("client");

        let url = PageNumber::new(2)
            .expect("page")
            .apply_to(&directory.endpoint(USERS_PATH).expect("endpoint"));
        assert_eq!(url.as_str(), expected);

        let user = directory
            .user_endpoint(UserId::new(7).expect("id"))
            .expect("endpoint");
        assert!(user.as_str().ends_with("/users/7"));
    }

    #[rstest]
    #[case::not_found(StatusCode::NOT_FOUND, b"{}".as_slice(), "{}")]
    #[case::empty_body(StatusCode::INTERNAL_SERVER_ERROR, b"".as_slice(), "Internal Server Error")]
    #[case::whitespace(StatusCode::BAD_GATEWAY, b"  upstream \n down ".as_slice(), "upstream down")]
    fn non_success_statuses_keep_code_and_preview(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] expected_message: &str,
    ) {
        let error = map_status_error(status, body);
        assert_eq!(
            error,
            UserDirectoryError::status(status.as_u16(), expected_message)
        );
    }

    #[test]
    fn previews_are_truncated() {
        let body = "x".repeat(200);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn parses_reqres_envelope_into_domain_records() {
        let body = r#"{
            "page": 2, "per_page": 6, "total": 12, "total_pages": 2,
            "data": [
                {
                    "id": 7,
                    "email": "michael.lawson@reqres.in",
                    "first_name": "Michael",
                    "last_name": "Lawson",
                    "avatar": "https://reqres.in/img/faces/7-image.jpg"
                }
            ],
            "support": { "url": "https://reqres.in/#support-heading", "text": "Thanks" }
        }"#;

        let page = parse_page(body.as_bytes()).expect("JSON should decode");
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total, Some(12));
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id.get(), 7);
        assert_eq!(page.data[0].avatar_url, "https://reqres.in/img/faces/7-image.jpg");
    }

    #[rstest]
    #[case::not_json("<html>")]
    #[case::missing_total(r#"{"data": []}"#)]
    #[case::zero_id(r#"{"total_pages": 1, "data": [{"id": 0, "email": "a", "first_name": "b", "last_name": "c"}]}"#)]
    fn malformed_payloads_map_to_decode_errors(#[case] body: &str) {
        let error = parse_page(body.as_bytes()).expect_err("decode should fail");
        assert!(
            matches!(error, UserDirectoryError::Decode { .. }),
            "unexpected error: {error:?}"
        );
    }
}
