//! `FileApi` over HTTP using a blocking `reqwest` client

use super::error::{ApiError, ApiResult};
use super::{BatchItemResult, FileApi, FileUpdate, UploadItem, encode_tag_list};
use crate::model::{File, NewTag, Tag, TagId, TagsPayload};
use crate::query::QueryDescriptor;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::COOKIE;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for a running drive server
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
    cookie: Option<String>,
}

impl HttpApi {
    /// Build a client for `base_url` (scheme and host, no trailing path)
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the URL is not http(s), or
    /// `ApiError::Transport` if the TLS backend cannot be initialized.
    pub fn new(base_url: &str, cookie: Option<String>, timeout: Duration) -> ApiResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tagdrive/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            cookie: cookie.filter(|c| !c.trim().is_empty()),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}{path}?{query}", self.base_url)
        }
    }

    fn with_cookie(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.cookie {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }

    /// Send a request and turn error statuses into `ApiError::Status`
    fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = self.with_cookie(request).send()?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().unwrap_or_default();
            tracing::debug!(status = status.as_u16(), %body, "server returned error status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let text = self.send(request)?.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Comma-joined, percent-encoded filenames for a `file=` parameter
fn encode_file_list(filenames: &[String]) -> String {
    filenames
        .iter()
        .map(|name| urlencoding::encode(name).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

impl FileApi for HttpApi {
    fn list_files(&self, query: &QueryDescriptor) -> ApiResult<Vec<File>> {
        let url = self.url("/api/files", &query.to_query_string());
        tracing::debug!(%url, "listing files");
        self.send_json(self.client.get(url))
    }

    fn recent_files(&self, number: usize) -> ApiResult<Vec<File>> {
        let url = self.url("/api/files/recent", &format!("number={number}"));
        self.send_json(self.client.get(url))
    }

    fn list_tags(&self) -> ApiResult<Vec<Tag>> {
        let payload: TagsPayload = self.send_json(self.client.get(self.url("/api/tags", "")))?;
        Ok(payload.into_tags())
    }

    fn update_file(&self, filename: &str, update: &FileUpdate) -> ApiResult<()> {
        tracing::debug!(filename, %update, "updating file");
        let request = self
            .client
            .put(self.url("/api/files", ""))
            .form(&update.form_fields(filename));
        self.send(request)?;
        Ok(())
    }

    fn delete_files(&self, filenames: &[String]) -> ApiResult<Vec<BatchItemResult>> {
        let url = self.url("/api/files", &format!("file={}", encode_file_list(filenames)));
        self.send_json(self.client.delete(url))
    }

    fn upload_files(
        &self,
        items: &[UploadItem],
        tags: &BTreeSet<TagId>,
    ) -> ApiResult<Vec<BatchItemResult>> {
        let form = items.iter().fold(Form::new(), |form, item| {
            let part = Part::bytes(item.content.clone()).file_name(item.filename.clone());
            form.part("files", part)
        });
        let tags = if tags.is_empty() {
            String::new()
        } else {
            encode_tag_list(tags)
        };
        let url = self.url("/api/files", &format!("tags={tags}"));
        self.send_json(self.client.post(url).multipart(form))
    }

    fn create_tag(&self, tag: &NewTag) -> ApiResult<()> {
        let fields = [("name", tag.name().to_string()), ("color", tag.color().to_hex())];
        self.send(self.client.post(self.url("/api/tags", "")).form(&fields))?;
        Ok(())
    }

    fn update_tag(&self, id: TagId, tag: &NewTag) -> ApiResult<()> {
        let fields = [
            ("id", id.to_string()),
            ("name", tag.name().to_string()),
            ("color", tag.color().to_hex()),
        ];
        self.send(self.client.put(self.url("/api/tags", "")).form(&fields))?;
        Ok(())
    }

    fn delete_tag(&self, id: TagId) -> ApiResult<()> {
        self.send(self.client.delete(self.url("/api/tags", &format!("id={id}"))))?;
        Ok(())
    }

    fn download_files(&self, filenames: &[String]) -> ApiResult<Vec<u8>> {
        let url = self.url(
            "/api/files/download",
            &format!("file={}", encode_file_list(filenames)),
        );
        let bytes = self.send(self.client.get(url))?.bytes()?;
        Ok(bytes.to_vec())
    }
}
