// REST collection client
//
// Wraps `reqwest::Client` with resource URL construction and status
// mapping for one collection (`/{resource}` and `/{resource}/{id}`).
// Every call is a single round-trip: no retry, no caching.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::record::{Record, RecordId};
use crate::transport::TransportConfig;

/// HTTP client for one REST collection (e.g. `users`, `products`).
///
/// `GET /{resource}` lists, `POST /{resource}` creates,
/// `PUT /{resource}/{id}` updates, `DELETE /{resource}/{id}` deletes.
#[derive(Debug, Clone)]
pub struct CollectionClient {
    http: reqwest::Client,
    base_url: Url,
    resource: String,
}

impl CollectionClient {
    /// Create a collection client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://localhost:3000`);
    /// `resource` is the collection path segment.
    pub fn new(
        base_url: Url,
        resource: impl Into<String>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, resource))
    }

    /// Create a collection client with a pre-built `reqwest::Client`.
    ///
    /// Use this to share one connection pool between collections.
    pub fn with_client(http: reqwest::Client, base_url: Url, resource: impl Into<String>) -> Self {
        Self {
            http,
            base_url,
            resource: resource.into(),
        }
    }

    /// The collection path segment.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/{resource}`, or `{base}/{resource}/{id}` with the id
    /// percent-encoded as a single path segment.
    pub(crate) fn endpoint(&self, id: Option<&RecordId>) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push(&self.resource);
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        Ok(url)
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Fetch the full collection.
    ///
    /// `GET /{resource}`
    pub async fn list(&self) -> Result<Vec<Record>, Error> {
        let url = self.endpoint(None)?;
        debug!("GET {}", url);
        let resp = self.http.get(url.clone()).send().await?;
        Self::parse_json(url, resp).await
    }

    /// Create a record; the server assigns the id.
    ///
    /// `POST /{resource}` with the draft (any id on it is stripped).
    pub async fn create(&self, draft: &Record) -> Result<Record, Error> {
        let url = self.endpoint(None)?;
        debug!("POST {}", url);
        self.send_json(reqwest::Method::POST, url, &draft.without_id())
            .await
    }

    /// Update a record with a (possibly partial) set of fields.
    ///
    /// `PUT /{resource}/{id}`. Unknown ids yield [`Error::NotFound`].
    pub async fn update(&self, id: &RecordId, patch: &Record) -> Result<Record, Error> {
        let url = self.endpoint(Some(id))?;
        debug!("PUT {}", url);
        self.send_json(reqwest::Method::PUT, url, &patch.without_id())
            .await
    }

    /// Delete a record.
    ///
    /// `DELETE /{resource}/{id}`. The response body is ignored.
    pub async fn delete(&self, id: &RecordId) -> Result<(), Error> {
        let url = self.endpoint(Some(id))?;
        debug!("DELETE {}", url);
        let resp = self.http.delete(url.clone()).send().await?;
        Self::check_status(&url, resp).await.map(|_| ())
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let resp = self
            .http
            .request(method, url.clone())
            .json(body)
            .send()
            .await?;
        Self::parse_json(url, resp).await
    }

    /// Map non-2xx statuses to errors, passing successful responses through.
    async fn check_status(url: &Url, resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_owned()
            } else {
                body
            };
            return Err(Error::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp)
    }

    async fn parse_json<T: DeserializeOwned>(url: Url, resp: reqwest::Response) -> Result<T, Error> {
        let resp = Self::check_status(&url, resp).await?;
        let body = resp.text().await?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str, resource: &str) -> CollectionClient {
        CollectionClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap(), resource)
    }

    #[test]
    fn endpoint_from_bare_host() {
        let c = client("http://localhost:3000", "users");
        assert_eq!(c.endpoint(None).unwrap().as_str(), "http://localhost:3000/users");
        assert_eq!(
            c.endpoint(Some(&RecordId::Int(7))).unwrap().as_str(),
            "http://localhost:3000/users/7"
        );
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let c = client("http://example.com/api/", "products");
        assert_eq!(
            c.endpoint(None).unwrap().as_str(),
            "http://example.com/api/products"
        );
    }

    #[test]
    fn endpoint_encodes_text_ids() {
        let c = client("http://localhost:3000", "users");
        let url = c.endpoint(Some(&RecordId::Text("a b/c".into()))).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/users/a%20b%2Fc");
    }

    #[test]
    fn cannot_be_base_url_rejected() {
        let c = client("mailto:admin@example.com", "users");
        assert!(matches!(c.endpoint(None), Err(Error::InvalidBaseUrl(_))));
    }
}
