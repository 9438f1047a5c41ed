use std::fmt;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PlatformError;

/// Appwrite's "generate an id for me" placeholder.
pub struct ID;

impl ID {
    pub fn unique() -> String {
        "unique()".to_string()
    }
}

#[derive(Clone)]
enum Credentials {
    None,
    ApiKey(String),
    Session(String),
}

/// Thin REST client: endpoint, project header, and one credential.
///
/// Cloning is cheap; the underlying `reqwest::Client` pool is shared.
#[derive(Clone)]
pub struct AppwriteClient {
    http: Client,
    endpoint: Url,
    project_id: String,
    credentials: Credentials,
}

impl AppwriteClient {
    /// `endpoint` is the API root, e.g. `https://cloud.appwrite.io/v1`.
    pub fn new(endpoint: &str, project_id: impl Into<String>) -> Result<Self, PlatformError> {
        Self::with_http_client(Client::new(), endpoint, project_id)
    }

    pub fn with_http_client(
        http: Client,
        endpoint: &str,
        project_id: impl Into<String>,
    ) -> Result<Self, PlatformError> {
        let mut url = Url::parse(endpoint.trim())
            .map_err(|_| PlatformError::InvalidEndpoint(endpoint.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PlatformError::InvalidEndpoint(endpoint.to_string()));
        }
        // Url::join drops the last segment unless the path ends in '/'.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            http,
            endpoint: url,
            project_id: project_id.into(),
            credentials: Credentials::None,
        })
    }

    /// Admin credentials (`X-Appwrite-Key`).
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.credentials = Credentials::ApiKey(key.into());
        self
    }

    /// Caller credentials (`X-Appwrite-Session`), for account calls.
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.credentials = Credentials::Session(session.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, PlatformError> {
        let url = self
            .endpoint
            .join(path.trim_start_matches('/'))
            .map_err(|_| PlatformError::InvalidEndpoint(format!("{}{path}", self.endpoint)))?;

        let builder = self
            .http
            .request(method, url)
            .header("X-Appwrite-Project", &self.project_id);

        Ok(match &self.credentials {
            Credentials::None => builder,
            Credentials::ApiKey(key) => builder.header("X-Appwrite-Key", key),
            Credentials::Session(session) => builder.header("X-Appwrite-Session", session),
        })
    }

    async fn send(&self, builder: RequestBuilder) -> Result<String, PlatformError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(PlatformError::from_response(status.as_u16(), &body));
        }
        Ok(body)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, PlatformError> {
        let body = self.send(self.request(Method::GET, path)?).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn post<B, T>(&self, path: &str, payload: &B) -> Result<T, PlatformError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .send(self.request(Method::POST, path)?.json(payload))
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// DELETE; Appwrite answers 204 with no body.
    pub async fn delete(&self, path: &str) -> Result<(), PlatformError> {
        self.send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }
}

impl fmt::Debug for AppwriteClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let credentials = match self.credentials {
            Credentials::None => "none",
            Credentials::ApiKey(_) => "api-key(<redacted>)",
            Credentials::Session(_) => "session(<redacted>)",
        };
        f.debug_struct("AppwriteClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("project_id", &self.project_id)
            .field("credentials", &credentials)
            .finish()
    }
}
