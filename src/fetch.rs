//! HTTP client abstraction for the backend and photo APIs

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client, Method, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::ClientOptions;
use crate::error::Error;

/// Build the shared reqwest client from the client options
pub fn build_http_client(options: &ClientOptions) -> Result<Client, Error> {
    let mut builder = Client::builder();
    if let Some(timeout) = options.request_timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    query_params: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: &str, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        Self {
            client,
            url: url.to_string(),
            method,
            headers,
            query_params: Vec::new(),
            body: None,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => log::warn!("Dropping invalid header {}", name),
        }
        self
    }

    /// Add every header of a prepared map
    pub fn headers(mut self, headers: &HeaderMap) -> Self {
        for (name, value) in headers {
            self.headers.insert(name.clone(), value.clone());
        }
        self
    }

    /// Add a single query parameter, keeping insertion order
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, Error> {
        let json = serde_json::to_vec(body)?;
        self.body = Some(json);
        Ok(self)
    }

    /// Build the request
    fn build(&self) -> Result<RequestBuilder, Error> {
        let mut url = Url::parse(&self.url)?;

        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                query_pairs.append_pair(key, value);
            }
        }

        let mut req = self.client.request(self.method.clone(), url.as_str());
        req = req.headers(self.headers.clone());

        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }

        Ok(req)
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let response = self.send().await?;
        let result = response.json::<T>().await?;
        Ok(result)
    }

    /// Execute the request, turning non-success statuses into [`Error::Api`]
    pub async fn send(&self) -> Result<Response, Error> {
        let req = self.build()?;
        log::debug!("{} {}", self.method, self.url);
        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = error_message(&text)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| format!("Request failed with status {}", status));
            log::debug!("{} {} failed with {}: {}", self.method, self.url, status, message);
            return Err(Error::api(status.as_u16(), message));
        }

        Ok(response)
    }
}

/// Pull a human readable message out of an error body.
///
/// Looks at `error`, then `message`, then the first entry of an `errors`
/// map in the order the server sent it, and finally the raw text when it
/// is not JSON.
pub fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(_) => return Some(trimmed.to_string()),
    };

    for key in ["error", "message", "detail"] {
        if let Some(msg) = value.get(key).and_then(Value::as_str) {
            return Some(msg.to_string());
        }
    }

    if let Some(errors) = value.get("errors") {
        let first = match errors {
            Value::Object(map) => map.values().next(),
            Value::Array(list) => list.first(),
            other => Some(other),
        };
        let msg = match first {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Array(list)) => list.first().and_then(Value::as_str).map(str::to_string),
            _ => None,
        };
        if msg.is_some() {
            return msg;
        }
    }

    Some(trimmed.to_string())
}

/// A base URL plus default headers, shared by every call to one API
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    default_headers: HeaderMap,
}

impl ApiClient {
    /// Create a new adapter for the API rooted at `base_url`
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            default_headers: HeaderMap::new(),
        }
    }

    /// Attach a header to every request made through this adapter
    pub fn with_default_header(mut self, name: &'static str, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.default_headers.insert(name, value);
            }
            Err(_) => log::warn!("Ignoring invalid default header {}", name),
        }
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request with the adapter's defaults applied
    pub fn request(&self, method: Method, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(&self.client, &self.url(path), method).headers(&self.default_headers)
    }

    /// Create a GET request
    pub fn get(&self, path: &str) -> FetchBuilder<'_> {
        self.request(Method::GET, path)
    }

    /// Create a POST request
    pub fn post(&self, path: &str) -> FetchBuilder<'_> {
        self.request(Method::POST, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_error_field() {
        let body = r#"{"error": "Invalid or expired OTP.", "message": "ignored"}"#;
        assert_eq!(error_message(body).as_deref(), Some("Invalid or expired OTP."));
    }

    #[test]
    fn error_message_reads_form_errors() {
        let body = r#"{"errors": {"email": ["Invalid email address."]}}"#;
        assert_eq!(error_message(body).as_deref(), Some("Invalid email address."));
    }

    #[test]
    fn error_message_keeps_backend_field_order() {
        let body = r#"{"errors": {"username": ["Username already taken."], "password": ["Password too weak."]}}"#;
        assert_eq!(error_message(body).as_deref(), Some("Username already taken."));
    }

    #[test]
    fn error_message_falls_back_to_raw_text() {
        assert_eq!(
            error_message("Internal Server Error").as_deref(),
            Some("Internal Server Error")
        );
        assert_eq!(error_message("   "), None);
    }

    #[test]
    fn api_client_joins_paths() {
        let api = ApiClient::new("http://localhost:8000/api/", Client::new());
        assert_eq!(api.url("/auth/login"), "http://localhost:8000/api/auth/login");
        assert_eq!(api.url("auth/logout"), "http://localhost:8000/api/auth/logout");
    }
}
