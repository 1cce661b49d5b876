//! SendGrid HTTP request methods

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::{SendgridErrorBody, SendgridProvider};

impl SendgridProvider {
    fn authorized(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
    }

    /// Send a request and parse the body, accepting only `expected_status`.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: &Method,
        url: &str,
        expected_status: u16,
        context: ErrorContext,
    ) -> Result<T> {
        let response = self.http.send(request, &format!("{method} {url}")).await?;

        if response.status != expected_status {
            return Err(self.api_error(response.status, &response.body, context));
        }

        response.json(self.provider_name())
    }

    /// Execute a GET request
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
        context: ErrorContext,
    ) -> Result<T> {
        let url = format!("{}{path_and_query}", self.base_url);
        let request = self.authorized(Method::GET, &url);
        self.send(request, &Method::GET, &url, 200, context).await
    }

    /// Execute a POST request with an optional JSON body
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
        expected_status: u16,
        context: ErrorContext,
    ) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.authorized(Method::POST, &url);

        if let Some(body) = body {
            let body_json = serde_json::to_string(body).map_err(|e| self.serialization_error(e))?;
            log::debug!("[sendgrid] Request Body: {}", truncate_for_log(&body_json));
            request = request
                .header("Content-Type", "application/json")
                .body(body_json);
        }

        self.send(request, &Method::POST, &url, expected_status, context)
            .await
    }

    /// Turn a non-accepted response into a mapped error.
    fn api_error(
        &self,
        status: u16,
        body: &str,
        context: ErrorContext,
    ) -> crate::error::ProviderError {
        let parsed: SendgridErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .summary()
            .unwrap_or_else(|| truncate_for_log(body));

        log::debug!("[sendgrid] API error (HTTP {status}): {message}");

        let raw = match parsed.first_field() {
            Some(field) if !field.is_empty() => RawApiError::with_code(status, field, message),
            _ => RawApiError::new(status, message),
        };
        self.map_error(raw, context)
    }
}
