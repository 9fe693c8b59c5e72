use crate::domain::errors::TransportFailure;
use crate::domain::interfaces::HttpTransport;
use crate::domain::models::{HttpMethod, HttpRequest, HttpResponse};
use futures_util::future::BoxFuture;
use log::debug;

/// reqwest-backed transport. The client has no cookie store and no response
/// cache, so requests go out without credentials and are never served stale.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn classify(error: reqwest::Error) -> TransportFailure {
        if error.is_connect() || error.is_timeout() {
            TransportFailure::Network(error.to_string())
        } else {
            TransportFailure::classify(error.to_string())
        }
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> BoxFuture<'static, Result<HttpResponse, TransportFailure>> {
        let client = self.client.clone();
        Box::pin(async move {
            let HttpRequest {
                method,
                url,
                headers,
                body,
            } = request;

            let method = match method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
            };

            let mut builder = client.request(method, url);
            for (name, value) in &headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(Self::classify)?;
            let status = response.status();
            debug!("Received HTTP {} from {}", status, response.url());

            // Always read text; decoding happens in the client.
            let body = response.text().await.map_err(Self::classify)?;

            Ok(HttpResponse {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            })
        })
    }
}
