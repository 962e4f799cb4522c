//! reqwest-backed transport

use crate::{ClientConfig, ClientError, HttpRequest, HttpResponse, Method, Transport, TransportError};
use reqwest::blocking::Client;

/// Blocking HTTP transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport honoring the config's timeout and certificate policy
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate verification disabled for {}", config.base_url);
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(classify)?;
        Ok(HttpResponse { status, body })
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(error.to_string())
    } else {
        TransportError::Io(error.to_string())
    }
}
