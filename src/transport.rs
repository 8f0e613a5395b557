use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::{ClientConfig, Endpoint};
use crate::domain::Method;
use crate::error::CymolError;

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub endpoint: Endpoint,
    pub path: String,
    pub body: Option<Bytes>,
    pub content_type: Option<String>,
}

impl Request {
    pub fn get(endpoint: &Endpoint, path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            endpoint: endpoint.clone(),
            path: path.into(),
            body: None,
            content_type: None,
        }
    }

    pub fn post(
        endpoint: &Endpoint,
        path: impl Into<String>,
        body: impl Into<Bytes>,
        content_type: &str,
    ) -> Self {
        Self {
            method: Method::Post,
            endpoint: endpoint.clone(),
            path: path.into(),
            body: Some(body.into()),
            content_type: Some(content_type.to_string()),
        }
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.endpoint.base_url(), self.path)
    }

    pub fn host(&self) -> &str {
        &self.endpoint.host
    }
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Bytes,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn require_success(self, host: &str) -> Result<Self, CymolError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(CymolError::Status {
            host: host.to_string(),
            status: self.status,
        })
    }
}

pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Reply, CymolError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn execute(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Reply, CymolError>> + Send {
        (**self).execute(request, cancel)
    }
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, CymolError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|err| CymolError::HttpClient(err.to_string()))?,
        );
        let mut builder = Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|err| CymolError::HttpClient(err.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<Reply, CymolError> {
        let url = request.url();
        let host = request.host().to_string();
        debug!(method = %request.method, %url, "sending request");

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if let Some(content_type) = &request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_LENGTH, body.len()).body(body);
        }

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CymolError::Cancelled),
            response = builder.send() => response.map_err(|err| transport_error(&host, err))?,
        };
        let status = response.status().as_u16();
        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|err| transport_error(&host, err)));
        let body = collect_body(stream, cancel).await?;
        debug!(%url, status, bytes = body.len(), "response complete");
        Ok(Reply { status, body })
    }
}

/// Concatenates body chunks in arrival order until the stream ends.
pub async fn collect_body<S>(stream: S, cancel: &CancellationToken) -> Result<Bytes, CymolError>
where
    S: Stream<Item = Result<Bytes, CymolError>>,
{
    let mut stream = std::pin::pin!(stream);
    let mut buffer = BytesMut::new();
    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CymolError::Cancelled),
            chunk = stream.next() => chunk,
        };
        match chunk {
            Some(Ok(bytes)) => buffer.extend_from_slice(&bytes),
            Some(Err(err)) => return Err(err),
            None => return Ok(buffer.freeze()),
        }
    }
}

fn transport_error(host: &str, err: reqwest::Error) -> CymolError {
    warn!(host, error = %err, "transport failure");
    CymolError::Transport {
        host: host.to_string(),
        message: err.to_string(),
    }
}
