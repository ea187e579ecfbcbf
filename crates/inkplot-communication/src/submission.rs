//! Program submission over HTTP
//!
//! Delivers program text to a plotter-side HTTP endpoint as a single
//! `POST` with a `text/plain` body. Only plain `http://` endpoints are
//! supported. There is no automatic retry: every failure is reported to the
//! caller as a [`SubmissionError`].

use async_trait::async_trait;
use inkplot_core::SubmissionError;
use std::fmt;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};
use url::{Host, Url};

/// Successful delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// HTTP status code (2xx)
    pub status: u16,
    /// Response body as text
    pub body: String,
}

/// Something that can take a finished program
#[async_trait]
pub trait ProgramSubmitter: Send + Sync {
    /// Deliver `program` once
    async fn submit(&self, program: &str) -> Result<SubmissionReceipt, SubmissionError>;
}

/// Parsed `http://host[:port]/path` endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    /// Path and query, always starting with `/`
    pub path: String,
}

impl Endpoint {
    pub fn parse(url: &str) -> Result<Self, SubmissionError> {
        let invalid = |reason: String| SubmissionError::InvalidUrl {
            url: url.to_string(),
            reason,
        };

        let parsed = Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;
        if parsed.scheme() != "http" {
            return Err(SubmissionError::UnsupportedScheme {
                scheme: parsed.scheme().to_string(),
            });
        }
        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(invalid("credentials in URL are not supported".to_string()));
        }

        let host = match parsed.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            _ => return Err(invalid("missing host".to_string())),
        };
        let port = parsed.port_or_known_default().unwrap_or(80);

        let mut path = parsed.path().to_string();
        if let Some(query) = parsed.query() {
            path.push('?');
            path.push_str(query);
        }

        Ok(Self { host, port, path })
    }

    fn host_header(&self) -> String {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        if self.port == 80 {
            host
        } else {
            format!("{}:{}", host, self.port)
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http://{}{}", self.host_header(), self.path)
    }
}

/// Raw HTTP/1.1 client over a tokio TCP stream
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    endpoint: Endpoint,
    timeout: Duration,
}

impl HttpSubmitter {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, SubmissionError> {
        Ok(Self {
            endpoint: Endpoint::parse(url)?,
            timeout,
        })
    }

    /// Build from optional settings; a missing endpoint is `NotConfigured`
    pub fn from_settings(endpoint: Option<&str>, timeout_ms: u64) -> Result<Self, SubmissionError> {
        match endpoint.map(str::trim).filter(|e| !e.is_empty()) {
            Some(url) => Self::new(url, Duration::from_millis(timeout_ms)),
            None => Err(SubmissionError::NotConfigured),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn request(&self, program: &str) -> Vec<u8> {
        let mut request = String::with_capacity(program.len() + 256);
        request.push_str(&format!("POST {} HTTP/1.1\r\n", self.endpoint.path));
        request.push_str(&format!("Host: {}\r\n", self.endpoint.host_header()));
        request.push_str("Content-Type: text/plain; charset=utf-8\r\n");
        request.push_str(&format!("Content-Length: {}\r\n", program.len()));
        request.push_str(&format!(
            "User-Agent: inkplot/{}\r\n",
            env!("CARGO_PKG_VERSION")
        ));
        request.push_str("Connection: close\r\n\r\n");
        request.push_str(program);
        request.into_bytes()
    }

    async fn exchange(&self, program: &str) -> Result<HttpResponse, SubmissionError> {
        let network = |e: std::io::Error| SubmissionError::Network {
            reason: e.to_string(),
        };

        let mut stream = TcpStream::connect((self.endpoint.host.as_str(), self.endpoint.port))
            .await
            .map_err(network)?;
        stream
            .write_all(&self.request(program))
            .await
            .map_err(network)?;
        stream.flush().await.map_err(network)?;

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.map_err(network)?;
        HttpResponse::parse(&raw)
    }
}

#[async_trait]
impl ProgramSubmitter for HttpSubmitter {
    async fn submit(&self, program: &str) -> Result<SubmissionReceipt, SubmissionError> {
        debug!(
            "Submitting {} bytes to {} (timeout {:?})",
            program.len(),
            self.endpoint,
            self.timeout
        );

        let response = tokio::time::timeout(self.timeout, self.exchange(program))
            .await
            .map_err(|_| SubmissionError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            })??;

        if !(200..300).contains(&response.status) {
            warn!(
                "Endpoint {} answered {} {}",
                self.endpoint, response.status, response.reason
            );
            return Err(SubmissionError::HttpStatus {
                status: response.status,
                reason: response.reason,
            });
        }

        info!("Program delivered to {} ({})", self.endpoint, response.status);
        Ok(SubmissionReceipt {
            status: response.status,
            body: response.body,
        })
    }
}

/// Parsed HTTP/1.x response
#[derive(Debug, Clone, PartialEq)]
struct HttpResponse {
    status: u16,
    reason: String,
    body: String,
}

impl HttpResponse {
    fn parse(raw: &[u8]) -> Result<Self, SubmissionError> {
        let malformed = |reason: &str| SubmissionError::MalformedResponse {
            reason: reason.to_string(),
        };

        let split = raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .ok_or_else(|| malformed("missing header terminator"))?;
        let head = std::str::from_utf8(&raw[..split]).map_err(|_| malformed("non-UTF-8 headers"))?;
        let body = &raw[split + 4..];

        let mut lines = head.split("\r\n");
        let status_line = lines.next().ok_or_else(|| malformed("empty response"))?;
        let mut parts = status_line.splitn(3, ' ');
        let version = parts.next().unwrap_or_default();
        if !version.starts_with("HTTP/1.") {
            return Err(malformed("not an HTTP/1.x response"));
        }
        let status = parts
            .next()
            .and_then(|s| s.parse::<u16>().ok())
            .ok_or_else(|| malformed("invalid status code"))?;
        let reason = parts.next().unwrap_or_default().to_string();

        let mut chunked = false;
        let mut content_length = None;
        for line in lines {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if name.eq_ignore_ascii_case("transfer-encoding") {
                chunked = value.to_ascii_lowercase().contains("chunked");
            } else if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse::<usize>().ok();
            }
        }

        let body = if chunked {
            decode_chunked(body).ok_or_else(|| malformed("invalid chunked body"))?
        } else if let Some(len) = content_length {
            body.get(..len)
                .ok_or_else(|| malformed("body shorter than Content-Length"))?
                .to_vec()
        } else {
            body.to_vec()
        };

        Ok(Self {
            status,
            reason,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

fn decode_chunked(mut data: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    loop {
        let line_end = data.windows(2).position(|w| w == b"\r\n")?;
        let size_line = std::str::from_utf8(&data[..line_end]).ok()?;
        let size_hex = size_line.split(';').next()?.trim();
        let size = usize::from_str_radix(size_hex, 16).ok()?;
        data = &data[line_end + 2..];
        if size == 0 {
            return Some(out);
        }
        out.extend_from_slice(data.get(..size)?);
        data = data.get(size + 2..)?;
    }
}
