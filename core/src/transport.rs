//! The I/O seam: executing an `HttpRequest` against the network.
//!
//! # Design
//! `Transport` is the only place the client blocks on the network. The
//! default `UreqTransport` turns off ureq's status-as-error behavior so 4xx
//! and 5xx responses come back as data for `parse_response` to normalize,
//! while failures that never produced a response are classified into
//! `ApiError::Timeout`, `ApiError::Connection` or `ApiError::Transport`.

use std::io::{self, Read};

use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Bytes of a non-200 body kept in `Reply::Status`; the rest is discarded.
pub const ERROR_BODY_LIMIT: u64 = 64 * 1024;

/// Executes one HTTP round-trip.
///
/// Implementations must return every HTTP status as an `HttpResponse` and
/// reserve `Err` for requests that did not get a response at all.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by a shared `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let HttpRequest {
            method,
            url,
            headers,
            query,
            timeout,
        } = request;

        let result = match method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&url);
                for (name, value) in &headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder
                    .query_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                    .config()
                    .timeout_global(timeout)
                    .build()
                    .call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&url);
                for (name, value) in &headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder
                    .query_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                    .config()
                    .timeout_global(timeout)
                    .build()
                    .send_empty()
            }
        };

        let mut response = result.map_err(|e| {
            let err = classify(e);
            warn!(method = method.as_str(), %url, error = %err, "request failed");
            err
        })?;

        let status = response.status().as_u16();
        let body = if status == 200 {
            // Reading the body to the end hands the connection back to the pool.
            response
                .body_mut()
                .with_config()
                .limit(u64::MAX)
                .read_to_string()
                .map_err(classify)?
        } else {
            let reader = response.body_mut().with_config().limit(u64::MAX).reader();
            read_error_body(reader)
        };

        Ok(HttpResponse { status, body })
    }
}

/// Read at most `ERROR_BODY_LIMIT` bytes of a non-200 body.
///
/// The status is the result here, so a body that is oversized, not UTF-8
/// or cut short by the network still yields whatever text was read.
fn read_error_body(reader: impl Read) -> String {
    let mut buf = Vec::new();
    if let Err(e) = reader.take(ERROR_BODY_LIMIT).read_to_end(&mut buf) {
        debug!(error = %e, read = buf.len(), "error body read cut short");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Map a ureq failure onto the transport variants of `ApiError`.
fn classify(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Timeout(_) => ApiError::Timeout,
        other @ (ureq::Error::HostNotFound | ureq::Error::ConnectionFailed) => {
            ApiError::Connection(other.to_string())
        }
        ureq::Error::Io(io_err) => classify_io(io_err),
        other => ApiError::Transport(other.to_string()),
    }
}

fn classify_io(err: io::Error) -> ApiError {
    match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ApiError::Timeout,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected
        | io::ErrorKind::AddrNotAvailable
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof => ApiError::Connection(err.to_string()),
        _ => ApiError::Transport(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_is_capped() {
        let big = vec![b'x'; ERROR_BODY_LIMIT as usize + 10];
        let body = read_error_body(big.as_slice());
        assert_eq!(body.len(), ERROR_BODY_LIMIT as usize);
    }

    #[test]
    fn error_body_tolerates_invalid_utf8() {
        let body = read_error_body(&b"Erreur \xff serveur"[..]);
        assert!(body.starts_with("Erreur "));
        assert!(body.ends_with(" serveur"));
    }

    #[test]
    fn error_body_keeps_partial_text_on_read_failure() {
        struct Flaky(bool);
        impl Read for Flaky {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.0 {
                    return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
                }
                self.0 = true;
                buf[..4].copy_from_slice(b"oops");
                Ok(4)
            }
        }
        assert_eq!(read_error_body(Flaky(false)), "oops");
    }

    #[test]
    fn timeouts_are_classified() {
        let err = classify(ureq::Error::Io(io::Error::new(
            io::ErrorKind::TimedOut,
            "read timed out",
        )));
        assert!(matches!(err, ApiError::Timeout));
    }

    #[test]
    fn refused_connections_are_classified() {
        let err = classify(ureq::Error::Io(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "refused",
        )));
        assert!(matches!(err, ApiError::Connection(_)));
        assert!(matches!(
            classify(ureq::Error::HostNotFound),
            ApiError::Connection(_)
        ));
    }

    #[test]
    fn other_failures_are_generic_transport_errors() {
        let err = classify(ureq::Error::BadUri("nope".to_string()));
        assert!(matches!(err, ApiError::Transport(ref m) if m.contains("nope")));
    }
}
