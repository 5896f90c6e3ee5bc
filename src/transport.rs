//!
//! HTTP transport: posts an encoded [`IppRequestResponse`] to a CUPS/IPP
//! server and decodes the reply, retrying once on an authentication
//! challenge.
//!
use std::io::Read;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;
use http::header::WWW_AUTHENTICATE;
use http::Uri;
use ureq::config::Config;
use ureq::Agent;

use crate::entities::Credentials;
use crate::error::{IppClientError, Result};
use crate::request::IppRequestResponse;

const CONTENT_TYPE: &str = "application/ipp";

/// The authentication scheme a `401` response's `WWW-Authenticate` header
/// names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthChallenge {
    Basic,
    Digest,
    Unknown,
}

fn classify_challenge(header: Option<&str>) -> AuthChallenge {
    let scheme = header.unwrap_or("").trim_start();
    if scheme.get(..5).is_some_and(|s| s.eq_ignore_ascii_case("basic")) {
        AuthChallenge::Basic
    } else if scheme.get(..6).is_some_and(|s| s.eq_ignore_ascii_case("digest")) {
        AuthChallenge::Digest
    } else {
        AuthChallenge::Unknown
    }
}

enum PostResult {
    Ok(IppRequestResponse),
    Unauthorized(AuthChallenge),
}

/// Carries an [`IppRequestResponse`] to `uri` over HTTP POST and decodes the
/// reply. One instance per [`crate::client::CupsClient`]; the underlying
/// [`Agent`] is reused across calls to benefit from connection keep-alive.
pub struct Transport {
    agent: Agent,
    credentials: Option<Credentials>,
}

impl Transport {
    pub fn new(connect_timeout: Duration, read_timeout: Duration, credentials: Option<Credentials>) -> Transport {
        let config = Config::builder()
            .timeout_connect(Some(connect_timeout))
            .timeout_recv_response(Some(read_timeout))
            .http_status_as_error(false)
            .build();

        Transport {
            agent: config.new_agent(),
            credentials,
        }
    }

    /// Send `request` to `uri` and return the decoded response. On a `401`
    /// carrying a `Basic` (or unrecognized) challenge, retries exactly once
    /// with the configured credentials attached; a `Digest` challenge, or a
    /// second `401` on the retry, raises [`IppClientError::AuthRequired`]
    /// rather than resending credentials that cannot satisfy the challenge.
    /// The document payload, if any, is consumed on the first attempt; CUPS
    /// requires the caller to resubmit the job if the retry is also
    /// challenged.
    pub fn send(&self, uri: &Uri, mut request: IppRequestResponse) -> Result<IppRequestResponse> {
        let body = request.to_bytes();
        let payload = request.payload.take();

        let first = self.post(uri, body.clone(), payload, None);
        resolve_challenge(first, self.credentials.as_ref(), |credentials| {
            log::debug!("{uri} challenged for authentication, retrying with credentials");
            self.post(uri, body, None, Some(credentials))
        })
    }

    fn post(
        &self,
        uri: &Uri,
        body: Bytes,
        document: Option<Box<dyn Read + Send>>,
        credentials: Option<&Credentials>,
    ) -> Result<PostResult> {
        let mut call = self.agent.post(uri.to_string()).header("content-type", CONTENT_TYPE);

        if let Some(credentials) = credentials {
            call = call.header("authorization", &basic_auth_header(credentials));
        }

        let full_body: Box<dyn Read + Send> = match document {
            Some(document) => Box::new(std::io::Cursor::new(body).chain(document)),
            None => Box::new(std::io::Cursor::new(body)),
        };

        log::debug!("POST {uri}");
        let mut response = match call.send(ureq::SendBody::from_reader(full_body)) {
            Ok(response) => response,
            Err(err) => {
                log::warn!("{uri} transport failure: {err}");
                return Err(IppClientError::Transport(err.to_string()));
            }
        };

        let status = response.status().as_u16();
        if status == 401 {
            let challenge = classify_challenge(response.headers().get(WWW_AUTHENTICATE).and_then(|v| v.to_str().ok()));
            log::warn!("{uri} returned HTTP 401 ({challenge:?} challenge)");
            return Ok(PostResult::Unauthorized(challenge));
        }
        if !(200..300).contains(&status) {
            log::warn!("{uri} returned HTTP {status}");
            return Err(IppClientError::Http { code: status });
        }

        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|err| IppClientError::Transport(err.to_string()))?;

        IppRequestResponse::from_reader(body.as_slice())
            .map(PostResult::Ok)
            .map_err(IppClientError::from)
    }
}

/// The retry decision for scenario 4: given the outcome of the first
/// attempt, decide whether to retry with credentials, and whether a `401`
/// on the retry (or a `Digest` challenge up front) should surface as
/// [`IppClientError::AuthRequired`]. Factored out of [`Transport::send`] so
/// the decision is testable without a live HTTP round trip.
fn resolve_challenge(
    first: Result<PostResult>,
    credentials: Option<&Credentials>,
    retry: impl FnOnce(&Credentials) -> Result<PostResult>,
) -> Result<IppRequestResponse> {
    match first? {
        PostResult::Ok(response) => Ok(response),
        PostResult::Unauthorized(AuthChallenge::Digest) => Err(IppClientError::AuthRequired),
        PostResult::Unauthorized(_) => {
            let credentials = credentials.ok_or(IppClientError::AuthRequired)?;
            match retry(credentials)? {
                PostResult::Ok(response) => Ok(response),
                PostResult::Unauthorized(_) => Err(IppClientError::AuthRequired),
            }
        }
    }
}

fn basic_auth_header(credentials: &Credentials) -> String {
    let joined = match &credentials.password {
        Some(password) => format!("{}:{}", credentials.user, password),
        None => format!("{}:", credentials.user),
    };
    format!("Basic {}", BASE64.encode(joined))
}
