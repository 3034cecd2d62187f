//! Default header decorator

use super::transport::{HttpTransport, SharedTransport};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Request, Response};
use volt_domain::error::{Error, Result};

/// Decorator setting default headers the caller left unset
///
/// A header already present on the request is never overwritten. The
/// header map is fixed at construction, so one instance is shared by every
/// concurrent request.
pub struct HeaderTransport {
    inner: SharedTransport,
    headers: HeaderMap,
}

impl HeaderTransport {
    /// Wrap `inner` with an already-validated header map
    pub fn new(inner: SharedTransport, headers: HeaderMap) -> Self {
        Self { inner, headers }
    }

    /// The default headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// Parse configured name/value pairs into a header map
pub fn parse_default_headers<'a, I>(pairs: I) -> Result<HeaderMap>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            Error::invalid_argument(format!("invalid default header name {name:?}: {e}"))
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            Error::invalid_argument(format!("invalid value for default header {name:?}: {e}"))
        })?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

#[async_trait]
impl HttpTransport for HeaderTransport {
    async fn send(&self, mut request: Request) -> Result<Response> {
        for (name, value) in &self.headers {
            if !request.headers().contains_key(name) {
                request.headers_mut().insert(name.clone(), value.clone());
            }
        }
        self.inner.send(request).await
    }
}
