//! Plain-data HTTP request and response types.
//!
//! # Design
//! `Fbx4vrmClient::build_*` methods produce an `HttpRequest` without touching
//! the network; a [`Transport`](crate::transport::Transport) executes it and
//! hands back an `HttpResponse`. Keeping both sides as data lets every
//! request be asserted on in tests and lets callers plug in their own I/O.

/// HTTP method for a request. The FBX4VRM API only uses GET and POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `path` is the absolute URL: the client's base URL with the endpoint path
/// appended verbatim.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Non-2xx responses are still an `HttpResponse`; only failures to reach the
/// server at all are reported as a transport error.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
