use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const DEFAULT_METHOD: &str = "GET";
const DEFAULT_PATH: &str = "/";

/// HTTP-shaped invocation envelope. Every level is optional; missing
/// pieces fall back to `GET /` with no body.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    pub request_context: Option<RequestContext>,
    pub body: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct RequestContext {
    pub http: Option<HttpDescription>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct HttpDescription {
    pub method: Option<String>,
    pub path: Option<String>,
}

impl InboundEvent {
    pub fn new(method: impl Into<String>, path: impl Into<String>, body: Option<String>) -> Self {
        Self {
            request_context: Some(RequestContext {
                http: Some(HttpDescription {
                    method: Some(method.into()),
                    path: Some(path.into()),
                }),
            }),
            body,
        }
    }

    fn http(&self) -> Option<&HttpDescription> {
        self.request_context.as_ref()?.http.as_ref()
    }

    pub fn method(&self) -> HttpMethod {
        HttpMethod::from(
            self.http()
                .and_then(|http| http.method.as_deref())
                .unwrap_or(DEFAULT_METHOD),
        )
    }

    pub fn path(&self) -> &str {
        self.http()
            .and_then(|http| http.path.as_deref())
            .unwrap_or(DEFAULT_PATH)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Other(String),
}

// Exact, case-sensitive match.
impl From<&str> for HttpMethod {
    fn from(method: &str) -> Self {
        match method {
            "GET" => Self::Get,
            "POST" => Self::Post,
            other => Self::Other(other.to_string()),
        }
    }
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Other(method) => method,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub fn json<T: Serialize + ?Sized>(status_code: u16, body: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::with_body(status_code, serde_json::to_string(body)?))
    }

    pub(crate) fn with_body(status_code: u16, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        Self {
            status_code,
            headers,
            body,
        }
    }

    pub fn body_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
