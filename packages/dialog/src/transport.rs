use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport failure: {0}")]
    Failed(String),
}

/// Response from the transport boundary. The status is recorded but not
/// gated: whatever body the transport handed back gets classified and
/// processed.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchResponse {
    pub fn markup(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: Some("text/html".to_string()),
            body: body.into(),
        }
    }

    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: body.into(),
        }
    }

    /// Structured-data vs markup discriminator
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"))
    }
}

/// Capability that fetches a fragment source. Futures are not required to
/// be `Send`: the controller runs on a single logical thread.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError>;
}

/// Production transport over reqwest
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok(FetchResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Transport double serving canned responses and counting calls. Clones
/// share state, so a test can keep a handle after moving one into the
/// controller.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Rc<RefCell<MockTransportState>>,
}

#[derive(Default)]
struct MockTransportState {
    responses: HashMap<String, FetchResponse>,
    requests: Vec<String>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stub(&self, url: impl Into<String>, response: FetchResponse) {
        self.inner.borrow_mut().responses.insert(url.into(), response);
    }

    /// URLs fetched, in call order
    pub fn requests(&self) -> Vec<String> {
        self.inner.borrow().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.borrow().requests.len()
    }
}

impl Transport for MockTransport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, TransportError> {
        self.inner.borrow_mut().requests.push(url.to_string());
        let response = self.inner.borrow().responses.get(url).cloned();
        response.ok_or_else(|| TransportError::Failed(format!("no stubbed response for {url}")))
    }
}
