use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, cookie::Jar};
use serde::{Serialize, de::DeserializeOwned};
use shared::config::client::Config;
use shared::models::{
    ChatReply, ChatRequest, CommentRequest, ComplaintDetails, ErrorResponse, SaveChatRequest,
    SaveChatResponse, StatusUpdateRequest, SuccessResponse,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

const API_PREFIX: &str = "api/";

/// Everything that can go wrong talking to the helpdesk server.
///
/// Call sites treat every variant as a single "request failed" outcome; the
/// variants only exist so the log line says what happened.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid endpoint '{0}'")]
    Endpoint(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The HTTP contract the chat controller and complaint desk depend on.
#[async_trait]
pub trait HelpdeskApi: Send + Sync {
    /// `POST /api/chat`
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError>;

    /// `POST /api/chat/save`
    async fn save_chat(&self, request: &SaveChatRequest) -> Result<SaveChatResponse, ApiError>;

    /// `GET /api/complaints/{complaint_no}`
    async fn complaint_details(&self, complaint_no: &str) -> Result<ComplaintDetails, ApiError>;

    /// `POST /api/complaints/status`
    async fn update_complaint_status(
        &self,
        request: &StatusUpdateRequest,
    ) -> Result<SuccessResponse, ApiError>;

    /// `POST /api/complaints/comment`
    async fn add_complaint_comment(
        &self,
        request: &CommentRequest,
    ) -> Result<SuccessResponse, ApiError>;
}

/// reqwest-backed client for the helpdesk server.
///
/// Cookies set by the server are kept for the lifetime of the client so the
/// server-side conversation state follows the user across requests.
#[derive(Clone, Debug)]
pub struct HelpdeskClient {
    base_url: Url,
    api_base: Url,
    client: Client,
    jar: Arc<Jar>,
}

impl HelpdeskClient {
    /// Create a new API client rooted at `base_url`.
    ///
    /// # Errors
    /// Returns an error if the base URL cannot carry API paths or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &Url, user_agent: &str) -> Result<Self, ApiError> {
        let base_url = with_trailing_slash(base_url);
        let api_base = base_url
            .join(API_PREFIX)
            .map_err(|_| ApiError::Endpoint(format!("{base_url}{API_PREFIX}")))?;
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(jar.clone())
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            base_url,
            api_base,
            client,
            jar,
        })
    }

    /// Build a client from loaded configuration, seeding the session cookie if one is set.
    ///
    /// # Errors
    /// See [`HelpdeskClient::new`].
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let client = Self::new(&config.base_url, &config.user_agent)?;
        if let Some(cookie) = &config.session_cookie {
            client.add_session_cookie(cookie);
        }
        Ok(client)
    }

    /// Seed the cookie store with one or more `name=value` pairs separated by `;`.
    pub fn add_session_cookie(&self, cookies: &str) {
        for entry in cookies.split(';') {
            let cookie = entry.trim();
            if !cookie.is_empty() {
                self.jar.add_cookie_str(cookie, &self.base_url);
            }
        }
    }

    /// The URL the client resolves API paths against.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    fn api_url(&self, path: &str) -> Result<Url, ApiError> {
        self.api_base
            .join(path.trim_start_matches('/'))
            .map_err(|_| ApiError::Endpoint(path.to_string()))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.api_url(path)?;
        debug!(%url, "POST");
        Self::read_json(self.client.post(url).json(body)).await
    }

    async fn read_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = ErrorResponse::message_from_body(&String::from_utf8_lossy(&body));
            warn!(%status, message = message.as_deref().unwrap_or(""), "request rejected");
            return Err(ApiError::Status { status, message });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl HelpdeskApi for HelpdeskClient {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        self.post_json("chat", request).await
    }

    async fn save_chat(&self, request: &SaveChatRequest) -> Result<SaveChatResponse, ApiError> {
        self.post_json("chat/save", request).await
    }

    async fn complaint_details(&self, complaint_no: &str) -> Result<ComplaintDetails, ApiError> {
        let mut url = self.api_url("complaints/")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Endpoint(format!("complaints/{complaint_no}")))?
            .pop_if_empty()
            .push(complaint_no);
        debug!(%url, "GET");
        Self::read_json(self.client.get(url)).await
    }

    async fn update_complaint_status(
        &self,
        request: &StatusUpdateRequest,
    ) -> Result<SuccessResponse, ApiError> {
        self.post_json("complaints/status", request).await
    }

    async fn add_complaint_comment(
        &self,
        request: &CommentRequest,
    ) -> Result<SuccessResponse, ApiError> {
        self.post_json("complaints/comment", request).await
    }
}

fn with_trailing_slash(url: &Url) -> Url {
    let mut url = url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
