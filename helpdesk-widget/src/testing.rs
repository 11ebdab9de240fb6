//! In-memory doubles shared by the unit tests.

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use reqwest::StatusCode;
use shared::models::{
    ChatLogEntry, ChatReply, ChatRequest, CommentRequest, ComplaintDetails, SaveChatRequest,
    SaveChatResponse, StatusUpdateRequest, SuccessResponse,
};
use tokio::sync::Notify;

use crate::api::{ApiError, HelpdeskApi};
use crate::notification::{Banner, BannerId, BannerKind};
use crate::sink::{BannerSink, IndicatorId, MessageSink};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    InputCleared,
    Message { text: String, is_user: bool },
    Scrolled,
    TypingShown(IndicatorId),
    TypingRemoved(IndicatorId),
    BannerShown { kind: BannerKind, message: String },
    BannerRemoved(BannerId),
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
    next_indicator: AtomicU64,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<(String, bool)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::Message { text, is_user } => Some((text, is_user)),
                _ => None,
            })
            .collect()
    }

    pub fn bot_messages(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter_map(|(text, is_user)| (!is_user).then_some(text))
            .collect()
    }

    pub fn visible_indicators(&self) -> usize {
        self.events().iter().fold(0usize, |count, event| match event {
            SinkEvent::TypingShown(_) => count + 1,
            SinkEvent::TypingRemoved(_) => count - 1,
            _ => count,
        })
    }

    fn record(&self, event: SinkEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl MessageSink for RecordingSink {
    fn clear_input(&self) {
        self.record(SinkEvent::InputCleared);
    }

    fn render_message(&self, entry: &ChatLogEntry) {
        self.record(SinkEvent::Message {
            text: entry.message.clone(),
            is_user: entry.is_user,
        });
    }

    fn scroll_to_latest(&self) {
        self.record(SinkEvent::Scrolled);
    }

    fn show_typing_indicator(&self) -> IndicatorId {
        let id = IndicatorId(self.next_indicator.fetch_add(1, Ordering::Relaxed));
        self.record(SinkEvent::TypingShown(id));
        id
    }

    fn remove_typing_indicator(&self, indicator: IndicatorId) {
        self.record(SinkEvent::TypingRemoved(indicator));
    }
}

impl BannerSink for RecordingSink {
    fn show_banner(&self, banner: &Banner) {
        self.record(SinkEvent::BannerShown {
            kind: banner.kind,
            message: banner.message.clone(),
        });
    }

    fn remove_banner(&self, id: BannerId) {
        self.record(SinkEvent::BannerRemoved(id));
    }
}

pub fn server_error() -> ApiError {
    ApiError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: Some("boom".to_string()),
    }
}

pub fn decode_error() -> ApiError {
    ApiError::Decode(serde_json::from_str::<serde_json::Value>("{").unwrap_err())
}

/// Scripted [`HelpdeskApi`]: answers come from queues, calls are recorded.
#[derive(Default)]
pub struct ScriptedApi {
    pub chat_replies: Mutex<VecDeque<Result<ChatReply, ApiError>>>,
    pub save_replies: Mutex<VecDeque<Result<SaveChatResponse, ApiError>>>,
    pub details_replies: Mutex<VecDeque<Result<ComplaintDetails, ApiError>>>,
    pub success_replies: Mutex<VecDeque<Result<SuccessResponse, ApiError>>>,
    pub chat_requests: Mutex<Vec<ChatRequest>>,
    pub save_requests: Mutex<Vec<SaveChatRequest>>,
    pub status_requests: Mutex<Vec<StatusUpdateRequest>>,
    pub comment_requests: Mutex<Vec<CommentRequest>>,
    pub chat_calls: AtomicUsize,
    /// When set, `send_chat` waits for a permit before answering.
    pub chat_gate: Option<Arc<Notify>>,
}

impl ScriptedApi {
    pub fn reply(self, response: &str, requires_complaint: bool) -> Self {
        self.chat_replies.lock().unwrap().push_back(Ok(ChatReply {
            response: response.to_string(),
            requires_complaint,
        }));
        self
    }

    pub fn chat_error(self, error: ApiError) -> Self {
        self.chat_replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn saved(self, response: Result<SaveChatResponse, ApiError>) -> Self {
        self.save_replies.lock().unwrap().push_back(response);
        self
    }

    pub fn details(self, response: Result<ComplaintDetails, ApiError>) -> Self {
        self.details_replies.lock().unwrap().push_back(response);
        self
    }

    pub fn success(self, response: Result<SuccessResponse, ApiError>) -> Self {
        self.success_replies.lock().unwrap().push_back(response);
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.chat_gate = Some(gate);
        self
    }

    pub fn save_requests(&self) -> Vec<SaveChatRequest> {
        self.save_requests.lock().unwrap().clone()
    }
}

fn next<T>(queue: &Mutex<VecDeque<Result<T, ApiError>>>) -> Result<T, ApiError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(server_error()))
}

#[async_trait]
impl HelpdeskApi for ScriptedApi {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        self.chat_requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.chat_gate {
            gate.notified().await;
        }
        next(&self.chat_replies)
    }

    async fn save_chat(&self, request: &SaveChatRequest) -> Result<SaveChatResponse, ApiError> {
        self.save_requests.lock().unwrap().push(request.clone());
        next(&self.save_replies)
    }

    async fn complaint_details(&self, _complaint_no: &str) -> Result<ComplaintDetails, ApiError> {
        next(&self.details_replies)
    }

    async fn update_complaint_status(
        &self,
        request: &StatusUpdateRequest,
    ) -> Result<SuccessResponse, ApiError> {
        self.status_requests.lock().unwrap().push(request.clone());
        next(&self.success_replies)
    }

    async fn add_complaint_comment(
        &self,
        request: &CommentRequest,
    ) -> Result<SuccessResponse, ApiError> {
        self.comment_requests.lock().unwrap().push(request.clone());
        next(&self.success_replies)
    }
}
