use std::{
    fmt::{self, Write as _},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use shared::config::client::DEFAULT_GREETING;
use shared::models::{ChatLogEntry, ChatRequest, SaveChatRequest, SaveChatResponse, Sender};
use tokio::{sync::mpsc, task::JoinSet};
use tracing::{debug, error, info, instrument};

use crate::api::{ApiError, HelpdeskApi};
use crate::sink::{IndicatorId, MessageSink};

/// Shown in place of a reply whenever any request in a submission fails.
pub const ERROR_MESSAGE: &str =
    "Sorry, there was an error processing your request. Please try again.";

/// Whether a submission is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Sending,
}

/// What a call to [`ChatController::submit`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was blank after trimming; nothing happened.
    Ignored,
    /// Another submission was in flight; this one was discarded.
    Dropped,
    /// The bot replied and no ticket was needed.
    Answered,
    /// The bot asked for a ticket and the save call succeeded.
    ///
    /// `created` mirrors the server's `complaintCreated`; `ticket` is the
    /// number it returned, which may be missing even when one was created.
    Escalated {
        created: bool,
        ticket: Option<String>,
    },
    /// A request failed and the apology message was shown.
    Failed,
}

/// Input events a front end feeds to [`ChatController::listen`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The user submitted the chat form with this raw input.
    Submit(String),
    /// The chat view is going away; stop listening.
    Close,
}

#[derive(Debug, Default)]
struct Session {
    state: SubmissionState,
    history: Vec<ChatLogEntry>,
}

/// Resets the session to [`SubmissionState::Idle`] when dropped, however the
/// submission ended.
struct SendingGuard<'a> {
    session: &'a Mutex<Session>,
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        lock(self.session).state = SubmissionState::Idle;
    }
}

fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drives one chat session: renders messages, talks to the chat endpoint, and
/// escalates to a support ticket when the assistant asks for one.
///
/// At most one submission is in flight at a time. Submissions arriving while
/// one is pending are dropped, not queued.
pub struct ChatController {
    api: Arc<dyn HelpdeskApi>,
    sink: Arc<dyn MessageSink>,
    greeting: String,
    session: Mutex<Session>,
}

impl fmt::Debug for ChatController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = lock(&self.session);
        f.debug_struct("ChatController")
            .field("state", &session.state)
            .field("history_len", &session.history.len())
            .finish_non_exhaustive()
    }
}

impl ChatController {
    pub fn new(api: Arc<dyn HelpdeskApi>, sink: Arc<dyn MessageSink>) -> Self {
        Self {
            api,
            sink,
            greeting: DEFAULT_GREETING.to_string(),
            session: Mutex::new(Session::default()),
        }
    }

    /// Replace the message [`ChatController::start`] renders.
    #[must_use]
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Open the session by rendering the greeting.
    pub fn start(&self) {
        let greeting = self.greeting.clone();
        self.add_message(greeting, Sender::Bot);
    }

    /// Current submission state.
    #[must_use]
    pub fn state(&self) -> SubmissionState {
        lock(&self.session).state
    }

    /// Copy of the transcript so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<ChatLogEntry> {
        lock(&self.session).history.clone()
    }

    /// Append a message to the transcript and the sink, then scroll to it.
    ///
    /// Empty text is rendered as-is; callers filter blank input.
    pub fn add_message(&self, message: impl Into<String>, sender: Sender) -> ChatLogEntry {
        let entry = ChatLogEntry::new(message, sender);
        lock(&self.session).history.push(entry.clone());
        self.sink.render_message(&entry);
        self.sink.scroll_to_latest();
        entry
    }

    /// Consume UI events until [`UiEvent::Close`] arrives or the channel closes.
    ///
    /// Each submission runs on its own task so that one arriving while another
    /// is in flight hits the busy check and is dropped. Submissions already
    /// running are allowed to finish before this returns.
    pub async fn listen(self: Arc<Self>, mut events: mpsc::Receiver<UiEvent>) {
        let mut in_flight = JoinSet::new();

        while let Some(event) = events.recv().await {
            match event {
                UiEvent::Submit(input) => {
                    let controller = Arc::clone(&self);
                    in_flight.spawn(async move { controller.submit(&input).await });
                }
                UiEvent::Close => break,
            }
            // Reap finished submissions so the set does not grow with the session
            while in_flight.try_join_next().is_some() {}
        }

        while in_flight.join_next().await.is_some() {}
        debug!("chat listener stopped");
    }

    /// Handle one form submission.
    #[instrument(skip_all)]
    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        let message = input.trim();
        if message.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let Some(_guard) = self.try_begin() else {
            debug!("submission dropped while another is in flight");
            return SubmitOutcome::Dropped;
        };

        self.sink.clear_input();
        self.add_message(message, Sender::User);
        let mut indicator = Some(self.sink.show_typing_indicator());

        match self.exchange(message, &mut indicator).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(error = %err, "chat submission failed");
                if let Some(id) = indicator.take() {
                    self.sink.remove_typing_indicator(id);
                }
                self.add_message(ERROR_MESSAGE, Sender::Bot);
                SubmitOutcome::Failed
            }
        }
    }

    fn try_begin(&self) -> Option<SendingGuard<'_>> {
        let mut session = lock(&self.session);
        match session.state {
            SubmissionState::Sending => None,
            SubmissionState::Idle => {
                session.state = SubmissionState::Sending;
                Some(SendingGuard {
                    session: &self.session,
                })
            }
        }
    }

    async fn exchange(
        &self,
        message: &str,
        indicator: &mut Option<IndicatorId>,
    ) -> Result<SubmitOutcome, ApiError> {
        let reply = self
            .api
            .send_chat(&ChatRequest {
                message: message.to_string(),
            })
            .await?;

        if let Some(id) = indicator.take() {
            self.sink.remove_typing_indicator(id);
        }
        self.add_message(reply.response, Sender::Bot);

        if !reply.requires_complaint {
            return Ok(SubmitOutcome::Answered);
        }

        info!("assistant could not resolve the issue, opening a ticket");
        let saved = self.api.save_chat(&self.escalation_request(message)).await?;

        if !saved.complaint_created {
            return Ok(SubmitOutcome::Escalated {
                created: false,
                ticket: None,
            });
        }

        self.add_message(ticket_message(&saved), Sender::Bot);
        Ok(SubmitOutcome::Escalated {
            created: true,
            ticket: saved.complaint_no,
        })
    }

    fn escalation_request(&self, issue: &str) -> SaveChatRequest {
        let chat_history = self.history();
        // Advice is a bot entry after the first user message (so never the
        // greeting) and before the reply that asked for the ticket
        let troubleshooting_steps = chat_history
            .iter()
            .position(|entry| entry.is_user)
            .and_then(|first_user| chat_history.get(first_user..chat_history.len() - 1))
            .and_then(|window| window.iter().rev().find(|entry| !entry.is_user))
            .map(|entry| entry.message.clone())
            .unwrap_or_default();

        SaveChatRequest {
            issue: issue.to_string(),
            chat_history,
            troubleshooting_steps,
        }
    }
}

fn ticket_message(saved: &SaveChatResponse) -> String {
    let number = saved.complaint_no.as_deref().unwrap_or("unavailable");
    let mut text =
        format!("I've created a support ticket for you. Your complaint number is: {number}");
    if let Some(technician) = &saved.assigned_technician {
        let _ = write!(text, "\nAssigned technician: {technician}");
    }
    text
}
