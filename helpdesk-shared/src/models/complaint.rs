use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Display color used for statuses the client does not recognize.
pub const FALLBACK_STATUS_COLOR: &str = "secondary";

/// Lifecycle states a complaint can be shown in.
///
/// Parsing is case-sensitive and only accepts the snake-case wire names.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
    Escalated,
}

impl ComplaintStatus {
    /// Bootstrap-style color name used when rendering this status.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Pending => "warning",
            Self::InProgress => "primary",
            Self::Resolved => "success",
            Self::Escalated => "danger",
        }
    }
}

/// A username reference nested in complaint payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub username: String,
}

/// A comment left on a complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintComment {
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user: Option<UserRef>,
}

/// Response body for `GET /api/complaints/{id}`.
///
/// Every field is optional; anything the server adds beyond these lands in
/// [`ComplaintDetails::extra`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplaintDetails {
    #[serde(default)]
    pub complaint_no: Option<String>,
    #[serde(default)]
    pub issue: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    /// ISO-8601 creation time, usually without an offset.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub technician: Option<UserRef>,
    #[serde(default)]
    pub employee_name: Option<String>,
    #[serde(default)]
    pub employee_designation: Option<String>,
    #[serde(default)]
    pub employee_department: Option<String>,
    #[serde(default)]
    pub troubleshooting_steps: Option<String>,
    #[serde(default)]
    pub resolution_attempted: bool,
    #[serde(default)]
    pub comments: Vec<ComplaintComment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request body for `POST /api/complaints/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub complaint_no: String,
    pub status: String,
}

/// Request body for `POST /api/complaints/comment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRequest {
    pub complaint_no: String,
    pub comment: String,
}

/// `{success: bool}` acknowledgement; a missing flag reads as `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    #[serde(default)]
    pub success: bool,
}
