pub mod chat;
pub mod complaint;
pub mod errors;
pub mod timestamp;

pub use chat::{ChatLogEntry, ChatReply, ChatRequest, SaveChatRequest, SaveChatResponse, Sender};
pub use complaint::{
    CommentRequest, ComplaintComment, ComplaintDetails, ComplaintStatus, FALLBACK_STATUS_COLOR,
    StatusUpdateRequest, SuccessResponse, UserRef,
};
pub use errors::ErrorResponse;
pub use timestamp::Timestamp;
