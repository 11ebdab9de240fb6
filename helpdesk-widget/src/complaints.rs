use std::{fmt, sync::Arc};

use shared::models::{CommentRequest, ComplaintDetails, StatusUpdateRequest};
use tracing::{error, info};

use crate::api::HelpdeskApi;
use crate::notification::{BannerKind, NotificationBoard};

/// Thin wrappers around the complaint endpoints.
///
/// Failures never propagate: they are logged, announced with a danger banner,
/// and reported as `None`/`false`.
#[derive(Clone)]
pub struct ComplaintDesk {
    api: Arc<dyn HelpdeskApi>,
    notifications: NotificationBoard,
}

impl fmt::Debug for ComplaintDesk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComplaintDesk")
            .field("notifications", &self.notifications)
            .finish_non_exhaustive()
    }
}

impl ComplaintDesk {
    pub fn new(api: Arc<dyn HelpdeskApi>, notifications: NotificationBoard) -> Self {
        Self { api, notifications }
    }

    /// Fetch a complaint by ticket id.
    pub async fn view_details(&self, complaint_no: &str) -> Option<ComplaintDetails> {
        match self.api.complaint_details(complaint_no).await {
            Ok(details) => Some(details),
            Err(err) => {
                error!(complaint_no, error = %err, "error fetching complaint details");
                self.notifications
                    .show("Error loading complaint details", BannerKind::Danger);
                None
            }
        }
    }

    /// Ask the server to move a complaint to `status`. Returns whether it agreed.
    pub async fn update_status(&self, complaint_no: &str, status: &str) -> bool {
        let request = StatusUpdateRequest {
            complaint_no: complaint_no.to_string(),
            status: status.to_string(),
        };
        match self.api.update_complaint_status(&request).await {
            Ok(response) if response.success => {
                info!(complaint_no, status, "complaint status updated");
                self.notifications
                    .show("Status updated successfully", BannerKind::Success);
                true
            }
            Ok(_) => false,
            Err(err) => {
                error!(complaint_no, error = %err, "error updating status");
                self.notifications
                    .show("Error updating status", BannerKind::Danger);
                false
            }
        }
    }

    /// Attach a comment to a complaint. Returns whether the server accepted it.
    pub async fn add_comment(&self, complaint_no: &str, comment: &str) -> bool {
        let request = CommentRequest {
            complaint_no: complaint_no.to_string(),
            comment: comment.to_string(),
        };
        match self.api.add_complaint_comment(&request).await {
            Ok(response) if response.success => {
                info!(complaint_no, "comment added");
                self.notifications
                    .show("Comment added successfully", BannerKind::Success);
                true
            }
            Ok(_) => false,
            Err(err) => {
                error!(complaint_no, error = %err, "error adding comment");
                self.notifications
                    .show("Error adding comment", BannerKind::Danger);
                false
            }
        }
    }
}
