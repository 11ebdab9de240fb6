//! Tests for the HTTP client
//!
//! Each test runs an axum router on a loopback port and points a real
//! [`HelpdeskClient`] at it.

#[cfg(test)]
mod tests {
    use crate::api::{ApiError, HelpdeskApi, HelpdeskClient};
    use axum::{
        Json, Router,
        extract::Path,
        http::{HeaderMap, StatusCode, header},
        response::IntoResponse,
        routing::{get, post},
    };
    use serde_json::{Value, json};
    use shared::config::client::Config;
    use shared::models::{
        ChatLogEntry, ChatRequest, CommentRequest, SaveChatRequest, Sender, StatusUpdateRequest,
    };
    use url::Url;

    async fn spawn_backend(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/")).unwrap()
    }

    fn client_for(base: &Url) -> HelpdeskClient {
        HelpdeskClient::new(base, "helpdesk-test").unwrap()
    }

    #[tokio::test]
    async fn test_send_chat_round_trip() {
        let router = Router::new().route(
            "/api/chat",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "response": format!("You said: {}", body["message"].as_str().unwrap_or("")),
                    "requiresComplaint": false
                }))
            }),
        );
        let base = spawn_backend(router).await;

        let reply = client_for(&base)
            .send_chat(&ChatRequest {
                message: "hi".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(reply.response, "You said: hi");
        assert!(!reply.requires_complaint);
    }

    #[tokio::test]
    async fn test_save_chat_sends_history() {
        let router = Router::new().route(
            "/api/chat/save",
            post(|Json(body): Json<Value>| async move {
                let count = body["chatHistory"].as_array().map_or(0, Vec::len);
                Json(json!({
                    "complaintCreated": body["issue"] == "monitor flickers"
                        && body.get("troubleshooting_steps").is_some(),
                    "complaintNo": format!("TCK-{count}")
                }))
            }),
        );
        let base = spawn_backend(router).await;

        let response = client_for(&base)
            .save_chat(&SaveChatRequest {
                issue: "monitor flickers".to_string(),
                chat_history: vec![
                    ChatLogEntry::new("monitor flickers", Sender::User),
                    ChatLogEntry::new("Try another cable", Sender::Bot),
                ],
                troubleshooting_steps: String::new(),
            })
            .await
            .unwrap();

        assert!(response.complaint_created);
        assert_eq!(response.complaint_no.as_deref(), Some("TCK-2"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let router = Router::new().route(
            "/api/chat/save",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "No technicians available"})),
                )
            }),
        );
        let base = spawn_backend(router).await;

        let err = client_for(&base)
            .save_chat(&SaveChatRequest {
                issue: "x".to_string(),
                chat_history: Vec::new(),
                troubleshooting_steps: String::new(),
            })
            .await
            .unwrap_err();

        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(message.as_deref(), Some("No technicians available"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let router = Router::new().route("/api/chat", post(|| async { "definitely not json" }));
        let base = spawn_backend(router).await;

        let err = client_for(&base)
            .send_chat(&ChatRequest {
                message: "hi".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_connection_failure_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let base = Url::parse(&format!("http://{addr}/")).unwrap();

        let err = client_for(&base)
            .send_chat(&ChatRequest {
                message: "hi".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_complaint_details_path_and_payload() {
        let router = Router::new().route(
            "/api/complaints/{id}",
            get(|Path(id): Path<String>| async move {
                Json(json!({
                    "complaint_no": id,
                    "status": "in_progress",
                    "technician": {"username": "tech1"}
                }))
            }),
        );
        let base = spawn_backend(router).await;

        let details = client_for(&base).complaint_details("42").await.unwrap();

        assert_eq!(details.complaint_no.as_deref(), Some("42"));
        assert_eq!(details.status.as_deref(), Some("in_progress"));
        assert_eq!(details.technician.unwrap().username, "tech1");
    }

    #[tokio::test]
    async fn test_status_and_comment_endpoints() {
        let router = Router::new()
            .route(
                "/api/complaints/status",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({"success": body["status"] == "resolved"}))
                }),
            )
            .route(
                "/api/complaints/comment",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({"success": body["comment"].as_str().is_some_and(|c| !c.is_empty())}))
                }),
            );
        let base = spawn_backend(router).await;
        let client = client_for(&base);

        let resolved = client
            .update_complaint_status(&StatusUpdateRequest {
                complaint_no: "42".to_string(),
                status: "resolved".to_string(),
            })
            .await
            .unwrap();
        assert!(resolved.success);

        let commented = client
            .add_complaint_comment(&CommentRequest {
                complaint_no: "42".to_string(),
                comment: String::new(),
            })
            .await
            .unwrap();
        assert!(!commented.success);
    }

    #[tokio::test]
    async fn test_server_cookies_persist_between_requests() {
        let router = Router::new().route(
            "/api/chat",
            post(|headers: HeaderMap| async move {
                let cookie = headers
                    .get(header::COOKIE)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                (
                    [(header::SET_COOKIE, "session=step1; Path=/")],
                    Json(json!({"response": cookie})),
                )
                    .into_response()
            }),
        );
        let base = spawn_backend(router).await;
        let client = client_for(&base);
        let request = ChatRequest {
            message: "hi".to_string(),
        };

        let first = client.send_chat(&request).await.unwrap();
        let second = client.send_chat(&request).await.unwrap();

        assert_eq!(first.response, "");
        assert_eq!(second.response, "session=step1");
    }

    #[tokio::test]
    async fn test_configured_session_cookie_is_sent() {
        let router = Router::new().route(
            "/api/chat",
            post(|headers: HeaderMap| async move {
                let cookie = headers
                    .get(header::COOKIE)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                Json(json!({"response": cookie}))
            }),
        );
        let base = spawn_backend(router).await;
        let mut config = Config::with_defaults();
        config.base_url = base;
        config.session_cookie = Some("session=from-config".to_string());

        let reply = HelpdeskClient::from_config(&config)
            .unwrap()
            .send_chat(&ChatRequest {
                message: "hi".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(reply.response, "session=from-config");
    }

    #[tokio::test]
    async fn test_base_path_prefix_is_preserved() {
        let router = Router::new().route(
            "/helpdesk/api/chat",
            post(|| async { Json(json!({"response": "prefixed"})) }),
        );
        let base = spawn_backend(router).await;
        let prefixed = base.join("helpdesk").unwrap();

        let client = client_for(&prefixed);
        assert!(client.api_base().as_str().ends_with("/helpdesk/api/"));

        let reply = client
            .send_chat(&ChatRequest {
                message: "hi".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(reply.response, "prefixed");
    }
}
