//! Client naming actions: connect-check, delete and rename
//!
//! Each action validates its input first, then issues exactly one request
//! through [`ManagerApi`] and awaits it against the page session's
//! cancellation token. There are no retries.

use async_trait::async_trait;
use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::error::{ActionError, ApiError, ValidationError};
use crate::models::{ActionResponse, ConnectStatus, RenameRequest, StatsPayload};
use crate::navigation::Navigation;
use crate::session::PageSession;

/// Characters the backend cannot store in a client name
pub const FORBIDDEN_NAME_CHARS: &[char] = &['\'', '"', ',', '\\', '<', '>', ';'];

/// Longest accepted client name
pub const MAX_NAME_LEN: usize = 64;

const RENAME_FAILED: &str = "Failed to update client name.";
const DELETE_FAILED: &str = "Failed to delete client.";

/// Request/response contract of the manager backend
#[async_trait]
pub trait ManagerApi: Send + Sync {
    /// Ask the manager to try reaching the server
    async fn connect_check(&self) -> Result<ConnectStatus, ApiError>;

    async fn delete_client(&self, name: &str) -> Result<ActionResponse, ApiError>;

    async fn rename_client(&self, request: &RenameRequest) -> Result<ActionResponse, ApiError>;

    /// Statistics payload of one client
    async fn fetch_stats(&self, client_name: &str) -> Result<StatsPayload, ApiError>;
}

/// Trimmed name, or the reason it cannot be sent
pub fn validate_client_name(name: &str) -> Result<&str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::Empty);
    }
    if let Some(c) = name
        .chars()
        .find(|c| FORBIDDEN_NAME_CHARS.contains(c) || c.is_control())
    {
        return Err(ValidationError::ForbiddenCharacter(c));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong { max: MAX_NAME_LEN });
    }
    Ok(name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Server reachable, continue to the landing screen
    Connected(Navigation),
    Unreachable,
}

impl ConnectOutcome {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConnectOutcome::Connected(_) => "Connected successfully!",
            ConnectOutcome::Unreachable => "Connection attempt failed. Please try again.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { message: String },
    Rejected { message: String },
    Redirect(Navigation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed { new_name: String },
    Rejected { message: String },
    Redirect(Navigation),
}

/// Await `request` unless the session token fires first
pub async fn send_or_cancel<T, F>(cancel: &CancellationToken, request: F) -> Result<T, ActionError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ActionError::Cancelled),
        result = request => result.map_err(ActionError::from),
    }
}

/// Connect-check
pub async fn connect_check<A: ManagerApi + ?Sized>(
    api: &A,
    session: &PageSession,
) -> Result<ConnectOutcome, ActionError> {
    let _guard = session.begin_action()?;
    let result = send_or_cancel(session.cancel_token(), api.connect_check()).await;

    let outcome = finish(session, "connect", result)?;
    let outcome = if outcome.status {
        ConnectOutcome::Connected(Navigation::home())
    } else {
        ConnectOutcome::Unreachable
    };
    session.logger().log_action("connect", outcome.user_message());
    Ok(outcome)
}

/// Delete a client by name
pub async fn delete_client<A: ManagerApi + ?Sized>(
    api: &A,
    session: &PageSession,
    name: &str,
) -> Result<DeleteOutcome, ActionError> {
    let _guard = session.begin_action()?;
    let name = validate_client_name(name)?;

    let result = send_or_cancel(session.cancel_token(), api.delete_client(name)).await;
    let response = finish(session, "delete", result)?;

    let outcome = if let Some(target) = response.redirect.as_deref() {
        DeleteOutcome::Redirect(Navigation::from(target))
    } else if response.success {
        DeleteOutcome::Deleted {
            message: response
                .message
                .unwrap_or_else(|| format!("Client {} deleted successfully", name)),
        }
    } else {
        DeleteOutcome::Rejected {
            message: response.message.unwrap_or_else(|| DELETE_FAILED.to_string()),
        }
    };
    session.logger().log_action("delete", &format!("{:?}", outcome));
    Ok(outcome)
}

/// Rename a client; a backend redirect takes precedence over the result
pub async fn rename_client<A: ManagerApi + ?Sized>(
    api: &A,
    session: &PageSession,
    current_name: &str,
    new_name: &str,
) -> Result<RenameOutcome, ActionError> {
    let _guard = session.begin_action()?;
    let new_name = validate_client_name(new_name)?;
    if new_name == current_name.trim() {
        return Err(ValidationError::Unchanged.into());
    }

    let request = RenameRequest {
        current_name: current_name.trim().to_string(),
        new_name: new_name.to_string(),
    };
    let result = send_or_cancel(session.cancel_token(), api.rename_client(&request)).await;
    let response = finish(session, "rename", result)?;

    let outcome = if let Some(target) = response.redirect.as_deref() {
        RenameOutcome::Redirect(Navigation::from(target))
    } else if response.success {
        RenameOutcome::Renamed {
            new_name: request.new_name,
        }
    } else {
        RenameOutcome::Rejected {
            message: response.message.unwrap_or_else(|| RENAME_FAILED.to_string()),
        }
    };
    session.logger().log_action("rename", &format!("{:?}", outcome));
    Ok(outcome)
}

/// Fetch the stats payload for the session's client and build its charts
pub async fn load_stats<A: ManagerApi + ?Sized>(
    api: &A,
    session: &mut PageSession,
) -> Result<crate::session::LoadSummary, ActionError> {
    let client = session.client_name().to_string();
    let result = send_or_cancel(session.cancel_token(), api.fetch_stats(&client)).await;
    let payload = finish(session, "load_stats", result)?;
    Ok(session.load(payload))
}

fn finish<T>(
    session: &PageSession,
    action: &str,
    result: Result<T, ActionError>,
) -> Result<T, ActionError> {
    if let Err(e) = &result {
        session.logger().log_action_failed(action, &e.to_string());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartSettings;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Backend double that records every call
    #[derive(Default)]
    struct RecordingApi {
        calls: AtomicUsize,
        renames: Mutex<Vec<RenameRequest>>,
        response: ActionResponse,
        reachable: bool,
        delay: Option<Duration>,
    }

    impl RecordingApi {
        fn answering(response: ActionResponse) -> Self {
            Self {
                response,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        async fn respond<T>(&self, value: T) -> Result<T, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(value)
        }
    }

    #[async_trait]
    impl ManagerApi for RecordingApi {
        async fn connect_check(&self) -> Result<ConnectStatus, ApiError> {
            self.respond(ConnectStatus {
                status: self.reachable,
            })
            .await
        }

        async fn delete_client(&self, _name: &str) -> Result<ActionResponse, ApiError> {
            self.respond(self.response.clone()).await
        }

        async fn rename_client(&self, request: &RenameRequest) -> Result<ActionResponse, ApiError> {
            self.renames.lock().unwrap().push(request.clone());
            self.respond(self.response.clone()).await
        }

        async fn fetch_stats(&self, _client_name: &str) -> Result<StatsPayload, ApiError> {
            self.respond(StatsPayload::default()).await
        }
    }

    fn session() -> PageSession {
        PageSession::new("alice", ChartSettings::default())
    }

    #[test]
    fn test_validate_client_name() {
        assert_eq!(validate_client_name("  bob  "), Ok("bob"));
        assert_eq!(validate_client_name("   "), Err(ValidationError::Empty));
        assert_eq!(
            validate_client_name("o'brien"),
            Err(ValidationError::ForbiddenCharacter('\''))
        );
        assert_eq!(
            validate_client_name("a,b"),
            Err(ValidationError::ForbiddenCharacter(','))
        );
        assert_eq!(
            validate_client_name("tab\there"),
            Err(ValidationError::ForbiddenCharacter('\t'))
        );
        assert_eq!(
            validate_client_name("unit\u{1f}sep"),
            Err(ValidationError::ForbiddenCharacter('\u{1f}'))
        );
        assert!(matches!(
            validate_client_name(&"x".repeat(MAX_NAME_LEN + 1)),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[tokio::test]
    async fn test_rename_with_apostrophe_sends_nothing() {
        let api = RecordingApi::answering(ActionResponse {
            success: true,
            ..ActionResponse::default()
        });
        let session = session();

        let err = rename_client(&api, &session, "alice", "o'brien")
            .await
            .unwrap_err();

        assert!(err.is_local());
        assert!(err.to_string().contains('\''));
        assert_eq!(api.calls(), 0);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_rename_success() {
        let api = RecordingApi::answering(ActionResponse {
            success: true,
            ..ActionResponse::default()
        });
        let session = session();

        let outcome = rename_client(&api, &session, "alice", " alicia ").await.unwrap();

        assert_eq!(
            outcome,
            RenameOutcome::Renamed {
                new_name: "alicia".to_string()
            }
        );
        let sent = api.renames.lock().unwrap();
        assert_eq!(sent[0].current_name, "alice");
        assert_eq!(sent[0].new_name, "alicia");
    }

    #[tokio::test]
    async fn test_rename_rejected_uses_backend_message() {
        let api = RecordingApi::answering(ActionResponse {
            success: false,
            message: Some("Name is already used".to_string()),
            redirect: None,
        });

        let outcome = rename_client(&api, &session(), "alice", "bob").await.unwrap();
        assert_eq!(
            outcome,
            RenameOutcome::Rejected {
                message: "Name is already used".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_rename_rejected_default_message() {
        let api = RecordingApi::answering(ActionResponse::default());
        let outcome = rename_client(&api, &session(), "alice", "bob").await.unwrap();
        assert_eq!(
            outcome,
            RenameOutcome::Rejected {
                message: RENAME_FAILED.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_rename_honors_redirect() {
        let api = RecordingApi::answering(ActionResponse {
            success: false,
            message: None,
            redirect: Some("/loading".to_string()),
        });

        let outcome = rename_client(&api, &session(), "alice", "bob").await.unwrap();
        assert_eq!(outcome, RenameOutcome::Redirect(Navigation::loading()));
    }

    #[tokio::test]
    async fn test_rename_to_same_name() {
        let api = RecordingApi::default();
        let err = rename_client(&api, &session(), "alice", "alice").await.unwrap_err();
        assert!(matches!(err, ActionError::Validation(ValidationError::Unchanged)));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_empty_name_sends_nothing() {
        let api = RecordingApi::default();
        let err = delete_client(&api, &session(), "  ").await.unwrap_err();
        assert!(matches!(err, ActionError::Validation(ValidationError::Empty)));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_success_message() {
        let api = RecordingApi::answering(ActionResponse {
            success: true,
            ..ActionResponse::default()
        });
        let outcome = delete_client(&api, &session(), "bob").await.unwrap();
        assert_eq!(
            outcome,
            DeleteOutcome::Deleted {
                message: "Client bob deleted successfully".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_connect_check() {
        let api = RecordingApi {
            reachable: true,
            ..RecordingApi::default()
        };
        let outcome = connect_check(&api, &session()).await.unwrap();
        assert_eq!(outcome, ConnectOutcome::Connected(Navigation::home()));

        let api = RecordingApi::default();
        let outcome = connect_check(&api, &session()).await.unwrap();
        assert_eq!(outcome, ConnectOutcome::Unreachable);
        assert_eq!(outcome.user_message(), "Connection attempt failed. Please try again.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_pending_request() {
        let api = RecordingApi {
            delay: Some(Duration::from_secs(60)),
            ..RecordingApi::default()
        };
        let session = session();
        let token = session.cancel_token().clone();

        let (result, _) = tokio::join!(connect_check(&api, &session), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            token.cancel();
        });

        assert!(matches!(result, Err(ActionError::Cancelled)));
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_load_stats_builds_charts() {
        let api = RecordingApi::default();
        let mut session = session();

        let summary = load_stats(&api, &mut session).await.unwrap();
        assert_eq!(summary.cores, 0);
        assert!(session.payload().is_some());
    }
}
