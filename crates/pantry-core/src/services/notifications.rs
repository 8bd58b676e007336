//! User-to-user push notifications (`sendNotificationTo`).

use std::sync::Arc;

use crate::domain::{NotificationRequest, PresentationHints, RecipientId, non_empty};
use crate::error::{OperationFailure, RequestError};
use crate::ports::{IdentityProvider, PushDelivery, TelemetrySink};
use crate::telemetry::{Operation, RequestTelemetry};

/// Sends a notification from the calling user to another user.
pub struct NotificationDispatcher {
    identities: Arc<dyn IdentityProvider>,
    push: Arc<dyn PushDelivery>,
    telemetry: Arc<dyn TelemetrySink>,
    hints: PresentationHints,
}

impl NotificationDispatcher {
    pub fn new(
        identities: Arc<dyn IdentityProvider>,
        push: Arc<dyn PushDelivery>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            identities,
            push,
            telemetry,
            hints: PresentationHints::default(),
        }
    }

    #[must_use]
    pub fn with_hints(mut self, hints: PresentationHints) -> Self {
        self.hints = hints;
        self
    }

    /// Returns `true` once the push provider accepted the notification.
    ///
    /// An absent or empty `message` is sent as an empty message.
    pub async fn send_notification_to(
        &self,
        caller: Option<&str>,
        recipient: Option<&str>,
        message: Option<&str>,
    ) -> Result<bool, RequestError> {
        let caller = non_empty(caller);
        let scope = RequestTelemetry::start(
            Arc::clone(&self.telemetry),
            Operation::SendNotificationTo,
            caller,
            None,
        );

        let Some(caller) = caller else {
            scope.fail(RequestError::NotAuthenticated.to_string());
            return Err(RequestError::NotAuthenticated);
        };

        let recipient = match RecipientId::parse(recipient) {
            Ok(recipient) => recipient,
            Err(e) => {
                scope.fail(e.to_string());
                return Err(e);
            }
        };

        match self
            .dispatch(caller, recipient.clone(), message.unwrap_or_default())
            .await
        {
            Ok(()) => {
                scope.succeed(Some(format!(
                    "Sent notification to {recipient} from {caller}"
                )));
                Ok(true)
            }
            Err(failure) => {
                tracing::error!(
                    caller,
                    recipient = %recipient,
                    error = %failure,
                    "Failed to send notification"
                );
                scope.fail(format!(
                    "Error sending notification to another user: {failure}"
                ));
                Err(RequestError::Server)
            }
        }
    }

    async fn dispatch(
        &self,
        caller: &str,
        recipient: RecipientId,
        message: &str,
    ) -> Result<(), OperationFailure> {
        let sender = self.identities.get_identity(caller).await?;
        let notification =
            NotificationRequest::new(recipient, sender.display_name_or(caller), message)
                .with_hints(self.hints.clone());
        self.push.deliver(&notification).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Identity;
    use crate::ports::ProviderError;
    use crate::ports::identity::MockIdentityProvider;
    use crate::ports::push::MockPushDelivery;
    use crate::telemetry::Severity;
    use crate::testing::{InMemoryIdentities, RecordingPush, RecordingTelemetry};

    fn identities() -> Arc<InMemoryIdentities> {
        Arc::new(InMemoryIdentities::new(vec![
            Identity::new("ann", Some("Ann")),
            Identity::new("nameless", None),
            Identity::new("bob", Some("Bob")),
        ]))
    }

    #[tokio::test]
    async fn test_sends_titled_notification() {
        let push = Arc::new(RecordingPush::new());
        let telemetry = Arc::new(RecordingTelemetry::new());
        let dispatcher =
            NotificationDispatcher::new(identities(), push.clone(), telemetry.clone());

        let sent = dispatcher
            .send_notification_to(Some("ann"), Some("bob"), Some("Milk is gone"))
            .await;

        assert_eq!(sent, Ok(true));
        let delivered = push.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].recipient.as_str(), "bob");
        assert_eq!(delivered[0].title(), "Message from Ann");
        assert_eq!(delivered[0].message, "Milk is gone");
        assert_eq!(delivered[0].hints, PresentationHints::default());

        let events = telemetry.events();
        assert_eq!(telemetry.severities(), vec![Severity::Info, Severity::Success]);
        assert_eq!(
            events[1].description.as_deref(),
            Some("Sent notification to bob from ann")
        );
        assert_eq!(events[0].actor_user_id.as_deref(), Some("ann"));
    }

    #[tokio::test]
    async fn test_sender_falls_back_to_caller_id() {
        let push = Arc::new(RecordingPush::new());
        let dispatcher = NotificationDispatcher::new(
            identities(),
            push.clone(),
            Arc::new(RecordingTelemetry::new()),
        );

        dispatcher
            .send_notification_to(Some("nameless"), Some("bob"), None)
            .await
            .unwrap();

        let delivered = push.delivered();
        assert_eq!(delivered[0].title(), "Message from nameless");
        assert_eq!(delivered[0].message, "");
    }

    #[tokio::test]
    async fn test_unauthenticated_checked_before_anything_else() {
        let mut identities = MockIdentityProvider::new();
        identities.expect_get_identity().never();
        let mut push = MockPushDelivery::new();
        push.expect_deliver().never();
        let telemetry = Arc::new(RecordingTelemetry::new());
        let dispatcher =
            NotificationDispatcher::new(Arc::new(identities), Arc::new(push), telemetry.clone());

        // Missing recipient too, but authentication wins.
        let result = dispatcher.send_notification_to(None, None, None).await;

        assert_eq!(result, Err(RequestError::NotAuthenticated));
        assert_eq!(result.unwrap_err().to_string(), "User Not Logged In");
        let events = telemetry.events();
        assert_eq!(telemetry.severities(), vec![Severity::Info, Severity::Error]);
        assert_eq!(events[1].description.as_deref(), Some("User Not Logged In"));
    }

    #[tokio::test]
    async fn test_missing_recipient_never_reaches_push() {
        let mut identities = MockIdentityProvider::new();
        identities.expect_get_identity().never();
        let mut push = MockPushDelivery::new();
        push.expect_deliver().never();
        let telemetry = Arc::new(RecordingTelemetry::new());
        let dispatcher =
            NotificationDispatcher::new(Arc::new(identities), Arc::new(push), telemetry.clone());

        for recipient in [None, Some("")] {
            let result = dispatcher
                .send_notification_to(Some("ann"), recipient, Some("hi"))
                .await;
            assert_eq!(result, Err(RequestError::MissingRecipient));
        }

        let events = telemetry.events();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[1].description.as_deref(),
            Some("No Receiver UserID provided")
        );
    }

    #[tokio::test]
    async fn test_push_failure_is_flattened() {
        let mut push = MockPushDelivery::new();
        push.expect_deliver().times(1).returning(|_| {
            Err(ProviderError::Rejected {
                provider: "push",
                status: 400,
                message: "invalid app id".to_string(),
            })
        });
        let telemetry = Arc::new(RecordingTelemetry::new());
        let dispatcher = NotificationDispatcher::new(identities(), Arc::new(push), telemetry.clone());

        let result = dispatcher
            .send_notification_to(Some("ann"), Some("bob"), Some("hi"))
            .await;

        assert_eq!(result, Err(RequestError::Server));
        let events = telemetry.events();
        assert_eq!(telemetry.severities(), vec![Severity::Info, Severity::Error]);
        let description = events[1].description.as_deref().unwrap();
        assert!(description.starts_with("Error sending notification to another user: "));
        assert!(description.contains("invalid app id"));
    }

    #[tokio::test]
    async fn test_unknown_caller_is_server_error() {
        let push = Arc::new(RecordingPush::new());
        let dispatcher = NotificationDispatcher::new(
            identities(),
            push.clone(),
            Arc::new(RecordingTelemetry::new()),
        );

        let result = dispatcher
            .send_notification_to(Some("ghost"), Some("bob"), Some("hi"))
            .await;

        assert_eq!(result, Err(RequestError::Server));
        assert!(push.delivered().is_empty());
    }

    struct SlowPush;

    #[async_trait::async_trait]
    impl PushDelivery for SlowPush {
        async fn deliver(&self, _notification: &NotificationRequest) -> Result<(), ProviderError> {
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_cancelled_request_still_ends_with_error_event() {
        let telemetry = Arc::new(RecordingTelemetry::new());
        let dispatcher =
            NotificationDispatcher::new(identities(), Arc::new(SlowPush), telemetry.clone());

        let outcome = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            dispatcher.send_notification_to(Some("ann"), Some("bob"), Some("hi")),
        )
        .await;

        assert!(outcome.is_err());
        let events = telemetry.events();
        assert_eq!(telemetry.severities(), vec![Severity::Info, Severity::Error]);
        assert_eq!(events[1].description.as_deref(), Some("Request cancelled"));
    }
}
