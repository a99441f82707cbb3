use async_trait::async_trait;

use crate::domain::user::events::ActivationIssuedEvent;
use crate::domain::user::events::PasswordResetIssuedEvent;
use crate::domain::user::events::UserEvent;
use crate::user::errors::NotifierError;
use crate::user::ports::UserNotifier;

/// Notifier that only records issuance in the service log.
///
/// Keys are never written to the log. Deployments that deliver keys to users
/// (mail, message queue) provide their own `UserNotifier`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }

    fn record(&self, event: &UserEvent) {
        tracing::info!(
            event_id = event.event_id(),
            event_type = event.event_type(),
            user_id = event.user_id(),
            "One-time key issued"
        );
    }
}

#[async_trait]
impl UserNotifier for LogNotifier {
    async fn activation_issued(&self, event: &ActivationIssuedEvent) -> Result<(), NotifierError> {
        self.record(&event.clone().into());
        Ok(())
    }

    async fn password_reset_issued(
        &self,
        event: &PasswordResetIssuedEvent,
    ) -> Result<(), NotifierError> {
        self.record(&event.clone().into());
        Ok(())
    }
}
