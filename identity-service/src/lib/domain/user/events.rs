use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::models::User;

/// Envelope for user notifications that carry a one-time key.
#[derive(Debug, Clone)]
pub enum UserEvent {
    ActivationIssued(ActivationIssuedEvent),
    PasswordResetIssued(PasswordResetIssuedEvent),
}

impl UserEvent {
    /// Extract the unique event identifier.
    pub fn event_id(&self) -> &str {
        match self {
            UserEvent::ActivationIssued(e) => &e.event_id,
            UserEvent::PasswordResetIssued(e) => &e.event_id,
        }
    }

    /// Get the event type name.
    ///
    /// # Returns
    /// Event type string ("activation_issued" or "password_reset_issued")
    pub fn event_type(&self) -> &str {
        match self {
            UserEvent::ActivationIssued(_) => "activation_issued",
            UserEvent::PasswordResetIssued(_) => "password_reset_issued",
        }
    }

    /// Extract the user ID this event relates to.
    pub fn user_id(&self) -> &str {
        match self {
            UserEvent::ActivationIssued(e) => &e.user_id,
            UserEvent::PasswordResetIssued(e) => &e.user_id,
        }
    }
}

/// Raised after signup, so the new user can be sent their activation link.
#[derive(Clone)]
pub struct ActivationIssuedEvent {
    pub event_id: String,
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub activation_key: String,
    pub issued_at: DateTime<Utc>,
}

impl ActivationIssuedEvent {
    /// Create a new ActivationIssued event from a freshly signed-up user.
    ///
    /// # Arguments
    /// * `user` - User entity holding the activation key
    /// * `activation_key` - Key the user must present to activate
    pub fn new(user: &User, activation_key: String) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            user_id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            username: user.username.as_str().to_string(),
            activation_key,
            issued_at: Utc::now(),
        }
    }
}

impl fmt::Debug for ActivationIssuedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivationIssuedEvent")
            .field("event_id", &self.event_id)
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("activation_key", &"***")
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// Raised when a password reset is requested.
#[derive(Clone)]
pub struct PasswordResetIssuedEvent {
    pub event_id: String,
    pub user_id: String,
    pub email: String,
    pub reset_key: String,
    pub issued_at: DateTime<Utc>,
}

impl PasswordResetIssuedEvent {
    /// Create a new PasswordResetIssued event.
    ///
    /// # Arguments
    /// * `user` - User entity the reset was issued for
    /// * `reset_key` - Key authorizing the password change
    pub fn new(user: &User, reset_key: String) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            user_id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            reset_key,
            issued_at: Utc::now(),
        }
    }
}

impl fmt::Debug for PasswordResetIssuedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordResetIssuedEvent")
            .field("event_id", &self.event_id)
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("reset_key", &"***")
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

impl From<ActivationIssuedEvent> for UserEvent {
    fn from(event: ActivationIssuedEvent) -> Self {
        UserEvent::ActivationIssued(event)
    }
}

impl From<PasswordResetIssuedEvent> for UserEvent {
    fn from(event: PasswordResetIssuedEvent) -> Self {
        UserEvent::PasswordResetIssued(event)
    }
}
