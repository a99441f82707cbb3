use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for caller-supplied password validation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password must not be empty")]
    Empty,
}

/// Error for notification delivery
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    #[error("Failed to deliver notification: {0}")]
    DeliveryFailed(String),
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordError),

    // Not found
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("User not found with email: {0}")]
    NotFoundByEmail(String),

    // Conflicts
    #[error("Username already exists: {0}")]
    UsernameAlreadyExists(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    // Infrastructure errors
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl UserError {
    /// Caller misuse: malformed identifiers or an empty password.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            UserError::InvalidUserId(_)
                | UserError::InvalidUsername(_)
                | UserError::InvalidEmail(_)
                | UserError::InvalidPassword(_)
        )
    }

    /// The write would break email or username uniqueness.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            UserError::UsernameAlreadyExists(_) | UserError::EmailAlreadyExists(_)
        )
    }
}

impl From<auth::PasswordError> for UserError {
    fn from(err: auth::PasswordError) -> Self {
        UserError::Hashing(err.to_string())
    }
}

impl From<auth::TokenError> for UserError {
    fn from(err: auth::TokenError) -> Self {
        UserError::TokenGeneration(err.to_string())
    }
}
