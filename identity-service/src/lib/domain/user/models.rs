use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::PasswordError;
use crate::user::errors::UserIdError;
use crate::user::errors::UsernameError;

/// User aggregate entity.
///
/// Represents an account known to the wiki. Secrets are only ever stored in
/// their derived form (`password_hash`) or as opaque one-time keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub username: Username,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_editor: bool,
    pub is_activated: bool,
    pub activation_key: Option<String>,
    pub password_reset_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the user carries the given role flag.
    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::Admin => self.is_admin,
            Role::Editor => self.is_editor,
        }
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Arguments
    /// * `s` - UUID string to parse
    ///
    /// # Returns
    /// Parsed UserId
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }

    /// The all-zero identifier, never assigned to a user.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-32 characters and contains only alphanumeric, underscore, and hyphen.
/// Case is kept as entered; uniqueness is decided on [`Username::normalized`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// Validates length and character constraints.
    ///
    /// # Arguments
    /// * `username` - Raw username string
    ///
    /// # Returns
    /// Validated Username value object
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 32 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased form used for uniqueness comparisons.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// Case-insensitive comparison.
    pub fn matches(&self, other: &Username) -> bool {
        self.normalized() == other.normalized()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. The address is
/// trimmed and lower-cased on construction, which makes equality between two
/// `EmailAddress` values case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Returns
    /// Validated, normalized EmailAddress value object
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password supplied by a caller.
///
/// Only exists long enough to be hashed or verified; never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Accept a new password.
    ///
    /// # Errors
    /// * `Empty` - Password is empty
    pub fn new(password: String) -> Result<Self, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::Empty);
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Capability flags tracked on a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Editor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Editor => f.write_str("editor"),
        }
    }
}

/// Command to add an already-active user (administrative path).
#[derive(Debug)]
pub struct AddUserCommand {
    pub email: EmailAddress,
    pub username: Username,
    pub password: Password,
    pub is_admin: bool,
    pub is_editor: bool,
}

impl AddUserCommand {
    /// Construct a new add user command.
    ///
    /// # Arguments
    /// * `email` - Validated email address
    /// * `username` - Validated username
    /// * `password` - Plain text password (will be hashed by the store)
    /// * `is_admin` - Admin flag
    /// * `is_editor` - Editor flag
    pub fn new(
        email: EmailAddress,
        username: Username,
        password: Password,
        is_admin: bool,
        is_editor: bool,
    ) -> Self {
        Self {
            email,
            username,
            password,
            is_admin,
            is_editor,
        }
    }
}

/// Command to register a user who must activate before use.
#[derive(Debug)]
pub struct SignupCommand {
    pub email: EmailAddress,
    pub username: Username,
    pub password: Password,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

/// Command to change a user's identity and display names.
///
/// The user is referenced by id; every field is applied together or not at all.
#[derive(Debug)]
pub struct UpdateUserCommand {
    pub id: UserId,
    pub email: EmailAddress,
    pub username: Username,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl UpdateUserCommand {
    /// Start an update that keeps the user's current values.
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
        }
    }
}
