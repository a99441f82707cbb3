use async_trait::async_trait;

use crate::domain::user::events::ActivationIssuedEvent;
use crate::domain::user::events::PasswordResetIssuedEvent;
use crate::domain::user::models::AddUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::NotifierError;
use crate::user::errors::UserError;

/// Port for credential store operations.
///
/// Boolean results report expected outcomes (wrong password, unknown key);
/// `Err` carries validation failures, uniqueness conflicts and infrastructure faults.
#[async_trait]
pub trait CredentialStorePort: Send + Sync + 'static {
    /// Add an active user directly (administrative path).
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn add_user(&self, command: AddUserCommand) -> Result<User, UserError>;

    /// Retrieve user by email address.
    async fn get_user(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Retrieve user by identifier. The nil id is never found.
    async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve the user holding a pending password reset key.
    async fn get_user_by_reset_key(&self, key: &str) -> Result<Option<User>, UserError>;

    /// Every user, newest first.
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Change email, username and names together, or not at all.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email belongs to another user
    /// * `UsernameAlreadyExists` - New username belongs to another user
    async fn update_user(&self, command: UpdateUserCommand) -> Result<User, UserError>;

    /// Remove a user.
    ///
    /// # Returns
    /// True if a user was removed, false if none had that email
    async fn delete_user(&self, email: &EmailAddress) -> Result<bool, UserError>;

    /// Check an email/password pair. Unknown emails and wrong passwords are
    /// indistinguishable to the caller.
    async fn authenticate(&self, email: &EmailAddress, password: &str) -> Result<bool, UserError>;

    /// Set a new password without checking the old one.
    ///
    /// # Returns
    /// False if no user has that email
    ///
    /// # Errors
    /// * `InvalidPassword` - New password is empty
    async fn change_password(
        &self,
        email: &EmailAddress,
        new_password: &str,
    ) -> Result<bool, UserError>;

    /// Set a new password after verifying the current one.
    ///
    /// # Returns
    /// False if the user is unknown or `old_password` does not verify
    ///
    /// # Errors
    /// * `InvalidPassword` - New password is empty
    async fn change_password_verified(
        &self,
        email: &EmailAddress,
        old_password: &str,
        new_password: &str,
    ) -> Result<bool, UserError>;

    /// Issue a password reset key and record it on the user.
    ///
    /// # Errors
    /// * `NotFoundByEmail` - No user has that email
    async fn reset_password(&self, email: &EmailAddress) -> Result<String, UserError>;

    /// Consume a reset key and set the new password.
    ///
    /// # Returns
    /// False if no user holds that key
    ///
    /// # Errors
    /// * `InvalidPassword` - New password is empty
    async fn complete_password_reset(
        &self,
        key: &str,
        new_password: &str,
    ) -> Result<bool, UserError>;

    /// Register an inactive user and return their activation key.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `UsernameAlreadyExists` - Username is already taken
    async fn signup(&self, command: SignupCommand) -> Result<String, UserError>;

    /// Activate the user holding `key`.
    ///
    /// # Returns
    /// False if no user holds that key
    async fn activate_user(&self, key: &str) -> Result<bool, UserError>;

    /// Flip the admin flag. No-op for an unknown email.
    async fn toggle_admin(&self, email: &EmailAddress) -> Result<(), UserError>;

    /// Flip the editor flag. No-op for an unknown email.
    async fn toggle_editor(&self, email: &EmailAddress) -> Result<(), UserError>;

    async fn list_admins(&self) -> Result<Vec<User>, UserError>;

    async fn list_editors(&self) -> Result<Vec<User>, UserError>;

    async fn user_exists(&self, email: &EmailAddress) -> Result<bool, UserError>;

    async fn username_exists(&self, username: &Username) -> Result<bool, UserError>;

    /// False for an unknown email.
    async fn is_admin(&self, email: &EmailAddress) -> Result<bool, UserError>;

    /// False for an unknown email.
    async fn is_editor(&self, email: &EmailAddress) -> Result<bool, UserError>;
}

/// Persistence operations for user aggregate.
///
/// Implementations must reject a `create` or `update` that would give two
/// users the same email or the same (case-insensitive) username, and must
/// apply each write atomically.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Retrieve user by username, ignoring case.
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Retrieve the user whose pending activation key equals `key`.
    async fn find_by_activation_key(&self, key: &str) -> Result<Option<User>, UserError>;

    /// Retrieve the user whose pending reset key equals `key`.
    async fn find_by_reset_key(&self, key: &str) -> Result<Option<User>, UserError>;

    /// Set `password_hash` on the user holding reset `key` and clear the key,
    /// in one atomic write. Of several concurrent callers with the same key,
    /// at most one gets the user back.
    ///
    /// # Returns
    /// The updated user, or None if no user holds `key`
    async fn consume_reset_key(
        &self,
        key: &str,
        password_hash: &str,
    ) -> Result<Option<User>, UserError>;

    /// Activate the user holding activation `key` and clear the key, in one
    /// atomic write.
    ///
    /// # Returns
    /// The activated user, or None if no user holds `key`
    async fn consume_activation_key(&self, key: &str) -> Result<Option<User>, UserError>;

    /// Retrieve all users from storage, newest first.
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Retrieve users carrying a role flag.
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserError>;

    /// Replace every stored field of an existing user in one write.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}

/// Delivery of one-time keys to their owners (email, queue, log...).
#[async_trait]
pub trait UserNotifier: Send + Sync + 'static {
    /// A user signed up and must activate.
    async fn activation_issued(&self, event: &ActivationIssuedEvent) -> Result<(), NotifierError>;

    /// A user requested a password reset.
    async fn password_reset_issued(
        &self,
        event: &PasswordResetIssuedEvent,
    ) -> Result<(), NotifierError>;
}
