use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenGenerator;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::user::events::ActivationIssuedEvent;
use crate::domain::user::events::PasswordResetIssuedEvent;
use crate::domain::user::models::AddUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::Role;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::CredentialStorePort;
use crate::user::ports::UserNotifier;
use crate::user::ports::UserRepository;

/// Credential store: owns user records and their secrets.
///
/// Every mutating operation runs its read-check-write sequence while holding
/// `write_lock`, so uniqueness and one-time-key invariants cannot be raced by
/// concurrent requests against the same store. Reads go straight to the
/// repository. Nothing is cached between calls.
pub struct CredentialStore<UR, UN>
where
    UR: UserRepository,
    UN: UserNotifier,
{
    repository: Arc<UR>,
    notifier: Arc<UN>,
    password_hasher: PasswordHasher,
    token_generator: TokenGenerator,
    write_lock: Mutex<()>,
}

impl<UR, UN> CredentialStore<UR, UN>
where
    UR: UserRepository,
    UN: UserNotifier,
{
    /// Create a new credential store with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `notifier` - Delivery of activation and reset keys
    ///
    /// # Returns
    /// Configured credential store instance
    pub fn new(repository: Arc<UR>, notifier: Arc<UN>) -> Self {
        Self {
            repository,
            notifier,
            password_hasher: PasswordHasher::new(),
            token_generator: TokenGenerator::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Fail if `email` or `username` belongs to a user other than `owner`.
    async fn ensure_available(
        &self,
        email: &EmailAddress,
        username: &Username,
        owner: Option<UserId>,
    ) -> Result<(), UserError> {
        if let Some(existing) = self.repository.find_by_email(email).await? {
            if Some(existing.id) != owner {
                return Err(UserError::EmailAlreadyExists(email.to_string()));
            }
        }

        if let Some(existing) = self.repository.find_by_username(username).await? {
            if Some(existing.id) != owner {
                return Err(UserError::UsernameAlreadyExists(username.to_string()));
            }
        }

        Ok(())
    }

    /// Hash `password` into `user`, drop any pending reset key and persist.
    async fn store_password(&self, mut user: User, password: &Password) -> Result<User, UserError> {
        user.password_hash = self.password_hasher.hash(password.expose())?;
        user.password_reset_key = None;

        self.repository.update(user).await
    }

    async fn toggle_role(&self, email: &EmailAddress, role: Role) -> Result<(), UserError> {
        let _guard = self.write_lock.lock().await;

        let Some(mut user) = self.repository.find_by_email(email).await? else {
            tracing::debug!(%role, "Role toggle ignored for unknown user");
            return Ok(());
        };

        match role {
            Role::Admin => user.is_admin = !user.is_admin,
            Role::Editor => user.is_editor = !user.is_editor,
        }

        let updated = self.repository.update(user).await?;
        tracing::info!(
            user_id = %updated.id,
            %role,
            is_admin = updated.is_admin,
            is_editor = updated.is_editor,
            "Role toggled"
        );

        Ok(())
    }
}

#[async_trait]
impl<UR, UN> CredentialStorePort for CredentialStore<UR, UN>
where
    UR: UserRepository,
    UN: UserNotifier,
{
    async fn add_user(&self, command: AddUserCommand) -> Result<User, UserError> {
        let _guard = self.write_lock.lock().await;

        self.ensure_available(&command.email, &command.username, None)
            .await?;

        let user = User {
            id: UserId::new(),
            email: command.email,
            username: command.username,
            firstname: None,
            lastname: None,
            password_hash: self.password_hasher.hash(command.password.expose())?,
            is_admin: command.is_admin,
            is_editor: command.is_editor,
            is_activated: true,
            activation_key: None,
            password_reset_key: None,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(
            user_id = %created_user.id,
            is_admin = created_user.is_admin,
            is_editor = created_user.is_editor,
            "User added"
        );

        Ok(created_user)
    }

    async fn get_user(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        self.repository.find_by_email(email).await
    }

    async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        if id.is_nil() {
            return Ok(None);
        }
        self.repository.find_by_id(id).await
    }

    async fn get_user_by_reset_key(&self, key: &str) -> Result<Option<User>, UserError> {
        if key.is_empty() {
            return Ok(None);
        }
        self.repository.find_by_reset_key(key).await
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn update_user(&self, command: UpdateUserCommand) -> Result<User, UserError> {
        let _guard = self.write_lock.lock().await;

        let mut user = self
            .repository
            .find_by_id(&command.id)
            .await?
            .ok_or(UserError::NotFound(command.id.to_string()))?;

        // Both checks pass before any field changes
        if let Err(e) = self
            .ensure_available(&command.email, &command.username, Some(user.id))
            .await
        {
            tracing::warn!(user_id = %user.id, error = %e, "User update rejected");
            return Err(e);
        }

        user.email = command.email;
        user.username = command.username;
        user.firstname = command.firstname;
        user.lastname = command.lastname;

        let updated_user = self.repository.update(user).await?;
        tracing::info!(user_id = %updated_user.id, "User updated");

        Ok(updated_user)
    }

    async fn delete_user(&self, email: &EmailAddress) -> Result<bool, UserError> {
        let _guard = self.write_lock.lock().await;

        let Some(user) = self.repository.find_by_email(email).await? else {
            return Ok(false);
        };

        match self.repository.delete(&user.id).await {
            Ok(()) => {
                tracing::info!(user_id = %user.id, "User deleted");
                Ok(true)
            }
            Err(UserError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn authenticate(&self, email: &EmailAddress, password: &str) -> Result<bool, UserError> {
        let Some(user) = self.repository.find_by_email(email).await? else {
            let authenticated = self.password_hasher.verify_absent(password);
            tracing::warn!("Authentication failed");
            return Ok(authenticated);
        };

        let password_matches = self.password_hasher.verify(password, &user.password_hash)?;
        let authenticated = password_matches && user.is_activated;

        if authenticated {
            tracing::debug!(user_id = %user.id, "Authentication succeeded");
        } else {
            tracing::warn!(user_id = %user.id, "Authentication failed");
        }

        Ok(authenticated)
    }

    async fn change_password(
        &self,
        email: &EmailAddress,
        new_password: &str,
    ) -> Result<bool, UserError> {
        let new_password = Password::new(new_password.to_string())?;

        let _guard = self.write_lock.lock().await;

        let Some(user) = self.repository.find_by_email(email).await? else {
            return Ok(false);
        };

        let user = self.store_password(user, &new_password).await?;
        tracing::info!(user_id = %user.id, "Password changed");

        Ok(true)
    }

    async fn change_password_verified(
        &self,
        email: &EmailAddress,
        old_password: &str,
        new_password: &str,
    ) -> Result<bool, UserError> {
        let new_password = Password::new(new_password.to_string())?;

        let _guard = self.write_lock.lock().await;

        let Some(user) = self.repository.find_by_email(email).await? else {
            return Ok(self.password_hasher.verify_absent(old_password));
        };

        if !self
            .password_hasher
            .verify(old_password, &user.password_hash)?
        {
            tracing::warn!(user_id = %user.id, "Password change refused: current password mismatch");
            return Ok(false);
        }

        let user = self.store_password(user, &new_password).await?;
        tracing::info!(user_id = %user.id, "Password changed");

        Ok(true)
    }

    async fn reset_password(&self, email: &EmailAddress) -> Result<String, UserError> {
        let (user, reset_key) = {
            let _guard = self.write_lock.lock().await;

            let mut user = self
                .repository
                .find_by_email(email)
                .await?
                .ok_or(UserError::NotFoundByEmail(email.to_string()))?;

            let reset_key = self.token_generator.generate()?;
            user.password_reset_key = Some(reset_key.clone());

            (self.repository.update(user).await?, reset_key)
        };

        tracing::info!(user_id = %user.id, "Password reset issued");

        let event = PasswordResetIssuedEvent::new(&user, reset_key.clone());
        if let Err(e) = self.notifier.password_reset_issued(&event).await {
            tracing::error!(
                "Failed to deliver password reset notification for user {}: {}",
                user.id,
                e
            );
        }

        Ok(reset_key)
    }

    async fn complete_password_reset(
        &self,
        key: &str,
        new_password: &str,
    ) -> Result<bool, UserError> {
        let new_password = Password::new(new_password.to_string())?;

        if key.is_empty() {
            return Ok(false);
        }

        let password_hash = self.password_hasher.hash(new_password.expose())?;

        let _guard = self.write_lock.lock().await;

        // Single use holds across stores sharing the repository
        let Some(user) = self
            .repository
            .consume_reset_key(key, &password_hash)
            .await?
        else {
            tracing::warn!("Password reset refused: unknown key");
            return Ok(false);
        };

        tracing::info!(user_id = %user.id, "Password reset completed");

        Ok(true)
    }

    async fn signup(&self, command: SignupCommand) -> Result<String, UserError> {
        let (user, activation_key) = {
            let _guard = self.write_lock.lock().await;

            self.ensure_available(&command.email, &command.username, None)
                .await?;

            let activation_key = self.token_generator.generate()?;
            let user = User {
                id: UserId::new(),
                email: command.email,
                username: command.username,
                firstname: command.firstname,
                lastname: command.lastname,
                password_hash: self.password_hasher.hash(command.password.expose())?,
                is_admin: false,
                is_editor: false,
                is_activated: false,
                activation_key: Some(activation_key.clone()),
                password_reset_key: None,
                created_at: Utc::now(),
            };

            (self.repository.create(user).await?, activation_key)
        };

        tracing::info!(user_id = %user.id, "User signed up, awaiting activation");

        let event = ActivationIssuedEvent::new(&user, activation_key.clone());
        if let Err(e) = self.notifier.activation_issued(&event).await {
            tracing::error!(
                "Failed to deliver activation notification for user {}: {}",
                user.id,
                e
            );
        }

        Ok(activation_key)
    }

    async fn activate_user(&self, key: &str) -> Result<bool, UserError> {
        if key.is_empty() {
            return Ok(false);
        }

        let _guard = self.write_lock.lock().await;

        let Some(user) = self.repository.consume_activation_key(key).await? else {
            tracing::warn!("Activation refused: unknown key");
            return Ok(false);
        };

        tracing::info!(user_id = %user.id, "User activated");

        Ok(true)
    }

    async fn toggle_admin(&self, email: &EmailAddress) -> Result<(), UserError> {
        self.toggle_role(email, Role::Admin).await
    }

    async fn toggle_editor(&self, email: &EmailAddress) -> Result<(), UserError> {
        self.toggle_role(email, Role::Editor).await
    }

    async fn list_admins(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_by_role(Role::Admin).await
    }

    async fn list_editors(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_by_role(Role::Editor).await
    }

    async fn user_exists(&self, email: &EmailAddress) -> Result<bool, UserError> {
        Ok(self.repository.find_by_email(email).await?.is_some())
    }

    async fn username_exists(&self, username: &Username) -> Result<bool, UserError> {
        Ok(self.repository.find_by_username(username).await?.is_some())
    }

    async fn is_admin(&self, email: &EmailAddress) -> Result<bool, UserError> {
        Ok(self
            .repository
            .find_by_email(email)
            .await?
            .is_some_and(|user| user.is_admin))
    }

    async fn is_editor(&self, email: &EmailAddress) -> Result<bool, UserError> {
        Ok(self
            .repository
            .find_by_email(email)
            .await?
            .is_some_and(|user| user.is_editor))
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::user::events::ActivationIssuedEvent;
    use crate::domain::user::events::PasswordResetIssuedEvent;
    use crate::user::errors::NotifierError;
    use crate::user::errors::PasswordError;

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
            async fn find_by_activation_key(&self, key: &str) -> Result<Option<User>, UserError>;
            async fn find_by_reset_key(&self, key: &str) -> Result<Option<User>, UserError>;
            async fn consume_reset_key(&self, key: &str, password_hash: &str) -> Result<Option<User>, UserError>;
            async fn consume_activation_key(&self, key: &str) -> Result<Option<User>, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
            async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    mock! {
        pub TestUserNotifier {}

        #[async_trait]
        impl UserNotifier for TestUserNotifier {
            async fn activation_issued(&self, event: &ActivationIssuedEvent) -> Result<(), NotifierError>;
            async fn password_reset_issued(&self, event: &PasswordResetIssuedEvent) -> Result<(), NotifierError>;
        }
    }

    fn email(s: &str) -> EmailAddress {
        EmailAddress::new(s.to_string()).unwrap()
    }

    fn username(s: &str) -> Username {
        Username::new(s.to_string()).unwrap()
    }

    fn editor(password_hash: String) -> User {
        User {
            id: UserId::new(),
            email: email("editor@localhost"),
            username: username("editor"),
            firstname: None,
            lastname: None,
            password_hash,
            is_admin: false,
            is_editor: true,
            is_activated: true,
            activation_key: None,
            password_reset_key: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_add_user_hashes_password() {
        let mut repository = MockTestUserRepository::new();
        let notifier = MockTestUserNotifier::new();

        repository.expect_find_by_email().returning(|_| Ok(None));
        repository.expect_find_by_username().returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|user| {
                user.email.as_str() == "admin@localhost"
                    && user.password_hash.starts_with("$argon2")
                    && user.is_activated
                    && user.activation_key.is_none()
            })
            .times(1)
            .returning(|user| Ok(user));

        let store = CredentialStore::new(Arc::new(repository), Arc::new(notifier));

        let command = AddUserCommand::new(
            email("admin@localhost"),
            username("admin"),
            Password::new("password".to_string()).unwrap(),
            true,
            true,
        );

        let user = store.add_user(command).await.unwrap();
        assert!(user.is_admin);
        assert!(user.is_editor);
        assert_ne!(user.password_hash, "password");
    }

    #[tokio::test]
    async fn test_add_user_duplicate_email_never_writes() {
        let mut repository = MockTestUserRepository::new();
        let notifier = MockTestUserNotifier::new();

        let existing = editor("$argon2id$existing".to_string());
        repository
            .expect_find_by_email()
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_create().times(0);

        let store = CredentialStore::new(Arc::new(repository), Arc::new(notifier));

        let command = AddUserCommand::new(
            email("editor@localhost"),
            username("editor2"),
            Password::new("password".to_string()).unwrap(),
            false,
            true,
        );

        let result = store.add_user(command).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_update_user_conflict_never_writes() {
        let mut repository = MockTestUserRepository::new();
        let notifier = MockTestUserNotifier::new();

        let target = editor("$argon2id$target".to_string());
        let target_id = target.id;
        let mut other = editor("$argon2id$other".to_string());
        other.email = email("editor2@localhost");
        other.username = username("editor2");

        let found = target.clone();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        repository.expect_find_by_email().returning(|_| Ok(None));
        repository
            .expect_find_by_username()
            .returning(move |_| Ok(Some(other.clone())));
        repository.expect_update().times(0);

        let store = CredentialStore::new(Arc::new(repository), Arc::new(notifier));

        let command = UpdateUserCommand {
            id: target_id,
            email: email("harold@localhost"),
            username: username("editor2"),
            firstname: Some("Harold".to_string()),
            lastname: Some("Bishop".to_string()),
        };

        let result = store.update_user(command).await;
        assert!(matches!(result, Err(UserError::UsernameAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        let notifier = MockTestUserNotifier::new();

        repository.expect_find_by_id().returning(|_| Ok(None));

        let store = CredentialStore::new(Arc::new(repository), Arc::new(notifier));

        let command = UpdateUserCommand {
            id: UserId::new(),
            email: email("harold@localhost"),
            username: username("harryB"),
            firstname: None,
            lastname: None,
        };

        let result = store.update_user(command).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_change_password_empty_is_validation_error() {
        let mut repository = MockTestUserRepository::new();
        let notifier = MockTestUserNotifier::new();

        repository.expect_find_by_email().times(0);
        repository.expect_update().times(0);

        let store = CredentialStore::new(Arc::new(repository), Arc::new(notifier));

        let result = store.change_password(&email("editor@localhost"), "").await;
        match result {
            Err(e) => {
                assert!(e.is_validation());
                assert!(matches!(
                    e,
                    UserError::InvalidPassword(PasswordError::Empty)
                ));
            }
            Ok(_) => panic!("expected validation error"),
        }
    }

    #[tokio::test]
    async fn test_change_password_clears_reset_key() {
        let mut repository = MockTestUserRepository::new();
        let notifier = MockTestUserNotifier::new();

        let mut user = editor("$argon2id$old".to_string());
        user.password_reset_key = Some("pending".to_string());
        repository
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_update()
            .withf(|user| {
                user.password_reset_key.is_none() && user.password_hash.starts_with("$argon2id$v=")
            })
            .times(1)
            .returning(|user| Ok(user));

        let store = CredentialStore::new(Arc::new(repository), Arc::new(notifier));

        let changed = store
            .change_password(&email("editor@localhost"), "newpassword")
            .await
            .unwrap();
        assert!(changed);
    }

    #[tokio::test]
    async fn test_complete_password_reset_consumes_key_in_one_write() {
        let mut repository = MockTestUserRepository::new();
        let notifier = MockTestUserNotifier::new();

        repository
            .expect_consume_reset_key()
            .withf(|key, password_hash| {
                key.to_string() == "reset-me" && password_hash.starts_with("$argon2id$v=")
            })
            .times(1)
            .returning(|_, password_hash| Ok(Some(editor(password_hash.to_string()))));
        repository.expect_find_by_reset_key().times(0);
        repository.expect_update().times(0);

        let store = CredentialStore::new(Arc::new(repository), Arc::new(notifier));

        let completed = store
            .complete_password_reset("reset-me", "newpassword")
            .await
            .unwrap();
        assert!(completed);
    }

    #[tokio::test]
    async fn test_complete_password_reset_empty_password_keeps_key() {
        let mut repository = MockTestUserRepository::new();
        let notifier = MockTestUserNotifier::new();

        repository.expect_consume_reset_key().times(0);

        let store = CredentialStore::new(Arc::new(repository), Arc::new(notifier));

        let result = store.complete_password_reset("reset-me", "").await;
        assert!(matches!(
            result,
            Err(UserError::InvalidPassword(PasswordError::Empty))
        ));
    }

    #[tokio::test]
    async fn test_activate_unknown_key_is_false() {
        let mut repository = MockTestUserRepository::new();
        let notifier = MockTestUserNotifier::new();

        repository
            .expect_consume_activation_key()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_update().times(0);

        let store = CredentialStore::new(Arc::new(repository), Arc::new(notifier));

        assert!(!store.activate_user("used-already").await.unwrap());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email_is_false() {
        let mut repository = MockTestUserRepository::new();
        let notifier = MockTestUserNotifier::new();

        repository.expect_find_by_email().returning(|_| Ok(None));

        let store = CredentialStore::new(Arc::new(repository), Arc::new(notifier));

        let authenticated = store
            .authenticate(&email("nobody@localhost"), "password")
            .await
            .unwrap();
        assert!(!authenticated);
    }

    #[tokio::test]
    async fn test_signup_notifies_with_activation_key() {
        let mut repository = MockTestUserRepository::new();
        let mut notifier = MockTestUserNotifier::new();

        repository.expect_find_by_email().returning(|_| Ok(None));
        repository.expect_find_by_username().returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|user| !user.is_activated && user.activation_key.is_some())
            .times(1)
            .returning(|user| Ok(user));
        notifier
            .expect_activation_issued()
            .withf(|event| event.email == "harry@localhost" && !event.activation_key.is_empty())
            .times(1)
            .returning(|_| Ok(()));

        let store = CredentialStore::new(Arc::new(repository), Arc::new(notifier));

        let key = store
            .signup(SignupCommand {
                email: email("harry@localhost"),
                username: username("hazza100"),
                password: Password::new("password".to_string()).unwrap(),
                firstname: Some("Harry".to_string()),
                lastname: Some("Houdini".to_string()),
            })
            .await
            .unwrap();
        assert!(!key.is_empty());
    }

    #[tokio::test]
    async fn test_signup_survives_notifier_failure() {
        let mut repository = MockTestUserRepository::new();
        let mut notifier = MockTestUserNotifier::new();

        repository.expect_find_by_email().returning(|_| Ok(None));
        repository.expect_find_by_username().returning(|_| Ok(None));
        repository.expect_create().times(1).returning(|user| Ok(user));
        notifier
            .expect_activation_issued()
            .times(1)
            .returning(|_| Err(NotifierError::DeliveryFailed("smtp down".to_string())));

        let store = CredentialStore::new(Arc::new(repository), Arc::new(notifier));

        let result = store
            .signup(SignupCommand {
                email: email("harry@localhost"),
                username: username("hazza100"),
                password: Password::new("password".to_string()).unwrap(),
                firstname: None,
                lastname: None,
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_reset_password_unknown_email() {
        let mut repository = MockTestUserRepository::new();
        let mut notifier = MockTestUserNotifier::new();

        repository.expect_find_by_email().returning(|_| Ok(None));
        repository.expect_update().times(0);
        notifier.expect_password_reset_issued().times(0);

        let store = CredentialStore::new(Arc::new(repository), Arc::new(notifier));

        let result = store.reset_password(&email("nobody@localhost")).await;
        assert!(matches!(result, Err(UserError::NotFoundByEmail(_))));
    }

    #[tokio::test]
    async fn test_get_user_by_nil_id_skips_repository() {
        let mut repository = MockTestUserRepository::new();
        let notifier = MockTestUserNotifier::new();

        repository.expect_find_by_id().times(0);

        let store = CredentialStore::new(Arc::new(repository), Arc::new(notifier));

        let result = store
            .get_user_by_id(&UserId(uuid::Uuid::nil()))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_user_missing_is_false() {
        let mut repository = MockTestUserRepository::new();
        let notifier = MockTestUserNotifier::new();

        repository.expect_find_by_email().returning(|_| Ok(None));
        repository.expect_delete().times(0);

        let store = CredentialStore::new(Arc::new(repository), Arc::new(notifier));

        let deleted = store.delete_user(&email("editor2@localhost")).await.unwrap();
        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_database_errors_propagate() {
        let mut repository = MockTestUserRepository::new();
        let notifier = MockTestUserNotifier::new();

        repository
            .expect_find_by_email()
            .returning(|_| Err(UserError::DatabaseError("connection reset".to_string())));

        let store = CredentialStore::new(Arc::new(repository), Arc::new(notifier));

        let result = store.user_exists(&email("editor@localhost")).await;
        assert!(matches!(result, Err(UserError::DatabaseError(_))));
    }
}
