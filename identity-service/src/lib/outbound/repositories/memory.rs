use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user table.
///
/// Writes hold the map's write lock across the uniqueness check and the
/// insert, so they are atomic; readers clone records out and never see a
/// partially applied update. Used by tests and `database.url = "memory"`.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn find_where<F>(&self, predicate: F) -> Option<User>
    where
        F: Fn(&User) -> bool,
    {
        self.users
            .read()
            .await
            .values()
            .find(|user| predicate(user))
            .cloned()
    }

    async fn collect_where<F>(&self, predicate: F) -> Vec<User>
    where
        F: Fn(&User) -> bool,
    {
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|user| predicate(user))
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        users
    }
}

/// First uniqueness violation `candidate` would cause against the other users.
fn conflict(users: &HashMap<UserId, User>, candidate: &User) -> Option<UserError> {
    users
        .values()
        .filter(|existing| existing.id != candidate.id)
        .find_map(|existing| {
            if existing.email == candidate.email {
                Some(UserError::EmailAlreadyExists(
                    candidate.email.as_str().to_string(),
                ))
            } else if existing.username.matches(&candidate.username) {
                Some(UserError::UsernameAlreadyExists(
                    candidate.username.as_str().to_string(),
                ))
            } else {
                None
            }
        })
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.id) {
            return Err(UserError::DatabaseError(format!(
                "duplicate user id {}",
                user.id
            )));
        }
        if let Some(e) = conflict(&users, &user) {
            return Err(e);
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self.find_where(|user| &user.email == email).await)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self.find_where(|user| user.username.matches(username)).await)
    }

    async fn find_by_activation_key(&self, key: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .find_where(|user| user.activation_key.as_deref() == Some(key))
            .await)
    }

    async fn find_by_reset_key(&self, key: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .find_where(|user| user.password_reset_key.as_deref() == Some(key))
            .await)
    }

    async fn consume_reset_key(
        &self,
        key: &str,
        password_hash: &str,
    ) -> Result<Option<User>, UserError> {
        let mut users = self.users.write().await;

        Ok(users
            .values_mut()
            .find(|user| user.password_reset_key.as_deref() == Some(key))
            .map(|user| {
                user.password_hash = password_hash.to_string();
                user.password_reset_key = None;
                user.clone()
            }))
    }

    async fn consume_activation_key(&self, key: &str) -> Result<Option<User>, UserError> {
        let mut users = self.users.write().await;

        Ok(users
            .values_mut()
            .find(|user| user.activation_key.as_deref() == Some(key))
            .map(|user| {
                user.is_activated = true;
                user.activation_key = None;
                user.clone()
            }))
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.collect_where(|_| true).await)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserError> {
        Ok(self.collect_where(|user| user.has_role(role)).await)
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        if let Some(e) = conflict(&users, &user) {
            return Err(e);
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn user(email: &str, username: &str) -> User {
        User {
            id: UserId::new(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            username: Username::new(username.to_string()).unwrap(),
            firstname: None,
            lastname: None,
            password_hash: "$argon2id$test_hash".to_string(),
            is_admin: false,
            is_editor: true,
            is_activated: true,
            activation_key: None,
            password_reset_key: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let repository = InMemoryUserRepository::new();
        repository
            .create(user("editor@localhost", "editor"))
            .await
            .unwrap();

        let result = repository
            .create(user("EDITOR@localhost", "editor2"))
            .await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_username_ignoring_case() {
        let repository = InMemoryUserRepository::new();
        repository
            .create(user("editor@localhost", "editor"))
            .await
            .unwrap();

        let result = repository
            .create(user("editor2@localhost", "Editor"))
            .await;
        assert!(matches!(result, Err(UserError::UsernameAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_conflict_and_keeps_record() {
        let repository = InMemoryUserRepository::new();
        let first = repository
            .create(user("editor@localhost", "editor"))
            .await
            .unwrap();
        repository
            .create(user("editor2@localhost", "editor2"))
            .await
            .unwrap();

        let mut changed = first.clone();
        changed.email = EmailAddress::new("editor2@localhost".to_string()).unwrap();
        let result = repository.update(changed).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));

        let stored = repository.find_by_id(&first.id).await.unwrap().unwrap();
        assert_eq!(stored, first);
    }

    #[tokio::test]
    async fn test_update_own_values_is_not_a_conflict() {
        let repository = InMemoryUserRepository::new();
        let mut first = repository
            .create(user("editor@localhost", "editor"))
            .await
            .unwrap();

        first.firstname = Some("Harold".to_string());
        let updated = repository.update(first).await.unwrap();
        assert_eq!(updated.firstname.as_deref(), Some("Harold"));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repository = InMemoryUserRepository::new();
        let result = repository.update(user("ghost@localhost", "ghost")).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_by_role() {
        let repository = InMemoryUserRepository::new();
        let mut admin = user("admin@localhost", "admin");
        admin.is_admin = true;
        admin.is_editor = false;
        repository.create(admin).await.unwrap();
        repository
            .create(user("editor@localhost", "editor"))
            .await
            .unwrap();

        assert_eq!(repository.list_by_role(Role::Admin).await.unwrap().len(), 1);
        assert_eq!(repository.list_by_role(Role::Editor).await.unwrap().len(), 1);
        assert_eq!(repository.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_keys() {
        let repository = InMemoryUserRepository::new();
        let mut pending = user("harry@localhost", "hazza100");
        pending.is_activated = false;
        pending.activation_key = Some("activate-me".to_string());
        pending.password_reset_key = Some("reset-me".to_string());
        repository.create(pending).await.unwrap();

        assert!(repository
            .find_by_activation_key("activate-me")
            .await
            .unwrap()
            .is_some());
        assert!(repository
            .find_by_reset_key("reset-me")
            .await
            .unwrap()
            .is_some());
        assert!(repository
            .find_by_activation_key("reset-me")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_consume_keys_only_once() {
        let repository = InMemoryUserRepository::new();
        let mut pending = user("harry@localhost", "hazza100");
        pending.is_activated = false;
        pending.activation_key = Some("activate-me".to_string());
        pending.password_reset_key = Some("reset-me".to_string());
        repository.create(pending).await.unwrap();

        let reset = repository
            .consume_reset_key("reset-me", "$argon2id$new_hash")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reset.password_hash, "$argon2id$new_hash");
        assert!(reset.password_reset_key.is_none());
        assert!(repository
            .consume_reset_key("reset-me", "$argon2id$other_hash")
            .await
            .unwrap()
            .is_none());

        let activated = repository
            .consume_activation_key("activate-me")
            .await
            .unwrap()
            .unwrap();
        assert!(activated.is_activated);
        assert!(activated.activation_key.is_none());
        assert_eq!(activated.password_hash, "$argon2id$new_hash");
        assert!(repository
            .consume_activation_key("activate-me")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let repository = InMemoryUserRepository::new();
        let created = repository
            .create(user("editor@localhost", "editor"))
            .await
            .unwrap();

        repository.delete(&created.id).await.unwrap();
        assert!(matches!(
            repository.delete(&created.id).await,
            Err(UserError::NotFound(_))
        ));
    }
}
