use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const USER_COLUMNS: &str = r#"
    id, email, username, firstname, lastname, password_hash,
    is_admin, is_editor, is_activated, activation_key, password_reset_key, created_at
"#;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        predicate: &str,
        value: &str,
    ) -> Result<Option<User>, UserError> {
        let sql = format!("SELECT {} FROM users WHERE {}", USER_COLUMNS, predicate);

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?
            .map(User::try_from)
            .transpose()
    }

    async fn fetch_all_where(&self, predicate: &str) -> Result<Vec<User>, UserError> {
        let sql = format!(
            "SELECT {} FROM users WHERE {} ORDER BY created_at DESC",
            USER_COLUMNS, predicate
        );

        sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?
            .into_iter()
            .map(User::try_from)
            .collect()
    }
}

/// Row shape of the `users` table.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    username: String,
    firstname: Option<String>,
    lastname: Option<String>,
    password_hash: String,
    is_admin: bool,
    is_editor: bool,
    is_activated: bool,
    activation_key: Option<String>,
    password_reset_key: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            email: EmailAddress::new(row.email)?,
            username: Username::new(row.username)?,
            firstname: row.firstname,
            lastname: row.lastname,
            password_hash: row.password_hash,
            is_admin: row.is_admin,
            is_editor: row.is_editor,
            is_activated: row.is_activated,
            activation_key: row.activation_key,
            password_reset_key: row.password_reset_key,
            created_at: row.created_at,
        })
    }
}

/// Translate unique index violations into domain conflicts.
fn map_write_error(e: sqlx::Error, user: &User) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some("users_username_key") => {
                    return UserError::UsernameAlreadyExists(user.username.as_str().to_string())
                }
                Some("users_email_key") => {
                    return UserError::EmailAlreadyExists(user.email.as_str().to_string())
                }
                _ => {}
            }
        }
    }
    UserError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, username, firstname, lastname, password_hash,
                is_admin, is_editor, is_activated, activation_key, password_reset_key, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(user.username.as_str())
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.is_editor)
        .bind(user.is_activated)
        .bind(&user.activation_key)
        .bind(&user.password_reset_key)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &user))?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        self.fetch_one_where("email = $1", email.as_str()).await
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        self.fetch_one_where("LOWER(username) = LOWER($1)", username.as_str())
            .await
    }

    async fn find_by_activation_key(&self, key: &str) -> Result<Option<User>, UserError> {
        self.fetch_one_where("activation_key = $1", key).await
    }

    async fn find_by_reset_key(&self, key: &str) -> Result<Option<User>, UserError> {
        self.fetch_one_where("password_reset_key = $1", key).await
    }

    async fn consume_reset_key(
        &self,
        key: &str,
        password_hash: &str,
    ) -> Result<Option<User>, UserError> {
        // The key predicate and the clear happen in one statement, so a
        // concurrent consumer of the same key matches no row.
        let sql = format!(
            r#"
            UPDATE users
            SET password_hash = $2, password_reset_key = NULL
            WHERE password_reset_key = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(key)
            .bind(password_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?
            .map(User::try_from)
            .transpose()
    }

    async fn consume_activation_key(&self, key: &str) -> Result<Option<User>, UserError> {
        let sql = format!(
            r#"
            UPDATE users
            SET is_activated = TRUE, activation_key = NULL
            WHERE activation_key = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?
            .map(User::try_from)
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        self.fetch_all_where("TRUE").await
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserError> {
        match role {
            Role::Admin => self.fetch_all_where("is_admin").await,
            Role::Editor => self.fetch_all_where("is_editor").await,
        }
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, username = $3, firstname = $4, lastname = $5,
                password_hash = $6, is_admin = $7, is_editor = $8, is_activated = $9,
                activation_key = $10, password_reset_key = $11
            WHERE id = $1
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(user.username.as_str())
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.is_editor)
        .bind(user.is_activated)
        .bind(&user.activation_key)
        .bind(&user.password_reset_key)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &user))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(user.id.to_string()));
        }

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
