use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::SessionToken;
use chrono::Duration;
use chrono::Utc;

use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::Session;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::AuthError;
use crate::user::ports::SessionServicePort;
use crate::user::ports::UserRepository;

/// Domain service owning the session lifecycle.
///
/// Concrete implementation of SessionServicePort with dependency injection.
/// Holds no per-request state; the user record in the store is the sole
/// source of truth for session state.
pub struct SessionService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: PasswordHasher,
    token_ttl_days: i64,
}

impl<UR> SessionService<UR>
where
    UR: UserRepository,
{
    /// Create a new session service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `token_ttl_days` - Days an issued token stays valid
    ///
    /// # Returns
    /// Configured session service instance
    pub fn new(repository: Arc<UR>, token_ttl_days: i64) -> Self {
        Self {
            repository,
            password_hasher: PasswordHasher::new(),
            token_ttl_days,
        }
    }
}

#[async_trait]
impl<UR> SessionServicePort for SessionService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, AuthError> {
        // Lookup first; the store's uniqueness constraint backs this up
        // against a racing registration.
        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(AuthError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        let hashed_password = self.password_hasher.hash(&command.password)?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            hashed_password,
            full_name: command.full_name,
            disabled: false,
            logged_in: false,
            session_token: None,
            session_expires_at: None,
            created_at: Utc::now(),
        };

        self.repository.create(user).await
    }

    async fn login(&self, username: &Username, password: &str) -> Result<Session, AuthError> {
        // An unknown username and a wrong password collapse into the same
        // error so callers cannot enumerate accounts.
        let user = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self
            .password_hasher
            .verify(password, &user.hashed_password)
        {
            return Err(AuthError::InvalidCredentials);
        }

        if user.disabled {
            return Err(AuthError::UserDisabled);
        }

        // A fresh token silently supersedes any previously issued one;
        // only one token is valid per user at a time.
        let token = SessionToken::generate();
        let expires_at = Utc::now() + Duration::days(self.token_ttl_days);

        self.repository
            .set_login_state(&user.id, token.as_str(), expires_at)
            .await?;

        Ok(Session {
            token: token.into_string(),
            expires_at,
        })
    }

    async fn signout(&self, token: &str) -> Result<(), AuthError> {
        let user = self
            .repository
            .find_by_token(token)
            .await?
            .ok_or(AuthError::InvalidSession)?;

        // Unconditional: no check on `disabled` or the current
        // `logged_in` value, so signout is idempotent.
        self.repository.clear_login_state(&user.id).await
    }

    async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let user = self
            .repository
            .find_by_token(token)
            .await?
            .ok_or(AuthError::InvalidSession)?;

        if !user.logged_in {
            return Err(AuthError::SessionInactive);
        }

        if user.disabled {
            return Err(AuthError::UserDisabled);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, AuthError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError>;
            async fn find_by_token(&self, token: &str) -> Result<Option<User>, AuthError>;
            async fn set_login_state(
                &self,
                id: &UserId,
                token: &str,
                expires_at: DateTime<Utc>,
            ) -> Result<(), AuthError>;
            async fn clear_login_state(&self, id: &UserId) -> Result<(), AuthError>;
        }
    }

    fn test_user(username: &str, password_hash: &str) -> User {
        User {
            id: UserId::new(),
            username: Username::new(username.to_string()).unwrap(),
            hashed_password: password_hash.to_string(),
            full_name: None,
            disabled: false,
            logged_in: false,
            session_token: None,
            session_expires_at: None,
            created_at: Utc::now(),
        }
    }

    fn hash_of(password: &str) -> String {
        PasswordHasher::new().hash(password).unwrap()
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "testuser"
                    && !user.logged_in
                    && !user.disabled
                    && user.session_token.is_none()
                    && user.hashed_password.starts_with("$argon2")
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = SessionService::new(Arc::new(repository), 30);

        let command = RegisterUserCommand {
            username: Username::new("testuser".to_string()).unwrap(),
            password: "password123".to_string(),
            full_name: Some("Test User".to_string()),
        };

        let result = service.register(command).await;
        assert!(result.is_ok());

        let user = result.unwrap();
        assert_eq!(user.username.as_str(), "testuser");
        assert!(!user.logged_in);
        // Password is hashed with real Argon2, never stored in the clear
        assert!(user.hashed_password.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(Some(test_user("testuser", "$argon2id$existing"))));

        repository.expect_create().times(0);

        let service = SessionService::new(Arc::new(repository), 30);

        let command = RegisterUserCommand {
            username: Username::new("testuser".to_string()).unwrap(),
            password: "password456".to_string(),
            full_name: None,
        };

        let result = service.register(command).await;
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            AuthError::UsernameAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_login_success_issues_token() {
        let mut repository = MockTestUserRepository::new();

        let user = test_user("alice", &hash_of("pw123"));
        let user_id = user.id;

        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        repository
            .expect_set_login_state()
            .withf(move |id, token, expires_at| {
                *id == user_id && token.len() == 32 && *expires_at > Utc::now()
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = SessionService::new(Arc::new(repository), 30);

        let username = Username::new("alice".to_string()).unwrap();
        let session = service.login(&username, "pw123").await.unwrap();

        assert_eq!(session.token.len(), 32);
        assert!(session.expires_at > Utc::now() + Duration::days(29));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut repository = MockTestUserRepository::new();

        let user = test_user("alice", &hash_of("correct_password"));

        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        repository.expect_set_login_state().times(0);

        let service = SessionService::new(Arc::new(repository), 30);

        let username = Username::new("alice".to_string()).unwrap();
        let result = service.login(&username, "wrong_password").await;

        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_user_same_error_as_wrong_password() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let service = SessionService::new(Arc::new(repository), 30);

        let username = Username::new("nobody".to_string()).unwrap();
        let result = service.login(&username, "whatever").await;

        // Same variant as the wrong-password case: non-enumerable
        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_malformed_stored_hash_is_invalid_credentials() {
        let mut repository = MockTestUserRepository::new();

        let user = test_user("alice", "not-a-phc-string");

        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = SessionService::new(Arc::new(repository), 30);

        let username = Username::new("alice".to_string()).unwrap();
        let result = service.login(&username, "pw123").await;

        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_disabled_user() {
        let mut repository = MockTestUserRepository::new();

        let mut user = test_user("alice", &hash_of("pw123"));
        user.disabled = true;

        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        repository.expect_set_login_state().times(0);

        let service = SessionService::new(Arc::new(repository), 30);

        let username = Username::new("alice".to_string()).unwrap();
        let result = service.login(&username, "pw123").await;

        assert!(matches!(result.unwrap_err(), AuthError::UserDisabled));
    }

    #[tokio::test]
    async fn test_signout_success() {
        let mut repository = MockTestUserRepository::new();

        let user = test_user("alice", "$argon2id$hash");
        let user_id = user.id;

        repository
            .expect_find_by_token()
            .with(eq("sometoken"))
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        repository
            .expect_clear_login_state()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(|_| Ok(()));

        let service = SessionService::new(Arc::new(repository), 30);

        assert!(service.signout("sometoken").await.is_ok());
    }

    #[tokio::test]
    async fn test_signout_clears_even_when_already_signed_out() {
        let mut repository = MockTestUserRepository::new();

        // logged_in already false: signout still clears unconditionally
        let mut user = test_user("alice", "$argon2id$hash");
        user.logged_in = false;
        user.session_token = Some("sometoken".to_string());

        repository
            .expect_find_by_token()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        repository
            .expect_clear_login_state()
            .times(1)
            .returning(|_| Ok(()));

        let service = SessionService::new(Arc::new(repository), 30);

        assert!(service.signout("sometoken").await.is_ok());
    }

    #[tokio::test]
    async fn test_signout_unknown_token() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_token()
            .times(1)
            .returning(|_| Ok(None));

        repository.expect_clear_login_state().times(0);

        let service = SessionService::new(Arc::new(repository), 30);

        let result = service.signout("unknown").await;
        assert!(matches!(result.unwrap_err(), AuthError::InvalidSession));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut repository = MockTestUserRepository::new();

        let mut user = test_user("alice", "$argon2id$hash");
        user.logged_in = true;
        user.session_token = Some("sometoken".to_string());

        repository
            .expect_find_by_token()
            .with(eq("sometoken"))
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = SessionService::new(Arc::new(repository), 30);

        let user = service.authenticate("sometoken").await.unwrap();
        assert_eq!(user.username.as_str(), "alice");
        assert!(user.logged_in);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_token() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_token()
            .times(1)
            .returning(|_| Ok(None));

        let service = SessionService::new(Arc::new(repository), 30);

        let result = service.authenticate("unknown").await;
        assert!(matches!(result.unwrap_err(), AuthError::InvalidSession));
    }

    #[tokio::test]
    async fn test_authenticate_inactive_session() {
        let mut repository = MockTestUserRepository::new();

        // Token still recorded on the row, but the session was ended
        let mut user = test_user("alice", "$argon2id$hash");
        user.logged_in = false;
        user.session_token = Some("staletoken".to_string());

        repository
            .expect_find_by_token()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = SessionService::new(Arc::new(repository), 30);

        let result = service.authenticate("staletoken").await;
        assert!(matches!(result.unwrap_err(), AuthError::SessionInactive));
    }

    #[tokio::test]
    async fn test_authenticate_disabled_user() {
        let mut repository = MockTestUserRepository::new();

        // Disabled vetoes even an active session
        let mut user = test_user("alice", "$argon2id$hash");
        user.logged_in = true;
        user.disabled = true;
        user.session_token = Some("sometoken".to_string());

        repository
            .expect_find_by_token()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = SessionService::new(Arc::new(repository), 30);

        let result = service.authenticate("sometoken").await;
        assert!(matches!(result.unwrap_err(), AuthError::UserDisabled));
    }
}
