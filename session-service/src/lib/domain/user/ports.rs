use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::Session;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AuthError;
use crate::user::models::Username;

/// Port for the session lifecycle: registration, login, signout, and
/// session validation.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Register a new user in the anonymous state.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username, password, and
    ///   optional full name
    ///
    /// # Returns
    /// Created user entity with `logged_in` false
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<User, AuthError>;

    /// Verify credentials and open a session.
    ///
    /// On success a fresh opaque token is issued and persisted on the
    /// user record, silently superseding any previously issued token.
    ///
    /// # Arguments
    /// * `username` - Username to authenticate
    /// * `password` - Plaintext password to verify
    ///
    /// # Returns
    /// Session with the issued token and its expiry
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `UserDisabled` - Account is disabled
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, username: &Username, password: &str) -> Result<Session, AuthError>;

    /// End the session identified by a token.
    ///
    /// Clears the login state unconditionally; repeating the call with
    /// the same token succeeds again (idempotent).
    ///
    /// # Arguments
    /// * `token` - Session token presented by the client
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `InvalidSession` - No user matches the token
    /// * `DatabaseError` - Store operation failed
    async fn signout(&self, token: &str) -> Result<(), AuthError>;

    /// Resolve a token to its user, guarding protected access.
    ///
    /// # Arguments
    /// * `token` - Session token presented by the client
    ///
    /// # Returns
    /// The authenticated user, `logged_in` true
    ///
    /// # Errors
    /// * `InvalidSession` - No user matches the token
    /// * `SessionInactive` - Token matches but the session was ended
    /// * `UserDisabled` - Account is disabled
    /// * `DatabaseError` - Store operation failed
    async fn authenticate(&self, token: &str) -> Result<User, AuthError>;
}

/// Persistence operations for the user record.
///
/// Every operation is a single-row lookup or update; no cross-row
/// transactions are needed since each user's session state is
/// self-contained.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user to storage.
    ///
    /// # Arguments
    /// * `user` - User entity to create
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken (surfaced by
    ///   the store's uniqueness constraint)
    /// * `DatabaseError` - Store operation failed
    async fn create(&self, user: User) -> Result<User, AuthError>;

    /// Retrieve a user by username.
    ///
    /// # Arguments
    /// * `username` - Username to search for
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError>;

    /// Retrieve a user by session token.
    ///
    /// An empty token never matches and is answered without touching the
    /// store.
    ///
    /// # Arguments
    /// * `token` - Session token to search for
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_token(&self, token: &str) -> Result<Option<User>, AuthError>;

    /// Mark a user as logged in with a fresh token and expiry.
    ///
    /// Overwrites whatever token was stored before; last write wins when
    /// two logins race.
    ///
    /// # Arguments
    /// * `id` - User ID to update
    /// * `token` - Newly issued session token
    /// * `expires_at` - Token expiry timestamp
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `NotFound` - User row no longer exists
    /// * `DatabaseError` - Store operation failed
    async fn set_login_state(
        &self,
        id: &UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError>;

    /// Mark a user's session as ended.
    ///
    /// Unsets `logged_in` and the expiry. The token column is left in
    /// place so a signed-out token resolves to an inactive session
    /// rather than an unknown one.
    ///
    /// # Arguments
    /// * `id` - User ID to update
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `NotFound` - User row no longer exists
    /// * `DatabaseError` - Store operation failed
    async fn clear_login_state(&self, id: &UserId) -> Result<(), AuthError>;
}
