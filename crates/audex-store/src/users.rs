//! User persistence operations.
//!
//! Email is the unique secondary key; lookups are case-insensitive.

use audex_core::{DomainError, Timestamp, UserId};
use audex_schema::{ProviderMetadata, User};

use crate::DocumentStore;

impl DocumentStore {
    /// Insert a new user. The email must be free.
    pub async fn create_user(&self, user: User) -> Result<User, DomainError> {
        user.validate().into_result()?;
        let mut users = self.collections.users.write().await;
        let email = user.email.to_ascii_lowercase();
        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&email))
        {
            return Err(DomainError::duplicate("email", &user.email));
        }
        tracing::debug!(user = %user.user_id, "user created");
        users.insert(user.user_id, user.clone());
        Ok(user)
    }

    /// Fetch a user by id.
    pub async fn find_user(&self, id: &UserId) -> Result<User, DomainError> {
        self.collections
            .users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    /// Fetch a user by email, case-insensitively.
    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.collections
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    /// Total number of user records. Drives the first-user bootstrap.
    pub async fn count_users(&self) -> usize {
        self.collections.users.read().await.len()
    }

    /// Replace a user record after re-running schema validation and the
    /// email uniqueness check (excluding the user itself).
    pub async fn update_user(&self, user: User) -> Result<User, DomainError> {
        user.validate().into_result()?;
        let mut users = self.collections.users.write().await;
        if !users.contains_key(&user.user_id) {
            return Err(DomainError::not_found("user", &user.user_id));
        }
        if users
            .values()
            .any(|u| u.user_id != user.user_id && u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(DomainError::duplicate("email", &user.email));
        }
        users.insert(user.user_id, user.clone());
        Ok(user)
    }

    /// Record a successful login.
    pub async fn record_login(
        &self,
        id: &UserId,
        provider: ProviderMetadata,
    ) -> Result<User, DomainError> {
        let mut users = self.collections.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("user", id))?;
        user.last_login = Some(Timestamp::now());
        user.provider = Some(provider);
        Ok(user.clone())
    }
}
