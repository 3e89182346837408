use std::sync::Arc;

use tracing::info;

use crate::database::models::{Credentials, NewUser, User};
use crate::database::repository::UserRepository;
use crate::services::error::ServiceError;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn register(&self, user: &NewUser) -> Result<i32, ServiceError> {
        Ok(self.repo.create_user(user).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Vec<User>, ServiceError> {
        Ok(self.repo.find_users_by_email(email).await?)
    }

    /// Exact match on email and password hash. No match at all, whether the
    /// email is unknown or the hash differs, is `InvalidCredentials`.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ServiceError> {
        let user = self
            .repo
            .find_user_by_credentials(&credentials.email, &credentials.password_hash)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        info!(user_id = user.id, "User authenticated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{new_user, MemoryRepository};

    async fn service() -> UserService {
        let repo = Arc::new(MemoryRepository::new());
        repo.create_user(&new_user("jane@example.com", "correct-hash", "Jane Doe"))
            .await
            .unwrap();
        UserService::new(repo)
    }

    fn credentials(email: &str, password_hash: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        }
    }

    #[tokio::test]
    async fn login_with_matching_hash_returns_the_user() {
        let service = service().await;

        let user = service
            .login(&credentials("jane@example.com", "correct-hash"))
            .await
            .unwrap();

        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.full_name.as_deref(), Some("Jane Doe"));
    }

    #[tokio::test]
    async fn login_with_wrong_hash_is_invalid_credentials() {
        let service = service().await;

        let result = service.login(&credentials("jane@example.com", "wrong-hash")).await;

        assert!(matches!(result, Err(ServiceError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_with_unknown_email_is_invalid_credentials() {
        let service = service().await;

        let result = service.login(&credentials("nobody@example.com", "correct-hash")).await;

        assert!(matches!(result, Err(ServiceError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn find_by_email_is_an_exact_match() {
        let service = service().await;

        assert_eq!(service.find_by_email("jane@example.com").await.unwrap().len(), 1);
        assert!(service.find_by_email("JANE@example.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_registration_surfaces_a_database_error() {
        let service = service().await;

        let result = service
            .register(&new_user("jane@example.com", "other", "Jane Again"))
            .await;

        assert!(matches!(result, Err(ServiceError::Database(_))));
    }
}
