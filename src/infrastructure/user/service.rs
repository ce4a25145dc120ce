//! User service for sign-up, login and lookups

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use validator::Validate;

use super::password::PasswordHasher;
use crate::domain::DomainError;
use crate::domain::store::{Collection, Document, DocumentStore, Filter};
use crate::domain::user::{USER_COLLECTION, User};
use crate::infrastructure::auth::{JwtGenerator, TokenPair};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 2, max = 100))]
    pub first_name: String,
    #[validate(length(min = 2, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(length(min = 1))]
    pub phone: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// A signed-in user with a freshly issued token pair
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub tokens: TokenPair,
}

/// User service for authentication and lookups
#[derive(Debug, Clone)]
pub struct UserService {
    users: Collection,
    hasher: Arc<dyn PasswordHasher>,
    jwt: Arc<dyn JwtGenerator>,
}

impl UserService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        hasher: Arc<dyn PasswordHasher>,
        jwt: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            users: Collection::new(store, USER_COLLECTION),
            hasher,
            jwt,
        }
    }

    /// Overrides the per-call store deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.users = self.users.with_deadline(deadline);
        self
    }

    /// Registers a user and issues their first token pair
    pub async fn signup(&self, request: SignupRequest) -> Result<AuthSession, DomainError> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        if self.users.exists(&Filter::eq("email", email.as_str())).await? {
            return Err(DomainError::conflict("This email already exists"));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let mut user = User::new(
            request.first_name,
            request.last_name,
            email,
            password_hash,
            request.phone,
        )
        .with_avatar(request.avatar);

        let tokens = self.jwt.generate_pair(&user)?;
        user.token = Some(tokens.token.clone());
        user.refresh_token = Some(tokens.refresh_token.clone());

        self.users.insert(&user).await?;

        info!(user_id = %user.user_id, "User signed up");
        Ok(AuthSession { user, tokens })
    }

    /// Verifies credentials and rotates the stored token pair
    pub async fn login(&self, request: LoginRequest) -> Result<AuthSession, DomainError> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        let invalid = || DomainError::unauthorized("Email or password is incorrect");

        let Some(mut user) = self
            .users
            .find_one::<User>(&Filter::eq("email", email.as_str()))
            .await?
        else {
            warn!("Login attempt for unknown email");
            return Err(invalid());
        };

        if !self.hasher.verify(&request.password, &user.password_hash) {
            warn!(user_id = %user.user_id, "Login attempt with wrong password");
            return Err(invalid());
        }

        let tokens = self.jwt.generate_pair(&user)?;
        let now = chrono::Utc::now();

        let mut fields = Document::new();
        fields.insert("token".to_string(), Value::from(tokens.token.clone()));
        fields.insert(
            "refresh_token".to_string(),
            Value::from(tokens.refresh_token.clone()),
        );
        fields.insert("updated_at".to_string(), Value::from(now.to_rfc3339()));

        self.users
            .update_one(&Filter::eq("user_id", user.user_id.as_str()), fields)
            .await?;

        user.token = Some(tokens.token.clone());
        user.refresh_token = Some(tokens.refresh_token.clone());
        user.updated_at = now;

        info!(user_id = %user.user_id, "User logged in");
        Ok(AuthSession { user, tokens })
    }

    pub async fn get(&self, id: &str) -> Result<User, DomainError> {
        self.users
            .find_one(&Filter::eq("user_id", id))
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }

    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.users.find_all(&Filter::all()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::auth::{JwtConfig, JwtService};
    use crate::infrastructure::store::InMemoryDocumentStore;
    use crate::infrastructure::user::Argon2Hasher;

    fn create_service() -> (UserService, Arc<JwtService>) {
        let jwt = Arc::new(JwtService::new(JwtConfig::new("test-secret")));
        let service = UserService::new(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(Argon2Hasher::new()),
            jwt.clone(),
        );
        (service, jwt)
    }

    fn signup_request(email: &str) -> SignupRequest {
        SignupRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password: "analytical".to_string(),
            phone: "555-0100".to_string(),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_signup_stores_hash_and_tokens() {
        let (service, jwt) = create_service();

        let session = service.signup(signup_request("Ada@Example.com")).await.unwrap();
        let stored = service.get(&session.user.user_id).await.unwrap();

        assert_eq!(stored.email, "ada@example.com");
        assert_ne!(stored.password_hash, "analytical");
        assert_eq!(stored.token.as_deref(), Some(session.tokens.token.as_str()));

        let claims = jwt.validate(&session.tokens.token).unwrap();
        assert_eq!(claims.sub, stored.user_id);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let (service, _) = create_service();
        service.signup(signup_request("ada@example.com")).await.unwrap();

        let result = service.signup(signup_request("ada@example.com")).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_signup_validation() {
        let (service, _) = create_service();
        let mut request = signup_request("not-an-email");
        request.password = "123".to_string();

        let result = service.signup(request).await;

        let Err(DomainError::Validation { message }) = result else {
            panic!("expected validation error");
        };
        assert!(message.contains("email"));
        assert!(message.contains("password"));
    }

    #[tokio::test]
    async fn test_login_rotates_tokens() {
        let (service, _) = create_service();
        let signup = service.signup(signup_request("ada@example.com")).await.unwrap();

        // Tokens embed second-resolution timestamps
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        let login = service
            .login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "analytical".to_string(),
            })
            .await
            .unwrap();

        assert_ne!(login.tokens.token, signup.tokens.token);
        let stored = service.get(&signup.user.user_id).await.unwrap();
        assert_eq!(stored.token, Some(login.tokens.token));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (service, _) = create_service();
        service.signup(signup_request("ada@example.com")).await.unwrap();

        let result = service
            .login(LoginRequest {
                email: "ada@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await;

        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let (service, _) = create_service();

        let result = service
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "whatever".to_string(),
            })
            .await;

        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
    }
}
