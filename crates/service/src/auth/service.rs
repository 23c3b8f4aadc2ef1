use std::sync::Arc;

use argon2::{password_hash::{PasswordHasher, PasswordVerifier, SaltString}, Argon2, PasswordHash};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use models::user::Role;
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{AuthSession, AuthUser, Claims, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;
use crate::caller::Caller;
use crate::validation::Violations;

const MIN_PASSWORD_LEN: usize = 8;

/// Auth service configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// Lowercased emails that register straight into the admin role.
    pub admin_emails: Vec<String>,
    pub password_algorithm: String,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self { jwt_secret: jwt_secret.into(), token_ttl_hours: 12, admin_emails: Vec::new(), password_algorithm: "argon2".into() }
    }

    pub fn with_admins(mut self, emails: &[&str]) -> Self {
        self.admin_emails = emails.iter().map(|e| e.trim().to_lowercase()).collect();
        self
    }
}

impl From<&configs::AuthSettings> for AuthConfig {
    fn from(s: &configs::AuthSettings) -> Self {
        Self {
            jwt_secret: s.jwt_secret.clone(),
            token_ttl_hours: s.token_ttl_hours,
            admin_emails: s.admin_emails.clone(),
            password_algorithm: "argon2".into(),
        }
    }
}

/// Auth business service independent of web framework
pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    cfg: AuthConfig,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthRepository>, cfg: AuthConfig) -> Self {
        Self { repo, cfg }
    }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, domain::RegisterInput};
    /// use service::directory::MemoryDirectory;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MemoryDirectory::default()), AuthConfig::new("secret"));
    /// let input = RegisterInput { name: "Test".into(), email: "user@example.com".into(), password: "Secret123".into(), role: None };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        let mut violations = Violations::new();
        if models::user::validate_name(&input.name).is_err() {
            violations.push("name", "is required");
        }
        if models::user::validate_email(&input.email).is_err() {
            violations.push("email", "must be a valid email address");
        }
        if input.password.len() < MIN_PASSWORD_LEN {
            violations.push("password", format!("must be at least {MIN_PASSWORD_LEN} characters"));
        }
        if !violations.is_empty() {
            return Err(AuthError::Validation(violations.into_vec()));
        }

        let requested = input.role.unwrap_or_default();
        if requested == Role::Admin {
            return Err(AuthError::Forbidden("admin role cannot be self-assigned".into()));
        }
        let email = input.email.trim().to_lowercase();
        let role = if self.cfg.admin_emails.iter().any(|a| a == &email) { Role::Admin } else { requested };

        if let Some(existing) = self.repo.find_user_by_email(&email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let user = self.repo.create_user(&input.name, &email, role).await?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let _cred = self.repo.upsert_password(user.id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = %user.id, role = %user.role, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a bearer token.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email.trim().to_lowercase())
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    pub fn issue_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.cfg.token_ttl_hours)).timestamp(),
        };
        encode(&JwtHeader::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Resolve a bearer token to the caller it was issued for.
    pub fn resolve(&self, token: &str) -> Result<Caller, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            debug!(error = %e, "token_rejected");
            AuthError::Unauthorized
        })?;
        let id = Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::Unauthorized)?;
        Ok(Caller::new(id, data.claims.role))
    }

    pub async fn current_user(&self, caller: &Caller) -> Result<AuthUser, AuthError> {
        self.repo.find_user_by_id(caller.id).await?.ok_or(AuthError::NotFound)
    }
}
