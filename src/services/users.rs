//! User account and authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, Role, UpdateUser, UserAccount, UserClaims, UserProfile},
    store::{from_doc, to_doc, Collection, Store},
};

#[derive(Clone)]
pub struct UsersService {
    store: Store,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(store: Store, config: AuthConfig) -> Self {
        Self { store, config }
    }

    /// Authenticate by email and password, returning a bearer token and the
    /// profile. The same generic error covers unknown email and bad
    /// password.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, UserProfile)> {
        let account = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

        if !self.verify_password(&account, password)? {
            return Err(AppError::Authentication("Invalid credentials".to_string()));
        }

        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: account.email.clone(),
            user_id: account.id.clone(),
            role: account.role,
            iat: now,
            exp: now + self.config.jwt_expiration_hours as i64 * 3600,
        };
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!(user = %account.id, "User authenticated");
        Ok((token, account.into()))
    }

    /// List accounts, optionally restricted to one role
    pub async fn list(&self, role: Option<Role>) -> AppResult<Vec<UserProfile>> {
        let docs = self.store.list_all(Collection::Users).await?;
        let mut users = Vec::new();
        for (key, doc) in docs {
            let account: UserAccount = from_doc(Collection::Users, &key, doc)?;
            if role.map_or(true, |r| account.role == r) {
                users.push(account.into());
            }
        }
        Ok(users)
    }

    /// Get an account by id
    pub async fn get(&self, id: &str) -> AppResult<UserProfile> {
        Ok(self.get_account(id).await?.into())
    }

    /// Register a new account
    pub async fn create(&self, request: CreateUser) -> AppResult<UserProfile> {
        if self.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "An account with email {} already exists",
                request.email
            )));
        }

        let account = UserAccount {
            id: Uuid::new_v4().to_string(),
            full_name: request.full_name,
            email: request.email,
            password_hash: self.hash_password(&request.password)?,
            role: request.role,
            created_at: Utc::now(),
        };
        self.store
            .put(Collection::Users, &account.id, to_doc(&account)?, false)
            .await?;
        tracing::info!(user = %account.id, role = %account.role, "User registered");
        Ok(account.into())
    }

    /// Update an account; omitted fields are left unchanged
    pub async fn update(&self, id: &str, request: UpdateUser) -> AppResult<UserProfile> {
        self.get_account(id).await?;

        let mut patch = serde_json::Map::new();
        if let Some(full_name) = request.full_name {
            patch.insert("full_name".to_string(), json!(full_name));
        }
        if let Some(email) = request.email {
            if let Some(existing) = self.find_by_email(&email).await? {
                if existing.id != id {
                    return Err(AppError::Conflict(format!(
                        "An account with email {} already exists",
                        email
                    )));
                }
            }
            patch.insert("email".to_string(), json!(email));
        }
        if let Some(password) = request.password {
            patch.insert("password_hash".to_string(), json!(self.hash_password(&password)?));
        }
        if let Some(role) = request.role {
            patch.insert("role".to_string(), json!(role));
        }

        if !patch.is_empty() {
            self.store
                .put(Collection::Users, id, serde_json::Value::Object(patch), true)
                .await?;
        }
        self.get(id).await
    }

    /// Delete an account
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.get_account(id).await?;
        self.store.delete(Collection::Users, id).await?;
        tracing::info!(user = %id, "User deleted");
        Ok(())
    }

    async fn get_account(&self, id: &str) -> AppResult<UserAccount> {
        match self.store.get(Collection::Users, id).await? {
            Some(doc) => from_doc(Collection::Users, id, doc),
            None => Err(AppError::NotFound(format!("User {} not found", id))),
        }
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
        let docs = self.store.list_all(Collection::Users).await?;
        for (key, doc) in docs {
            let account: UserAccount = from_doc(Collection::Users, &key, doc)?;
            if account.email.eq_ignore_ascii_case(email) {
                return Ok(Some(account));
            }
        }
        Ok(None)
    }

    fn verify_password(&self, account: &UserAccount, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&account.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
