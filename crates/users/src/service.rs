//! User service.

use std::sync::Arc;

use thiserror::Error;

use user_order_auth::{hash_password, issue_token, verify_password};
use user_order_core::{
    NewUser, Page, PageRequest, RepoError, UpdateOutcome, User, UserFilter, UserRepository,
};

/// Minimum accepted password length at registration.
const MIN_PASSWORD_LEN: usize = 6;

/// Maximum length for `name` and `email`.
const MAX_FIELD_LEN: usize = 255;

/// Token issuance parameters, fixed at startup.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl_seconds: u64,
}

/// Registration input.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub age: u32,
    pub password: String,
}

/// Login input.
#[derive(Debug, Clone)]
pub struct Login {
    pub email: String,
    pub password: String,
}

/// Selective update input: absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserServiceError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("user not found")]
    NotFound,

    #[error("user with this email already exists")]
    AlreadyExists,

    #[error("email already taken")]
    EmailTaken,

    /// Covers both "no such user" and "wrong password"; callers must not be
    /// able to tell the two apart.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("database error: {0}")]
    Db(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepoError> for UserServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound,
            RepoError::UniqueViolation(_) => Self::EmailTaken,
            RepoError::NoRowsAffected => Self::NotFound,
            RepoError::Db(msg) => Self::Db(msg),
        }
    }
}

/// Business rules for users, over any [`UserRepository`].
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    token: TokenConfig,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, token: TokenConfig) -> Self {
        Self { repo, token }
    }

    /// Register a new user: validate, enforce email uniqueness, hash the
    /// password, persist.
    pub async fn register(&self, input: RegisterUser) -> Result<User, UserServiceError> {
        let name = validate_name(&input.name)?;
        let email = validate_email(&input.email)?;
        if input.age == 0 {
            return Err(UserServiceError::InvalidInput(
                "age must be positive".to_string(),
            ));
        }
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(UserServiceError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        match self.repo.get_by_email(&email).await {
            Ok(_) => return Err(UserServiceError::AlreadyExists),
            Err(RepoError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let password_hash = hash_password(&input.password)
            .map_err(|e| UserServiceError::Internal(e.to_string()))?;

        let user = self
            .repo
            .create(NewUser {
                name,
                email,
                age: input.age,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                // Lost the race against a concurrent registration.
                RepoError::UniqueViolation(_) => UserServiceError::AlreadyExists,
                other => other.into(),
            })?;

        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }

    /// Verify credentials and mint a bearer token.
    pub async fn login(&self, input: Login) -> Result<String, UserServiceError> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(UserServiceError::InvalidInput(
                "email and password are required".to_string(),
            ));
        }

        let user = match self.repo.get_by_email(input.email.trim()).await {
            Ok(user) => user,
            Err(RepoError::NotFound) => return Err(UserServiceError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        if !verify_password(&input.password, &user.password_hash) {
            return Err(UserServiceError::InvalidCredentials);
        }

        issue_token(user.id, &user.email, &self.token.secret, self.token.ttl_seconds)
            .map_err(|e| UserServiceError::Internal(e.to_string()))
    }

    pub async fn get_by_id(&self, id: u32) -> Result<User, UserServiceError> {
        if id == 0 {
            return Err(UserServiceError::NotFound);
        }
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, UserServiceError> {
        if email.trim().is_empty() {
            return Err(UserServiceError::NotFound);
        }
        Ok(self.repo.get_by_email(email).await?)
    }

    /// List users. Pagination is pre-clamped by [`PageRequest`]; unknown
    /// filters never reach this layer.
    pub async fn list(
        &self,
        page: PageRequest,
        filter: &UserFilter,
    ) -> Result<Page<User>, UserServiceError> {
        Ok(self.repo.list(page, filter).await?)
    }

    /// Apply each provided, strictly-different field. A patch that changes
    /// nothing is not an error: the current entity comes back as `NoChange`.
    pub async fn update(
        &self,
        id: u32,
        patch: UserPatch,
    ) -> Result<UpdateOutcome<User>, UserServiceError> {
        let mut user = self.get_by_id(id).await?;
        let mut changed = false;

        if let Some(name) = patch.name {
            let name = validate_name(&name)?;
            if name != user.name {
                user.name = name;
                changed = true;
            }
        }

        if let Some(email) = patch.email {
            let email = validate_email(&email)?;
            if !email.eq_ignore_ascii_case(&user.email) {
                // Another non-deleted user must not already hold the address.
                match self.repo.get_by_email(&email).await {
                    Ok(other) if other.id != user.id => {
                        return Err(UserServiceError::EmailTaken)
                    }
                    Ok(_) | Err(RepoError::NotFound) => {}
                    Err(e) => return Err(e.into()),
                }
                user.email = email;
                changed = true;
            }
        }

        if let Some(age) = patch.age {
            if age == 0 {
                return Err(UserServiceError::InvalidInput(
                    "age must be positive".to_string(),
                ));
            }
            if age != user.age {
                user.age = age;
                changed = true;
            }
        }

        if !changed {
            return Ok(UpdateOutcome::NoChange(user));
        }

        self.repo.update(&user).await.map_err(|e| match e {
            // Concurrently deleted between fetch and save.
            RepoError::NoRowsAffected => UserServiceError::NotFound,
            RepoError::UniqueViolation(_) => UserServiceError::EmailTaken,
            other => other.into(),
        })?;

        Ok(UpdateOutcome::Applied(user))
    }

    pub async fn delete(&self, id: u32) -> Result<(), UserServiceError> {
        if id == 0 {
            return Err(UserServiceError::NotFound);
        }
        Ok(self.repo.delete(id).await?)
    }
}

fn validate_name(name: &str) -> Result<String, UserServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(UserServiceError::InvalidInput(
            "name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_FIELD_LEN {
        return Err(UserServiceError::InvalidInput(format!(
            "name must be at most {MAX_FIELD_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// RFC-5322-ish sanity check: one `@`, non-empty local part, dotted domain.
fn validate_email(email: &str) -> Result<String, UserServiceError> {
    let email = email.trim();
    let invalid = || UserServiceError::InvalidInput("invalid email address".to_string());

    if email.is_empty() || email.len() > MAX_FIELD_LEN {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }

    Ok(email.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use user_order_auth::verify_token;
    use user_order_infra::memory::InMemoryStore;

    fn service(store: &Arc<InMemoryStore>) -> UserService {
        UserService::new(
            store.clone() as Arc<dyn UserRepository>,
            TokenConfig {
                secret: "test-secret".to_string(),
                ttl_seconds: 600,
            },
        )
    }

    fn ann() -> RegisterUser {
        RegisterUser {
            name: "Ann".to_string(),
            email: "ann@ex.io".to_string(),
            age: 30,
            password: "pw12345".to_string(),
        }
    }

    #[tokio::test]
    async fn register_assigns_id_and_hashes_password() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);

        let user = svc.register(ann()).await.unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.email, "ann@ex.io");
        assert_ne!(user.password_hash, "pw12345");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);

        svc.register(ann()).await.unwrap();
        let err = svc.register(ann()).await.unwrap_err();
        assert_eq!(err, UserServiceError::AlreadyExists);
    }

    #[tokio::test]
    async fn register_validates_input() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);

        let cases = [
            RegisterUser { name: "  ".to_string(), ..ann() },
            RegisterUser { email: "not-an-email".to_string(), ..ann() },
            RegisterUser { email: "a@b".to_string(), ..ann() },
            RegisterUser { age: 0, ..ann() },
            RegisterUser { password: "short".to_string(), ..ann() },
        ];
        for case in cases {
            assert!(matches!(
                svc.register(case).await,
                Err(UserServiceError::InvalidInput(_))
            ));
        }
    }

    #[tokio::test]
    async fn login_mints_a_verifiable_token() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        let user = svc.register(ann()).await.unwrap();

        let token = svc
            .login(Login {
                email: "ann@ex.io".to_string(),
                password: "pw12345".to_string(),
            })
            .await
            .unwrap();

        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.user_id, user.id);
        assert_eq!(claims.email, "ann@ex.io");
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        svc.register(ann()).await.unwrap();

        let unknown = svc
            .login(Login {
                email: "nobody@ex.io".to_string(),
                password: "x".to_string(),
            })
            .await
            .unwrap_err();
        let wrong_pw = svc
            .login(Login {
                email: "ann@ex.io".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(unknown, UserServiceError::InvalidCredentials);
        assert_eq!(wrong_pw, UserServiceError::InvalidCredentials);
    }

    #[tokio::test]
    async fn update_applies_only_changed_fields() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        let user = svc.register(ann()).await.unwrap();

        let outcome = svc
            .update(
                user.id,
                UserPatch {
                    name: Some("Ann".to_string()), // unchanged
                    age: Some(31),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = match outcome {
            UpdateOutcome::Applied(u) => u,
            other => panic!("expected Applied, got {other:?}"),
        };
        assert_eq!(updated.age, 31);
        assert_eq!(updated.name, "Ann");
    }

    #[tokio::test]
    async fn noop_update_returns_current_entity() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        let user = svc.register(ann()).await.unwrap();

        let outcome = svc.update(user.id, UserPatch::default()).await.unwrap();
        assert!(matches!(outcome, UpdateOutcome::NoChange(ref u) if u.id == user.id));

        let outcome = svc
            .update(
                user.id,
                UserPatch {
                    age: Some(30),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(matches!(outcome, UpdateOutcome::NoChange(_)));
    }

    #[tokio::test]
    async fn update_rejects_taken_email() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        svc.register(ann()).await.unwrap();
        let bob = svc
            .register(RegisterUser {
                name: "Bob".to_string(),
                email: "bob@ex.io".to_string(),
                age: 40,
                password: "pw12345".to_string(),
            })
            .await
            .unwrap();

        let err = svc
            .update(
                bob.id,
                UserPatch {
                    email: Some("ann@ex.io".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, UserServiceError::EmailTaken);
    }

    #[tokio::test]
    async fn delete_then_read_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        let user = svc.register(ann()).await.unwrap();

        svc.delete(user.id).await.unwrap();
        assert_eq!(
            svc.get_by_id(user.id).await.unwrap_err(),
            UserServiceError::NotFound
        );
        // Second delete: the row is already invisible.
        assert_eq!(
            svc.delete(user.id).await.unwrap_err(),
            UserServiceError::NotFound
        );
    }

    #[tokio::test]
    async fn deleted_email_can_be_reused() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        let user = svc.register(ann()).await.unwrap();
        svc.delete(user.id).await.unwrap();

        let again = svc.register(ann()).await.unwrap();
        assert_ne!(again.id, user.id);
    }

    #[tokio::test]
    async fn zero_id_short_circuits() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        assert_eq!(svc.get_by_id(0).await.unwrap_err(), UserServiceError::NotFound);
        assert_eq!(svc.delete(0).await.unwrap_err(), UserServiceError::NotFound);
        assert_eq!(
            svc.get_by_email("").await.unwrap_err(),
            UserServiceError::NotFound
        );
    }
}
