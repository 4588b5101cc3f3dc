//! # Authentication
//!
//! Login, logout, and first-run seeding of the default admin account.
//!
//! Passwords are stored as argon2 hashes. Verification failures and unknown
//! usernames return the same error so a probe can't enumerate accounts.

use tracing::{info, warn};
use uuid::Uuid;

use kade_core::{Role, UserAccount};
use kade_db::Database;

use crate::error::{AppError, AppResult};
use crate::session::SessionState;

/// Username of the account seeded on first run.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Password of the seeded admin account. Shown once in the log on first
/// run; the shop owner is expected to change it.
pub const DEFAULT_ADMIN_PASSWORD: &str = "123";

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password for storage.
pub fn hash_password(password: &str) -> AppResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verifies a password against its stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Commands
// =============================================================================

/// Seeds the default admin account when the users table is empty.
///
/// Runs at every startup; a no-op once any user exists. This keeps the shop
/// reachable after a full reset wipes the users table.
pub async fn ensure_default_admin(db: &Database) -> AppResult<()> {
    if db.users().count().await? > 0 {
        return Ok(());
    }

    let admin = UserAccount {
        id: Uuid::new_v4().to_string(),
        username: DEFAULT_ADMIN_USERNAME.to_string(),
        password_hash: hash_password(DEFAULT_ADMIN_PASSWORD)?,
        role: Role::Admin,
    };
    db.users().insert(&admin).await?;

    warn!(
        username = DEFAULT_ADMIN_USERNAME,
        "No users found; seeded default admin account - change its password"
    );
    Ok(())
}

/// Logs an operator in, binding them to the session.
///
/// ## Errors
/// [`crate::ErrorCode::InvalidCredentials`] for an unknown username or a
/// wrong password, indistinguishably.
pub async fn login(
    db: &Database,
    session: &SessionState,
    username: &str,
    password: &str,
) -> AppResult<UserAccount> {
    let Some(user) = db.users().get_by_username(username).await? else {
        return Err(AppError::invalid_credentials());
    };

    if !verify_password(password, &user.password_hash) {
        return Err(AppError::invalid_credentials());
    }

    info!(username = %user.username, role = ?user.role, "Operator logged in");

    session.with_session_mut(|s| {
        s.invalidate(); // drop any previous operator's cart
        s.user = Some(user.clone());
    });

    Ok(user)
}

/// Logs the operator out, discarding the cart and entry fields.
pub fn logout(session: &SessionState) {
    session.with_session_mut(|s| {
        if let Some(user) = &s.user {
            info!(username = %user.username, "Operator logged out");
        }
        s.invalidate();
    });
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use kade_db::DbConfig;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("secret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("secret", "not-a-hash"));
    }

    #[tokio::test]
    async fn test_default_admin_seeded_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        ensure_default_admin(&db).await.unwrap();
        ensure_default_admin(&db).await.unwrap();

        assert_eq!(db.users().count().await.unwrap(), 1);
        let admin = db
            .users()
            .get_by_username(DEFAULT_ADMIN_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        // Stored hashed, never cleartext
        assert_ne!(admin.password_hash, DEFAULT_ADMIN_PASSWORD);
    }

    #[tokio::test]
    async fn test_login_success_binds_session() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        ensure_default_admin(&db).await.unwrap();
        let session = SessionState::new();

        let user = login(&db, &session, "admin", "123").await.unwrap();
        assert_eq!(user.username, "admin");

        let logged_in = session.with_session(|s| s.user.clone()).unwrap();
        assert_eq!(logged_in.username, "admin");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        ensure_default_admin(&db).await.unwrap();
        let session = SessionState::new();

        let wrong_pass = login(&db, &session, "admin", "nope").await.unwrap_err();
        let wrong_user = login(&db, &session, "ghost", "123").await.unwrap_err();

        assert_eq!(wrong_pass.code, ErrorCode::InvalidCredentials);
        assert_eq!(wrong_user.code, ErrorCode::InvalidCredentials);
        assert_eq!(wrong_pass.message, wrong_user.message);
        assert!(session.with_session(|s| s.user.is_none()));
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        ensure_default_admin(&db).await.unwrap();
        let session = SessionState::new();

        login(&db, &session, "admin", "123").await.unwrap();
        logout(&session);

        assert!(session.with_session(|s| s.user.is_none()));
    }
}
