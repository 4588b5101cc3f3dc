//! # User Management Commands
//!
//! Admin-only operator account management. Password hashes never leave this
//! layer; the UI sees [`UserView`] only.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use kade_core::{validation, CoreError, Role, UserAccount};
use kade_db::Database;

use crate::auth;
use crate::error::{AppError, AppResult};
use crate::session::SessionState;

/// Operator account as shown in the user list, without the hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl From<UserAccount> for UserView {
    fn from(user: UserAccount) -> Self {
        UserView {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Lists all operator accounts.
pub async fn list_users(db: &Database, session: &SessionState) -> AppResult<Vec<UserView>> {
    session.with_session(|s| s.require_admin().map(|_| ()))?;

    let users = db.users().list_all().await?;
    Ok(users.into_iter().map(UserView::from).collect())
}

/// Creates a new operator account.
pub async fn add_user(
    db: &Database,
    session: &SessionState,
    username: &str,
    password: &str,
    role: Role,
) -> AppResult<UserView> {
    session.with_session(|s| s.require_admin().map(|_| ()))?;

    validation::validate_username(username).map_err(CoreError::from)?;
    if password.is_empty() {
        return Err(AppError::validation("Password is required"));
    }

    let user = UserAccount {
        id: Uuid::new_v4().to_string(),
        username: username.trim().to_string(),
        password_hash: auth::hash_password(password)?,
        role,
    };
    db.users().insert(&user).await?;

    info!(username = %user.username, role = ?role, "User created");
    Ok(user.into())
}

/// Deletes an operator account. Deleting your own account is rejected so
/// the session can never orphan itself mid-shift.
pub async fn delete_user(
    db: &Database,
    session: &SessionState,
    user_id: &str,
    confirmed: bool,
) -> AppResult<()> {
    let own_id = session.with_session(|s| s.require_admin().map(|u| u.id.clone()))?;

    if own_id == user_id {
        return Err(AppError::validation("You cannot delete your own account"));
    }

    if !confirmed {
        return Err(AppError::needs_confirmation("Delete this user account?"));
    }

    db.users().delete(user_id).await?;
    info!(id = %user_id, "User deleted");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
