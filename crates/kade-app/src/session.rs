//! # Session State
//!
//! Per-operator, in-memory state: who is logged in, the cart being built,
//! the active price mode, and the checkout entry fields. Everything here
//! dies with the session; durable data lives in the database.
//!
//! ## Thread Safety
//! The session is wrapped in `Arc<Mutex<T>>`: commands may run concurrently,
//! but only one at a time may touch the session. Operations under the lock
//! are quick (no I/O), so a Mutex is enough - no RwLock needed.

use std::sync::{Arc, Mutex};

use kade_core::{Cart, Money, PriceMode, Role, UserAccount};

use crate::error::{AppError, AppResult};

/// One operator's session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// The logged-in operator, if any.
    pub user: Option<UserAccount>,

    /// The cart being built for the current sale.
    pub cart: Cart,

    /// Which price tier new cart lines lock in.
    pub price_mode: PriceMode,

    /// Customer name entry field. Blank falls back to the default sentinel
    /// at checkout.
    pub customer_name: String,

    /// Cash tendered entry field. `None` (left blank) defaults to the cart
    /// total at checkout, meaning exact payment.
    pub cash_given: Option<Money>,
}

impl Session {
    /// The logged-in user, or an Unauthorized error.
    pub fn require_user(&self) -> AppResult<&UserAccount> {
        self.user
            .as_ref()
            .ok_or_else(|| AppError::unauthorized("Not logged in"))
    }

    /// The logged-in user if they are an admin, otherwise Unauthorized.
    pub fn require_admin(&self) -> AppResult<&UserAccount> {
        let user = self.require_user()?;
        if user.role != Role::Admin {
            return Err(AppError::unauthorized("Admin access required"));
        }
        Ok(user)
    }

    /// Clears the checkout entry fields after a committed sale. The price
    /// mode is deliberately kept: a wholesale session stays wholesale.
    pub fn reset_entry_fields(&mut self) {
        self.customer_name.clear();
        self.cash_given = None;
    }

    /// Drops everything tied to the operator: user, cart, entry fields.
    /// Used by logout and by backup import (stale state after a restore).
    pub fn invalidate(&mut self) {
        self.user = None;
        self.cart.clear();
        self.price_mode = PriceMode::default();
        self.reset_entry_fields();
    }
}

/// Shared handle to the session, cloneable across commands.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    inner: Arc<Mutex<Session>>,
}

impl SessionState {
    /// Creates a fresh logged-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the session.
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let session = self.inner.lock().expect("Session mutex poisoned");
        f(&session)
    }

    /// Executes a function with write access to the session.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut session = self.inner.lock().expect("Session mutex poisoned");
        f(&mut session)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use uuid::Uuid;

    fn user(role: Role) -> UserAccount {
        UserAccount {
            id: Uuid::new_v4().to_string(),
            username: "someone".to_string(),
            password_hash: "$argon2id$test".to_string(),
            role,
        }
    }

    #[test]
    fn test_require_user_when_logged_out() {
        let session = Session::default();
        let err = session.require_user().unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[test]
    fn test_require_admin_rejects_staff() {
        let session = Session {
            user: Some(user(Role::Staff)),
            ..Session::default()
        };
        assert!(session.require_user().is_ok());
        assert_eq!(
            session.require_admin().unwrap_err().code,
            ErrorCode::Unauthorized
        );
    }

    #[test]
    fn test_reset_entry_fields_keeps_price_mode() {
        let mut session = Session {
            price_mode: PriceMode::Wholesale,
            customer_name: "Nimal".to_string(),
            cash_given: Some(Money::from_cents(100000)),
            ..Session::default()
        };

        session.reset_entry_fields();

        assert!(session.customer_name.is_empty());
        assert!(session.cash_given.is_none());
        assert_eq!(session.price_mode, PriceMode::Wholesale);
    }

    #[test]
    fn test_invalidate_clears_everything() {
        let mut session = Session {
            user: Some(user(Role::Admin)),
            price_mode: PriceMode::Wholesale,
            customer_name: "Nimal".to_string(),
            ..Session::default()
        };

        session.invalidate();

        assert!(session.user.is_none());
        assert!(session.cart.is_empty());
        assert_eq!(session.price_mode, PriceMode::Retail);
    }

    #[test]
    fn test_session_state_shared_across_clones() {
        let state = SessionState::new();
        let clone = state.clone();

        state.with_session_mut(|s| s.customer_name = "Kamala".to_string());
        let name = clone.with_session(|s| s.customer_name.clone());

        assert_eq!(name, "Kamala");
    }
}
