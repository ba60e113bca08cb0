use edupath_core::model::{AuthToken, SessionId};

/// Which account on the subscription is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Primary,
    /// A child sub-account; screens render the gamified child mode.
    SubAccount,
}

/// Everything screens need about the logged-in session.
///
/// Constructed at login and passed by reference; never a module-level
/// singleton. Switching accounts produces a new context (and a new session
/// id), so heartbeats bound to the old context go stale naturally.
#[derive(Debug, Clone)]
pub struct SessionContext {
    session_id: SessionId,
    auth_token: AuthToken,
    display_name: String,
    account_kind: AccountKind,
}

impl SessionContext {
    /// Build the context for a fresh login on the primary account.
    #[must_use]
    pub fn login(auth_token: AuthToken, display_name: impl Into<String>) -> Self {
        Self {
            session_id: SessionId::generate(),
            auth_token,
            display_name: display_name.into(),
            account_kind: AccountKind::Primary,
        }
    }

    /// Hand the device over to another account on the same credentials.
    ///
    /// A new session id is issued; anything still polling with the old
    /// context will be reported stale by the backend.
    #[must_use]
    pub fn switch_account(&self, display_name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            session_id: SessionId::generate(),
            auth_token: self.auth_token.clone(),
            display_name: display_name.into(),
            account_kind: kind,
        }
    }

    /// End the session, consuming the context.
    pub fn logout(self) {}

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    #[must_use]
    pub fn auth_token(&self) -> &AuthToken {
        &self.auth_token
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn account_kind(&self) -> AccountKind {
        self.account_kind
    }

    #[must_use]
    pub fn is_sub_account(&self) -> bool {
        matches!(self.account_kind, AccountKind::SubAccount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_starts_on_primary_account() {
        let ctx = SessionContext::login(AuthToken::new("t"), "Dana");
        assert_eq!(ctx.account_kind(), AccountKind::Primary);
        assert!(!ctx.is_sub_account());
        assert_eq!(ctx.display_name(), "Dana");
    }

    #[test]
    fn switch_account_rotates_session_id() {
        let ctx = SessionContext::login(AuthToken::new("t"), "Dana");
        let child = ctx.switch_account("Milo", AccountKind::SubAccount);

        assert_ne!(ctx.session_id(), child.session_id());
        assert!(child.is_sub_account());
        assert_eq!(child.auth_token(), ctx.auth_token());
    }
}
