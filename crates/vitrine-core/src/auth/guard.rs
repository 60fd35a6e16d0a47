//! Navigation guard for protected views.
//!
//! The decision is a pure function of `SessionState`, evaluated on every
//! render of a protected path rather than once per session.

use tokio::sync::watch;

use super::session::SessionState;

/// Prefix under which every view requires an authenticated session
pub const DEFAULT_PROTECTED_PREFIX: &str = "/admin";

/// Where anonymous visitors of a protected view are sent
pub const DEFAULT_LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Startup check still running: show a neutral placeholder, never redirect yet
    Pending,
    Render,
    Redirect { to: String },
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    protected_prefix: String,
    login_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(DEFAULT_PROTECTED_PREFIX, DEFAULT_LOGIN_PATH)
    }
}

impl RouteGuard {
    pub fn new(protected_prefix: &str, login_path: &str) -> Self {
        Self {
            protected_prefix: protected_prefix.trim_end_matches('/').to_string(),
            login_path: login_path.to_string(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn is_protected(&self, path: &str) -> bool {
        let path = path.trim_end_matches('/');
        path == self.protected_prefix
            || path
                .strip_prefix(self.protected_prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Policy for a protected view
    pub fn decide(&self, state: &SessionState) -> GuardDecision {
        if state.initializing {
            GuardDecision::Pending
        } else if state.identity.is_some() {
            GuardDecision::Render
        } else {
            GuardDecision::Redirect {
                to: self.login_path.clone(),
            }
        }
    }

    /// Decision for navigating to `path`; unprotected paths always render
    pub fn check(&self, path: &str, state: &SessionState) -> GuardDecision {
        if self.is_protected(path) {
            self.decide(state)
        } else {
            GuardDecision::Render
        }
    }

    /// Re-evaluate on every state change until the decision is final.
    pub async fn settle(&self, path: &str, rx: &mut watch::Receiver<SessionState>) -> GuardDecision {
        loop {
            let decision = self.check(path, &rx.borrow_and_update());
            if decision != GuardDecision::Pending {
                return decision;
            }
            if rx.changed().await.is_err() {
                // Controller is gone; judge on the last published state
                return self.check(path, &rx.borrow());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserIdentity;

    fn state(initializing: bool, identity: Option<&str>) -> SessionState {
        SessionState {
            identity: identity.map(UserIdentity::named),
            initializing,
        }
    }

    #[test]
    fn test_decide_policy() {
        let guard = RouteGuard::default();
        assert_eq!(guard.decide(&state(true, None)), GuardDecision::Pending);
        assert_eq!(guard.decide(&state(true, Some("Admin"))), GuardDecision::Pending);
        assert_eq!(
            guard.decide(&state(false, None)),
            GuardDecision::Redirect { to: "/login".to_string() }
        );
        assert_eq!(guard.decide(&state(false, Some("Admin"))), GuardDecision::Render);
    }

    #[test]
    fn test_protected_paths() {
        let guard = RouteGuard::default();
        assert!(guard.is_protected("/admin"));
        assert!(guard.is_protected("/admin/"));
        assert!(guard.is_protected("/admin/produtos"));
        assert!(!guard.is_protected("/administracao"));
        assert!(!guard.is_protected("/produtos"));
        assert!(!guard.is_protected("/"));
    }

    #[test]
    fn test_unprotected_paths_always_render() {
        let guard = RouteGuard::default();
        assert_eq!(guard.check("/produtos", &state(true, None)), GuardDecision::Render);
        assert_eq!(guard.check("/", &state(false, None)), GuardDecision::Render);
        assert_eq!(guard.check("/admin/vendas", &state(true, None)), GuardDecision::Pending);
    }

    #[test]
    fn test_custom_paths() {
        let guard = RouteGuard::new("/painel/", "/entrar");
        assert!(guard.is_protected("/painel/clientes"));
        assert_eq!(
            guard.check("/painel", &state(false, None)),
            GuardDecision::Redirect { to: "/entrar".to_string() }
        );
    }

    #[tokio::test]
    async fn test_settle_waits_out_pending() {
        let guard = RouteGuard::default();
        let (tx, mut rx) = watch::channel(state(true, None));

        let settle = guard.settle("/admin", &mut rx);
        let publish = async {
            tokio::task::yield_now().await;
            tx.send_replace(state(true, Some("Admin")));
            tokio::task::yield_now().await;
            tx.send_replace(state(false, Some("Admin")));
        };
        let (decision, ()) = tokio::join!(settle, publish);
        assert_eq!(decision, GuardDecision::Render);
    }

    #[tokio::test]
    async fn test_settle_when_controller_dropped() {
        let guard = RouteGuard::default();
        let (tx, mut rx) = watch::channel(state(true, None));
        drop(tx);
        assert_eq!(guard.settle("/admin", &mut rx).await, GuardDecision::Pending);
        assert_eq!(guard.settle("/produtos", &mut rx).await, GuardDecision::Render);
    }
}
