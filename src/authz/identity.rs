use std::sync::{Arc, RwLock, RwLockWriteGuard};

use uuid::Uuid;

/// Read accessor for the current user's role name.
///
/// `None` means no authenticated user. The resolver calls this on every query.
pub trait IdentitySource {
    fn current_role_name(&self) -> Option<String>;
}

/// The authenticated user as seen by the authorization layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub role: Option<String>,
}

impl CurrentUser {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id, role: None }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

impl IdentitySource for CurrentUser {
    fn current_role_name(&self) -> Option<String> {
        self.role.clone()
    }
}

impl<T: IdentitySource> IdentitySource for Option<T> {
    fn current_role_name(&self) -> Option<String> {
        self.as_ref().and_then(|user| user.current_role_name())
    }
}

impl<T: IdentitySource + ?Sized> IdentitySource for &T {
    fn current_role_name(&self) -> Option<String> {
        (**self).current_role_name()
    }
}

impl<T: IdentitySource + ?Sized> IdentitySource for Arc<T> {
    fn current_role_name(&self) -> Option<String> {
        (**self).current_role_name()
    }
}

/// Bare role names, mostly for tests and the CLI.
impl IdentitySource for str {
    fn current_role_name(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IdentitySource for String {
    fn current_role_name(&self) -> Option<String> {
        Some(self.clone())
    }
}

/// Closure accessor.
#[derive(Clone)]
pub struct FnIdentity<F>(pub F);

impl<F> IdentitySource for FnIdentity<F>
where
    F: Fn() -> Option<String>,
{
    fn current_role_name(&self) -> Option<String> {
        (self.0)()
    }
}

/// Shared, swappable login state.
///
/// Clones share the same slot, so a resolver built over one clone observes
/// logins and logouts made through another.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Arc<RwLock<Option<CurrentUser>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&self, user: CurrentUser) {
        tracing::debug!(user_id = %user.user_id, role = ?user.role, "session login");
        *self.slot() = Some(user);
    }

    pub fn logout(&self) {
        tracing::debug!("session logout");
        *self.slot() = None;
    }

    /// Replace the role of the logged-in user; no-op when nobody is logged in.
    pub fn refresh_role(&self, role: Option<String>) {
        if let Some(user) = self.slot().as_mut() {
            user.role = role;
        }
    }

    /// Write access that survives a writer panicking elsewhere. A poisoned
    /// slot is reset to "no user" before it is handed out.
    fn slot(&self) -> RwLockWriteGuard<'_, Option<CurrentUser>> {
        match self.user.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("session lock poisoned, dropping the logged-in user");
                let mut guard = poisoned.into_inner();
                *guard = None;
                self.user.clear_poison();
                guard
            }
        }
    }

    /// `None` while the slot is poisoned.
    pub fn current_user(&self) -> Option<CurrentUser> {
        self.user.read().ok().and_then(|slot| slot.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }
}

impl IdentitySource for Session {
    fn current_role_name(&self) -> Option<String> {
        self.current_user().current_role_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_user_reports_role() {
        let user = CurrentUser::new(Uuid::new_v4()).with_role("manager");
        assert_eq!(user.current_role_name().as_deref(), Some("manager"));
        assert_eq!(CurrentUser::new(Uuid::new_v4()).current_role_name(), None);
    }

    #[test]
    fn missing_user_has_no_role() {
        let none: Option<CurrentUser> = None;
        assert_eq!(none.current_role_name(), None);
    }

    #[test]
    fn session_tracks_login_and_logout() {
        let session = Session::new();
        let observer = session.clone();
        assert!(!observer.is_authenticated());

        session.login(CurrentUser::new(Uuid::new_v4()).with_role("operator"));
        assert_eq!(observer.current_role_name().as_deref(), Some("operator"));

        session.refresh_role(Some("admin".into()));
        assert_eq!(observer.current_role_name().as_deref(), Some("admin"));

        session.logout();
        assert_eq!(observer.current_role_name(), None);

        session.refresh_role(Some("owner".into()));
        assert_eq!(observer.current_role_name(), None);
    }

    fn poison(session: &Session) {
        let user = Arc::clone(&session.user);
        let _ = std::thread::spawn(move || {
            let _guard = user.write().unwrap();
            panic!("writer died");
        })
        .join();
        assert!(session.user.is_poisoned());
    }

    #[test]
    fn poisoned_session_fails_closed() {
        let session = Session::new();
        session.login(CurrentUser::new(Uuid::new_v4()).with_role("owner"));
        poison(&session);
        assert_eq!(session.current_role_name(), None);

        session.logout();
        assert!(!session.user.is_poisoned());
        assert_eq!(session.current_user(), None);

        session.login(CurrentUser::new(Uuid::new_v4()).with_role("viewer"));
        assert_eq!(session.current_role_name().as_deref(), Some("viewer"));
    }

    #[test]
    fn refresh_after_poison_does_not_revive_user() {
        let session = Session::new();
        session.login(CurrentUser::new(Uuid::new_v4()).with_role("operator"));
        poison(&session);

        session.refresh_role(Some("owner".into()));
        assert_eq!(session.current_user(), None);
    }

    #[test]
    fn closure_source() {
        let source = FnIdentity(|| Some("viewer".to_string()));
        assert_eq!(source.current_role_name().as_deref(), Some("viewer"));
    }
}
