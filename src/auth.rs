//! Authentication seam.
//!
//! Login and logout live outside this crate; the record layer only ever
//! asks "who is the current user" — to stamp creator ids on new records
//! and to scope domain queries. The trait mirrors that single question.

/// The signed-in user as reported by the external auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Provider-assigned uid; doubles as the user record's document id.
    pub uid: String,
    pub email: String,
    pub verified: bool,
}

/// Source of the current user, implemented by the hosting application.
pub trait AuthProvider: Send + Sync {
    /// The signed-in user, or `None` when nobody is signed in.
    fn current_user(&self) -> Option<CurrentUser>;
}

/// Fixed-answer provider for tests and tools.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthProvider {
    user: Option<CurrentUser>,
}

impl StaticAuthProvider {
    /// A provider with the given user signed in.
    pub fn signed_in(uid: impl Into<String>, email: impl Into<String>, verified: bool) -> Self {
        Self {
            user: Some(CurrentUser {
                uid: uid.into(),
                email: email.into(),
                verified,
            }),
        }
    }

    /// A provider with nobody signed in.
    pub fn signed_out() -> Self {
        Self { user: None }
    }
}

impl AuthProvider for StaticAuthProvider {
    fn current_user(&self) -> Option<CurrentUser> {
        self.user.clone()
    }
}
