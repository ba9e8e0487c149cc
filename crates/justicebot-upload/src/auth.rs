//! Authentication collaborator.

use std::sync::{PoisonError, RwLock};

use justicebot_core::UserId;

/// Supplies the signed-in user. Uploads are refused when there is none.
pub trait AuthProvider: Send + Sync {
    fn current_user(&self) -> Option<UserId>;
}

/// In-process session holder: whoever signs in last is the current user.
#[derive(Debug, Default)]
pub struct SessionAuth {
    user: RwLock<Option<UserId>>,
}

impl SessionAuth {
    pub fn signed_in(user: UserId) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user: UserId) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    pub fn sign_out(&self) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl AuthProvider for SessionAuth {
    fn current_user(&self) -> Option<UserId> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
