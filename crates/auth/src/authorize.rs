//! Ownership checks for manager-only operations.
//!
//! - No IO
//! - No panics
//! - Pure policy check on identities

use thiserror::Error;

use eventdesk_core::AccountId;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthzError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("requester is not the manager of this resource")]
    NotManager,
}

/// `true` when an authenticated requester is the resource's manager.
///
/// A resource without a manager is managed by nobody.
pub fn is_manager(requester: Option<AccountId>, manager: Option<AccountId>) -> bool {
    matches!((requester, manager), (Some(r), Some(m)) if r == m)
}

/// Require the requester to be the resource's manager.
pub fn authorize_manager(
    requester: Option<AccountId>,
    manager: Option<AccountId>,
) -> Result<(), AuthzError> {
    let requester = requester.ok_or(AuthzError::Unauthenticated)?;
    if is_manager(Some(requester), manager) {
        Ok(())
    } else {
        Err(AuthzError::NotManager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manager_is_authorized() {
        let id = AccountId::new();
        assert_eq!(authorize_manager(Some(id), Some(id)), Ok(()));
    }

    #[test]
    fn other_account_is_rejected() {
        let manager = AccountId::new();
        let other = AccountId::new();
        assert_eq!(
            authorize_manager(Some(other), Some(manager)),
            Err(AuthzError::NotManager)
        );
    }

    #[test]
    fn anonymous_is_rejected() {
        assert_eq!(
            authorize_manager(None, Some(AccountId::new())),
            Err(AuthzError::Unauthenticated)
        );
    }

    #[test]
    fn unmanaged_resource_has_no_manager() {
        assert!(!is_manager(Some(AccountId::new()), None));
        assert!(!is_manager(None, None));
    }
}
