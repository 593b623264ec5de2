//! Account entity (identity + credentials + roles).

use std::collections::BTreeSet;

use eventdesk_core::{AccountId, Entity};

use crate::AccountRole;

/// A registered account.
///
/// `password` holds whatever the caller put there: raw before
/// `AccountService::save_account`, encoded afterwards. Equality is identity
/// equality (same `id`).
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub password: String,
    pub roles: BTreeSet<AccountRole>,
}

impl Account {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        roles: impl IntoIterator<Item = AccountRole>,
    ) -> Self {
        Self {
            id: AccountId::new(),
            email: email.into(),
            password: password.into(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: AccountRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn role_names(&self) -> Vec<&'static str> {
        self.roles.iter().map(AccountRole::as_str).collect()
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity_as(other)
    }
}

impl Eq for Account {}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
