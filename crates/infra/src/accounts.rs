//! Account service: registration, credential checks and lookups.

use std::sync::Arc;

use thiserror::Error;

use eventdesk_auth::{Account, AccountRole, PasswordEncoder};

use crate::repository::{AccountRepository, RepositoryError};

const MIN_PASSWORD_LEN: usize = 4;

/// Emails are stored and looked up without surrounding whitespace.
fn normalize_email(email: &str) -> &str {
    email.trim()
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("username not found: {0}")]
    UsernameNotFound(String),

    #[error("bad credentials")]
    BadCredentials,

    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    #[error("invalid account: {0}")]
    Invalid(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Account operations over a repository and a password encoder.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    encoder: Arc<dyn PasswordEncoder>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountRepository>, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self { accounts, encoder }
    }

    /// Encode the account's raw password and persist it.
    pub async fn save_account(&self, mut account: Account) -> Result<Account, AccountError> {
        account.email = normalize_email(&account.email).to_string();
        account.password = self.encoder.encode(&account.password);
        let email = account.email.clone();
        match self.accounts.save(account).await {
            Ok(saved) => Ok(saved),
            Err(RepositoryError::Conflict(_)) => Err(AccountError::DuplicateEmail(email)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn load_user_by_username(&self, email: &str) -> Result<Account, AccountError> {
        let email = normalize_email(email);
        self.accounts
            .find_by_email(email)
            .await?
            .ok_or_else(|| AccountError::UsernameNotFound(email.to_string()))
    }

    /// Account for `email` if `raw_password` matches its stored hash.
    pub async fn authenticate(&self, email: &str, raw_password: &str) -> Result<Account, AccountError> {
        let account = match self.load_user_by_username(email).await {
            Ok(account) => account,
            Err(AccountError::UsernameNotFound(_)) => return Err(AccountError::BadCredentials),
            Err(e) => return Err(e),
        };

        if self.encoder.matches(raw_password, &account.password) {
            Ok(account)
        } else {
            Err(AccountError::BadCredentials)
        }
    }

    /// Self-service registration; new accounts get the `USER` role.
    pub async fn register(&self, email: &str, password: &str) -> Result<Account, AccountError> {
        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(AccountError::Invalid(format!("invalid email '{email}'")));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::Invalid(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.accounts.find_by_email(email).await?.is_some() {
            return Err(AccountError::DuplicateEmail(email.to_string()));
        }

        let account = Account::new(email, password, [AccountRole::User]);
        let saved = self.save_account(account).await?;
        tracing::info!(account_id = %saved.id, "account registered");
        Ok(saved)
    }
}
