//! Bootstrap accounts.

use eventdesk_auth::{Account, AccountRole};

use crate::accounts::{AccountError, AccountService};
use crate::config::{AppConfig, SeedAccount};

/// Create the configured admin and user accounts unless their emails already exist.
pub async fn seed_accounts(service: &AccountService, config: &AppConfig) -> Result<(), AccountError> {
    seed_one(service, &config.admin, [AccountRole::Admin, AccountRole::User]).await?;
    seed_one(service, &config.user, [AccountRole::User]).await?;
    Ok(())
}

async fn seed_one<const N: usize>(
    service: &AccountService,
    seed: &SeedAccount,
    roles: [AccountRole; N],
) -> Result<(), AccountError> {
    match service.load_user_by_username(&seed.username).await {
        Ok(_) => {
            tracing::debug!(email = %seed.username, "seed account already present");
            Ok(())
        }
        Err(AccountError::UsernameNotFound(_)) => {
            let account = service
                .save_account(Account::new(seed.username.clone(), seed.password.clone(), roles))
                .await?;
            tracing::info!(account_id = %account.id, email = %account.email, "seed account created");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repository::InMemoryAccountRepository;
    use eventdesk_auth::Sha256PasswordEncoder;

    #[tokio::test]
    async fn seeds_admin_and_user_once() {
        let service = AccountService::new(
            Arc::new(InMemoryAccountRepository::new()),
            Arc::new(Sha256PasswordEncoder::new()),
        );
        let config = AppConfig::default();

        seed_accounts(&service, &config).await.unwrap();
        let admin = service.load_user_by_username("admin@email.com").await.unwrap();
        assert!(admin.has_role(AccountRole::Admin));
        assert!(admin.has_role(AccountRole::User));

        let user = service.authenticate("user@email.com", "user").await.unwrap();
        assert_eq!(user.role_names(), vec!["USER"]);

        // Second run leaves the existing accounts alone.
        seed_accounts(&service, &config).await.unwrap();
        let again = service.load_user_by_username("admin@email.com").await.unwrap();
        assert_eq!(again.id, admin.id);
    }
}
