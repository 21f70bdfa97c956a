//! Dual-domain credential resolution.

pub mod password;

use crate::access::Account;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The two independent account domains a login may resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountDomain {
    Admin,
    User,
}

/// An authenticated identity, tagged with the domain that verified it so the
/// caller can pick the matching token-issuing path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub domain: AccountDomain,
}

/// External account storage. Verification treats the stored credential as
/// opaque; the pipeline never sees password hashes.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Verify credentials against one domain, returning the account snapshot
    /// on success.
    async fn verify(&self, username: &str, password: &str, domain: AccountDomain)
        -> Option<Account>;

    /// Look an account up by username, whichever domain holds it.
    async fn find(&self, username: &str) -> Option<Account>;

    /// Replace an end-user account's password. Returns the updated account,
    /// or `None` if the username is unknown to the user domain.
    async fn update_password(&self, username: &str, new_password: &str) -> Option<Account>;
}

/// Outcome of looking the same credentials up in both domains.
#[derive(Debug, Clone)]
pub enum CredentialMatch {
    AdminMatch(Account),
    UserMatch(Account),
    NoMatch,
}

/// Resolves a login attempt against both account domains.
pub struct DualCredentialAuthenticator;

impl DualCredentialAuthenticator {
    /// Run both domain lookups and fold them into a single tagged outcome.
    /// Precedence lives in exactly one place: when both domains verify the
    /// same credentials, the administrative match wins.
    pub async fn lookup(
        store: &dyn AccountStore,
        username: &str,
        password: &str,
    ) -> CredentialMatch {
        let admin = store.verify(username, password, AccountDomain::Admin).await;
        let user = store.verify(username, password, AccountDomain::User).await;

        match (admin, user) {
            (Some(account), _) => CredentialMatch::AdminMatch(account),
            (None, Some(account)) => CredentialMatch::UserMatch(account),
            (None, None) => CredentialMatch::NoMatch,
        }
    }

    /// Resolve to a principal, or fail with `AuthenticationFailed`.
    pub async fn resolve(
        store: &dyn AccountStore,
        username: &str,
        password: &str,
    ) -> Result<(Principal, Account)> {
        match Self::lookup(store, username, password).await {
            CredentialMatch::AdminMatch(account) => Ok((
                Principal {
                    username: account.username.clone(),
                    domain: AccountDomain::Admin,
                },
                account,
            )),
            CredentialMatch::UserMatch(account) => Ok((
                Principal {
                    username: account.username.clone(),
                    domain: AccountDomain::User,
                },
                account,
            )),
            CredentialMatch::NoMatch => Err(Error::AuthenticationFailed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Store where a fixed credential pair verifies in the configured domains.
    struct TwoDomainStore {
        admin: bool,
        user: bool,
    }

    fn account(username: &str) -> Account {
        Account {
            username: username.into(),
            roles: vec![],
            subscription_end_time: None,
        }
    }

    #[async_trait]
    impl AccountStore for TwoDomainStore {
        async fn verify(
            &self,
            username: &str,
            password: &str,
            domain: AccountDomain,
        ) -> Option<Account> {
            if username != "shared" || password != "pw" {
                return None;
            }
            match domain {
                AccountDomain::Admin if self.admin => Some(account(username)),
                AccountDomain::User if self.user => Some(account(username)),
                _ => None,
            }
        }

        async fn find(&self, username: &str) -> Option<Account> {
            Some(account(username))
        }

        async fn update_password(&self, _username: &str, _new: &str) -> Option<Account> {
            None
        }
    }

    #[tokio::test]
    async fn admin_wins_when_both_domains_verify() {
        let store = TwoDomainStore {
            admin: true,
            user: true,
        };
        let (principal, _) = DualCredentialAuthenticator::resolve(&store, "shared", "pw")
            .await
            .expect("verifies");
        assert_eq!(principal.domain, AccountDomain::Admin);
    }

    #[tokio::test]
    async fn user_domain_resolves_when_admin_does_not() {
        let store = TwoDomainStore {
            admin: false,
            user: true,
        };
        let (principal, _) = DualCredentialAuthenticator::resolve(&store, "shared", "pw")
            .await
            .expect("verifies");
        assert_eq!(principal.domain, AccountDomain::User);
    }

    #[tokio::test]
    async fn no_match_is_authentication_failure() {
        let store = TwoDomainStore {
            admin: false,
            user: false,
        };
        let err = DualCredentialAuthenticator::resolve(&store, "shared", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AuthenticationFailed));

        let err = DualCredentialAuthenticator::resolve(&store, "shared", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AuthenticationFailed));
    }
}
