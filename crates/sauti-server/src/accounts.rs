//! In-process dual-domain account store.
//!
//! Account persistence proper is outside the gateway; this store keeps both
//! domains in memory, verifies salted SHA-256 digests, and can be seeded from
//! a JSON file at startup.

use async_trait::async_trait;
use sauti_core::{Account, AccountDomain, AccountStore, Error, Result, Role};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredAccount {
    account: Account,
    salt: String,
    digest: String,
}

impl StoredAccount {
    fn new(account: Account, password: &str) -> Self {
        let salt = Uuid::new_v4().simple().to_string();
        let digest = digest_password(&salt, password);
        Self {
            account,
            salt,
            digest,
        }
    }

    fn verifies(&self, password: &str) -> bool {
        digest_password(&self.salt, password) == self.digest
    }
}

fn digest_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Seed-file entry: one account, its password, and the domain it lives in.
#[derive(Debug, Deserialize)]
pub struct SeedAccount {
    pub username: String,
    pub password: String,
    pub domain: AccountDomain,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub subscription_end_time: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Default)]
pub struct MemoryAccountStore {
    admins: RwLock<HashMap<String, StoredAccount>>,
    users: RwLock<HashMap<String, StoredAccount>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_admin(&self, username: &str, password: &str) {
        let account = Account {
            username: username.to_string(),
            roles: vec![],
            subscription_end_time: None,
        };
        self.admins
            .write()
            .await
            .insert(username.to_string(), StoredAccount::new(account, password));
    }

    pub async fn insert_user(&self, account: Account, password: &str) {
        self.users.write().await.insert(
            account.username.clone(),
            StoredAccount::new(account, password),
        );
    }

    /// Load seed accounts from a JSON file, `[{"username", "password",
    /// "domain", "roles", "subscription_end_time"}, ...]`.
    pub async fn seed_from_file(&self, path: &Path) -> Result<usize> {
        let raw = std::fs::read_to_string(path)?;
        let seeds: Vec<SeedAccount> = serde_json::from_str(&raw).map_err(|e| {
            Error::Internal(format!("Malformed accounts file {}: {}", path.display(), e))
        })?;

        let count = seeds.len();
        for seed in seeds {
            match seed.domain {
                AccountDomain::Admin => self.insert_admin(&seed.username, &seed.password).await,
                AccountDomain::User => {
                    let account = Account {
                        username: seed.username,
                        roles: seed.roles,
                        subscription_end_time: seed.subscription_end_time,
                    };
                    self.insert_user(account, &seed.password).await;
                }
            }
        }

        info!("Seeded {} account(s) from file", count);
        Ok(count)
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn verify(
        &self,
        username: &str,
        password: &str,
        domain: AccountDomain,
    ) -> Option<Account> {
        let map = match domain {
            AccountDomain::Admin => self.admins.read().await,
            AccountDomain::User => self.users.read().await,
        };
        map.get(username)
            .filter(|stored| stored.verifies(password))
            .map(|stored| stored.account.clone())
    }

    async fn find(&self, username: &str) -> Option<Account> {
        if let Some(stored) = self.users.read().await.get(username) {
            return Some(stored.account.clone());
        }
        self.admins
            .read()
            .await
            .get(username)
            .map(|stored| stored.account.clone())
    }

    async fn update_password(&self, username: &str, new_password: &str) -> Option<Account> {
        let mut users = self.users.write().await;
        let stored = users.get_mut(username)?;
        *stored = StoredAccount::new(stored.account.clone(), new_password);
        Some(stored.account.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::io::Write;

    fn user_account(username: &str) -> Account {
        Account {
            username: username.into(),
            roles: vec![Role {
                tts_enabled: true,
                ttm_enabled: false,
                vc_enabled: false,
            }],
            subscription_end_time: Some(Utc::now() + Duration::days(30)),
        }
    }

    #[tokio::test]
    async fn verifies_only_the_right_domain_and_password() {
        let store = MemoryAccountStore::new();
        store.insert_user(user_account("amina"), "pw").await;

        assert!(store
            .verify("amina", "pw", AccountDomain::User)
            .await
            .is_some());
        assert!(store
            .verify("amina", "pw", AccountDomain::Admin)
            .await
            .is_none());
        assert!(store
            .verify("amina", "wrong", AccountDomain::User)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn password_update_invalidates_the_old_credential() {
        let store = MemoryAccountStore::new();
        store.insert_user(user_account("amina"), "old-pw").await;

        assert!(store.update_password("amina", "new-pw").await.is_some());
        assert!(store
            .verify("amina", "old-pw", AccountDomain::User)
            .await
            .is_none());
        assert!(store
            .verify("amina", "new-pw", AccountDomain::User)
            .await
            .is_some());

        assert!(store.update_password("nobody", "pw").await.is_none());
    }

    #[tokio::test]
    async fn seeds_both_domains_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"[
                {{"username": "root", "password": "rootpw", "domain": "admin"}},
                {{"username": "amina", "password": "pw", "domain": "user",
                  "roles": [{{"tts_enabled": true}}]}}
            ]"#
        )
        .expect("write");

        let store = MemoryAccountStore::new();
        let count = store.seed_from_file(file.path()).await.expect("seed");
        assert_eq!(count, 2);
        assert!(store
            .verify("root", "rootpw", AccountDomain::Admin)
            .await
            .is_some());
        let amina = store.find("amina").await.expect("seeded");
        assert!(amina.primary_role().expect("role").tts_enabled);
    }
}
