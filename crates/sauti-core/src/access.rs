//! Entitlement checks for generation requests.

use crate::error::{Error, Result};
use crate::kind::ServiceKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Capability flags gating each generation kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub tts_enabled: bool,
    #[serde(default)]
    pub ttm_enabled: bool,
    #[serde(default)]
    pub vc_enabled: bool,
}

impl Role {
    pub fn allows(&self, kind: ServiceKind) -> bool {
        match kind {
            ServiceKind::TextToSpeech => self.tts_enabled,
            ServiceKind::TextToMusic => self.ttm_enabled,
            ServiceKind::VoiceClone => self.vc_enabled,
        }
    }
}

/// Snapshot of the account fields the pipeline needs. Credential material
/// never reaches this type; it stays behind the account store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub subscription_end_time: Option<DateTime<Utc>>,
}

impl Account {
    /// The effective role. An account may carry several roles; the first one
    /// is the designated primary and the only one authorization consults.
    pub fn primary_role(&self) -> Option<&Role> {
        self.roles.first()
    }
}

/// Decides whether an account may use a generation service right now.
pub struct AccessGate;

impl AccessGate {
    /// Pure given its inputs: the evaluation instant is a parameter, never
    /// sampled internally, so decisions are reproducible in tests.
    pub fn authorize(account: &Account, kind: ServiceKind, now: DateTime<Utc>) -> Result<()> {
        let role = account.primary_role().ok_or_else(|| Error::NoRoleAssigned {
            username: account.username.clone(),
        })?;

        match account.subscription_end_time {
            Some(end) if end >= now => {}
            _ => {
                return Err(Error::SubscriptionExpired {
                    username: account.username.clone(),
                })
            }
        }

        if !role.allows(kind) {
            return Err(Error::CapabilityDisabled {
                username: account.username.clone(),
                kind,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn account(roles: Vec<Role>, end: Option<DateTime<Utc>>) -> Account {
        Account {
            username: "amina".into(),
            roles,
            subscription_end_time: end,
        }
    }

    fn full_role() -> Role {
        Role {
            tts_enabled: true,
            ttm_enabled: true,
            vc_enabled: true,
        }
    }

    #[test]
    fn no_roles_rejects_every_kind() {
        let now = Utc::now();
        let account = account(vec![], Some(now + Duration::days(30)));
        for kind in ServiceKind::ALL {
            assert!(matches!(
                AccessGate::authorize(&account, kind, now),
                Err(Error::NoRoleAssigned { .. })
            ));
        }
    }

    #[test]
    fn expired_subscription_rejects_regardless_of_flags() {
        let now = Utc::now();
        let account = account(vec![full_role()], Some(now - Duration::days(1)));
        for kind in ServiceKind::ALL {
            assert!(matches!(
                AccessGate::authorize(&account, kind, now),
                Err(Error::SubscriptionExpired { .. })
            ));
        }
    }

    #[test]
    fn missing_subscription_counts_as_expired() {
        let now = Utc::now();
        let account = account(vec![full_role()], None);
        assert!(matches!(
            AccessGate::authorize(&account, ServiceKind::TextToSpeech, now),
            Err(Error::SubscriptionExpired { .. })
        ));
    }

    #[test]
    fn subscription_ending_exactly_now_is_still_live() {
        let now = Utc::now();
        let account = account(vec![full_role()], Some(now));
        assert!(AccessGate::authorize(&account, ServiceKind::TextToSpeech, now).is_ok());
    }

    #[test]
    fn disabled_capability_rejects_with_live_subscription() {
        let now = Utc::now();
        let role = Role {
            tts_enabled: true,
            ttm_enabled: false,
            vc_enabled: false,
        };
        let account = account(vec![role], Some(now + Duration::days(1)));
        assert!(AccessGate::authorize(&account, ServiceKind::TextToSpeech, now).is_ok());
        assert!(matches!(
            AccessGate::authorize(&account, ServiceKind::TextToMusic, now),
            Err(Error::CapabilityDisabled {
                kind: ServiceKind::TextToMusic,
                ..
            })
        ));
    }

    #[test]
    fn only_the_primary_role_counts() {
        let now = Utc::now();
        let disabled = Role::default();
        let account = account(vec![disabled, full_role()], Some(now + Duration::days(1)));
        // The second role would allow everything, but it is not the primary.
        assert!(matches!(
            AccessGate::authorize(&account, ServiceKind::VoiceClone, now),
            Err(Error::CapabilityDisabled { .. })
        ));
    }
}
