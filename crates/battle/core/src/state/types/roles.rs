//! Role-based permission table.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use bitflags::bitflags;

bitflags! {
    /// Privileges an account may hold.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Roles: u8 {
        /// Toggles, batch admin sweeps, role grants.
        const ADMIN = 1 << 0;
        /// Fulfilling randomness only.
        const RANDOMNESS_PROVIDER = 1 << 1;
    }
}

/// Explicit capability table keyed by account.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessControl {
    grants: BTreeMap<Address, Roles>,
}

impl AccessControl {
    /// Creates a table where `admin` holds every role.
    pub fn with_admin(admin: Address) -> Self {
        let mut grants = BTreeMap::new();
        grants.insert(admin, Roles::all());
        Self { grants }
    }

    pub fn roles_of(&self, account: Address) -> Roles {
        self.grants.get(&account).copied().unwrap_or_default()
    }

    /// Returns true if `account` holds every role in `required`.
    pub fn has(&self, account: Address, required: Roles) -> bool {
        self.roles_of(account).contains(required)
    }

    /// Grants `roles`. Returns false if the account already held them.
    pub fn grant(&mut self, account: Address, roles: Roles) -> bool {
        let entry = self.grants.entry(account).or_default();
        let had = entry.contains(roles);
        entry.insert(roles);
        !had
    }

    /// Revokes `roles`. Returns false if the account held none of them.
    pub fn revoke(&mut self, account: Address, roles: Roles) -> bool {
        let Some(entry) = self.grants.get_mut(&account) else {
            return false;
        };
        let had = entry.intersects(roles);
        entry.remove(roles);
        if entry.is_empty() {
            self.grants.remove(&account);
        }
        had
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_holds_every_role() {
        let admin = Address::repeat_byte(1);
        let acl = AccessControl::with_admin(admin);
        assert!(acl.has(admin, Roles::ADMIN));
        assert!(acl.has(admin, Roles::RANDOMNESS_PROVIDER));
        assert!(!acl.has(Address::repeat_byte(2), Roles::RANDOMNESS_PROVIDER));
    }

    #[test]
    fn provider_role_is_separable_from_admin() {
        let bot = Address::repeat_byte(7);
        let mut acl = AccessControl::default();
        assert!(acl.grant(bot, Roles::RANDOMNESS_PROVIDER));
        assert!(!acl.grant(bot, Roles::RANDOMNESS_PROVIDER));

        assert!(acl.has(bot, Roles::RANDOMNESS_PROVIDER));
        assert!(!acl.has(bot, Roles::ADMIN));

        assert!(acl.revoke(bot, Roles::RANDOMNESS_PROVIDER));
        assert!(!acl.revoke(bot, Roles::RANDOMNESS_PROVIDER));
        assert_eq!(acl.roles_of(bot), Roles::empty());
    }
}
