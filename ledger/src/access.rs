//! Capability table checked at the start of privileged operations.

use rebase_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A named permission a holder of the administrator role can hand out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// May lower the global interest rate.
    RateAuthority,
    /// May mint and burn on behalf of any holder (vaults and bridge pools).
    MintBurn,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateAuthority => "RATE_AUTHORITY",
            Self::MintBurn => "MINT_BURN",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which identities hold which capability.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccessControl {
    grants: HashMap<Capability, HashSet<Address>>,
}

impl AccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a capability. Returns `false` if it was already held.
    pub fn grant(&mut self, who: Address, capability: Capability) -> bool {
        self.grants.entry(capability).or_default().insert(who)
    }

    /// Revoke a capability. Returns `false` if it was not held.
    pub fn revoke(&mut self, who: &Address, capability: Capability) -> bool {
        self.grants
            .get_mut(&capability)
            .map_or(false, |holders| holders.remove(who))
    }

    pub fn has(&self, who: &Address, capability: Capability) -> bool {
        self.grants
            .get(&capability)
            .map_or(false, |holders| holders.contains(who))
    }

    /// All identities holding `capability`, sorted for stable output.
    pub fn holders_of(&self, capability: Capability) -> Vec<Address> {
        let mut holders: Vec<Address> = self
            .grants
            .get(&capability)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        holders.sort();
        holders
    }
}
