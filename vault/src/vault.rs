//! Deposit and redeem.

use std::sync::Arc;

use rebase_ledger::Ledger;
use rebase_types::{Address, AmountSpec, Escrow};
use tracing::{error, info, warn};

use crate::error::VaultError;

/// Converts base asset to ledger tokens 1:1 and back.
///
/// The vault mints and burns under its own address, which must hold the
/// ledger's `MintBurn` capability.
pub struct Vault {
    address: Address,
    ledger: Arc<Ledger>,
    escrow: Arc<dyn Escrow>,
}

impl Vault {
    pub fn new(address: Address, ledger: Arc<Ledger>, escrow: Arc<dyn Escrow>) -> Self {
        Self {
            address,
            ledger,
            escrow,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Base asset currently held in escrow.
    pub fn escrow_balance(&self) -> u128 {
        self.escrow.balance()
    }

    /// Escrow `amount` of base asset from `holder` and mint the same amount.
    pub fn deposit(&self, holder: &Address, amount: u128) -> Result<(), VaultError> {
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }
        self.escrow
            .deposit(holder, amount)
            .map_err(VaultError::Escrow)?;

        if let Err(e) = self.ledger.mint(holder, amount, &self.address) {
            warn!(%holder, amount, error = %e, "mint failed after escrow deposit, refunding");
            if let Err(refund) = self.escrow.withdraw(holder, amount) {
                error!(%holder, amount, error = %refund, "refund of failed deposit did not go through");
            }
            return Err(e.into());
        }

        info!(%holder, amount, "deposit");
        Ok(())
    }

    /// Burn `amount` from `holder` and pay the same amount of base asset out.
    /// `AmountSpec::Full` redeems the whole displayed balance.
    ///
    /// The burn is only committed once the escrow has paid out. Returns the
    /// amount redeemed.
    pub fn redeem(&self, holder: &Address, amount: AmountSpec) -> Result<u128, VaultError> {
        if amount == AmountSpec::Exact(0) {
            return Err(VaultError::ZeroAmount);
        }
        let escrow = &self.escrow;
        let redeemed = self
            .ledger
            .burn_with(holder, amount, &self.address, |receipt| {
                if receipt.amount == 0 {
                    return Err(VaultError::ZeroAmount);
                }
                escrow
                    .withdraw(holder, receipt.amount)
                    .map_err(VaultError::PayoutFailed)?;
                Ok(receipt.amount)
            })
            .inspect_err(|e| {
                if let VaultError::PayoutFailed(cause) = e {
                    warn!(%holder, error = %cause, "payout failed, burn rolled back");
                }
            })?;

        info!(%holder, amount = redeemed, "redeem");
        Ok(redeemed)
    }

    /// Put base asset into escrow without minting. This is the yield that
    /// backs accrued interest when it is redeemed.
    pub fn add_rewards(&self, from: &Address, amount: u128) -> Result<(), VaultError> {
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }
        self.escrow
            .deposit(from, amount)
            .map_err(VaultError::Escrow)?;
        info!(%from, amount, "rewards added");
        Ok(())
    }
}
