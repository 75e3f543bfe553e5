//! The ledger state machine.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rebase_types::{Address, AmountSpec, Clock, LedgerParams, Rate, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::access::{AccessControl, Capability};
use crate::error::LedgerError;
use crate::event::{EventBus, LedgerEvent, SequencedEvent};
use crate::record::HolderRecord;

/// What a staged burn removed, handed to the continuation of
/// [`Ledger::burn_with`] before the burn is committed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnReceipt {
    pub holder: Address,
    /// Base units burned, with `Full` already resolved.
    pub amount: u128,
    /// The holder's assigned rate at the moment of the burn.
    pub rate: Rate,
    /// Principal left after the burn.
    pub remaining: u128,
    pub at: Timestamp,
}

struct LedgerState {
    global_rate: Rate,
    administrator: Address,
    access: AccessControl,
    holders: HashMap<Address, HolderRecord>,
    allowances: HashMap<(Address, Address), u128>,
    /// Sum of all stored principals.
    total_principal: u128,
    /// Sequence number the next committed event receives.
    next_sequence: u64,
}

impl LedgerState {
    fn record(&self, holder: &Address) -> HolderRecord {
        self.holders.get(holder).copied().unwrap_or_default()
    }

    /// Number a committed operation's events. Called under the write lock,
    /// so sequence order is commit order.
    fn seal(&mut self, events: Vec<LedgerEvent>) -> Vec<SequencedEvent> {
        events
            .into_iter()
            .map(|event| {
                let sequence = self.next_sequence;
                self.next_sequence += 1;
                SequencedEvent { sequence, event }
            })
            .collect()
    }

    fn require(&self, caller: &Address, capability: Capability) -> Result<(), LedgerError> {
        if self.access.has(caller, capability) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                caller: caller.clone(),
                capability,
            })
        }
    }

    fn require_administrator(&self, caller: &Address) -> Result<(), LedgerError> {
        if *caller == self.administrator {
            Ok(())
        } else {
            Err(LedgerError::NotAdministrator(caller.clone()))
        }
    }

    /// Stage a realization of `holder`'s pending interest. Nothing is written.
    fn realize(
        &self,
        holder: &Address,
        now: Timestamp,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<(HolderRecord, u128), LedgerError> {
        let (record, interest) = self.record(holder).realized(now)?;
        if interest > 0 {
            debug!(%holder, interest, "realized pending interest");
            events.push(LedgerEvent::InterestRealized {
                holder: holder.clone(),
                interest,
            });
        }
        Ok((record, interest))
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Move principal from `from` to `to`, realizing both first.
    ///
    /// All checks run before the first write, so an error leaves the state
    /// untouched.
    fn move_principal(
        &mut self,
        from: &Address,
        to: &Address,
        amount: AmountSpec,
        now: Timestamp,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<u128, LedgerError> {
        let (mut sender, sender_interest) = self.realize(from, now, events)?;
        let amount = amount.resolve(sender.principal);
        if amount > sender.principal {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available: sender.principal,
            });
        }

        if from == to {
            let total = self
                .total_principal
                .checked_add(sender_interest)
                .ok_or(LedgerError::Overflow)?;
            self.holders.insert(from.clone(), sender);
            self.total_principal = total;
            return Ok(amount);
        }

        let (mut recipient, recipient_interest) = self.realize(to, now, events)?;
        if recipient.is_empty() {
            recipient.assigned_rate = sender.assigned_rate;
        }
        sender.principal -= amount;
        recipient.principal = recipient
            .principal
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let total = self
            .total_principal
            .checked_add(sender_interest)
            .and_then(|t| t.checked_add(recipient_interest))
            .ok_or(LedgerError::Overflow)?;

        self.holders.insert(from.clone(), sender);
        self.holders.insert(to.clone(), recipient);
        self.total_principal = total;
        events.push(LedgerEvent::Transferred {
            from: from.clone(),
            to: to.clone(),
            amount,
        });
        Ok(amount)
    }
}

/// A rebasing token ledger for one chain.
///
/// All methods take `&self`; state sits behind a single `RwLock`. Mutations
/// hold the write lock for their whole duration and commit in one step, so
/// a failed operation leaves nothing behind. Queries take the read lock and
/// see one consistent holder record.
pub struct Ledger {
    params: LedgerParams,
    clock: Arc<dyn Clock>,
    state: RwLock<LedgerState>,
    events: RwLock<EventBus>,
}

impl Ledger {
    /// Deploy a ledger. The administrator starts out holding
    /// [`Capability::RateAuthority`]; `MintBurn` must be granted explicitly.
    pub fn new(
        administrator: Address,
        params: LedgerParams,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LedgerError> {
        if params.initial_rate > params.max_rate {
            return Err(LedgerError::RateOutOfRange {
                rate: params.initial_rate,
                max: params.max_rate,
            });
        }
        let mut access = AccessControl::new();
        access.grant(administrator.clone(), Capability::RateAuthority);
        let state = LedgerState {
            global_rate: params.initial_rate,
            administrator,
            access,
            holders: HashMap::new(),
            allowances: HashMap::new(),
            total_principal: 0,
            next_sequence: 1,
        };
        Ok(Self {
            params,
            clock,
            state: RwLock::new(state),
            events: RwLock::new(EventBus::new()),
        })
    }

    fn read_state(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    // Every mutation commits with plain assignments after its last fallible
    // step, so a poisoned lock still guards consistent state.
    fn write_state(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, events: Vec<SequencedEvent>) {
        let bus = self.events.read().unwrap_or_else(PoisonError::into_inner);
        for event in &events {
            bus.emit(event);
        }
    }

    /// Register a listener for committed ledger events.
    ///
    /// Listeners run after the ledger lock is released. Events from one
    /// operation arrive in order, but concurrent operations may deliver
    /// theirs interleaved; `SequencedEvent::sequence` gives commit order.
    pub fn subscribe(&self, listener: Box<dyn Fn(&SequencedEvent) + Send + Sync>) {
        self.events
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribe(listener);
    }

    pub fn params(&self) -> &LedgerParams {
        &self.params
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // ── Administration ──────────────────────────────────────────────────

    pub fn administrator(&self) -> Address {
        self.read_state().administrator.clone()
    }

    pub fn transfer_administrator(
        &self,
        caller: &Address,
        new_administrator: Address,
    ) -> Result<(), LedgerError> {
        let events = {
            let mut state = self.write_state();
            state.require_administrator(caller)?;
            let previous = std::mem::replace(&mut state.administrator, new_administrator.clone());
            info!(%previous, new = %new_administrator, "ledger administrator transferred");
            state.seal(vec![LedgerEvent::AdministratorTransferred {
                previous,
                new: new_administrator,
            }])
        };
        self.publish(events);
        Ok(())
    }

    /// Grant a capability. Returns `false` if the grantee already held it.
    pub fn grant_capability(
        &self,
        caller: &Address,
        grantee: &Address,
        capability: Capability,
    ) -> Result<bool, LedgerError> {
        let events = {
            let mut state = self.write_state();
            state.require_administrator(caller)?;
            if !state.access.grant(grantee.clone(), capability) {
                return Ok(false);
            }
            info!(%grantee, %capability, "capability granted");
            state.seal(vec![LedgerEvent::CapabilityGranted {
                grantee: grantee.clone(),
                capability,
            }])
        };
        self.publish(events);
        Ok(true)
    }

    /// Revoke a capability. Returns `false` if the grantee did not hold it.
    pub fn revoke_capability(
        &self,
        caller: &Address,
        grantee: &Address,
        capability: Capability,
    ) -> Result<bool, LedgerError> {
        let events = {
            let mut state = self.write_state();
            state.require_administrator(caller)?;
            if !state.access.revoke(grantee, capability) {
                return Ok(false);
            }
            info!(%grantee, %capability, "capability revoked");
            state.seal(vec![LedgerEvent::CapabilityRevoked {
                grantee: grantee.clone(),
                capability,
            }])
        };
        self.publish(events);
        Ok(true)
    }

    pub fn has_capability(&self, who: &Address, capability: Capability) -> bool {
        self.read_state().access.has(who, capability)
    }

    /// Lower the global interest rate. Any increase is rejected and the
    /// rate is left unchanged; setting the current value again is allowed.
    pub fn set_global_rate(&self, caller: &Address, new_rate: Rate) -> Result<(), LedgerError> {
        let events = {
            let mut state = self.write_state();
            state.require(caller, Capability::RateAuthority)?;
            if new_rate > state.global_rate {
                return Err(LedgerError::RateIncreaseRejected {
                    current: state.global_rate,
                    requested: new_rate,
                });
            }
            let old_rate = std::mem::replace(&mut state.global_rate, new_rate);
            info!(old_rate, new_rate, "global interest rate set");
            state.seal(vec![LedgerEvent::GlobalRateChanged { old_rate, new_rate }])
        };
        self.publish(events);
        Ok(())
    }

    // ── Supply operations ───────────────────────────────────────────────

    /// Mint `amount` to `holder`. An empty balance is assigned the current
    /// global rate; a non-empty one keeps its rate.
    pub fn mint(
        &self,
        holder: &Address,
        amount: u128,
        granted_by: &Address,
    ) -> Result<(), LedgerError> {
        self.mint_inner(holder, amount, None, granted_by)
    }

    /// Mint `amount` to `holder` and set its assigned rate to `rate`,
    /// regardless of the local global rate. Used for inbound bridge transfers.
    pub fn mint_with_rate(
        &self,
        holder: &Address,
        amount: u128,
        rate: Rate,
        granted_by: &Address,
    ) -> Result<(), LedgerError> {
        self.mint_inner(holder, amount, Some(rate), granted_by)
    }

    fn mint_inner(
        &self,
        holder: &Address,
        amount: u128,
        rate_override: Option<Rate>,
        granted_by: &Address,
    ) -> Result<(), LedgerError> {
        let now = self.clock.now();
        let mut events = Vec::new();
        let events = {
            let mut state = self.write_state();
            state.require(granted_by, Capability::MintBurn)?;
            if let Some(rate) = rate_override {
                if rate > self.params.max_rate {
                    return Err(LedgerError::RateOutOfRange {
                        rate,
                        max: self.params.max_rate,
                    });
                }
            }

            let (mut record, interest) = state.realize(holder, now, &mut events)?;
            match rate_override {
                Some(rate) => record.assigned_rate = rate,
                None if record.is_empty() => record.assigned_rate = state.global_rate,
                None => {}
            }
            record.principal = record
                .principal
                .checked_add(amount)
                .ok_or(LedgerError::Overflow)?;
            let total = state
                .total_principal
                .checked_add(interest)
                .and_then(|t| t.checked_add(amount))
                .ok_or(LedgerError::Overflow)?;

            state.holders.insert(holder.clone(), record);
            state.total_principal = total;

            info!(%holder, amount, assigned_rate = record.assigned_rate, "minted");
            events.push(LedgerEvent::Minted {
                holder: holder.clone(),
                amount,
                assigned_rate: record.assigned_rate,
            });
            state.seal(events)
        };
        self.publish(events);
        Ok(())
    }

    /// Burn from `holder`. `AmountSpec::Full` burns the whole displayed
    /// balance. Returns the amount burned.
    pub fn burn(
        &self,
        holder: &Address,
        amount: AmountSpec,
        granted_by: &Address,
    ) -> Result<u128, LedgerError> {
        self.burn_with(holder, amount, granted_by, |receipt| {
            Ok::<_, LedgerError>(receipt.amount)
        })
    }

    /// Stage a burn, run `then` with its receipt, and commit only if `then`
    /// succeeds.
    ///
    /// This is how multi-step operations (redeem-and-pay-out, burn-and-send)
    /// stay atomic: the ledger write lock is held across `then`, and on error
    /// neither the burn nor the interest realization is written.
    pub fn burn_with<T, E, F>(
        &self,
        holder: &Address,
        amount: AmountSpec,
        granted_by: &Address,
        then: F,
    ) -> Result<T, E>
    where
        E: From<LedgerError>,
        F: FnOnce(&BurnReceipt) -> Result<T, E>,
    {
        let now = self.clock.now();
        let mut events = Vec::new();
        let (output, events) = {
            let mut state = self.write_state();
            state.require(granted_by, Capability::MintBurn)?;

            let (mut record, interest) = state.realize(holder, now, &mut events)?;
            let amount = amount.resolve(record.principal);
            if amount > record.principal {
                return Err(LedgerError::InsufficientBalance {
                    needed: amount,
                    available: record.principal,
                }
                .into());
            }
            record.principal -= amount;
            let total = state
                .total_principal
                .checked_add(interest)
                .and_then(|t| t.checked_sub(amount))
                .ok_or(LedgerError::Overflow)?;

            let receipt = BurnReceipt {
                holder: holder.clone(),
                amount,
                rate: record.assigned_rate,
                remaining: record.principal,
                at: now,
            };
            let output = match then(&receipt) {
                Ok(output) => output,
                Err(e) => {
                    debug!(%holder, amount, "staged burn discarded");
                    return Err(e);
                }
            };

            state.holders.insert(holder.clone(), record);
            state.total_principal = total;

            info!(%holder, amount = receipt.amount, "burned");
            events.push(LedgerEvent::Burned {
                holder: receipt.holder,
                amount: receipt.amount,
            });
            (output, state.seal(events))
        };
        self.publish(events);
        Ok(output)
    }

    // ── Transfers ───────────────────────────────────────────────────────

    /// Move tokens between holders. A recipient with an empty balance
    /// inherits the sender's assigned rate. Returns the amount moved.
    pub fn transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: AmountSpec,
    ) -> Result<u128, LedgerError> {
        let now = self.clock.now();
        let mut events = Vec::new();
        let (moved, events) = {
            let mut state = self.write_state();
            let moved = state.move_principal(from, to, amount, now, &mut events)?;
            (moved, state.seal(events))
        };
        debug!(%from, %to, amount = moved, "transferred");
        self.publish(events);
        Ok(moved)
    }

    /// Set how much `spender` may move out of `owner`'s balance.
    pub fn approve(&self, owner: &Address, spender: &Address, amount: u128) {
        let events = {
            let mut state = self.write_state();
            state
                .allowances
                .insert((owner.clone(), spender.clone()), amount);
            state.seal(vec![LedgerEvent::Approval {
                owner: owner.clone(),
                spender: spender.clone(),
                amount,
            }])
        };
        self.publish(events);
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.read_state().allowance(owner, spender)
    }

    /// Transfer on behalf of `from`, spending `spender`'s allowance.
    ///
    /// Moving `from`'s tokens to `from` still needs the allowance but only
    /// realizes interest and leaves the allowance as it was.
    pub fn transfer_from(
        &self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: AmountSpec,
    ) -> Result<u128, LedgerError> {
        let now = self.clock.now();
        let mut events = Vec::new();
        let (moved, events) = {
            let mut state = self.write_state();
            let requested = match amount {
                AmountSpec::Exact(n) => n,
                AmountSpec::Full => state.record(from).displayed_balance(now)?,
            };
            let allowance = state.allowance(from, spender);
            if requested > allowance {
                return Err(LedgerError::InsufficientAllowance {
                    needed: requested,
                    available: allowance,
                });
            }
            let moved =
                state.move_principal(from, to, AmountSpec::Exact(requested), now, &mut events)?;
            // A self-transfer moves nothing, so it spends nothing.
            if from != to {
                state
                    .allowances
                    .insert((from.clone(), spender.clone()), allowance - moved);
            }
            (moved, state.seal(events))
        };
        debug!(%spender, %from, %to, amount = moved, "transferred on behalf");
        self.publish(events);
        Ok(moved)
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Balance including interest accrued up to now. Does not mutate.
    pub fn displayed_balance_of(&self, holder: &Address) -> Result<u128, LedgerError> {
        let now = self.clock.now();
        let record = self.read_state().record(holder);
        Ok(record.displayed_balance(now)?)
    }

    /// Stored principal, without accrual.
    pub fn principal_of(&self, holder: &Address) -> u128 {
        self.read_state().record(holder).principal
    }

    pub fn assigned_rate_of(&self, holder: &Address) -> Rate {
        self.read_state().record(holder).assigned_rate
    }

    /// Snapshot of the holder's record, `None` if it was never touched.
    pub fn record_of(&self, holder: &Address) -> Option<HolderRecord> {
        self.read_state().holders.get(holder).copied()
    }

    pub fn global_rate(&self) -> Rate {
        self.read_state().global_rate
    }

    /// Sum of stored principals. Excludes unrealized interest.
    pub fn total_principal(&self) -> u128 {
        self.read_state().total_principal
    }

    pub fn holder_count(&self) -> usize {
        self.read_state().holders.len()
    }
}
