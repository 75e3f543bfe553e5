//! The token pool.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rebase_ledger::Ledger;
use rebase_messages::{
    BridgePayload, DeliveryRejection, FeeAsset, FeePayment, InboundMessage, MessageId,
    MessageReceiver, OutboundMessage, Transport,
};
use rebase_types::{Address, AmountSpec, ChainSelector, Rate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::chain::{ChainUpdate, RemoteChain};
use crate::config::PoolConfig;
use crate::error::BridgeError;

/// What a successful [`TokenPool::lock_and_send`] burned and sent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub message_id: MessageId,
    pub destination: ChainSelector,
    /// Base units burned on this chain and carried to the destination.
    pub amount: u128,
    /// The sender's assigned rate, carried in the payload.
    pub rate: Rate,
    /// Fee paid to the transport.
    pub fee: u128,
}

/// Result of handling one delivered message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReceiveOutcome {
    Minted {
        recipient: Address,
        amount: u128,
        rate: Rate,
    },
    /// The message id was already processed; nothing was minted.
    Duplicate,
}

struct PoolState {
    chains: HashMap<ChainSelector, RemoteChain>,
    processed: HashSet<MessageId>,
}

/// Bridge adapter bound to one ledger and one transport.
///
/// The pool mints and burns under its own address, which must hold the
/// ledger's `MintBurn` capability. Allow-list changes are reserved to the
/// ledger administrator.
///
/// Lock order is pool state, then ledger. The pool lock is held across the
/// whole of a send or receive, so rate-limit budgets and the processed-id
/// set change together with the ledger or not at all.
pub struct TokenPool {
    address: Address,
    local_chain: ChainSelector,
    fee_asset: FeeAsset,
    ledger: Arc<Ledger>,
    transport: Arc<dyn Transport>,
    state: Mutex<PoolState>,
}

impl TokenPool {
    pub fn new(
        address: Address,
        local_chain: ChainSelector,
        fee_asset: FeeAsset,
        ledger: Arc<Ledger>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            address,
            local_chain,
            fee_asset,
            ledger,
            transport,
            state: Mutex::new(PoolState {
                chains: HashMap::new(),
                processed: HashSet::new(),
            }),
        }
    }

    /// Build a pool from configuration, installing its allow-list.
    pub fn from_config(
        config: PoolConfig,
        ledger: Arc<Ledger>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, BridgeError> {
        config.validate()?;
        let pool = Self::new(
            config.address,
            config.local_chain,
            config.fee_asset,
            ledger,
            transport,
        );
        pool.install(config.chains)?;
        Ok(pool)
    }

    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn local_chain(&self) -> ChainSelector {
        self.local_chain
    }

    pub fn fee_asset(&self) -> &FeeAsset {
        &self.fee_asset
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    // ── Administration ──────────────────────────────────────────────────

    /// Insert, replace or remove allow-list entries.
    ///
    /// Every update is validated before any is applied. Replaced entries
    /// get fresh, full rate-limit buckets.
    pub fn apply_chain_updates(
        &self,
        caller: &Address,
        updates: Vec<ChainUpdate>,
    ) -> Result<(), BridgeError> {
        if *caller != self.ledger.administrator() {
            return Err(BridgeError::NotAdministrator(caller.clone()));
        }
        self.install(updates)
    }

    fn install(&self, updates: Vec<ChainUpdate>) -> Result<(), BridgeError> {
        for update in &updates {
            if update.remote_chain == self.local_chain {
                return Err(BridgeError::Config(format!(
                    "{} is the local chain",
                    update.remote_chain
                )));
            }
            update.validate()?;
        }

        let now = self.ledger.now();
        let mut state = self.lock();
        for update in updates {
            if update.allowed {
                info!(
                    chain = %update.remote_chain,
                    remote_pool = %update.remote_pool,
                    "remote chain allowed"
                );
                state
                    .chains
                    .insert(update.remote_chain, RemoteChain::from_update(&update, now));
            } else if state.chains.remove(&update.remote_chain).is_some() {
                info!(chain = %update.remote_chain, "remote chain removed");
            }
        }
        Ok(())
    }

    // ── Send ────────────────────────────────────────────────────────────

    /// Burn `amount` from `holder` and send it to `recipient` on
    /// `destination`, carrying the holder's assigned rate.
    ///
    /// The burn is committed only once the transport has accepted the
    /// message. Any failure (chain not allowed, rate limit, fee quote,
    /// fee allowance) leaves the ledger and the rate-limit budget untouched.
    /// The fee is paid by `holder`.
    pub fn lock_and_send(
        &self,
        holder: &Address,
        amount: AmountSpec,
        destination: ChainSelector,
        recipient: &Address,
    ) -> Result<SendReceipt, BridgeError> {
        if amount == AmountSpec::Exact(0) {
            return Err(BridgeError::ZeroAmount);
        }
        let now = self.ledger.now();
        let mut state = self.lock();
        let chain = state
            .chains
            .get_mut(&destination)
            .ok_or(BridgeError::ChainNotAllowed(destination))?;
        if let AmountSpec::Exact(exact) = amount {
            chain.outbound.check(exact, now)?;
        }

        let transport = &self.transport;
        let receipt = self
            .ledger
            .burn_with(holder, amount, &self.address, |burn| {
                if burn.amount == 0 {
                    return Err(BridgeError::ZeroAmount);
                }
                chain.outbound.check(burn.amount, now)?;

                let payload = BridgePayload {
                    amount: burn.amount,
                    rate: burn.rate,
                    recipient: recipient.clone(),
                    original_sender: holder.clone(),
                };
                let message = OutboundMessage {
                    destination,
                    sender_pool: self.address.clone(),
                    receiver_pool: chain.remote_pool.clone(),
                    data: payload.encode()?,
                };
                let fee = transport.quote_fee(&message, &self.fee_asset)?;
                let message_id = transport.send(
                    message,
                    FeePayment {
                        asset: self.fee_asset.clone(),
                        payer: holder.clone(),
                        amount: fee,
                    },
                )?;

                chain.outbound.try_consume(burn.amount, now);
                Ok(SendReceipt {
                    message_id,
                    destination,
                    amount: burn.amount,
                    rate: burn.rate,
                    fee,
                })
            })
            .inspect_err(|e| debug!(%holder, %destination, error = %e, "send aborted"))?;

        info!(
            %holder,
            %recipient,
            %destination,
            amount = receipt.amount,
            rate = receipt.rate,
            message_id = %receipt.message_id,
            "locked and sent"
        );
        Ok(receipt)
    }

    // ── Receive ─────────────────────────────────────────────────────────

    /// Mint a delivered transfer with the rate it carries.
    ///
    /// A message id seen before returns [`ReceiveOutcome::Duplicate`] and
    /// mints nothing. A rejected message is not recorded, so a later
    /// redelivery is evaluated again.
    pub fn receive_and_mint(
        &self,
        message: &InboundMessage,
    ) -> Result<ReceiveOutcome, BridgeError> {
        let now = self.ledger.now();
        let mut state = self.lock();
        if state.processed.contains(&message.message_id) {
            debug!(message_id = %message.message_id, "duplicate delivery ignored");
            return Ok(ReceiveOutcome::Duplicate);
        }

        let chain = state
            .chains
            .get_mut(&message.source_chain)
            .ok_or(BridgeError::ChainNotAllowed(message.source_chain))?;
        if message.sender_pool != chain.remote_pool {
            return Err(BridgeError::UnknownSender {
                chain: message.source_chain,
                sender: message.sender_pool.clone(),
            });
        }

        let payload = BridgePayload::decode(&message.data)?;
        chain.inbound.check(payload.amount, now)?;
        self.ledger.mint_with_rate(
            &payload.recipient,
            payload.amount,
            payload.rate,
            &self.address,
        )?;
        chain.inbound.try_consume(payload.amount, now);
        state.processed.insert(message.message_id);

        info!(
            recipient = %payload.recipient,
            source = %message.source_chain,
            amount = payload.amount,
            rate = payload.rate,
            message_id = %message.message_id,
            "received and minted"
        );
        Ok(ReceiveOutcome::Minted {
            recipient: payload.recipient,
            amount: payload.amount,
            rate: payload.rate,
        })
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn is_supported_chain(&self, chain: ChainSelector) -> bool {
        self.lock().chains.contains_key(&chain)
    }

    /// Allowed remote chains, in ascending selector order.
    pub fn supported_chains(&self) -> Vec<ChainSelector> {
        let mut chains: Vec<_> = self.lock().chains.keys().copied().collect();
        chains.sort();
        chains
    }

    pub fn remote_pool(&self, chain: ChainSelector) -> Option<Address> {
        self.lock().chains.get(&chain).map(|c| c.remote_pool.clone())
    }

    pub fn remote_token(&self, chain: ChainSelector) -> Option<Address> {
        self.lock().chains.get(&chain).map(|c| c.remote_token.clone())
    }

    /// Outbound budget available to `chain` right now.
    pub fn outbound_capacity(&self, chain: ChainSelector) -> Option<u128> {
        let now = self.ledger.now();
        self.lock()
            .chains
            .get(&chain)
            .map(|c| c.outbound.available(now))
    }

    /// Inbound budget available from `chain` right now.
    pub fn inbound_capacity(&self, chain: ChainSelector) -> Option<u128> {
        let now = self.ledger.now();
        self.lock()
            .chains
            .get(&chain)
            .map(|c| c.inbound.available(now))
    }

    /// Number of distinct messages minted by this pool.
    pub fn processed_count(&self) -> usize {
        self.lock().processed.len()
    }

    pub fn is_processed(&self, message_id: &MessageId) -> bool {
        self.lock().processed.contains(message_id)
    }
}

impl MessageReceiver for TokenPool {
    fn on_message(&self, message: &InboundMessage) -> Result<(), DeliveryRejection> {
        match self.receive_and_mint(message) {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(
                    message_id = %message.message_id,
                    source = %message.source_chain,
                    sender = %message.sender_pool,
                    error = %e,
                    "inbound message rejected"
                );
                Err(DeliveryRejection {
                    message_id: message.message_id,
                    reason: e.to_string(),
                })
            }
        }
    }
}
