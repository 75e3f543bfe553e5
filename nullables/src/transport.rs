//! Nullable transport: queue messages instead of relaying them.

use rebase_messages::{
    DeliveryRejection, FeeAsset, FeePayment, InboundMessage, MessageId, MessageReceiver,
    OutboundMessage, Transport, TransportError,
};
use rebase_types::{Address, ChainSelector};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct TransportState {
    sequence: u64,
    fee_per_message: u128,
    quotes_unavailable: bool,
    fee_balances: HashMap<Address, u128>,
    collected_fees: u128,
    in_flight: VecDeque<InboundMessage>,
    sent: Vec<InboundMessage>,
    rejected: Vec<(InboundMessage, DeliveryRejection)>,
}

/// A test transport for one source chain.
///
/// Accepted messages wait in an in-flight queue until the test delivers
/// them, which makes the burn-then-later-mint window observable. Rejected
/// deliveries are held, not dropped.
pub struct NullTransport {
    source: ChainSelector,
    state: Mutex<TransportState>,
}

impl NullTransport {
    pub fn new(source: ChainSelector) -> Self {
        Self {
            source,
            state: Mutex::new(TransportState::default()),
        }
    }

    /// Charge `fee` per message, in whatever asset the pool names.
    pub fn with_fee(self, fee: u128) -> Self {
        self.lock().fee_per_message = fee;
        self
    }

    fn lock(&self) -> MutexGuard<'_, TransportState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn source(&self) -> ChainSelector {
        self.source
    }

    /// Make fee quotes fail (or work again).
    pub fn set_quotes_unavailable(&self, unavailable: bool) {
        self.lock().quotes_unavailable = unavailable;
    }

    /// Credit `payer` with fee-asset allowance.
    pub fn fund(&self, payer: &Address, amount: u128) {
        *self.lock().fee_balances.entry(payer.clone()).or_insert(0) += amount;
    }

    pub fn fee_balance(&self, payer: &Address) -> u128 {
        self.lock().fee_balances.get(payer).copied().unwrap_or(0)
    }

    pub fn collected_fees(&self) -> u128 {
        self.lock().collected_fees
    }

    /// Messages accepted but not yet delivered.
    pub fn in_flight(&self) -> Vec<InboundMessage> {
        self.lock().in_flight.iter().cloned().collect()
    }

    /// Every message ever accepted, in send order.
    pub fn sent(&self) -> Vec<InboundMessage> {
        self.lock().sent.clone()
    }

    /// Deliveries the receiver refused.
    pub fn rejected(&self) -> Vec<(InboundMessage, DeliveryRejection)> {
        self.lock().rejected.clone()
    }

    /// Deliver the oldest in-flight message. `None` if nothing is queued.
    pub fn deliver_next(
        &self,
        receiver: &dyn MessageReceiver,
    ) -> Option<Result<MessageId, DeliveryRejection>> {
        // Lock released before calling into the receiver.
        let message = self.lock().in_flight.pop_front()?;
        Some(self.deliver(message, receiver))
    }

    /// Deliver everything in flight, oldest first.
    pub fn deliver_all(
        &self,
        receiver: &dyn MessageReceiver,
    ) -> Vec<Result<MessageId, DeliveryRejection>> {
        let mut results = Vec::new();
        while let Some(result) = self.deliver_next(receiver) {
            results.push(result);
        }
        results
    }

    /// Deliver an already-sent message again, as an at-least-once transport may.
    pub fn redeliver(
        &self,
        message_id: &MessageId,
        receiver: &dyn MessageReceiver,
    ) -> Option<Result<MessageId, DeliveryRejection>> {
        let message = self
            .lock()
            .sent
            .iter()
            .find(|m| m.message_id == *message_id)
            .cloned()?;
        Some(self.deliver(message, receiver))
    }

    /// Put held rejections back in flight for another attempt.
    pub fn requeue_rejected(&self) -> usize {
        let mut state = self.lock();
        let held: Vec<_> = state.rejected.drain(..).map(|(m, _)| m).collect();
        let count = held.len();
        state.in_flight.extend(held);
        count
    }

    fn deliver(
        &self,
        message: InboundMessage,
        receiver: &dyn MessageReceiver,
    ) -> Result<MessageId, DeliveryRejection> {
        match receiver.on_message(&message) {
            Ok(()) => Ok(message.message_id),
            Err(rejection) => {
                self.lock().rejected.push((message, rejection.clone()));
                Err(rejection)
            }
        }
    }
}

impl Transport for NullTransport {
    fn quote_fee(
        &self,
        message: &OutboundMessage,
        _asset: &FeeAsset,
    ) -> Result<u128, TransportError> {
        let state = self.lock();
        if state.quotes_unavailable {
            return Err(TransportError::FeeQuoteUnavailable(
                message.destination.to_string(),
            ));
        }
        Ok(state.fee_per_message)
    }

    fn send(&self, message: OutboundMessage, fee: FeePayment) -> Result<MessageId, TransportError> {
        let mut state = self.lock();
        if state.quotes_unavailable {
            return Err(TransportError::FeeQuoteUnavailable(
                message.destination.to_string(),
            ));
        }
        let required = state.fee_per_message;
        let available = state.fee_balances.get(&fee.payer).copied().unwrap_or(0);
        if fee.amount < required || available < required {
            return Err(TransportError::InsufficientFeeAllowance {
                required,
                available: available.min(fee.amount),
            });
        }
        if required > 0 {
            state.fee_balances.insert(fee.payer.clone(), available - required);
            state.collected_fees += required;
        }

        state.sequence += 1;
        let message_id = MessageId::derive(self.source, state.sequence, &message.data);
        let inbound = InboundMessage {
            message_id,
            source_chain: self.source,
            sender_pool: message.sender_pool,
            data: message.data,
        };
        state.sent.push(inbound.clone());
        state.in_flight.push_back(inbound);
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Accepting;
    impl MessageReceiver for Accepting {
        fn on_message(&self, _message: &InboundMessage) -> Result<(), DeliveryRejection> {
            Ok(())
        }
    }

    struct Refusing;
    impl MessageReceiver for Refusing {
        fn on_message(&self, message: &InboundMessage) -> Result<(), DeliveryRejection> {
            Err(DeliveryRejection {
                message_id: message.message_id,
                reason: "no".into(),
            })
        }
    }

    fn outbound() -> OutboundMessage {
        OutboundMessage {
            destination: ChainSelector::new(2),
            sender_pool: Address::new("pool-a"),
            receiver_pool: Address::new("pool-b"),
            data: vec![1, 2, 3],
        }
    }

    fn payment(payer: &str, amount: u128) -> FeePayment {
        FeePayment {
            asset: FeeAsset::new("LINK"),
            payer: Address::new(payer),
            amount,
        }
    }

    #[test]
    fn send_queues_until_delivered() {
        let transport = NullTransport::new(ChainSelector::new(1));
        let id = transport.send(outbound(), payment("alice", 0)).unwrap();
        assert_eq!(transport.in_flight().len(), 1);
        assert_eq!(transport.deliver_next(&Accepting), Some(Ok(id)));
        assert!(transport.in_flight().is_empty());
        assert_eq!(transport.deliver_next(&Accepting), None);
    }

    #[test]
    fn ids_differ_per_send() {
        let transport = NullTransport::new(ChainSelector::new(1));
        let a = transport.send(outbound(), payment("alice", 0)).unwrap();
        let b = transport.send(outbound(), payment("alice", 0)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn fee_is_charged() {
        let transport = NullTransport::new(ChainSelector::new(1)).with_fee(5);
        let alice = Address::new("alice");
        let err = transport.send(outbound(), payment("alice", 5)).unwrap_err();
        assert!(matches!(err, TransportError::InsufficientFeeAllowance { required: 5, .. }));

        transport.fund(&alice, 7);
        transport.send(outbound(), payment("alice", 5)).unwrap();
        assert_eq!(transport.fee_balance(&alice), 2);
        assert_eq!(transport.collected_fees(), 5);
    }

    #[test]
    fn unavailable_quote_fails_send() {
        let transport = NullTransport::new(ChainSelector::new(1));
        transport.set_quotes_unavailable(true);
        let asset = FeeAsset::new("LINK");
        assert!(matches!(
            transport.quote_fee(&outbound(), &asset),
            Err(TransportError::FeeQuoteUnavailable(_))
        ));
        assert!(transport.send(outbound(), payment("alice", 0)).is_err());
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn rejected_delivery_is_held_and_requeued() {
        let transport = NullTransport::new(ChainSelector::new(1));
        transport.send(outbound(), payment("alice", 0)).unwrap();
        assert!(matches!(transport.deliver_next(&Refusing), Some(Err(_))));
        assert_eq!(transport.rejected().len(), 1);
        assert_eq!(transport.requeue_rejected(), 1);
        assert_eq!(transport.deliver_all(&Accepting).len(), 1);
    }
}
