//! Events emitted by ledger operations for subscribers.

use rebase_types::{Address, Rate};
use serde::Serialize;

use crate::access::Capability;

/// Ledger-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// The global interest rate was lowered.
    GlobalRateChanged { old_rate: Rate, new_rate: Rate },
    /// Pending interest was folded into a holder's principal.
    InterestRealized { holder: Address, interest: u128 },
    /// New principal was created for a holder.
    Minted {
        holder: Address,
        amount: u128,
        assigned_rate: Rate,
    },
    /// Principal was destroyed.
    Burned { holder: Address, amount: u128 },
    /// Principal moved between holders.
    Transferred {
        from: Address,
        to: Address,
        amount: u128,
    },
    /// An allowance was set.
    Approval {
        owner: Address,
        spender: Address,
        amount: u128,
    },
    CapabilityGranted {
        grantee: Address,
        capability: Capability,
    },
    CapabilityRevoked {
        grantee: Address,
        capability: Capability,
    },
    AdministratorTransferred { previous: Address, new: Address },
}

/// A committed event and its position in the ledger's commit order.
///
/// Sequence numbers start at 1 and have no gaps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SequencedEvent {
    pub sequence: u64,
    #[serde(flatten)]
    pub event: LedgerEvent,
}

/// Synchronous fan-out event bus for ledger events.
///
/// Listeners run inline on the emitting thread after the operation has
/// committed and released the ledger lock. Two operations racing on
/// different threads can reach listeners in either order; order by
/// `sequence` when it matters.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&SequencedEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&SequencedEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &SequencedEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn emit_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));

        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(&SequencedEvent {
            sequence: 1,
            event: LedgerEvent::GlobalRateChanged {
                old_rate: 2,
                new_rate: 1,
            },
        });

        assert_eq!(counter.load(Ordering::SeqCst), 11);
        assert_eq!(bus.listener_count(), 2);
    }

    #[test]
    fn events_serialize_with_a_type_tag() {
        let event = LedgerEvent::Minted {
            holder: Address::new("alice"),
            amount: 100,
            assigned_rate: 7,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "minted");
        assert_eq!(json["holder"], "alice");
        assert_eq!(json["amount"], 100);

        let json = serde_json::to_value(LedgerEvent::CapabilityGranted {
            grantee: Address::new("vault"),
            capability: crate::Capability::MintBurn,
        })
        .unwrap();
        assert_eq!(json["type"], "capability_granted");
    }

    #[test]
    fn sequenced_event_serializes_flat() {
        let json = serde_json::to_value(SequencedEvent {
            sequence: 42,
            event: LedgerEvent::Burned {
                holder: Address::new("alice"),
                amount: 3,
            },
        })
        .unwrap();
        assert_eq!(json["sequence"], 42);
        assert_eq!(json["type"], "burned");
        assert_eq!(json["amount"], 3);
    }

    #[test]
    fn emit_with_no_listeners_is_noop() {
        let bus = EventBus::new();
        bus.emit(&SequencedEvent {
            sequence: 1,
            event: LedgerEvent::Burned {
                holder: Address::new("alice"),
                amount: 1,
            },
        });
    }
}
