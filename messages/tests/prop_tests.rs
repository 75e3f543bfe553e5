use proptest::prelude::*;

use rebase_messages::{codec, BridgePayload, MessageId};
use rebase_types::{Address, ChainSelector};

proptest! {
    /// Arbitrary bytes never make the payload decoder panic.
    #[test]
    fn decode_never_panics(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = BridgePayload::decode(&data);
        let _ = codec::decode::<u128>(&data);
    }

    /// Encoded payloads decode to the same value.
    #[test]
    fn payload_roundtrip(
        amount in any::<u128>(),
        rate in any::<u128>(),
        recipient in "[a-z0-9]{1,40}",
        sender in "[a-z0-9]{1,40}",
    ) {
        let payload = BridgePayload {
            amount,
            rate,
            recipient: Address::new(recipient),
            original_sender: Address::new(sender),
        };
        let bytes = payload.encode().unwrap();
        prop_assert_eq!(BridgePayload::decode(&bytes).unwrap(), payload);
    }

    /// Distinct sequence numbers give distinct ids for the same payload.
    #[test]
    fn message_ids_unique_per_sequence(chain in any::<u64>(), a in any::<u64>(), b in any::<u64>()) {
        prop_assume!(a != b);
        let source = ChainSelector::new(chain);
        prop_assert_ne!(MessageId::derive(source, a, b"x"), MessageId::derive(source, b, b"x"));
    }
}
