#![no_main]

use libfuzzer_sys::fuzz_target;

use rebase_messages::{BridgePayload, MessageId};
use rebase_types::ChainSelector;

// Arbitrary bytes from the transport must never panic the payload decoder.
fuzz_target!(|data: &[u8]| {
    if let Ok(payload) = BridgePayload::decode(data) {
        let encoded = payload.encode().expect("decoded payload re-encodes");
        let again = BridgePayload::decode(&encoded).expect("re-encoded payload decodes");
        assert_eq!(again, payload);
    }

    let _ = MessageId::derive(ChainSelector::new(1), data.len() as u64, data);
});
