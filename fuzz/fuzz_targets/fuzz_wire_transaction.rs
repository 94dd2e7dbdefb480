#![no_main]

use libfuzzer_sys::fuzz_target;
use slotland::domain::entities::SignedTransaction;

fuzz_target!(|data: &[u8]| {
    if let Ok(transaction) = SignedTransaction::from_wire_bytes(data.to_vec()) {
        assert_eq!(transaction.wire_bytes(), data);
        assert_eq!(transaction.is_signed(), transaction.signature().is_some());
    }
});
