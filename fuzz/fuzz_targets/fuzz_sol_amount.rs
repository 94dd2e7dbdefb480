#![no_main]

use libfuzzer_sys::fuzz_target;
use slotland::domain::value_objects::Lamports;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    if let Some(lamports) = Lamports::parse_positive_sol(raw.as_ref()) {
        let formatted = lamports.as_sol_string();
        assert_eq!(Lamports::parse_positive_sol(&formatted), Some(lamports));
    }
});
