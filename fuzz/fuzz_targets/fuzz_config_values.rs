#![no_main]

use libfuzzer_sys::fuzz_target;
use slotland::domain::{
    config::parse_slotland_config_toml,
    value_objects::{CommitmentLevel, StrategyKind},
};

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    if let Some(strategy) = StrategyKind::parse(input.as_ref()) {
        assert_eq!(StrategyKind::parse(strategy.as_str()), Some(strategy));
    }
    if let Some(commitment) = CommitmentLevel::parse(input.as_ref()) {
        assert_eq!(CommitmentLevel::parse(commitment.as_str()), Some(commitment));
    }
    let _ = parse_slotland_config_toml(input.as_ref());
});
