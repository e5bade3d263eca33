//! Configuration defaults and JSON deserialization tests.

use coopsim_core::config::Config;
use pretty_assertions::assert_eq;

#[test]
fn defaults_describe_the_baseline_machine() {
    let config = Config::default();
    assert_eq!(config.machine.memory_words, 11000);
    assert_eq!(config.machine.protected_boundary, 1000);
    assert_eq!(config.machine.thread_slots, 10);
    assert_eq!(config.machine.prn_block_ticks, 100);
    assert_eq!(config.watchdog.tick_limit, 100_000);
    assert_eq!(config.watchdog.same_pc_limit, 100);
}

#[test]
fn empty_document_yields_the_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.machine.memory_words, 11000);
    assert_eq!(config.watchdog.tick_limit, 100_000);
}

#[test]
fn partial_document_overrides_only_what_it_names() {
    let json = r#"{
        "machine": { "memory_words": 2048, "thread_slots": 4 },
        "watchdog": { "same_pc_limit": 16 }
    }"#;
    let config = Config::from_json(json).unwrap();
    assert_eq!(config.machine.memory_words, 2048);
    assert_eq!(config.machine.thread_slots, 4);
    assert_eq!(config.machine.protected_boundary, 1000);
    assert_eq!(config.machine.prn_block_ticks, 100);
    assert_eq!(config.watchdog.same_pc_limit, 16);
    assert_eq!(config.watchdog.tick_limit, 100_000);
}

#[test]
fn malformed_document_is_an_error() {
    assert!(Config::from_json("not json").is_err());
    assert!(Config::from_json(r#"{ "machine": { "memory_words": "big" } }"#).is_err());
}
