#![allow(missing_docs)]
#![cfg(feature = "logging")]

use ioc::{
    Container, Scope,
    logging::{LoggingConfig, configure_logging, enable_debug_logging}
};
use std::fs;
use tracing::Level;

#[test]
fn it_writes_container_records_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("ioc.log");

    configure_logging(LoggingConfig::new()
        .with_level(Level::DEBUG)
        .without_console()
        .with_file(&path))
        .unwrap();

    let container = Container::new();
    container.register("limit", 10u32, Scope::Singleton).unwrap();
    container.init().unwrap();
    let _ = container.register("late", 5u32, Scope::Singleton);

    // later calls don't replace the subscriber
    enable_debug_logging().unwrap();
    configure_logging(LoggingConfig::new().with_file(dir.path())).unwrap();

    let records = fs::read_to_string(&path).unwrap();
    assert!(records.contains("logging configured"));
    assert!(records.contains("registering bean"));
    assert!(records.contains("\"bean\":\"limit\""));
    assert!(records.contains("container initialized"));
    assert!(records.contains("registration after initialization started"));
}
