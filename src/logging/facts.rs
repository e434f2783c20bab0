//! Emission seams for structured facts and human-oriented audit lines.

use log::Level;
use serde_json::Value;

/// Receives one structured fact per stage event. Implementations decide
/// where the JSON goes (file, collector, nowhere).
pub trait FactsEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value);
}

/// Receives free-form audit lines alongside the structured facts.
pub trait AuditSink {
    fn log(&self, level: Level, msg: &str);
}

/// Default sink: drops facts and forwards audit lines to the `log` facade.
#[derive(Default)]
pub struct JsonlSink;

impl FactsEmitter for JsonlSink {
    fn emit(&self, _subsystem: &str, _event: &str, _decision: &str, _fields: Value) {}
}

impl AuditSink for JsonlSink {
    fn log(&self, level: Level, msg: &str) {
        log::log!(level, "{msg}");
    }
}
