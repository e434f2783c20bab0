use serde_json::Value;

use packyard::logging::FactsEmitter;

/// Collects every emitted fact for assertions.
#[derive(Default, Clone)]
pub struct TestEmitter {
    pub events: std::sync::Arc<std::sync::Mutex<Vec<(String, String, Value)>>>,
}

impl FactsEmitter for TestEmitter {
    fn emit(&self, _subsystem: &str, event: &str, decision: &str, fields: Value) {
        self.events.lock().unwrap().push((
            event.to_string(),
            decision.to_string(),
            fields,
        ));
    }
}
