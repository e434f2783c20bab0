use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::types::ApplyMode;

pub const TS_ZERO: &str = "1970-01-01T00:00:00Z";

pub fn now_iso() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| TS_ZERO.to_string())
}

/// Return a timestamp for facts emission based on mode.
/// - DryRun: constant zero timestamp for determinism.
/// - Commit: real, current timestamp in RFC3339.
pub fn ts_for_mode(mode: &ApplyMode) -> String {
    match mode {
        ApplyMode::DryRun => TS_ZERO.to_string(),
        ApplyMode::Commit => now_iso(),
    }
}

/// Apply redactions to a fact event so dry-run output is byte-deterministic:
/// timestamps are zeroed and volatile timing/hash fields dropped.
pub fn redact_event(mut v: Value) -> Value {
    if let Some(obj) = v.as_object_mut() {
        obj.insert("ts".into(), Value::String(TS_ZERO.to_string()));
        obj.remove("duration_ms");
        obj.remove("payload_hash");
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redact_zeroes_ts_and_drops_volatile_fields() {
        let input = json!({
            "ts": "2026-08-07T12:00:00Z",
            "duration_ms": 123,
            "payload_hash": "abc",
            "path": "/etc/app/secrets.env",
        });
        let out = redact_event(input);
        assert_eq!(out.get("ts").and_then(|v| v.as_str()), Some(TS_ZERO));
        assert!(out.get("duration_ms").is_none());
        assert!(out.get("payload_hash").is_none());
        assert_eq!(
            out.get("path").and_then(|v| v.as_str()),
            Some("/etc/app/secrets.env")
        );
    }

    #[test]
    fn dry_run_timestamp_is_constant() {
        assert_eq!(ts_for_mode(&ApplyMode::DryRun), TS_ZERO);
    }
}
