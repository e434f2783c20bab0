use uuid::Uuid;

use super::plan::Action;

/// Outcome of one `apply` run. Execution aborts on the first failure; the
/// already-executed prefix is reported as-is and is never rolled back.
#[derive(Clone, Debug, Default)]
pub struct ApplyReport {
    pub executed: Vec<Action>,
    pub errors: Vec<String>,
    pub duration_ms: u64,
    pub plan_uuid: Option<Uuid>,
}

impl ApplyReport {
    #[must_use]
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}
