use agentcfg_core::{Options, SchemaEngine, ValidationFailure};
use agentcfg_schema::Schema;
use parking_lot::{Mutex, const_mutex};

static RECORDED: Mutex<Vec<Options>> = const_mutex(Vec::new());

/// Engine that records every candidate it sees before delegating to a schema.
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    inner: Schema,
}

impl RecordingEngine {
    pub fn new(inner: Schema) -> Self {
        Self { inner }
    }
}

impl SchemaEngine for RecordingEngine {
    fn validate(&self, candidate: &Options) -> Result<Options, ValidationFailure> {
        RECORDED.lock().push(candidate.clone());
        self.inner.validate_map(candidate)
    }
}

/// Drain the candidates recorded so far.
pub fn take_recorded() -> Vec<Options> {
    std::mem::take(&mut *RECORDED.lock())
}
