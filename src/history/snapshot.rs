use chrono::{DateTime, Local};

/// One recorded document state. Never mutated after creation.
#[derive(Clone, Debug)]
pub struct Snapshot<D> {
    description: String,
    document: D,
    recorded_at: DateTime<Local>,
}

impl<D> Snapshot<D> {
    pub(crate) fn new(description: impl Into<String>, document: D) -> Self {
        Self {
            description: description.into(),
            document,
            recorded_at: Local::now(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn recorded_at(&self) -> DateTime<Local> {
        self.recorded_at
    }
}
