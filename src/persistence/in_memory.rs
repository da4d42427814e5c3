use super::*;
use parking_lot::Mutex;

/// Keeps every status written, for tests.
#[derive(Default)]
pub struct InMemoryStatusWriter {
    written: Mutex<Vec<StatusFile>>,
}

impl InMemoryStatusWriter {
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn written(&self) -> Vec<StatusFile> {
        self.written.lock().clone()
    }

    pub fn last(&self) -> Option<StatusFile> {
        self.written.lock().last().cloned()
    }
}

impl StatusWriter for InMemoryStatusWriter {
    fn write(&self, status: &StatusFile) -> Result<()> {
        self.written.lock().push(status.clone());
        Ok(())
    }
}
