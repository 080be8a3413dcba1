//! In-Memory Sink
//!
//! Keeps the last written buffer. Useful for dry runs and tests.

use crate::domain::ports::{AsyncConfigSink, ConfigSink};
use crate::error::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

/// Sink holding the most recent write in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    contents: Mutex<Option<Vec<u8>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Last written bytes, if anything was written
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.contents.lock().clone()
    }

    /// Last written bytes as UTF-8 text
    pub fn contents_string(&self) -> Option<String> {
        self.contents()
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }

    fn store(&self, bytes: &[u8]) {
        *self.contents.lock() = Some(bytes.to_vec());
    }
}

impl ConfigSink for MemorySink {
    fn write(&self, bytes: &[u8]) -> Result<()> {
        self.store(bytes);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[async_trait]
impl AsyncConfigSink for MemorySink {
    async fn write(&self, bytes: &[u8]) -> Result<()> {
        self.store(bytes);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
