use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::batch::Batch;
use crate::error::CloudLogError;

/// Delivery of finished batches to the backend.
///
/// Implementations must be safe for concurrent use: a client shares its
/// transport across every caller that shares the client.
pub trait Transport: Send + Sync {
    /// Provenance tag written into `cloudlog_client_type` of every record.
    fn client_type(&self) -> &str;

    /// Deliver the whole batch. Any failure is returned as-is; the batch is
    /// either accepted or not.
    fn send(&self, batch: &Batch) -> Result<(), CloudLogError>;

    /// Release connections and flush pending deliveries.
    fn close(&self) -> Result<(), CloudLogError> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn client_type(&self) -> &str {
        (**self).client_type()
    }

    fn send(&self, batch: &Batch) -> Result<(), CloudLogError> {
        (**self).send(batch)
    }

    fn close(&self) -> Result<(), CloudLogError> {
        (**self).close()
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn client_type(&self) -> &str {
        (**self).client_type()
    }

    fn send(&self, batch: &Batch) -> Result<(), CloudLogError> {
        (**self).send(batch)
    }

    fn close(&self) -> Result<(), CloudLogError> {
        (**self).close()
    }
}

/// In-memory transport: keeps every batch it is handed.
///
/// Meant for tests of code that logs through a client. `fail_next` makes
/// the following `send` fail without recording the batch.
#[derive(Debug)]
pub struct MemoryTransport {
    client_type: String,
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    batches: Vec<Batch>,
    fail_next: Option<String>,
    closed: bool,
}

#[derive(Debug, thiserror::Error)]
#[error("memory transport: {0}")]
pub struct MemoryTransportError(pub String);

impl MemoryTransport {
    pub fn new(client_type: impl Into<String>) -> Self {
        Self {
            client_type: client_type.into(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next `send` fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.state().fail_next = Some(message.into());
    }

    /// Batches received so far, in send order.
    pub fn batches(&self) -> Vec<Batch> {
        self.state().batches.clone()
    }

    pub fn send_count(&self) -> usize {
        self.state().batches.len()
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }
}

impl Transport for MemoryTransport {
    fn client_type(&self) -> &str {
        &self.client_type
    }

    fn send(&self, batch: &Batch) -> Result<(), CloudLogError> {
        let mut state = self.state();
        if let Some(message) = state.fail_next.take() {
            return Err(CloudLogError::transport(MemoryTransportError(message)));
        }
        state.batches.push(batch.clone());
        Ok(())
    }

    fn close(&self) -> Result<(), CloudLogError> {
        self.state().closed = true;
        Ok(())
    }
}
