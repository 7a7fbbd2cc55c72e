//! Store Module
//!
//! The in-memory key-value store.
//!
//! ## Responsibilities
//! - Own the key → value map exclusively
//! - Serialize every put/get/delete into one total order
//! - Report missing keys and a stopped worker as errors
//!
//! ## Concurrency Model: Single Owning Worker
//!
//! One worker thread owns the map. Callers hand it an [`Operation`] over a
//! zero-capacity channel (a rendezvous), then wait on a private reply
//! channel. No lock guards the map; only the worker ever touches it, so
//! operations are linearizable in the order the worker receives them.
//!
//! [`Store`] is a cheap handle (`Clone`). The worker exits once every handle
//! has been dropped.

mod worker;

use crossbeam::channel::{self, Sender};

use crate::error::{LanKvError, Result};

/// A request for the store worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Put { key: Vec<u8>, value: Vec<u8> },
    Get { key: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// Outcome of an operation as reported by the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NotFound,
    Failed,
}

/// The worker's answer to one [`Operation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,

    /// The value for `Get`, the echoed key otherwise
    pub value: Vec<u8>,
}

/// An operation paired with the channel its response goes back on
pub(crate) struct Request {
    operation: Operation,
    reply: Sender<Response>,
}

/// Handle to a running store
#[derive(Debug, Clone)]
pub struct Store {
    requests: Sender<Request>,
}

impl Store {
    /// Start a new, empty store and its worker thread
    pub fn open() -> Result<Self> {
        // Zero capacity: send() returns only once the worker has taken the request
        let (requests, inbox) = channel::bounded(0);
        worker::spawn(inbox)?;
        Ok(Self { requests })
    }

    /// Hand an operation to the worker and wait for its response
    pub fn submit(&self, operation: Operation) -> Result<Response> {
        let (reply, response) = channel::bounded(1);

        self.requests
            .send(Request { operation, reply })
            .map_err(|_| LanKvError::StoreOperationFailed("store worker has stopped".into()))?;

        response.recv().map_err(|_| {
            LanKvError::StoreOperationFailed("store worker dropped the request".into())
        })
    }

    /// Insert or overwrite a key
    pub fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        match self.submit(Operation::Put { key, value })?.status {
            Status::Ok => Ok(()),
            status => Err(LanKvError::StoreOperationFailed(format!(
                "put returned {:?}",
                status
            ))),
        }
    }

    /// Get the current value of a key
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let response = self.submit(Operation::Get { key: key.to_vec() })?;
        match response.status {
            Status::Ok => Ok(response.value),
            Status::NotFound => Err(LanKvError::KeyNotFound),
            Status::Failed => Err(LanKvError::StoreOperationFailed("get failed".into())),
        }
    }

    /// Remove a key; removing an absent key succeeds
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        match self.submit(Operation::Delete { key: key.to_vec() })?.status {
            Status::Ok => Ok(()),
            status => Err(LanKvError::StoreOperationFailed(format!(
                "delete returned {:?}",
                status
            ))),
        }
    }
}
