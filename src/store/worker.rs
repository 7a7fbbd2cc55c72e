//! Store worker
//!
//! The only code that ever reads or writes the map.

use std::collections::HashMap;
use std::thread;

use crossbeam::channel::Receiver;

use crate::error::Result;
use super::{Operation, Request, Response, Status};

type Map = HashMap<Vec<u8>, Vec<u8>>;

/// Spawn the worker thread draining `inbox`
pub(super) fn spawn(inbox: Receiver<Request>) -> Result<()> {
    thread::Builder::new()
        .name("lankv-store".to_string())
        .spawn(move || run(inbox))?;
    Ok(())
}

/// Apply requests one at a time until every sender is gone
fn run(inbox: Receiver<Request>) {
    let mut map = Map::new();

    for request in inbox.iter() {
        let response = apply(&mut map, request.operation);

        // The caller is blocked on recv(), a failed send means it panicked
        if request.reply.send(response).is_err() {
            tracing::warn!("Store caller went away before its response was sent");
        }
    }

    tracing::debug!("Store worker stopped with {} keys", map.len());
}

fn apply(map: &mut Map, operation: Operation) -> Response {
    match operation {
        Operation::Put { key, value } => {
            map.insert(key.clone(), value);
            Response {
                status: Status::Ok,
                value: key,
            }
        }
        Operation::Get { key } => match map.get(&key) {
            Some(value) => Response {
                status: Status::Ok,
                value: value.clone(),
            },
            None => Response {
                status: Status::NotFound,
                value: key,
            },
        },
        Operation::Delete { key } => {
            map.remove(&key);
            Response {
                status: Status::Ok,
                value: key,
            }
        }
    }
}
