use std::sync::mpsc::Receiver;

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::config::{Endpoint, SessionOptions};
use crate::connection::Connection;
use crate::error::SqlUowError;

use super::channel::Command;

pub(super) fn run_worker(
    endpoint: &Endpoint,
    options: SessionOptions,
    opened: oneshot::Sender<Result<(), SqlUowError>>,
    receiver: &Receiver<Command>,
) {
    let mut conn = match Connection::open_with(endpoint, options) {
        Ok(conn) => conn,
        Err(err) => {
            let _ = opened.send(Err(err));
            return;
        }
    };
    if opened.send(Ok(())).is_err() {
        debug!(endpoint = %endpoint, "worker owner went away before open completed");
        return;
    }

    while let Ok(command) = receiver.recv() {
        match command {
            Command::WithConnection {
                callback,
                respond_to,
            } => {
                let _ = respond_to.send(callback(&mut conn));
            }
            Command::Shutdown { respond_to } => {
                let closed = conn.close();
                if let Err(err) = &closed {
                    warn!(endpoint = %endpoint, error = %err, "worker failed to close session");
                }
                if let Some(respond_to) = respond_to {
                    let _ = respond_to.send(closed);
                }
                return;
            }
        }
    }
    // Every sender is gone; the connection closes on drop.
    debug!(endpoint = %endpoint, "worker channel closed");
}
