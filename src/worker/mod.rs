//! A connection owned by a dedicated thread, driven from async code.
//!
//! [`Connection`] and everything borrowed from it are synchronous and tied to one
//! thread at a time. [`ConnectionWorker`] moves the connection onto its own OS thread and
//! ships closures to it, so async callers can run a whole sequence of statement, cursor
//! and unit-of-work calls without blocking the runtime.

mod channel;
mod dispatcher;

use std::any::Any;
use std::fmt;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::config::{Endpoint, SessionOptions};
use crate::connection::Connection;
use crate::error::SqlUowError;

use channel::{BoxedCallback, Command};
use dispatcher::run_worker;

/// Handle to a connection living on a worker thread.
pub struct ConnectionWorker {
    sender: Sender<Command>,
    thread: Option<JoinHandle<()>>,
    endpoint: Endpoint,
}

impl ConnectionWorker {
    /// Spawn a worker and open a session on it with default [`SessionOptions`].
    ///
    /// # Errors
    /// Returns `SqlUowError::ConnectionError` if the thread cannot be spawned or the session
    /// cannot be opened.
    pub async fn open(endpoint: &Endpoint) -> Result<Self, SqlUowError> {
        Self::open_with(endpoint, SessionOptions::default()).await
    }

    /// Spawn a worker and open a session on it with `options`.
    ///
    /// # Errors
    /// Returns `SqlUowError::ConnectionError` if the thread cannot be spawned or the session
    /// cannot be opened.
    pub async fn open_with(
        endpoint: &Endpoint,
        options: SessionOptions,
    ) -> Result<Self, SqlUowError> {
        let (sender, receiver) = mpsc::channel::<Command>();
        let (opened_tx, opened_rx) = oneshot::channel();
        let worker_endpoint = endpoint.clone();
        let thread = thread::Builder::new()
            .name(format!("sql-uow-worker-{}", endpoint.database))
            .spawn(move || run_worker(&worker_endpoint, options, opened_tx, &receiver))
            .map_err(|err| {
                SqlUowError::ConnectionError(format!("failed to spawn worker thread: {err}"))
            })?;

        opened_rx.await.map_err(|_| {
            SqlUowError::ConnectionError("worker exited while opening the session".into())
        })??;
        debug!(endpoint = %endpoint, "worker session ready");
        Ok(Self {
            sender,
            thread: Some(thread),
            endpoint: endpoint.clone(),
        })
    }

    /// Run `func` against the worker-owned connection and return its result.
    ///
    /// Anything borrowed from the connection (statements, cursors, units of work) must be
    /// created and finished inside `func`.
    ///
    /// # Errors
    /// Returns the error from `func`, or `SqlUowError::ConnectionError` if the worker is gone.
    pub async fn with_connection<F, R>(&self, func: F) -> Result<R, SqlUowError>
    where
        F: FnOnce(&mut Connection) -> Result<R, SqlUowError> + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let callback: BoxedCallback =
            Box::new(move |conn| func(conn).map(|value| Box::new(value) as Box<dyn Any + Send>));
        self.send(Command::WithConnection {
            callback,
            respond_to: tx,
        })?;
        match rx.await {
            Ok(Ok(payload)) => payload.downcast::<R>().map(|boxed| *boxed).map_err(|_| {
                SqlUowError::ExecutionError("worker response had an unexpected type".into())
            }),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(SqlUowError::ConnectionError(
                "worker dropped while running a callback".into(),
            )),
        }
    }

    /// Close the session and wait for the worker thread to exit.
    ///
    /// # Errors
    /// Returns `SqlUowError::ConnectionError` if the session fails to close or the worker
    /// thread panicked.
    pub async fn close(mut self) -> Result<(), SqlUowError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Shutdown {
            respond_to: Some(tx),
        })?;
        let closed = rx.await.map_err(|_| {
            SqlUowError::ConnectionError("worker dropped while closing the session".into())
        })?;
        if let Some(thread) = self.thread.take() {
            tokio::task::spawn_blocking(move || thread.join())
                .await
                .map_err(|err| SqlUowError::ConnectionError(format!("join task failed: {err}")))?
                .map_err(|_| SqlUowError::ConnectionError("worker thread panicked".into()))?;
        }
        closed
    }

    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn send(&self, command: Command) -> Result<(), SqlUowError> {
        self.sender
            .send(command)
            .map_err(|_| SqlUowError::ConnectionError("worker closed".into()))
    }
}

impl Drop for ConnectionWorker {
    fn drop(&mut self) {
        if self.thread.is_some() && self.sender.send(Command::Shutdown { respond_to: None }).is_err()
        {
            warn!(endpoint = %self.endpoint, "worker already gone on drop");
        }
    }
}

impl fmt::Debug for ConnectionWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionWorker")
            .field("endpoint", &self.endpoint)
            .field("running", &self.thread.is_some())
            .finish()
    }
}
