use std::any::Any;

use tokio::sync::oneshot;

use crate::connection::Connection;
use crate::error::SqlUowError;

pub(super) type BoxedResponse = Result<Box<dyn Any + Send>, SqlUowError>;
pub(super) type BoxedCallback = Box<dyn FnOnce(&mut Connection) -> BoxedResponse + Send>;

pub(super) enum Command {
    WithConnection {
        callback: BoxedCallback,
        respond_to: oneshot::Sender<BoxedResponse>,
    },
    Shutdown {
        respond_to: Option<oneshot::Sender<Result<(), SqlUowError>>>,
    },
}
