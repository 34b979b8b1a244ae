mod direct;
mod session;
mod tx;

pub use session::Connection;
pub(crate) use tx::TxEnd;
