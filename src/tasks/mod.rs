//! Background Tasks Module
//!
//! Contains the background tasks a cache may own.
//!
//! # Tasks
//! - Evictor: removes stale entries at the configured interval
//! - Dispatcher: delivers observer callbacks off the calling thread

mod dispatcher;
mod evictor;

pub(crate) use dispatcher::spawn_dispatcher;
pub(crate) use evictor::Evictor;
