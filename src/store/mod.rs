//! Store module - Unidirectional dispatch engine
//!
//! A store owns a state value and a pure reducer, and routes every dispatched
//! action through an ordered chain of middlewares before it reaches the
//! reducer. It is organized into submodules by responsibility:
//!
//! - `engine`: The synchronous `Store` and its continuation-passing chain
//! - `middleware`: The `Middleware` trait and pre/post/logging helpers
//! - `dispatcher`: Serialized runner that lets many writers share one store

mod engine;
mod middleware;
mod dispatcher;

pub use engine::{DispatchError, Store};

pub use middleware::{logging, middleware, pre_reducer, BoxedMiddleware, Middleware, Next};

pub use dispatcher::{channel, Dispatcher, WeakDispatcher};
