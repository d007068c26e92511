//! Middleware trait and helpers for building interceptors

use std::fmt::Debug;

use super::engine::DispatchError;

/// Continuation to the rest of the chain. Calling it runs the remaining
/// middlewares and finally the reducer, and yields the reduced state.
pub type Next<'a, S, A> = &'a mut dyn FnMut(A) -> Result<S, DispatchError>;

pub type BoxedMiddleware<S, A> = Box<dyn Middleware<S, A> + Send>;

/// An interceptor wrapped around the reducer.
///
/// Code before `next` runs left-to-right across the chain, code after it
/// unwinds right-to-left. Returning without calling `next` vetoes the action.
pub trait Middleware<S, A> {
    fn handle(&mut self, state: &S, action: A, next: Next<'_, S, A>) -> Result<S, DispatchError>;
}

impl<S, A, F> Middleware<S, A> for F
where
    F: FnMut(&S, A, Next<'_, S, A>) -> Result<S, DispatchError>,
{
    fn handle(&mut self, state: &S, action: A, next: Next<'_, S, A>) -> Result<S, DispatchError> {
        self(state, action, next)
    }
}

/// Box an arbitrary closure as a middleware.
pub fn middleware<S, A, F>(f: F) -> BoxedMiddleware<S, A>
where
    S: 'static,
    A: 'static,
    F: FnMut(&S, A, Next<'_, S, A>) -> Result<S, DispatchError> + Send + 'static,
{
    Box::new(f)
}

/// Middleware running `block` before the action moves on down the chain.
pub fn pre_reducer<S, A, F>(mut block: F) -> BoxedMiddleware<S, A>
where
    S: 'static,
    A: 'static,
    F: FnMut(&S, &A) + Send + 'static,
{
    middleware(move |state, action, next| {
        block(state, &action);
        next(action)
    })
}

/// Middleware running `block` with the previous and reduced state once the rest
/// of the chain has returned.
pub fn post_reducer<S, A, F>(mut block: F) -> BoxedMiddleware<S, A>
where
    S: 'static,
    A: Clone + 'static,
    F: FnMut(&S, &S, &A) + Send + 'static,
{
    middleware(move |state, action: A, next| {
        let latest = next(action.clone())?;
        block(state, &latest, &action);
        Ok(latest)
    })
}

/// Post-reducer middleware that traces every reduced action.
pub fn logging<S, A>(store: &'static str) -> BoxedMiddleware<S, A>
where
    S: Debug + 'static,
    A: Debug + Clone + 'static,
{
    post_reducer(move |previous: &S, latest: &S, action: &A| {
        tracing::debug!(store, ?action, ?previous, ?latest, "Action reduced");
    })
}
