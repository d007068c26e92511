//! Synchronous dispatch engine

use thiserror::Error;

use super::middleware::BoxedMiddleware;

/// A pure state transition. Plain function pointers keep reducers free of
/// captured state.
pub type Reducer<S, A> = fn(&S, A) -> S;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("middleware called next more than once")]
    NextCalledTwice,
    #[error("middleware failed: {0}")]
    Middleware(#[from] anyhow::Error),
    #[error("store is no longer running")]
    Closed,
}

/// Owns the current state and composes the middleware chain around the reducer.
///
/// `dispatch` takes `&mut self`, so a chain can never re-enter the store that is
/// running it. Shared access goes through [`super::Dispatcher`].
pub struct Store<S, A> {
    state: S,
    reducer: Reducer<S, A>,
    middlewares: Vec<BoxedMiddleware<S, A>>,
}

impl<S: Clone, A> Store<S, A> {
    pub fn new(initial_state: S, reducer: Reducer<S, A>, middlewares: Vec<BoxedMiddleware<S, A>>) -> Self {
        Self {
            state: initial_state,
            reducer,
            middlewares,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Run `action` through the chain and commit the reducer's result.
    ///
    /// The state is replaced only when the reducer ran and every middleware
    /// returned successfully. A vetoed action leaves the state untouched and is
    /// not an error.
    pub fn dispatch(&mut self, action: A) -> Result<&S, DispatchError> {
        let mut reduced = None;
        run_chain(&mut self.middlewares, &self.state, action, self.reducer, &mut reduced)?;

        if let Some(next_state) = reduced {
            self.state = next_state;
        }
        Ok(&self.state)
    }
}

fn run_chain<S: Clone, A>(
    middlewares: &mut [BoxedMiddleware<S, A>],
    state: &S,
    action: A,
    reducer: Reducer<S, A>,
    reduced: &mut Option<S>,
) -> Result<S, DispatchError> {
    let Some((head, tail)) = middlewares.split_first_mut() else {
        let next_state = reducer(state, action);
        *reduced = Some(next_state.clone());
        return Ok(next_state);
    };

    let mut called = false;
    let mut next = |action: A| {
        if called {
            return Err(DispatchError::NextCalledTwice);
        }
        called = true;
        run_chain(&mut *tail, state, action, reducer, &mut *reduced)
    };

    head.handle(state, action, &mut next)
}
