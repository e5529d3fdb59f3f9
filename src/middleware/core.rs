use std::sync::Arc;

use crate::handler::SharedHandler;

/// A layer that wraps a handler in extra behavior.
///
/// `wrap` receives the next handler in the chain and returns a handler that
/// usually runs some logic, calls `next`, and runs more logic on the way out.
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: SharedHandler) -> SharedHandler;
}

impl<F> Middleware for F
where
    F: Fn(SharedHandler) -> SharedHandler + Send + Sync + 'static,
{
    #[inline]
    fn wrap(&self, next: SharedHandler) -> SharedHandler {
        self(next)
    }
}

pub type SharedMiddleware = Arc<dyn Middleware>;

/// Wrap `terminal` in `middlewares`, first element outermost.
///
/// `[A, B, C]` around `H` behaves as `A(B(C(H)))`: A's before-logic runs
/// first and its after-logic runs last.
#[must_use]
pub fn compose(middlewares: &[SharedMiddleware], terminal: SharedHandler) -> SharedHandler {
    middlewares
        .iter()
        .rev()
        .fold(terminal, |next, mw| mw.wrap(next))
}
