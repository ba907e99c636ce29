//! Chain executor — runs an ordered interceptor stack in front of a terminal action.
//!
//! A [`Chain`] is built per operation call from three parts:
//!
//! - a stack of interceptors, borrowed from the decorator's registry;
//! - a dispatch function that picks which capability method to call on each
//!   interceptor;
//! - the terminal action, usually the wrapped pool's native operation.
//!
//! The chain is also the continuation: every interceptor receives `&mut Chain`
//! and calls [`Chain::handle`] to delegate to the rest of the stack. The cursor is
//! shared, so calling `handle` twice resumes from wherever the first call left
//! the cursor, and not calling it at all short-circuits the stack.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

/// Selects and invokes one capability method on an interceptor.
pub type Dispatch<'a, M, I, O> = fn(&M, I, &mut Chain<'a, M, I, O>) -> O;

/// The action run once every interceptor has delegated onward.
pub type Terminal<'a, I, O> = Box<dyn FnMut(I) -> O + 'a>;

/// A single-use cursor over an interceptor stack, ending in a terminal action.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use cache_middleware::chain::Chain;
///
/// struct Tag(&'static str);
///
/// impl Tag {
///     fn wrap(&self, value: String, next: &mut Chain<'_, Tag, String, String>) -> String {
///         format!("{}-{}", self.0, next.handle(value))
///     }
/// }
///
/// let stack = vec![Arc::new(Tag("one")), Arc::new(Tag("two"))];
/// let mut chain = Chain::new(&stack, Tag::wrap, Box::new(|v: String| v + "-suffix"));
///
/// assert_eq!(chain.handle("value".to_string()), "one-two-value-suffix");
/// ```
pub struct Chain<'a, M: ?Sized, I, O> {
    stack: &'a [Arc<M>],
    dispatch: Dispatch<'a, M, I, O>,
    terminal: Terminal<'a, I, O>,
    // Index of the interceptor the next `handle` call dispatches to.
    cursor: usize,
}

impl<'a, M: ?Sized, I, O> Chain<'a, M, I, O> {
    /// Creates a chain positioned at the first interceptor of `stack`.
    pub fn new(
        stack: &'a [Arc<M>],
        dispatch: Dispatch<'a, M, I, O>,
        terminal: Terminal<'a, I, O>,
    ) -> Self {
        Self {
            stack,
            dispatch,
            terminal,
            cursor: 0,
        }
    }

    /// Runs the rest of the chain with `input`.
    ///
    /// If interceptors remain, the current one is invoked with `input` and this
    /// chain as its continuation, after the cursor has moved past it. Once the
    /// stack is exhausted the terminal action receives `input` directly.
    pub fn handle(&mut self, input: I) -> O {
        let stack = self.stack;
        let Some(middleware) = stack.get(self.cursor) else {
            trace!(depth = self.cursor, "running terminal action");
            return (self.terminal)(input);
        };

        trace!(depth = self.cursor, total = stack.len(), "dispatching");
        self.cursor += 1;

        let dispatch = self.dispatch;
        dispatch(middleware, input, self)
    }

    /// Number of interceptors not yet dispatched to.
    pub fn remaining(&self) -> usize {
        self.stack.len().saturating_sub(self.cursor)
    }
}

impl<M: ?Sized, I, O> fmt::Debug for Chain<'_, M, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("len", &self.stack.len())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}
