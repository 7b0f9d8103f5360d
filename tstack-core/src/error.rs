/// Errors reported by transform stack operations
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StackError {
    /// `pop` was called with only the base entry left.
    #[error("cannot pop the base entry of a transform stack")]
    Underflow,

    /// A scoped block popped entries it did not push.
    #[error("scoped block left the stack at depth {found}, expected {expected}")]
    Unbalanced { expected: usize, found: usize },
}
