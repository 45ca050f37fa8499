//! Property test strategies for Trellis operations
//!
//! Strategies produce indices into a seeded user list rather than ids, so a
//! test can map them onto whatever fixtures it created.

use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

/// A follow request between two users, by index. `actor == target` is
/// allowed and should be rejected by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowOp {
    /// Index of the acting user
    pub actor: usize,
    /// Index of the followed user
    pub target: usize,
}

/// Strategy for a single follow request among `users` users
pub fn arb_follow_op(users: usize) -> impl Strategy<Value = FollowOp> {
    (0..users, 0..users).prop_map(|(actor, target)| FollowOp { actor, target })
}

/// Strategy for a sequence of up to `max_len` follow requests
pub fn arb_follow_ops(users: usize, max_len: usize) -> impl Strategy<Value = Vec<FollowOp>> {
    prop::collection::vec(arb_follow_op(users), 0..=max_len)
}

/// Strategy for comment text: printable words, possibly padded with
/// whitespace, never blank after trimming
pub fn arb_comment_text() -> impl Strategy<Value = String> {
    ("[ \t]{0,3}", "[a-zA-Z0-9][a-zA-Z0-9 ,.!?]{0,60}", "[ \t\n]{0,3}")
        .prop_map(|(lead, body, tail)| format!("{lead}{body}{tail}"))
}

/// Strategy for text that is empty once trimmed
pub fn arb_blank_text() -> impl Strategy<Value = String> {
    "[ \t\n\r]{0,8}"
}
