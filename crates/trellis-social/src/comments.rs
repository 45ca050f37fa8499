//! Comment Ledger
//!
//! Comments are appended to the post's sequence in insertion order and read
//! back newest-first. Equal timestamps keep their insertion order.

use tracing::info;
use trellis_core::effects::SocialEffects;
use trellis_core::{Comment, CommentId, PostId, UserId};

use crate::error::{SocialError, SocialResult};

/// Sort comments by `created_at` descending.
///
/// The sort is stable, so comments sharing a timestamp stay in the order
/// they were inserted.
pub fn newest_first(mut comments: Vec<Comment>) -> Vec<Comment> {
    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    comments
}

/// Append/remove comments on posts.
#[derive(Debug, Clone, Copy)]
pub struct CommentLedger {
    max_length: usize,
}

impl CommentLedger {
    /// Create a ledger accepting comments up to `max_length` characters
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Append a comment by `author` to `post`.
    pub async fn add_comment<E>(
        &self,
        effects: &E,
        post: PostId,
        author: UserId,
        text: &str,
    ) -> SocialResult<Comment>
    where
        E: SocialEffects + ?Sized,
    {
        let text = text.trim();
        if text.is_empty() {
            return Err(SocialError::validation("Comment text cannot be empty"));
        }
        let length = text.chars().count();
        if length > self.max_length {
            return Err(SocialError::validation(format!(
                "Comment text is {length} characters, the limit is {}",
                self.max_length
            )));
        }
        if !effects.user_exists(author).await? {
            return Err(SocialError::not_found("user", author));
        }

        let comment = Comment {
            id: CommentId::from_uuid(effects.random_uuid().await),
            post,
            author,
            text: text.to_string(),
            created_at: effects.physical_time().await?,
        };

        if !effects.append_comment(post, comment.clone()).await? {
            return Err(SocialError::not_found("post", post));
        }
        info!(%post, %author, comment = %comment.id, "comment added");
        Ok(comment)
    }

    /// Hard-delete a comment. Only its author may remove it.
    pub async fn remove_comment<E>(
        &self,
        effects: &E,
        post: PostId,
        comment: CommentId,
        requester: UserId,
    ) -> SocialResult<Comment>
    where
        E: SocialEffects + ?Sized,
    {
        let existing = effects
            .get_post(post)
            .await?
            .ok_or_else(|| SocialError::not_found("post", post))?
            .comment(&comment)
            .cloned()
            .ok_or_else(|| SocialError::not_found("comment", comment))?;

        if existing.author != requester {
            return Err(SocialError::unauthorized(
                "only the author can remove a comment",
            ));
        }

        // Another request by the same author may have removed it meanwhile
        let removed = effects
            .remove_comment(post, comment)
            .await?
            .ok_or_else(|| SocialError::not_found("comment", comment))?;
        info!(%post, %requester, %comment, "comment removed");
        Ok(removed)
    }

    /// Comments on `post`, newest first.
    pub async fn comments<E>(&self, effects: &E, post: PostId) -> SocialResult<Vec<Comment>>
    where
        E: SocialEffects + ?Sized,
    {
        let post = effects
            .get_post(post)
            .await?
            .ok_or_else(|| SocialError::not_found("post", post))?;
        Ok(newest_first(post.comments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::PhysicalTime;

    fn comment(seed: u8, ts_ms: u64) -> Comment {
        Comment {
            id: CommentId::new_from_entropy([seed; 32]),
            post: PostId::new_from_entropy([0u8; 32]),
            author: UserId::new_from_entropy([1u8; 32]),
            text: format!("comment {seed}"),
            created_at: PhysicalTime::from_ms(ts_ms),
        }
    }

    #[test]
    fn test_newest_first_orders_by_time() {
        let sorted = newest_first(vec![comment(1, 10), comment(2, 20), comment(3, 30)]);
        let texts: Vec<_> = sorted.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["comment 3", "comment 2", "comment 1"]);
    }

    #[test]
    fn test_equal_timestamps_keep_insertion_order() {
        let sorted = newest_first(vec![comment(1, 10), comment(2, 10), comment(3, 5)]);
        let texts: Vec<_> = sorted.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["comment 1", "comment 2", "comment 3"]);
    }
}
