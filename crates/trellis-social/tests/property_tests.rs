//! Property tests for graph and comment invariants

use std::sync::Arc;

use proptest::prelude::*;
use trellis_social::{FollowDirection, SocialConfig, SocialEngine, SocialError};
use trellis_testkit::strategies::{arb_blank_text, arb_comment_text, arb_follow_ops};
use trellis_testkit::{check_follow_symmetry, seed_post, seed_users, test_effects_deterministic};

const USERS: u8 = 5;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any sequence of follow toggles leaves the graph symmetric, and each
    /// edge's final state matches the parity of its toggle count.
    #[test]
    fn prop_follow_sequences_keep_symmetry(ops in arb_follow_ops(usize::from(USERS), 40)) {
        let outcome: Result<(), TestCaseError> = runtime().block_on(async {
            let effects = test_effects_deterministic(1, 0);
            let users = seed_users(&effects, USERS).await;
            let ids: Vec<_> = users.iter().map(|u| u.id).collect();
            let engine = SocialEngine::new(Arc::new(effects), SocialConfig::default());

            let mut toggles = std::collections::HashMap::new();
            for op in &ops {
                let (actor, target) = (ids[op.actor], ids[op.target]);
                match engine.follow(actor, target).await {
                    Ok(result) => {
                        let count = toggles.entry((actor, target)).or_insert(0usize);
                        *count += 1;
                        let expected = if *count % 2 == 1 {
                            FollowDirection::Followed
                        } else {
                            FollowDirection::Unfollowed
                        };
                        prop_assert_eq!(result.direction, expected);
                    }
                    Err(SocialError::SelfReference { .. }) => prop_assert_eq!(actor, target),
                    Err(other) => prop_assert!(false, "unexpected error: {}", other),
                }
            }

            let symmetry = check_follow_symmetry(engine.effects(), &ids).await;
            prop_assert!(symmetry.is_ok(), "{:?}", symmetry);

            for (&(actor, target), &count) in &toggles {
                let profile = engine.profile(actor).await.unwrap();
                let follows = profile.following.iter().any(|u| u.id == target);
                prop_assert_eq!(follows, count % 2 == 1);
            }
            Ok(())
        });
        outcome?;
    }

    /// Stored comment text is the trimmed input; blank input is rejected.
    #[test]
    fn prop_comment_text_is_trimmed(text in arb_comment_text(), blank in arb_blank_text()) {
        let outcome: Result<(), TestCaseError> = runtime().block_on(async {
            let effects = test_effects_deterministic(2, 0);
            let users = seed_users(&effects, 1).await;
            let post = seed_post(&effects, 50, users[0].id, "prop").await;
            let engine = SocialEngine::new(Arc::new(effects), SocialConfig::default());

            let comment = engine.comment(post.id, users[0].id, &text).await.unwrap();
            prop_assert_eq!(comment.text.as_str(), text.trim());

            let rejected = engine.comment(post.id, users[0].id, &blank).await;
            prop_assert!(
                matches!(rejected, Err(SocialError::Validation { .. })),
                "blank comment accepted"
            );
            Ok(())
        });
        outcome?;
    }
}
