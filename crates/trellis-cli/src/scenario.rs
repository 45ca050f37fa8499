//! Scenario files
//!
//! A scenario seeds users and posts, then replays an ordered list of actions
//! through the engine. Users, posts and comments are referred to by
//! scenario-local handles.
//!
//! ```toml
//! seed = 7
//!
//! [[users]]
//! handle = "ada"
//! username = "ada"
//!
//! [[posts]]
//! handle = "harbour"
//! owner = "bob"
//! caption = "harbour at dusk"
//!
//! [[actions]]
//! kind = "follow"
//! actor = "ada"
//! target = "bob"
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use trellis_core::{CommentId, Notification, PostId, ProfilePatch, SocialEffects, UserId};
use trellis_social::{SocialEngine, SocialError};

/// A user created before any action runs.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSeed {
    /// Scenario-local name
    pub handle: String,
    /// Username; defaults to the handle
    #[serde(default)]
    pub username: Option<String>,
    /// Avatar URL
    #[serde(default)]
    pub avatar: String,
    /// Profile text
    #[serde(default)]
    pub bio: String,
}

/// A post created before any action runs.
#[derive(Debug, Clone, Deserialize)]
pub struct PostSeed {
    /// Scenario-local name
    pub handle: String,
    /// Handle of the owning user
    pub owner: String,
    /// Caption text
    #[serde(default)]
    pub caption: String,
}

/// One step of a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Toggle a follow edge
    Follow { actor: String, target: String },
    /// Toggle a like
    Like { actor: String, post: String },
    /// Toggle a save
    Save { actor: String, post: String },
    /// Add a comment; `label` names it for a later `uncomment`
    Comment {
        actor: String,
        post: String,
        text: String,
        #[serde(default)]
        label: Option<String>,
    },
    /// Remove a labelled comment
    Uncomment {
        actor: String,
        post: String,
        label: String,
    },
    /// Mark `recipient`'s `index`-th newest notification read, as `actor`
    MarkRead {
        actor: String,
        recipient: String,
        #[serde(default)]
        index: usize,
    },
    /// Edit profile fields
    EditProfile {
        actor: String,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        bio: Option<String>,
        #[serde(default)]
        avatar: Option<String>,
    },
    /// Delete a post
    DeletePost { actor: String, post: String },
    /// Search other users by username
    SearchUsers { actor: String, query: String },
}

/// A parsed scenario file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scenario {
    /// Seed for deterministic ids and a simulated clock; real effects
    /// when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Users to register
    #[serde(default)]
    pub users: Vec<UserSeed>,
    /// Posts to publish
    #[serde(default)]
    pub posts: Vec<PostSeed>,
    /// Actions, in order
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Scenario {
    /// Parse a scenario from TOML text
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid scenario file")
    }

    /// Read and parse a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::parse(&text)
    }
}

/// Result of one action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    /// Zero-based position in the action list
    pub step: usize,
    /// The action as written
    pub action: Action,
    /// Payload on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// User-facing reason on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// One entry per action
    pub outcomes: Vec<ActionOutcome>,
    /// Final inbox of every seeded user, newest first
    pub notifications: BTreeMap<String, Vec<Notification>>,
}

impl Report {
    /// Number of failed actions
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_some()).count()
    }
}

/// Scenario handle lookups.
#[derive(Debug, Default)]
struct Handles {
    users: HashMap<String, UserId>,
    posts: HashMap<String, PostId>,
    comments: HashMap<String, CommentId>,
}

impl Handles {
    fn user(&self, handle: &str) -> Result<UserId, SocialError> {
        self.users
            .get(handle)
            .copied()
            .ok_or_else(|| SocialError::validation(format!("unknown user handle '{handle}'")))
    }

    fn post(&self, handle: &str) -> Result<PostId, SocialError> {
        self.posts
            .get(handle)
            .copied()
            .ok_or_else(|| SocialError::validation(format!("unknown post handle '{handle}'")))
    }

    fn comment(&self, label: &str) -> Result<CommentId, SocialError> {
        self.comments
            .get(label)
            .copied()
            .ok_or_else(|| SocialError::validation(format!("unknown comment label '{label}'")))
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, SocialError> {
    serde_json::to_value(value)
        .map_err(|e| SocialError::validation(format!("cannot render result: {e}")))
}

async fn apply<E>(
    engine: &SocialEngine<E>,
    handles: &mut Handles,
    action: &Action,
) -> Result<Value, SocialError>
where
    E: SocialEffects + ?Sized,
{
    match action {
        Action::Follow { actor, target } => {
            let result = engine
                .follow(handles.user(actor)?, handles.user(target)?)
                .await?;
            to_json(&result)
        }
        Action::Like { actor, post } => {
            let result = engine
                .like(handles.post(post)?, handles.user(actor)?)
                .await?;
            to_json(&result)
        }
        Action::Save { actor, post } => {
            let result = engine
                .save(handles.post(post)?, handles.user(actor)?)
                .await?;
            to_json(&result)
        }
        Action::Comment {
            actor,
            post,
            text,
            label,
        } => {
            let comment = engine
                .comment(handles.post(post)?, handles.user(actor)?, text)
                .await?;
            if let Some(label) = label {
                handles.comments.insert(label.clone(), comment.id);
            }
            to_json(&comment)
        }
        Action::Uncomment { actor, post, label } => {
            engine
                .uncomment(
                    handles.post(post)?,
                    handles.comment(label)?,
                    handles.user(actor)?,
                )
                .await?;
            Ok(Value::Null)
        }
        Action::MarkRead {
            actor,
            recipient,
            index,
        } => {
            let inbox = engine.notifications(handles.user(recipient)?).await?;
            let notification = inbox.get(*index).ok_or_else(|| {
                SocialError::validation(format!(
                    "'{recipient}' has {} notifications, no index {index}",
                    inbox.len()
                ))
            })?;
            engine
                .mark_notification_read(notification.id, handles.user(actor)?)
                .await?;
            Ok(Value::Null)
        }
        Action::EditProfile {
            actor,
            username,
            bio,
            avatar,
        } => {
            let patch = ProfilePatch {
                username: username.clone(),
                bio: bio.clone(),
                avatar: avatar.clone(),
            };
            let user = engine.edit_profile(handles.user(actor)?, patch).await?;
            to_json(&user)
        }
        Action::DeletePost { actor, post } => {
            engine
                .delete_post(handles.post(post)?, handles.user(actor)?)
                .await?;
            Ok(Value::Null)
        }
        Action::SearchUsers { actor, query } => {
            let users = engine.search_users(handles.user(actor)?, query).await?;
            to_json(&users)
        }
    }
}

/// Seed the scenario and replay its actions.
///
/// Seeding failures abort the run; action failures are recorded in the
/// report and the run continues.
pub async fn run<E>(engine: &SocialEngine<E>, scenario: &Scenario) -> Result<Report>
where
    E: SocialEffects + ?Sized,
{
    let mut handles = Handles::default();

    for seed in &scenario.users {
        if handles.users.contains_key(&seed.handle) {
            bail!("duplicate user handle '{}'", seed.handle);
        }
        let username = seed.username.as_deref().unwrap_or(&seed.handle);
        let user = engine
            .register_user(username, &seed.avatar, &seed.bio)
            .await
            .map_err(|e| anyhow!("failed to register '{}': {e}", seed.handle))?;
        handles.users.insert(seed.handle.clone(), user.id);
    }

    for seed in &scenario.posts {
        if handles.posts.contains_key(&seed.handle) {
            bail!("duplicate post handle '{}'", seed.handle);
        }
        let owner = handles.user(&seed.owner)?;
        let post = engine
            .create_post(owner, &seed.caption)
            .await
            .map_err(|e| anyhow!("failed to create post '{}': {e}", seed.handle))?;
        handles.posts.insert(seed.handle.clone(), post.id);
    }

    let mut outcomes = Vec::with_capacity(scenario.actions.len());
    for (step, action) in scenario.actions.iter().enumerate() {
        let outcome = match apply(engine, &mut handles, action).await {
            Ok(result) => ActionOutcome {
                step,
                action: action.clone(),
                result: Some(result),
                error: None,
            },
            Err(err) => {
                tracing::warn!(step, error = %err, "scenario action failed");
                ActionOutcome {
                    step,
                    action: action.clone(),
                    result: None,
                    error: Some(err.user_message()),
                }
            }
        };
        outcomes.push(outcome);
    }

    let mut notifications = BTreeMap::new();
    for (handle, id) in &handles.users {
        notifications.insert(handle.clone(), engine.notifications(*id).await?);
    }

    Ok(Report {
        outcomes,
        notifications,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use trellis_core::NotificationKind;
    use trellis_effects::CompositeEffects;
    use trellis_social::SocialConfig;

    const SCENARIO: &str = r#"
seed = 11

[[users]]
handle = "ada"

[[users]]
handle = "bob"
username = "bob_b"

[[posts]]
handle = "harbour"
owner = "bob"
caption = "harbour at dusk"

[[actions]]
kind = "follow"
actor = "ada"
target = "bob"

[[actions]]
kind = "like"
actor = "ada"
post = "harbour"

[[actions]]
kind = "comment"
actor = "ada"
post = "harbour"
text = "  lovely  "
label = "c1"

[[actions]]
kind = "uncomment"
actor = "bob"
post = "harbour"
label = "c1"

[[actions]]
kind = "follow"
actor = "ada"
target = "ada"

[[actions]]
kind = "mark_read"
actor = "bob"
recipient = "bob"
index = 0

[[actions]]
kind = "search_users"
actor = "ada"
query = "BOB"
"#;

    #[tokio::test]
    async fn test_scenario_runs_and_reports_failures() {
        let scenario = Scenario::parse(SCENARIO).unwrap();
        assert_eq!(scenario.seed, Some(11));

        let effects = CompositeEffects::simulated(11, 0, 1_000);
        let engine = SocialEngine::new(Arc::new(effects), SocialConfig::default());
        let report = run(&engine, &scenario).await.unwrap();

        assert_eq!(report.outcomes.len(), 7);
        assert_eq!(report.failures(), 2);
        assert_eq!(
            report.outcomes[0].result.as_ref().unwrap()["direction"],
            "followed"
        );
        assert!(report.outcomes[3].error.as_ref().unwrap().starts_with("Not allowed"));
        assert_eq!(
            report.outcomes[4].error.as_deref(),
            Some("You cannot follow yourself")
        );
        let found = report.outcomes[6].result.as_ref().unwrap();
        assert_eq!(found.as_array().map(Vec::len), Some(1));
        assert_eq!(found[0]["username"], "bob_b");

        let inbox = &report.notifications["bob"];
        let kinds: Vec<_> = inbox.iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NotificationKind::Comment,
                NotificationKind::Like,
                NotificationKind::Follow
            ]
        );
        assert!(inbox[0].read);
        assert!(report.notifications["ada"].is_empty());
    }

    #[test]
    fn test_unknown_action_kind_is_rejected() {
        let text = r#"
[[actions]]
kind = "poke"
actor = "ada"
"#;
        assert!(Scenario::parse(text).is_err());
    }

    #[tokio::test]
    async fn test_unknown_handles_fail_the_action_not_the_run() {
        let scenario = Scenario {
            actions: vec![Action::Follow {
                actor: "nobody".to_string(),
                target: "ghost".to_string(),
            }],
            ..Scenario::default()
        };
        let engine = SocialEngine::new(
            Arc::new(CompositeEffects::simulated(1, 0, 1)),
            SocialConfig::default(),
        );
        let report = run(&engine, &scenario).await.unwrap();
        assert_eq!(report.failures(), 1);
        assert!(report.outcomes[0]
            .error
            .as_ref()
            .unwrap()
            .contains("unknown user handle"));
    }
}
