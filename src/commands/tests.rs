//! Command scenarios against the in-memory tracker.

use rstest::{fixture, rstest};

use super::{CommandGate, CommandName, CommandOutcome, CommentContext};
use crate::error::BotError;
use crate::github::test_support::{InMemoryTracker, PullRequestSeed};
use crate::github::{LockReason, PullRequestState, ReviewState};
use crate::labels::{APPROVED, HOLD, LGTM, LabelSet};
use crate::replies::Replies;

const ROBOT: &str = "github-ci-robot";
const OWNERS: &str = "reviewers:\n- rita\napprovers:\n- alice\n";

#[fixture]
fn replies() -> Replies {
    Replies::new().expect("templates should compile")
}

#[fixture]
fn tracker() -> InMemoryTracker {
    let tracker = InMemoryTracker::new(ROBOT);
    tracker.add_pull_request(PullRequestSeed::new(7).authored_by("author"));
    tracker.set_owners(OWNERS);
    tracker.add_collaborators(&["colin"]);
    tracker.add_org_members(&["olga"]);
    tracker
}

fn comment(commenter: &str, body: &str) -> CommentContext {
    CommentContext {
        issue: Some(7),
        commenter: commenter.to_owned(),
        author: Some("author".to_owned()),
        body: body.to_owned(),
    }
}

fn labels(names: &[&str]) -> LabelSet {
    names.iter().copied().collect()
}

async fn run(
    tracker: &InMemoryTracker,
    replies: &Replies,
    ctx: &CommentContext,
) -> Result<Vec<CommandOutcome>, BotError> {
    CommandGate::new(tracker, replies, ROBOT).run(ctx).await
}

#[rstest]
#[tokio::test]
async fn reviewer_adds_lgtm(tracker: InMemoryTracker, replies: Replies) {
    let outcomes = run(&tracker, &replies, &comment("rita", "/lgtm"))
        .await
        .expect("lgtm should succeed");

    assert!(matches!(
        outcomes.as_slice(),
        [CommandOutcome::Applied {
            command: CommandName::Lgtm,
            ..
        }]
    ));
    assert_eq!(tracker.labels_of(7), labels(&[LGTM]));
}

#[rstest]
#[tokio::test]
async fn author_cannot_lgtm_own_pull_request(tracker: InMemoryTracker, replies: Replies) {
    let outcomes = run(&tracker, &replies, &comment("author", "/lgtm"))
        .await
        .expect("self-action is not an error");

    assert_eq!(
        outcomes,
        [CommandOutcome::SelfActionRejected {
            command: CommandName::Lgtm
        }]
    );
    assert!(tracker.labels_of(7).is_empty());
    let posted = tracker.bot_comments_on(7);
    assert_eq!(posted.len(), 1);
    assert!(posted.first().is_some_and(|body| {
        body.starts_with("You are the author and cannot comment `/lgtm [cancel]`")
    }));
}

#[rstest]
#[tokio::test]
async fn lgtm_cancel_removes_only_lgtm(replies: Replies) {
    let tracker = InMemoryTracker::new(ROBOT);
    tracker.add_pull_request(PullRequestSeed::new(7).labelled(&[LGTM, APPROVED]));
    tracker.set_owners(OWNERS);

    run(&tracker, &replies, &comment("rita", "/lgtm cancel"))
        .await
        .expect("cancel should succeed");

    assert_eq!(tracker.labels_of(7), labels(&[APPROVED]));
    assert!(tracker.pull_request_fetches().is_empty());
    assert!(tracker.merges().is_empty());
}

#[rstest]
#[tokio::test]
async fn owners_file_overrides_collaborator_for_lgtm(tracker: InMemoryTracker, replies: Replies) {
    let error = run(&tracker, &replies, &comment("colin", "/lgtm"))
        .await
        .expect_err("colin is not a listed reviewer");

    assert!(matches!(
        &error,
        BotError::Unauthorized { user, command, .. } if user == "colin" && command == "lgtm"
    ));
    assert!(tracker.labels_of(7).is_empty());
    assert!(
        tracker
            .bot_comments_on(7)
            .iter()
            .any(|body| body.starts_with("Cannot run `/lgtm` because colin is not included"))
    );
}

#[rstest]
#[tokio::test]
async fn approver_submits_review_and_label(tracker: InMemoryTracker, replies: Replies) {
    run(&tracker, &replies, &comment("alice", "/approve\nShip it"))
        .await
        .expect("approve should succeed");

    assert_eq!(tracker.labels_of(7), labels(&[APPROVED]));
    let reviews = tracker.reviews_of(7);
    assert!(matches!(
        reviews.as_slice(),
        [(_, author, ReviewState::Approved, None)] if author == ROBOT
    ));
    let body = tracker.latest_review_body(7).unwrap_or_default();
    assert!(body.contains("approved by: @alice"));
    assert!(body.contains("> Ship it"));
}

#[rstest]
#[tokio::test]
async fn approve_cancel_dismisses_the_bots_latest_approval(replies: Replies) {
    let tracker = InMemoryTracker::new(ROBOT);
    tracker.add_pull_request(PullRequestSeed::new(7).labelled(&[APPROVED]));
    tracker.set_owners(OWNERS);
    tracker.add_review(7, ROBOT, ReviewState::Approved);
    tracker.add_review(7, "bob", ReviewState::Approved);

    run(&tracker, &replies, &comment("alice", "/approve cancel"))
        .await
        .expect("cancel should succeed");

    assert!(tracker.labels_of(7).is_empty());
    let reviews = tracker.reviews_of(7);
    assert!(matches!(
        reviews.as_slice(),
        [
            (1, _, ReviewState::Dismissed, Some(message)),
            (2, _, ReviewState::Approved, None),
        ] if message.contains("dismissed by: @alice")
    ));
}

#[rstest]
#[tokio::test]
async fn approve_cancel_without_bot_review_fails(tracker: InMemoryTracker, replies: Replies) {
    let error = run(&tracker, &replies, &comment("alice", "/approve cancel"))
        .await
        .expect_err("nothing to dismiss");

    assert_eq!(
        error,
        BotError::NoReviewToDismiss {
            number: 7,
            robot: ROBOT.to_owned(),
        }
    );
}

#[rstest]
#[tokio::test]
async fn quiet_denial_reports_outcome(tracker: InMemoryTracker, replies: Replies) {
    let outcomes = run(&tracker, &replies, &comment("mallory", "/close"))
        .await
        .expect("close denials are quiet");

    assert!(matches!(
        outcomes.as_slice(),
        [CommandOutcome::Denied { command: CommandName::Close, user, .. }] if user == "mallory"
    ));
    assert_eq!(tracker.state_of(7), Some(PullRequestState::Open));
    assert!(
        tracker
            .bot_comments_on(7)
            .iter()
            .any(|body| body.starts_with("Cannot run `/close`"))
    );
}

#[rstest]
#[tokio::test]
async fn collaborator_closes_and_reopens(tracker: InMemoryTracker, replies: Replies) {
    run(&tracker, &replies, &comment("colin", "/close"))
        .await
        .expect("close should succeed");
    assert_eq!(tracker.state_of(7), Some(PullRequestState::Closed));

    run(&tracker, &replies, &comment("rita", "/reopen"))
        .await
        .expect("reopen should succeed");
    assert_eq!(tracker.state_of(7), Some(PullRequestState::Open));
}

#[rstest]
#[tokio::test]
async fn bot_comments_are_ignored(tracker: InMemoryTracker, replies: Replies) {
    let outcomes = run(&tracker, &replies, &comment(ROBOT, "/lgtm"))
        .await
        .expect("bot comments are skipped");

    assert!(outcomes.is_empty());
    assert!(tracker.labels_of(7).is_empty());
}

#[rstest]
#[case::with_commands("/hold", true)]
#[case::without_commands("thanks!", false)]
#[tokio::test]
async fn missing_issue_number_only_matters_for_commands(
    tracker: InMemoryTracker,
    replies: Replies,
    #[case] body: &str,
    #[case] fails: bool,
) {
    let ctx = CommentContext {
        issue: None,
        ..comment("olga", body)
    };

    let result = run(&tracker, &replies, &ctx).await;

    assert_eq!(
        result.is_err_and(|error| error
            == BotError::MissingIdentifier {
                field: "issue number"
            }),
        fails
    );
}

#[rstest]
#[tokio::test]
async fn prior_commenter_may_hold(tracker: InMemoryTracker, replies: Replies) {
    tracker.add_comment(7, "pat", "I found a problem");

    run(&tracker, &replies, &comment("pat", "/hold"))
        .await
        .expect("hold should succeed");
    assert_eq!(tracker.labels_of(7), labels(&[HOLD]));

    run(&tracker, &replies, &comment("pat", "/hold cancel"))
        .await
        .expect("hold cancel should succeed");
    assert!(tracker.labels_of(7).is_empty());
}

#[rstest]
#[tokio::test]
async fn remove_drops_only_present_labels(replies: Replies) {
    let tracker = InMemoryTracker::new(ROBOT);
    tracker.add_pull_request(PullRequestSeed::new(7).labelled(&["bug", "docs"]));
    tracker.set_owners(OWNERS);

    run(&tracker, &replies, &comment("rita", "/remove bug wontfix"))
        .await
        .expect("remove should succeed");
    assert_eq!(tracker.labels_of(7), labels(&["docs"]));

    let error = run(&tracker, &replies, &comment("rita", "/remove wontfix"))
        .await
        .expect_err("no listed label is present");
    assert!(matches!(error, BotError::CommandArguments { .. }));
}

#[rstest]
#[tokio::test]
async fn retitle_without_title_is_a_no_op(tracker: InMemoryTracker, replies: Replies) {
    let outcomes = run(&tracker, &replies, &comment("mallory", "/retitle"))
        .await
        .expect("empty retitle is not an error");

    assert!(matches!(
        outcomes.as_slice(),
        [CommandOutcome::NoOp {
            command: CommandName::Retitle,
            ..
        }]
    ));
    assert!(tracker.bot_comments_on(7).is_empty());
}

#[rstest]
#[tokio::test]
async fn retitle_joins_arguments(tracker: InMemoryTracker, replies: Replies) {
    run(&tracker, &replies, &comment("colin", "/retitle Better   parser errors"))
        .await
        .expect("retitle should succeed");

    assert_eq!(tracker.title_of(7).as_deref(), Some("Better parser errors"));
}

#[rstest]
#[tokio::test]
async fn milestone_matches_exact_title(tracker: InMemoryTracker, replies: Replies) {
    tracker.add_milestone(3, "v1.0");
    tracker.add_milestone(4, "v1.0 rc");

    run(&tracker, &replies, &comment("colin", "/milestone v1.0 rc"))
        .await
        .expect("milestone should be set");
    assert_eq!(tracker.milestone_of(7), Some(4));

    run(&tracker, &replies, &comment("colin", "/milestone cancel"))
        .await
        .expect("milestone should be cleared");
    assert_eq!(tracker.milestone_of(7), None);
}

#[rstest]
#[case::unknown_title("/milestone v2")]
#[case::no_title("/milestone")]
#[tokio::test]
async fn milestone_rejects_bad_titles(
    tracker: InMemoryTracker,
    replies: Replies,
    #[case] body: &str,
) {
    tracker.add_milestone(3, "v1.0");

    let error = run(&tracker, &replies, &comment("colin", body))
        .await
        .expect_err("milestone argument should be rejected");

    assert!(matches!(error, BotError::CommandArguments { .. }));
    assert_eq!(tracker.milestone_of(7), None);
}

#[rstest]
#[tokio::test]
async fn approver_locks_with_reason(tracker: InMemoryTracker, replies: Replies) {
    run(&tracker, &replies, &comment("alice", "/lock too-heated"))
        .await
        .expect("lock should succeed");

    assert_eq!(tracker.lock_of(7), Some(Some(LockReason::TooHeated)));
}

#[rstest]
#[tokio::test]
async fn resolved_conversations_lock_without_reason(tracker: InMemoryTracker, replies: Replies) {
    run(&tracker, &replies, &comment("alice", "/lock resolved"))
        .await
        .expect("lock should succeed");

    assert_eq!(tracker.lock_of(7), Some(None));
}

#[rstest]
#[tokio::test]
async fn outsider_cannot_lock(tracker: InMemoryTracker, replies: Replies) {
    let error = run(&tracker, &replies, &comment("mallory", "/lock"))
        .await
        .expect_err("lock denials surface");

    assert!(matches!(error, BotError::Unauthorized { .. }));
    assert_eq!(tracker.lock_of(7), None);
}

#[rstest]
#[tokio::test]
async fn cc_requests_only_authorized_targets(tracker: InMemoryTracker, replies: Replies) {
    run(&tracker, &replies, &comment("mallory", "/cc @olga mallory @olga"))
        .await
        .expect("cc should succeed");

    assert_eq!(tracker.requested_reviewers_of(7), ["olga"]);
}

#[rstest]
#[tokio::test]
async fn cc_without_authorized_targets_fails(tracker: InMemoryTracker, replies: Replies) {
    let error = run(&tracker, &replies, &comment("colin", "/cc mallory"))
        .await
        .expect_err("nobody may be requested");

    assert_eq!(error, BotError::NoAuthorizedUsers);
    assert!(tracker.requested_reviewers_of(7).is_empty());
    assert_eq!(tracker.bot_comments_on(7).len(), 1);
}

#[rstest]
#[case::collaborator("colin", true)]
#[case::outsider("mallory", false)]
#[tokio::test]
async fn bare_cc_requests_the_commenter(
    tracker: InMemoryTracker,
    replies: Replies,
    #[case] commenter: &str,
    #[case] granted: bool,
) {
    let result = run(&tracker, &replies, &comment(commenter, "/cc")).await;

    assert_eq!(result.is_ok(), granted);
    assert_eq!(
        tracker.requested_reviewers_of(7).contains(&commenter.to_owned()),
        granted
    );
}

#[rstest]
#[tokio::test]
async fn uncc_withdraws_the_commenter(tracker: InMemoryTracker, replies: Replies) {
    tracker.request_review(7, &["colin", "olga"]);

    run(&tracker, &replies, &comment("colin", "/uncc"))
        .await
        .expect("uncc should succeed");

    assert_eq!(tracker.requested_reviewers_of(7), ["olga"]);
}

#[rstest]
#[tokio::test]
async fn uncc_of_others_needs_the_broad_policy(tracker: InMemoryTracker, replies: Replies) {
    tracker.request_review(7, &["olga"]);

    let outcomes = run(&tracker, &replies, &comment("mallory", "/uncc @olga"))
        .await
        .expect("uncc denials are quiet");

    assert!(matches!(
        outcomes.as_slice(),
        [CommandOutcome::Denied {
            command: CommandName::Uncc,
            ..
        }]
    ));
    assert_eq!(tracker.requested_reviewers_of(7), ["olga"]);
}

#[rstest]
#[tokio::test]
async fn anyone_may_unassign_themselves(tracker: InMemoryTracker, replies: Replies) {
    tracker.assign(7, &["mallory", "olga"]);

    run(&tracker, &replies, &comment("mallory", "/unassign"))
        .await
        .expect("self-unassign needs no authorization");
    assert_eq!(tracker.assignees_of(7), ["olga"]);

    run(&tracker, &replies, &comment("olga", "/unassign olga"))
        .await
        .expect("org member may unassign");
    assert!(tracker.assignees_of(7).is_empty());
}

#[rstest]
#[tokio::test]
async fn failed_reply_does_not_mask_the_denial(tracker: InMemoryTracker, replies: Replies) {
    tracker.fail_comment_posts();

    let error = run(&tracker, &replies, &comment("mallory", "/lgtm"))
        .await
        .expect_err("denial should still surface");

    assert!(matches!(error, BotError::Unauthorized { .. }));
}

#[rstest]
#[tokio::test]
async fn commands_run_in_order_and_stop_at_the_first_error(
    tracker: InMemoryTracker,
    replies: Replies,
) {
    let outcomes = run(&tracker, &replies, &comment("colin", "/retitle Better\n/close"))
        .await
        .expect("both commands should run");
    assert_eq!(outcomes.len(), 2);
    assert_eq!(tracker.title_of(7).as_deref(), Some("Better"));
    assert_eq!(tracker.state_of(7), Some(PullRequestState::Closed));

    let result = run(&tracker, &replies, &comment("mallory", "/lgtm\n/hold")).await;
    assert!(result.is_err());
    assert!(!tracker.labels_of(7).contains(HOLD));
}

const LABEL_CATALOGUE: &str = "kind:\n- bug\n- cleanup\narea:\n- docs\npriority: [urgent]\n";

#[rstest]
#[case::kind("/kind bug typo cleanup", &["kind/bug", "kind/cleanup"])]
#[case::area("/area docs", &["area/docs"])]
#[case::priority("/priority urgent urgent", &["priority/urgent"])]
#[tokio::test]
async fn catalogue_labels_are_prefixed(
    tracker: InMemoryTracker,
    replies: Replies,
    #[case] body: &str,
    #[case] expected: &[&str],
) {
    tracker.set_label_catalogue(LABEL_CATALOGUE);

    run(&tracker, &replies, &comment("olga", body))
        .await
        .expect("catalogue labels should apply");

    assert_eq!(tracker.labels_of(7), labels(expected));
}

#[rstest]
#[case::unlisted_name(Some(LABEL_CATALOGUE), "/kind feature")]
#[case::no_arguments(Some(LABEL_CATALOGUE), "/area")]
#[case::no_catalogue(None, "/kind bug")]
#[tokio::test]
async fn catalogue_labels_need_a_listed_name(
    tracker: InMemoryTracker,
    replies: Replies,
    #[case] catalogue: Option<&str>,
    #[case] body: &str,
) {
    if let Some(raw) = catalogue {
        tracker.set_label_catalogue(raw);
    }

    let error = run(&tracker, &replies, &comment("colin", body))
        .await
        .expect_err("nothing listed should be an argument error");

    assert!(matches!(error, BotError::CommandArguments { .. }));
    assert!(tracker.labels_of(7).is_empty());
}

#[rstest]
#[tokio::test]
async fn outsider_cannot_apply_catalogue_labels(tracker: InMemoryTracker, replies: Replies) {
    tracker.set_label_catalogue(LABEL_CATALOGUE);

    let error = run(&tracker, &replies, &comment("mallory", "/kind bug"))
        .await
        .expect_err("denial should surface");

    assert!(matches!(error, BotError::Unauthorized { .. }));
    assert!(tracker.labels_of(7).is_empty());
}
