//! Tests for operation selection and validation.

use rstest::rstest;

use super::helpers::load_flags;
use crate::BotConfig;
use crate::config::OperationMode;
use crate::github::TrackerError;

#[rstest]
#[case::nothing(BotConfig::default(), OperationMode::Unspecified)]
#[case::cron(
    BotConfig { cron_merge: true, ..Default::default() },
    OperationMode::CronMerge
)]
#[case::synchronize(
    BotConfig { pull_request_updated: true, issue: Some(4), ..Default::default() },
    OperationMode::PullRequestUpdated
)]
#[case::comment(
    BotConfig { comment_body: Some("/lgtm".to_owned()), ..Default::default() },
    OperationMode::Comment
)]
#[case::cron_wins(
    BotConfig { cron_merge: true, comment_body: Some("/lgtm".to_owned()), ..Default::default() },
    OperationMode::CronMerge
)]
fn selects_operation(#[case] config: BotConfig, #[case] expected: OperationMode) {
    assert_eq!(config.operation_mode(), expected);
}

#[rstest]
fn issue_alone_selects_nothing() {
    let config = BotConfig {
        issue: Some(4),
        ..Default::default()
    };

    assert_eq!(
        config.operation_mode(),
        OperationMode::Unspecified,
        "an issue number without an event flag should not pick an operation"
    );
}

#[rstest]
fn validates_single_operation() {
    let config = BotConfig {
        cron_merge: true,
        ..Default::default()
    };

    assert!(config.validate().is_ok(), "one operation should validate");
}

#[rstest]
fn rejects_conflicting_operations() {
    let config = BotConfig {
        cron_merge: true,
        pull_request_updated: true,
        ..Default::default()
    };

    let result = config.validate();

    assert!(
        matches!(result, Err(TrackerError::Configuration { .. })),
        "should reject conflicting operations, got {result:?}"
    );
}

#[rstest]
fn rejects_page_zero() {
    let config = BotConfig {
        cron_merge: true,
        start_page: 0,
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(TrackerError::Configuration { .. })
    ));
}

#[rstest]
#[case::cron_long(&["--cron-merge"], OperationMode::CronMerge)]
#[case::cron_short(&["-c"], OperationMode::CronMerge)]
#[case::synchronize_long(&["--pull-request-updated", "--issue", "9"], OperationMode::PullRequestUpdated)]
#[case::synchronize_short(&["-p", "-i", "9"], OperationMode::PullRequestUpdated)]
#[case::comment_long(&["--issue", "9", "--comment-body", "/hold"], OperationMode::Comment)]
#[case::comment_short(&["-i", "9", "-b", "/hold"], OperationMode::Comment)]
fn selectors_parse_from_flags(#[case] flags: &[&str], #[case] expected: OperationMode) {
    let config = load_flags(flags);

    assert_eq!(config.operation_mode(), expected, "flags: {flags:?}");
    assert!(config.validate().is_ok(), "flags {flags:?} should validate");
}

#[rstest]
#[case::long(&[
    "--issue", "7",
    "--comment-body", "/lgtm",
    "--commenter", "alice",
    "--issue-author", "bob",
    "--start-page", "3",
    "--disable-pacing",
])]
#[case::short(&["-i", "7", "-b", "/lgtm", "-u", "alice", "-A", "bob", "--start-page", "3", "--disable-pacing"])]
fn comment_event_fields_parse_from_flags(#[case] flags: &[&str]) {
    let config = load_flags(flags);

    assert_eq!(config.issue, Some(7));
    assert_eq!(config.comment_body.as_deref(), Some("/lgtm"));
    assert_eq!(config.commenter.as_deref(), Some("alice"));
    assert_eq!(config.issue_author.as_deref(), Some("bob"));
    assert_eq!(config.start_page, 3);
    assert!(config.disable_pacing, "--disable-pacing should switch pacing off");
}
