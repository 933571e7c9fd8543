//! Parsing of the repository `OWNERS` document.
//!
//! The document is a YAML mapping from role name to either a single login
//! or a list of logins:
//!
//! ```yaml
//! approvers:
//!   - alice
//! reviewers: bob
//! ```
//!
//! Each role is normalised into [`RoleMembers`] at parse time, so lookups
//! never re-inspect raw YAML.

use std::collections::BTreeMap;
use std::fmt;

use serde_yaml::Value;

use crate::error::BotError;

/// Roles the bot reads from the owners document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// May `/lgtm`.
    Reviewers,
    /// May `/approve`.
    Approvers,
}

impl Role {
    /// Key of the role in the owners document.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reviewers => "reviewers",
            Self::Approvers => "approvers",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Members of one role, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleMembers {
    /// The role value was a single login.
    Single(String),
    /// The role value was a list of logins.
    Many(Vec<String>),
}

impl RoleMembers {
    /// Whether `user` is a member, ignoring case on both sides.
    #[must_use]
    pub fn contains(&self, user: &str) -> bool {
        match self {
            Self::Single(member) => member.eq_ignore_ascii_case(user),
            Self::Many(members) => members.iter().any(|member| member.eq_ignore_ascii_case(user)),
        }
    }
}

/// Parsed owners document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnersDocument {
    roles: BTreeMap<String, RoleMembers>,
}

impl OwnersDocument {
    /// Parses raw `OWNERS` content.
    ///
    /// An empty document lists no roles.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::MalformedOwners`] when the content is not valid
    /// YAML, is not a mapping, has a non-string key, or has a role value that
    /// is neither a string nor a list of strings.
    pub fn parse(raw: &str) -> Result<Self, BotError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(raw).map_err(|error| BotError::MalformedOwners {
            message: error.to_string(),
        })?;

        let mapping = match value {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(BotError::MalformedOwners {
                    message: format!("expected a mapping of roles, found {}", kind(&other)),
                });
            }
        };

        let mut roles = BTreeMap::new();
        for (key, value) in mapping {
            let role = match key {
                Value::String(role) => role,
                other => {
                    return Err(BotError::MalformedOwners {
                        message: format!("role names must be strings, found {}", kind(&other)),
                    });
                }
            };
            let members = normalise_members(&role, value)?;
            roles.insert(role, members);
        }
        Ok(Self { roles })
    }

    /// Members of `role`, or `None` when the document does not list it.
    #[must_use]
    pub fn members(&self, role: Role) -> Option<&RoleMembers> {
        self.roles.get(role.as_str())
    }

    /// Whether the document lists `role` at all.
    #[must_use]
    pub fn lists(&self, role: Role) -> bool {
        self.members(role).is_some()
    }
}

/// True iff `user` appears in `document`'s list for `role`.
#[must_use]
pub fn role_membership(document: &OwnersDocument, role: Role, user: &str) -> bool {
    document
        .members(role)
        .is_some_and(|members| members.contains(user))
}

fn normalise_members(role: &str, value: Value) -> Result<RoleMembers, BotError> {
    match value {
        Value::String(member) => Ok(RoleMembers::Single(member)),
        // `approvers:` with nothing after it.
        Value::Null => Ok(RoleMembers::Many(Vec::new())),
        Value::Sequence(entries) => entries
            .into_iter()
            .map(|entry| match entry {
                Value::String(member) => Ok(member),
                other => Err(BotError::MalformedOwners {
                    message: format!("`{role}` entries must be strings, found {}", kind(&other)),
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(RoleMembers::Many),
        other => Err(BotError::MalformedOwners {
            message: format!(
                "`{role}` must be a login or a list of logins, found {}",
                kind(&other)
            ),
        }),
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{OwnersDocument, Role, RoleMembers, role_membership};
    use crate::error::BotError;

    #[rstest]
    fn parses_lists_and_single_logins() {
        let document = OwnersDocument::parse("approvers:\n  - alice\n  - Carol\nreviewers: bob\n")
            .expect("document should parse");

        assert_eq!(
            document.members(Role::Approvers),
            Some(&RoleMembers::Many(vec!["alice".to_owned(), "Carol".to_owned()]))
        );
        assert_eq!(
            document.members(Role::Reviewers),
            Some(&RoleMembers::Single("bob".to_owned()))
        );
    }

    #[rstest]
    #[case::exact("alice", true)]
    #[case::upper_user("ALICE", true)]
    #[case::upper_entry("carol", true)]
    #[case::absent("dave", false)]
    fn membership_ignores_case(#[case] user: &str, #[case] expected: bool) {
        let document =
            OwnersDocument::parse("approvers: [alice, Carol]").expect("document should parse");
        assert_eq!(role_membership(&document, Role::Approvers, user), expected);
    }

    #[rstest]
    fn unlisted_role_grants_nobody() {
        let document = OwnersDocument::parse("approvers: [alice]").expect("document should parse");
        assert!(!document.lists(Role::Reviewers));
        assert!(!role_membership(&document, Role::Reviewers, "alice"));
    }

    #[rstest]
    fn empty_document_lists_no_roles() {
        let document = OwnersDocument::parse("").expect("empty document should parse");
        assert_eq!(document, OwnersDocument::default());
    }

    #[rstest]
    #[case::scalar("just a string")]
    #[case::list("- alice\n- bob\n")]
    #[case::numeric_role("approvers: 42")]
    #[case::nested_role("approvers:\n  team: [alice]\n")]
    #[case::mixed_list("approvers: [alice, 7]")]
    #[case::invalid_yaml("approvers: [alice")]
    fn rejects_malformed_documents(#[case] raw: &str) {
        let result = OwnersDocument::parse(raw);
        assert!(
            matches!(result, Err(BotError::MalformedOwners { .. })),
            "expected MalformedOwners, got {result:?}"
        );
    }
}
