//! Authorization: who may run which command.
//!
//! Combines the repository's `OWNERS` document with fallback membership
//! signals (organization membership, collaborator status, prior comments)
//! into the named policies the command gate applies.

pub mod owners;
pub mod resolver;
pub mod signals;

pub use owners::{OwnersDocument, Role, RoleMembers, role_membership};
pub use resolver::{AuthSource, AuthorizationDecision, AuthorizationResolver, owners_boolean_in};
pub use signals::{check_collaborator, check_org_member, check_prior_comment};
