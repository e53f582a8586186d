//! Ownership authorization guard.
//!
//! Pure decision logic with no side effects: given the acting user (possibly
//! anonymous) and the target blog (possibly unresolved), decide whether a
//! mutation may proceed. Callers translate the decision into their own
//! failure mode; delete treats a missing blog as a no-op while update
//! reports it as not found.

use super::models::Blog;
use crate::user::User;

/// Outcome of evaluating a mutation against a blog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipDecision {
    /// The acting user owns the blog; the mutation may proceed.
    Allowed,
    /// The target blog does not exist.
    MissingBlog,
    /// No acting user: anonymous callers are rejected before ownership is
    /// even considered.
    NoActingUser,
    /// Authenticated, but not the owner.
    NotOwner,
}

/// Decide whether `actor` may mutate `blog`.
pub fn evaluate(actor: Option<&User>, blog: Option<&Blog>) -> OwnershipDecision {
    let Some(blog) = blog else {
        return OwnershipDecision::MissingBlog;
    };
    let Some(actor) = actor else {
        return OwnershipDecision::NoActingUser;
    };
    if actor.id != blog.user_id {
        return OwnershipDecision::NotOwner;
    }
    OwnershipDecision::Allowed
}
