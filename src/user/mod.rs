//! User account module.
//!
//! Provides the credential store: account creation, lookup, credential
//! verification, and the owned-blog back-reference list.

mod models;
mod repository;
mod service;

pub use models::{CreateUserRequest, User, UserInfo};
pub use repository::UserRepository;
pub use service::{UserError, UserService};
