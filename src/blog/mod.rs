//! Blog module.
//!
//! Blogs are owned documents: anyone may read them, only the owner may
//! mutate or delete them. The ownership decision itself lives in
//! [`ownership`], separate from any storage concern.

mod models;
pub mod ownership;
mod repository;
mod service;

pub use models::{Blog, BlogInfo, CreateBlogRequest, OwnerInfo, UpdateBlogRequest};
pub use repository::BlogRepository;
pub use service::BlogService;
