//! Domain definitions.

pub mod listing;
pub mod location;
pub mod post;
pub mod revalidation;
mod slug;

pub use self::{listing::Listing, post::Post, slug::Slug};
