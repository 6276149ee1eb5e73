//! JSON API.

pub mod listings;
pub mod revalidate;

pub use self::{listings::listings, revalidate::revalidate};
