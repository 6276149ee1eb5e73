//! [`Command`] definition.

pub mod revalidate;
pub mod store_page;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{revalidate::Revalidate, store_page::StorePage};
