//! Read entities definitions.

pub mod listing;
pub mod post;
pub mod sitemap;
