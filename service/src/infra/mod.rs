//! Infrastructure layer.

pub mod cache;
pub mod cms;

pub use self::{
    cache::{Cache, Pages},
    cms::{Cms, Content, Memory},
};
#[cfg(feature = "sanity")]
pub use self::cms::Sanity;
