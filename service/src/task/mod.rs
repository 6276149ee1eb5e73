//! Background [`Task`]s definitions.

mod background;
pub mod purge_expired_pages;

pub use common::Handler as Task;

pub use self::{
    background::Background, purge_expired_pages::PurgeExpiredPages,
};
