//! Application serves the listings site on top of the [`Service`].

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod api;
pub mod args;
pub mod config;
mod context;
pub mod error;
pub mod pages;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
// Used in binary.
use axum_client_ip as _;
use tokio as _;
use tower_http as _;
use tracing_subscriber as _;

pub use self::{
    args::Args,
    config::Config,
    context::Context,
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service = service::Service<service::infra::Content>;

/// Creates the [`Router`] of the whole site.
pub fn router(service: Service, site: config::Site) -> Router {
    use pages::{blog, home, properties, sitemap, statics};

    Router::new()
        .route("/", get(home::page))
        .route("/properties", get(properties::index))
        .route("/properties/more", get(properties::more))
        .route("/properties/apply", get(properties::apply))
        .route("/properties/clear", get(properties::clear))
        .route("/properties/page/:page", get(properties::page))
        .route("/properties/:slug", get(properties::detail))
        .route("/blog", get(blog::index))
        .route("/blog/page/:page", get(blog::page))
        .route("/blog/:slug", get(blog::detail))
        .route("/faq", get(statics::faq))
        .route("/contact", get(statics::contact))
        .route("/sitemap.xml", get(sitemap::sitemap))
        .route("/api/listings", get(api::listings))
        .route("/api/revalidate", post(api::revalidate))
        .fallback(statics::not_found)
        .layer(Extension(service))
        .layer(Extension(Arc::new(site)))
}
