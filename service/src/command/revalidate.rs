//! [`Command`] for revalidating cached pages.

use common::operations::{By, Delete};
use derive_more::{Display, Error};
use secrecy::ExposeSecret as _;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        revalidation::{DocumentKind, Tag},
        Slug,
    },
    infra::Cache as _,
    Service,
};

use super::Command;

/// [`Command`] for revalidating cached pages once a content document changes.
#[derive(Clone, Debug)]
pub struct Revalidate {
    /// Secret provided by the caller.
    pub secret: String,

    /// [`DocumentKind`] of the changed document.
    ///
    /// [`None`] if the caller provided an unknown one.
    pub kind: Option<DocumentKind>,

    /// [`Slug`] of the changed document, if it has one.
    pub slug: Option<Slug>,
}

impl<C> Command<Revalidate> for Service<C> {
    type Ok = Vec<Tag>;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: Revalidate) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Revalidate { secret, kind, slug } = cmd;

        let expected = self.config().revalidate_secret.expose_secret();
        if expected.is_empty() || !expected.matches(&secret) {
            return Err(tracerr::new!(E::InvalidSecret));
        }
        let kind = kind.ok_or_else(|| tracerr::new!(E::UnknownDocument))?;

        let tags = Tag::affected_by(kind, slug.as_ref());
        for tag in &tags {
            let evicted = self
                .pages()
                .execute(Delete(By::new(tag.clone())))
                .await
                .unwrap_or_else(|e| match e {});
            log::debug!("tag `{tag}` revalidated, {evicted} page(s) evicted");
        }

        Ok(tags)
    }
}

/// Error of [`Revalidate`] [`Command`] execution.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ExecutionError {
    /// Provided secret doesn't match the configured one.
    #[display("Invalid revalidation secret")]
    InvalidSecret,

    /// Changed document is of unknown type.
    #[display("Unknown document type")]
    UnknownDocument,
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::operations::Insert;

    use crate::{
        command::Command as _,
        domain::{
            revalidation::{DocumentKind, Tag},
            Slug,
        },
        infra::{
            cache::{Key, Page},
            Cache as _, Memory,
        },
        query::{page::Cached, Query as _},
    };

    use super::{ExecutionError, Revalidate};

    fn cmd(
        secret: &str,
        kind: Option<DocumentKind>,
        slug: Option<&str>,
    ) -> Revalidate {
        Revalidate {
            secret: secret.to_owned(),
            kind,
            slug: slug.map(|s| Slug::new(s).unwrap()),
        }
    }

    #[tokio::test]
    async fn rejects_wrong_secret() {
        let svc = crate::spec::service(Memory::default());

        let err = svc
            .execute(cmd("nope", None, None))
            .await
            .unwrap_err();

        assert!(matches!(err.into_inner(), ExecutionError::InvalidSecret));
    }

    #[tokio::test]
    async fn rejects_unknown_document() {
        let svc = crate::spec::service(Memory::default());

        let err = svc
            .execute(cmd(crate::spec::SECRET, None, Some("villa-azul")))
            .await
            .unwrap_err();

        assert!(matches!(err.into_inner(), ExecutionError::UnknownDocument));
    }

    #[tokio::test]
    async fn evicts_affected_pages() {
        let svc = crate::spec::service(Memory::default());
        let slug = Slug::new("villa-azul").unwrap();
        for (key, tags) in [
            ("/", vec![Tag::Home]),
            ("/blog", vec![Tag::Posts]),
            ("/properties/villa-azul", vec![Tag::Listing(slug.clone())]),
        ] {
            svc.pages()
                .execute(Insert(Page::new(
                    Key::from(key),
                    String::new(),
                    tags,
                    Duration::from_secs(60),
                )))
                .await
                .unwrap();
        }

        let tags = svc
            .execute(cmd(
                crate::spec::SECRET,
                Some(DocumentKind::Property),
                Some("villa-azul"),
            ))
            .await
            .unwrap();

        assert_eq!(
            tags,
            [Tag::Listings, Tag::Listing(slug), Tag::Home, Tag::Sitemap],
        );
        for (key, cached) in [
            ("/", false),
            ("/properties/villa-azul", false),
            ("/blog", true),
        ] {
            let page = svc.execute(Cached(Key::from(key))).await.unwrap();
            assert_eq!(page.is_some(), cached, "{key}");
        }
    }

    #[tokio::test]
    async fn is_idempotent() {
        let svc = crate::spec::service(Memory::default());
        let revalidate =
            || cmd(crate::spec::SECRET, Some(DocumentKind::Author), None);

        assert_eq!(svc.execute(revalidate()).await.unwrap(), [Tag::Posts]);
        assert_eq!(svc.execute(revalidate()).await.unwrap(), [Tag::Posts]);
    }
}
