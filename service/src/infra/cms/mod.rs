//! [`Cms`]-related implementations.

mod document;
pub mod groq;
pub mod memory;
#[cfg(feature = "sanity")]
pub mod sanity;

use derive_more::{Display, Error as StdError, From};
use tracerr::Traced;

pub use self::memory::Memory;
#[cfg(feature = "sanity")]
pub use self::sanity::Sanity;

/// Content backend operation.
pub use common::Handler as Cms;

/// [`Cms`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Request to [`Sanity`] failed.
    #[cfg(feature = "sanity")]
    #[display("request to `Sanity` failed: {_0}")]
    Request(reqwest::Error),

    /// [`Sanity`] token cannot be used as a header value.
    #[cfg(feature = "sanity")]
    #[display("invalid `Sanity` token: {_0}")]
    InvalidToken(reqwest::header::InvalidHeaderValue),

    /// Content backend responded with an unsuccessful HTTP status.
    #[display("content backend responded with `{_0}` status")]
    #[from(skip)]
    Status(#[error(not(source))] u16),

    /// Content backend response cannot be decoded.
    #[display("cannot decode content backend response: {_0}")]
    Decode(serde_json::Error),

    /// Document returned by the content backend misses required data.
    #[display("invalid `{id}` document: {reason}")]
    #[from(skip)]
    InvalidDocument {
        /// ID of the invalid document.
        id: String,

        /// Description of what's wrong.
        reason: String,
    },

    /// [`Memory`] fixtures cannot be read.
    #[display("cannot read fixtures: {_0}")]
    Fixtures(std::io::Error),
}

/// Content backend chosen at runtime.
#[derive(Clone, Debug)]
pub enum Content {
    /// [`Sanity`] content lake.
    #[cfg(feature = "sanity")]
    Sanity(Sanity),

    /// In-memory [`Memory`] dataset.
    Memory(Memory),
}

#[cfg(feature = "sanity")]
impl<Op> Cms<Op> for Content
where
    Memory: Cms<Op, Err = Traced<Error>>,
    Sanity: Cms<Op, Ok = <Memory as Cms<Op>>::Ok, Err = Traced<Error>>,
{
    type Ok = <Memory as Cms<Op>>::Ok;
    type Err = Traced<Error>;

    async fn execute(&self, op: Op) -> Result<Self::Ok, Self::Err> {
        match self {
            Self::Sanity(cms) => cms.execute(op).await,
            Self::Memory(cms) => cms.execute(op).await,
        }
    }
}

#[cfg(not(feature = "sanity"))]
impl<Op> Cms<Op> for Content
where
    Memory: Cms<Op, Err = Traced<Error>>,
{
    type Ok = <Memory as Cms<Op>>::Ok;
    type Err = Traced<Error>;

    async fn execute(&self, op: Op) -> Result<Self::Ok, Self::Err> {
        let Self::Memory(cms) = self;
        cms.execute(op).await
    }
}

impl From<Memory> for Content {
    fn from(cms: Memory) -> Self {
        Self::Memory(cms)
    }
}

#[cfg(feature = "sanity")]
impl From<Sanity> for Content {
    fn from(cms: Sanity) -> Self {
        Self::Sanity(cms)
    }
}
