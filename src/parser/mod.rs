//! Share-link codecs
//!
//! Each scheme has a parser turning a link into its canonical proxy variant and
//! the inverse renderer used by [`crate::models::ProxyNode::link`].

pub mod explodes;

use thiserror::Error;

pub use explodes::common::{parse_proxies_from_text, parse_proxy_from_link};
pub use explodes::grep::grep_links_from_string;

/// Why a share link could not be turned into a proxy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The link belongs to another scheme; callers move on to the next parser.
    #[error("not a {0} link")]
    NotThisScheme(&'static str),

    #[error("{0} link payload parse failed")]
    PayloadParseFailed(&'static str),

    #[error("{0} link path not complete")]
    PathNotComplete(&'static str),

    #[error("{scheme} link is missing `{field}`")]
    MissingField {
        scheme: &'static str,
        field: &'static str,
    },

    #[error("no parser accepts this link")]
    UnknownScheme,
}

impl ParseError {
    pub fn is_scheme_mismatch(&self) -> bool {
        matches!(self, ParseError::NotThisScheme(_) | ParseError::UnknownScheme)
    }
}
