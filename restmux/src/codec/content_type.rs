//! Closed set of MIME types understood by the negotiator

use std::fmt;

use serde::{Deserialize, Serialize};

/// Content types with a registered meaning
///
/// # Example
///
/// ```rust
/// use restmux::codec::ContentType;
///
/// assert_eq!(ContentType::from_header(Some(" Application/JSON ")), ContentType::ApplicationJson);
/// assert_eq!(ContentType::from_header(Some("text/html")), ContentType::Unknown);
/// assert_eq!(ContentType::from_header(None), ContentType::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    /// `text/plain`
    TextPlain,
    /// `application/json`
    ApplicationJson,
    /// `application/x-msgpack`
    ApplicationMsgPack,
    /// Anything else, including a missing header
    Unknown,
}

impl ContentType {
    /// Every variant, in match order
    pub const ALL: [ContentType; 4] = [
        Self::TextPlain,
        Self::ApplicationJson,
        Self::ApplicationMsgPack,
        Self::Unknown,
    ];

    /// Canonical MIME string (`""` for [`ContentType::Unknown`])
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TextPlain => "text/plain",
            Self::ApplicationJson => "application/json",
            Self::ApplicationMsgPack => "application/x-msgpack",
            Self::Unknown => "",
        }
    }

    /// Case-insensitive, whitespace-trimmed match against the known set.
    ///
    /// Parameters such as `; charset=utf-8` are not stripped, so such values
    /// map to [`ContentType::Unknown`].
    #[must_use]
    pub fn from_header(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::Unknown;
        };
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|ct| *ct != Self::Unknown && ct.as_str().eq_ignore_ascii_case(trimmed))
            .unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
