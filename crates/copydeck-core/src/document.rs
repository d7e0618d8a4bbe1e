//! Shared document kinds
//!
//! Both stores persist a whole document per kind. The kind fixes the local
//! mirror key, the remote blob filename and the query discriminator used by
//! the config endpoint.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Kind of persisted document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKind {
    /// Fragment id → override entry map
    TextConfig,
    /// Ordered list of design comments
    Comments,
}

impl DocumentKind {
    /// All kinds, in a stable order
    pub const ALL: [DocumentKind; 2] = [DocumentKind::TextConfig, DocumentKind::Comments];

    /// Key under which the local mirror stores this kind
    #[inline]
    #[must_use]
    pub const fn mirror_key(self) -> &'static str {
        match self {
            Self::TextConfig => "apzumi_text_config_v1",
            Self::Comments => "apzumi_design_comments_v1",
        }
    }

    /// Fixed, non-randomized blob filename
    #[inline]
    #[must_use]
    pub const fn blob_name(self) -> &'static str {
        match self {
            Self::TextConfig => "text-config.json",
            Self::Comments => "design-comments.json",
        }
    }

    /// Value of the `type` query parameter selecting this kind
    #[inline]
    #[must_use]
    pub const fn query_discriminator(self) -> Option<&'static str> {
        match self {
            Self::TextConfig => None,
            Self::Comments => Some("comments"),
        }
    }

    /// Resolve the kind from the `type` query parameter
    ///
    /// Anything other than `comments` selects the text config.
    #[must_use]
    pub fn from_query(discriminator: Option<&str>) -> Self {
        match discriminator {
            Some("comments") => Self::Comments,
            _ => Self::TextConfig,
        }
    }

    /// Payload served when nothing is stored yet
    #[must_use]
    pub fn empty_payload(self) -> serde_json::Value {
        match self {
            Self::TextConfig => serde_json::Value::Object(serde_json::Map::new()),
            Self::Comments => serde_json::Value::Array(Vec::new()),
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TextConfig => f.write_str("text-config"),
            Self::Comments => f.write_str("comments"),
        }
    }
}

/// Whole-document snapshot that can be mirrored and synced
pub trait Document:
    Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static
{
    /// Kind this document is stored as
    const KIND: DocumentKind;

    /// Empty documents are never used to reconcile local state
    fn is_empty(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_round_trip() {
        for kind in DocumentKind::ALL {
            assert_eq!(DocumentKind::from_query(kind.query_discriminator()), kind);
        }
    }

    #[test]
    fn unknown_discriminator_selects_text_config() {
        assert_eq!(DocumentKind::from_query(Some("other")), DocumentKind::TextConfig);
    }

    #[test]
    fn empty_payload_shapes() {
        assert_eq!(DocumentKind::TextConfig.empty_payload().to_string(), "{}");
        assert_eq!(DocumentKind::Comments.empty_payload().to_string(), "[]");
    }

    #[test]
    fn keys_are_distinct() {
        assert_ne!(
            DocumentKind::TextConfig.mirror_key(),
            DocumentKind::Comments.mirror_key()
        );
        assert_ne!(
            DocumentKind::TextConfig.blob_name(),
            DocumentKind::Comments.blob_name()
        );
    }
}
