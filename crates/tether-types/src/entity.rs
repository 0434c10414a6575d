use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The closed set of content kinds an identifier can address.
///
/// The variant doubles as the wire-format scheme: `page://...` addresses a
/// [`EntityType::Page`]. Adding a kind means extending this enum and every
/// exhaustive match over it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// The singleton site. Its identifier has no host.
    Site,
    /// A page anywhere in the page tree.
    Page,
    /// A file attached to the site, a page, or a user.
    File,
    /// A user account, addressed by its own id.
    User,
    /// A block inside a blocks field of a parent object.
    Block,
    /// An entry inside a structure field of a parent object.
    Struct,
}

impl EntityType {
    /// Every scheme in the registry, in wire-format order.
    pub const ALL: [EntityType; 6] = [
        EntityType::Site,
        EntityType::Page,
        EntityType::File,
        EntityType::User,
        EntityType::Block,
        EntityType::Struct,
    ];

    /// The scheme name used on the wire and in cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Site => "site",
            EntityType::Page => "page",
            EntityType::File => "file",
            EntityType::User => "user",
            EntityType::Block => "block",
            EntityType::Struct => "struct",
        }
    }

    /// Returns `true` for kinds whose lookup goes through a parent
    /// identifier (files, blocks and structure entries).
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            EntityType::File | EntityType::Block | EntityType::Struct
        )
    }

    /// Returns `true` for kinds whose host is a content identifier attribute
    /// rather than an id owned by the object itself.
    pub fn uses_content_attribute(&self) -> bool {
        matches!(
            self,
            EntityType::Page | EntityType::File | EntityType::Struct
        )
    }

    /// The `scheme://` prefix for this kind.
    pub fn prefix(&self) -> String {
        format!("{}://", self.as_str())
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TypeError::InvalidScheme {
                scheme: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_names_roundtrip() {
        for kind in EntityType::ALL {
            assert_eq!(kind.as_str().parse::<EntityType>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let err = "foo".parse::<EntityType>().unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidScheme {
                scheme: "foo".into()
            }
        );
        assert_eq!(err.to_string(), "invalid URL scheme: foo");
    }

    #[test]
    fn schemes_are_case_sensitive() {
        assert!("Page".parse::<EntityType>().is_err());
    }

    #[test]
    fn compound_kinds() {
        assert!(EntityType::File.is_compound());
        assert!(EntityType::Block.is_compound());
        assert!(EntityType::Struct.is_compound());
        assert!(!EntityType::Page.is_compound());
        assert!(!EntityType::Site.is_compound());
        assert!(!EntityType::User.is_compound());
    }

    #[test]
    fn serde_uses_scheme_names() {
        let json = serde_json::to_string(&EntityType::Struct).unwrap();
        assert_eq!(json, "\"struct\"");
    }
}
