//! The `scheme://host[/path...]` wire format.
//!
//! ```text
//! site://
//! user://user-id
//! page://HhX1YtRR2ImG6h4
//! file://HhX1YtRR2ImG6h4
//!
//! // compound values written to the lookup cache
//! page://HhX1YtRR2ImG6h4/filename.jpg
//! page://HhX1YtRR2ImG6h4/myField/AzX1YtTY2ImGh23
//! ```
//!
//! The site has no host: everything after `site://` is path. Path segments
//! are never empty, so `page://a/` and `page://a//b` are malformed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::EntityType;
use crate::error::TypeError;

const SEPARATOR: &str = "://";

/// A parsed content identifier.
///
/// `path` is only populated on compound values read back from the lookup
/// cache (a filename, or a field name plus block id). It is never part of
/// the identifier persisted on an object.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    kind: EntityType,
    host: String,
    path: Vec<String>,
}

impl Identifier {
    /// Build an identifier without path segments.
    pub fn new(kind: EntityType, host: impl Into<String>) -> Self {
        let host = match kind {
            EntityType::Site => String::new(),
            _ => host.into(),
        };
        Self {
            kind,
            host,
            path: Vec::new(),
        }
    }

    /// The identifier of the singleton site.
    pub fn site() -> Self {
        Self::new(EntityType::Site, "")
    }

    /// Append path segments, producing a compound value.
    pub fn with_path<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path.extend(segments.into_iter().map(Into::into));
        self
    }

    /// Parse a wire-format string.
    ///
    /// Fails with [`TypeError::InvalidScheme`] when the scheme is not in the
    /// registry, and with [`TypeError::Malformed`] when the `://` separator
    /// or a required host is missing or a path segment is empty.
    pub fn parse(input: &str) -> Result<Self, TypeError> {
        let (scheme, rest) = input
            .split_once(SEPARATOR)
            .ok_or_else(|| TypeError::Malformed {
                input: input.to_string(),
                reason: "missing '://' separator".into(),
            })?;
        let kind: EntityType = scheme.parse()?;

        if kind == EntityType::Site {
            let path = if rest.is_empty() {
                Vec::new()
            } else {
                segments(input, rest)?
            };
            return Ok(Self {
                kind,
                host: String::new(),
                path,
            });
        }

        let (host, path) = match rest.split_once('/') {
            Some((host, path)) => (host, segments(input, path)?),
            None => (rest, Vec::new()),
        };
        if host.is_empty() {
            return Err(TypeError::Malformed {
                input: input.to_string(),
                reason: format!("{kind} identifiers require a host"),
            });
        }

        Ok(Self {
            kind,
            host: host.to_string(),
            path,
        })
    }

    /// Checks whether `input` starts like an identifier, either of the given
    /// kind or of any registered kind.
    ///
    /// This is a cheap prefix test used to tell identifiers apart from
    /// literal tree paths; it does not validate the host.
    pub fn matches(input: &str, kind: Option<EntityType>) -> bool {
        match kind {
            Some(kind) => input.starts_with(&kind.prefix()),
            None => EntityType::ALL
                .iter()
                .any(|kind| input.starts_with(&kind.prefix())),
        }
    }

    /// The entity type (scheme).
    pub fn kind(&self) -> EntityType {
        self.kind
    }

    /// The host part: a UUID token, a user id, or empty for the site.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Extra path segments of a compound value.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Returns `true` if this is a compound value carrying path segments.
    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }

    /// Always `scheme://host`, ignoring any path.
    pub fn base(&self) -> String {
        format!("{}{SEPARATOR}{}", self.kind, self.host)
    }

    /// The identifier without its path segments.
    pub fn without_path(&self) -> Self {
        Self::new(self.kind, self.host.clone())
    }

    /// Render the identifier, optionally without the `scheme://` prefix.
    ///
    /// The site renders as `site://` rather than `site:///`.
    pub fn to_string_with(&self, include_scheme: bool) -> String {
        let mut rest = self.host.clone();
        for (i, segment) in self.path.iter().enumerate() {
            // the site has no host, so its first segment follows `://` directly
            if i > 0 || !rest.is_empty() {
                rest.push('/');
            }
            rest.push_str(segment);
        }

        if include_scheme {
            format!("{}{SEPARATOR}{rest}", self.kind)
        } else {
            rest
        }
    }
}

// Empty segments would not survive serialization, so they are rejected.
fn segments(input: &str, path: &str) -> Result<Vec<String>, TypeError> {
    path.split('/')
        .map(|segment| {
            if segment.is_empty() {
                Err(TypeError::Malformed {
                    input: input.to_string(),
                    reason: "empty path segment".into(),
                })
            } else {
                Ok(segment.to_string())
            }
        })
        .collect()
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(true))
    }
}

impl FromStr for Identifier {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_page() {
        let id = Identifier::parse("page://test-a").unwrap();
        assert_eq!(id.kind(), EntityType::Page);
        assert_eq!(id.host(), "test-a");
        assert!(id.path().is_empty());
        assert!(!id.has_path());
        assert_eq!(id.to_string(), "page://test-a");
    }

    #[test]
    fn parse_site_has_no_host() {
        let id = Identifier::parse("site://").unwrap();
        assert_eq!(id.kind(), EntityType::Site);
        assert_eq!(id.host(), "");
        assert_eq!(id.to_string(), "site://");
    }

    #[test]
    fn site_rest_is_path() {
        let id = Identifier::parse("site://test.jpg").unwrap();
        assert_eq!(id.host(), "");
        assert_eq!(id.path(), ["test.jpg"]);
        assert_eq!(id.to_string(), "site://test.jpg");
        assert_eq!(id.base(), "site://");
    }

    #[test]
    fn compound_file_value() {
        let id = Identifier::parse("page://page-a/test.jpg").unwrap();
        assert_eq!(id.host(), "page-a");
        assert_eq!(id.path(), ["test.jpg"]);
        assert!(id.has_path());
        assert_eq!(id.base(), "page://page-a");
        assert_eq!(id.without_path().to_string(), "page://page-a");
    }

    #[test]
    fn compound_block_value() {
        let id = Identifier::parse("page://page-a/text/block-1").unwrap();
        assert_eq!(id.path(), ["text", "block-1"]);
        assert_eq!(id.to_string(), "page://page-a/text/block-1");
    }

    #[test]
    fn invalid_scheme() {
        let err = Identifier::parse("foo://bar").unwrap_err();
        assert_eq!(err.to_string(), "invalid URL scheme: foo");
    }

    #[test]
    fn missing_separator_is_malformed() {
        assert!(matches!(
            Identifier::parse("a/b"),
            Err(TypeError::Malformed { .. })
        ));
    }

    #[test]
    fn missing_host_is_malformed() {
        assert!(matches!(
            Identifier::parse("page://"),
            Err(TypeError::Malformed { .. })
        ));
    }

    #[test]
    fn empty_path_segments_are_malformed() {
        for input in [
            "page://a/",
            "page://a//b",
            "file://a/b/",
            "user:///x",
            "site:///",
            "site://a//b",
            "site://a/",
        ] {
            assert!(
                matches!(Identifier::parse(input), Err(TypeError::Malformed { .. })),
                "{input} should be malformed"
            );
        }
    }

    #[test]
    fn render_without_scheme() {
        let id = Identifier::parse("file://fox-in-box").unwrap();
        assert_eq!(id.to_string_with(false), "fox-in-box");
        let compound = Identifier::parse("user://test/test.jpg").unwrap();
        assert_eq!(compound.to_string_with(false), "test/test.jpg");
        assert_eq!(Identifier::site().to_string_with(false), "");
    }

    #[test]
    fn new_site_drops_host() {
        let id = Identifier::new(EntityType::Site, "ignored");
        assert_eq!(id.host(), "");
        assert_eq!(id.to_string(), "site://");
    }

    #[test]
    fn with_path_builds_compound_values() {
        let id = Identifier::new(EntityType::User, "test").with_path(["test.jpg"]);
        assert_eq!(id.to_string(), "user://test/test.jpg");
    }

    #[test]
    fn matches_any_scheme() {
        assert!(Identifier::matches("page://abc", None));
        assert!(Identifier::matches("site://", None));
        assert!(Identifier::matches("struct://x", None));
        assert!(!Identifier::matches("a/b/c", None));
        assert!(!Identifier::matches("foo://bar", None));
    }

    #[test]
    fn matches_given_scheme() {
        assert!(Identifier::matches("file://abc", Some(EntityType::File)));
        assert!(!Identifier::matches("page://abc", Some(EntityType::File)));
    }

    #[test]
    fn serde_as_string() {
        let id = Identifier::parse("block://abc").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"block://abc\"");
        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<Identifier>("\"nope://x\"").is_err());
    }

    fn wire_string() -> impl Strategy<Value = String> {
        (
            proptest::sample::select(EntityType::ALL.to_vec()),
            "[a-zA-Z0-9-]{1,36}",
            proptest::collection::vec("[a-zA-Z0-9._-]{1,12}", 0..3),
        )
            .prop_map(|(kind, host, path)| {
                let mut rest = if kind == EntityType::Site {
                    String::new()
                } else {
                    host
                };
                for segment in path {
                    if !rest.is_empty() {
                        rest.push('/');
                    }
                    rest.push_str(&segment);
                }
                format!("{kind}://{rest}")
            })
    }

    fn slashed_string() -> impl Strategy<Value = String> {
        (
            proptest::sample::select(EntityType::ALL.to_vec()),
            "[a-z0-9/]{0,16}",
        )
            .prop_map(|(kind, rest)| format!("{kind}://{rest}"))
    }

    proptest! {
        #[test]
        fn serialize_inverts_parse(s in wire_string()) {
            let id = Identifier::parse(&s).unwrap();
            prop_assert_eq!(id.to_string(), s);
        }

        #[test]
        fn parsed_identifiers_serialize_back(s in slashed_string()) {
            if let Ok(id) = Identifier::parse(&s) {
                prop_assert_eq!(id.to_string(), s);
            }
        }
    }
}
