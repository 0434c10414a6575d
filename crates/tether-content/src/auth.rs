//! Acting-user context and scoped elevation.
//!
//! Writing an identifier onto content is a privileged write that must
//! succeed regardless of who triggered the lookup. The acting user of an
//! [`AuthContext`] never changes; instead [`AuthContext::elevate`] hands out
//! an [`Elevation`] capability that privileged writes take as an argument.
//! Concurrent elevations on one shared context therefore cannot observe or
//! clobber each other.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

/// The trusted actor allowed to write identifier attributes.
pub const SYSTEM_ACTOR: &str = "system";

/// The actor on whose behalf content operations run.
#[derive(Debug, Default)]
pub struct AuthContext {
    actor: Option<String>,
    elevations: AtomicUsize,
}

impl AuthContext {
    /// A context with no acting user.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context acting as `actor`.
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
            elevations: AtomicUsize::new(0),
        }
    }

    /// The acting user, if any. Elevation does not change it.
    pub fn current(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    /// Returns `true` while at least one [`Elevation`] of this context is
    /// alive.
    pub fn is_elevated(&self) -> bool {
        self.elevations.load(Ordering::Acquire) > 0
    }

    /// Grant the trusted system actor until the returned capability drops.
    pub fn elevate(&self) -> Elevation<'_> {
        self.elevations.fetch_add(1, Ordering::AcqRel);
        debug!(on_behalf_of = ?self.actor, "elevation granted");
        Elevation { context: self }
    }
}

/// Proof that the holder may act as [`SYSTEM_ACTOR`] on one
/// [`AuthContext`]. Only [`AuthContext::elevate`] creates one.
#[must_use = "the elevation ends as soon as it is dropped"]
#[derive(Debug)]
pub struct Elevation<'a> {
    context: &'a AuthContext,
}

impl Elevation<'_> {
    /// The actor the elevated write runs as.
    pub fn actor(&self) -> &'static str {
        SYSTEM_ACTOR
    }

    /// The acting user that requested the elevation.
    pub fn on_behalf_of(&self) -> Option<&str> {
        self.context.current()
    }

    /// Returns `true` if this elevation was granted by `context`.
    pub fn grants(&self, context: &AuthContext) -> bool {
        std::ptr::eq(self.context, context)
    }
}

impl Drop for Elevation<'_> {
    fn drop(&mut self) {
        self.context.elevations.fetch_sub(1, Ordering::AcqRel);
        debug!(on_behalf_of = ?self.context.actor, "elevation released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;

    #[test]
    fn elevation_is_scoped() {
        let auth = AuthContext::with_actor("editor");
        {
            let elevation = auth.elevate();
            assert!(auth.is_elevated());
            assert_eq!(elevation.actor(), SYSTEM_ACTOR);
            assert_eq!(elevation.on_behalf_of(), Some("editor"));
            assert_eq!(auth.current(), Some("editor"));
        }
        assert!(!auth.is_elevated());
        assert_eq!(auth.current(), Some("editor"));
    }

    #[test]
    fn nested_elevations_unwind() {
        let auth = AuthContext::new();
        let outer = auth.elevate();
        {
            let _inner = auth.elevate();
            assert!(auth.is_elevated());
        }
        assert!(auth.is_elevated());
        drop(outer);
        assert!(!auth.is_elevated());
        assert!(auth.current().is_none());
    }

    #[test]
    fn elevation_is_bound_to_its_context() {
        let auth = AuthContext::with_actor("editor");
        let other = AuthContext::with_actor("editor");
        let elevation = auth.elevate();
        assert!(elevation.grants(&auth));
        assert!(!elevation.grants(&other));
        assert!(!other.is_elevated());
    }

    #[test]
    fn released_after_panic() {
        let auth = AuthContext::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _elevation = auth.elevate();
            panic!("write failed");
        }));
        assert!(result.is_err());
        assert!(!auth.is_elevated());
        assert!(auth.current().is_none());
    }

    #[test]
    fn interleaved_elevations_keep_the_actor() {
        let auth = AuthContext::with_actor("editor");
        let first_taken = Barrier::new(2);
        let first_released = Barrier::new(2);

        std::thread::scope(|s| {
            s.spawn(|| {
                let elevation = auth.elevate();
                first_taken.wait();
                drop(elevation);
                first_released.wait();
            });
            s.spawn(|| {
                first_taken.wait();
                let elevation = auth.elevate();
                first_released.wait();
                // the other thread's release must not revoke this one
                assert!(elevation.grants(&auth));
                assert!(auth.is_elevated());
                assert_eq!(auth.current(), Some("editor"));
            });
        });

        assert!(!auth.is_elevated());
        assert_eq!(auth.current(), Some("editor"));
    }
}
