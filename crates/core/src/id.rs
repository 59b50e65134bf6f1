// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes and console id generation

/// Define a newtype ID wrapper around `String`.
///
/// Generates `new()`, `as_str()`, `Display`, `From<String>`, `From<&str>`
/// and `PartialEq<&str>` implementations.
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

define_id! {
    /// Control-plane identifier of a job.
    pub struct JobId;
}

define_id! {
    /// Control-plane identifier of a build job.
    pub struct BuildJobId;
}

define_id! {
    /// Identifier of one console group, command or message.
    ///
    /// Open and close events of the same group or command share one id.
    pub struct ConsoleId;
}

/// Generates console ids
pub trait IdGen: Clone + Send + Sync + 'static {
    fn next(&self) -> ConsoleId;
}

/// UUID v4 generator for production use
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> ConsoleId {
        ConsoleId(uuid::Uuid::new_v4().to_string())
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use sequential::SequentialIdGen;

#[cfg(any(test, feature = "test-support"))]
mod sequential {
    use super::{ConsoleId, IdGen};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// Sequential id generator for testing: `grp-1`, `grp-2`, ...
    #[derive(Clone)]
    pub struct SequentialIdGen {
        prefix: String,
        counter: Arc<AtomicU64>,
    }

    impl SequentialIdGen {
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                counter: Arc::new(AtomicU64::new(1)),
            }
        }
    }

    impl Default for SequentialIdGen {
        fn default() -> Self {
            Self::new("id")
        }
    }

    impl IdGen for SequentialIdGen {
        fn next(&self) -> ConsoleId {
            let n = self.counter.fetch_add(1, Ordering::SeqCst);
            ConsoleId(format!("{}-{}", self.prefix, n))
        }
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
