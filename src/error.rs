use std::{fmt, result};

/// Error variants returned by this crate.
///
/// Every fatal condition raised anywhere in the tree -- broken sort
/// invariants, broken partition invariants, a panic inside a forked
/// task -- surfaces through one of these variants rather than a panic.
#[derive(Debug)]
pub enum Error {
    /// A staged point or a query tuple did not have exactly `dimensions` axes.
    DimensionMismatch(String),
    /// `add` was called after the staging buffer reached its configured capacity.
    CapacityExceeded(String),
    /// Two adjacent keys in a reference array were found out of SuperKey order.
    SortInvariant(String),
    /// The balanced builder observed a median or range that violates the
    /// partition invariant.
    GeometryInvariant(String),
    /// A task forked onto the executor panicked before the join completed.
    TaskFailure(String),
    /// A query was attempted against a tree with no root and a lazy build
    /// failed to establish one; this indicates an implementation bug, not
    /// caller error.
    NotBuilt(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DimensionMismatch(msg) => write!(f, "dimension mismatch: {}", msg),
            Error::CapacityExceeded(msg) => write!(f, "capacity exceeded: {}", msg),
            Error::SortInvariant(msg) => write!(f, "sort invariant violated: {}", msg),
            Error::GeometryInvariant(msg) => write!(f, "geometry invariant violated: {}", msg),
            Error::TaskFailure(msg) => write!(f, "forked task failed: {}", msg),
            Error::NotBuilt(msg) => write!(f, "tree not built: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Crate-local result alias, matching every public API signature.
pub type Result<T> = result::Result<T, Error>;

/// Construct an `Error` variant, stamping the file/line of the call site into
/// the message the way the source crate's `err_at!` does across its sort,
/// build and thread-pool modules.
///
/// Two forms:
/// - `err_at!(Variant, msg: "fmt", args...)` formats a message directly.
/// - `err_at!(Variant, result_expr)` maps an `Err(e)` through `Variant`,
///   passing `Ok(v)` through unchanged.
#[macro_export]
macro_rules! err_at {
    ($variant:ident, msg: $($arg:expr),+ $(,)?) => {{
        Err($crate::error::Error::$variant(format!(
            "{}:{} {}",
            file!(),
            line!(),
            format!($($arg),+),
        )))
    }};
    ($variant:ident, $expr:expr $(,)?) => {
        match $expr {
            Ok(val) => Ok(val),
            Err(err) => Err($crate::error::Error::$variant(format!(
                "{}:{} {}",
                file!(),
                line!(),
                err,
            ))),
        }
    };
}
