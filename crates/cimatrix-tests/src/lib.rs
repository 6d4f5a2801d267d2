//! Integration test infrastructure for cimatrix.
//!
//! Provides throw-away git repositories holding recipe trees, plus fixtures
//! for configuration files, manifests and CI environments.
//!
//! # Usage
//!
//! ```ignore
//! use cimatrix_tests::TestRepo;
//!
//! #[test]
//! fn test_something() {
//!     let repo = TestRepo::new().unwrap();
//!     repo.write("conanfile.py", "version = \"1.0\"\n").unwrap();
//!     repo.commit("add recipe").unwrap();
//! }
//! ```

pub mod context;
pub mod fixtures;

pub use context::TestRepo;
pub use fixtures::*;

/// Initialize test logging (call once per test binary).
pub fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,cimatrix_planner=debug")),
        )
        .with_test_writer()
        .try_init();
}
