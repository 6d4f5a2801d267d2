//! cimatrix core
//!
//! Domain types, port traits and error handling shared by every cimatrix
//! crate. The planner only ever talks to the outside world through the
//! traits in [`ports`].

pub mod error;
pub mod fakes;
pub mod job;
pub mod platform;
pub mod ports;
pub mod recipe;

pub use error::{Error, Result};
pub use job::{BuildType, Compiler, JobSpec, Matrix, MatrixJob};
pub use platform::{OutputShape, Platform};
pub use recipe::{BuildPolicy, RecipeKind, RepositoryShape, VersionConfig, VersionPolicy};
