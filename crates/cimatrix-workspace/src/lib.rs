//! Adapters implementing the cimatrix ports against a local checkout.

pub mod env;
pub mod git;
pub mod layout;
pub mod local;
pub mod manifest;

pub use env::ProcessEnvironment;
pub use git::GitCli;
pub use local::LocalRecipeRepository;
