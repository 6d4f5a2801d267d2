//! Build-job matrix planning for cimatrix.
//!
//! Everything in this crate is a pure function of the data returned by the
//! port traits in `cimatrix_core::ports`.

pub mod assembler;
pub mod builder;
pub mod catalog;
pub mod changes;
pub mod compat;
pub mod families;
pub mod generate;
pub mod legacy;
pub mod selector;
pub mod serializer;
pub mod settings;

pub use assembler::MatrixAssembler;
pub use builder::{MatrixBuilder, split_by_build_type};
pub use changes::ChangeSet;
pub use generate::{GenerateRequest, Ports, generate_matrix};
pub use legacy::LegacyOwnership;
pub use serializer::{Rendered, render};
pub use settings::GeneratorSettings;
