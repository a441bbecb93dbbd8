//! # Algorithms Module
//!
//! Group algebra, policy compilation, peer group resolution and load balancing.

pub mod group_algebra;
pub mod load_balance;
pub mod policy_compiler;
pub mod resolver;

pub use group_algebra::{and, cartesian_product, combinations};
pub use load_balance::{RandomLbp, RoundRobinLbp};
pub use policy_compiler::SignaturePolicyCompiler;
pub use resolver::PeerGroupResolver;
