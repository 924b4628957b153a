//! Image transforms for Easel
//!
//! Transforms are opaque, named functions over image payloads. The registry
//! owns the name-to-implementation mapping and the identity fallback; the
//! pixel algorithms themselves live in whatever the embedding application
//! registers at startup.

pub mod registry;

pub use registry::{
    Availability, TransformFn, TransformOutcome, TransformRegistry, TransformRegistryBuilder,
};
