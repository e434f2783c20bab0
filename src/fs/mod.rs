pub mod meta;
pub mod sidecar;
pub mod staging;

pub use sidecar::{PackageSidecar, SidecarEntry};
