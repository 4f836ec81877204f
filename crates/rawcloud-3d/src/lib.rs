#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Camera intrinsics, pose, and texture coordinate mapping.
pub mod camera;

/// I/O utilities for reading and writing point clouds.
pub mod io;

/// Linear algebra utilities.
pub mod linalg;

/// Point cloud container and session accumulation.
pub mod pointcloud;

/// Depth frame reconstruction.
pub mod reconstruction;
