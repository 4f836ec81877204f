#![deny(missing_docs)]
//! Sensor image buffer types for raw depth capture

/// Image views over raw sensor buffers.
pub mod image;

/// Error types for the image module.
pub mod error;

/// YUV to RGB pixel conversion.
pub mod color;

pub use crate::color::{rgb_from_yuv, rgb_to_u8};
pub use crate::error::ImageError;
pub use crate::image::{ConfidenceImage, DepthImage, ImageSize, PlaneView, YuvImage};
