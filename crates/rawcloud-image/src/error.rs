/// An error type for the image module.
#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    /// Error when the buffer length does not cover the image extent.
    #[error("Buffer length ({0}) does not cover the image extent ({1})")]
    InvalidBufferLength(usize, usize),

    /// Error when a plane stride cannot address the full image.
    #[error(
        "Plane of {len} bytes with row stride {row_stride} and pixel stride {pixel_stride} cannot address a {width}x{height} image"
    )]
    InvalidPlaneStride {
        /// Length of the plane buffer in bytes.
        len: usize,
        /// Row stride of the plane in bytes.
        row_stride: usize,
        /// Pixel stride of the plane in bytes.
        pixel_stride: usize,
        /// Addressed image width in pixels.
        width: usize,
        /// Addressed image height in pixels.
        height: usize,
    },
}
