use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use rawcloud_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl From<ImageSize> for [u32; 2] {
    fn from(size: ImageSize) -> Self {
        [size.width as u32, size.height as u32]
    }
}

/// A borrowed depth image with 16-bit millimeter values.
///
/// Depth sensors deliver this plane tightly packed row-major, so pixel
/// lookups use `y * width + x` directly instead of a stride table. A value
/// of zero means the sensor has no depth estimate at that pixel.
#[derive(Debug, Clone, Copy)]
pub struct DepthImage<'a> {
    data: &'a [u16],
    size: ImageSize,
}

impl<'a> DepthImage<'a> {
    /// Create a depth image view over a tightly packed buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer length does not match `width * height`.
    pub fn new(size: ImageSize, data: &'a [u16]) -> Result<Self, ImageError> {
        if data.len() != size.width * size.height {
            return Err(ImageError::InvalidBufferLength(
                data.len(),
                size.width * size.height,
            ));
        }
        Ok(Self { data, size })
    }

    /// Get the size of the image in pixels.
    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Depth in millimeters at the given pixel.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u16 {
        self.data[y * self.size.width + x]
    }
}

/// A borrowed image plane with explicit row and pixel strides.
///
/// Camera pipelines hand out planes whose rows may be padded and whose
/// samples may be interleaved with another plane, so both strides are part
/// of the addressing.
#[derive(Debug, Clone, Copy)]
pub struct PlaneView<'a> {
    data: &'a [u8],
    row_stride: usize,
    pixel_stride: usize,
}

impl<'a> PlaneView<'a> {
    /// Create a plane view over a raw byte buffer.
    pub fn new(data: &'a [u8], row_stride: usize, pixel_stride: usize) -> Self {
        Self {
            data,
            row_stride,
            pixel_stride,
        }
    }

    /// Row stride of the plane in bytes.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Pixel stride of the plane in bytes.
    #[inline]
    pub fn pixel_stride(&self) -> usize {
        self.pixel_stride
    }

    /// Sample value at the given pixel.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.row_stride + x * self.pixel_stride]
    }

    /// Check that every pixel of a `width` x `height` image is addressable.
    fn check_extent(&self, width: usize, height: usize) -> Result<(), ImageError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        let last = (height - 1) * self.row_stride + (width - 1) * self.pixel_stride;
        if last >= self.data.len() {
            return Err(ImageError::InvalidPlaneStride {
                len: self.data.len(),
                row_stride: self.row_stride,
                pixel_stride: self.pixel_stride,
                width,
                height,
            });
        }
        Ok(())
    }
}

/// A borrowed depth confidence image with 8-bit values.
///
/// Each byte scores the reliability of the depth estimate at the same
/// pixel, 0 (no confidence) to 255 (full confidence). Unlike the depth
/// plane the confidence plane may carry padding, so lookups honor its row
/// and pixel strides.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceImage<'a> {
    plane: PlaneView<'a>,
    size: ImageSize,
}

impl<'a> ConfidenceImage<'a> {
    /// Create a confidence image view over a strided buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the strides address bytes outside the buffer.
    pub fn new(
        size: ImageSize,
        data: &'a [u8],
        row_stride: usize,
        pixel_stride: usize,
    ) -> Result<Self, ImageError> {
        let plane = PlaneView::new(data, row_stride, pixel_stride);
        plane.check_extent(size.width, size.height)?;
        Ok(Self { plane, size })
    }

    /// Get the size of the image in pixels.
    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Raw confidence byte at the given pixel.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.plane.get(x, y)
    }

    /// Confidence at the given pixel normalized to the [0, 1] range.
    #[inline]
    pub fn normalized(&self, x: usize, y: usize) -> f32 {
        self.get(x, y) as f32 / 255.0
    }
}

/// A borrowed color frame in planar YUV 4:2:0.
///
/// The luma plane is sampled at full resolution; the two chroma planes
/// cover the image at half resolution in both axes. Each plane carries its
/// own row and pixel strides.
#[derive(Debug, Clone, Copy)]
pub struct YuvImage<'a> {
    y: PlaneView<'a>,
    u: PlaneView<'a>,
    v: PlaneView<'a>,
    size: ImageSize,
}

impl<'a> YuvImage<'a> {
    /// Create a YUV image view from its three planes.
    ///
    /// # Errors
    ///
    /// Returns an error if any plane cannot address its full extent: the
    /// luma plane at `width` x `height`, the chroma planes at half that,
    /// rounded up.
    pub fn new(
        size: ImageSize,
        y: PlaneView<'a>,
        u: PlaneView<'a>,
        v: PlaneView<'a>,
    ) -> Result<Self, ImageError> {
        let chroma_width = size.width.div_ceil(2);
        let chroma_height = size.height.div_ceil(2);
        y.check_extent(size.width, size.height)?;
        u.check_extent(chroma_width, chroma_height)?;
        v.check_extent(chroma_width, chroma_height)?;
        Ok(Self { y, u, v, size })
    }

    /// Get the size of the image in pixels.
    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the width of the image in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Sample the [Y, U, V] triplet at a full-resolution pixel.
    ///
    /// Chroma is read at `(x / 2, y / 2)` per the 4:2:0 layout.
    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> [u8; 3] {
        [
            self.y.get(x, y),
            self.u.get(x / 2, y / 2),
            self.v.get(x / 2, y / 2),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_image() -> Result<(), ImageError> {
        let data = vec![0u16, 100, 200, 300, 400, 500];
        let depth = DepthImage::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            &data,
        )?;

        assert_eq!(depth.width(), 3);
        assert_eq!(depth.height(), 2);
        assert_eq!(depth.get(0, 0), 0);
        assert_eq!(depth.get(2, 0), 200);
        assert_eq!(depth.get(1, 1), 400);
        Ok(())
    }

    #[test]
    fn test_depth_image_wrong_length() {
        let data = vec![0u16; 5];
        let depth = DepthImage::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            &data,
        );
        assert!(depth.is_err());
    }

    #[test]
    fn test_confidence_image_padded_rows() -> Result<(), ImageError> {
        // 2x2 image with a row stride of 4 bytes
        let data = vec![10u8, 20, 0, 0, 30, 40, 0, 0];
        let conf = ConfidenceImage::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            &data,
            4,
            1,
        )?;

        assert_eq!(conf.get(0, 0), 10);
        assert_eq!(conf.get(1, 0), 20);
        assert_eq!(conf.get(0, 1), 30);
        assert_eq!(conf.get(1, 1), 40);
        Ok(())
    }

    #[test]
    fn test_confidence_normalized() -> Result<(), ImageError> {
        let data = vec![255u8, 0, 128, 25];
        let conf = ConfidenceImage::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            &data,
            2,
            1,
        )?;

        assert_eq!(conf.normalized(0, 0), 1.0);
        assert_eq!(conf.normalized(1, 0), 0.0);
        assert!(conf.normalized(1, 1) < 0.1);
        Ok(())
    }

    #[test]
    fn test_confidence_stride_out_of_bounds() {
        let data = vec![0u8; 4];
        let conf = ConfidenceImage::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            &data,
            4,
            1,
        );
        assert!(conf.is_err());
    }

    #[test]
    fn test_yuv_sample_half_res_chroma() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 4,
        };
        let y_data: Vec<u8> = (0u8..16).collect();
        let u_data = vec![1u8, 2, 3, 4];
        let v_data = vec![5u8, 6, 7, 8];
        let yuv = YuvImage::new(
            size,
            PlaneView::new(&y_data, 4, 1),
            PlaneView::new(&u_data, 2, 1),
            PlaneView::new(&v_data, 2, 1),
        )?;

        assert_eq!(yuv.sample(0, 0), [0, 1, 5]);
        assert_eq!(yuv.sample(3, 0), [3, 2, 6]);
        assert_eq!(yuv.sample(1, 3), [13, 3, 7]);
        assert_eq!(yuv.sample(3, 3), [15, 4, 8]);
        Ok(())
    }

    #[test]
    fn test_yuv_interleaved_chroma_stride() -> Result<(), ImageError> {
        // semi-planar layout: chroma samples two bytes apart
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let y_data = vec![9u8; 4];
        let uv_data = vec![100u8, 200];
        let yuv = YuvImage::new(
            size,
            PlaneView::new(&y_data, 2, 1),
            PlaneView::new(&uv_data[..1], 2, 2),
            PlaneView::new(&uv_data[1..], 2, 2),
        )?;

        assert_eq!(yuv.sample(0, 0), [9, 100, 200]);
        Ok(())
    }

    #[test]
    fn test_yuv_plane_too_short() {
        let size = ImageSize {
            width: 4,
            height: 4,
        };
        let y_data = vec![0u8; 15];
        let chroma = vec![0u8; 4];
        let yuv = YuvImage::new(
            size,
            PlaneView::new(&y_data, 4, 1),
            PlaneView::new(&chroma, 2, 1),
            PlaneView::new(&chroma, 2, 1),
        );
        assert!(yuv.is_err());
    }
}
