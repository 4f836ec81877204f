use rawcloud_image::ImageSize;

/// A struct representing the intrinsic parameters of a pinhole camera.
#[derive(Debug, Clone)]
pub struct PinholeCameraIntrinsic {
    /// The focal length in pixels (fx, fy)
    pub focal_length: (f32, f32),
    /// The principal point in pixels (cx, cy)
    pub principal_point: (f32, f32),
    /// The image dimensions the parameters were measured against (width, height)
    pub image_size: (u32, u32),
}

impl PinholeCameraIntrinsic {
    /// Creates a new PinholeCameraIntrinsic with the given parameters.
    pub fn new(
        focal_length: (f32, f32),
        principal_point: (f32, f32),
        image_size: (u32, u32),
    ) -> Self {
        Self {
            focal_length,
            principal_point,
            image_size,
        }
    }

    /// Rescale the parameters to a target resolution.
    ///
    /// Tracking services report intrinsics for the full camera texture
    /// while depth images arrive at a lower resolution, so each axis is
    /// scaled by the ratio of the target to the native dimension.
    pub fn scaled_to(&self, target: ImageSize) -> Self {
        let native_width = self.image_size.0 as f32;
        let native_height = self.image_size.1 as f32;
        Self {
            focal_length: (
                self.focal_length.0 * target.width as f32 / native_width,
                self.focal_length.1 * target.height as f32 / native_height,
            ),
            principal_point: (
                self.principal_point.0 * target.width as f32 / native_width,
                self.principal_point.1 * target.height as f32 / native_height,
            ),
            image_size: (target.width as u32, target.height as u32),
        }
    }
}

/// A camera-to-world rigid transform as a 4x4 homogeneous matrix.
///
/// The matrix is stored column-major, the layout pose APIs emit: elements
/// 0..4 are the first column (the camera x-axis expressed in world
/// coordinates), elements 12..16 hold the camera position and the
/// homogeneous row, typically (tx, ty, tz, 1).
#[derive(Debug, Clone, PartialEq)]
pub struct CameraPose {
    /// The column-major 4x4 matrix.
    pub matrix: [f32; 16],
}

impl CameraPose {
    /// Creates a pose from a column-major 4x4 matrix.
    pub fn new(matrix: [f32; 16]) -> Self {
        Self { matrix }
    }

    /// The identity pose, camera at the world origin.
    pub fn identity() -> Self {
        let mut matrix = [0.0; 16];
        matrix[0] = 1.0;
        matrix[5] = 1.0;
        matrix[10] = 1.0;
        matrix[15] = 1.0;
        Self { matrix }
    }

    /// A pose translating the camera by the given world-space offset.
    pub fn from_translation(translation: [f32; 3]) -> Self {
        let mut pose = Self::identity();
        pose.matrix[12] = translation[0];
        pose.matrix[13] = translation[1];
        pose.matrix[14] = translation[2];
        pose
    }

    /// Transform a camera-space point into world space.
    ///
    /// Applies the homogeneous multiply and divides by the resulting w
    /// component. Rigid poses keep w at 1; the division stays so that a
    /// non-normalized matrix still lands on the Euclidean result.
    pub fn transform_point(&self, point: [f32; 3]) -> [f32; 3] {
        let m = &self.matrix;
        let [x, y, z] = point;
        let wx = m[0] * x + m[4] * y + m[8] * z + m[12];
        let wy = m[1] * x + m[5] * y + m[9] * z + m[13];
        let wz = m[2] * x + m[6] * y + m[10] * z + m[14];
        let w = m[3] * x + m[7] * y + m[11] * z + m[15];
        [wx / w, wy / w, wz / w]
    }
}

/// Maps normalized camera-texture coordinates to pixel coordinates in the
/// full-resolution color image.
///
/// The tracking service owns this mapping because the color image may crop
/// or letterbox the camera texture. Reconstruction asks for the mapped
/// (0, 0) and (1, 1) corners to find the color rows covered by the depth
/// image footprint.
pub trait TextureCoordMapper {
    /// Map a normalized (u, v) texture coordinate to (x, y) pixel
    /// coordinates in the color image.
    fn texture_to_image(&self, u: f32, v: f32) -> [f32; 2];
}

/// Mapper for color images that cover the camera texture exactly.
#[derive(Debug, Clone)]
pub struct FullImageMapper {
    /// The color image dimensions.
    pub size: ImageSize,
}

impl TextureCoordMapper for FullImageMapper {
    fn texture_to_image(&self, u: f32, v: f32) -> [f32; 2] {
        [u * self.size.width as f32, v * self.size.height as f32]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_intrinsic_scaling() {
        let intrinsic =
            PinholeCameraIntrinsic::new((800.0, 810.0), (320.0, 240.0), (640, 480));
        let scaled = intrinsic.scaled_to(ImageSize {
            width: 160,
            height: 120,
        });

        assert_relative_eq!(scaled.focal_length.0, 200.0);
        assert_relative_eq!(scaled.focal_length.1, 202.5);
        assert_relative_eq!(scaled.principal_point.0, 80.0);
        assert_relative_eq!(scaled.principal_point.1, 60.0);
        assert_eq!(scaled.image_size, (160, 120));
    }

    #[test]
    fn test_identity_pose() {
        let pose = CameraPose::identity();
        let point = [1.0, -2.0, 3.0];
        assert_eq!(pose.transform_point(point), point);
    }

    #[test]
    fn test_translation_pose() {
        let pose = CameraPose::from_translation([10.0, 20.0, 30.0]);
        let world = pose.transform_point([1.0, 1.0, 1.0]);
        assert_relative_eq!(world[0], 11.0);
        assert_relative_eq!(world[1], 21.0);
        assert_relative_eq!(world[2], 31.0);
    }

    #[test]
    fn test_perspective_division() {
        // a matrix with w = 2 halves the result
        let mut pose = CameraPose::identity();
        pose.matrix[15] = 2.0;
        let world = pose.transform_point([2.0, 4.0, 6.0]);
        assert_relative_eq!(world[0], 1.0);
        assert_relative_eq!(world[1], 2.0);
        assert_relative_eq!(world[2], 3.0);
    }

    #[test]
    fn test_full_image_mapper() {
        let mapper = FullImageMapper {
            size: ImageSize {
                width: 640,
                height: 480,
            },
        };
        assert_eq!(mapper.texture_to_image(0.0, 0.0), [0.0, 0.0]);
        assert_eq!(mapper.texture_to_image(1.0, 1.0), [640.0, 480.0]);
        assert_eq!(mapper.texture_to_image(0.5, 0.5), [320.0, 240.0]);
    }
}
