use rawcloud_image::{rgb_from_yuv, rgb_to_u8, ConfidenceImage, DepthImage, YuvImage};

use crate::camera::{CameraPose, PinholeCameraIntrinsic, TextureCoordMapper};
use crate::linalg::transform_points_homogeneous;

/// Depth confidence below this normalized value rejects the pixel.
pub const MIN_CONFIDENCE: f32 = 0.1;

/// An error type for frame reconstruction.
#[derive(thiserror::Error, Debug)]
pub enum ReconstructionError {
    /// The depth and confidence images disagree on their dimensions.
    #[error("Depth image is {0}x{1} but confidence image is {2}x{3}")]
    ShapeMismatch(usize, usize, usize, usize),

    /// The point limit must be a positive number of pixels.
    #[error("Point limit must be positive")]
    InvalidPointLimit,
}

/// The read-only inputs to one reconstruction call.
///
/// Depth and confidence must share their dimensions; the color frame may
/// come at a different resolution and is resampled during the lookup.
pub struct CameraFrame<'a> {
    /// Depth image in millimeters, co-registered with the confidence image.
    pub depth: &'a DepthImage<'a>,
    /// Per-pixel depth confidence.
    pub confidence: &'a ConfidenceImage<'a>,
    /// Color frame in planar YUV 4:2:0.
    pub color: &'a YuvImage<'a>,
    /// Intrinsics at their native camera-texture resolution.
    pub intrinsics: &'a PinholeCameraIntrinsic,
    /// Camera-to-world pose for this frame.
    pub pose: &'a CameraPose,
    /// Texture-to-image coordinate mapping from the tracking service.
    pub mapper: &'a dyn TextureCoordMapper,
}

/// Raw per-frame output buffers before promotion to persisted points.
///
/// `points` holds one (x, y, z, confidence) quad per accepted pixel in
/// camera space; `colors` holds one (r, g, b) triple in [0, 1] per accepted
/// pixel, in the same iteration order.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffers {
    /// Interleaved (x, y, z, confidence) quads in camera space.
    pub points: Vec<f32>,
    /// Interleaved (r, g, b) triples in [0, 1].
    pub colors: Vec<f32>,
}

impl FrameBuffers {
    /// Number of accepted pixels described by the buffers.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len() / 4
    }

    /// Check if the buffers are empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The output of reconstructing one frame.
///
/// All four sequences describe the same accepted-pixel set in the same
/// row-major, strided iteration order.
#[derive(Debug, Clone, Default)]
pub struct FrameReconstruction {
    /// World-space point positions.
    pub points: Vec<[f32; 3]>,
    /// Quantized RGB colors, one per point.
    pub colors: Vec<[u8; 3]>,
    /// Normalized depth confidences, one per point.
    pub confidences: Vec<f32>,
    /// The raw camera-space buffers for this frame.
    pub buffers: FrameBuffers,
}

impl FrameReconstruction {
    /// Number of reconstructed points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Check if the reconstruction produced no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Row and column increment that scans at most `point_limit` pixels.
///
/// The stride is `ceil(sqrt(width * height / point_limit))`, applied to
/// both axes, so the subsampling is uniform and deterministic. For
/// `point_limit >= width * height` the image is scanned densely.
pub fn subsampling_step(width: usize, height: usize, point_limit: usize) -> usize {
    let step = ((width * height) as f32 / point_limit as f32).sqrt().ceil() as usize;
    step.max(1)
}

/// Reconstruct one depth frame into world-space colored points.
///
/// Scans the depth image with the uniform subsampling stride for
/// `point_limit`, rejecting pixels with a zero depth (the sensor's
/// no-estimate sentinel) or a normalized confidence below
/// [`MIN_CONFIDENCE`]. Accepted pixels are unprojected into camera space
/// with the intrinsics rescaled to the depth resolution:
///
/// ```text
/// x = d * (px - cx) / fx
/// y = d * (cy - py) / fy
/// z = -d
/// ```
///
/// a right-handed camera frame looking down -z. The co-registered color is
/// sampled from the YUV frame by scaling the pixel coordinates to the
/// color resolution, with the vertical range taken from the texture
/// mapping, and converted to RGB. Camera-space points are finally carried
/// into world space through the pose in one batch.
///
/// Per-pixel rejection means the output often holds fewer than
/// `point_limit` points; a frame where every pixel is rejected yields an
/// empty reconstruction, not an error.
pub fn reconstruct_frame(
    frame: &CameraFrame<'_>,
    point_limit: usize,
) -> Result<FrameReconstruction, ReconstructionError> {
    if point_limit == 0 {
        return Err(ReconstructionError::InvalidPointLimit);
    }

    let depth_width = frame.depth.width();
    let depth_height = frame.depth.height();
    if depth_width != frame.confidence.width() || depth_height != frame.confidence.height() {
        return Err(ReconstructionError::ShapeMismatch(
            depth_width,
            depth_height,
            frame.confidence.width(),
            frame.confidence.height(),
        ));
    }

    let intrinsic = frame.intrinsics.scaled_to(frame.depth.size());
    let (fx, fy) = intrinsic.focal_length;
    let (cx, cy) = intrinsic.principal_point;

    let color_width = frame.color.width();
    let color_height = frame.color.height();

    // color rows covered by the depth footprint, from the mapped texture corners
    let top = frame.mapper.texture_to_image(0.0, 0.0);
    let bottom = frame.mapper.texture_to_image(1.0, 1.0);
    let color_min_y = (top[1].round() as i64).max(0) as usize;
    let color_max_y = ((bottom[1].round() as i64).max(0) as usize).min(color_height);
    let color_region_height = color_max_y.saturating_sub(color_min_y);

    let step = subsampling_step(depth_width, depth_height, point_limit);
    let scanned = (depth_width / step).max(1) * (depth_height / step).max(1);

    let mut buffers = FrameBuffers {
        points: Vec::with_capacity(scanned * 4),
        colors: Vec::with_capacity(scanned * 3),
    };
    let mut camera_points = Vec::with_capacity(scanned);
    let mut colors = Vec::with_capacity(scanned);
    let mut confidences = Vec::with_capacity(scanned);

    for py in (0..depth_height).step_by(step) {
        for px in (0..depth_width).step_by(step) {
            // the depth plane is tightly packed, no stride lookup needed
            let depth_mm = frame.depth.get(px, py);
            let confidence = frame.confidence.normalized(px, py);

            if depth_mm == 0 || confidence < MIN_CONFIDENCE {
                continue;
            }

            let depth_m = depth_mm as f32 / 1000.0;
            let x = depth_m * (px as f32 - cx) / fx;
            let y = depth_m * (cy - py as f32) / fy;
            let z = -depth_m;

            let color_x = px * color_width / depth_width;
            let color_y = color_min_y + py * color_region_height / depth_height;

            let [luma, u, v] = frame.color.sample(color_x, color_y);
            let rgb = rgb_from_yuv(luma, u, v);

            buffers.points.extend_from_slice(&[x, y, z, confidence]);
            buffers.colors.extend_from_slice(&rgb);

            camera_points.push([x, y, z]);
            colors.push(rgb_to_u8(&rgb));
            confidences.push(confidence);
        }
    }

    let mut points = vec![[0.0f32; 3]; camera_points.len()];
    transform_points_homogeneous(&frame.pose.matrix, &camera_points, &mut points);

    log::debug!(
        "reconstructed {} points from a {}x{} depth frame (step {})",
        points.len(),
        depth_width,
        depth_height,
        step
    );

    Ok(FrameReconstruction {
        points,
        colors,
        confidences,
        buffers,
    })
}
