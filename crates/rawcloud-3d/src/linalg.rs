/// Transform a set of camera-space points into world space with a
/// homogeneous camera pose.
///
/// # Arguments
///
/// * `pose` - A column-major 4x4 camera-to-world matrix.
/// * `src_points` - Camera-space points.
/// * `dst_points` - A pre-allocated vector to store the transformed points.
///
/// Each point is lifted to homogeneous coordinates with w = 1, multiplied
/// by the pose, and divided by the resulting w component. Rigid poses keep
/// w at 1, so the division only matters for non-normalized matrices.
///
/// PRECONDITION: dst_points is a pre-allocated vector of the same size as source.
///
/// Example:
///
/// ```no_run
/// use rawcloud_3d::linalg::transform_points_homogeneous;
///
/// let pose = [
///     1.0, 0.0, 0.0, 0.0,
///     0.0, 1.0, 0.0, 0.0,
///     0.0, 0.0, 1.0, 0.0,
///     0.0, 0.0, 0.0, 1.0,
/// ];
/// let src_points = vec![[2.0, 2.0, 2.0], [3.0, 4.0, 5.0]];
/// let mut dst_points = vec![[0.0; 3]; src_points.len()];
/// transform_points_homogeneous(&pose, &src_points, &mut dst_points);
/// ```
pub fn transform_points_homogeneous(
    pose: &[f32; 16],
    src_points: &[[f32; 3]],
    dst_points: &mut [[f32; 3]],
) {
    assert_eq!(src_points.len(), dst_points.len());
    if src_points.is_empty() {
        return;
    }

    // create a view of the pose matrix
    let pose_mat = faer::mat::from_column_major_slice(pose.as_slice(), 4, 4);

    // lift the source points to homogeneous coordinates, one column each
    let mut src_h = vec![0.0f32; src_points.len() * 4];
    for (chunk, p) in src_h.chunks_exact_mut(4).zip(src_points.iter()) {
        chunk.copy_from_slice(&[p[0], p[1], p[2], 1.0]);
    }
    let points_in_camera = faer::mat::from_column_major_slice(src_h.as_slice(), 4, src_points.len());

    let mut dst_h = vec![0.0f32; src_points.len() * 4];
    {
        let mut points_in_world =
            faer::mat::from_column_major_slice_mut(dst_h.as_mut_slice(), 4, src_points.len());

        // perform the matrix multiplication
        faer::linalg::matmul::matmul(
            &mut points_in_world,
            pose_mat,
            points_in_camera,
            None,
            1.0,
            faer::Parallelism::None,
        );
    }

    // perspective division by the homogeneous component
    for (dst, chunk) in dst_points.iter_mut().zip(dst_h.chunks_exact(4)) {
        let w = chunk[3];
        dst[0] = chunk[0] / w;
        dst[1] = chunk[1] / w;
        dst[2] = chunk[2] / w;
    }
}
