use std::sync::Mutex;

use crate::reconstruction::{FrameBuffers, FrameReconstruction};

/// A point cloud with points, colors, and depth confidences.
#[derive(Debug, Clone, Default)]
pub struct PointCloud {
    // The world-space points in the point cloud.
    points: Vec<[f32; 3]>,
    // The colors of the points.
    colors: Option<Vec<[u8; 3]>>,
    // The depth confidences of the points.
    confidences: Option<Vec<f32>>,
}

impl PointCloud {
    /// Create a new point cloud from points, colors (optional), and confidences (optional).
    pub fn new(
        points: Vec<[f32; 3]>,
        colors: Option<Vec<[u8; 3]>>,
        confidences: Option<Vec<f32>>,
    ) -> Self {
        Self {
            points,
            colors,
            confidences,
        }
    }

    /// Get the number of points in the point cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get as reference the points in the point cloud.
    pub fn points(&self) -> &Vec<[f32; 3]> {
        &self.points
    }

    /// Get as reference the colors of the points in the point cloud.
    pub fn colors(&self) -> Option<&Vec<[u8; 3]>> {
        self.colors.as_ref()
    }

    /// Get as reference the depth confidences of the points in the point cloud.
    pub fn confidences(&self) -> Option<&Vec<f32>> {
        self.confidences.as_ref()
    }

    /// Get the minimum bound of the point cloud.
    pub fn get_min_bound(&self) -> [f32; 3] {
        if self.points.is_empty() {
            return [0.0; 3];
        }
        self.points.iter().fold(self.points[0], |a, b| {
            [a[0].min(b[0]), a[1].min(b[1]), a[2].min(b[2])]
        })
    }

    /// Get the maximum bound of the point cloud.
    pub fn get_max_bound(&self) -> [f32; 3] {
        if self.points.is_empty() {
            return [0.0; 3];
        }
        self.points.iter().fold(self.points[0], |a, b| {
            [a[0].max(b[0]), a[1].max(b[1]), a[2].max(b[2])]
        })
    }
}

#[derive(Debug, Default)]
struct SessionState {
    points: Vec<[f32; 3]>,
    colors: Vec<[u8; 3]>,
    confidences: Vec<f32>,
    frames: Vec<FrameBuffers>,
}

/// Append-only accumulation of reconstructed points across a capture
/// session.
///
/// Frame appends and export snapshots go through one mutual exclusion
/// boundary, so an export never observes a partially written point. The
/// backing storage is not exposed; callers interact through
/// [`append_frame`](Self::append_frame), [`snapshot`](Self::snapshot), and
/// [`reset`](Self::reset).
#[derive(Debug, Default)]
pub struct PointCloudSession {
    state: Mutex<SessionState>,
}

impl PointCloudSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one frame's reconstruction output to the session.
    ///
    /// The frame's points, colors, and confidences extend the accumulated
    /// cloud; the raw camera-space buffers are kept as the frame record.
    pub fn append_frame(&self, frame: FrameReconstruction) {
        let mut state = self.state.lock().expect("point cloud session lock poisoned");
        state.points.extend_from_slice(&frame.points);
        state.colors.extend_from_slice(&frame.colors);
        state.confidences.extend_from_slice(&frame.confidences);
        state.frames.push(frame.buffers);
    }

    /// Get the number of accumulated points.
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .expect("point cloud session lock poisoned")
            .points
            .len()
    }

    /// Check if the session holds no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the number of appended frames.
    pub fn num_frames(&self) -> usize {
        self.state
            .lock()
            .expect("point cloud session lock poisoned")
            .frames
            .len()
    }

    /// Clone the accumulated cloud under the lock.
    ///
    /// The returned cloud is a stable copy: reconstruction may keep
    /// appending while the caller exports it.
    pub fn snapshot(&self) -> PointCloud {
        let state = self.state.lock().expect("point cloud session lock poisoned");
        PointCloud::new(
            state.points.clone(),
            Some(state.colors.clone()),
            Some(state.confidences.clone()),
        )
    }

    /// Drop all accumulated points and frame records.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("point cloud session lock poisoned");
        state.points.clear();
        state.colors.clear();
        state.confidences.clear();
        state.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame(offset: f32) -> FrameReconstruction {
        FrameReconstruction {
            points: vec![[offset, 0.0, -1.0], [offset + 1.0, 0.0, -1.0]],
            colors: vec![[255, 0, 0], [0, 255, 0]],
            confidences: vec![1.0, 0.5],
            buffers: FrameBuffers {
                points: vec![0.0, 0.0, -1.0, 1.0, 1.0, 0.0, -1.0, 0.5],
                colors: vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            },
        }
    }

    #[test]
    fn test_pointcloud() {
        let pointcloud = PointCloud::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            Some(vec![[255, 0, 0], [0, 255, 0]]),
            Some(vec![1.0, 0.5]),
        );

        assert_eq!(pointcloud.len(), 2);
        assert_eq!(pointcloud.points().len(), 2);

        if let Some(colors) = pointcloud.colors() {
            assert_eq!(colors.len(), 2);
        }
        if let Some(confidences) = pointcloud.confidences() {
            assert_eq!(confidences.len(), 2);
        }
    }

    #[test]
    fn test_bounds() {
        let pointcloud = PointCloud::new(
            vec![[1.0, -2.0, 3.0], [-1.0, 2.0, 0.5]],
            None,
            None,
        );
        assert_eq!(pointcloud.get_min_bound(), [-1.0, -2.0, 0.5]);
        assert_eq!(pointcloud.get_max_bound(), [1.0, 2.0, 3.0]);

        let empty = PointCloud::default();
        assert_eq!(empty.get_min_bound(), [0.0; 3]);
        assert_eq!(empty.get_max_bound(), [0.0; 3]);
    }

    #[test]
    fn test_session_append_and_snapshot() {
        let session = PointCloudSession::new();
        assert!(session.is_empty());

        session.append_frame(sample_frame(0.0));
        session.append_frame(sample_frame(10.0));

        assert_eq!(session.len(), 4);
        assert_eq!(session.num_frames(), 2);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.points()[2], [10.0, 0.0, -1.0]);
        assert_eq!(snapshot.colors().map(|c| c.len()), Some(4));
        assert_eq!(snapshot.confidences().map(|c| c.len()), Some(4));
    }

    #[test]
    fn test_session_snapshot_is_stable() {
        let session = PointCloudSession::new();
        session.append_frame(sample_frame(0.0));

        let snapshot = session.snapshot();
        session.append_frame(sample_frame(5.0));

        assert_eq!(snapshot.len(), 2);
        assert_eq!(session.len(), 4);
    }

    #[test]
    fn test_session_reset() {
        let session = PointCloudSession::new();
        session.append_frame(sample_frame(0.0));
        session.reset();

        assert!(session.is_empty());
        assert_eq!(session.num_frames(), 0);
        assert!(session.snapshot().is_empty());
    }
}
