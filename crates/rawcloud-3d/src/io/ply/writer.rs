use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use super::PlyError;
use crate::pointcloud::PointCloud;

/// Write a point cloud to an ASCII PLY file.
///
/// The header declares the vertex count and, per vertex, three float
/// position fields, three unsigned-byte color fields, and an unsigned-byte
/// alpha fixed at 255, followed by a zero-length face element. Exactly
/// `vertex_count` data lines follow the header, fields space-separated in
/// the order `x y z red green blue alpha`. An empty cloud produces a valid
/// header declaring zero vertices.
///
/// Points without colors are written white. The accumulated cloud is only
/// read, never mutated.
///
/// # Errors
///
/// Any failure while creating or writing the file is returned as
/// [`PlyError::Io`]; the partially written file is not valid output.
pub fn write_ply_ascii(path: impl AsRef<Path>, pointcloud: &PointCloud) -> Result<(), PlyError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    let vertex_count = pointcloud.len();
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "element vertex {}", vertex_count)?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "property uchar red")?;
    writeln!(writer, "property uchar green")?;
    writeln!(writer, "property uchar blue")?;
    writeln!(writer, "property uchar alpha")?;
    writeln!(writer, "element face 0")?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for (i, point) in pointcloud.points().iter().enumerate() {
        let [red, green, blue] = pointcloud.colors().map_or([255; 3], |colors| colors[i]);
        writeln!(
            writer,
            "{} {} {} {} {} {} 255",
            point[0], point[1], point[2], red, green, blue
        )?;
    }

    writer.flush()?;
    Ok(())
}

/// File name for an export started now: `<prefix><yyyyMMdd_HHmmss>.ply`.
///
/// Two exports within the same second share the name and the later one
/// overwrites.
pub fn timestamped_filename(prefix: &str) -> String {
    let time = chrono::Local::now().format("%Y%m%d_%H%M%S");
    format!("{}{}.ply", prefix, time)
}

/// Pending result of a background PLY export.
///
/// The writer thread reports exactly once: the created file path on
/// success, or the failure that interrupted the write. A file left behind
/// by a failed write is partial and must not be used.
#[derive(Debug)]
pub struct PlyExportHandle {
    receiver: mpsc::Receiver<Result<PathBuf, PlyError>>,
    handle: std::thread::JoinHandle<()>,
}

impl PlyExportHandle {
    /// Block until the export finishes and return its result.
    pub fn wait(self) -> Result<PathBuf, PlyError> {
        let result = self.receiver.recv().map_err(|_| PlyError::ExportAborted)?;
        let _ = self.handle.join();
        result
    }

    /// Check for the result without blocking.
    ///
    /// Returns `None` while the writer thread is still running.
    pub fn try_wait(&self) -> Option<Result<PathBuf, PlyError>> {
        self.receiver.try_recv().ok()
    }
}

/// Write a point cloud snapshot to an ASCII PLY file on a background
/// thread.
///
/// The snapshot moves into the writer thread, so a capture session can
/// keep appending new frames while the file is written. Completion is
/// delivered once through the returned handle; there is no cancellation
/// of a write in progress.
pub fn write_ply_ascii_in_background(
    path: impl Into<PathBuf>,
    pointcloud: PointCloud,
) -> PlyExportHandle {
    let path = path.into();
    let (sender, receiver) = mpsc::channel();

    let handle = std::thread::spawn(move || {
        log::debug!("exporting {} points to {}", pointcloud.len(), path.display());
        let result = write_ply_ascii(&path, &pointcloud).map(|_| path);
        if let Err(err) = &result {
            log::error!("ply export failed: {}", err);
        }
        if sender.send(result).is_err() {
            log::warn!("ply export finished but the handle was dropped");
        }
    });

    PlyExportHandle { receiver, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_cloud() -> PointCloud {
        PointCloud::new(
            vec![[1.0, 2.0, 3.0], [-0.5, 0.25, -1.0]],
            Some(vec![[255, 0, 128], [10, 20, 30]]),
            Some(vec![1.0, 0.5]),
        )
    }

    #[test]
    fn test_write_header_and_lines() -> Result<(), PlyError> {
        let dir = tempdir()?;
        let path = dir.path().join("cloud.ply");
        write_ply_ascii(&path, &sample_cloud())?;

        let contents = std::fs::read_to_string(&path)?;
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines[0], "ply");
        assert_eq!(lines[1], "format ascii 1.0");
        assert_eq!(lines[2], "element vertex 2");
        assert_eq!(lines[9], "property uchar alpha");
        assert_eq!(lines[10], "element face 0");
        assert_eq!(lines[12], "end_header");
        assert_eq!(lines.len(), 13 + 2);
        assert_eq!(lines[13], "1 2 3 255 0 128 255");
        Ok(())
    }

    #[test]
    fn test_write_empty_cloud() -> Result<(), PlyError> {
        let dir = tempdir()?;
        let path = dir.path().join("empty.ply");
        write_ply_ascii(&path, &PointCloud::default())?;

        let contents = std::fs::read_to_string(&path)?;
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[2], "element vertex 0");
        assert_eq!(lines.len(), 13);
        Ok(())
    }

    #[test]
    fn test_write_without_colors_is_white() -> Result<(), PlyError> {
        let dir = tempdir()?;
        let path = dir.path().join("white.ply");
        let cloud = PointCloud::new(vec![[0.0, 0.0, 0.0]], None, None);
        write_ply_ascii(&path, &cloud)?;

        let contents = std::fs::read_to_string(&path)?;
        let last = contents.lines().last().unwrap();
        assert_eq!(last, "0 0 0 255 255 255 255");
        Ok(())
    }

    #[test]
    fn test_write_failure_is_reported() {
        let result = write_ply_ascii("/nonexistent-dir/cloud.ply", &sample_cloud());
        assert!(matches!(result, Err(PlyError::Io(_))));
    }

    #[test]
    fn test_background_export() -> Result<(), PlyError> {
        let dir = tempdir()?;
        let path = dir.path().join("background.ply");

        let handle = write_ply_ascii_in_background(&path, sample_cloud());
        let written = handle.wait()?;

        assert_eq!(written, path);
        let contents = std::fs::read_to_string(&path)?;
        assert_eq!(contents.lines().count(), 13 + 2);
        Ok(())
    }

    #[test]
    fn test_background_export_failure() {
        let handle =
            write_ply_ascii_in_background("/nonexistent-dir/cloud.ply", sample_cloud());
        assert!(matches!(handle.wait(), Err(PlyError::Io(_))));
    }

    #[test]
    fn test_timestamped_filename() {
        let name = timestamped_filename("pointcloud");
        assert!(name.starts_with("pointcloud"));
        assert!(name.ends_with(".ply"));
        // prefix + yyyyMMdd_HHmmss + extension
        assert_eq!(name.len(), "pointcloud".len() + 15 + 4);
    }
}
