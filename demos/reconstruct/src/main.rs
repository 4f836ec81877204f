use argh::FromArgs;
use std::path::PathBuf;

use rawcloud::image::{ConfidenceImage, DepthImage, ImageSize, PlaneView, YuvImage};
use rawcloud::r3d;
use rawcloud::r3d::camera::{CameraPose, FullImageMapper, PinholeCameraIntrinsic};
use rawcloud::r3d::pointcloud::PointCloudSession;
use rawcloud::r3d::reconstruction::{reconstruct_frame, CameraFrame};

#[derive(FromArgs)]
/// Reconstruct a synthetic capture session and export it as PLY
struct Args {
    /// directory to write the exported point cloud into
    #[argh(option, default = "PathBuf::from(\".\")")]
    output_dir: PathBuf,

    /// number of synthetic frames to reconstruct
    #[argh(option, default = "4")]
    frames: usize,

    /// maximum number of depth pixels sampled per frame
    #[argh(option, default = "20000")]
    point_limit: usize,
}

const DEPTH_WIDTH: usize = 160;
const DEPTH_HEIGHT: usize = 120;
const COLOR_WIDTH: usize = 320;
const COLOR_HEIGHT: usize = 240;

/// A sloped depth surface with a band of missing estimates.
fn synthetic_depth() -> Vec<u16> {
    let mut data = vec![0u16; DEPTH_WIDTH * DEPTH_HEIGHT];
    for y in 0..DEPTH_HEIGHT {
        for x in 0..DEPTH_WIDTH {
            let invalid = x > 70 && x < 80;
            data[y * DEPTH_WIDTH + x] = if invalid {
                0
            } else {
                (500 + 5 * x + 2 * y) as u16
            };
        }
    }
    data
}

/// Full confidence in the center, fading toward the borders.
fn synthetic_confidence() -> Vec<u8> {
    let mut data = vec![0u8; DEPTH_WIDTH * DEPTH_HEIGHT];
    for y in 0..DEPTH_HEIGHT {
        for x in 0..DEPTH_WIDTH {
            let border = x.min(DEPTH_WIDTH - 1 - x).min(y).min(DEPTH_HEIGHT - 1 - y);
            data[y * DEPTH_WIDTH + x] = (border * 32).min(255) as u8;
        }
    }
    data
}

/// A horizontal luma ramp with a mild chroma split.
fn synthetic_color() -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let mut y_data = vec![0u8; COLOR_WIDTH * COLOR_HEIGHT];
    for y in 0..COLOR_HEIGHT {
        for x in 0..COLOR_WIDTH {
            y_data[y * COLOR_WIDTH + x] = (x * 255 / COLOR_WIDTH) as u8;
        }
    }

    let chroma_width = COLOR_WIDTH / 2;
    let chroma_height = COLOR_HEIGHT / 2;
    let mut u_data = vec![128u8; chroma_width * chroma_height];
    let mut v_data = vec![128u8; chroma_width * chroma_height];
    for y in 0..chroma_height {
        for x in 0..chroma_width {
            if y < chroma_height / 2 {
                u_data[y * chroma_width + x] = 160;
            } else {
                v_data[y * chroma_width + x] = 160;
            }
        }
    }
    (y_data, u_data, v_data)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let depth_size = ImageSize {
        width: DEPTH_WIDTH,
        height: DEPTH_HEIGHT,
    };
    let color_size = ImageSize {
        width: COLOR_WIDTH,
        height: COLOR_HEIGHT,
    };

    let depth_data = synthetic_depth();
    let conf_data = synthetic_confidence();
    let (y_data, u_data, v_data) = synthetic_color();

    let depth = DepthImage::new(depth_size, &depth_data)?;
    let confidence = ConfidenceImage::new(depth_size, &conf_data, DEPTH_WIDTH, 1)?;
    let color = YuvImage::new(
        color_size,
        PlaneView::new(&y_data, COLOR_WIDTH, 1),
        PlaneView::new(&u_data, COLOR_WIDTH / 2, 1),
        PlaneView::new(&v_data, COLOR_WIDTH / 2, 1),
    )?;

    // intrinsics at the native color resolution, rescaled internally
    let intrinsics = PinholeCameraIntrinsic::new(
        (280.0, 280.0),
        (COLOR_WIDTH as f32 / 2.0, COLOR_HEIGHT as f32 / 2.0),
        (COLOR_WIDTH as u32, COLOR_HEIGHT as u32),
    );
    let mapper = FullImageMapper { size: color_size };

    let session = PointCloudSession::new();
    for i in 0..args.frames {
        // slide the camera sideways between frames
        let pose = CameraPose::from_translation([0.1 * i as f32, 0.0, 0.0]);
        let frame = CameraFrame {
            depth: &depth,
            confidence: &confidence,
            color: &color,
            intrinsics: &intrinsics,
            pose: &pose,
            mapper: &mapper,
        };
        let reconstruction = reconstruct_frame(&frame, args.point_limit)?;
        log::info!("frame {}: {} points", i, reconstruction.num_points());
        session.append_frame(reconstruction);
    }
    println!("Session: #{} points over {} frames", session.len(), session.num_frames());

    let file_name = r3d::io::ply::timestamped_filename("pointcloud");
    let path = args.output_dir.join(file_name);
    let handle = r3d::io::ply::write_ply_ascii_in_background(path, session.snapshot());
    let written = handle.wait()?;
    println!("Exported to {}", written.display());

    let restored = r3d::io::ply::read_ply_ascii(&written)?;
    let min = restored.get_min_bound();
    let max = restored.get_max_bound();
    println!(
        "Restored #{} points, bounds [{:.3} {:.3} {:.3}] .. [{:.3} {:.3} {:.3}]",
        restored.len(),
        min[0],
        min[1],
        min[2],
        max[0],
        max[1],
        max[2]
    );

    Ok(())
}
