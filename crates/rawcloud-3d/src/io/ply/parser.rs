use std::io::BufRead;
use std::path::Path;

use super::PlyError;
use crate::pointcloud::PointCloud;

struct PlyHeader {
    pub vertex_count: usize,
    pub properties: Vec<String>,
}

fn parse_header<R: BufRead>(reader: &mut R) -> Result<PlyHeader, PlyError> {
    let mut line = String::new();
    let mut vertex_count = None;
    let mut is_ascii = false;
    let mut is_ply = false;
    let mut in_vertex_element = false;
    let mut properties = Vec::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let trimmed = line.trim();

        if trimmed == "ply" {
            is_ply = true;
            continue;
        }

        if trimmed == "end_header" {
            break;
        }

        if trimmed.starts_with("format ascii") {
            is_ascii = true;
        } else if trimmed.starts_with("element vertex") {
            vertex_count = Some(
                trimmed
                    .split_whitespace()
                    .last()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0),
            );
            in_vertex_element = true;
        } else if trimmed.starts_with("element") {
            // properties from here on belong to another element
            in_vertex_element = false;
        } else if trimmed.starts_with("property") && in_vertex_element {
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() >= 3 {
                properties.push(parts[2].to_string());
            }
        }
    }

    if !is_ply {
        return Err(PlyError::Header("missing ply magic line".to_string()));
    }
    if !is_ascii {
        return Err(PlyError::Header("not an ascii 1.0 file".to_string()));
    }

    let vertex_count =
        vertex_count.ok_or_else(|| PlyError::Header("missing vertex element".to_string()))?;

    Ok(PlyHeader {
        vertex_count,
        properties,
    })
}

/// Read a point cloud from an ASCII PLY file.
///
/// The vertex element must carry `x`, `y`, and `z` float properties;
/// `red`, `green`, and `blue` colors are read when present, any other
/// properties are skipped. The file must hold exactly the declared number
/// of vertex lines.
pub fn read_ply_ascii(path: impl AsRef<Path>) -> Result<PointCloud, PlyError> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    let header = parse_header(&mut reader)?;

    let index_of = |name: &str| header.properties.iter().position(|p| p == name);
    let (ix, iy, iz) = match (index_of("x"), index_of("y"), index_of("z")) {
        (Some(ix), Some(iy), Some(iz)) => (ix, iy, iz),
        _ => {
            return Err(PlyError::Header(
                "vertex element is missing x/y/z properties".to_string(),
            ))
        }
    };
    let color_indices = match (index_of("red"), index_of("green"), index_of("blue")) {
        (Some(ir), Some(ig), Some(ib)) => Some((ir, ig, ib)),
        _ => None,
    };

    let mut points = Vec::with_capacity(header.vertex_count);
    let mut colors = color_indices.map(|_| Vec::with_capacity(header.vertex_count));

    let mut line = String::new();
    for i in 0..header.vertex_count {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(PlyError::Vertex(format!(
                "expected {} vertices, file ended after {}",
                header.vertex_count, i
            )));
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < header.properties.len() {
            return Err(PlyError::Vertex(format!(
                "vertex {} has {} fields, expected {}",
                i,
                fields.len(),
                header.properties.len()
            )));
        }

        let float_at = |index: usize| {
            fields[index]
                .parse::<f32>()
                .map_err(|e| PlyError::Vertex(format!("vertex {}: {}", i, e)))
        };
        points.push([float_at(ix)?, float_at(iy)?, float_at(iz)?]);

        if let (Some((ir, ig, ib)), Some(colors)) = (color_indices, colors.as_mut()) {
            let byte_at = |index: usize| {
                fields[index]
                    .parse::<u8>()
                    .map_err(|e| PlyError::Vertex(format!("vertex {}: {}", i, e)))
            };
            colors.push([byte_at(ir)?, byte_at(ig)?, byte_at(ib)?]);
        }
    }

    Ok(PointCloud::new(points, colors, None))
}
