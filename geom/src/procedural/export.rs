//! Wavefront OBJ export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::types::UnpackedMesh;
use crate::error::{GeomError, Result};

/// Write `mesh` to `path` as a single OBJ object named `name`
pub fn write_obj(mesh: &UnpackedMesh, path: &Path, name: &str) -> Result<()> {
    let file = File::create(path).map_err(|e| GeomError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_obj_to(mesh, &mut writer, name)
        .and_then(|_| writer.flush())
        .map_err(|e| GeomError::io(path, e))
}

/// Write `mesh` as OBJ text to any sink
///
/// Vertex colours, when present, are appended to the `v` lines as three
/// floats in `[0,1]`. Faces reference positions, UVs and normals by the same
/// 1-based index since attributes are stored per vertex.
pub fn write_obj_to<W: Write>(mesh: &UnpackedMesh, out: &mut W, name: &str) -> io::Result<()> {
    writeln!(out, "# trama")?;
    writeln!(
        out,
        "# {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    )?;
    writeln!(out, "o {name}")?;

    let colored = mesh.colors.len() == mesh.positions.len() && !mesh.colors.is_empty();
    for (i, p) in mesh.positions.iter().enumerate() {
        if colored {
            let c = mesh.colors[i];
            writeln!(
                out,
                "v {} {} {} {:.4} {:.4} {:.4}",
                p[0],
                p[1],
                p[2],
                c[0] as f32 / 255.0,
                c[1] as f32 / 255.0,
                c[2] as f32 / 255.0
            )?;
        } else {
            writeln!(out, "v {} {} {}", p[0], p[1], p[2])?;
        }
    }

    let has_uvs = mesh.uvs.len() == mesh.positions.len() && !mesh.uvs.is_empty();
    if has_uvs {
        for uv in &mesh.uvs {
            writeln!(out, "vt {} {}", uv[0], uv[1])?;
        }
    }

    for n in &mesh.normals {
        writeln!(out, "vn {} {} {}", n[0], n[1], n[2])?;
    }

    for tri in mesh.triangles() {
        let [a, b, c] = tri.map(|i| i + 1);
        if has_uvs {
            writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
        } else {
            writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }
    }

    Ok(())
}
