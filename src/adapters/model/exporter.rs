//! Reference export backend for the offline model
//!
//! Writes binary/ASCII STL, OBJ and an archive (JSON snapshot of the model).
//! 3MF and STEP are not implemented and fail per target.

use super::document::GeometryStore;
use super::mesh::Mesh;
use crate::adapters::host::{ExportBackend, ExportRequest};
use crate::domain::errors::ExportFailure;
use crate::domain::job::ExportFormat;
use async_trait::async_trait;
use std::fmt::Write as _;

/// Export backend reading from a document's [`GeometryStore`]
#[derive(Debug, Clone)]
pub struct ModelExporter {
    geometry: GeometryStore,
}

impl ModelExporter {
    /// Create an exporter over the given geometry
    pub fn new(geometry: GeometryStore) -> Self {
        Self { geometry }
    }

    async fn encode(&self, request: &ExportRequest) -> Result<Vec<u8>, ExportFailure> {
        let geometry = self.geometry.read().await;

        if request.format == ExportFormat::Archive {
            return serde_json::to_vec_pretty(&geometry.snapshot)
                .map_err(|e| ExportFailure::Backend(format!("archive serialization failed: {e}")));
        }

        let solids = geometry
            .solids(request.target)
            .ok_or_else(|| ExportFailure::InvalidTarget(request.target.to_string()))?;

        let mut mesh = Mesh::default();
        for solid in &solids {
            mesh.merge(&Mesh::from_box(solid, request.refinement));
        }
        if mesh.is_empty() {
            return Err(ExportFailure::EmptyGeometry(request.target_name.clone()));
        }
        let mesh = mesh.in_unit(request.unit);

        match request.format {
            ExportFormat::StlBinary | ExportFormat::StlAscii if request.binary => {
                Ok(encode_binary_stl(&mesh, &request.target_name))
            }
            ExportFormat::StlBinary | ExportFormat::StlAscii => {
                Ok(encode_ascii_stl(&mesh, &request.target_name).into_bytes())
            }
            ExportFormat::Obj => Ok(encode_obj(&mesh, &request.target_name).into_bytes()),
            other => Err(ExportFailure::UnsupportedFormat(other.label().to_string())),
        }
    }
}

#[async_trait]
impl ExportBackend for ModelExporter {
    async fn export(&self, request: &ExportRequest) -> Result<(), ExportFailure> {
        if !self.supports(request.format) {
            return Err(ExportFailure::UnsupportedFormat(
                request.format.label().to_string(),
            ));
        }

        let bytes = self.encode(request).await?;

        tokio::fs::write(&request.path, &bytes)
            .await
            .map_err(|e| ExportFailure::io(&request.path, e))?;

        tracing::trace!(
            path = %request.path.display(),
            bytes = bytes.len(),
            format = %request.format,
            "File written"
        );
        Ok(())
    }

    fn supports(&self, format: ExportFormat) -> bool {
        !matches!(format, ExportFormat::ThreeMf | ExportFormat::Step)
    }
}

/// Binary STL: 80-byte header, u32 triangle count, 50 bytes per facet
pub fn encode_binary_stl(mesh: &Mesh, name: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(84 + mesh.triangle_count() * 50);

    let header = format!("binary STL: {name}");
    let header = header.as_bytes();
    buf.extend_from_slice(&header[..header.len().min(80)]);
    buf.resize(80, 0u8);

    buf.extend_from_slice(&(mesh.triangle_count() as u32).to_le_bytes());

    for tri in &mesh.triangles {
        for component in mesh.normal(tri) {
            buf.extend_from_slice(&(component as f32).to_le_bytes());
        }
        for &index in tri {
            for coordinate in mesh.vertices[index as usize] {
                buf.extend_from_slice(&(coordinate as f32).to_le_bytes());
            }
        }
        // attribute byte count
        buf.extend_from_slice(&0u16.to_le_bytes());
    }

    buf
}

/// ASCII STL
pub fn encode_ascii_stl(mesh: &Mesh, name: &str) -> String {
    let mut out = String::with_capacity(mesh.triangle_count() * 260);
    let _ = writeln!(out, "solid {name}");

    for tri in &mesh.triangles {
        let [nx, ny, nz] = mesh.normal(tri);
        let _ = writeln!(out, "  facet normal {nx} {ny} {nz}");
        out.push_str("    outer loop\n");
        for &index in tri {
            let [x, y, z] = mesh.vertices[index as usize];
            let _ = writeln!(out, "      vertex {x} {y} {z}");
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    let _ = writeln!(out, "endsolid {name}");
    out
}

/// Wavefront OBJ with one-based face indices
pub fn encode_obj(mesh: &Mesh, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "o {name}");
    for [x, y, z] in &mesh.vertices {
        let _ = writeln!(out, "v {x} {y} {z}");
    }
    for [a, b, c] in &mesh.triangles {
        let _ = writeln!(out, "f {} {} {}", a + 1, b + 1, c + 1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::model::ModelDocument;
    use crate::domain::ids::TargetHandle;
    use crate::domain::job::{LengthUnit, MeshRefinement};
    use tempfile::TempDir;

    fn document() -> ModelDocument {
        ModelDocument::from_model(
            serde_json::from_str(
                r#"{
                    "name": "plate",
                    "parameters": [{"name": "width", "expression": "10"}],
                    "bodies": [
                        {"name": "Plate", "width": "width", "depth": "10", "height": "1"},
                        {"name": "Flat", "width": "width", "depth": "0", "height": "1"}
                    ]
                }"#,
            )
            .unwrap(),
        )
        .unwrap()
    }

    fn request(dir: &TempDir, format: ExportFormat, target: TargetHandle) -> ExportRequest {
        ExportRequest {
            format,
            target,
            target_name: "Plate".to_string(),
            path: dir.path().join(format!("out{}", format.extension())),
            unit: LengthUnit::Mm,
            refinement: MeshRefinement::Low,
            binary: format.is_binary(),
        }
    }

    #[tokio::test]
    async fn test_binary_stl_layout() {
        let dir = TempDir::new().unwrap();
        let exporter = ModelExporter::new(document().geometry());
        let request = request(&dir, ExportFormat::StlBinary, TargetHandle::body(0));

        exporter.export(&request).await.unwrap();

        let bytes = std::fs::read(&request.path).unwrap();
        assert_eq!(bytes.len(), 84 + 12 * 50);
        assert!(bytes.starts_with(b"binary STL: Plate"));
        assert_eq!(u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]), 12);
    }

    #[tokio::test]
    async fn test_ascii_stl_and_obj() {
        let dir = TempDir::new().unwrap();
        let exporter = ModelExporter::new(document().geometry());

        let stl = request(&dir, ExportFormat::StlAscii, TargetHandle::body(0));
        exporter.export(&stl).await.unwrap();
        let text = std::fs::read_to_string(&stl.path).unwrap();
        assert!(text.starts_with("solid Plate\n"));
        assert!(text.trim_end().ends_with("endsolid Plate"));
        assert_eq!(text.matches("facet normal").count(), 12);

        let obj = request(&dir, ExportFormat::Obj, TargetHandle::body(0));
        exporter.export(&obj).await.unwrap();
        let text = std::fs::read_to_string(&obj.path).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 12);
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 24);
    }

    #[tokio::test]
    async fn test_unit_scales_coordinates() {
        let dir = TempDir::new().unwrap();
        let exporter = ModelExporter::new(document().geometry());
        let mut request = request(&dir, ExportFormat::Obj, TargetHandle::body(0));
        request.unit = LengthUnit::Cm;

        exporter.export(&request).await.unwrap();

        let text = std::fs::read_to_string(&request.path).unwrap();
        assert!(text.lines().any(|l| l == "v 1 1 0.1"));
    }

    #[tokio::test]
    async fn test_archive_is_model_snapshot() {
        let dir = TempDir::new().unwrap();
        let exporter = ModelExporter::new(document().geometry());
        let request = request(&dir, ExportFormat::Archive, TargetHandle::body(0));

        exporter.export(&request).await.unwrap();

        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&request.path).unwrap()).unwrap();
        assert_eq!(json["name"], "plate");
        assert_eq!(json["parameters"][0]["expression"], "10");
    }

    #[tokio::test]
    async fn test_per_target_failures() {
        let dir = TempDir::new().unwrap();
        let exporter = ModelExporter::new(document().geometry());

        let step = request(&dir, ExportFormat::Step, TargetHandle::body(0));
        assert!(matches!(
            exporter.export(&step).await,
            Err(ExportFailure::UnsupportedFormat(_))
        ));
        assert!(!exporter.supports(ExportFormat::ThreeMf));

        let missing = request(&dir, ExportFormat::StlBinary, TargetHandle::component(3));
        assert!(matches!(
            exporter.export(&missing).await,
            Err(ExportFailure::InvalidTarget(_))
        ));

        let flat = request(&dir, ExportFormat::StlBinary, TargetHandle::body(1));
        assert!(matches!(
            exporter.export(&flat).await,
            Err(ExportFailure::EmptyGeometry(_))
        ));

        let mut unwritable = request(&dir, ExportFormat::StlBinary, TargetHandle::body(0));
        unwritable.path = dir.path().join("missing-dir").join("out.stl");
        assert!(matches!(
            exporter.export(&unwritable).await,
            Err(ExportFailure::Io { .. })
        ));
    }
}
