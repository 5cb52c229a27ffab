//! A [`MeshConsumer`] that stands in for a renderer and only counts.

use tessera_volume::{MeshConsumer, ReadyMesh};

/// Running totals over every mesh delivered to it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeshStats {
    pub meshes: usize,
    pub empty: usize,
    pub degraded: usize,
    pub faces: usize,
    pub vertices: usize,
    pub triangles: usize,
    /// Largest single-chunk vertex count seen.
    pub peak_vertices: usize,
    /// Vertex and index buffer bytes a renderer would upload.
    pub upload_bytes: usize,
}

impl MeshConsumer for MeshStats {
    fn apply_mesh(&mut self, ready: ReadyMesh) {
        let mesh = &ready.snapshot.mesh;
        self.meshes += 1;
        if mesh.is_empty() {
            self.empty += 1;
        }
        if ready.snapshot.degraded {
            self.degraded += 1;
        }
        self.faces += mesh.face_count();
        self.vertices += mesh.vertex_count();
        self.triangles += mesh.triangle_count();
        self.peak_vertices = self.peak_vertices.max(mesh.vertex_count());
        self.upload_bytes +=
            mesh.position_bytes().len() + mesh.color_bytes().len() + mesh.index_bytes().len();

        tracing::trace!(
            chunk = ?ready.chunk_index,
            position = ?ready.world_position,
            faces = mesh.face_count(),
            collider = ?ready.collider,
            "chunk mesh applied"
        );
    }
}
