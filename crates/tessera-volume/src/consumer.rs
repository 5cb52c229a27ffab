//! Hand-off of finished chunk meshes to the host's renderer and physics.

use glam::{IVec3, Vec3};
use tessera_mesh::ColliderKind;

use crate::chunk::MeshSnapshot;
use crate::settings::MaterialHandle;

/// A chunk mesh ready to be turned into GPU geometry and a collider.
#[derive(Clone, Debug)]
pub struct ReadyMesh {
    pub chunk_index: IVec3,
    /// Chunk minimum corner relative to the volume origin.
    pub world_position: Vec3,
    pub snapshot: MeshSnapshot,
    pub material: Option<MaterialHandle>,
    pub collider: ColliderKind,
}

/// Receives meshes from [`Volume::deliver_ready`](crate::Volume::deliver_ready).
///
/// Implementors rebuild render geometry (normals included) and the collision
/// shape named by [`ReadyMesh::collider`]. An empty mesh means the chunk's
/// previous geometry should be cleared.
pub trait MeshConsumer {
    fn apply_mesh(&mut self, ready: ReadyMesh);
}

impl MeshConsumer for Vec<ReadyMesh> {
    fn apply_mesh(&mut self, ready: ReadyMesh) {
        self.push(ready);
    }
}
