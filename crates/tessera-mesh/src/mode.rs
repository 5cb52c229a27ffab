//! How chunk meshes are scheduled and what the host builds from them.

use serde::{Deserialize, Serialize};

/// Where chunk meshes are generated.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ThreadingMode {
    /// Mesh inline, inside the call that requested the rebuild.
    SingleThreaded,
    /// Mesh on the background worker pool.
    #[default]
    MultiThreaded,
}

/// Collider shape the host should build from each chunk mesh.
///
/// Passed through untouched; no colliders are built here.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ColliderKind {
    /// Triangle-mesh collider from the chunk mesh.
    #[default]
    Concave,
    /// Convex hull of the chunk mesh.
    Convex,
    /// One box per solid voxel.
    Boxes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(ThreadingMode::default(), ThreadingMode::MultiThreaded);
        assert_eq!(ColliderKind::default(), ColliderKind::Concave);
    }

    #[test]
    fn test_serde_uses_variant_names() {
        assert_eq!(
            serde_json::to_string(&ThreadingMode::SingleThreaded).unwrap(),
            "\"SingleThreaded\""
        );
        let kind: ColliderKind = serde_json::from_str("\"Boxes\"").unwrap();
        assert_eq!(kind, ColliderKind::Boxes);
    }
}
