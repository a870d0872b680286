use std::path::Path;

use anyhow::Context;
use glam::DVec3;

/// Triangle mesh as handed over by the host: positions and per-face
/// vertex-index triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<DVec3>,
    faces: Vec<[usize; 3]>,
}

impl Mesh {
    /// Builds a mesh without checking the topology.
    pub fn new(vertices: Vec<DVec3>, faces: Vec<[usize; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Builds a mesh, rejecting faces that reference missing vertices.
    pub fn try_new(vertices: Vec<DVec3>, faces: Vec<[usize; 3]>) -> anyhow::Result<Self> {
        let vertex_count = vertices.len();
        for (i, face) in faces.iter().enumerate() {
            if let Some(index) = face.iter().find(|&&index| index >= vertex_count) {
                anyhow::bail!(
                    "face {} references vertex {} but mesh has {} vertices",
                    i,
                    index,
                    vertex_count
                );
            }
        }
        Ok(Self::new(vertices, faces))
    }

    pub fn load_obj<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let mut load_options = tobj::LoadOptions::default();
        load_options.triangulate = true;
        load_options.single_index = true;
        let (models, _) = tobj::load_obj(path, &load_options)
            .with_context(|| format!("can't load obj file '{}'", path.display()))?;

        let mut vertices = vec![];
        let mut faces = vec![];
        for model in models {
            let offset = vertices.len();
            vertices.extend(
                model
                    .mesh
                    .positions
                    .chunks_exact(3)
                    .map(|p| DVec3::new(p[0] as f64, p[1] as f64, p[2] as f64)),
            );
            faces.extend(model.mesh.indices.chunks_exact(3).map(|f| {
                [
                    f[0] as usize + offset,
                    f[1] as usize + offset,
                    f[2] as usize + offset,
                ]
            }));
        }

        Self::try_new(vertices, faces)
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_index_is_rejected() {
        let vertices = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        assert!(Mesh::try_new(vertices.clone(), vec![[0, 1, 2]]).is_ok());
        let err = Mesh::try_new(vertices, vec![[0, 1, 3]]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "face 0 references vertex 3 but mesh has 3 vertices"
        );
    }

    #[test]
    fn obj_quads_are_triangulated() {
        let path = std::env::temp_dir().join(format!("quad-{}.obj", std::process::id()));
        std::fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .unwrap();
        let mesh = Mesh::load_obj(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.faces().len(), 2);
        assert_eq!(mesh.vertices()[2], DVec3::new(1.0, 1.0, 0.0));
    }
}
