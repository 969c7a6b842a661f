//! Model loading for the interaction scene
//!
//! Decoding is delegated to a `ModelLoader`; the interaction core only needs
//! each part's name and local bounds. `ObjLoader` reads Wavefront OBJ files.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use glam::Vec3;

use crate::config::ModelEntry;

/// One renderable part of a loaded model
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPart {
    pub name: String,
    /// Local-space AABB center
    pub center: Vec3,
    /// Local-space AABB half extents
    pub half_extents: Vec3,
}

impl MeshPart {
    /// Bounds of a flat `[x, y, z, x, y, z, ...]` position buffer
    pub fn from_positions(name: String, positions: &[f32]) -> Option<Self> {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for chunk in positions.chunks_exact(3) {
            let p = Vec3::new(chunk[0], chunk[1], chunk[2]);
            min = min.min(p);
            max = max.max(p);
        }

        if !min.is_finite() || !max.is_finite() {
            return None;
        }

        Some(Self {
            name,
            center: (min + max) * 0.5,
            half_extents: (max - min) * 0.5,
        })
    }
}

/// Source of model geometry
pub trait ModelLoader {
    fn load(&self, entry: &ModelEntry) -> Result<Vec<MeshPart>>;
}

/// Loads OBJ models relative to an asset root
pub struct ObjLoader {
    root: PathBuf,
}

impl ObjLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, entry: &ModelEntry) -> PathBuf {
        self.root.join(&entry.path)
    }
}

impl ModelLoader for ObjLoader {
    fn load(&self, entry: &ModelEntry) -> Result<Vec<MeshPart>> {
        let path = self.resolve(entry);
        load_obj_parts(&path, &entry.name)
    }
}

fn load_obj_parts(path: &Path, fallback_name: &str) -> Result<Vec<MeshPart>> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .with_context(|| format!("loading {}", path.display()))?;

    let parts: Vec<MeshPart> = models
        .iter()
        .enumerate()
        .filter_map(|(i, model)| {
            let name = if model.name.is_empty() {
                format!("{fallback_name}#{i}")
            } else {
                model.name.clone()
            };
            MeshPart::from_positions(name, &model.mesh.positions)
        })
        .collect();

    if parts.is_empty() {
        bail!("{} contains no mesh geometry", path.display());
    }
    Ok(parts)
}
