//! CPU-side mesh and point-cloud generation.

use std::f32::consts::{PI, TAU};

use rand::Rng;

use crate::config::{ParticleConfig, StarfieldConfig};

/// Indexed triangle mesh with flat attribute arrays.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// xyz triples.
    pub positions: Vec<f32>,
    /// uv pairs.
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Replace the UVs with a planar projection of x/y: `uv = xy / scale + 0.5`.
    pub fn remap_uvs_planar(&mut self, scale: f32) {
        self.uvs = self
            .positions
            .chunks_exact(3)
            .flat_map(|p| [p[0] / scale + 0.5, p[1] / scale + 0.5])
            .collect();
    }
}

/// UV sphere centred on the origin, poles on the Y axis.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut mesh = Mesh::default();
    let mut grid = Vec::with_capacity(hs as usize + 1);
    let mut index = 0u32;

    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        // Pole rows get a half-step u offset so their texels line up.
        let u_offset = match iy {
            0 => 0.5 / ws as f32,
            _ if iy == hs => -0.5 / ws as f32,
            _ => 0.0,
        };
        let mut row = Vec::with_capacity(ws as usize + 1);
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let (sin_t, cos_t) = (v * PI).sin_cos();
            let (sin_p, cos_p) = (u * TAU).sin_cos();
            mesh.positions
                .extend_from_slice(&[-radius * cos_p * sin_t, radius * cos_t, radius * sin_p * sin_t]);
            mesh.uvs.extend_from_slice(&[u + u_offset, 1.0 - v]);
            row.push(index);
            index += 1;
        }
        grid.push(row);
    }

    for iy in 0..hs as usize {
        for ix in 0..ws as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs as usize - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

/// Flat annulus in the XY plane.
pub fn ring(inner: f32, outer: f32, theta_segments: u32, phi_segments: u32) -> Mesh {
    let ts = theta_segments.max(3);
    let ps = phi_segments.max(1);
    let step = (outer - inner) / ps as f32;
    let mut mesh = Mesh::default();

    for j in 0..=ps {
        let radius = inner + step * j as f32;
        for i in 0..=ts {
            let (sin, cos) = (i as f32 / ts as f32 * TAU).sin_cos();
            let (x, y) = (radius * cos, radius * sin);
            mesh.positions.extend_from_slice(&[x, y, 0.0]);
            mesh.uvs
                .extend_from_slice(&[(x / outer + 1.0) / 2.0, (y / outer + 1.0) / 2.0]);
        }
    }

    for j in 0..ps {
        let level = j * (ts + 1);
        for i in 0..ts {
            let a = level + i;
            let b = a + ts + 1;
            let c = a + ts + 2;
            let d = a + 1;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    mesh
}

/// Points scattered in a thin band around the Y axis (xyz triples).
pub fn particle_ring<R: Rng>(rng: &mut R, cfg: &ParticleConfig) -> Vec<f32> {
    let mut out = Vec::with_capacity(cfg.count * 3);
    for _ in 0..cfg.count {
        let theta = rng.gen::<f32>() * TAU;
        let radius = cfg.min_radius + rng.gen::<f32>() * cfg.radial_spread;
        let y = (rng.gen::<f32>() - 0.5) * cfg.thickness;
        out.extend_from_slice(&[theta.cos() * radius, y, theta.sin() * radius]);
    }
    out
}

/// Points uniformly filling a cube centred on the origin (xyz triples).
pub fn starfield<R: Rng>(rng: &mut R, cfg: &StarfieldConfig) -> Vec<f32> {
    (0..cfg.count * 3)
        .map(|_| (rng.gen::<f32>() - 0.5) * cfg.extent)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mesh = sphere(1.0, 64, 64);
        assert_eq!(mesh.vertex_count(), 65 * 65);
        assert_eq!(mesh.uvs.len(), 65 * 65 * 2);
        for p in mesh.positions.chunks_exact(3) {
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((r - 1.0).abs() < 1e-5);
        }
        // Pole rows contribute one triangle per quad instead of two.
        assert_eq!(mesh.indices.len(), (64 * 64 * 2 - 2 * 64) * 3);
        let max = *mesh.indices.iter().max().unwrap() as usize;
        assert!(max < mesh.vertex_count());
    }

    #[test]
    fn ring_spans_inner_to_outer() {
        let mesh = ring(1.05, 3.8, 128, 1);
        assert_eq!(mesh.vertex_count(), 2 * 129);
        assert_eq!(mesh.indices.len(), 128 * 6);
        for p in mesh.positions.chunks_exact(3) {
            let r = (p[0] * p[0] + p[1] * p[1]).sqrt();
            assert!(r > 1.05 - 1e-4 && r < 3.8 + 1e-4);
            assert_eq!(p[2], 0.0);
        }
    }

    #[test]
    fn planar_uv_remap_centres_on_half() {
        let mut mesh = ring(1.05, 3.8, 16, 1);
        mesh.remap_uvs_planar(8.0);
        assert_eq!(mesh.uvs.len(), mesh.vertex_count() * 2);
        for (p, uv) in mesh.positions.chunks_exact(3).zip(mesh.uvs.chunks_exact(2)) {
            assert!((uv[0] - (p[0] / 8.0 + 0.5)).abs() < 1e-6);
            assert!((uv[1] - (p[1] / 8.0 + 0.5)).abs() < 1e-6);
            assert!(uv[0] > 0.0 && uv[0] < 1.0);
        }
    }

    #[test]
    fn particles_stay_in_their_band() {
        let cfg = ParticleConfig::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let pts = particle_ring(&mut rng, &cfg);
        assert_eq!(pts.len(), cfg.count * 3);
        for p in pts.chunks_exact(3) {
            let r = (p[0] * p[0] + p[2] * p[2]).sqrt();
            assert!(r >= 2.5 - 1e-4 && r <= 4.5 + 1e-4);
            assert!(p[1].abs() <= 0.1);
        }
    }

    #[test]
    fn stars_fill_the_cube() {
        let cfg = StarfieldConfig::default();
        let mut rng = SmallRng::seed_from_u64(11);
        let pts = starfield(&mut rng, &cfg);
        assert_eq!(pts.len(), 9000);
        assert!(pts.iter().all(|c| c.abs() <= 100.0));
        assert!(pts.iter().any(|c| c.abs() > 50.0));
    }
}
