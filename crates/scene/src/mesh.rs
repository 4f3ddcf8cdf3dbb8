//! Geodesic sphere construction.
//!
//! Start from a regular icosahedron and split every face into four per level,
//! pushing the new midpoints back onto the sphere. Shared edges are keyed by
//! their sorted vertex pair so adjacent faces reuse one midpoint.

use std::collections::{HashMap, HashSet};

use foundation::math::{Vec3, normalize};

/// Undirected edge stored with `a < b`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

impl Edge {
    pub fn new(u: usize, v: usize) -> Self {
        Self {
            a: u.min(v),
            b: u.max(v),
        }
    }
}

/// Immutable geodesic mesh, shared read-only by every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GeodesicMesh {
    radius: f64,
    vertices: Vec<Vec3>,
    edges: Vec<Edge>,
    faces: Vec<[usize; 3]>,
}

impl GeodesicMesh {
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// `10 * 4^depth + 2`.
    pub fn expected_vertex_count(depth: u32) -> usize {
        10 * 4usize.pow(depth) + 2
    }

    /// `30 * 4^depth`.
    pub fn expected_edge_count(depth: u32) -> usize {
        30 * 4usize.pow(depth)
    }
}

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

fn icosahedron_vertices(radius: f64) -> Vec<Vec3> {
    let phi = (1.0 + 5.0_f64.sqrt()) * 0.5;
    [
        Vec3::new(-1.0, phi, 0.0),
        Vec3::new(1.0, phi, 0.0),
        Vec3::new(-1.0, -phi, 0.0),
        Vec3::new(1.0, -phi, 0.0),
        Vec3::new(0.0, -1.0, phi),
        Vec3::new(0.0, 1.0, phi),
        Vec3::new(0.0, -1.0, -phi),
        Vec3::new(0.0, 1.0, -phi),
        Vec3::new(phi, 0.0, -1.0),
        Vec3::new(phi, 0.0, 1.0),
        Vec3::new(-phi, 0.0, -1.0),
        Vec3::new(-phi, 0.0, 1.0),
    ]
    .into_iter()
    .map(|v| v.scale(radius / v.length()))
    .collect()
}

struct Subdivider {
    radius: f64,
    vertices: Vec<Vec3>,
    midpoints: HashMap<Edge, usize>,
}

impl Subdivider {
    fn midpoint(&mut self, u: usize, v: usize) -> usize {
        let key = Edge::new(u, v);
        if let Some(&idx) = self.midpoints.get(&key) {
            return idx;
        }
        let mid = self.vertices[u].midpoint(self.vertices[v]);
        // Adjacent icosphere vertices are never antipodal, so the midpoint is non-zero.
        let on_sphere = normalize(mid, self.radius).unwrap_or(mid);
        let idx = self.vertices.len();
        self.vertices.push(on_sphere);
        self.midpoints.insert(key, idx);
        idx
    }

    fn split(&mut self, faces: &[[usize; 3]]) -> Vec<[usize; 3]> {
        let mut next = Vec::with_capacity(faces.len() * 4);
        for &[a, b, c] in faces {
            let ab = self.midpoint(a, b);
            let bc = self.midpoint(b, c);
            let ca = self.midpoint(c, a);
            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }
        next
    }
}

fn unique_edges(faces: &[[usize; 3]]) -> Vec<Edge> {
    let mut seen = HashSet::with_capacity(faces.len() * 3 / 2);
    let mut edges = Vec::with_capacity(faces.len() * 3 / 2);
    for &[a, b, c] in faces {
        for edge in [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)] {
            if seen.insert(edge) {
                edges.push(edge);
            }
        }
    }
    edges
}

/// Builds a geodesic sphere of the given radius.
///
/// Vertex and edge order is a pure function of `depth`, so two calls with the
/// same arguments produce identical meshes.
pub fn build_geodesic_sphere(radius: f64, depth: u32) -> GeodesicMesh {
    let mut subdivider = Subdivider {
        radius,
        vertices: icosahedron_vertices(radius),
        midpoints: HashMap::new(),
    };

    let mut faces = ICOSAHEDRON_FACES.to_vec();
    for _ in 0..depth {
        faces = subdivider.split(&faces);
        // Midpoints are only shared between faces of the same level.
        subdivider.midpoints.clear();
    }

    let edges = unique_edges(&faces);
    GeodesicMesh {
        radius,
        vertices: subdivider.vertices,
        edges,
        faces,
    }
}

#[cfg(test)]
mod tests {
    use super::{Edge, GeodesicMesh, build_geodesic_sphere};
    use std::collections::HashSet;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn icosahedron_counts() {
        let mesh = build_geodesic_sphere(100.0, 0);
        assert_eq!(mesh.vertices().len(), 12);
        assert_eq!(mesh.edges().len(), 30);
        assert_eq!(mesh.faces().len(), 20);
        for v in mesh.vertices() {
            assert_close(v.length(), 100.0, 1e-9);
        }
    }

    #[test]
    fn one_subdivision_counts() {
        let mesh = build_geodesic_sphere(100.0, 1);
        assert_eq!(mesh.vertices().len(), 42);
        assert_eq!(mesh.edges().len(), 120);
        assert_eq!(mesh.faces().len(), 80);
    }

    #[test]
    fn counts_follow_closed_form() {
        for depth in 0..=3 {
            let mesh = build_geodesic_sphere(1.0, depth);
            assert_eq!(
                mesh.vertices().len(),
                GeodesicMesh::expected_vertex_count(depth)
            );
            assert_eq!(mesh.edges().len(), GeodesicMesh::expected_edge_count(depth));
        }
    }

    #[test]
    fn is_deterministic() {
        let a = build_geodesic_sphere(42.0, 2);
        let b = build_geodesic_sphere(42.0, 2);
        assert_eq!(a, b);
    }

    #[test]
    fn edges_are_unique_and_canonical() {
        let mesh = build_geodesic_sphere(10.0, 2);
        let mut seen = HashSet::new();
        for &edge in mesh.edges() {
            assert!(edge.a < edge.b, "non-canonical edge {edge:?}");
            assert!(seen.insert(edge), "duplicate edge {edge:?}");
            assert!(!seen.contains(&Edge { a: edge.b, b: edge.a }));
        }
    }

    #[test]
    fn vertices_lie_on_sphere() {
        let radius = 250.0;
        let mesh = build_geodesic_sphere(radius, 3);
        for v in mesh.vertices() {
            assert_close(v.length(), radius, radius * 1e-6);
        }
    }

    #[test]
    fn every_edge_endpoint_exists() {
        let mesh = build_geodesic_sphere(1.0, 1);
        let n = mesh.vertices().len();
        assert!(mesh.edges().iter().all(|e| e.a < n && e.b < n));
    }
}
