//! Delaunay triangulation over integer anchor positions
//!
//! Incremental Bowyer-Watson. The convex hull is closed off with ghost
//! triangles that share a single vertex at infinity. All
//! predicates are exact over the full `i32` coordinate range: orientation
//! fits in `i128`, the in-circle determinant is evaluated in 256 bits.

use crate::anchors::Point;

type Vertex = [i64; 2];

/// Vertex index standing for the point at infinity in ghost triangles.
const GHOST: usize = usize::MAX;

/// Delaunay triangulation of a point set.
///
/// Duplicate input positions share one vertex; [`Triangulation::vertex_points`]
/// lists every input index that landed on a vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangulation {
    vertices: Vec<Vertex>,
    vertex_points: Vec<Vec<usize>>,
    triangles: Vec<[usize; 3]>,
    incident: Vec<Vec<usize>>,
}

/// Twice the signed area of (a, b, c); positive when counter-clockwise.
#[inline]
fn orient(a: Vertex, b: Vertex, c: Vertex) -> i128 {
    let abx = (b[0] - a[0]) as i128;
    let aby = (b[1] - a[1]) as i128;
    let acx = (c[0] - a[0]) as i128;
    let acy = (c[1] - a[1]) as i128;
    abx * acy - aby * acx
}

/// Signed 256-bit integer `hi * 2^128 + lo`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Wide {
    hi: i128,
    lo: u128,
}

impl Wide {
    fn product(a: i128, b: i128) -> Self {
        const MASK: u128 = u64::MAX as u128;
        let (ua, ub) = (a.unsigned_abs(), b.unsigned_abs());
        let (a1, a0) = (ua >> 64, ua & MASK);
        let (b1, b0) = (ub >> 64, ub & MASK);

        let low = a0 * b0;
        let cross_a = a1 * b0;
        let cross_b = a0 * b1;
        let mid = (low >> 64) + (cross_a & MASK) + (cross_b & MASK);
        let lo = (low & MASK) | (mid << 64);
        let hi = a1 * b1 + (cross_a >> 64) + (cross_b >> 64) + (mid >> 64);

        let magnitude = Wide {
            hi: hi as i128,
            lo,
        };
        if (a < 0) != (b < 0) {
            magnitude.negate()
        } else {
            magnitude
        }
    }

    fn negate(self) -> Self {
        Wide {
            hi: (!self.hi).wrapping_add(i128::from(self.lo == 0)),
            lo: (!self.lo).wrapping_add(1),
        }
    }

    fn add(self, other: Self) -> Self {
        let (lo, carry) = self.lo.overflowing_add(other.lo);
        Wide {
            hi: self.hi + other.hi + i128::from(carry),
            lo,
        }
    }

    fn is_positive(self) -> bool {
        self.hi > 0 || (self.hi == 0 && self.lo > 0)
    }
}

/// Whether `d` lies strictly inside the circumcircle of the
/// counter-clockwise triangle (a, b, c).
#[inline]
fn in_circumcircle(a: Vertex, b: Vertex, c: Vertex, d: Vertex) -> bool {
    let adx = (a[0] - d[0]) as i128;
    let ady = (a[1] - d[1]) as i128;
    let bdx = (b[0] - d[0]) as i128;
    let bdy = (b[1] - d[1]) as i128;
    let cdx = (c[0] - d[0]) as i128;
    let cdy = (c[1] - d[1]) as i128;

    let ad = adx * adx + ady * ady;
    let bd = bdx * bdx + bdy * bdy;
    let cd = cdx * cdx + cdy * cdy;

    Wide::product(ad, bdx * cdy - cdx * bdy)
        .add(Wide::product(bd, adx * cdy - cdx * ady).negate())
        .add(Wide::product(cd, adx * bdy - bdx * ady))
        .is_positive()
}

/// Whether `p` lies strictly inside the segment from `a` to `b`, given the
/// three are collinear.
#[inline]
fn strictly_between(a: Vertex, b: Vertex, p: Vertex) -> bool {
    let dot = |from: Vertex, to: Vertex| {
        (p[0] - from[0]) as i128 * (to[0] - from[0]) as i128
            + (p[1] - from[1]) as i128 * (to[1] - from[1]) as i128
    };
    dot(a, b) > 0 && dot(b, a) > 0
}

/// Circumdisk test that also covers ghost triangles `[u, v, GHOST]`.
///
/// A ghost's disk is the open half-plane left of `u -> v` (outside the
/// hull) plus the open hull edge itself.
fn conflicts(vertices: &[Vertex], tri: [usize; 3], p: Vertex) -> bool {
    if tri[2] == GHOST {
        let (u, v) = (vertices[tri[0]], vertices[tri[1]]);
        match orient(u, v, p) {
            side if side > 0 => true,
            0 => strictly_between(u, v, p),
            _ => false,
        }
    } else {
        in_circumcircle(
            vertices[tri[0]],
            vertices[tri[1]],
            vertices[tri[2]],
            p,
        )
    }
}

impl Triangulation {
    /// Triangulate `points`. Fewer than three distinct positions, or only
    /// collinear ones, give a triangulation without triangles.
    pub fn build(points: &[Point]) -> Self {
        let mut vertices: Vec<Vertex> = Vec::new();
        let mut vertex_points: Vec<Vec<usize>> = Vec::new();
        for (index, point) in points.iter().enumerate() {
            let vertex = [point.x as i64, point.y as i64];
            match vertices.iter().position(|v| *v == vertex) {
                Some(existing) => vertex_points[existing].push(index),
                None => {
                    vertices.push(vertex);
                    vertex_points.push(vec![index]);
                }
            }
        }

        let triangles = if vertices.len() >= 3 {
            bowyer_watson(&vertices)
        } else {
            Vec::new()
        };

        let mut incident = vec![Vec::new(); vertices.len()];
        for (t, triangle) in triangles.iter().enumerate() {
            for &v in triangle {
                incident[v].push(t);
            }
        }

        Self {
            vertices,
            vertex_points,
            triangles,
            incident,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Triangles as counter-clockwise vertex index triples.
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    /// Input indices sharing vertex `vertex`.
    pub fn vertex_points(&self, vertex: usize) -> &[usize] {
        &self.vertex_points[vertex]
    }

    /// Vertex nearest to `point` (linear scan, first wins on ties).
    pub fn nearest_vertex(&self, point: Point) -> Option<usize> {
        let query = [point.x as i64, point.y as i64];
        self.vertices
            .iter()
            .enumerate()
            .min_by_key(|(index, v)| {
                let dx = (v[0] - query[0]) as i128;
                let dy = (v[1] - query[1]) as i128;
                (dx * dx + dy * dy, *index)
            })
            .map(|(index, _)| index)
    }

    /// Vertices of every triangle incident to `vertex`, including itself.
    ///
    /// Sorted ascending; empty when the vertex belongs to no triangle.
    pub fn one_ring(&self, vertex: usize) -> Vec<usize> {
        let mut ring: Vec<usize> = self.incident[vertex]
            .iter()
            .flat_map(|&t| self.triangles[t])
            .collect();
        ring.sort_unstable();
        ring.dedup();
        ring
    }
}

fn bowyer_watson(vertices: &[Vertex]) -> Vec<[usize; 3]> {
    let Some(third) = (2..vertices.len())
        .find(|&k| orient(vertices[0], vertices[1], vertices[k]) != 0)
    else {
        return Vec::new();
    };

    let seed = if orient(vertices[0], vertices[1], vertices[third]) > 0 {
        [0, 1, third]
    } else {
        [1, 0, third]
    };
    // Real triangles are counter-clockwise, ghosts carry their hull edge
    // reversed so the outside is on the left
    let mut triangles: Vec<[usize; 3]> = vec![
        seed,
        [seed[1], seed[0], GHOST],
        [seed[2], seed[1], GHOST],
        [seed[0], seed[2], GHOST],
    ];
    let mut bad: Vec<usize> = Vec::new();
    let mut boundary: Vec<(usize, usize)> = Vec::new();

    for p in (2..vertices.len()).filter(|&p| p != third) {
        let vertex = vertices[p];
        bad.clear();
        for (t, &tri) in triangles.iter().enumerate() {
            if conflicts(vertices, tri, vertex) {
                bad.push(t);
            }
        }

        // Cavity boundary: edges of bad triangles not shared with another
        // bad triangle (a shared edge appears reversed in its neighbor)
        boundary.clear();
        for &t in &bad {
            let tri = triangles[t];
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let shared = bad.iter().any(|&other| {
                    other != t && {
                        let o = triangles[other];
                        [(o[0], o[1]), (o[1], o[2]), (o[2], o[0])].contains(&(b, a))
                    }
                });
                if !shared {
                    boundary.push((a, b));
                }
            }
        }

        let mut t = 0;
        let mut bad_index = 0;
        triangles.retain(|_| {
            let keep = !(bad_index < bad.len() && bad[bad_index] == t);
            if !keep {
                bad_index += 1;
            }
            t += 1;
            keep
        });

        for &(a, b) in &boundary {
            // Keep the ghost vertex last, rotating preserves orientation
            triangles.push(match (a, b) {
                (GHOST, _) => [b, p, GHOST],
                (_, GHOST) => [p, a, GHOST],
                _ => [a, b, p],
            });
        }
    }

    triangles.retain(|tri| tri[2] != GHOST);
    triangles
}
