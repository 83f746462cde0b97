//! Point relevance strategies
//!
//! Decide which anchors contribute to the gradient at a given pixel:
//! - `All`: every anchor, everywhere
//! - `Nearest`: the K anchors closest to the pixel
//! - `Voronoi`: the Delaunay 1-ring around the anchor nearest the pixel,
//!   an approximation of its natural neighbors

mod delaunay;


pub use delaunay::Triangulation;

use serde::{Deserialize, Serialize};

use crate::anchors::{AnchorPoint, AnchorTable, Point};
use crate::error::{GradientError, Result};

/// Which anchors are relevant for a pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointStrategy {
    /// Every anchor contributes to every pixel
    #[default]
    All,

    /// Only the `count` nearest anchors contribute
    Nearest { count: usize },

    /// Anchors of the Delaunay triangles around the nearest anchor
    Voronoi,
}

impl PointStrategy {
    pub fn validate(&self) -> Result<()> {
        match self {
            PointStrategy::Nearest { count: 0 } => Err(GradientError::invalid(
                "nearest.count",
                "must select at least one anchor",
            )),
            _ => Ok(()),
        }
    }
}

/// A relevance strategy bound to an anchor table.
///
/// Owns the table so the anchor set and any derived structure are always
/// swapped together.
#[derive(Debug, Clone)]
pub struct RelevanceSelector {
    strategy: PointStrategy,
    table: AnchorTable,
    triangulation: Option<(u64, Triangulation)>,
}

impl Default for RelevanceSelector {
    fn default() -> Self {
        Self::new(PointStrategy::default())
    }
}

impl RelevanceSelector {
    pub fn new(strategy: PointStrategy) -> Self {
        Self {
            strategy,
            table: AnchorTable::new(),
            triangulation: None,
        }
    }

    pub fn strategy(&self) -> PointStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: PointStrategy) {
        self.strategy = strategy;
        self.refresh();
    }

    /// Install a new anchor set, rebuilding derived state if needed.
    pub fn set_anchors(&mut self, table: AnchorTable) {
        self.table = table;
        self.refresh();
    }

    pub fn table(&self) -> &AnchorTable {
        &self.table
    }

    pub fn anchors(&self) -> &[AnchorPoint] {
        self.table.anchors()
    }

    /// Cached triangulation, present for the Voronoi strategy with at least
    /// three anchors.
    pub fn triangulation(&self) -> Option<&Triangulation> {
        self.triangulation.as_ref().map(|(_, t)| t)
    }

    fn refresh(&mut self) {
        if self.strategy != PointStrategy::Voronoi || self.table.len() < 3 {
            self.triangulation = None;
            return;
        }

        let version = self.table.version();
        if matches!(self.triangulation, Some((cached, _)) if cached == version) {
            return;
        }

        let positions: Vec<Point> = self.table.anchors().iter().map(|a| a.position).collect();
        let triangulation = Triangulation::build(&positions);
        log::debug!(
            "Triangulated {} anchors into {} triangles",
            positions.len(),
            triangulation.triangles().len()
        );
        self.triangulation = Some((version, triangulation));
    }

    /// Write the indices of the anchors relevant for `point` into `out`.
    ///
    /// `out` is cleared first; reusing it across pixels avoids allocations.
    pub fn relevant_indices(&self, point: Point, out: &mut Vec<usize>) {
        out.clear();
        let anchors = self.table.anchors();

        match self.strategy {
            PointStrategy::All => out.extend(0..anchors.len()),
            PointStrategy::Nearest { count } => {
                out.extend(0..anchors.len());
                // Stable: equal distances keep insertion order
                out.sort_by(|&a, &b| {
                    let da = point.distance_squared(&anchors[a].position);
                    let db = point.distance_squared(&anchors[b].position);
                    da.total_cmp(&db)
                });
                out.truncate(count);
            }
            PointStrategy::Voronoi => match self.triangulation() {
                Some(triangulation) => voronoi_neighbors(triangulation, point, anchors.len(), out),
                None => out.extend(0..anchors.len()),
            },
        }
    }

    /// Anchors relevant for `point`.
    pub fn relevant_anchors_for(&self, point: Point) -> Vec<AnchorPoint> {
        let mut indices = Vec::new();
        self.relevant_indices(point, &mut indices);
        let anchors = self.table.anchors();
        indices.into_iter().map(|i| anchors[i]).collect()
    }
}

fn voronoi_neighbors(triangulation: &Triangulation, point: Point, total: usize, out: &mut Vec<usize>) {
    let Some(nearest) = triangulation.nearest_vertex(point) else {
        out.extend(0..total);
        return;
    };

    let ring = triangulation.one_ring(nearest);
    if ring.is_empty() {
        // Collinear anchors: no triangles to restrict by
        out.extend(0..total);
        return;
    }

    for vertex in ring {
        out.extend_from_slice(triangulation.vertex_points(vertex));
    }
    out.sort_unstable();
}
