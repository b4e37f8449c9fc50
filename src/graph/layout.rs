//! Fruchterman–Reingold spring layout.
//!
//! Positions start uniformly random in the unit square (seeded), then nodes
//! repel each other and edges pull their endpoints together while a linearly
//! cooling temperature caps each step. The result is centred on the origin and
//! scaled so the largest absolute coordinate is 1.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::DepotGraph;

pub const DEFAULT_LAYOUT_SEED: u64 = 7;

const ITERATIONS: usize = 50;
const THRESHOLD: f64 = 1e-4;
const MIN_DISTANCE: f64 = 0.01;

/// Node positions, indexed like `DepotGraph::nodes`.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphLayout {
    pub positions: Vec<Vector2<f64>>,
}

impl GraphLayout {
    /// `(x, y)` of every node.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.positions.iter().map(|p| (p.x, p.y)).collect()
    }

    /// Each edge as a `(from, to)` segment.
    pub fn segments(&self, graph: &DepotGraph) -> Vec<((f64, f64), (f64, f64))> {
        graph
            .edges
            .iter()
            .map(|&(a, b)| {
                let pa = self.positions[a];
                let pb = self.positions[b];
                ((pa.x, pa.y), (pb.x, pb.y))
            })
            .collect()
    }
}

pub fn spring_layout(graph: &DepotGraph, seed: u64) -> GraphLayout {
    let n = graph.node_count();
    match n {
        0 => return GraphLayout { positions: Vec::new() },
        1 => {
            return GraphLayout {
                positions: vec![Vector2::zeros()],
            };
        }
        _ => {}
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut pos: Vec<Vector2<f64>> = (0..n)
        .map(|_| Vector2::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)))
        .collect();

    let k = (1.0 / n as f64).sqrt();
    let mut t = initial_temperature(&pos);
    let dt = t / (ITERATIONS as f64 + 1.0);

    for _ in 0..ITERATIONS {
        let mut displacement = vec![Vector2::<f64>::zeros(); n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let delta = pos[i] - pos[j];
                let distance = delta.norm().max(MIN_DISTANCE);
                let attraction = if graph.has_edge(i, j) { distance / k } else { 0.0 };
                displacement[i] += delta * (k * k / (distance * distance) - attraction);
            }
        }

        let mut moved = 0.0;
        for i in 0..n {
            let length = displacement[i].norm();
            let length = if length < MIN_DISTANCE { 0.1 } else { length };
            let step = displacement[i] * (t / length);
            pos[i] += step;
            moved += step.norm();
        }

        t -= dt;
        if moved / (n as f64) < THRESHOLD {
            break;
        }
    }

    GraphLayout {
        positions: rescale(pos),
    }
}

fn initial_temperature(pos: &[Vector2<f64>]) -> f64 {
    let (mut min, mut max) = (Vector2::repeat(f64::INFINITY), Vector2::repeat(f64::NEG_INFINITY));
    for p in pos {
        min = min.inf(p);
        max = max.sup(p);
    }
    let extent = max - min;
    extent.x.max(extent.y) * 0.1
}

fn rescale(mut pos: Vec<Vector2<f64>>) -> Vec<Vector2<f64>> {
    let n = pos.len() as f64;
    let center = pos.iter().fold(Vector2::zeros(), |acc, p| acc + p) / n;
    for p in pos.iter_mut() {
        *p -= center;
    }
    let lim = pos
        .iter()
        .map(|p| p.x.abs().max(p.y.abs()))
        .fold(0.0_f64, f64::max);
    if lim > 0.0 {
        for p in pos.iter_mut() {
            *p /= lim;
        }
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_normalized() {
        let g = DepotGraph::toy();
        let layout = spring_layout(&g, DEFAULT_LAYOUT_SEED);
        assert_eq!(layout.positions.len(), 5);

        let max_abs = layout
            .positions
            .iter()
            .map(|p| p.x.abs().max(p.y.abs()))
            .fold(0.0_f64, f64::max);
        assert!((max_abs - 1.0).abs() < 1e-9);

        let sum = layout.positions.iter().fold(Vector2::zeros(), |acc, p| acc + p);
        assert!(sum.norm() < 1e-9);
    }

    #[test]
    fn same_seed_same_layout() {
        let g = DepotGraph::toy();
        assert_eq!(spring_layout(&g, 3), spring_layout(&g, 3));
    }

    #[test]
    fn shape_does_not_depend_on_seed() {
        let g = DepotGraph::toy();
        for seed in [0, 1, 42, u64::MAX] {
            let layout = spring_layout(&g, seed);
            assert_eq!(layout.points().len(), 5);
            assert_eq!(layout.segments(&g).len(), 4);
            assert!(layout.points().iter().all(|(x, y)| x.is_finite() && y.is_finite()));
        }
    }

    #[test]
    fn degenerate_graphs() {
        let empty = DepotGraph::from_edges(&[]);
        assert!(spring_layout(&empty, 1).positions.is_empty());

        let single = DepotGraph::from_edges(&[("A", "A")]);
        assert_eq!(spring_layout(&single, 1).positions, vec![Vector2::zeros()]);
    }
}
