//! Deformable background grid
//!
//! A lattice of point-masses joined by pull-only springs. Border points and
//! every third row/column are tied to immovable anchor twins, so the mesh
//! bends under force and then settles back into place.
//!
//! Each update runs in two phases: every spring computes its force from the
//! positions at the start of the frame, and only then does any point-mass
//! integrate. The result does not depend on how rayon schedules the work.

use glam::{Vec2, Vec3};
use rayon::prelude::*;

use crate::renderer::colors::GRID;
use crate::renderer::{DrawSink, draw_line};
use crate::{Color, Rect, catmull_rom};

/// Damping a point returns to after every update
const DEFAULT_DAMPING: f32 = 0.98;
/// Springs rest at this fraction of the distance they were built at
const REST_FRACTION: f32 = 0.95;
/// Velocities below this length are flushed to zero
const VELOCITY_EPSILON: f32 = 0.001;
/// Damping multiplier applied by implosive/explosive forces
const FORCE_DAMPING: f32 = 0.6;
/// Camera distance for the z-perturbation projection
const PERSPECTIVE_DEPTH: f32 = 2000.0;

// Mesh springs between neighbors
const MESH_STIFFNESS: f32 = 0.28;
const MESH_DAMPING: f32 = 0.06;
// Border anchors
const BORDER_STIFFNESS: f32 = 0.1;
const BORDER_DAMPING: f32 = 0.1;
// Sparse interior anchors (every 3rd row and column)
const LATTICE_STIFFNESS: f32 = 0.002;
const LATTICE_DAMPING: f32 = 0.02;

/// A node of the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMass {
    pub position: Vec3,
    pub velocity: Vec3,
    /// 0 = immovable
    pub inverse_mass: f32,
    acceleration: Vec3,
    damping: f32,
}

impl PointMass {
    pub fn new(position: Vec3, inverse_mass: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            inverse_mass,
            acceleration: Vec3::ZERO,
            damping: DEFAULT_DAMPING,
        }
    }

    #[inline]
    pub fn apply_force(&mut self, force: Vec3) {
        self.acceleration += force * self.inverse_mass;
    }

    /// Extra damping for this update only
    #[inline]
    pub fn increase_damping(&mut self, factor: f32) {
        self.damping *= factor;
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn update(&mut self) {
        self.velocity += self.acceleration;
        self.position += self.velocity;
        self.acceleration = Vec3::ZERO;
        if self.velocity.length_squared() < VELOCITY_EPSILON * VELOCITY_EPSILON {
            self.velocity = Vec3::ZERO;
        }

        self.velocity *= self.damping;
        self.damping = DEFAULT_DAMPING;
    }
}

/// Spring endpoint: a simulated point or its fixed anchor twin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Point(usize),
    Anchor(usize),
}

/// Pull-only elastic link
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub start: Node,
    pub end: Node,
    pub target_length: f32,
    pub stiffness: f32,
    pub damping: f32,
}

impl Spring {
    /// Force on `end` (the start receives the opposite) given both endpoints.
    /// Zero when the spring is not stretched past its rest length.
    pub fn force(&self, start: &PointMass, end: &PointMass) -> Vec3 {
        let x = start.position - end.position;
        let length = x.length();
        if length <= self.target_length {
            return Vec3::ZERO;
        }

        let x = x / length * (length - self.target_length);
        let dv = end.velocity - start.velocity;
        self.stiffness * x - dv * self.damping
    }
}

/// Force injection requests, deferred until the grid is free to mutate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridForce {
    /// One-shot push along `force`, fading mildly with distance
    Directed { force: Vec3, position: Vec3, radius: f32 },
    /// Pull toward `position`
    Implosive { force: f32, position: Vec3, radius: f32 },
    /// Push away from `position`
    Explosive { force: f32, position: Vec3, radius: f32 },
}

/// A rendered grid segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub start: Vec2,
    pub end: Vec2,
    pub thickness: f32,
}

/// Mass-spring mesh covering the screen
#[derive(Debug, Clone)]
pub struct Grid {
    /// Row-major, `columns * rows`
    points: Vec<PointMass>,
    /// Immovable twins of `points`
    anchors: Vec<PointMass>,
    springs: Vec<Spring>,
    /// Scratch buffer for the force phase, one entry per spring
    spring_forces: Vec<Vec3>,
    columns: usize,
    rows: usize,
    bounds: Rect,
}

impl Grid {
    pub fn new(bounds: Rect, spacing: Vec2) -> Self {
        debug_assert!(spacing.x > 0.0 && spacing.y > 0.0, "grid spacing must be positive");

        let columns = (bounds.size.x / spacing.x) as usize + 1;
        let rows = (bounds.size.y / spacing.y) as usize + 1;

        let points: Vec<PointMass> = (0..rows * columns)
            .into_par_iter()
            .map(|i| {
                let (x, y) = (i % columns, i / columns);
                let p = bounds.min + Vec2::new(x as f32, y as f32) * spacing;
                PointMass::new(p.extend(0.0), 1.0)
            })
            .collect();
        let anchors: Vec<PointMass> = points
            .iter()
            .map(|p| PointMass::new(p.position, 0.0))
            .collect();

        let mut grid = Self {
            points,
            anchors,
            springs: Vec::new(),
            spring_forces: Vec::new(),
            columns,
            rows,
            bounds,
        };

        for y in 0..rows {
            for x in 0..columns {
                let i = grid.index(x, y);
                if x == 0 || y == 0 || x == columns - 1 || y == rows - 1 {
                    grid.link(Node::Anchor(i), Node::Point(i), BORDER_STIFFNESS, BORDER_DAMPING);
                } else if x % 3 == 0 && y % 3 == 0 {
                    grid.link(Node::Anchor(i), Node::Point(i), LATTICE_STIFFNESS, LATTICE_DAMPING);
                }

                if x > 0 {
                    let left = grid.index(x - 1, y);
                    grid.link(Node::Point(left), Node::Point(i), MESH_STIFFNESS, MESH_DAMPING);
                }
                if y > 0 {
                    let up = grid.index(x, y - 1);
                    grid.link(Node::Point(up), Node::Point(i), MESH_STIFFNESS, MESH_DAMPING);
                }
            }
        }
        grid.spring_forces = vec![Vec3::ZERO; grid.springs.len()];

        log::debug!(
            "Grid {}x{} with {} springs",
            columns,
            rows,
            grid.springs.len()
        );
        grid
    }

    fn link(&mut self, start: Node, end: Node, stiffness: f32, damping: f32) {
        let distance = self.node(start).position.distance(self.node(end).position);
        self.springs.push(Spring {
            start,
            end,
            target_length: distance * REST_FRACTION,
            stiffness,
            damping,
        });
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.columns + x
    }

    fn node(&self, node: Node) -> &PointMass {
        match node {
            Node::Point(i) => &self.points[i],
            Node::Anchor(i) => &self.anchors[i],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn point(&self, x: usize, y: usize) -> &PointMass {
        &self.points[self.index(x, y)]
    }

    pub fn points(&self) -> &[PointMass] {
        &self.points
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    /// Add `10·F/(10+dist)` to every point within `radius`
    pub fn apply_directed_force(&mut self, force: Vec3, position: Vec3, radius: f32) {
        self.points.par_iter_mut().for_each(|mass| {
            let dist2 = position.distance_squared(mass.position);
            if dist2 < radius * radius {
                mass.apply_force(10.0 * force / (10.0 + dist2.sqrt()));
            }
        });
    }

    /// Pull points toward `position`, damping them harder this frame
    pub fn apply_implosive_force(&mut self, force: f32, position: Vec3, radius: f32) {
        self.points.par_iter_mut().for_each(|mass| {
            let dist2 = position.distance_squared(mass.position);
            if dist2 < radius * radius {
                mass.apply_force(10.0 * force * (position - mass.position) / (100.0 + dist2));
                mass.increase_damping(FORCE_DAMPING);
            }
        });
    }

    /// Push points away from `position`, damping them harder this frame
    pub fn apply_explosive_force(&mut self, force: f32, position: Vec3, radius: f32) {
        self.points.par_iter_mut().for_each(|mass| {
            let dist2 = position.distance_squared(mass.position);
            if dist2 < radius * radius {
                mass.apply_force(100.0 * force * (mass.position - position) / (10_000.0 + dist2));
                mass.increase_damping(FORCE_DAMPING);
            }
        });
    }

    pub fn apply(&mut self, force: &GridForce) {
        match *force {
            GridForce::Directed {
                force,
                position,
                radius,
            } => self.apply_directed_force(force, position, radius),
            GridForce::Implosive {
                force,
                position,
                radius,
            } => self.apply_implosive_force(force, position, radius),
            GridForce::Explosive {
                force,
                position,
                radius,
            } => self.apply_explosive_force(force, position, radius),
        }
    }

    /// Resolve springs, then integrate every point-mass
    pub fn update(&mut self) {
        let points = &self.points;
        let anchors = &self.anchors;
        let node = |n: Node| match n {
            Node::Point(i) => &points[i],
            Node::Anchor(i) => &anchors[i],
        };

        // Force phase: read-only over the frame-start positions
        self.springs
            .par_iter()
            .zip(self.spring_forces.par_iter_mut())
            .for_each(|(spring, force)| {
                *force = spring.force(node(spring.start), node(spring.end));
            });

        // Scatter in spring order; anchors have zero inverse mass
        for (spring, &force) in self.springs.iter().zip(&self.spring_forces) {
            if force == Vec3::ZERO {
                continue;
            }
            if let Node::Point(i) = spring.start {
                self.points[i].apply_force(-force);
            }
            if let Node::Point(i) = spring.end {
                self.points[i].apply_force(force);
            }
        }

        self.points.par_iter_mut().for_each(PointMass::update);
    }

    /// Perspective projection of a (possibly z-displaced) point onto the screen
    pub fn project(&self, v: Vec3) -> Vec2 {
        let factor = (v.z + PERSPECTIVE_DEPTH) / PERSPECTIVE_DEPTH;
        let center = self.bounds.center();
        (v.truncate() - center) * factor + center
    }

    fn projected(&self, x: usize, y: usize) -> Vec2 {
        self.project(self.point(x, y).position)
    }

    /// Line mesh for the current frame, smoothed with Catmull-Rom where bent
    pub fn lines(&self) -> Vec<GridLine> {
        let (width, height) = (self.columns, self.rows);
        let mut lines = Vec::with_capacity(width * height * 4);

        let segment = |lines: &mut Vec<GridLine>, a: Vec2, mid: Vec2, b: Vec2, thickness: f32| {
            // a straight-enough stretch is one segment, a bend is two
            if mid.distance_squared((a + b) / 2.0) > 1.0 {
                lines.push(GridLine { start: a, end: mid, thickness });
                lines.push(GridLine { start: mid, end: b, thickness });
            } else {
                lines.push(GridLine { start: a, end: b, thickness });
            }
        };

        for y in 1..height {
            for x in 1..width {
                let p = self.projected(x, y);
                let mut left = Vec2::ZERO;
                let mut up = Vec2::ZERO;

                if x > 1 {
                    left = self.projected(x - 1, y);
                    let thickness = if y % 3 == 1 { 3.0 } else { 1.0 };
                    let clamped_x = (x + 1).min(width - 1);
                    let mid = catmull_rom(
                        self.projected(x - 2, y),
                        left,
                        p,
                        self.projected(clamped_x, y),
                        0.5,
                    );
                    segment(&mut lines, left, mid, p, thickness);
                }
                if y > 1 {
                    up = self.projected(x, y - 1);
                    let thickness = if x % 3 == 1 { 3.0 } else { 1.0 };
                    let clamped_y = (y + 1).min(height - 1);
                    let mid = catmull_rom(
                        self.projected(x, y - 2),
                        up,
                        p,
                        self.projected(x, clamped_y),
                        0.5,
                    );
                    segment(&mut lines, up, mid, p, thickness);
                }

                // interpolated half-cell lines make the grid look denser
                if x > 1 && y > 1 {
                    let up_left = self.projected(x - 1, y - 1);
                    lines.push(GridLine {
                        start: 0.5 * (up_left + up),
                        end: 0.5 * (left + p),
                        thickness: 1.0,
                    });
                    lines.push(GridLine {
                        start: 0.5 * (up_left + left),
                        end: 0.5 * (up + p),
                        thickness: 1.0,
                    });
                }
            }
        }

        lines
    }

    pub fn draw(&self, sink: &mut dyn DrawSink) {
        self.draw_with(sink, GRID);
    }

    pub fn draw_with(&self, sink: &mut dyn DrawSink, color: Color) {
        for line in self.lines() {
            draw_line(sink, line.start, line.end, color, line.thickness);
        }
    }
}
