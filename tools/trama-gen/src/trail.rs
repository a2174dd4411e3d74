//! Fading polyline trails
//!
//! A [`Trail`] keeps the most recent positions of a moving object in a
//! fixed-size vertex buffer. Colours ramp from dark at the tail to light at
//! the head, all in one hue.

use std::collections::VecDeque;

use glam::Vec3;

use crate::color::hsl_to_rgb;
use crate::mesh::Edge;

/// Points required before the buffers are rewritten
const MIN_VISIBLE_POINTS: usize = 10;

/// Fixed-capacity trail with per-vertex colours
#[derive(Clone, Debug)]
pub struct Trail {
    capacity: usize,
    hue: f32,
    points: VecDeque<Vec3>,
    pushes: u64,
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
}

impl Trail {
    /// Create a trail of `max_points` vertices parked at `initial`
    ///
    /// `hue` is a fraction of a turn. The initial colours ramp lightness from
    /// 0.5 to 1.0 along the buffer.
    pub fn new(max_points: usize, initial: Vec3, hue: f32) -> Self {
        let capacity = max_points.max(1);
        let colors = (0..capacity)
            .map(|i| hsl_to_rgb(hue, 1.0, 0.5 * i as f32 / capacity as f32 + 0.5))
            .collect();
        Self {
            capacity,
            hue,
            points: VecDeque::with_capacity(capacity + 1),
            pushes: 0,
            positions: vec![initial; capacity],
            colors,
        }
    }

    /// Record the next position
    ///
    /// The oldest point is dropped once the trail is full. The very first
    /// position ever pushed is discarded. The buffers are only rewritten once
    /// more than ten points are held.
    pub fn push(&mut self, position: Vec3) {
        self.points.push_back(position);
        if self.points.len() > self.capacity {
            self.points.pop_front();
        }
        if self.pushes == 0 {
            self.points.pop_front();
        }
        self.pushes += 1;

        if self.points.len() > MIN_VISIBLE_POINTS {
            self.rebuild();
        }
    }

    /// Forget the history; the buffers keep their last contents
    pub fn reset(&mut self) {
        self.points.clear();
    }

    fn rebuild(&mut self) {
        let len = self.points.len();
        for i in 0..self.capacity {
            let j = i.min(len - 1);
            self.positions[i] = self.points[j];
            self.colors[i] = hsl_to_rgb(self.hue, 1.0, 0.5 * j as f32 / len as f32 + 0.1);
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    /// Number of recorded points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Vertex positions, always `capacity` long
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Vertex colours, always `capacity` long
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Line segments between consecutive distinct vertices
    pub fn edges(&self) -> Vec<Edge> {
        self.positions
            .windows(2)
            .filter(|w| w[0] != w[1])
            .map(|w| Edge::new(w[0], w[1]))
            .collect()
    }
}
