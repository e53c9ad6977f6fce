//! Tape track geometry

use super::config::TrackConfig;

/// Straight piece of tape
#[derive(Debug, Clone, Copy)]
struct Segment {
    ax: f32,
    ay: f32,
    bx: f32,
    by: f32,
}

impl Segment {
    /// Distance from a point to this segment
    fn distance(&self, px: f32, py: f32) -> f32 {
        let dx = self.bx - self.ax;
        let dy = self.by - self.ay;
        let len_sq = dx * dx + dy * dy;
        let t = if len_sq > 0.0 {
            (((px - self.ax) * dx + (py - self.ay) * dy) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let cx = self.ax + t * dx;
        let cy = self.ay + t * dy;
        ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
    }
}

/// Tape layout on the floor
pub struct Track {
    segments: Vec<Segment>,
    half_width: f32,
}

impl Track {
    pub fn new(config: &TrackConfig) -> Self {
        let segments = config
            .segments
            .iter()
            .map(|[[ax, ay], [bx, by]]| Segment {
                ax: *ax,
                ay: *ay,
                bx: *bx,
                by: *by,
            })
            .collect();
        Self {
            segments,
            half_width: config.tape_width / 2.0,
        }
    }

    /// Number of tape pieces
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True if the point lies on tape
    pub fn covers(&self, x: f32, y: f32) -> bool {
        self.segments
            .iter()
            .any(|s| s.distance(x, y) <= self.half_width)
    }
}
