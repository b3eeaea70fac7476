//! Pixel-mask and rectangle overlap tests
//!
//! Gameplay hit tests are mask-accurate: each entity carries a bitmask
//! rasterized from its sprite silhouette, and collision is a bitwise AND of
//! the overlapping region. Pickups use plain bounding rectangles instead;
//! mixing the two granularities for the same pass would shift observable hit
//! boundaries, so each collision pass commits to one of them.

use glam::Vec2;

/// Silhouette bitmask. One `u64` per row; sprites are at most 64 px wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    rows: Vec<u64>,
}

impl Mask {
    /// Fully opaque rectangle
    pub fn filled(width: u32, height: u32) -> Self {
        debug_assert!(width <= 64);
        let row = if width == 64 {
            u64::MAX
        } else {
            (1u64 << width) - 1
        };
        Self {
            width,
            height,
            rows: vec![row; height as usize],
        }
    }

    /// Rasterize a closed polygon (sprite-local coordinates, y down) into a
    /// bitmask using even-odd fill sampled at cell centers.
    pub fn from_polygon(width: u32, height: u32, points: &[Vec2]) -> Self {
        debug_assert!(width <= 64);
        let mut rows = vec![0u64; height as usize];
        for y in 0..height {
            let mut bits = 0u64;
            for x in 0..width {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if point_in_polygon(p, points) {
                    bits |= 1 << x;
                }
            }
            rows[y as usize] = bits;
        }
        Self {
            width,
            height,
            rows,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Number of opaque cells (used by tests)
    pub fn count(&self) -> u32 {
        self.rows.iter().map(|r| r.count_ones()).sum()
    }

    /// Bitwise overlap test against `other` placed at integer offset
    /// `(dx, dy)` relative to this mask's top-left corner.
    pub fn overlaps(&self, other: &Mask, dx: i32, dy: i32) -> bool {
        let y_start = dy.max(0);
        let y_end = (other.height as i32 + dy).min(self.height as i32);
        for y in y_start..y_end {
            let ours = self.rows[y as usize];
            let theirs = other.rows[(y - dy) as usize];
            let shifted = if dx >= 0 {
                if dx >= 64 { 0 } else { theirs << dx }
            } else if -dx >= 64 {
                0
            } else {
                theirs >> -dx
            };
            if ours & shifted != 0 {
                return true;
            }
        }
        false
    }
}

/// Mask-accurate overlap between two entities given their center positions.
pub fn mask_collide(a: &Mask, a_pos: Vec2, b: &Mask, b_pos: Vec2) -> bool {
    let a_tl = a_pos - a.size() / 2.0;
    let b_tl = b_pos - b.size() / 2.0;
    let dx = (b_tl.x - a_tl.x).round() as i32;
    let dy = (b_tl.y - a_tl.y).round() as i32;
    a.overlaps(b, dx, dy)
}

/// Coarse bounding-rectangle overlap between centered rects.
pub fn rects_collide(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    let half = (a_size + b_size) / 2.0;
    (a_pos.x - b_pos.x).abs() < half.x && (a_pos.y - b_pos.y).abs() < half.y
}

/// Even-odd point-in-polygon test
fn point_in_polygon(p: Vec2, points: &[Vec2]) -> bool {
    let mut inside = false;
    let n = points.len();
    let mut j = n - 1;
    for i in 0..n {
        let a = points[i];
        let b = points[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
