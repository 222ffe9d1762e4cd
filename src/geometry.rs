//! Coordinates, axes, directions and 90°-aligned orientation.
//!
//! World space is real-valued and centred on the grid horizontally: world
//! x = 0 is grid column `size / 2`. Grid space is integer cell indices.

use std::fmt;
use std::ops::Add;

/// Real-valued position in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPos {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Grid cell containing this point: x and z shifted by `size / 2`, all axes rounded.
    pub fn to_grid(self, grid_size: usize) -> GridPos {
        let offset = horizontal_offset(grid_size) as f32;
        GridPos {
            x: (self.x + offset).round() as i32,
            y: self.y.round() as i32,
            z: (self.z + offset).round() as i32,
        }
    }
}

impl Add for WorldPos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// Integer cell index. May lie outside the grid; callers check validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// World-space centre of this cell (inverse of [`WorldPos::to_grid`]).
    pub fn to_world(self, grid_size: usize) -> WorldPos {
        let offset = horizontal_offset(grid_size);
        WorldPos::new(
            (self.x - offset) as f32,
            self.y as f32,
            (self.z - offset) as f32,
        )
    }

    /// The six face-sharing neighbours (±1 on each axis).
    pub fn neighbours(self) -> [Self; 6] {
        let Self { x, y, z } = self;
        [
            Self::new(x + 1, y, z),
            Self::new(x - 1, y, z),
            Self::new(x, y + 1, z),
            Self::new(x, y - 1, z),
            Self::new(x, y, z + 1),
            Self::new(x, y, z - 1),
        ]
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

fn horizontal_offset(grid_size: usize) -> i32 {
    (grid_size / 2) as i32
}

/// Rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Unit move intent. Forward is towards -z.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Forward,
    Backward,
    Down,
}

impl Direction {
    pub fn delta(self) -> WorldPos {
        match self {
            Self::Left => WorldPos::new(-1.0, 0.0, 0.0),
            Self::Right => WorldPos::new(1.0, 0.0, 0.0),
            Self::Forward => WorldPos::new(0.0, 0.0, -1.0),
            Self::Backward => WorldPos::new(0.0, 0.0, 1.0),
            Self::Down => WorldPos::new(0.0, -1.0, 0.0),
        }
    }
}

/// Cumulative 90°-aligned rotation, stored as an integer 3x3 matrix (row-major).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    m: [[i32; 3]; 3],
}

impl Default for Orientation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Orientation {
    pub const IDENTITY: Self = Self {
        m: [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
    };

    /// Counter-clockwise quarter turn about `axis` (right-handed).
    fn quarter_turn(axis: Axis) -> Self {
        let m = match axis {
            Axis::X => [[1, 0, 0], [0, 0, -1], [0, 1, 0]],
            Axis::Y => [[0, 0, 1], [0, 1, 0], [-1, 0, 0]],
            Axis::Z => [[0, -1, 0], [1, 0, 0], [0, 0, 1]],
        };
        Self { m }
    }

    /// Rotate 90° about `axis` in the piece's local frame (`self · R`).
    pub fn rotated(self, axis: Axis) -> Self {
        let r = Self::quarter_turn(axis);
        let mut out = [[0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[i][k] * r.m[k][j]).sum();
            }
        }
        Self { m: out }
    }

    /// Rotate a block offset into world orientation.
    pub fn apply(&self, offset: [i32; 3]) -> WorldPos {
        let v = |row: &[i32; 3]| -> f32 {
            (row[0] * offset[0] + row[1] * offset[1] + row[2] * offset[2]) as f32
        };
        WorldPos::new(v(&self.m[0]), v(&self.m[1]), v(&self.m[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_to_grid_centres_horizontal_axes() {
        assert_eq!(WorldPos::new(0.0, 5.0, 0.0).to_grid(5), GridPos::new(2, 5, 2));
        assert_eq!(WorldPos::new(-2.0, 0.0, 2.0).to_grid(5), GridPos::new(0, 0, 4));
        assert_eq!(WorldPos::new(0.0, 0.0, 0.0).to_grid(4), GridPos::new(2, 0, 2));
    }

    #[test]
    fn test_world_to_grid_rounds() {
        assert_eq!(WorldPos::new(0.2, 1.7, -0.4).to_grid(5), GridPos::new(2, 2, 2));
    }

    #[test]
    fn test_grid_world_roundtrip() {
        let p = GridPos::new(4, 1, 0);
        assert_eq!(p.to_world(5).to_grid(5), p);
    }

    #[test]
    fn test_quarter_turns_cycle() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let mut o = Orientation::IDENTITY;
            for _ in 0..4 {
                o = o.rotated(axis);
            }
            assert_eq!(o, Orientation::IDENTITY);
        }
    }

    #[test]
    fn test_rotation_moves_offsets() {
        let o = Orientation::IDENTITY.rotated(Axis::Z);
        assert_eq!(o.apply([1, 0, 0]), WorldPos::new(0.0, 1.0, 0.0));
        let o = Orientation::IDENTITY.rotated(Axis::Y);
        assert_eq!(o.apply([1, 0, 0]), WorldPos::new(0.0, 0.0, -1.0));
        let o = Orientation::IDENTITY.rotated(Axis::X);
        assert_eq!(o.apply([0, 1, 0]), WorldPos::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_rotation_is_local_frame() {
        // Y then Z in the local frame: world = Ry · Rz · v.
        let o = Orientation::IDENTITY.rotated(Axis::Y).rotated(Axis::Z);
        // Rz maps x -> y; Ry leaves y alone.
        assert_eq!(o.apply([1, 0, 0]), WorldPos::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_neighbours_are_face_adjacent() {
        let n = GridPos::new(2, 2, 2).neighbours();
        assert!(n.contains(&GridPos::new(3, 2, 2)));
        assert!(n.contains(&GridPos::new(2, 1, 2)));
        assert!(!n.contains(&GridPos::new(3, 3, 2)));
    }
}
