//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for combat units
///
/// Issued by the simulation engine; a referenced unit may be dead by the
/// next turn boundary, so holders must tolerate stale ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Which side of the skirmish a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Controlled,
    Opposing,
}

/// Simulation turn counter
pub type Turn = u32;

/// Grid position on the battle map
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: max(|dx|, |dy|)
    ///
    /// Diagonal and orthogonal steps cost the same, matching 8-way grid
    /// movement.
    pub fn chebyshev_distance(&self, other: &Self) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// One step toward `target` (8-way), or self if already there
    pub fn step_toward(&self, target: &Self) -> Self {
        Self {
            x: self.x + (target.x - self.x).signum(),
            y: self.y + (target.y - self.y).signum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chebyshev_distance() {
        let a = GridPos::new(0, 0);
        assert_eq!(a.chebyshev_distance(&GridPos::new(2, 0)), 2);
        assert_eq!(a.chebyshev_distance(&GridPos::new(2, -3)), 3);
        assert_eq!(a.chebyshev_distance(&a), 0);
    }

    #[test]
    fn test_step_toward_diagonal() {
        let a = GridPos::new(0, 0);
        assert_eq!(a.step_toward(&GridPos::new(3, -3)), GridPos::new(1, -1));
        assert_eq!(a.step_toward(&a), a);
    }

    #[test]
    fn test_unit_id_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<UnitId, &str> = HashMap::new();
        map.insert(UnitId(7), "footman");
        assert_eq!(map.get(&UnitId(7)), Some(&"footman"));
    }
}
