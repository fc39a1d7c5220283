//! Shape catalog and crystal colors
//!
//! Shapes are fixed offset lists with no rotation. Offsets are normalized so
//! the smallest x and y are both 0.

use serde::{Deserialize, Serialize};

/// Crystal block colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crystal {
    Red,
    Blue,
    Green,
    Purple,
    Yellow,
}

impl Crystal {
    pub const ALL: [Crystal; 5] = [
        Crystal::Red,
        Crystal::Blue,
        Crystal::Green,
        Crystal::Purple,
        Crystal::Yellow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Crystal::Red => "crystal_red",
            Crystal::Blue => "crystal_blue",
            Crystal::Green => "crystal_green",
            Crystal::Purple => "crystal_purple",
            Crystal::Yellow => "crystal_yellow",
        }
    }

    /// Fill color (CSS hex)
    pub fn fill(&self) -> &'static str {
        match self {
            Crystal::Red => "#FF0055",
            Crystal::Blue => "#00D4FF",
            Crystal::Green => "#39FF14",
            Crystal::Purple => "#BC13FE",
            Crystal::Yellow => "#FFD700",
        }
    }

    /// Stroke color (CSS hex)
    pub fn stroke(&self) -> &'static str {
        match self {
            Crystal::Red => "#c00040",
            Crystal::Blue => "#008db0",
            Crystal::Green => "#26b50e",
            Crystal::Purple => "#7f0bb0",
            Crystal::Yellow => "#c9a500",
        }
    }

    /// Single-letter tag for text rendering
    pub fn glyph(&self) -> char {
        match self {
            Crystal::Red => 'R',
            Crystal::Blue => 'B',
            Crystal::Green => 'G',
            Crystal::Purple => 'P',
            Crystal::Yellow => 'Y',
        }
    }
}

/// Axis-aligned extent of a shape, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl ShapeBounds {
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }
}

/// A placeable shape
#[derive(Debug, PartialEq, Eq)]
pub struct Shape {
    pub name: &'static str,
    cells: &'static [(i32, i32)],
}

impl Shape {
    const fn new(name: &'static str, cells: &'static [(i32, i32)]) -> Self {
        Self { name, cells }
    }

    /// Block offsets relative to the shape origin
    pub fn cells(&self) -> &'static [(i32, i32)] {
        self.cells
    }

    pub fn block_count(&self) -> usize {
        self.cells.len()
    }

    pub fn bounds(&self) -> ShapeBounds {
        let mut b = ShapeBounds {
            min_x: i32::MAX,
            max_x: i32::MIN,
            min_y: i32::MAX,
            max_y: i32::MIN,
        };
        for &(x, y) in self.cells {
            b.min_x = b.min_x.min(x);
            b.max_x = b.max_x.max(x);
            b.min_y = b.min_y.min(y);
            b.max_y = b.max_y.max(y);
        }
        b
    }

    pub fn width(&self) -> i32 {
        self.bounds().width()
    }

    pub fn height(&self) -> i32 {
        self.bounds().height()
    }
}

static CATALOG: [Shape; 15] = [
    Shape::new("single", &[(0, 0)]),
    Shape::new("domino_h", &[(0, 0), (1, 0)]),
    Shape::new("domino_v", &[(0, 0), (0, 1)]),
    Shape::new("bar3_h", &[(0, 0), (1, 0), (2, 0)]),
    Shape::new("bar3_v", &[(0, 0), (0, 1), (0, 2)]),
    Shape::new("square2", &[(0, 0), (1, 0), (0, 1), (1, 1)]),
    Shape::new("el_small", &[(0, 0), (0, 1), (1, 1)]),
    Shape::new("el_large", &[(0, 0), (0, 1), (0, 2), (1, 2)]),
    Shape::new("el_large_rev", &[(1, 0), (1, 1), (1, 2), (0, 2)]),
    Shape::new("rect3x2", &[(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]),
    Shape::new("rect2x3", &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2), (1, 2)]),
    Shape::new("tee", &[(0, 0), (1, 0), (2, 0), (1, 1)]),
    Shape::new("ess", &[(1, 0), (2, 0), (0, 1), (1, 1)]),
    Shape::new("zee", &[(0, 0), (1, 0), (1, 1), (2, 1)]),
    Shape::new("plus", &[(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)]),
];

/// All shapes, in catalog order
pub fn catalog() -> &'static [Shape] {
    &CATALOG
}

/// Look up a shape by catalog index
pub fn shape(id: usize) -> Option<&'static Shape> {
    CATALOG.get(id)
}

/// Look up a shape's catalog index by name
pub fn shape_id(name: &str) -> Option<usize> {
    CATALOG.iter().position(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_fifteen_shapes() {
        assert_eq!(catalog().len(), 15);
        assert_eq!(catalog()[0].name, "single");
        assert_eq!(catalog()[14].name, "plus");
    }

    #[test]
    fn test_offsets_are_normalized() {
        for s in catalog() {
            let b = s.bounds();
            assert_eq!(b.min_x, 0, "{}", s.name);
            assert_eq!(b.min_y, 0, "{}", s.name);
            assert!(s.block_count() > 0);
        }
    }

    #[test]
    fn test_bounds() {
        let rect = shape(shape_id("rect3x2").unwrap()).unwrap();
        assert_eq!((rect.width(), rect.height()), (3, 2));
        assert_eq!(rect.block_count(), 6);

        let plus = shape(shape_id("plus").unwrap()).unwrap();
        assert_eq!((plus.width(), plus.height()), (3, 3));
        assert_eq!(plus.block_count(), 5);
    }

    #[test]
    fn test_unknown_shape() {
        assert!(shape_id("hexomino").is_none());
        assert!(shape(15).is_none());
    }

    #[test]
    fn test_crystal_palette() {
        assert_eq!(Crystal::ALL.len(), 5);
        assert_eq!(Crystal::Red.fill(), "#FF0055");
        assert_eq!(Crystal::Purple.as_str(), "crystal_purple");
    }
}
