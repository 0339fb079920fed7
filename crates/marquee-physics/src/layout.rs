use glam::Vec2;

use crate::fragment::FragmentSize;
use crate::spawn::ContainerSize;

/// Top-left position of a fragment in the non-physical layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticPlacement {
    pub index: usize,
    pub top_left: Vec2,
}

impl StaticPlacement {
    pub fn css_transform(&self) -> String {
        format!(
            "translate({:.2}px, {:.2}px)",
            self.top_left.x, self.top_left.y
        )
    }
}

/// Flow fragments left to right, wrapping at the container width. A fragment
/// wider than the container gets a row of its own.
pub fn static_layout(
    sizes: &[FragmentSize],
    container: ContainerSize,
    gap: f32,
) -> Vec<StaticPlacement> {
    let width = container.sanitized().width;
    let mut placements = Vec::with_capacity(sizes.len());
    let mut cursor = Vec2::ZERO;
    let mut row_height = 0.0f32;

    for (index, size) in sizes.iter().enumerate() {
        if cursor.x > 0.0 && cursor.x + size.width > width {
            cursor.x = 0.0;
            cursor.y += row_height + gap;
            row_height = 0.0;
        }
        placements.push(StaticPlacement {
            index,
            top_left: cursor,
        });
        cursor.x += size.width + gap;
        row_height = row_height.max(size.height);
    }
    placements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(width: f32) -> FragmentSize {
        FragmentSize {
            width,
            height: 20.0,
        }
    }

    #[test]
    fn test_wraps_rows() {
        let sizes = [size(100.0), size(100.0), size(100.0)];
        let placements = static_layout(
            &sizes,
            ContainerSize {
                width: 250.0,
                height: 100.0,
            },
            10.0,
        );
        assert_eq!(placements[0].top_left, Vec2::new(0.0, 0.0));
        assert_eq!(placements[1].top_left, Vec2::new(110.0, 0.0));
        assert_eq!(placements[2].top_left, Vec2::new(0.0, 30.0));
    }

    #[test]
    fn test_oversized_fragment_gets_own_row() {
        let sizes = [size(400.0), size(50.0)];
        let placements = static_layout(
            &sizes,
            ContainerSize {
                width: 300.0,
                height: 100.0,
            },
            0.0,
        );
        assert_eq!(placements[0].top_left, Vec2::ZERO);
        assert_eq!(placements[1].top_left, Vec2::new(0.0, 20.0));
    }
}
