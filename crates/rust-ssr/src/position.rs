//! Position conversion helpers.
//!
//! Tree-sitter positions are zero-based; matches are reported one-based.

/// Converts a Tree-sitter point to one-based `(line, column)` coordinates.
#[must_use]
pub(crate) fn point_to_one_based(pos: tree_sitter::Point) -> (u32, u32) {
    let line = u32::try_from(pos.row.saturating_add(1)).unwrap_or(u32::MAX);
    let column = u32::try_from(pos.column.saturating_add(1)).unwrap_or(u32::MAX);
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::point_to_one_based;

    #[test]
    fn origin_maps_to_line_one_column_one() {
        assert_eq!(point_to_one_based(tree_sitter::Point::new(0, 0)), (1, 1));
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let point = tree_sitter::Point::new(usize::MAX, 3);
        assert_eq!(point_to_one_based(point), (u32::MAX, 4));
    }
}
