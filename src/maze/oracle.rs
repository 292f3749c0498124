use super::{cell::Cell, grid::Grid};

/// Checks whether a wall can be raised on `(i, j)` without thickening any wall.
///
/// A cell qualifies when it is open and, for at least one of the four axis directions,
/// the neighbor in that direction is a wall while the two side neighbors and the three
/// cells on the opposite side are all open. The new wall then extends exactly one
/// existing wall by one cell.
///
/// `(i, j)` must not lie on the outer edge of `grid`.
pub fn is_constructible(grid: &Grid, i: usize, j: usize) -> bool {
    if grid[(i, j)].is_wall() {
        return false;
    }
    let open = |di: isize, dj: isize| -> bool {
        let ii = i.wrapping_add_signed(di);
        let jj = j.wrapping_add_signed(dj);
        !grid[(ii, jj)].is_wall()
    };
    let wall = |di, dj| !open(di, dj);

    // Wall to the north, everything to the south open
    (wall(-1, 0) && open(0, 1) && open(0, -1) && open(1, -1) && open(1, 0) && open(1, 1))
        // Wall to the south
        || (wall(1, 0) && open(0, 1) && open(0, -1) && open(-1, -1) && open(-1, 0) && open(-1, 1))
        // Wall to the west
        || (wall(0, -1) && open(1, 0) && open(-1, 0) && open(-1, 1) && open(0, 1) && open(1, 1))
        // Wall to the east
        || (wall(0, 1) && open(1, 0) && open(-1, 0) && open(-1, -1) && open(0, -1) && open(1, -1))
}

/// Applies the `Free <-> Constructible` reclassification to an owned cell.
///
/// Returns the change to the constructible count: `1`, `-1` or `0`.
pub fn reclassify(grid: &mut Grid, i: usize, j: usize) -> isize {
    match grid[(i, j)] {
        Cell::Free if is_constructible(grid, i, j) => {
            grid[(i, j)] = Cell::Constructible;
            1
        }
        Cell::Constructible if !is_constructible(grid, i, j) => {
            grid[(i, j)] = Cell::Free;
            -1
        }
        _ => 0,
    }
}
