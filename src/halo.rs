use crate::{
    comm::{CommError, Communicator},
    maze::Band,
};

/// Refreshes both ghost rows of `band` from the neighboring workers.
///
/// The first owned row goes up and the upper neighbor's last owned row lands in the top
/// ghost row; the last owned row goes down and the lower neighbor's first owned row lands
/// in the bottom ghost row. A side without a neighbor is left untouched.
pub fn exchange_halos<C: Communicator>(band: &mut Band, comm: &mut C) -> Result<(), CommError> {
    let (up, down) = (band.partition().up(), band.partition().down());
    let (first, last) = (band.first_row(), band.last_row());
    let (top_ghost, bottom_ghost) = (band.top_ghost(), band.bottom_ghost());

    let outgoing = band.grid().row(first).to_vec();
    comm.sendrecv(up, &outgoing, band.grid_mut().row_mut(top_ghost))?;

    let outgoing = band.grid().row(last).to_vec();
    comm.sendrecv(down, &outgoing, band.grid_mut().row_mut(bottom_ghost))?;
    Ok(())
}
