use crate::{
    comm::{CommError, Communicator},
    maze::{Band, Grid},
};

/// Rank that receives the assembled grid and writes the output file.
pub const COORDINATOR: usize = 0;

/// Gathers every worker's owned rows on the coordinator, in rank order.
///
/// Returns the full grid on the coordinator and `None` everywhere else.
pub fn assemble<C: Communicator>(band: &Band, comm: &mut C) -> Result<Option<Grid>, CommError> {
    let partition = band.partition();
    let (rows, cols) = (partition.rows(), partition.cols());
    comm.gather(COORDINATOR, band.owned_block())?
        .map(|cells| {
            let got = cells.len();
            Grid::from_cells(rows, cols, cells).ok_or(CommError::LengthMismatch {
                peer: COORDINATOR,
                expected: rows * cols,
                got,
            })
        })
        .transpose()
}
