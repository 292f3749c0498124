//! The `.lab` grid file shared with the sequential generator and the solver.
//!
//! Layout, all little-endian `i32`: row count `N`, column count `M`, then the `N * M`
//! cell codes in row-major order. A finished maze only contains `0` (wall) and `1`
//! (free); constructible cells are never persisted.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use crate::{
    error::GenError,
    maze::{Cell, Grid},
};

/// Default output file name.
pub const DEFAULT_PATH: &str = "laby.lab";

fn invalid_data(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

fn write_i32<W: Write>(writer: &mut W, value: i32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

fn read_i32<R: Read>(reader: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

fn dimension(value: usize, name: &str) -> io::Result<i32> {
    i32::try_from(value).map_err(|_| invalid_data(format!("{name} {value} does not fit in an i32")))
}

/// Writes a finished grid. Fails with `InvalidData` if a constructible cell is left.
pub fn write_lab<W: Write>(writer: &mut W, grid: &Grid) -> io::Result<()> {
    if grid.count(Cell::Constructible) > 0 {
        return Err(invalid_data(
            "refusing to persist a grid that still has constructible cells".to_string(),
        ));
    }
    write_i32(writer, dimension(grid.rows(), "row count")?)?;
    write_i32(writer, dimension(grid.cols(), "column count")?)?;
    for cell in grid.cells() {
        write_i32(writer, cell.code())?;
    }
    writer.flush()
}

/// Reads a grid written by [`write_lab`].
pub fn read_lab<R: Read>(reader: &mut R) -> io::Result<Grid> {
    let rows = read_i32(reader)?;
    let cols = read_i32(reader)?;
    let (Ok(rows), Ok(cols)) = (usize::try_from(rows), usize::try_from(cols)) else {
        return Err(invalid_data(format!("negative grid size {rows}x{cols}")));
    };
    let len = rows
        .checked_mul(cols)
        .ok_or_else(|| invalid_data(format!("grid size {rows}x{cols} overflows")))?;

    let mut cells = Vec::with_capacity(len.min(1 << 24));
    for idx in 0..len {
        let code = read_i32(reader)?;
        let cell = Cell::try_from(code)
            .map_err(|e| invalid_data(format!("cell {idx}: {e}")))?;
        cells.push(cell);
    }
    Grid::from_cells(rows, cols, cells)
        .ok_or_else(|| invalid_data("cell count does not match the grid size".to_string()))
}

/// Creates (or truncates) `path` and writes `grid` to it.
pub fn save(path: &Path, grid: &Grid) -> Result<(), GenError> {
    let io_err = |source| GenError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    write_lab(&mut BufWriter::new(file), grid).map_err(io_err)?;
    tracing::info!("[labfile] wrote {}x{} grid to {}", grid.rows(), grid.cols(), path.display());
    Ok(())
}

pub fn load(path: &Path) -> io::Result<Grid> {
    read_lab(&mut BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{GenConfig, SeedSource},
        generators::generate_maze,
    };
    use std::io::Cursor;

    fn generated_10x10() -> Grid {
        let config = GenConfig {
            islands: 1,
            rows: 10,
            cols: 10,
            workers: 2,
            seed: SeedSource::Fixed(2024),
        };
        generate_maze(&config).unwrap().grid
    }

    #[test]
    fn test_header_and_layout() {
        let mut grid = Grid::bordered(3, 4);
        grid[(1, 2)] = Cell::Wall;
        let mut bytes = Vec::new();
        write_lab(&mut bytes, &grid).unwrap();
        assert_eq!(bytes.len(), 4 * (2 + 12));
        assert_eq!(&bytes[0..4], &3i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &4i32.to_le_bytes());
        // Row 1 is wall, free, wall, wall
        let row1 = bytes[8 + 16..8 + 32]
            .chunks(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect::<Vec<_>>();
        assert_eq!(row1, vec![0, 1, 0, 0]);
    }

    #[test]
    fn test_generated_grid_round_trip() {
        let grid = generated_10x10();
        let mut bytes = Vec::new();
        write_lab(&mut bytes, &grid).unwrap();
        let codes = bytes[8..]
            .chunks(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect::<Vec<_>>();
        assert_eq!(codes.len(), 100);
        assert!(codes.iter().all(|&c| c == 0 || c == 1));

        let read = read_lab(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(read, grid);
    }

    #[test]
    fn test_refuses_constructible_cells() {
        let mut grid = Grid::bordered(4, 4);
        grid[(1, 1)] = Cell::Constructible;
        let mut bytes = Vec::new();
        let err = write_lab(&mut bytes, &grid).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_read_rejects_bad_input() {
        let encode = |values: &[i32]| {
            values
                .iter()
                .flat_map(|v| v.to_le_bytes())
                .collect::<Vec<u8>>()
        };
        // Unknown cell code
        let err = read_lab(&mut Cursor::new(encode(&[1, 2, 0, 7]))).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        // Negative size
        let err = read_lab(&mut Cursor::new(encode(&[-1, 2]))).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        // Truncated payload
        let err = read_lab(&mut Cursor::new(encode(&[2, 2, 0, 1, 0]))).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_save_and_load() {
        let grid = generated_10x10();
        let path = std::env::temp_dir().join(format!("bandmaze-test-{}.lab", std::process::id()));
        save(&path, &grid).unwrap();
        let loaded = load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, grid);
    }

    #[test]
    fn test_save_reports_path() {
        let path = Path::new("/nonexistent-dir/for/bandmaze/out.lab");
        let err = save(path, &Grid::bordered(3, 3)).unwrap_err();
        assert!(matches!(err, GenError::Io { .. }));
        assert!(err.to_string().contains("out.lab"));
    }
}
