use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use nalgebra::DMatrix;

use crate::{diagnostics::Sample, vector::Vector};

/// Write the time series of temperature and pressure.
pub fn write_csv_diagnostics(samples: &[Sample], path: impl AsRef<Path>) -> Result<(), io::Error> {
    let file = BufWriter::new(File::create(path)?);
    write_diagnostics(samples, file)
}

fn write_diagnostics(samples: &[Sample], mut writer: impl Write) -> Result<(), io::Error> {
    writeln!(writer, "t,temperature,pressure")?;
    for sample in samples {
        writeln!(
            writer,
            "{},{},{}",
            sample.time, sample.temperature, sample.pressure
        )?;
    }

    writer.flush()
}

/// Write recorded positions, one row per step, as returned by
/// [`crate::Simulation::simulate`].
pub fn write_csv_positions(
    positions: &DMatrix<Vector>,
    path: impl AsRef<Path>,
) -> Result<(), io::Error> {
    let file = BufWriter::new(File::create(path)?);
    write_positions(positions, file)
}

fn write_positions(positions: &DMatrix<Vector>, mut writer: impl Write) -> Result<(), io::Error> {
    let (_, num_particles) = positions.shape();

    write!(writer, "t")?;
    for i in 0..num_particles {
        write!(writer, ",x{i},y{i}")?;
    }
    writeln!(writer)?;

    for (t, row) in positions.row_iter().enumerate() {
        write!(writer, "{t}")?;
        for r in row.iter() {
            write!(writer, ",{},{}", r.x, r.y)?;
        }
        writeln!(writer)?;
    }

    writer.flush()
}
