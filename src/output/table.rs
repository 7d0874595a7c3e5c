/*
DOS table, laid out the way a pandas DataFrame of two rows is written:

  ,0,1,2,...,T-1
  0,f0,f1,f2,...
  1,d0,d1,d2,...

Readers take the rows at fixed offsets 1 and 2 after the header and ignore
the leading index column. Changing the layout breaks every table already on
disk.
 */

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use log::info;

use crate::error::{DosError, DosResult};
use crate::spectrum::Spectrum;
use crate::units::FrequencyUnit;

fn invalid(path: &Path, reason: String) -> DosError {
    DosError::io(path, io::Error::new(io::ErrorKind::InvalidData, reason))
}

pub fn write_dos_table<W: Write>(path: &Path, writer: W, spectrum: &Spectrum) -> DosResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    let header = std::iter::once(String::new()).chain((0..spectrum.len()).map(|i| i.to_string()));
    out.write_record(header).map_err(|e| DosError::csv(path, e))?;
    for (index, row) in [spectrum.frequencies(), spectrum.intensities()]
        .into_iter()
        .enumerate()
    {
        let record = std::iter::once(index.to_string()).chain(row.iter().map(|x| x.to_string()));
        out.write_record(record).map_err(|e| DosError::csv(path, e))?;
    }
    out.flush().map_err(|e| DosError::io(path, e))?;
    Ok(())
}

pub fn write_dos_csv(path: impl AsRef<Path>, spectrum: &Spectrum) -> DosResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| DosError::io(path, e))?;
    write_dos_table(path, file, spectrum)?;
    info!("wrote {} DOS points to {}", spectrum.len(), path.display());
    Ok(())
}

/// Parse a DOS table. The file does not record its unit, so the caller
/// names it.
pub fn parse_dos_table<R: Read>(
    path: &Path,
    reader: R,
    unit: FrequencyUnit,
) -> DosResult<Spectrum> {
    let mut input = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let mut rows = Vec::with_capacity(2);
    for (offset, record) in input.records().take(2).enumerate() {
        let record = record.map_err(|e| DosError::csv(path, e))?;
        let values = record
            .iter()
            .skip(1)
            .map(|field| {
                field.trim().parse::<f64>().map_err(|_| {
                    invalid(
                        path,
                        format!("row {}: `{field}` is not a number", offset + 1),
                    )
                })
            })
            .collect::<DosResult<Vec<f64>>>()?;
        rows.push(values);
    }
    let mut rows = rows.into_iter();
    match (rows.next(), rows.next()) {
        (Some(frequencies), Some(intensities)) => Spectrum::new(frequencies, intensities, unit),
        _ => Err(invalid(
            path,
            "expected a frequency row and a DOS row after the header".into(),
        )),
    }
}

pub fn read_dos_csv(path: impl AsRef<Path>, unit: FrequencyUnit) -> DosResult<Spectrum> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DosError::io(path, e))?;
    parse_dos_table(path, file, unit)
}
