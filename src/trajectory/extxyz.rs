/*
Extended XYZ reader.

This is the multi-frame text format ASE writes for MD runs:

    2
    Lattice="4.2 0 0 0 4.2 0 0 0 4.2" Properties=species:S:1:pos:R:3:forces:R:3 energy=-12.3 pbc="T T T"
    Mg 0.0 0.0 0.0 0.01 0.0 0.0
    O  2.1 2.1 2.1 -0.01 0.0 0.0

The comment line carries key=value pairs (values may be double quoted) and
`Properties` lists the per-atom columns as name:type:count triplets.
Recognized columns: species, pos, forces, velocities (A/fs), momenta (ASE
units) and masses. Unknown columns are skipped.
 */

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::warn;
use nalgebra::Vector3;

use crate::constants::ASE_TIME_FS;
use crate::error::{DosError, DosResult};
use crate::pbc::periodic_boundary_conditions::Cell;
use crate::trajectory::Frame;

#[derive(Clone, Debug, PartialEq)]
struct Column {
    name: String,
    kind: char,
    count: usize,
    offset: usize,
}

pub fn read_frames(path: &Path) -> DosResult<Vec<Frame>> {
    let file = File::open(path).map_err(|e| DosError::read(path, e.to_string()))?;
    parse_frames(path, BufReader::new(file))
}

/// Parse all frames from any buffered source. `path` is only used in errors.
pub fn parse_frames<R: BufRead>(path: &Path, reader: R) -> DosResult<Vec<Frame>> {
    let mut lines = reader.lines().enumerate();
    let mut frames = Vec::new();
    let mut momenta_warned = false;

    loop {
        // atom count, skipping blank separators
        let (count_no, count_line) = loop {
            match lines.next() {
                None => return finish(path, frames),
                Some((idx, line)) => {
                    let line = line.map_err(|e| DosError::read(path, e.to_string()))?;
                    if !line.trim().is_empty() {
                        break (idx + 1, line);
                    }
                }
            }
        };
        let n_atoms: usize = count_line.trim().parse().map_err(|_| {
            DosError::read(
                path,
                format!("line {count_no}: expected an atom count, found `{}`", count_line.trim()),
            )
        })?;

        let (comment_no, comment) = match lines.next() {
            Some((idx, line)) => (
                idx + 1,
                line.map_err(|e| DosError::read(path, e.to_string()))?,
            ),
            None => {
                return Err(DosError::read(
                    path,
                    format!("line {count_no}: frame header is missing its comment line"),
                ))
            }
        };
        let info = parse_key_values(&comment)
            .map_err(|reason| DosError::read(path, format!("line {comment_no}: {reason}")))?;
        let lookup = |key: &str| {
            info.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.as_str())
        };

        let lattice = lookup("Lattice").ok_or_else(|| {
            DosError::read(
                path,
                format!("line {comment_no}: no Lattice, periodic analysis needs a cell"),
            )
        })?;
        let lattice = parse_floats(lattice)
            .filter(|v| v.len() == 9)
            .ok_or_else(|| {
                DosError::read(path, format!("line {comment_no}: Lattice needs 9 numbers"))
            })?;
        let cell = Cell::from_rows([
            [lattice[0], lattice[1], lattice[2]],
            [lattice[3], lattice[4], lattice[5]],
            [lattice[6], lattice[7], lattice[8]],
        ])
        .map_err(|e| DosError::read(path, format!("line {comment_no}: {e}")))?;

        let columns = parse_properties(lookup("Properties").unwrap_or("species:S:1:pos:R:3"))
            .map_err(|reason| DosError::read(path, format!("line {comment_no}: {reason}")))?;
        let width: usize = columns.iter().map(|c| c.count).sum();
        let find = |names: &[&str]| {
            columns
                .iter()
                .find(|c| names.iter().any(|n| c.name.eq_ignore_ascii_case(n)))
                .cloned()
        };
        let species = find(&["species"])
            .ok_or_else(|| DosError::read(path, format!("line {comment_no}: no species column")))?;
        let pos = find(&["pos", "positions"])
            .ok_or_else(|| DosError::read(path, format!("line {comment_no}: no pos column")))?;
        let forces_col = find(&["forces", "force"]);
        let velo_col = find(&["velocities", "velo", "vel"]);
        let momenta_col = find(&["momenta"]);
        let masses_col = find(&["masses", "mass"]);
        if species.kind != 'S' || species.count != 1 {
            return Err(DosError::read(
                path,
                format!(
                    "line {comment_no}: column `{}` should be S:1",
                    species.name
                ),
            ));
        }
        for (col, expected) in [
            (Some(&pos), 3),
            (forces_col.as_ref(), 3),
            (velo_col.as_ref(), 3),
            (momenta_col.as_ref(), 3),
            (masses_col.as_ref(), 1),
        ] {
            if let Some(col) = col {
                if col.count != expected || col.kind != 'R' {
                    return Err(DosError::read(
                        path,
                        format!(
                            "line {comment_no}: column `{}` should be R:{expected}",
                            col.name
                        ),
                    ));
                }
            }
        }

        let mut symbols = Vec::with_capacity(n_atoms);
        let mut positions = Vec::with_capacity(n_atoms);
        let mut forces = Vec::new();
        let mut velocities = Vec::new();
        let mut momenta = Vec::new();
        let mut masses = Vec::new();
        for atom in 0..n_atoms {
            let (line_no, line) = match lines.next() {
                Some((idx, line)) => (
                    idx + 1,
                    line.map_err(|e| DosError::read(path, e.to_string()))?,
                ),
                None => {
                    return Err(DosError::read(
                        path,
                        format!(
                            "frame starting at line {count_no} ends after {atom} of {n_atoms} atoms"
                        ),
                    ))
                }
            };
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < width {
                return Err(DosError::read(
                    path,
                    format!(
                        "line {line_no}: expected {width} columns, found {}",
                        fields.len()
                    ),
                ));
            }
            let bad = |name: &str| {
                DosError::read(path, format!("line {line_no}: invalid number in `{name}`"))
            };
            let vec3 = |col: &Column| -> DosResult<Vector3<f64>> {
                let mut out = [0.0; 3];
                for (k, slot) in out.iter_mut().enumerate() {
                    *slot = fields[col.offset + k]
                        .parse::<f64>()
                        .map_err(|_| bad(&col.name))?;
                }
                Ok(Vector3::new(out[0], out[1], out[2]))
            };

            symbols.push(fields[species.offset].to_string());
            positions.push(vec3(&pos)?);
            if let Some(col) = &forces_col {
                forces.push(vec3(col)?);
            }
            if let Some(col) = &velo_col {
                velocities.push(vec3(col)?);
            }
            if let Some(col) = &momenta_col {
                momenta.push(vec3(col)?);
            }
            if let Some(col) = &masses_col {
                masses.push(
                    fields[col.offset]
                        .parse::<f64>()
                        .map_err(|_| bad(&col.name))?,
                );
            }
        }

        let mut frame = Frame::new(symbols, positions, cell);
        if let Some(energy) = lookup("energy") {
            let energy = energy.parse::<f64>().map_err(|_| {
                DosError::read(path, format!("line {comment_no}: invalid energy `{energy}`"))
            })?;
            frame = frame.with_energy(energy);
        }
        if let Some(stress) = lookup("stress") {
            let stress = parse_floats(stress)
                .filter(|s| s.len() == 6 || s.len() == 9)
                .ok_or_else(|| {
                    DosError::read(path, format!("line {comment_no}: stress needs 6 or 9 numbers"))
                })?;
            frame = frame.with_stress(stress);
        }
        if let Some(t) = lookup("temperature") {
            let t = t.parse::<f64>().map_err(|_| {
                DosError::read(path, format!("line {comment_no}: invalid temperature `{t}`"))
            })?;
            frame = frame.with_temperature(t);
        }
        if forces_col.is_some() {
            frame = frame.with_forces(forces);
        }
        if masses_col.is_some() {
            frame = frame.with_masses(masses);
        }
        if velo_col.is_some() {
            frame = frame.with_velocities(velocities);
        } else if momenta_col.is_some() {
            // v = p / m is in A per ASE time unit
            match frame.resolved_masses() {
                Some(m) => {
                    let v = momenta
                        .iter()
                        .zip(m.iter())
                        .map(|(p, m)| p / (m * ASE_TIME_FS))
                        .collect();
                    frame = frame.with_velocities(v);
                }
                None if !momenta_warned => {
                    warn!(
                        "{}: momenta present but masses unknown for {:?}; velocities dropped",
                        path.display(),
                        frame.symbols
                    );
                    momenta_warned = true;
                }
                None => {}
            }
        }
        frames.push(frame);
    }
}

fn finish(path: &Path, frames: Vec<Frame>) -> DosResult<Vec<Frame>> {
    if frames.is_empty() {
        return Err(DosError::read(path, "no frames found"));
    }
    Ok(frames)
}

/// Split an extended XYZ comment line into `(key, value)` pairs.
/// Bare keys get the value `T`.
fn parse_key_values(line: &str) -> Result<Vec<(String, String)>, String> {
    let mut out = Vec::new();
    let mut chars = line.trim().chars().peekable();
    loop {
        while chars.peek().map_or(false, |c| c.is_whitespace()) {
            chars.next();
        }
        if chars.peek().is_none() {
            return Ok(out);
        }
        let mut key = String::new();
        while let Some(&c) = chars.peek() {
            if c == '=' || c.is_whitespace() {
                break;
            }
            key.push(c);
            chars.next();
        }
        if chars.peek() != Some(&'=') {
            out.push((key, "T".to_string()));
            continue;
        }
        chars.next(); // '='
        let mut value = String::new();
        match chars.peek() {
            Some(&quote @ ('"' | '\'')) => {
                chars.next();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == quote {
                        closed = true;
                        break;
                    }
                    value.push(c);
                }
                if !closed {
                    return Err(format!("unterminated quote in value of `{key}`"));
                }
            }
            _ => {
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    value.push(c);
                    chars.next();
                }
            }
        }
        out.push((key, value));
    }
}

fn parse_properties(properties: &str) -> Result<Vec<Column>, String> {
    let parts: Vec<&str> = properties.split(':').collect();
    if parts.len() % 3 != 0 {
        return Err(format!("Properties `{properties}` is not a list of name:type:count triplets"));
    }
    let mut columns = Vec::with_capacity(parts.len() / 3);
    let mut offset = 0;
    for triplet in parts.chunks(3) {
        let kind = match triplet[1] {
            "S" | "R" | "I" | "L" => triplet[1].chars().next().unwrap_or('S'),
            other => return Err(format!("unknown column type `{other}`")),
        };
        let count: usize = triplet[2]
            .parse()
            .map_err(|_| format!("bad column count `{}`", triplet[2]))?;
        if count == 0 {
            return Err(format!("column `{}` has no fields", triplet[0]));
        }
        columns.push(Column {
            name: triplet[0].to_string(),
            kind,
            count,
            offset,
        });
        offset += count;
    }
    Ok(columns)
}

fn parse_floats(s: &str) -> Option<Vec<f64>> {
    s.split_whitespace().map(|x| x.parse().ok()).collect()
}
