//! Standard atomic masses (amu) for the elements that show up in the oxide
//! and alloy SQS cells, plus the usual light elements.
//!
//! Unknown symbols return `None`; callers decide what a missing mass means.

pub fn atomic_mass(symbol: &str) -> Option<f64> {
    let mass = match symbol.trim() {
        "H" => 1.008,
        "Li" => 6.94,
        "C" => 12.011,
        "N" => 14.007,
        "O" => 15.999,
        "F" => 18.998,
        "Na" => 22.990,
        "Mg" => 24.305,
        "Al" => 26.982,
        "Si" => 28.085,
        "P" => 30.974,
        "S" => 32.06,
        "Cl" => 35.45,
        "K" => 39.098,
        "Ca" => 40.078,
        "Ti" => 47.867,
        "V" => 50.942,
        "Cr" => 51.996,
        "Mn" => 54.938,
        "Fe" => 55.845,
        "Co" => 58.933,
        "Ni" => 58.693,
        "Cu" => 63.546,
        "Zn" => 65.38,
        "Sr" => 87.62,
        "Y" => 88.906,
        "Zr" => 91.224,
        "Nb" => 92.906,
        "Ba" => 137.327,
        "La" => 138.905,
        "Ce" => 140.116,
        "Pr" => 140.908,
        "Nd" => 144.242,
        "Hf" => 178.49,
        "Th" => 232.038,
        "U" => 238.029,
        _ => return None,
    };
    Some(mass)
}

/// Masses for a whole structure, or `None` if any symbol is unknown.
pub fn masses_for(symbols: &[String]) -> Option<Vec<f64>> {
    symbols.iter().map(|s| atomic_mass(s)).collect()
}
