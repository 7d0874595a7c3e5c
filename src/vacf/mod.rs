/*
Velocity autocorrelation function (VACF)

The atoms of an MD run keep a memory of their own velocity that decays and
oscillates with the vibrational modes of the lattice. Its Fourier transform is
the vibrational (phonon) density of states. Only positions are trusted from
the trajectory, so velocities are rebuilt from finite differences:

  frames --(minimum image)--> fractional displacements
         --(cell, time step)--> cartesian velocities
         --(autocorrelation, summed over atoms and axes)--> VAF

Every step is a pure function from one immutable series to the next.
*/

pub mod correlation;
pub mod displacement;
pub mod velocity;

pub use correlation::{
    autocorrelate_full, raw_autocorrelation, velocity_autocorrelation, CorrelationMethod, Vaf,
};
pub use displacement::{unwrap_displacements, unwrap_fractional, DisplacementSeries};
pub use velocity::{estimate_velocities, VelocitySeries};
