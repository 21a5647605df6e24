/// Avogadro's number (mol^-1)
pub const AVOGADRO: f64 = 6.02214076e23;

/// Planck's constant times speed of light (eV·Å)
pub const PLANCK_HC_ANGSTROM: f64 = 12398.4193;

/// Classical electron radius (cm)
pub const R_ELECTRON_CM: f64 = 2.8179403262e-13;

/// Photon wavelength in cm for an energy in eV.
#[inline]
pub fn wavelength_cm(energy: f64) -> f64 {
    1.0e-8 * PLANCK_HC_ANGSTROM / energy
}
