use std::fmt;

/// An element given either by atomic number or by symbol/name.
///
/// Every public lookup takes `impl Into<ElementRef>`, so `26`, `"Fe"`,
/// `"fe"`, `"iron"` and `"26"` all address the same element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRef<'a> {
    Number(u16),
    Symbol(&'a str),
}

impl From<u16> for ElementRef<'_> {
    fn from(z: u16) -> Self {
        ElementRef::Number(z)
    }
}

impl From<u8> for ElementRef<'_> {
    fn from(z: u8) -> Self {
        ElementRef::Number(z as u16)
    }
}

impl From<i32> for ElementRef<'_> {
    fn from(z: i32) -> Self {
        // out-of-range numbers map to 0, which no element has
        ElementRef::Number(u16::try_from(z).unwrap_or(0))
    }
}

impl<'a> From<&'a str> for ElementRef<'a> {
    fn from(s: &'a str) -> Self {
        ElementRef::Symbol(s)
    }
}

impl<'a> From<&'a String> for ElementRef<'a> {
    fn from(s: &'a String) -> Self {
        ElementRef::Symbol(s.as_str())
    }
}

impl fmt::Display for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRef::Number(z) => write!(f, "{z}"),
            ElementRef::Symbol(s) => f.write_str(s),
        }
    }
}

/// Symbols of the 98 elements H..Cf, indexed by Z - 1.
pub const ELEMENT_SYMBOLS: [&str; 98] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf",
];

/// Atomic number of one of the 98 canonical symbols (case-sensitive).
pub fn canonical_atomic_number(symbol: &str) -> Option<u16> {
    ELEMENT_SYMBOLS
        .iter()
        .position(|&s| s == symbol)
        .map(|i| i as u16 + 1)
}

/// Title-case an edge or line label: `"l3"` -> `"L3"`, `"KA1"` -> `"Ka1"`.
pub(crate) fn title_case(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
