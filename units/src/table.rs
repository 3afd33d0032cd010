//! Known unit symbols and magnitude prefixes.
//!
//! The static table is compile-time data: a symbol resolves either exactly,
//! or as a single-character magnitude prefix followed by an exact symbol.
//! [`Registry`] layers caller-defined symbols on top of the static table.

use std::collections::HashMap;

use crate::dimension::Dimension;
use crate::error::{Result, UnitError};

/// A named unit with a fixed scale relative to cgs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atomic {
    pub symbol: &'static str,
    pub name: &'static str,
    pub scale: f64,
    pub dimension: Dimension,
}

macro_rules! atomic {
    ($const:ident $symbol:literal $name:literal $scale:literal $dimension:ident) => {
        pub const $const: Atomic = Atomic {
            symbol: $symbol,
            name: $name,
            scale: $scale,
            dimension: Dimension::$dimension,
        };
    };
}

// cgs base
atomic!(GRAM              "g"     "gram"                 1.0          MASS);
atomic!(SECOND            "s"     "second"               1.0          TIME);
atomic!(KELVIN            "K"     "kelvin"               1.0          TEMPERATURE);
// Centimetre is `c` + `m`, which keeps the table collision-free.
atomic!(METER             "m"     "meter"                1e2          LENGTH);

// other cgs (Gaussian E&M)
atomic!(DYNE              "dyne"  "dyne"                 1.0          FORCE);
atomic!(ERG               "erg"   "erg"                  1.0          ENERGY);
atomic!(ESU               "esu"   "statcoulomb"          1.0          CHARGE);
atomic!(GAUSS             "gauss" "gauss"                1.0          MAGNETIC_FIELD);

// SI
atomic!(NEWTON            "N"     "newton"               1e5          FORCE);
atomic!(JOULE             "J"     "joule"                1e7          ENERGY);
atomic!(WATT              "W"     "watt"                 1e7          POWER);
atomic!(PASCAL            "Pa"    "pascal"               1e1          PRESSURE);
atomic!(HERTZ             "Hz"    "hertz"                1.0          RATE);
atomic!(ELECTRONVOLT      "eV"    "electronvolt"         1.602176634e-12 ENERGY);

// times
atomic!(MINUTE            "min"   "minute"               60.0         TIME);
atomic!(HOUR              "hr"    "hour"                 3600.0       TIME);
atomic!(DAY               "day"   "day"                  86400.0      TIME);
atomic!(YEAR              "yr"    "year"                 31536000.0   TIME);

// solar
atomic!(SOLAR_MASS        "Msun"  "solar mass"           1.98892e33   MASS);
atomic!(SOLAR_RADIUS      "Rsun"  "solar radius"         6.96e10      LENGTH);
atomic!(SOLAR_LUMINOSITY  "Lsun"  "solar luminosity"     3.9e33       POWER);
atomic!(SOLAR_TEMPERATURE "Tsun"  "solar temperature"    5870.0       TEMPERATURE);

// astronomical distances
atomic!(ASTRONOMICAL_UNIT "AU"    "astronomical unit"    1.49598e13   LENGTH);
atomic!(LIGHT_YEAR        "ly"    "light year"           9.46053e17   LENGTH);
atomic!(PARSEC            "pc"    "parsec"               3.08568e18   LENGTH);

// other astro
atomic!(JANSKY            "Jy"    "jansky"               1e-23        SPECTRAL_FLUX_DENSITY);
atomic!(HUBBLE            "H_0"   "Hubble constant"      2.3e-18      RATE);

/// Every atomic symbol known at compile time.
pub static ATOMIC: &[Atomic] = &[
    GRAM, SECOND, KELVIN, METER,
    DYNE, ERG, ESU, GAUSS,
    NEWTON, JOULE, WATT, PASCAL, HERTZ, ELECTRONVOLT,
    MINUTE, HOUR, DAY, YEAR,
    SOLAR_MASS, SOLAR_RADIUS, SOLAR_LUMINOSITY, SOLAR_TEMPERATURE,
    ASTRONOMICAL_UNIT, LIGHT_YEAR, PARSEC,
    JANSKY, HUBBLE,
];

/// A single-character SI magnitude prefix, `10^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    pub symbol: char,
    pub name: &'static str,
    pub exponent: i32,
}

impl Prefix {
    pub const YOTTA: Prefix = Prefix { symbol: 'Y', name: "yotta", exponent:  24 };
    pub const ZETTA: Prefix = Prefix { symbol: 'Z', name: "zetta", exponent:  21 };
    pub const EXA  : Prefix = Prefix { symbol: 'E', name: "exa"  , exponent:  18 };
    pub const PETA : Prefix = Prefix { symbol: 'P', name: "peta" , exponent:  15 };
    pub const TERA : Prefix = Prefix { symbol: 'T', name: "tera" , exponent:  12 };
    pub const GIGA : Prefix = Prefix { symbol: 'G', name: "giga" , exponent:   9 };
    pub const MEGA : Prefix = Prefix { symbol: 'M', name: "mega" , exponent:   6 };
    pub const KILO : Prefix = Prefix { symbol: 'k', name: "kilo" , exponent:   3 };
    pub const HECTO: Prefix = Prefix { symbol: 'h', name: "hecto", exponent:   2 };
    pub const DECI : Prefix = Prefix { symbol: 'd', name: "deci" , exponent:  -1 };
    pub const CENTI: Prefix = Prefix { symbol: 'c', name: "centi", exponent:  -2 };
    pub const MILLI: Prefix = Prefix { symbol: 'm', name: "milli", exponent:  -3 };
    pub const MICRO: Prefix = Prefix { symbol: 'u', name: "micro", exponent:  -6 };
    pub const NANO : Prefix = Prefix { symbol: 'n', name: "nano" , exponent:  -9 };
    pub const PICO : Prefix = Prefix { symbol: 'p', name: "pico" , exponent: -12 };
    pub const FEMTO: Prefix = Prefix { symbol: 'f', name: "femto", exponent: -15 };
    pub const ATTO : Prefix = Prefix { symbol: 'a', name: "atto" , exponent: -18 };
    pub const ZEPTO: Prefix = Prefix { symbol: 'z', name: "zepto", exponent: -21 };
    pub const YOCTO: Prefix = Prefix { symbol: 'y', name: "yocto", exponent: -24 };

    pub const ALL: [Prefix; 19] = [
        Self::YOTTA, Self::ZETTA, Self::EXA, Self::PETA, Self::TERA, Self::GIGA, Self::MEGA,
        Self::KILO, Self::HECTO, Self::DECI, Self::CENTI, Self::MILLI, Self::MICRO,
        Self::NANO, Self::PICO, Self::FEMTO, Self::ATTO, Self::ZEPTO, Self::YOCTO,
    ];

    pub fn from_char(c: char) -> Option<Prefix> {
        Self::ALL.into_iter().find(|p| p.symbol == c)
    }

    pub fn magnitude(self) -> f64 { 10_f64.powi(self.exponent) }

    /// Apply this prefix to `scale`.
    ///
    /// Negative exponents divide by the exact power of ten, so that e.g.
    /// `c` applied to `m` (100) gives exactly 1.
    pub fn apply(self, scale: f64) -> f64 {
        let power = 10_f64.powi(self.exponent.abs());
        if self.exponent < 0 { scale / power }
        else                 { scale * power }
    }
}

/// Scale and dimension of a resolved symbol.
pub type Resolved = (f64, Dimension);

/// Source of atomic unit symbols.
///
/// Implementors only answer exact matches; prefix handling is shared by the
/// provided [`Lookup::lookup`].
pub trait Lookup {
    fn atomic(&self, symbol: &str) -> Option<Resolved>;

    /// Resolve `symbol` exactly, or as a magnitude prefix followed by an
    /// exact symbol.
    fn lookup(&self, symbol: &str) -> Result<Resolved> {
        if let Some(found) = self.atomic(symbol) {
            return Ok(found);
        }
        let mut chars = symbol.chars();
        if let Some(prefix) = chars.next().and_then(Prefix::from_char) {
            let rest = chars.as_str();
            if let Some((scale, dimension)) = self.atomic(rest) {
                tracing::trace!(symbol, prefix = prefix.name, base = rest, "resolved prefixed symbol");
                return Ok((prefix.apply(scale), dimension));
            }
        }
        Err(UnitError::UnknownUnitSymbol(symbol.to_string()))
    }
}

/// The compile-time symbol table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Static;

impl Lookup for Static {
    fn atomic(&self, symbol: &str) -> Option<Resolved> {
        find_atomic(symbol).map(|a| (a.scale, a.dimension))
    }
}

pub fn find_atomic(symbol: &str) -> Option<&'static Atomic> {
    ATOMIC.iter().find(|a| a.symbol == symbol)
}

/// Resolve `symbol` against the static table.
pub fn lookup(symbol: &str) -> Result<Resolved> { Static.lookup(symbol) }

/// Symbols that are both atomic and a prefix followed by another atomic
/// symbol. Empty for a consistent table.
pub fn collisions<'a>(symbols: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let all: Vec<&str> = symbols.into_iter().collect();
    let mut seen = std::collections::HashSet::new();
    let mut clashes = vec![];
    for symbol in all.iter().copied() {
        if !seen.insert(symbol.to_string()) {
            clashes.push(symbol.to_string());
        }
    }
    for symbol in all.iter().copied() {
        for prefix in Prefix::ALL {
            let prefixed = format!("{}{symbol}", prefix.symbol);
            if !seen.insert(prefixed.clone()) {
                clashes.push(prefixed);
            }
        }
    }
    clashes
}

/// Caller-defined symbols layered over the static table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    defined: HashMap<String, Resolved>,
}

impl Registry {

    pub fn new() -> Self { Self::default() }

    /// Add `symbol` with the given scale to cgs and dimension.
    ///
    /// Fails if the scale is not positive and finite, if the symbol is not a
    /// plain identifier, or if it would make some symbol ambiguous.
    pub fn define(&mut self, symbol: &str, scale: f64, dimension: Dimension) -> Result<()> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(UnitError::InvalidScaleValue(format!(
                "`{symbol}` has scale {scale}, which is not a positive finite number"
            )));
        }
        if !is_identifier(symbol) {
            return Err(UnitError::MalformedExpression {
                expr: symbol.to_string(),
                reason: "unit symbols must start with a letter and contain only letters, digits or `_`".into(),
            });
        }
        let existing = ATOMIC.iter().map(|a| a.symbol)
            .chain(self.defined.keys().map(String::as_str));
        let clashes = collisions(existing.chain(std::iter::once(symbol)));
        if let Some(clash) = clashes.into_iter().next() {
            return Err(UnitError::SymbolCollision(clash));
        }
        tracing::debug!(symbol, scale, %dimension, "defined unit symbol");
        self.defined.insert(symbol.to_string(), (scale, dimension));
        Ok(())
    }

    pub fn is_empty(&self) -> bool { self.defined.is_empty() }
    pub fn len     (&self) -> usize { self.defined.len() }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.defined.keys().map(String::as_str)
    }
}

impl Lookup for Registry {
    fn atomic(&self, symbol: &str) -> Option<Resolved> {
        self.defined.get(symbol).copied()
            .or_else(|| Static.atomic(symbol))
    }
}

pub(crate) fn is_identifier(symbol: &str) -> bool {
    let mut chars = symbol.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn static_table_is_collision_free() {
        let clashes = collisions(ATOMIC.iter().map(|a| a.symbol));
        assert_eq!(clashes, Vec::<String>::new());
    }

    #[test]
    fn static_scales_are_positive() {
        for a in ATOMIC {
            assert!(a.scale.is_finite() && a.scale > 0.0, "{}", a.symbol);
        }
    }

    #[test]
    fn centimeter_is_exactly_one() {
        assert_eq!(lookup("cm"), Ok((1.0, Dimension::LENGTH)));
    }

    #[rstest(/**/ symbol,  scale,          dimension,
             case("g"    , 1.0           , Dimension::MASS),
             case("kg"   , 1e3           , Dimension::MASS),
             case("km"   , 1e5           , Dimension::LENGTH),
             case("mm"   , 0.1           , Dimension::LENGTH),
             case("ms"   , 1e-3          , Dimension::TIME),
             case("mK"   , 1e-3          , Dimension::TEMPERATURE),
             case("Mpc"  , 3.08568e24    , Dimension::LENGTH),
             case("Gyr"  , 3.1536e16     , Dimension::TIME),
             case("hr"   , 3600.0        , Dimension::TIME),
             case("min"  , 60.0          , Dimension::TIME),
             case("H_0"  , 2.3e-18       , Dimension::RATE),
             case("ueV"  , 1.602176634e-18, Dimension::ENERGY),
    )]
    fn resolves(symbol: &str, scale: f64, dimension: Dimension) {
        let (found_scale, found_dimension) = lookup(symbol).unwrap();
        assert_float_eq!(found_scale, scale, r2nd <= 1e-15);
        assert_eq!(found_dimension, dimension);
    }

    #[rstest(symbol, case("furlong"), case("kfurlong"), case("xm"), case("k"), case(""), case("Kg"))]
    fn unknown(symbol: &str) {
        assert_eq!(lookup(symbol), Err(UnitError::UnknownUnitSymbol(symbol.into())));
    }

    #[test]
    fn registry_extends_static_table() {
        let mut registry = Registry::new();
        registry.define("Mearth", 5.9722e27, Dimension::MASS).unwrap();
        assert_eq!(registry.lookup("Mearth"), Ok((5.9722e27, Dimension::MASS)));
        let (scale, _) = registry.lookup("kMearth").unwrap();
        assert_float_eq!(scale, 5.9722e30, r2nd <= 1e-15);
        assert_eq!(registry.lookup("pc"), Static.lookup("pc"));
        assert!(Static.lookup("Mearth").is_err());
    }

    #[rstest(/**/ symbol,   scale,  expected,
             case("pc"    , 1.0   , UnitError::SymbolCollision("pc".into())),
             case("kpc"   , 1.0   , UnitError::SymbolCollision("kpc".into())),
             case("sun"   , 1.0   , UnitError::SymbolCollision("Tsun".into())),
    )]
    fn registry_rejects_collisions(symbol: &str, scale: f64, expected: UnitError) {
        let mut registry = Registry::new();
        assert_eq!(registry.define(symbol, scale, Dimension::MASS), Err(expected));
        assert!(registry.is_empty());
    }

    #[rstest(scale, case(0.0), case(-1.0), case(f64::NAN), case(f64::INFINITY))]
    fn registry_rejects_bad_scales(scale: f64) {
        let mut registry = Registry::new();
        let result = registry.define("thing", scale, Dimension::MASS);
        assert!(matches!(result, Err(UnitError::InvalidScaleValue(_))));
    }

    #[test]
    fn registry_rejects_non_identifiers() {
        let mut registry = Registry::new();
        let result = registry.define("two words", 1.0, Dimension::MASS);
        assert!(matches!(result, Err(UnitError::MalformedExpression { .. })));
    }
}
