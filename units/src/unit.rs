//! Units: a display expression, a scale to cgs and a dimension.

use std::fmt;
use std::ops::{Div, Mul};
use std::str::FromStr;

use float_eq::float_eq;
use num_traits::One;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::dimension::{Dimension, Exponent};
use crate::error::{Result, UnitError};
use crate::expr::UnitExpr;
use crate::table::{Atomic, Lookup, Prefix, Static};

/// Relative tolerance within which two scales count as equal.
pub const SCALE_TOLERANCE: f64 = 1e-12;

/// A (possibly compound) unit.
///
/// Two units are equal when they have the same dimension and the same scale,
/// however they are spelled: `km s^-1 == m ms^-1`.
#[derive(Debug, Clone)]
pub struct Unit {
    expr: UnitExpr,
    scale: f64,
    dimension: Dimension,
}

/// The ways of building a [`Unit`].
#[derive(Debug, Clone)]
pub enum UnitSource {
    /// Parse a unit expression such as `"km s^-1 Mpc^-1"`.
    Expression(String),
    /// Reuse an existing unit.
    Copy(Unit),
    /// A named unit that is not in the symbol table.
    Custom { symbol: String, scale: f64, dimension: Dimension },
    Dimensionless,
}

/// Anything that can stand for a unit in the `Quantity` API.
#[derive(Debug, Clone)]
pub enum UnitRepr {
    Expression(String),
    Unit(Unit),
    /// A scalar quantity used as a unit: its data becomes a prefactor.
    Quantity(f64, Unit),
}

impl UnitRepr {
    /// Prefactor and unit. Only the `Quantity` variant has a prefactor
    /// other than 1.
    pub fn resolve(self) -> Result<(f64, Unit)> {
        match self {
            UnitRepr::Expression(expr)     => Ok((1.0, Unit::parse(&expr)?)),
            UnitRepr::Unit(unit)           => Ok((1.0, unit)),
            UnitRepr::Quantity(data, unit) => Ok((data, unit)),
        }
    }

    /// The unit, when a bare unit is required.
    pub fn into_unit(self) -> Result<Unit> {
        match self {
            UnitRepr::Expression(expr) => Unit::parse(&expr),
            UnitRepr::Unit(unit)       => Ok(unit),
            UnitRepr::Quantity(data, unit) => Err(UnitError::ArgumentType(format!(
                "the quantity `{data} {unit}` is not a unit"
            ))),
        }
    }
}

impl From<&str>    for UnitRepr { fn from(s: &str)    -> Self { UnitRepr::Expression(s.to_string()) } }
impl From<String>  for UnitRepr { fn from(s: String)  -> Self { UnitRepr::Expression(s) } }
impl From<&String> for UnitRepr { fn from(s: &String) -> Self { UnitRepr::Expression(s.clone()) } }
impl From<Unit>    for UnitRepr { fn from(u: Unit)    -> Self { UnitRepr::Unit(u) } }
impl From<&Unit>   for UnitRepr { fn from(u: &Unit)   -> Self { UnitRepr::Unit(u.clone()) } }

impl Unit {

    pub fn dimensionless() -> Self {
        Self { expr: UnitExpr::one(), scale: 1.0, dimension: Dimension::DIMENSIONLESS }
    }

    /// Parse a unit expression against the static symbol table.
    pub fn parse(expr: &str) -> Result<Self> { crate::parse::parse(expr) }

    /// Parse a unit expression, resolving symbols through `table`.
    pub fn parse_with(expr: &str, table: &(impl Lookup + ?Sized)) -> Result<Self> {
        crate::parse::parse_with(expr, table)
    }

    pub fn from_source(source: UnitSource) -> Result<Self> {
        match source {
            UnitSource::Expression(expr) => Self::parse(&expr),
            UnitSource::Copy(unit)       => Ok(unit),
            UnitSource::Custom { symbol, scale, dimension } => Self::custom(&symbol, scale, dimension),
            UnitSource::Dimensionless    => Ok(Self::dimensionless()),
        }
    }

    /// Loose constructor, mirroring `Unit(expr?, scale?, dimension?)`.
    ///
    /// + nothing: dimensionless
    /// + `expr` alone: parse it, or copy it if it is already a unit
    /// + `expr` plus both `scale` and `dimension`: a custom unit whose symbol
    ///   is `expr`
    ///
    /// Supplying only one of `scale` and `dimension` is an error.
    pub fn new(expr: Option<UnitRepr>, scale: Option<f64>, dimension: Option<Dimension>) -> Result<Self> {
        use UnitRepr as R;
        let source = match (expr, scale, dimension) {
            (Some(R::Quantity(data, unit)), _, _) => return Err(UnitError::ArgumentType(format!(
                "the quantity `{data} {unit}` is not a unit"
            ))),
            (None                 , None, None) => UnitSource::Dimensionless,
            (Some(R::Expression(e)), None, None) => UnitSource::Expression(e),
            (Some(R::Unit(u))      , None, None) => UnitSource::Copy(u),
            (Some(R::Expression(symbol)), Some(scale), Some(dimension)) =>
                UnitSource::Custom { symbol, scale, dimension },
            (Some(R::Unit(u)), Some(_), Some(_)) => return Err(UnitError::ArgumentType(format!(
                "a custom unit needs a symbol, not the unit `{u}`"
            ))),
            (None, Some(_), Some(_)) => return Err(UnitError::InvalidCustomUnitSpec(
                "a custom unit needs a symbol".into()
            )),
            (_, Some(scale), None) => return Err(UnitError::InvalidCustomUnitSpec(format!(
                "scale {scale} supplied without a dimension"
            ))),
            (_, None, Some(dimension)) => return Err(UnitError::InvalidCustomUnitSpec(format!(
                "dimension {dimension} supplied without a scale"
            ))),
        };
        Self::from_source(source)
    }

    /// A named unit which is not in the symbol table.
    ///
    /// Symbols that the static table already resolves are refused, so that a
    /// symbol in a display form always means one thing.
    pub fn custom(symbol: &str, scale: f64, dimension: Dimension) -> Result<Self> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(UnitError::InvalidCustomUnitSpec("a custom unit needs a symbol".into()));
        }
        if Static.lookup(symbol).is_ok() {
            return Err(UnitError::SymbolCollision(symbol.to_string()));
        }
        check_scale(symbol, scale)?;
        Ok(Self { expr: UnitExpr::atom(symbol, scale, dimension), scale, dimension })
    }

    /// The cgs unit of `dimension`, e.g. `g * cm**-3` for mass density.
    pub fn cgs(dimension: Dimension) -> Self {
        Self { expr: UnitExpr::cgs(dimension), scale: 1.0, dimension }
    }

    pub fn atomic(atomic: &Atomic) -> Self {
        Self {
            expr: UnitExpr::atom(atomic.symbol, atomic.scale, atomic.dimension),
            scale: atomic.scale,
            dimension: atomic.dimension,
        }
    }

    pub fn prefixed(prefix: Prefix, atomic: &Atomic) -> Self {
        let scale = prefix.apply(atomic.scale);
        Self {
            expr: UnitExpr::atom(format!("{}{}", prefix.symbol, atomic.symbol), scale, atomic.dimension),
            scale,
            dimension: atomic.dimension,
        }
    }

    /// Derive scale and dimension from the factors of `expr`.
    pub fn from_expr(expr: UnitExpr) -> Result<Self> {
        let dimension = expr.dimension().ok_or_else(|| UnitError::InvalidExponent(format!(
            "the dimension of `{expr}` overflows"
        )))?;
        let scale = expr.scale().ok_or_else(|| UnitError::InvalidScaleValue(format!(
            "the scale of `{expr}` is outside the range of f64"
        )))?;
        Ok(Self { expr, scale, dimension })
    }

    pub fn expr     (&self) -> &UnitExpr  { &self.expr }
    pub fn scale    (&self) -> f64        {  self.scale }
    pub fn dimension(&self) -> Dimension  {  self.dimension }

    pub fn is_dimensionless(&self) -> bool { self.dimension.is_dimensionless() }

    pub fn same_dimensions_as(&self, other: &Unit) -> bool { self.dimension == other.dimension }

    /// Same dimension and bit-identical scale.
    pub fn is_identical(&self, other: &Unit) -> bool {
        self.dimension == other.dimension && self.scale == other.scale
    }

    /// This unit expressed purely in cgs base units, with scale 1.
    pub fn cgs_equivalent(&self) -> Self { Self::cgs(self.dimension) }

    /// Number of `to` in one of `self`.
    pub fn conversion_factor(&self, to: &Unit) -> Result<f64> {
        if !self.same_dimensions_as(to) {
            return Err(UnitError::mismatch(self, to));
        }
        Ok(self.scale / to.scale)
    }

    // ----- Algebra -------------------------------------------------------------------
    // These fail only when an exponent or the scale cannot be represented.

    pub fn checked_mul(&self, rhs: &Unit) -> Result<Self> { Self::from_expr(self.expr.mul(&rhs.expr)?) }
    pub fn checked_div(&self, rhs: &Unit) -> Result<Self> { Self::from_expr(self.expr.div(&rhs.expr)?) }

    pub fn pow(&self, power: Exponent) -> Result<Self> { Self::from_expr(self.expr.pow(power)?) }

    pub fn powi(&self, power: i64) -> Result<Self> { self.pow(Exponent::from_integer(power)) }

    /// Raise to a float power, approximated by a rational.
    pub fn powf(&self, power: f64) -> Result<Self> {
        self.pow(crate::parse::exponent_from_f64(power)?)
    }

    pub fn recip(&self) -> Result<Self> { self.pow(-Exponent::one()) }

    pub fn sqrt(&self) -> Result<Self> { self.pow(Exponent::new(1, 2)) }
}

fn check_scale(symbol: &str, scale: f64) -> Result<()> {
    if scale.is_finite() && scale > 0.0 { Ok(()) }
    else {
        Err(UnitError::InvalidScaleValue(format!(
            "`{symbol}` has scale {scale}, which is not a positive finite number"
        )))
    }
}

pub(crate) fn exponent_to_f64(power: Exponent) -> f64 {
    *power.numer() as f64 / *power.denom() as f64
}

/// `scale**power`, exact for small integer powers.
pub(crate) fn pow_scale(scale: f64, power: Exponent) -> f64 {
    if power.is_integer() {
        if let Ok(n) = i32::try_from(*power.numer()) {
            return scale.powi(n);
        }
    }
    scale.powf(exponent_to_f64(power))
}

impl Default for Unit {
    fn default() -> Self { Self::dimensionless() }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.dimension == other.dimension
            && float_eq!(self.scale, other.scale, r2nd <= SCALE_TOLERANCE)
    }
}

macro_rules! unit_binop {
    ($trait:ident $method:ident $checked:ident) => {
        impl $trait<&Unit> for &Unit {
            type Output = Result<Unit>;
            fn $method(self, rhs: &Unit) -> Self::Output { self.$checked(rhs) }
        }
        impl $trait<Unit> for Unit {
            type Output = Result<Unit>;
            fn $method(self, rhs: Unit) -> Self::Output { self.$checked(&rhs) }
        }
        impl $trait<&Unit> for Unit {
            type Output = Result<Unit>;
            fn $method(self, rhs: &Unit) -> Self::Output { self.$checked(rhs) }
        }
        impl $trait<Unit> for &Unit {
            type Output = Result<Unit>;
            fn $method(self, rhs: Unit) -> Self::Output { self.$checked(&rhs) }
        }
    };
}

unit_binop!(Mul mul checked_mul);
unit_binop!(Div div checked_div);

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.expr) }
}

impl FromStr for Unit {
    type Err = UnitError;
    fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}
