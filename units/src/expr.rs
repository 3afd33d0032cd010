//! Display form of a unit: a product of atomic symbols raised to rational
//! powers.
//!
//! Every factor remembers the scale and dimension of its symbol, so the scale
//! and dimension of the whole product are derived from net powers rather than
//! accumulated step by step.

use std::fmt;

use itertools::Itertools;
use num_traits::{CheckedAdd, CheckedMul, One, Zero};

use crate::dimension::{Dimension, Exponent};
use crate::error::{Result, UnitError};
use crate::unit::{exponent_to_f64, pow_scale};

/// One symbol raised to a power, e.g. `s**-1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    pub symbol: String,
    /// Scale of `symbol` itself, relative to cgs.
    pub scale: f64,
    /// Dimension of `symbol` itself.
    pub dimension: Dimension,
    pub power: Exponent,
}

impl Factor {
    /// Same symbol standing for the same unit.
    fn same_base(&self, other: &Factor) -> bool {
        self.symbol == other.symbol
            && self.scale.to_bits() == other.scale.to_bits()
            && self.dimension == other.dimension
    }
}

/// Product of [`Factor`]s.
///
/// Each base appears at most once and never with power zero; factors keep the
/// order in which their bases first appeared. The empty product is the
/// dimensionless unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnitExpr {
    factors: Vec<Factor>,
}

impl UnitExpr {

    pub fn one() -> Self { Self::default() }

    /// A single symbol, to the first power.
    pub fn atom(symbol: impl Into<String>, scale: f64, dimension: Dimension) -> Self {
        Self { factors: vec![Factor { symbol: symbol.into(), scale, dimension, power: Exponent::one() }] }
    }

    /// Product of cgs base symbols with the exponents of `dimension`.
    pub fn cgs(dimension: Dimension) -> Self {
        Self {
            factors: dimension.nonzero()
                .map(|(base, power)| Factor {
                    symbol: base.cgs_symbol().to_string(),
                    scale: 1.0,
                    dimension: base.dimension(),
                    power,
                })
                .collect()
        }
    }

    pub fn factors(&self) -> &[Factor] { &self.factors }

    pub fn is_one(&self) -> bool { self.factors.is_empty() }

    /// Multiply in `symbol**power`, merging with an existing factor of the
    /// same base.
    pub fn push(&mut self, symbol: &str, scale: f64, dimension: Dimension, power: Exponent) -> Result<()> {
        let new = Factor { symbol: symbol.to_string(), scale, dimension, power };
        match self.factors.iter().position(|f| f.same_base(&new)) {
            Some(i) => {
                let merged = self.factors[i].power.checked_add(&power)
                    .ok_or_else(|| overflow(symbol))?;
                if merged.is_zero() {
                    self.factors.remove(i);
                } else {
                    self.factors[i].power = merged;
                }
            }
            None if !power.is_zero() => self.factors.push(new),
            None => {}
        }
        Ok(())
    }

    pub fn mul(&self, other: &Self) -> Result<Self> {
        let mut out = self.clone();
        for Factor { symbol, scale, dimension, power } in &other.factors {
            out.push(symbol, *scale, *dimension, *power)?;
        }
        Ok(out)
    }

    pub fn div(&self, other: &Self) -> Result<Self> { self.mul(&other.pow(-Exponent::one())?) }

    pub fn pow(&self, power: Exponent) -> Result<Self> {
        if power.is_zero() {
            return Ok(Self::one());
        }
        let factors = self.factors.iter()
            .map(|f| Ok(Factor { power: f.power.checked_mul(&power).ok_or_else(|| overflow(&f.symbol))?, ..f.clone() }))
            .collect::<Result<_>>()?;
        Ok(Self { factors })
    }

    /// Sum of the dimensions of all factors. `None` if an exponent overflows.
    pub fn dimension(&self) -> Option<Dimension> {
        self.factors.iter().try_fold(Dimension::DIMENSIONLESS, |total, f| {
            total.checked_add(f.dimension.checked_scale(f.power)?)
        })
    }

    /// Product of `scale**power` over all factors, or `None` when it is not a
    /// normal positive `f64`.
    ///
    /// Factors are multiplied in a canonical order, so the result does not
    /// depend on the order in which they were written. If the running product
    /// leaves the range of `f64`, the product is recomputed as a sum of
    /// logarithms.
    pub fn scale(&self) -> Option<f64> {
        let factors = self.factors.iter()
            .sorted_by(|a, b| a.symbol.cmp(&b.symbol)
                       .then(a.scale.total_cmp(&b.scale))
                       .then(a.power.cmp(&b.power)))
            .collect_vec();
        let direct: f64 = factors.iter().map(|f| pow_scale(f.scale, f.power)).product();
        if direct.is_normal() {
            return Some(direct);
        }
        let log: f64 = factors.iter().map(|f| exponent_to_f64(f.power) * f.scale.ln()).sum();
        let scale = log.exp();
        scale.is_normal().then_some(scale)
    }
}

fn overflow(symbol: &str) -> UnitError {
    UnitError::InvalidExponent(format!("the exponent of `{symbol}` overflows"))
}

/// `base**power`, with fractional powers parenthesized so that the result
/// parses back unambiguously.
pub fn render_power(base: &str, power: Exponent) -> String {
    if power.is_one() {
        base.to_string()
    } else if power.is_integer() {
        format!("{base}**{}", power.numer())
    } else {
        format!("{base}**({}/{})", power.numer(), power.denom())
    }
}

impl fmt::Display for UnitExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_one() {
            return write!(f, "(dimensionless)");
        }
        let rendered = self.factors.iter()
            .map(|Factor { symbol, power, .. }| render_power(symbol, *power))
            .join(" * ");
        write!(f, "{rendered}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const PC: f64 = 3.08568e18;

    fn e(n: i64, d: i64) -> Exponent { Exponent::new(n, d) }
    fn cm() -> UnitExpr { UnitExpr::atom("cm", 1.0, Dimension::LENGTH) }
    fn s () -> UnitExpr { UnitExpr::atom("s" , 1.0, Dimension::TIME) }
    fn pc() -> UnitExpr { UnitExpr::atom("pc", PC , Dimension::LENGTH) }

    #[test]
    fn merges_equal_symbols() {
        let x = cm().mul(&cm()).unwrap()
            .mul(&s().pow(e(-2, 1)).unwrap()).unwrap()
            .mul(&cm()).unwrap();
        assert_eq!(x.to_string(), "cm**3 * s**-2");
        assert_eq!(x.dimension(), Some(Dimension::new(0, 3, -2, 0)));
    }

    #[test]
    fn cancelling_factors_disappear() {
        let km = UnitExpr::atom("km", 1e5, Dimension::LENGTH);
        let x = km.div(&s()).unwrap().mul(&s()).unwrap();
        assert_eq!(x, km);
        assert!(km.div(&km).unwrap().is_one());
        assert_eq!(km.div(&km).unwrap().to_string(), "(dimensionless)");
    }

    #[test]
    fn same_symbol_for_different_units_is_not_merged() {
        let fake = UnitExpr::atom("pc", 1.0, Dimension::MASS);
        let x = fake.mul(&pc()).unwrap();
        assert_eq!(x.factors().len(), 2);
        assert_eq!(x.dimension(), Some(Dimension::MASS + Dimension::LENGTH));
    }

    #[rstest(/**/ power,     rendered,
             case(e( 1, 1),  "pc"),
             case(e( 2, 1),  "pc**2"),
             case(e(-1, 1),  "pc**-1"),
             case(e( 1, 2),  "pc**(1/2)"),
             case(e(-2, 6),  "pc**(-1/3)"),
    )]
    fn render(power: Exponent, rendered: &str) {
        assert_eq!(pc().pow(power).unwrap().to_string(), rendered);
    }

    #[test]
    fn zero_power_is_one() {
        assert!(UnitExpr::atom("g", 1.0, Dimension::MASS).pow(e(0, 1)).unwrap().is_one());
    }

    #[test]
    fn scale_survives_intermediate_overflow() {
        // pc**20 alone is far beyond f64, pc**20 * Mpc**-20 is 1e-120
        let mpc = UnitExpr::atom("Mpc", PC * 1e6, Dimension::LENGTH);
        let x = pc().pow(e(20, 1)).unwrap().div(&mpc.pow(e(20, 1)).unwrap()).unwrap();
        assert_float_eq!(x.scale().unwrap(), 1e-120, r2nd <= 1e-10);
        assert_eq!(x.dimension(), Some(Dimension::DIMENSIONLESS));
    }

    #[test]
    fn unrepresentable_scale() {
        assert_eq!(pc().pow(e(40, 1)).unwrap().scale(), None);
        assert_eq!(pc().pow(e(-40, 1)).unwrap().scale(), None);
    }

    #[test]
    fn exponent_overflow_is_an_error() {
        let x = cm().pow(e(1, i64::MAX)).unwrap();
        assert!(matches!(x.pow(e(1, 2)), Err(UnitError::InvalidExponent(_))));
        let y = cm().pow(e(1, i64::MAX - 1)).unwrap();
        assert!(matches!(x.mul(&y), Err(UnitError::InvalidExponent(_))));
    }
}
