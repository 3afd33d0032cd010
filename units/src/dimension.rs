//! Dimension vectors over the four base dimensions.
//!
//! A [`Dimension`] holds one rational exponent per base dimension, in the
//! fixed order mass, length, time, temperature. Multiplying units adds their
//! dimensions; raising a unit to a power scales its dimension.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use itertools::Itertools;
use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedMul, Zero};

/// Exponent of a base dimension (or of a unit symbol in an expression).
pub type Exponent = Rational64;

/// The base dimensions tracked by the system, in vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Base {
    Mass,
    Length,
    Time,
    Temperature,
}

impl Base {
    pub const ALL: [Base; 4] = [Base::Mass, Base::Length, Base::Time, Base::Temperature];

    /// Position of this base dimension within a [`Dimension`].
    pub const fn index(self) -> usize { self as usize }

    /// Symbol of the cgs unit of this base dimension.
    pub const fn cgs_symbol(self) -> &'static str {
        match self {
            Base::Mass        => "g",
            Base::Length      => "cm",
            Base::Time        => "s",
            Base::Temperature => "K",
        }
    }

    /// Dimension of the cgs unit of this base dimension.
    pub fn dimension(self) -> Dimension {
        let mut exponents = Dimension::DIMENSIONLESS.0;
        exponents[self.index()] = r(1, 1);
        Dimension(exponents)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Base::Mass        => "mass",
            Base::Length      => "length",
            Base::Time        => "time",
            Base::Temperature => "temperature",
        }
    }
}

/// Exponents of mass, length, time and temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimension([Exponent; 4]);

const fn r(numer: i64, denom: i64) -> Exponent { Rational64::new_raw(numer, denom) }

impl Dimension {

    /// Build from integer exponents of mass, length, time, temperature.
    pub const fn new(mass: i64, length: i64, time: i64, temperature: i64) -> Self {
        Self([r(mass, 1), r(length, 1), r(time, 1), r(temperature, 1)])
    }

    /// Build from arbitrary rational exponents, in base-dimension order.
    pub fn from_exponents(exponents: [Exponent; 4]) -> Self { Self(exponents) }

    pub fn exponents(&self) -> &[Exponent; 4] { &self.0 }

    pub fn get(&self, base: Base) -> Exponent { self.0[base.index()] }

    pub fn mass       (&self) -> Exponent { self.get(Base::Mass) }
    pub fn length     (&self) -> Exponent { self.get(Base::Length) }
    pub fn time       (&self) -> Exponent { self.get(Base::Time) }
    pub fn temperature(&self) -> Exponent { self.get(Base::Temperature) }

    pub fn is_dimensionless(&self) -> bool { self.0.iter().all(Zero::is_zero) }

    /// Dimension of a unit raised to `power`.
    ///
    /// Panics if an exponent overflows; see [`Dimension::checked_scale`].
    pub fn scale(self, power: Exponent) -> Self {
        Self(self.0.map(|e| e * power))
    }

    /// `None` if an exponent overflows.
    pub fn checked_scale(self, power: Exponent) -> Option<Self> {
        let mut out = self.0;
        for e in &mut out {
            *e = e.checked_mul(&power)?;
        }
        Some(Self(out))
    }

    /// `None` if an exponent overflows.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let mut out = self.0;
        for (l, r) in out.iter_mut().zip(rhs.0) {
            *l = l.checked_add(&r)?;
        }
        Some(Self(out))
    }

    /// Non-zero exponents, in base-dimension order.
    pub fn nonzero(&self) -> impl Iterator<Item = (Base, Exponent)> + '_ {
        Base::ALL.into_iter()
            .map(|base| (base, self.get(base)))
            .filter(|(_, e)| !e.is_zero())
    }

    // ----- Named dimensions ----------------------------------------------------------
    pub const DIMENSIONLESS     : Self = Self::new( 0,  0,  0,  0);
    pub const MASS              : Self = Self::new( 1,  0,  0,  0);
    pub const LENGTH            : Self = Self::new( 0,  1,  0,  0);
    pub const TIME              : Self = Self::new( 0,  0,  1,  0);
    pub const TEMPERATURE       : Self = Self::new( 0,  0,  0,  1);

    pub const PER_MASS          : Self = Self::new(-1,  0,  0,  0);
    pub const WAVE_NUMBER       : Self = Self::new( 0, -1,  0,  0);
    pub const RATE              : Self = Self::new( 0,  0, -1,  0);
    pub const PER_KELVIN        : Self = Self::new( 0,  0,  0, -1);

    pub const AREA              : Self = Self::new( 0,  2,  0,  0);
    pub const VOLUME            : Self = Self::new( 0,  3,  0,  0);
    pub const SPACE_TIME        : Self = Self::new( 0,  4,  0,  0);
    pub const PHASE_SPACE_VOLUME: Self = Self::new( 0,  6,  0,  0);

    pub const SURFACE_DENSITY   : Self = Self::new( 0, -2,  0,  0);
    pub const NUMBER_DENSITY    : Self = Self::new( 0, -3,  0,  0);
    pub const MASS_DENSITY      : Self = Self::new( 1, -3,  0,  0);

    pub const VELOCITY          : Self = Self::new( 0,  1, -1,  0);
    pub const ACCELERATION      : Self = Self::new( 0,  1, -2,  0);
    pub const JERK              : Self = Self::new( 0,  1, -3,  0);
    pub const SNAP              : Self = Self::new( 0,  1, -4,  0);
    pub const CRACKLE           : Self = Self::new( 0,  1, -5,  0);
    pub const POP               : Self = Self::new( 0,  1, -6,  0);

    pub const MOMENTUM          : Self = Self::new( 1,  1, -1,  0);
    pub const FORCE             : Self = Self::new( 1,  1, -2,  0);
    pub const ENERGY            : Self = Self::new( 1,  2, -2,  0);
    pub const POWER             : Self = Self::new( 1,  2, -3,  0);
    pub const PRESSURE          : Self = Self::new( 1, -1, -2,  0);
    pub const SPECTRAL_FLUX_DENSITY: Self = Self::new(1, 0, -2,  0);

    /// Gaussian charge: (energy * length)^(1/2)
    pub const CHARGE        : Self = Self([r(1, 2), r( 3, 2), r(-1, 1), r(0, 1)]);
    /// Gaussian magnetic field: charge / length^2
    pub const MAGNETIC_FIELD: Self = Self([r(1, 2), r(-1, 2), r(-1, 1), r(0, 1)]);
}

impl Default for Dimension {
    fn default() -> Self { Self::DIMENSIONLESS }
}

impl Add for Dimension {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        let mut out = self.0;
        out.iter_mut().zip(rhs.0).for_each(|(l, r)| *l += r);
        Self(out)
    }
}

impl Sub for Dimension {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output { self + -rhs }
}

impl Neg for Dimension {
    type Output = Self;
    fn neg(self) -> Self::Output { Self(self.0.map(|e| -e)) }
}

impl Mul<Exponent> for Dimension {
    type Output = Self;
    fn mul(self, power: Exponent) -> Self::Output { self.scale(power) }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "(dimensionless)");
        }
        let rendered = self.nonzero()
            .map(|(base, e)| crate::expr::render_power(&format!("({})", base.name()), e))
            .join(" * ");
        write!(f, "{rendered}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn derived_dimensions_compose() {
        use Dimension as D;
        assert_eq!(D::MASS + D::ACCELERATION, D::FORCE);
        assert_eq!(D::FORCE + D::LENGTH     , D::ENERGY);
        assert_eq!(D::ENERGY - D::TIME      , D::POWER);
        assert_eq!(D::MASS - D::VOLUME      , D::MASS_DENSITY);
        assert_eq!(D::LENGTH - D::TIME      , D::VELOCITY);
        assert_eq!(-D::TIME                 , D::RATE);
        assert_eq!((D::ENERGY + D::LENGTH).scale(r(1, 2)), D::CHARGE);
        assert_eq!(D::CHARGE - D::AREA, D::MAGNETIC_FIELD);
    }

    #[rstest(/**/ dimension,            dimensionless,
             case(Dimension::DIMENSIONLESS, true ),
             case(Dimension::default(),     true ),
             case(Dimension::ENERGY - Dimension::ENERGY, true),
             case(Dimension::LENGTH,        false),
             case(Dimension::CHARGE,        false),
    )]
    fn dimensionless_iff_all_zero(dimension: Dimension, dimensionless: bool) {
        assert_eq!(dimension.is_dimensionless(), dimensionless);
    }

    #[test]
    fn scaling_by_fraction() {
        let third = Dimension::new(1, 2, -3, 4).scale(r(-1, 3));
        assert_eq!(third.exponents(), &[r(-1, 3), r(-2, 3), r(1, 1), r(-4, 3)]);
        assert_eq!(third * r(-3, 1), Dimension::new(1, 2, -3, 4));
    }

    #[test]
    fn checked_arithmetic() {
        assert_eq!(Base::Time.dimension(), Dimension::TIME);
        assert_eq!(Dimension::MASS.checked_add(Dimension::ACCELERATION), Some(Dimension::FORCE));
        assert_eq!(Dimension::ENERGY.checked_scale(r(1, 2)), Some(Dimension::ENERGY.scale(r(1, 2))));
        let huge = Dimension::LENGTH.scale(r(1, i64::MAX));
        assert_eq!(huge.checked_scale(r(1, 3)), None);
        assert_eq!(huge.checked_add(Dimension::LENGTH.scale(r(1, i64::MAX - 1))), None);
    }

    #[test]
    fn display() {
        assert_eq!(Dimension::DIMENSIONLESS.to_string(), "(dimensionless)");
        assert_eq!(Dimension::MASS_DENSITY.to_string(), "(mass) * (length)**-3");
        assert_eq!(Dimension::CHARGE.to_string(), "(mass)**(1/2) * (length)**(3/2) * (time)**-1");
    }
}
