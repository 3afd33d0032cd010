//! Numeric data tagged with a [`Unit`].
//!
//! Every operator checks dimensions: quantities of different dimensions can
//! be multiplied and divided, but not added, subtracted or compared.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use ndarray::{Array, Dimension as Shape};

use crate::dimension::Exponent;
use crate::error::{Result, UnitError};
use crate::parse::exponent_from_f64;
use crate::table::Lookup;
use crate::unit::{exponent_to_f64, Unit, UnitRepr};

/// Numeric payload of a [`Quantity`]: a scalar or an array of scalars.
pub trait Data: Clone + fmt::Debug {
    /// Multiply every element by `factor`.
    fn scale_mut(&mut self, factor: f64);
    /// Divide every element by `divisor`.
    fn unscale_mut(&mut self, divisor: f64);
    fn powf(self, power: f64) -> Self;
    fn abs(self) -> Self;

    fn scaled(mut self, factor: f64) -> Self {
        self.scale_mut(factor);
        self
    }
}

// Conversion factors can lie far outside the range of the element type, so
// scaling is done in f64.
macro_rules! scalar_data {
    ($($t:ty)*) => {$(
        impl Data for $t {
            fn scale_mut  (&mut self, factor : f64) { *self = (*self as f64 * factor ) as $t; }
            fn unscale_mut(&mut self, divisor: f64) { *self = (*self as f64 / divisor) as $t; }
            fn powf(self, power: f64) -> Self { <$t>::powf(self, power as $t) }
            fn abs (self)             -> Self { <$t>::abs(self) }
        }

        impl<D: Shape> Data for Array<$t, D> {
            fn scale_mut  (&mut self, factor : f64) { self.mapv_inplace(|x| (x as f64 * factor ) as $t); }
            fn unscale_mut(&mut self, divisor: f64) { self.mapv_inplace(|x| (x as f64 / divisor) as $t); }
            fn powf(self, power: f64) -> Self { self.mapv_into(|x| x.powf(power as $t)) }
            fn abs (self)             -> Self { self.mapv_into(<$t>::abs) }
        }
    )*};
}

scalar_data!(f64 f32);

/// Data together with the unit it is measured in.
#[derive(Debug, Clone)]
pub struct Quantity<T> {
    data: T,
    unit: Unit,
}

impl<T: Data> Quantity<T> {

    /// `unit` may be a unit expression, a [`Unit`], or a scalar
    /// `Quantity<f64>`, whose data multiplies `data`.
    pub fn new(data: T, unit: impl Into<UnitRepr>) -> Result<Self> {
        let (prefactor, unit) = unit.into().resolve()?;
        let data = if prefactor == 1.0 { data } else { data.scaled(prefactor) };
        Ok(Self { data, unit })
    }

    pub fn from_parts(data: T, unit: Unit) -> Self { Self { data, unit } }

    pub fn dimensionless(data: T) -> Self { Self::from_parts(data, Unit::dimensionless()) }

    pub fn data(&self) -> &T    { &self.data }
    pub fn unit(&self) -> &Unit { &self.unit }

    pub fn into_data (self) -> T         { self.data }
    pub fn into_parts(self) -> (T, Unit) { (self.data, self.unit) }

    pub fn is_dimensionless(&self) -> bool { self.unit.is_dimensionless() }

    /// Re-express this quantity in `target`.
    ///
    /// On failure the quantity is left untouched.
    pub fn convert_to(&mut self, target: impl Into<UnitRepr>) -> Result<&mut Self> {
        let target = target.into().into_unit()?;
        let factor = self.unit.conversion_factor(&target)?;
        if !self.unit.is_identical(&target) {
            self.data.scale_mut(factor);
        }
        tracing::trace!(from = %self.unit, to = %target, factor, "converted quantity");
        self.unit = target;
        Ok(self)
    }

    pub fn convert_to_cgs(&mut self) -> &mut Self {
        self.data.scale_mut(self.unit.scale());
        self.unit = self.unit.cgs_equivalent();
        self
    }

    /// A copy of this quantity expressed in `target`.
    pub fn get_in(&self, target: impl Into<UnitRepr>) -> Result<Self> {
        let mut copy = self.clone();
        copy.convert_to(target)?;
        Ok(copy)
    }

    pub fn get_in_cgs(&self) -> Self {
        let mut copy = self.clone();
        copy.convert_to_cgs();
        copy
    }

    /// The data of this quantity as measured in `target`.
    pub fn get_data_in(&self, target: impl Into<UnitRepr>) -> Result<T> {
        Ok(self.get_in(target)?.data)
    }

    pub fn get_data_in_cgs(&self) -> T { self.data.clone().scaled(self.unit.scale()) }

    /// Consume, yielding the data measured in `unit`.
    fn into_data_in(self, unit: &Unit) -> Result<T> {
        let factor = self.unit.conversion_factor(unit)?;
        Ok(if self.unit.is_identical(unit) { self.data } else { self.data.scaled(factor) })
    }

    // ----- Powers --------------------------------------------------------------------
    pub fn pow(self, power: Exponent) -> Result<Self> {
        let unit = self.unit.pow(power)?;
        Ok(Self { data: self.data.powf(exponent_to_f64(power)), unit })
    }

    pub fn powi(self, power: i64) -> Result<Self> { self.pow(Exponent::from_integer(power)) }

    /// The data is raised to the same rational approximation of `power` as
    /// the unit.
    pub fn powf(self, power: f64) -> Result<Self> { self.pow(exponent_from_f64(power)?) }

    /// Raise to a power given by a dimensionless quantity.
    pub fn pow_quantity(self, power: &Quantity<f64>) -> Result<Self> {
        if !power.is_dimensionless() {
            return Err(UnitError::NonDimensionlessExponent(power.unit.to_string()));
        }
        let power = power.get_data_in(Unit::dimensionless())?;
        self.powf(power)
    }

    pub fn sqrt(self) -> Result<Self> { self.pow(Exponent::new(1, 2)) }

    pub fn abs(self) -> Self { Self { data: self.data.abs(), unit: self.unit } }

    // ----- Comparisons ---------------------------------------------------------------
    fn other_in_own_unit(&self, other: &Self) -> Result<T> {
        if !self.unit.same_dimensions_as(&other.unit) {
            return Err(UnitError::mismatch(&self.unit, &other.unit));
        }
        other.get_data_in(&self.unit)
    }

    /// Compare data after expressing `other` in this quantity's unit.
    pub fn try_eq(&self, other: &Self) -> Result<bool>
    where
        T: PartialEq,
    {
        Ok(self.data == self.other_in_own_unit(other)?)
    }

    pub fn compare(&self, other: &Self) -> Result<Option<Ordering>>
    where
        T: PartialOrd,
    {
        Ok(self.data.partial_cmp(&self.other_in_own_unit(other)?))
    }

    pub fn try_lt(&self, other: &Self) -> Result<bool> where T: PartialOrd { Ok(self.data <  self.other_in_own_unit(other)?) }
    pub fn try_le(&self, other: &Self) -> Result<bool> where T: PartialOrd { Ok(self.data <= self.other_in_own_unit(other)?) }
    pub fn try_gt(&self, other: &Self) -> Result<bool> where T: PartialOrd { Ok(self.data >  self.other_in_own_unit(other)?) }
    pub fn try_ge(&self, other: &Self) -> Result<bool> where T: PartialOrd { Ok(self.data >= self.other_in_own_unit(other)?) }
}

impl Quantity<f64> {
    /// Parse `"<number> <unit expression>"`, resolving symbols through `table`.
    pub fn parse_with(text: &str, table: &(impl Lookup + ?Sized)) -> Result<Self> {
        let text = text.trim();
        let (number, unit) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
        let data = number.parse::<f64>().map_err(|_| UnitError::MalformedExpression {
            expr: text.to_string(),
            reason: format!("`{number}` is not a number"),
        })?;
        Ok(Self::from_parts(data, Unit::parse_with(unit, table)?))
    }
}

impl FromStr for Quantity<f64> {
    type Err = UnitError;
    fn from_str(s: &str) -> Result<Self> { Self::parse_with(s, &crate::table::Static) }
}

impl From<Quantity<f64>> for UnitRepr {
    fn from(q: Quantity<f64>) -> Self { UnitRepr::Quantity(q.data, q.unit) }
}

impl From<&Quantity<f64>> for UnitRepr {
    fn from(q: &Quantity<f64>) -> Self { UnitRepr::Quantity(q.data, q.unit.clone()) }
}

impl<T: Data + fmt::Display> fmt::Display for Quantity<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.data, self.unit)
    }
}

/// `false` across dimensions.
impl<T: Data + PartialEq> PartialEq for Quantity<T> {
    fn eq(&self, other: &Self) -> bool { self.try_eq(other).unwrap_or(false) }
}

/// `None` across dimensions.
impl<T: Data + PartialOrd> PartialOrd for Quantity<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok().flatten()
    }
}

// ----- Quantity (+-) Quantity: same dimension, result in the left unit --------------
macro_rules! checked_sum {
    ($trait:ident $method:ident) => {
        impl<T: Data + $trait<Output = T>> $trait for Quantity<T> {
            type Output = Result<Quantity<T>>;
            fn $method(self, rhs: Self) -> Self::Output {
                if !self.unit.same_dimensions_as(&rhs.unit) {
                    return Err(UnitError::mismatch(&self.unit, &rhs.unit));
                }
                let rhs = rhs.into_data_in(&self.unit)?;
                Ok(Quantity { data: $trait::$method(self.data, rhs), unit: self.unit })
            }
        }
        impl<T: Data + $trait<Output = T>> $trait<&Quantity<T>> for &Quantity<T> {
            type Output = Result<Quantity<T>>;
            fn $method(self, rhs: &Quantity<T>) -> Self::Output { $trait::$method(self.clone(), rhs.clone()) }
        }
        impl<T: Data + $trait<Output = T>> $trait<&Quantity<T>> for Quantity<T> {
            type Output = Result<Quantity<T>>;
            fn $method(self, rhs: &Quantity<T>) -> Self::Output { $trait::$method(self, rhs.clone()) }
        }
        impl<T: Data + $trait<Output = T>> $trait<Quantity<T>> for &Quantity<T> {
            type Output = Result<Quantity<T>>;
            fn $method(self, rhs: Quantity<T>) -> Self::Output { $trait::$method(self.clone(), rhs) }
        }
    };
}

checked_sum!(Add add);
checked_sum!(Sub sub);

// ----- Quantity (*/) Quantity: any dimensions --------------------------------------
// Fails only when the resulting unit cannot be represented.
macro_rules! product {
    ($trait:ident $method:ident) => {
        impl<T: Data + $trait<Output = T>> $trait for Quantity<T> {
            type Output = Result<Quantity<T>>;
            fn $method(self, rhs: Self) -> Self::Output {
                let unit = $trait::$method(&self.unit, &rhs.unit)?;
                Ok(Quantity { data: $trait::$method(self.data, rhs.data), unit })
            }
        }
        impl<T: Data + $trait<Output = T>> $trait<&Quantity<T>> for &Quantity<T> {
            type Output = Result<Quantity<T>>;
            fn $method(self, rhs: &Quantity<T>) -> Self::Output { $trait::$method(self.clone(), rhs.clone()) }
        }
        impl<T: Data + $trait<Output = T>> $trait<&Quantity<T>> for Quantity<T> {
            type Output = Result<Quantity<T>>;
            fn $method(self, rhs: &Quantity<T>) -> Self::Output { $trait::$method(self, rhs.clone()) }
        }
        impl<T: Data + $trait<Output = T>> $trait<Quantity<T>> for &Quantity<T> {
            type Output = Result<Quantity<T>>;
            fn $method(self, rhs: Quantity<T>) -> Self::Output { $trait::$method(self.clone(), rhs) }
        }
    };
}

product!(Mul mul);
product!(Div div);

// ----- Bare numbers scale only the data ---------------------------------------------
impl<T: Data> Mul<f64> for Quantity<T> {
    type Output = Quantity<T>;
    fn mul(self, rhs: f64) -> Self::Output { Quantity { data: self.data.scaled(rhs), unit: self.unit } }
}

impl<T: Data> Div<f64> for Quantity<T> {
    type Output = Quantity<T>;
    fn div(mut self, rhs: f64) -> Self::Output {
        self.data.unscale_mut(rhs);
        self
    }
}

impl<T: Data + Neg<Output = T>> Neg for Quantity<T> {
    type Output = Quantity<T>;
    fn neg(self) -> Self::Output { Quantity { data: -self.data, unit: self.unit } }
}

impl<T: Data + Neg<Output = T>> Neg for &Quantity<T> {
    type Output = Quantity<T>;
    fn neg(self) -> Self::Output { -self.clone() }
}

// Bare numbers may only be added to dimensionless quantities, and are taken to
// be in that quantity's unit.
macro_rules! scalar_ops {
    ($($t:ty)*) => {$(
        impl Add<$t> for Quantity<$t> {
            type Output = Result<Quantity<$t>>;
            fn add(self, rhs: $t) -> Self::Output { self.with_bare(rhs, |q, n| q + n) }
        }
        impl Add<Quantity<$t>> for $t {
            type Output = Result<Quantity<$t>>;
            fn add(self, rhs: Quantity<$t>) -> Self::Output { rhs.with_bare(self, |q, n| n + q) }
        }
        impl Sub<$t> for Quantity<$t> {
            type Output = Result<Quantity<$t>>;
            fn sub(self, rhs: $t) -> Self::Output { self.with_bare(rhs, |q, n| q - n) }
        }
        impl Sub<Quantity<$t>> for $t {
            type Output = Result<Quantity<$t>>;
            fn sub(self, rhs: Quantity<$t>) -> Self::Output { rhs.with_bare(self, |q, n| n - q) }
        }

        impl<T: Data> Mul<Quantity<T>> for $t {
            type Output = Quantity<T>;
            fn mul(self, rhs: Quantity<T>) -> Self::Output { rhs * self as f64 }
        }

        /// `n / q` inverts the unit.
        impl Div<Quantity<$t>> for $t {
            type Output = Result<Quantity<$t>>;
            fn div(self, rhs: Quantity<$t>) -> Self::Output {
                Ok(Quantity { unit: rhs.unit.recip()?, data: self / rhs.data })
            }
        }

        impl Quantity<$t> {
            fn with_bare(self, number: $t, op: impl FnOnce($t, $t) -> $t) -> Result<Self> {
                if !self.is_dimensionless() {
                    return Err(UnitError::mismatch(&self.unit, &Unit::dimensionless()));
                }
                Ok(Quantity { data: op(self.data, number), unit: self.unit })
            }
        }
    )*};
}

scalar_ops!(f64 f32);
