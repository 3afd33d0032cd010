//! Bridge to statically-typed `uom` quantities.
//!
//! Going from `uom` to [`Quantity`] always succeeds, and yields data in the
//! cgs unit of the corresponding dimension. Going back checks the dimension
//! at run time.

use uom::si::f64::{Energy, Force, Length, Mass, ThermodynamicTemperature, Time, Velocity};
use uom::si::{energy                   :: erg,
              force                    :: dyne,
              length                   :: centimeter,
              mass                     :: gram,
              thermodynamic_temperature:: kelvin,
              time                     :: second,
              velocity                 :: centimeter_per_second};

use crate::dimension::Dimension;
use crate::error::{Result, UnitError};
use crate::quantity::Quantity;
use crate::unit::Unit;

macro_rules! bridge {
    ($uom:ident $cgs:ident $dimension:ident) => {
        impl From<$uom> for Quantity<f64> {
            fn from(x: $uom) -> Self {
                Quantity::from_parts(x.get::<$cgs>(), Unit::cgs(Dimension::$dimension))
            }
        }

        impl TryFrom<Quantity<f64>> for $uom {
            type Error = UnitError;
            fn try_from(q: Quantity<f64>) -> Result<Self> {
                let cgs = Unit::cgs(Dimension::$dimension);
                Ok($uom::new::<$cgs>(q.get_data_in(&cgs)?))
            }
        }
    };
}

bridge!(Length                   centimeter            LENGTH);
bridge!(Mass                     gram                  MASS);
bridge!(Time                     second                TIME);
bridge!(ThermodynamicTemperature kelvin                TEMPERATURE);
bridge!(Velocity                 centimeter_per_second VELOCITY);
bridge!(Energy                   erg                   ENERGY);
bridge!(Force                    dyne                  FORCE);

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use pretty_assertions::assert_eq;
    use uom::si::{length::{kilometer, meter}, time::hour, energy::joule};

    macro_rules! assert_uom_eq {
        ($unit:ident, $lhs:expr, $rhs:expr, $algo:ident <= $tol:expr) => {
            assert_float_eq!($lhs.get::<$unit>(), $rhs.get::<$unit>(), $algo <= $tol)
        };
    }

    fn q(data: f64, unit: &str) -> Quantity<f64> { Quantity::new(data, unit).unwrap() }

    #[test]
    fn from_uom_is_cgs() {
        let x: Quantity<f64> = Length::new::<kilometer>(2.0).into();
        assert_float_eq!(*x.data(), 2e5, r2nd <= 1e-15);
        assert_eq!(x.unit().to_string(), "cm");

        let e: Quantity<f64> = Energy::new::<joule>(1.0).into();
        assert_float_eq!(*e.data(), 1e7, r2nd <= 1e-12);
        assert_eq!(e.unit(), &Unit::parse("erg").unwrap());
    }

    #[test]
    fn to_uom() {
        let length = Length::try_from(q(3.0, "pc")).unwrap();
        assert_uom_eq!(centimeter, length, Length::new::<centimeter>(3.0 * 3.08568e18), r2nd <= 1e-12);

        let time = Time::try_from(q(90.0, "min")).unwrap();
        assert_uom_eq!(hour, time, Time::new::<hour>(1.5), r2nd <= 1e-12);

        let speed = Velocity::try_from(q(36.0, "km hr^-1")).unwrap();
        assert_float_eq!(speed.get::<uom::si::velocity::meter_per_second>(), 10.0, r2nd <= 1e-12);
    }

    #[test]
    fn round_trip_through_uom() {
        let original = Length::new::<meter>(42.0);
        let back = Length::try_from(Quantity::from(original)).unwrap();
        assert_uom_eq!(meter, back, original, r2nd <= 1e-15);
    }

    #[test]
    fn wrong_dimension() {
        assert!(matches!(Mass::try_from(q(1.0, "cm")), Err(UnitError::DimensionMismatch { .. })));
        assert!(matches!(Force::try_from(q(1.0, "erg")), Err(UnitError::DimensionMismatch { .. })));
    }
}
