//! Physical constants in cgs.
#![allow(non_snake_case)]

use std::f64::consts::TAU;

use units::{Dimension, Quantity, Unit};

use crate::common_units::{esu, g};

fn cgs(data: f64, dimension: Dimension) -> Quantity<f64> {
    Quantity::from_parts(data, Unit::cgs(dimension))
}

/// Speed of light in vacuum
pub fn c() -> Quantity<f64> { cgs(2.99792458e10, Dimension::VELOCITY) }

/// Newtonian constant of gravitation
pub fn G() -> Quantity<f64> { cgs(6.673e-8, Dimension::new(-1, 3, -2, 0)) }

/// Boltzmann constant
pub fn k() -> Quantity<f64> { cgs(1.38064e-16, Dimension::ENERGY - Dimension::TEMPERATURE) }

/// Planck constant
pub fn h() -> Quantity<f64> { cgs(6.626070e-27, Dimension::ENERGY + Dimension::TIME) }

/// Reduced Planck constant, h / 2π
pub fn hbar() -> Quantity<f64> { h() / TAU }

/// Elementary charge
pub fn e() -> Quantity<f64> { Quantity::from_parts(4.8032068e-10, esu()) }

/// Proton mass
pub fn m_p() -> Quantity<f64> { Quantity::from_parts(1.672623e-24, g()) }

/// Electron mass
pub fn m_e() -> Quantity<f64> { Quantity::from_parts(9.109389e-28, g()) }

/// Atomic mass unit
pub fn amu() -> Quantity<f64> { Quantity::from_parts(1.6605402e-24, g()) }

/// Thomson cross-section
pub fn sigma_T() -> Quantity<f64> { cgs(6.6524588e-25, Dimension::AREA) }

/// Stefan-Boltzmann constant
pub fn sigma_SB() -> Quantity<f64> { cgs(5.67e-5, Dimension::new(1, 0, -3, -4)) }

/// Radiation constant
pub fn a() -> Quantity<f64> { cgs(7.5657e-15, Dimension::new(1, -1, -2, -4)) }

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use units::Exponent;

    #[rstest(/**/ constant,   dimension,
             case(c(),        Dimension::VELOCITY),
             case(G(),        Dimension::new(-1, 3, -2, 0)),
             case(k(),        Dimension::ENERGY - Dimension::TEMPERATURE),
             case(h(),        Dimension::ENERGY + Dimension::TIME),
             case(hbar(),     Dimension::ENERGY + Dimension::TIME),
             case(e(),        Dimension::CHARGE),
             case(m_p(),      Dimension::MASS),
             case(m_e(),      Dimension::MASS),
             case(amu(),      Dimension::MASS),
             case(sigma_T(),  Dimension::AREA),
             case(sigma_SB(), Dimension::new(1, 0, -3, -4)),
             case(a(),        Dimension::new(1, -1, -2, -4)),
    )]
    fn dimensions(constant: Quantity<f64>, dimension: Dimension) {
        assert_eq!(constant.unit().dimension(), dimension);
        assert_eq!(constant.unit().scale(), 1.0);
    }

    #[test]
    fn displayed_in_cgs_base_units() {
        assert_eq!(G().unit().to_string(), "g**-1 * cm**3 * s**-2");
        assert_eq!(k().unit().to_string(), "g * cm**2 * s**-2 * K**-1");
        assert_eq!(e().unit().to_string(), "esu");
    }

    #[test]
    fn reduced_planck() {
        assert_float_eq!(*hbar().data(), 1.0545716e-27, r2nd <= 1e-6);
    }

    #[test]
    fn radiation_constant_from_stefan_boltzmann() {
        // a = 4 σ / c
        let a_derived = (4.0_f64 * sigma_SB() / c()).unwrap();
        assert_float_eq!(a_derived.get_data_in(a().unit()).unwrap(), *a().data(), r2nd <= 1e-3);
    }

    #[test]
    fn charge_squared_is_energy_times_length() {
        let e2 = e().pow(Exponent::from_integer(2)).unwrap();
        assert_eq!(e2.unit().dimension(), Dimension::ENERGY + Dimension::LENGTH);
    }
}
