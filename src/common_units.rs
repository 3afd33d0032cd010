//! Ready-made units, so that callers can write `cm() / s()` instead of parsing
//! `"cm s^-1"`.
#![allow(non_snake_case)]

use units::table::{self, Prefix};
use units::Unit;

// Making units from the symbol table by hand is long-winded, so provide some
// pithily-named constructors.

/// Generate a function called NAME which returns the unit of the table entry
/// ATOMIC, optionally with a magnitude PREFIX
///
/// wrap!(NAME ATOMIC);
/// wrap!(NAME PREFIX ATOMIC);
macro_rules! wrap {
    ($name:ident $atomic:ident) => {
        pub fn $name() -> Unit { Unit::atomic(&table::$atomic) }
    };
    ($name:ident $prefix:ident $atomic:ident) => {
        pub fn $name() -> Unit { Unit::prefixed(Prefix::$prefix, &table::$atomic) }
    };
}

// cgs base
wrap!(g                 GRAM);
wrap!(cm   CENTI       METER);
wrap!(s               SECOND);
wrap!(K               KELVIN);

// other cgs
wrap!(dyne              DYNE);
wrap!(erg                ERG);
wrap!(esu                ESU);
wrap!(gauss            GAUSS);

// SI
wrap!(m                METER);
wrap!(kg   KILO         GRAM);
wrap!(km   KILO        METER);
wrap!(mm   MILLI       METER);
wrap!(N               NEWTON);
wrap!(J                JOULE);
wrap!(W                 WATT);
wrap!(Pa              PASCAL);
wrap!(Hz               HERTZ);
wrap!(eV        ELECTRONVOLT);
wrap!(mK   MILLI      KELVIN);

// times
wrap!(ms   MILLI      SECOND);
wrap!(minute          MINUTE);
wrap!(hr                HOUR);
wrap!(day                DAY);
wrap!(yr                YEAR);
wrap!(Myr  MEGA         YEAR);
wrap!(Gyr  GIGA         YEAR);

// solar
wrap!(Msun        SOLAR_MASS);
wrap!(Rsun      SOLAR_RADIUS);
wrap!(Lsun  SOLAR_LUMINOSITY);
wrap!(Tsun SOLAR_TEMPERATURE);

// astronomical distances
wrap!(AU   ASTRONOMICAL_UNIT);
wrap!(ly          LIGHT_YEAR);
wrap!(pc              PARSEC);
wrap!(kpc  KILO       PARSEC);
wrap!(Mpc  MEGA       PARSEC);
wrap!(Gpc  GIGA       PARSEC);

// other astro
wrap!(Jy              JANSKY);
wrap!(H_0             HUBBLE);
