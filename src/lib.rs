//! Physical quantities with run-time dimensional analysis.
//!
//! Re-exports the [`units`] engine, and adds ready-made units, physical
//! constants and a configuration file for user-defined units.
//!
//! ```
//! use dimensionful::{common_units::*, constants, Quantity};
//!
//! let mass_earth = Quantity::new(5.9742e27, g())?;
//! let mass_sun   = Quantity::new(1.0, Msun())?;
//! let distance   = Quantity::new(1.0, AU())?;
//!
//! let masses = (mass_earth * mass_sun)?;
//! let mut force = ((constants::G() * masses)? / distance.powi(2)?)?;
//! force.convert_to_cgs();
//! assert_eq!(force.unit().to_string(), "g * cm * s**-2");
//! # Ok::<(), dimensionful::UnitError>(())
//! ```

pub use units::*;

pub mod common_units;
pub mod constants;
pub mod config;
