//! Units whose dimensions are checked at run time.
//!
//! A [`Unit`] is a scale relative to cgs plus a [`Dimension`]: a vector of
//! rational exponents of mass, length, time and temperature. Units are parsed
//! from expressions such as `"km s^-1 Mpc^-1"` and combine freely under
//! multiplication, division and exponentiation.
//!
//! A [`Quantity`] pairs some numeric [`Data`] with a `Unit`, and refuses to
//! add, subtract or compare values of different dimensions.
//!
//! ```
//! use units::Quantity;
//!
//! let mut density = Quantity::new(1e-29_f64, "g cm^-3")?;
//! density.convert_to("Msun Mpc^-3")?;
//! assert!((density.data() - 1.47721e11).abs() < 1e7);
//! # Ok::<(), units::UnitError>(())
//! ```

mod dimension;
mod error;
mod expr;
mod interop;
mod parse;
mod quantity;
mod unit;

pub mod table;

pub use dimension::{Base, Dimension, Exponent};
pub use error::{Result, UnitError};
pub use expr::{Factor, UnitExpr};
pub use parse::{exponent_from_f64, parse, parse_with, MAX_DENOMINATOR};
pub use quantity::{Data, Quantity};
pub use table::{Lookup, Prefix, Registry};
pub use unit::{Unit, UnitRepr, UnitSource, SCALE_TOLERANCE};
