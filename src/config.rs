//! Configuration file for user-defined units
//!
//! ```toml
//! precision = 4
//!
//! [[unit]]
//! symbol    = "Mearth"
//! scale     = 5.9722e27
//! dimension = "g"                 # or [1, 0, 0, 0]
//!
//! [[unit]]
//! symbol = "kms"
//! expr   = "km s^-1"
//! ```
//!
//! Units are defined in file order, so later definitions may use earlier ones.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use toml::Value;

use units::{exponent_from_f64, Dimension, Exponent, Registry, Unit, UnitError};

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {

    /// Digits after the decimal point when printing quantities
    #[serde(default)]
    pub precision: Option<usize>,

    /// Extra unit symbols
    #[serde(default, rename = "unit")]
    pub units: Vec<UnitDefinition>,
}

/// One user-defined symbol: either an expression over known symbols, or an
/// explicit scale (relative to cgs) and dimension.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UnitDefinition {
    pub symbol: String,

    #[serde(default)]
    pub expr: Option<String>,

    /// Number, or string containing a number
    #[serde(default)]
    pub scale: Option<Value>,

    /// Unit expression whose dimension is used, or the four exponents of
    /// mass, length, time and temperature
    #[serde(default)]
    pub dimension: Option<Value>,
}

impl Config {
    /// A registry containing every unit defined in this configuration.
    pub fn registry(&self) -> units::Result<Registry> {
        let mut registry = Registry::new();
        for definition in &self.units {
            definition.define_in(&mut registry)?;
        }
        Ok(registry)
    }
}

impl UnitDefinition {

    pub fn define_in(&self, registry: &mut Registry) -> units::Result<()> {
        let symbol = &self.symbol;
        let (scale, dimension) = match (&self.expr, &self.scale, &self.dimension) {
            (Some(expr), None, None) => {
                let unit = Unit::parse_with(expr, &*registry)?;
                (unit.scale(), unit.dimension())
            }
            (Some(_), _, _) => return Err(UnitError::InvalidCustomUnitSpec(format!(
                "`{symbol}`: `expr` cannot be combined with `scale` or `dimension`"
            ))),
            (None, Some(scale), Some(dimension)) => (
                scale_value(symbol, scale)?,
                dimension_value(symbol, dimension, registry)?,
            ),
            (None, _, _) => return Err(UnitError::InvalidCustomUnitSpec(format!(
                "`{symbol}` needs either `expr`, or both `scale` and `dimension`"
            ))),
        };
        registry.define(symbol, scale, dimension)
    }
}

fn scale_value(symbol: &str, value: &Value) -> units::Result<f64> {
    let invalid = || UnitError::InvalidScaleValue(format!("`{symbol}` has scale `{value}`"));
    match value {
        Value::Float(x)   => Ok(*x),
        Value::Integer(n) => Ok(*n as f64),
        Value::String(s)  => s.trim().parse().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn dimension_value(symbol: &str, value: &Value, registry: &Registry) -> units::Result<Dimension> {
    let wrong_type = || UnitError::ArgumentType(format!(
        "dimension of `{symbol}` must be a unit expression or four exponents, not `{value}`"
    ));
    match value {
        Value::String(expr) => Ok(Unit::parse_with(expr, registry)?.dimension()),
        Value::Array(items) => {
            let exponents = items.iter()
                .map(|item| exponent_value(item).ok_or_else(wrong_type))
                .collect::<units::Result<Vec<_>>>()?;
            let exponents: [Exponent; 4] = exponents.try_into().map_err(|_| wrong_type())?;
            Ok(Dimension::from_exponents(exponents))
        }
        _ => Err(wrong_type()),
    }
}

/// `2`, `0.5` or `"1/2"`
fn exponent_value(value: &Value) -> Option<Exponent> {
    match value {
        Value::Integer(n) => Some(Exponent::from_integer(*n)),
        Value::Float(x)   => exponent_from_f64(*x).ok(),
        Value::String(s)  => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn read_config_file(path: PathBuf) -> Result<Config, Box<dyn Error>> {
    let text = fs::read_to_string(&path)
        .map_err(|e| format!("Couldn't read config file `{}`: {e}", path.display()))?;
    let config: Config = toml::from_str(&text)?;
    tracing::debug!(path = %path.display(), units = config.units.len(), "read config file");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use units::Lookup;

    // ----- Some helpers to make the tests more concise ---------------------------------
    fn parse(input: &str) -> Config { toml::from_str(input).unwrap() }

    fn registry(input: &str) -> units::Result<Registry> { parse(input).registry() }

    // ----- Test an example on-disk config file -----------------------------------------
    #[test]
    fn config_file() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("units.toml");
        fs::write(&path, r#"
            precision = 3

            [[unit]]
            symbol    = "Mearth"
            scale     = 5.9722e27
            dimension = "g"

            [[unit]]
            symbol = "kms"
            expr   = "km s^-1"
        "#)?;
        let config = read_config_file(path)?;
        assert_eq!(config.precision, Some(3));
        assert_eq!(config.units.len(), 2);

        let registry = config.registry()?;
        assert_eq!(registry.lookup("Mearth")?, (5.9722e27, Dimension::MASS));
        let (scale, dimension) = registry.lookup("kms")?;
        assert_float_eq!(scale, 1e5, r2nd <= 1e-15);
        assert_eq!(dimension, Dimension::VELOCITY);
        Ok(())
    }

    #[test]
    fn missing_file() {
        assert!(read_config_file("no/such/file.toml".into()).is_err());
    }

    #[test]
    fn empty_config() {
        assert_eq!(parse(""), Config::default());
        assert!(registry("").unwrap().is_empty());
    }

    #[test]
    #[should_panic]
    fn reject_unknown_field() {
        parse("unknown_field = 666");
    }

    #[test]
    #[should_panic]
    fn reject_unknown_unit_field() {
        parse(r#"
            [[unit]]
            symbol = "x"
            colour = "blue"
        "#);
    }

    #[rstest(/**/ dimension,                        expected,
             case(r#""g""#,                         Dimension::MASS),
             case(r#""erg""#,                       Dimension::ENERGY),
             case("[1, 0, 0, 0]",                   Dimension::MASS),
             case("[0, 1, -1, 0]",                  Dimension::VELOCITY),
             case(r#"["1/2", "3/2", -1, 0]"#,       Dimension::CHARGE),
             case("[0.5, -0.5, -1, 0]",             Dimension::MAGNETIC_FIELD),
    )]
    fn dimension_spellings(dimension: &str, expected: Dimension) {
        let registry = registry(&format!(r#"
            [[unit]]
            symbol    = "thing"
            scale     = 2
            dimension = {dimension}
        "#)).unwrap();
        assert_eq!(registry.lookup("thing"), Ok((2.0, expected)));
    }

    #[test]
    fn string_scale() {
        let registry = registry(r#"
            [[unit]]
            symbol    = "thing"
            scale     = "1e3"
            dimension = "s"
        "#).unwrap();
        assert_eq!(registry.lookup("thing"), Ok((1e3, Dimension::TIME)));
    }

    #[test]
    fn later_definitions_use_earlier_ones() {
        let registry = registry(r#"
            [[unit]]
            symbol    = "Mearth"
            scale     = 5.9722e27
            dimension = [1, 0, 0, 0]

            [[unit]]
            symbol = "rho_earth"
            expr   = "Mearth Rsun^-3"
        "#).unwrap();
        let (scale, dimension) = registry.lookup("rho_earth").unwrap();
        assert_eq!(dimension, Dimension::MASS_DENSITY);
        assert_float_eq!(scale, 5.9722e27 / 6.96e10_f64.powi(3), r2nd <= 1e-12);
    }

    #[rstest(/**/ body,                                                      check,
             case(r#"expr = "g"
                     scale = 1"#,                                            "spec"),
             case("scale = 1",                                               "spec"),
             case(r#"dimension = "g""#,                                      "spec"),
             case(r#"scale = "lots"
                     dimension = "g""#,                                      "scale"),
             case(r#"scale = true
                     dimension = "g""#,                                      "scale"),
             case("scale = -1.0\ndimension = \"g\"",                         "scale"),
             case("scale = 1\ndimension = [1, 0, 0]",                        "type"),
             case("scale = 1\ndimension = 3",                                "type"),
             case("scale = 1\ndimension = [true, 0, 0, 0]",                  "type"),
             case(r#"scale = 1
                     dimension = "furlong""#,                                "unknown"),
    )]
    fn bad_definitions(body: &str, check: &str) {
        let result = registry(&format!("[[unit]]\nsymbol = \"thing\"\n{body}"));
        match check {
            "spec"    => assert!(matches!(result, Err(UnitError::InvalidCustomUnitSpec(_))), "{result:?}"),
            "scale"   => assert!(matches!(result, Err(UnitError::InvalidScaleValue(_))),     "{result:?}"),
            "type"    => assert!(matches!(result, Err(UnitError::ArgumentType(_))),          "{result:?}"),
            "unknown" => assert!(matches!(result, Err(UnitError::UnknownUnitSymbol(_))),     "{result:?}"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn collisions_are_reported() {
        let result = registry(r#"
            [[unit]]
            symbol = "kpc"
            expr   = "pc"
        "#);
        assert_eq!(result.map(|_| ()), Err(UnitError::SymbolCollision("kpc".into())));
    }
}
