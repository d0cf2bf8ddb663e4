//! Runtime configuration.
//!
//! Loaded from a TOML file given on the command line, else from the file named
//! by `SYMB_CALCULUS_CONFIG`, else built-in defaults. A file that cannot be read
//! or parsed falls back to the defaults with a warning.
//!
//! ```toml
//! [engine]
//! max_depth = 100
//! series_max_precision = 40
//!
//! [frontend]
//! expression = "exp(x)*sin(x)"
//! limit_direction = "+"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::limit::Direction;
use crate::{CalcError, Result};

/// Environment variable naming a configuration file
pub const CONFIG_ENV_VAR: &str = "SYMB_CALCULUS_CONFIG";

/// Default maximum AST depth
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// Default maximum AST node count
pub const DEFAULT_MAX_NODES: usize = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcConfig {
    pub engine: EngineConfig,
    pub frontend: FrontendConfig,
}

/// Structural limits for the symbolic engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Deepest expression differentiation accepts or produces
    pub max_depth: usize,
    /// Largest expression differentiation accepts or produces
    pub max_nodes: usize,
    /// Series cutoff limits start from
    pub series_precision: i64,
    /// Cutoff at which series and limit retries give up
    pub series_max_precision: i64,
    /// Nesting allowed for integration by parts and substitution
    pub integration_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            series_precision: 4,
            series_max_precision: 40,
            integration_depth: 8,
        }
    }
}

/// Initial values and stepper bounds of the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    pub title: String,
    pub expression: String,
    pub variable: String,
    pub derivative_order: u32,
    pub max_derivative_order: u32,
    pub lower_bound: String,
    pub upper_bound: String,
    pub limit_point: String,
    pub limit_direction: Direction,
    pub series_point: String,
    pub series_order: u32,
    pub max_series_order: u32,
    pub evaluation_value: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            title: "Calculus Analysis Module".to_string(),
            expression: "sin(x)**2 + x**2".to_string(),
            variable: "x".to_string(),
            derivative_order: 1,
            max_derivative_order: 10,
            lower_bound: "0".to_string(),
            upper_bound: "1".to_string(),
            limit_point: "0".to_string(),
            limit_direction: Direction::Both,
            series_point: "0".to_string(),
            series_order: 6,
            max_series_order: 20,
            evaluation_value: "1".to_string(),
        }
    }
}

fn config_error(path: &str, msg: impl ToString) -> CalcError {
    CalcError::Config {
        path: path.to_string(),
        msg: msg.to_string(),
    }
}

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CalcError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl CalcConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: CalcConfig = toml::from_str(text).map_err(|e| config_error("<inline>", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let shown = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| config_error(&shown, e))?;
        let config: CalcConfig = toml::from_str(&text).map_err(|e| config_error(&shown, e))?;
        config.validate()?;
        debug!(path = %shown, "loaded configuration");
        Ok(config)
    }

    /// Explicit path, else `SYMB_CALCULUS_CONFIG`, else defaults
    pub fn load(explicit: Option<&Path>) -> Self {
        let from_env = std::env::var_os(CONFIG_ENV_VAR);
        let path = explicit.or(from_env.as_deref().map(Path::new));
        let Some(path) = path else {
            return Self::default();
        };
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "using default configuration");
                Self::default()
            }
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| config_error("<inline>", e))
    }

    pub fn validate(&self) -> Result<()> {
        let engine = &self.engine;
        let frontend = &self.frontend;
        check_range("engine.series_precision", engine.series_precision, 1, 1000)?;
        check_range(
            "engine.series_max_precision",
            engine.series_max_precision,
            engine.series_precision,
            1000,
        )?;
        check_range(
            "frontend.max_derivative_order",
            i64::from(frontend.max_derivative_order),
            1,
            100,
        )?;
        check_range(
            "frontend.derivative_order",
            i64::from(frontend.derivative_order),
            1,
            i64::from(frontend.max_derivative_order),
        )?;
        check_range(
            "frontend.max_series_order",
            i64::from(frontend.max_series_order),
            1,
            100,
        )?;
        check_range(
            "frontend.series_order",
            i64::from(frontend.series_order),
            1,
            i64::from(frontend.max_series_order),
        )
    }
}
