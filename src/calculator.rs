//! The calculator facade
//!
//! `CalculusCalculator` owns the three default symbols and the engine limits and
//! forwards each operation to the backend modules with its default arguments
//! filled in. It keeps no state between calls.
//!
//! # Example
//! ```
//! use symb_calculus::{CalculusCalculator, Direction, Expr, parse};
//!
//! let calc = CalculusCalculator::new();
//! let f = parse("x**2").unwrap();
//! assert_eq!(calc.differentiate(&f, None, 1).unwrap().to_string(), "2*x");
//! let area = calc.integrate(&f, None, Some(&Expr::zero()), Some(&Expr::one())).unwrap();
//! assert_eq!(area.to_string(), "1/3");
//! let l = calc.limit(&parse("sin(x)/x").unwrap(), &calc.x, &Expr::zero(), Direction::Both);
//! assert_eq!(l.unwrap(), Expr::one());
//! ```

use tracing::debug;

use crate::config::EngineConfig;
use crate::core::{Expr, Substitutions};
use crate::diff::Diff;
use crate::limit::Direction;
use crate::series::Series;
use crate::symbol::{DEFAULT_SYMBOL_NAMES, Symbol};
use crate::{CalcError, Result, integrate, limit, series};

/// Default number of terms requested from `taylor`
pub const DEFAULT_SERIES_ORDER: u32 = 6;

#[derive(Debug, Clone)]
pub struct CalculusCalculator {
    pub x: Symbol,
    pub y: Symbol,
    pub z: Symbol,
    config: EngineConfig,
}

impl Default for CalculusCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculusCalculator {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let [x, y, z] = DEFAULT_SYMBOL_NAMES.map(Symbol::new_unchecked);
        CalculusCalculator { x, y, z, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn var_or_x<'a>(&'a self, var: Option<&'a Symbol>) -> &'a Symbol {
        var.unwrap_or(&self.x)
    }

    /// `order`-th derivative with respect to `var` (default `x`)
    ///
    /// # Errors
    /// `InvalidOrder` for `order == 0`, `MaxDepthExceeded` / `MaxNodesExceeded`
    /// when a step outgrows the configured limits.
    pub fn differentiate(&self, expr: &Expr, var: Option<&Symbol>, order: u32) -> Result<Expr> {
        let var = self.var_or_x(var);
        debug!(%expr, %var, order, "differentiate");
        let result = Diff::new()
            .max_depth(self.config.max_depth)
            .max_nodes(self.config.max_nodes)
            .differentiate(expr, var, order)?;
        debug!(%result, "derivative");
        Ok(result)
    }

    /// Indefinite integral without bounds, definite integral with both
    ///
    /// # Errors
    /// `MissingBound` when only one bound is given, `NoClosedForm` when no rule
    /// applies, `NotNumeric` when numeric bounds give a divergent value.
    pub fn integrate(
        &self,
        expr: &Expr,
        var: Option<&Symbol>,
        lower: Option<&Expr>,
        upper: Option<&Expr>,
    ) -> Result<Expr> {
        let var = self.var_or_x(var);
        debug!(%expr, %var, ?lower, ?upper, "integrate");
        let result = match (lower, upper) {
            (None, None) => integrate::integrate(expr, var, &self.config)?,
            (Some(a), Some(b)) => integrate::integrate_definite(expr, var, a, b, &self.config)?,
            (Some(_), None) => return Err(CalcError::MissingBound { given: "lower" }),
            (None, Some(_)) => return Err(CalcError::MissingBound { given: "upper" }),
        };
        debug!(%result, "integral");
        Ok(result)
    }

    /// Limit of `expr` as `var` approaches `point`
    ///
    /// # Errors
    /// `LimitDoesNotExist` when a two-sided limit has different sides,
    /// `LimitUndetermined` when the behaviour cannot be settled.
    pub fn limit(&self, expr: &Expr, var: &Symbol, point: &Expr, direction: Direction) -> Result<Expr> {
        debug!(%expr, %var, %point, %direction, "limit");
        let result = limit::limit(expr, var, point, direction, &self.config)?;
        debug!(%result, "limit value");
        Ok(result)
    }

    /// Series of `expr` around `point` up to, not including, `(var - point)^order`
    ///
    /// # Errors
    /// `InvalidOrder` for `order == 0`, `SeriesUnavailable` when the expression
    /// has no expansion of this kind at the point.
    pub fn taylor(&self, expr: &Expr, var: Option<&Symbol>, point: &Expr, order: u32) -> Result<Series> {
        let var = self.var_or_x(var);
        debug!(%expr, %var, %point, order, "taylor");
        let result = series::taylor(expr, var, point, order, &self.config)?;
        debug!(%result, "series");
        Ok(result)
    }

    /// Substitute all values at once, then evaluate to a float
    ///
    /// # Errors
    /// `UnboundSymbols` if a symbol is left, `NotNumeric` for NaN, infinite or
    /// complex values.
    pub fn evaluate(&self, expr: &Expr, subs: &Substitutions) -> Result<f64> {
        debug!(%expr, bindings = subs.len(), "evaluate");
        let value = expr.evalf(subs)?;
        debug!(value, "evaluated");
        Ok(value)
    }
}
