//! The five tabs of the page
//!
//! Each tab is an [`Operation`]: it describes its controls, parses its own
//! secondary inputs and calls the calculator. Failures stay inside the tab and
//! are shown with the tab's error prefix.

use serde::{Deserialize, Serialize};

use super::widgets::Widget;
use crate::calculator::CalculusCalculator;
use crate::config::FrontendConfig;
use crate::core::{Expr, Substitutions, format_evalf};
use crate::limit::Direction;
use crate::symbol::Symbol;
use crate::{CalcError, Result, parse};

/// Parsed sidebar inputs shared by every tab
pub struct TabContext<'a> {
    pub calculator: &'a CalculusCalculator,
    pub config: &'a FrontendConfig,
    pub expr: &'a Expr,
    pub var: &'a Symbol,
}

impl TabContext<'_> {
    fn expr_latex(&self) -> String {
        self.expr.to_latex()
    }
}

/// What a triggered tab shows under "Result"
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum TabOutput {
    Latex(String),
    /// A caption line followed by a code block
    Text { caption: String, code: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Differentiation,
    Integration,
    Limit,
    TaylorSeries,
    Evaluation,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Differentiation,
        Tab::Integration,
        Tab::Limit,
        Tab::TaylorSeries,
        Tab::Evaluation,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Differentiation => "Differentiation",
            Tab::Integration => "Integration",
            Tab::Limit => "Limit",
            Tab::TaylorSeries => "Taylor Series",
            Tab::Evaluation => "Evaluation",
        }
    }
}

pub trait Operation {
    fn tab(&self) -> Tab;

    fn header(&self) -> &'static str;

    /// Prefix of the message shown when `run` fails
    fn error_prefix(&self) -> &'static str;

    fn controls(&self, ctx: &TabContext<'_>) -> Vec<Widget>;

    fn run(&self, ctx: &TabContext<'_>) -> Result<TabOutput>;
}

fn check_stepper(field: &'static str, value: u32, max: u32) -> Result<()> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(CalcError::OutOfRange {
            field,
            value: i64::from(value),
            min: 1,
            max: i64::from(max),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Differentiation {
    pub order: u32,
}

impl Operation for Differentiation {
    fn tab(&self) -> Tab {
        Tab::Differentiation
    }

    fn header(&self) -> &'static str {
        "Symbolic Differentiation"
    }

    fn error_prefix(&self) -> &'static str {
        "Error calculating derivative"
    }

    fn controls(&self, ctx: &TabContext<'_>) -> Vec<Widget> {
        vec![
            Widget::stepper("order", "Order", 1, ctx.config.max_derivative_order, self.order),
            Widget::button("Calculate Derivative"),
        ]
    }

    fn run(&self, ctx: &TabContext<'_>) -> Result<TabOutput> {
        check_stepper("order", self.order, ctx.config.max_derivative_order)?;
        let result = ctx.calculator.differentiate(ctx.expr, Some(ctx.var), self.order)?;
        let n = self.order;
        Ok(TabOutput::Latex(format!(
            "\\frac{{d^{{{n}}}}}{{d{var}^{{{n}}}}} \\left( {f} \\right) = {r}",
            var = ctx.var,
            f = ctx.expr_latex(),
            r = result.to_latex(),
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegralKind {
    #[default]
    Indefinite,
    Definite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    #[serde(default)]
    pub kind: IntegralKind,
    #[serde(default = "default_lower")]
    pub lower: String,
    #[serde(default = "default_upper")]
    pub upper: String,
}

fn default_lower() -> String {
    "0".to_string()
}

fn default_upper() -> String {
    "1".to_string()
}

impl Operation for Integration {
    fn tab(&self) -> Tab {
        Tab::Integration
    }

    fn header(&self) -> &'static str {
        "Symbolic Integration"
    }

    fn error_prefix(&self) -> &'static str {
        match self.kind {
            IntegralKind::Indefinite => "Error calculating integral",
            IntegralKind::Definite => "Error parsing bounds",
        }
    }

    fn controls(&self, _ctx: &TabContext<'_>) -> Vec<Widget> {
        let mut controls = vec![Widget::Radio {
            key: "kind",
            label: "Integration Type".to_string(),
            options: vec!["Indefinite".to_string(), "Definite".to_string()],
            selected: usize::from(self.kind == IntegralKind::Definite),
        }];
        match self.kind {
            IntegralKind::Indefinite => {
                controls.push(Widget::button("Calculate Indefinite Integral"));
            }
            IntegralKind::Definite => {
                controls.push(Widget::text("lower", "Lower Bound", &self.lower));
                controls.push(Widget::text("upper", "Upper Bound", &self.upper));
                controls.push(Widget::button("Calculate Definite Integral"));
            }
        }
        controls
    }

    fn run(&self, ctx: &TabContext<'_>) -> Result<TabOutput> {
        let f = ctx.expr_latex();
        let var = ctx.var;
        match self.kind {
            IntegralKind::Indefinite => {
                let result = ctx.calculator.integrate(ctx.expr, Some(var), None, None)?;
                Ok(TabOutput::Latex(format!(
                    "\\int {f} \\, d{var} = {} + C",
                    result.to_latex()
                )))
            }
            IntegralKind::Definite => {
                let lower = parse(&self.lower)?;
                let upper = parse(&self.upper)?;
                let result = ctx
                    .calculator
                    .integrate(ctx.expr, Some(var), Some(&lower), Some(&upper))?;
                Ok(TabOutput::Latex(format!(
                    "\\int_{{{a}}}^{{{b}}} {f} \\, d{var} = {r}",
                    a = lower.to_latex(),
                    b = upper.to_latex(),
                    r = result.to_latex(),
                )))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    pub point: String,
    pub direction: Direction,
}

impl Operation for Limit {
    fn tab(&self) -> Tab {
        Tab::Limit
    }

    fn header(&self) -> &'static str {
        "Limit Computation"
    }

    fn error_prefix(&self) -> &'static str {
        "Error calculating limit"
    }

    fn controls(&self, _ctx: &TabContext<'_>) -> Vec<Widget> {
        vec![
            Widget::text("point", "Approach Point", &self.point),
            Widget::Select {
                key: "direction",
                label: "Direction".to_string(),
                options: Direction::ALL.iter().map(|d| d.as_str().to_string()).collect(),
                selected: Direction::ALL
                    .iter()
                    .position(|d| *d == self.direction)
                    .unwrap_or_default(),
            },
            Widget::button("Calculate Limit"),
        ]
    }

    fn run(&self, ctx: &TabContext<'_>) -> Result<TabOutput> {
        let point = parse(&self.point)?;
        let result = ctx.calculator.limit(ctx.expr, ctx.var, &point, self.direction)?;
        Ok(TabOutput::Latex(format!(
            "\\lim_{{{var} \\to {a}{side}}} \\left( {f} \\right) = {r}",
            var = ctx.var,
            a = point.to_latex(),
            side = self.direction.latex_suffix(),
            f = ctx.expr_latex(),
            r = result.to_latex(),
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaylorSeries {
    pub center: String,
    pub order: u32,
}

impl Operation for TaylorSeries {
    fn tab(&self) -> Tab {
        Tab::TaylorSeries
    }

    fn header(&self) -> &'static str {
        "Taylor Series Expansion"
    }

    fn error_prefix(&self) -> &'static str {
        "Error computing series"
    }

    fn controls(&self, ctx: &TabContext<'_>) -> Vec<Widget> {
        vec![
            Widget::text("center", "Expansion Point (Center)", &self.center),
            Widget::stepper(
                "order",
                format!("Order (O({}^n))", ctx.var),
                1,
                ctx.config.max_series_order,
                self.order,
            ),
            Widget::button("Compute Series"),
        ]
    }

    fn run(&self, ctx: &TabContext<'_>) -> Result<TabOutput> {
        check_stepper("order", self.order, ctx.config.max_series_order)?;
        let center = parse(&self.center)?;
        let series = ctx
            .calculator
            .taylor(ctx.expr, Some(ctx.var), &center, self.order)?;
        Ok(TabOutput::Latex(format!(
            "Taylor({f}, {var}={a}, {n}) = {r}",
            f = ctx.expr_latex(),
            var = ctx.var,
            a = center.to_latex(),
            n = self.order,
            r = series.to_latex(),
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub value: String,
}

impl Operation for Evaluation {
    fn tab(&self) -> Tab {
        Tab::Evaluation
    }

    fn header(&self) -> &'static str {
        "Numeric Evaluation"
    }

    fn error_prefix(&self) -> &'static str {
        "Error evaluating expression"
    }

    fn controls(&self, ctx: &TabContext<'_>) -> Vec<Widget> {
        vec![
            Widget::text("value", format!("Value for {}", ctx.var), &self.value),
            Widget::button("Evaluate"),
        ]
    }

    fn run(&self, ctx: &TabContext<'_>) -> Result<TabOutput> {
        let value = parse(&self.value)?;
        let subs = Substitutions::new().with(ctx.var.clone(), value);
        let result = ctx.calculator.evaluate(ctx.expr, &subs)?;
        Ok(TabOutput::Text {
            caption: format!("At {} = {}:", ctx.var, self.value),
            code: format_evalf(result),
        })
    }
}

/// A tab together with its inputs, as sent by a host when a button is pressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tab", rename_all = "snake_case")]
pub enum TabRequest {
    Differentiation(Differentiation),
    Integration(Integration),
    Limit(Limit),
    TaylorSeries(TaylorSeries),
    Evaluation(Evaluation),
}

impl TabRequest {
    /// Untriggered state of `tab` with the configured initial values
    pub fn initial(tab: Tab, config: &FrontendConfig) -> Self {
        match tab {
            Tab::Differentiation => TabRequest::Differentiation(Differentiation {
                order: config.derivative_order,
            }),
            Tab::Integration => TabRequest::Integration(Integration {
                kind: IntegralKind::Indefinite,
                lower: config.lower_bound.clone(),
                upper: config.upper_bound.clone(),
            }),
            Tab::Limit => TabRequest::Limit(Limit {
                point: config.limit_point.clone(),
                direction: config.limit_direction,
            }),
            Tab::TaylorSeries => TabRequest::TaylorSeries(TaylorSeries {
                center: config.series_point.clone(),
                order: config.series_order,
            }),
            Tab::Evaluation => TabRequest::Evaluation(Evaluation {
                value: config.evaluation_value.clone(),
            }),
        }
    }

    pub fn operation(&self) -> &dyn Operation {
        match self {
            TabRequest::Differentiation(op) => op,
            TabRequest::Integration(op) => op,
            TabRequest::Limit(op) => op,
            TabRequest::TaylorSeries(op) => op,
            TabRequest::Evaluation(op) => op,
        }
    }
}
