//! Interactive page: one render cycle from sidebar text to tab results
//!
//! A render cycle reads the expression and variable text, halts with a sidebar
//! notice when either is empty or fails to parse, and otherwise lays out the
//! five tabs. Tabs named in the triggered requests are run, each in isolation;
//! the rest only show their controls. Nothing is kept between cycles.
//!
//! # Example
//! ```
//! use symb_calculus::CalculusCalculator;
//! use symb_calculus::config::FrontendConfig;
//! use symb_calculus::frontend::{Page, PageInput, Tab, TabRequest};
//!
//! let calc = CalculusCalculator::new();
//! let config = FrontendConfig::default();
//! let page = Page::new(&calc, &config);
//! let input = PageInput::new("x**2", "x");
//! let view = page.render(&input, &[TabRequest::initial(Tab::Evaluation, &config)]);
//! assert!(view.tab(Tab::Evaluation).unwrap().output.is_some());
//! ```

pub mod html;
pub mod operations;
pub mod widgets;

use serde::Serialize;
use tracing::debug;

use crate::calculator::CalculusCalculator;
use crate::config::FrontendConfig;
use crate::symbol::Symbol;
use crate::{CalcError, Result, parse};

pub use operations::{
    Differentiation, Evaluation, IntegralKind, Integration, Limit, Operation, Tab, TabContext,
    TabOutput, TabRequest, TaylorSeries,
};
pub use widgets::Widget;

pub const EMPTY_EXPRESSION: &str = "Please enter an expression.";
pub const EMPTY_VARIABLE: &str = "Please enter a variable.";
pub const INVALID_EXPRESSION: &str = "Invalid expression. Please check the syntax.";
pub const CONVERTED: &str = "Expression converted successfully!";

const SUBTITLE: &str = "Perform symbolic calculus operations with ease.";

/// Raw sidebar text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageInput {
    pub expression: String,
    pub variable: String,
}

impl PageInput {
    pub fn new(expression: impl Into<String>, variable: impl Into<String>) -> Self {
        PageInput {
            expression: expression.into(),
            variable: variable.into(),
        }
    }

    /// Sidebar text as first shown
    pub fn initial(config: &FrontendConfig) -> Self {
        Self::new(config.expression.clone(), config.variable.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Notice {
            level,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabPanel {
    pub tab: Tab,
    pub title: &'static str,
    pub header: &'static str,
    pub controls: Vec<Widget>,
    pub output: Option<TabOutput>,
    /// Tab-scoped failure, already prefixed
    pub error: Option<String>,
}

/// Snapshot of one render cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub title: String,
    pub subtitle: String,
    pub expression: String,
    pub variable: String,
    pub sidebar: Vec<Notice>,
    pub expression_latex: Option<String>,
    /// Empty when the cycle halted in the sidebar
    pub tabs: Vec<TabPanel>,
}

impl PageView {
    pub fn halted(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tab(&self, tab: Tab) -> Option<&TabPanel> {
        self.tabs.iter().find(|p| p.tab == tab)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CalcError::Serialization {
                what: "page",
                msg: e.to_string(),
            })
    }

    /// Plain text rendering for terminals
    pub fn to_text(&self) -> String {
        let mut out = format!("{}\n{}\n\n", self.title, self.subtitle);
        for notice in &self.sidebar {
            let tag = match notice.level {
                NoticeLevel::Success => "ok",
                NoticeLevel::Warning => "warning",
                NoticeLevel::Error => "error",
            };
            out.push_str(&format!("[{tag}] {}\n", notice.text));
        }
        if let Some(latex) = &self.expression_latex {
            out.push_str(&format!("  {latex}\n"));
        }
        for panel in &self.tabs {
            out.push_str(&format!("\n== {} ==\n", panel.title));
            for control in &panel.controls {
                if !matches!(control, Widget::Button { .. }) {
                    out.push_str(&format!("  {}: {}\n", control.label(), control.value_text()));
                }
            }
            match (&panel.output, &panel.error) {
                (Some(TabOutput::Latex(latex)), _) => out.push_str(&format!("  Result: {latex}\n")),
                (Some(TabOutput::Text { caption, code }), _) => {
                    out.push_str(&format!("  Result: {caption} {code}\n"));
                }
                (None, Some(error)) => out.push_str(&format!("  {error}\n")),
                (None, None) => {}
            }
        }
        out
    }
}

pub struct Page<'a> {
    calculator: &'a CalculusCalculator,
    config: &'a FrontendConfig,
}

impl<'a> Page<'a> {
    pub fn new(calculator: &'a CalculusCalculator, config: &'a FrontendConfig) -> Self {
        Page { calculator, config }
    }

    pub fn render(&self, input: &PageInput, triggered: &[TabRequest]) -> PageView {
        let mut view = PageView {
            title: self.config.title.clone(),
            subtitle: SUBTITLE.to_string(),
            expression: input.expression.clone(),
            variable: input.variable.clone(),
            sidebar: Vec::new(),
            expression_latex: None,
            tabs: Vec::new(),
        };

        if input.expression.trim().is_empty() {
            view.sidebar.push(Notice::new(NoticeLevel::Warning, EMPTY_EXPRESSION));
            return view;
        }
        if input.variable.trim().is_empty() {
            view.sidebar.push(Notice::new(NoticeLevel::Warning, EMPTY_VARIABLE));
            return view;
        }
        let var = match Symbol::parse(&input.variable) {
            Ok(var) => var,
            Err(e) => {
                view.sidebar.push(Notice::new(NoticeLevel::Error, format!("Error: {e}")));
                return view;
            }
        };
        let expr = match parse(&input.expression) {
            Ok(expr) => expr,
            Err(e) => {
                debug!(error = %e, "expression rejected");
                view.sidebar.push(Notice::new(
                    NoticeLevel::Error,
                    format!("{INVALID_EXPRESSION} ({e})"),
                ));
                return view;
            }
        };
        view.sidebar.push(Notice::new(NoticeLevel::Success, CONVERTED));
        view.expression_latex = Some(expr.to_latex());

        let ctx = TabContext {
            calculator: self.calculator,
            config: self.config,
            expr: &expr,
            var: &var,
        };
        view.tabs = Tab::ALL
            .iter()
            .map(|&tab| {
                let request = triggered.iter().find(|r| r.operation().tab() == tab);
                self.panel(tab, request, &ctx)
            })
            .collect();
        view
    }

    fn panel(&self, tab: Tab, request: Option<&TabRequest>, ctx: &TabContext<'_>) -> TabPanel {
        let initial = TabRequest::initial(tab, self.config);
        let op = request.unwrap_or(&initial).operation();
        let mut panel = TabPanel {
            tab,
            title: tab.title(),
            header: op.header(),
            controls: op.controls(ctx),
            output: None,
            error: None,
        };
        if request.is_some() {
            match op.run(ctx) {
                Ok(output) => panel.output = Some(output),
                Err(e) => {
                    debug!(tab = tab.title(), error = %e, "tab failed");
                    panel.error = Some(format!("{}: {e}", op.error_prefix()));
                }
            }
        }
        panel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(expression: &str, variable: &str, triggered: &[TabRequest]) -> PageView {
        let calc = CalculusCalculator::new();
        let config = FrontendConfig::default();
        Page::new(&calc, &config).render(&PageInput::new(expression, variable), triggered)
    }

    #[test]
    fn test_empty_inputs_halt() {
        let view = render("", "x", &[]);
        assert!(view.halted());
        assert_eq!(view.sidebar[0].text, EMPTY_EXPRESSION);
        let view = render("x", "  ", &[]);
        assert_eq!(view.sidebar[0].text, EMPTY_VARIABLE);
    }

    #[test]
    fn test_bad_variable_and_expression() {
        let view = render("x", "1x", &[]);
        assert!(view.halted());
        assert!(view.sidebar[0].text.starts_with("Error: "));
        let view = render("sin(x", "x", &[]);
        assert!(view.sidebar[0].text.starts_with(INVALID_EXPRESSION));
    }

    #[test]
    fn test_success_lays_out_five_tabs() {
        let view = render("sin(x)**2 + x**2", "x", &[]);
        assert_eq!(view.sidebar[0].level, NoticeLevel::Success);
        assert_eq!(view.tabs.len(), 5);
        assert!(view.tabs.iter().all(|p| p.output.is_none() && p.error.is_none()));
        assert!(view.expression_latex.unwrap().contains(r"\sin^{2}"));
    }

    #[test]
    fn test_tab_errors_are_isolated() {
        let triggered = [
            TabRequest::Limit(Limit {
                point: "0".into(),
                direction: crate::Direction::Both,
            }),
            TabRequest::Evaluation(Evaluation { value: "2".into() }),
        ];
        let view = render("1/x", "x", &triggered);
        let limit = view.tab(Tab::Limit).unwrap();
        assert!(limit.output.is_none());
        assert!(
            limit
                .error
                .as_deref()
                .unwrap()
                .starts_with("Error calculating limit: the limit does not exist")
        );
        let eval = view.tab(Tab::Evaluation).unwrap();
        assert!(eval.error.is_none());
        assert!(eval.output.is_some());
    }
}
