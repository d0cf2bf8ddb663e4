use crate::Expr;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// Everything the engine knows about one built-in function
#[derive(Clone)]
pub(crate) struct FunctionDefinition {
    pub name: &'static str,
    pub arity: RangeInclusive<usize>,

    /// Numerical evaluation; `None` outside the real domain
    pub eval: fn(&[f64]) -> Option<f64>,

    /// Chain-rule derivative from the call's arguments and their derivatives
    pub derivative: fn(&[Expr], &[Expr]) -> Expr,

    /// Exact special values and symmetries applied at construction,
    /// `None` leaves the call unevaluated
    pub exact: fn(&[Expr]) -> Option<Expr>,
}

impl FunctionDefinition {
    pub(crate) fn accepts(&self, args: usize) -> bool {
        self.arity.contains(&args)
    }
}

static REGISTRY: OnceLock<HashMap<&'static str, FunctionDefinition>> = OnceLock::new();

fn init_registry() -> HashMap<&'static str, FunctionDefinition> {
    crate::functions::definitions::all_definitions()
        .into_iter()
        .map(|def| (def.name, def))
        .collect()
}

pub(crate) struct Registry;

impl Registry {
    pub(crate) fn get(name: &str) -> Option<&'static FunctionDefinition> {
        REGISTRY.get_or_init(init_registry).get(name)
    }

    /// Canonical names of every registered function, sorted
    pub(crate) fn names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = REGISTRY
            .get_or_init(init_registry)
            .keys()
            .copied()
            .collect();
        names.sort_unstable();
        names
    }
}
