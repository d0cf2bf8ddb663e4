//! Display implementations for expressions.
//!
//! ## Standard Display (`to_string()` / `{}`)
//! Plain text that the parser reads back:
//! - `x^2 + 2*x + 1`
//! - `sin(x)/x`, `sqrt(2)/2`
//!
//! ## LaTeX Format (`to_latex()`)
//! For KaTeX rendering in the page front-end:
//! - `x^{2} + 2 x + 1`
//! - `\frac{\sin{\left(x \right)}}{x}`
//!
//! # Display Behavior Notes for N-ary AST
//! - Sums show `a - b` for terms with a negative coefficient
//! - Factors with negative exponents move to a denominator
//! - `exp(u)` shows as `e^{u}` in LaTeX

use std::fmt;

use num_rational::BigRational;
use num_traits::One;

use crate::core::expr::split_coeff;
use crate::core::{Constant, Expr, ExprKind, Number};

#[derive(Clone, Copy, PartialEq, Eq)]
enum FormatMode {
    Standard,
    Latex,
}

/// Binding strength used to decide on parentheses
const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_POW: u8 = 3;
const PREC_ATOM: u8 = 4;

const GREEK_LETTERS: &[(&str, &str)] = &[
    ("alpha", r"\alpha"),
    ("beta", r"\beta"),
    ("gamma", r"\gamma"),
    ("delta", r"\delta"),
    ("epsilon", r"\epsilon"),
    ("zeta", r"\zeta"),
    ("eta", r"\eta"),
    ("theta", r"\theta"),
    ("iota", r"\iota"),
    ("kappa", r"\kappa"),
    ("lambda", r"\lambda"),
    ("mu", r"\mu"),
    ("nu", r"\nu"),
    ("xi", r"\xi"),
    ("rho", r"\rho"),
    ("sigma", r"\sigma"),
    ("tau", r"\tau"),
    ("upsilon", r"\upsilon"),
    ("phi", r"\phi"),
    ("chi", r"\chi"),
    ("psi", r"\psi"),
    ("omega", r"\omega"),
    ("Gamma", r"\Gamma"),
    ("Delta", r"\Delta"),
    ("Theta", r"\Theta"),
    ("Lambda", r"\Lambda"),
    ("Sigma", r"\Sigma"),
    ("Phi", r"\Phi"),
    ("Psi", r"\Psi"),
    ("Omega", r"\Omega"),
];

/// Functions KaTeX knows as operators
const LATEX_OPERATORS: &[&str] = &[
    "sin", "cos", "tan", "cot", "sec", "csc", "sinh", "cosh", "tanh", "log",
];

fn greek_to_latex(name: &str) -> Option<&'static str> {
    GREEK_LETTERS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, latex)| *latex)
}

/// Sign, absolute coefficient and remaining factors of a term
fn signed_parts(e: &Expr) -> (bool, Number, Vec<Expr>) {
    match e.kind() {
        ExprKind::Number(n) => (n.is_negative(), n.abs(), Vec::new()),
        ExprKind::Constant(Constant::NegInfinity) => (true, Number::one(), vec![Expr::infinity()]),
        ExprKind::Product(factors) => {
            let (coeff, _) = split_coeff(e);
            let rest = match factors.first() {
                Some(first) if first.is_number() => factors[1..].to_vec(),
                _ => factors.clone(),
            };
            (coeff.is_negative(), coeff.abs(), rest)
        }
        _ => (false, Number::one(), vec![e.clone()]),
    }
}

fn precedence(e: &Expr) -> u8 {
    match e.kind() {
        ExprKind::Sum(_) => PREC_SUM,
        ExprKind::Constant(Constant::NegInfinity) => PREC_SUM,
        ExprKind::Number(n) if n.is_negative() => PREC_SUM,
        ExprKind::Number(Number::Rational(r)) if !r.is_integer() => PREC_PRODUCT,
        ExprKind::Product(_) => {
            if signed_parts(e).0 {
                PREC_SUM
            } else {
                PREC_PRODUCT
            }
        }
        ExprKind::Pow(_, exp) => match exp.as_number() {
            Some(n) if n.is_negative() => PREC_PRODUCT,
            _ => PREC_POW,
        },
        ExprKind::Derivative { .. } => PREC_PRODUCT,
        _ => PREC_ATOM,
    }
}

fn wrap(e: &Expr, min_prec: u8, mode: FormatMode) -> String {
    let inner = format_expr(e, mode);
    if precedence(e) < min_prec {
        paren(&inner, mode)
    } else {
        inner
    }
}

fn paren(inner: &str, mode: FormatMode) -> String {
    match mode {
        FormatMode::Standard => format!("({inner})"),
        FormatMode::Latex => format!(r"\left({inner}\right)"),
    }
}

fn format_expr(e: &Expr, mode: FormatMode) -> String {
    match e.kind() {
        ExprKind::Number(n) => format_number(n, mode),
        ExprKind::Symbol(s) => match mode {
            FormatMode::Standard => s.name().to_string(),
            FormatMode::Latex => format_symbol_latex(s.name()),
        },
        ExprKind::Constant(c) => format_constant(*c, mode),
        ExprKind::Sum(terms) => format_sum(terms, mode),
        ExprKind::Product(_) => format_signed(e, mode),
        ExprKind::Pow(..) if precedence(e) == PREC_PRODUCT => format_signed(e, mode),
        ExprKind::Pow(base, exp) => format_pow(base, exp, mode),
        ExprKind::FunctionCall { name, args } => format_function(name, args, mode),
        ExprKind::Derivative { inner, var, order } => {
            let inner_str = wrap(inner, PREC_POW, mode);
            match mode {
                FormatMode::Standard if *order == 1 => format!("Derivative({inner}, {var})"),
                FormatMode::Standard => format!("Derivative({inner}, ({var}, {order}))"),
                FormatMode::Latex => {
                    let v = format_symbol_latex(var.name());
                    if *order == 1 {
                        format!(r"\frac{{d}}{{d {v}}} {inner_str}")
                    } else {
                        format!(r"\frac{{d^{{{order}}}}}{{d {v}^{{{order}}}}} {inner_str}")
                    }
                }
            }
        }
    }
}

fn format_signed(e: &Expr, mode: FormatMode) -> String {
    let (negative, coeff, factors) = signed_parts(e);
    let body = format_magnitude(&coeff, &factors, mode);
    if negative { format!("-{body}") } else { body }
}

fn format_sum(terms: &[Expr], mode: FormatMode) -> String {
    let mut out = String::new();
    for (i, term) in terms.iter().enumerate() {
        let (negative, coeff, factors) = signed_parts(term);
        let body = format_magnitude(&coeff, &factors, mode);
        match (i, negative) {
            (0, true) => {
                out.push('-');
                out.push_str(&body);
            }
            (0, false) => out.push_str(&body),
            (_, true) => {
                out.push_str(" - ");
                out.push_str(&body);
            }
            (_, false) => {
                out.push_str(" + ");
                out.push_str(&body);
            }
        }
    }
    out
}

/// `coeff * factors` with a positive coefficient, negative powers as denominator
fn format_magnitude(coeff: &Number, factors: &[Expr], mode: FormatMode) -> String {
    let mut numer: Vec<String> = Vec::new();
    let mut denom: Vec<String> = Vec::new();
    let mut denom_count = 0usize;

    match coeff {
        Number::Rational(r) => {
            if !r.numer().is_one() || factors.is_empty() {
                numer.push(r.numer().to_string());
            }
            if !r.is_integer() {
                denom.push(r.denom().to_string());
                denom_count += 1;
            }
        }
        Number::Float(_) => numer.push(format_number(coeff, mode)),
    }

    for factor in factors {
        if let ExprKind::Pow(base, exp) = factor.kind()
            && let Some(n) = exp.as_number()
            && n.is_negative()
        {
            let positive = Expr::pow(base.clone(), Expr::number(n.neg()));
            denom.push(wrap(&positive, PREC_POW, mode));
            denom_count += 1;
        } else {
            numer.push(wrap(factor, PREC_PRODUCT, mode));
        }
    }

    let numer_str = if numer.is_empty() {
        "1".to_string()
    } else {
        join_factors(&numer, mode)
    };
    if denom.is_empty() {
        return numer_str;
    }
    let denom_str = join_factors(&denom, mode);
    match mode {
        FormatMode::Latex => format!(r"\frac{{{numer_str}}}{{{denom_str}}}"),
        FormatMode::Standard => {
            if denom_count > 1 {
                format!("{numer_str}/({denom_str})")
            } else {
                format!("{numer_str}/{denom_str}")
            }
        }
    }
}

fn join_factors(parts: &[String], mode: FormatMode) -> String {
    match mode {
        FormatMode::Standard => parts.join("*"),
        FormatMode::Latex => {
            let mut out = String::new();
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    let numeric_next = part.starts_with(|c: char| c.is_ascii_digit());
                    out.push_str(if numeric_next { r" \cdot " } else { " " });
                }
                out.push_str(part);
            }
            out
        }
    }
}

fn format_pow(base: &Expr, exp: &Expr, mode: FormatMode) -> String {
    if let Some(Number::Rational(r)) = exp.as_number()
        && *r == BigRational::new(1.into(), 2.into())
    {
        let inner = format_expr(base, mode);
        return match mode {
            FormatMode::Standard => format!("sqrt({inner})"),
            FormatMode::Latex => format!(r"\sqrt{{{inner}}}"),
        };
    }

    // sin(x)^2 as \sin^{2}{\left(x \right)}
    if mode == FormatMode::Latex
        && let ExprKind::FunctionCall { name, args } = base.kind()
        && LATEX_OPERATORS.contains(&&**name)
        && args.len() == 1
        && exp.as_number().is_some_and(|n| n.is_integer() && n.is_positive())
    {
        return format!(
            r"\{name}^{{{}}}{{\left({} \right)}}",
            format_expr(exp, mode),
            format_expr(&args[0], mode)
        );
    }

    let base_str = if precedence(base) <= PREC_POW || base.is_function("exp") {
        paren(&format_expr(base, mode), mode)
    } else {
        format_expr(base, mode)
    };
    match mode {
        FormatMode::Latex => format!("{base_str}^{{{}}}", format_expr(exp, mode)),
        FormatMode::Standard => {
            let exp_str = format_expr(exp, mode);
            if precedence(exp) == PREC_ATOM {
                format!("{base_str}^{exp_str}")
            } else {
                format!("{base_str}^({exp_str})")
            }
        }
    }
}

fn format_function(name: &str, args: &[Expr], mode: FormatMode) -> String {
    let rendered: Vec<String> = args.iter().map(|a| format_expr(a, mode)).collect();
    let joined = rendered.join(", ");
    match mode {
        FormatMode::Standard => format!("{name}({joined})"),
        FormatMode::Latex => match name {
            "exp" => format!("e^{{{joined}}}"),
            "abs" => format!(r"\left|{{{joined}}}\right|"),
            n if LATEX_OPERATORS.contains(&n) => {
                format!(r"\{n}{{\left({joined} \right)}}")
            }
            n => format!(r"\operatorname{{{n}}}{{\left({joined} \right)}}"),
        },
    }
}

fn format_symbol_latex(name: &str) -> String {
    let (head, sub) = match name.split_once('_') {
        Some((h, s)) if !h.is_empty() && !s.is_empty() => (h, Some(s)),
        _ => (name, None),
    };
    let head = greek_to_latex(head).map_or_else(|| head.to_string(), str::to_string);
    match sub {
        Some(s) => format!("{head}_{{{}}}", format_symbol_latex(s)),
        None => head,
    }
}

fn format_constant(c: Constant, mode: FormatMode) -> String {
    let (standard, latex) = match c {
        Constant::Pi => ("pi", r"\pi"),
        Constant::E => ("E", "e"),
        Constant::Infinity => ("oo", r"\infty"),
        Constant::NegInfinity => ("-oo", r"-\infty"),
        Constant::ComplexInfinity => ("zoo", r"\tilde{\infty}"),
        Constant::NaN => ("nan", r"\text{NaN}"),
    };
    match mode {
        FormatMode::Standard => standard.to_string(),
        FormatMode::Latex => latex.to_string(),
    }
}

fn format_number(n: &Number, mode: FormatMode) -> String {
    match n {
        Number::Rational(r) if r.is_integer() => r.numer().to_string(),
        Number::Rational(r) => match mode {
            FormatMode::Standard => format!("{}/{}", r.numer(), r.denom()),
            FormatMode::Latex => {
                let sign = if n.is_negative() { "-" } else { "" };
                let abs = n.abs();
                let r = abs.as_rational().unwrap_or(r);
                format!(r"{sign}\frac{{{}}}{{{}}}", r.numer(), r.denom())
            }
        },
        Number::Float(f) => format_float(*f),
    }
}

/// Shortest float text that still reads as a float (`2.0`, `0.25`, `1e-7`)
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "oo" } else { "-oo" }.to_string();
    }
    let magnitude = v.abs();
    if magnitude != 0.0 && !(1e-5..1e16).contains(&magnitude) {
        return format!("{v:e}");
    }
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Fifteen significant digits, the precision numeric results are reported with
pub fn format_evalf(v: f64) -> String {
    if !v.is_finite() {
        return format_float(v);
    }
    if v == 0.0 {
        return "0".to_string();
    }
    let exponent = v.abs().log10().floor() as i32;
    if (-5..15).contains(&exponent) {
        let decimals = usize::try_from(14 - exponent).unwrap_or(0);
        format!("{v:.decimals$}")
    } else {
        let mantissa = format!("{v:.14e}");
        match mantissa.split_once('e') {
            Some((m, e)) if !e.starts_with('-') => format!("{m}e+{e}"),
            _ => mantissa,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_expr(self, FormatMode::Standard))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_number(self, FormatMode::Standard))
    }
}

impl Expr {
    /// Convert the expression to LaTeX format.
    #[must_use]
    pub fn to_latex(&self) -> String {
        format_expr(self, FormatMode::Latex)
    }
}
