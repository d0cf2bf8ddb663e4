//! symb-calculus: command-line host for the calculator and the page
//!
//! `demo` prints the classic report for one expression, `page` runs one render
//! cycle of the page and prints it as text, JSON or HTML, and `repl` prints the
//! report for every line typed.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{Level, debug};

use symb_calculus::config::{CalcConfig, FrontendConfig};
use symb_calculus::frontend::{
    Differentiation, Evaluation, IntegralKind, Integration, Limit, Page, PageInput, Tab,
    TabRequest, TaylorSeries, html,
};
use symb_calculus::{CalculusCalculator, Direction, Expr, Substitutions, format_evalf, parse};

#[derive(Parser)]
#[command(
    name = "symb-calculus",
    version = env!("CARGO_PKG_VERSION"),
    about = "Symbolic differentiation, integration, limits, series and evaluation"
)]
struct Cli {
    /// TOML configuration file (falls back to $SYMB_CALCULUS_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Derivatives, integrals, a limit, a series and a value for one expression
    Demo { expression: String },
    /// One render cycle of the page
    Page(PageArgs),
    /// Interactive prompt printing the demo report for each line
    Repl,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Html,
}

#[derive(Clone, Copy, ValueEnum)]
enum TabArg {
    Derivative,
    Integral,
    Limit,
    Series,
    Evaluate,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Indefinite,
    Definite,
}

#[derive(clap::Args)]
struct PageArgs {
    #[arg(long)]
    expression: Option<String>,
    #[arg(long)]
    variable: Option<String>,
    /// Tabs whose button is pressed
    #[arg(long = "run", value_enum)]
    run: Vec<TabArg>,
    #[arg(long)]
    order: Option<u32>,
    #[arg(long, value_enum)]
    kind: Option<KindArg>,
    #[arg(long, allow_hyphen_values = true)]
    lower: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    upper: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    point: Option<String>,
    /// One of +, - or +-
    #[arg(long, allow_hyphen_values = true)]
    direction: Option<Direction>,
    #[arg(long, allow_hyphen_values = true)]
    center: Option<String>,
    #[arg(long)]
    series_order: Option<u32>,
    #[arg(long, allow_hyphen_values = true)]
    value: Option<String>,
    #[arg(long, value_enum, default_value = "text")]
    format: Format,
}

impl PageArgs {
    fn request(&self, tab: TabArg, config: &FrontendConfig) -> TabRequest {
        let text = |arg: &Option<String>, default: &String| arg.clone().unwrap_or_else(|| default.clone());
        match tab {
            TabArg::Derivative => TabRequest::Differentiation(Differentiation {
                order: self.order.unwrap_or(config.derivative_order),
            }),
            TabArg::Integral => TabRequest::Integration(Integration {
                kind: match self.kind {
                    Some(KindArg::Definite) => IntegralKind::Definite,
                    _ => IntegralKind::Indefinite,
                },
                lower: text(&self.lower, &config.lower_bound),
                upper: text(&self.upper, &config.upper_bound),
            }),
            TabArg::Limit => TabRequest::Limit(Limit {
                point: text(&self.point, &config.limit_point),
                direction: self.direction.unwrap_or(config.limit_direction),
            }),
            TabArg::Series => TabRequest::TaylorSeries(TaylorSeries {
                center: text(&self.center, &config.series_point),
                order: self.series_order.unwrap_or(config.series_order),
            }),
            TabArg::Evaluate => TabRequest::Evaluation(Evaluation {
                value: text(&self.value, &config.evaluation_value),
            }),
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Lines of the demo report; failures are reported in place
fn report(calc: &CalculusCalculator, expr: &Expr) -> Vec<(&'static str, String)> {
    let show = |r: symb_calculus::Result<String>| r.unwrap_or_else(|e| format!("Error: {e}"));
    let x = &calc.x;
    let sin_x_over_x = Expr::div(x.clone().sin(), x.to_expr());
    vec![
        ("Expression", expr.to_string()),
        ("Derivative", show(calc.differentiate(expr, None, 1).map(|r| r.to_string()))),
        (
            "Second Derivative",
            show(calc.differentiate(expr, None, 2).map(|r| r.to_string())),
        ),
        (
            "Indefinite Integral",
            show(calc.integrate(expr, None, None, None).map(|r| r.to_string())),
        ),
        (
            "Definite Integral [0, 1]",
            show(
                calc.integrate(expr, Some(x), Some(&Expr::zero()), Some(&Expr::one()))
                    .map(|r| r.to_string()),
            ),
        ),
        (
            "Limit as x -> 0",
            show(
                calc.limit(&sin_x_over_x, x, &Expr::zero(), Direction::Plus)
                    .map(|r| r.to_string()),
            ),
        ),
        (
            "Taylor Series",
            show(calc.taylor(expr, Some(x), &Expr::zero(), 5).map(|s| s.to_string())),
        ),
        (
            "Numeric Evaluation at x=1",
            show(
                calc.evaluate(expr, &Substitutions::new().with(x.clone(), Expr::one()))
                    .map(format_evalf),
            ),
        ),
    ]
}

fn print_report(calc: &CalculusCalculator, input: &str) -> bool {
    match parse(input) {
        Ok(expr) => {
            for (label, value) in report(calc, &expr) {
                println!("{label}: {value}");
            }
            true
        }
        Err(e) => {
            println!("Invalid expression: {e}");
            false
        }
    }
}

fn run_page(calc: &CalculusCalculator, config: &FrontendConfig, args: &PageArgs) -> symb_calculus::Result<()> {
    let mut input = PageInput::initial(config);
    if let Some(expression) = &args.expression {
        input.expression.clone_from(expression);
    }
    if let Some(variable) = &args.variable {
        input.variable.clone_from(variable);
    }
    let requests: Vec<TabRequest> = args.run.iter().map(|&t| args.request(t, config)).collect();
    debug!(tabs = requests.len(), "render cycle");
    let view = Page::new(calc, config).render(&input, &requests);
    match args.format {
        Format::Text => print!("{}", view.to_text()),
        Format::Json => println!("{}", view.to_json()?),
        Format::Html => print!("{}", html::render_page(&view)),
    }
    // Show which tabs were left untouched when asked for text
    if matches!(args.format, Format::Text) && requests.is_empty() && !view.halted() {
        let names: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
        println!("\n(no tab triggered; use --run to press one of: {})", names.join(", "));
    }
    Ok(())
}

fn repl(calc: &CalculusCalculator) -> ExitCode {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("cannot start line editor: {e}");
            return ExitCode::FAILURE;
        }
    };
    println!("Variables: x, y, z. Operators: + - * / ** (multiplication must be explicit).");
    println!("Functions: sin cos tan exp log sqrt ... Constants: pi, E. Ctrl-D quits.");
    loop {
        match editor.readline("calc> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);
                if matches!(line, "exit" | "quit") {
                    break;
                }
                print_report(calc, line);
                println!();
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("read error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = CalcConfig::load(cli.config.as_deref());
    let calc = CalculusCalculator::with_config(config.engine.clone());

    match &cli.command {
        Command::Demo { expression } => {
            if print_report(&calc, expression) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Page(args) => match run_page(&calc, &config.frontend, args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        },
        Command::Repl => repl(&calc),
    }
}
