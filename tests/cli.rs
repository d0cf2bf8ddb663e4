use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("symb-calculus").unwrap();
    cmd.env_remove("SYMB_CALCULUS_CONFIG");
    cmd
}

#[test]
fn demo_prints_full_report() {
    cli()
        .args(["demo", "x**2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Expression: x^2"))
        .stdout(predicate::str::contains("Derivative: 2*x"))
        .stdout(predicate::str::contains("Second Derivative: 2"))
        .stdout(predicate::str::contains("Indefinite Integral: x^3/3"))
        .stdout(predicate::str::contains("Definite Integral [0, 1]: 1/3"))
        .stdout(predicate::str::contains("Limit as x -> 0: 1"))
        .stdout(predicate::str::contains("Numeric Evaluation at x=1: 1.00000000000000"));
}

#[test]
fn demo_reports_failures_in_place() {
    cli()
        .args(["demo", "exp(x**2)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Indefinite Integral: Error: no closed form"));
}

#[test]
fn demo_rejects_bad_syntax() {
    cli()
        .args(["demo", "2x +"])
        .assert()
        .failure()
        .stdout(predicate::str::starts_with("Invalid expression:"));
}

#[test]
fn page_as_json() {
    let output = cli()
        .args(["page", "--expression", "x**3", "--run", "derivative", "--order", "2"])
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["tabs"][0]["output"]["kind"], "latex");
    assert_eq!(
        view["tabs"][0]["output"]["body"],
        r"\frac{d^{2}}{dx^{2}} \left( x^{3} \right) = 6 x"
    );
}

#[test]
fn page_as_text_without_trigger_shows_hint() {
    cli()
        .args(["page", "--expression", "sin(x)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no tab triggered"));
}

#[test]
fn page_as_html() {
    cli()
        .args(["page", "--run", "limit", "--point", "-1", "--direction", "-"])
        .args(["--format", "html"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("data-latex"));
}

#[test]
fn config_file_changes_defaults() {
    let dir = std::env::temp_dir().join(format!("symb-calculus-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("calc.toml");
    std::fs::write(&path, "[frontend]\ntitle = \"Practice sheet\"\n").unwrap();
    cli()
        .arg("--config")
        .arg(&path)
        .args(["page", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Practice sheet"));
    let _ = std::fs::remove_dir_all(&dir);
}
