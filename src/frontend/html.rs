//! Standalone HTML rendering of a [`PageView`]
//!
//! Formulas are emitted as `data-latex` attributes and typeset by KaTeX in the
//! browser. All user text goes through [`escape`].

use super::{NoticeLevel, PageView, TabOutput, TabPanel, Widget};

const KATEX_VERSION: &str = "0.16.11";

/// Escape text for HTML element content and double-quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn math(latex: &str) -> String {
    format!(r#"<div class="math" data-latex="{}"></div>"#, escape(latex))
}

fn widget(w: &Widget) -> String {
    match w {
        Widget::TextInput { key, label, value } => format!(
            r#"<label>{}<input type="text" name="{key}" value="{}"></label>"#,
            escape(label),
            escape(value)
        ),
        Widget::NumberInput {
            key,
            label,
            min,
            max,
            value,
        } => format!(
            r#"<label>{}<input type="number" name="{key}" min="{min}" max="{max}" step="1" value="{value}"></label>"#,
            escape(label)
        ),
        Widget::Radio {
            key,
            label,
            options,
            selected,
        } => {
            let choices: String = options
                .iter()
                .enumerate()
                .map(|(i, o)| {
                    let checked = if i == *selected { " checked" } else { "" };
                    format!(
                        r#"<label><input type="radio" name="{key}" value="{o}"{checked}>{o}</label>"#,
                        o = escape(o)
                    )
                })
                .collect();
            format!("<fieldset><legend>{}</legend>{choices}</fieldset>", escape(label))
        }
        Widget::Select {
            key,
            label,
            options,
            selected,
        } => {
            let choices: String = options
                .iter()
                .enumerate()
                .map(|(i, o)| {
                    let sel = if i == *selected { " selected" } else { "" };
                    format!(r#"<option{sel}>{}</option>"#, escape(o))
                })
                .collect();
            format!(
                r#"<label>{}<select name="{key}">{choices}</select></label>"#,
                escape(label)
            )
        }
        Widget::Button { label } => format!("<button>{}</button>", escape(label)),
    }
}

fn panel(p: &TabPanel) -> String {
    let mut out = format!(
        r#"<section class="tab" id="tab-{}"><h2>{}</h2><h3>{}</h3><form>"#,
        p.title.to_lowercase().replace(' ', "-"),
        escape(p.title),
        escape(p.header)
    );
    for w in &p.controls {
        out.push_str(&widget(w));
    }
    out.push_str("</form>");
    match (&p.output, &p.error) {
        (Some(output), _) => {
            out.push_str("<h4>Result</h4>");
            match output {
                TabOutput::Latex(latex) => out.push_str(&math(latex)),
                TabOutput::Text { caption, code } => out.push_str(&format!(
                    "<p>{}</p><pre><code>{}</code></pre>",
                    escape(caption),
                    escape(code)
                )),
            }
        }
        (None, Some(error)) => {
            out.push_str(&format!(r#"<div class="error">{}</div>"#, escape(error)));
        }
        (None, None) => {}
    }
    out.push_str("</section>");
    out
}

/// Complete HTML document for one render cycle
pub fn render_page(view: &PageView) -> String {
    let mut sidebar = String::from("<h2>Input Settings</h2>");
    sidebar.push_str(&format!(
        r#"<label>Expression<input type="text" name="expression" value="{}"></label>"#,
        escape(&view.expression)
    ));
    sidebar.push_str(&format!(
        r#"<label>Variable<input type="text" name="variable" value="{}"></label>"#,
        escape(&view.variable)
    ));
    for notice in &view.sidebar {
        let class = match notice.level {
            NoticeLevel::Success => "success",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        sidebar.push_str(&format!(
            r#"<div class="{class}">{}</div>"#,
            escape(&notice.text)
        ));
    }
    if let Some(latex) = &view.expression_latex {
        sidebar.push_str(&math(latex));
    }

    let tabs: String = view.tabs.iter().map(panel).collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/katex@{KATEX_VERSION}/dist/katex.min.css">
<script defer src="https://cdn.jsdelivr.net/npm/katex@{KATEX_VERSION}/dist/katex.min.js"></script>
<style>
body {{ display: flex; font-family: sans-serif; margin: 0; }}
aside {{ width: 18rem; padding: 1rem; background: #f0f2f6; }}
main {{ flex: 1; padding: 1rem 2rem; }}
label {{ display: block; margin: 0.5rem 0; }}
.success {{ color: #1b7a3a; }} .warning {{ color: #8a6d00; }} .error {{ color: #b00020; }}
</style>
</head>
<body>
<aside>{sidebar}</aside>
<main>
<h1>{title}</h1>
<p>{subtitle}</p>
{tabs}
</main>
<script>
document.addEventListener("DOMContentLoaded", () => {{
  for (const el of document.querySelectorAll(".math")) {{
    katex.render(el.dataset.latex, el, {{ displayMode: true, throwOnError: false }});
  }}
}});
</script>
</body>
</html>
"#,
        title = escape(&view.title),
        subtitle = escape(&view.subtitle),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CalculusCalculator;
    use crate::config::FrontendConfig;
    use crate::frontend::{Page, PageInput};

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<b>"x" & 'y'</b>"#), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_user_text_is_escaped() {
        let calc = CalculusCalculator::new();
        let config = FrontendConfig::default();
        let view = Page::new(&calc, &config).render(&PageInput::new("<script>", "x"), &[]);
        let html = render_page(&view);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains(r#"value="<script>""#));
    }

    #[test]
    fn test_formula_is_an_attribute() {
        let calc = CalculusCalculator::new();
        let config = FrontendConfig::default();
        let view = Page::new(&calc, &config).render(&PageInput::new("x/2", "x"), &[]);
        let html = render_page(&view);
        assert!(html.contains(r#"data-latex="\frac{x}{2}""#));
        assert_eq!(html.matches(r#"class="tab""#).count(), 5);
    }
}
