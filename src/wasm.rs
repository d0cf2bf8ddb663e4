//! Browser bindings for the page (feature `wasm`)
//!
//! `CalculusPage` runs render cycles for a JavaScript host and hands back the
//! serialised `PageView`; `web/index.html` is the matching host page.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::calculator::CalculusCalculator;
use crate::config::{CalcConfig, FrontendConfig};
use crate::frontend::{Page, PageInput, TabRequest, html};

fn js_error(message: &str) -> JsValue {
    JsValue::from_str(message)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|err| js_error(&format!("Failed to serialize page: {err}")))
}

#[wasm_bindgen]
pub struct CalculusPage {
    calculator: CalculusCalculator,
    frontend: FrontendConfig,
}

#[wasm_bindgen]
impl CalculusPage {
    /// Optional TOML configuration text; invalid text is an error
    #[wasm_bindgen(constructor)]
    pub fn new(config_toml: Option<String>) -> Result<CalculusPage, JsValue> {
        let config = match config_toml {
            Some(text) => CalcConfig::from_toml_str(&text).map_err(|e| js_error(&e.to_string()))?,
            None => CalcConfig::default(),
        };
        Ok(CalculusPage {
            calculator: CalculusCalculator::with_config(config.engine),
            frontend: config.frontend,
        })
    }

    /// Sidebar defaults as `{ expression, variable }`
    #[wasm_bindgen(js_name = initialInput)]
    pub fn initial_input(&self) -> Result<JsValue, JsValue> {
        let input = PageInput::initial(&self.frontend);
        to_js(&serde_json::json!({
            "expression": input.expression,
            "variable": input.variable,
        }))
    }

    /// Render cycle with no tab triggered
    #[wasm_bindgen(js_name = render)]
    pub fn render(&self, expression: String, variable: String) -> Result<JsValue, JsValue> {
        let page = Page::new(&self.calculator, &self.frontend);
        to_js(&page.render(&PageInput::new(expression, variable), &[]))
    }

    /// Render cycle with one tab triggered; `request` is a `TabRequest` object
    #[wasm_bindgen(js_name = trigger)]
    pub fn trigger(
        &self,
        expression: String,
        variable: String,
        request: JsValue,
    ) -> Result<JsValue, JsValue> {
        let request: TabRequest = serde_wasm_bindgen::from_value(request)
            .map_err(|err| js_error(&format!("Invalid tab request: {err}")))?;
        let page = Page::new(&self.calculator, &self.frontend);
        to_js(&page.render(&PageInput::new(expression, variable), &[request]))
    }

    /// Full HTML document for the given inputs
    #[wasm_bindgen(js_name = renderHtml)]
    pub fn render_html(&self, expression: String, variable: String) -> String {
        let page = Page::new(&self.calculator, &self.frontend);
        html::render_page(&page.render(&PageInput::new(expression, variable), &[]))
    }
}
