//! Form controls shown on a tab, as plain data
//!
//! Widgets carry the value the page was rendered with so a host (HTML page,
//! browser script or terminal) can redraw the form exactly.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    TextInput {
        key: &'static str,
        label: String,
        value: String,
    },
    /// Integer stepper bounded to `min..=max`
    NumberInput {
        key: &'static str,
        label: String,
        min: u32,
        max: u32,
        value: u32,
    },
    Radio {
        key: &'static str,
        label: String,
        options: Vec<String>,
        selected: usize,
    },
    Select {
        key: &'static str,
        label: String,
        options: Vec<String>,
        selected: usize,
    },
    Button {
        label: String,
    },
}

impl Widget {
    pub fn text(key: &'static str, label: impl Into<String>, value: impl Into<String>) -> Self {
        Widget::TextInput {
            key,
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn stepper(key: &'static str, label: impl Into<String>, min: u32, max: u32, value: u32) -> Self {
        Widget::NumberInput {
            key,
            label: label.into(),
            min,
            max,
            value: value.clamp(min, max),
        }
    }

    pub fn button(label: impl Into<String>) -> Self {
        Widget::Button { label: label.into() }
    }

    pub fn label(&self) -> &str {
        match self {
            Widget::TextInput { label, .. }
            | Widget::NumberInput { label, .. }
            | Widget::Radio { label, .. }
            | Widget::Select { label, .. }
            | Widget::Button { label } => label,
        }
    }

    /// Current value as display text
    pub fn value_text(&self) -> String {
        match self {
            Widget::TextInput { value, .. } => value.clone(),
            Widget::NumberInput { value, .. } => value.to_string(),
            Widget::Radio { options, selected, .. } | Widget::Select { options, selected, .. } => {
                options.get(*selected).cloned().unwrap_or_default()
            }
            Widget::Button { .. } => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepper_clamps_initial_value() {
        let w = Widget::stepper("order", "Order", 1, 10, 42);
        assert_eq!(w.value_text(), "10");
    }

    #[test]
    fn test_widget_json_is_tagged() {
        let json = serde_json::to_string(&Widget::button("Evaluate")).unwrap();
        assert_eq!(json, r#"{"kind":"button","label":"Evaluate"}"#);
    }
}
