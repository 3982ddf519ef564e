//! Drill-through settings: what happens when a user clicks a data point, and
//! the descriptors a settings panel uses to edit that choice.

use serde::{Deserialize, Serialize};

use crate::{Clicked, CurrencyStyle, Error, LinkRenderer, NumberStyle, Value};

/// What a click on a data point does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickBehavior {
    /// Open the drill-through actions menu.
    #[default]
    Menu,
    /// Navigate to a custom link.
    Link,
}

/// Click behaviour settings persisted alongside a visualization's other
/// settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickSettings {
    pub click: ClickBehavior,
    pub click_link_template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_link_text: Option<String>,
}

impl ClickSettings {
    /// Settings that send clicks to the given link template.
    pub fn link<S: AsRef<str>>(template: S) -> Self {
        Self {
            click: ClickBehavior::Link,
            click_link_template: template.as_ref().to_string(),
            click_link_text: None,
        }
    }

    pub fn with_text<S: AsRef<str>>(mut self, text: S) -> Self {
        self.click_link_text = Some(text.as_ref().to_string());
        self
    }

    /// Work out what a click on the given data point should do.
    ///
    /// A link behaviour with an empty template falls back to the menu.
    pub fn action_for(&self, renderer: &LinkRenderer<'_>, clicked: &Clicked) -> ClickAction {
        if self.click != ClickBehavior::Link || self.click_link_template.trim().is_empty() {
            return ClickAction::Menu;
        }
        let url = renderer.url_for_click(&self.click_link_template, clicked);
        let text = self
            .click_link_text
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| renderer.text_for_click(t, clicked));
        ClickAction::Link { url, text }
    }
}

/// The outcome of a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    Menu,
    Link { url: String, text: Option<String> },
}

impl ClickAction {
    /// Hands links off to the given opener. Returns whether anything was
    /// opened.
    pub fn perform<O: UrlOpener + ?Sized>(&self, opener: &mut O) -> Result<bool, Error> {
        match self {
            Self::Menu => Ok(false),
            Self::Link { url, .. } => {
                opener.open(url)?;
                Ok(true)
            }
        }
    }
}

/// Navigates to a URL on behalf of a click.
pub trait UrlOpener {
    fn open(&mut self, url: &str) -> Result<(), Error>;
}

/// The key of a click behaviour setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    Click,
    ClickLinkTemplate,
    ClickLinkText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadioOption {
    pub name: &'static str,
    pub value: ClickBehavior,
}

/// The input widget a settings panel should render for a setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    Radio { options: Vec<RadioOption> },
    Input { placeholder: Option<&'static str> },
}

/// When a setting is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Always,
    /// Only shown while the click behaviour is set to the given value.
    WhenClick(ClickBehavior),
}

/// Describes a single setting to a generic settings panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingDescriptor {
    pub key: SettingKey,
    pub section: &'static str,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
    #[serde(flatten)]
    pub widget: Widget,
    pub default: Value,
    pub visibility: Visibility,
}

impl SettingDescriptor {
    pub fn is_hidden(&self, settings: &ClickSettings) -> bool {
        match self.visibility {
            Visibility::Always => false,
            Visibility::WhenClick(behavior) => settings.click != behavior,
        }
    }
}

/// The descriptors for the click behaviour settings, in display order.
pub fn click_behavior_descriptors() -> Vec<SettingDescriptor> {
    vec![
        SettingDescriptor {
            key: SettingKey::Click,
            section: "Display",
            title: "On-click behavior",
            hint: None,
            widget: Widget::Radio {
                options: vec![
                    RadioOption {
                        name: "Open the actions menu",
                        value: ClickBehavior::Menu,
                    },
                    RadioOption {
                        name: "Go to a custom link",
                        value: ClickBehavior::Link,
                    },
                ],
            },
            default: Value::from("menu"),
            visibility: Visibility::Always,
        },
        SettingDescriptor {
            key: SettingKey::ClickLinkTemplate,
            section: "Display",
            title: "Link template",
            hint: Some("Use {{column_name}} to insert the value of a column from the clicked row."),
            widget: Widget::Input {
                placeholder: Some("http://example.com/{{column_name}}"),
            },
            default: Value::from(""),
            visibility: Visibility::WhenClick(ClickBehavior::Link),
        },
        SettingDescriptor {
            key: SettingKey::ClickLinkText,
            section: "Display",
            title: "Link text",
            hint: None,
            widget: Widget::Input { placeholder: None },
            default: Value::Null,
            visibility: Visibility::WhenClick(ClickBehavior::Link),
        },
    ]
}

/// How a table column's cells are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewAs {
    #[default]
    Auto,
    Link,
}

/// Per-column display settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_style: Option<NumberStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_style: Option<CurrencyStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    pub view_as: ViewAs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
}

/// A rendered link for a table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub text: String,
}

impl ColumnSettings {
    /// Display the column's cells as links built from the given URL template.
    pub fn view_as_link<S: AsRef<str>>(mut self, url: S) -> Self {
        self.view_as = ViewAs::Link;
        self.link_url = Some(url.as_ref().to_string());
        self
    }

    pub fn with_link_text<S: AsRef<str>>(mut self, text: S) -> Self {
        self.link_text = Some(text.as_ref().to_string());
        self
    }

    /// Renders the link for a clicked cell of this column, if the column is
    /// displayed as links. Without a text template, the link text is the
    /// formatted cell value.
    pub fn link_for(&self, renderer: &LinkRenderer<'_>, clicked: &Clicked) -> Option<Link> {
        if self.view_as != ViewAs::Link {
            return None;
        }
        let url_template = self.link_url.as_deref().filter(|t| !t.trim().is_empty())?;
        let url = renderer.url_for_click(url_template, clicked);
        let text = match self.link_text.as_deref().filter(|t| !t.is_empty()) {
            Some(t) => renderer.text_for_click(t, clicked),
            None => match clicked.column.as_ref() {
                Some(column) => renderer.format_for_text(&clicked.value, column),
                None => clicked.value.to_string(),
            },
        };
        Some(Link { url, text })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Column, Origin};
    use serde_json::json;

    #[derive(Default)]
    struct RecordingOpener {
        opened: Vec<String>,
    }

    impl UrlOpener for RecordingOpener {
        fn open(&mut self, url: &str) -> Result<(), Error> {
            self.opened.push(url.to_string());
            Ok(())
        }
    }

    struct BrokenOpener;

    impl UrlOpener for BrokenOpener {
        fn open(&mut self, url: &str) -> Result<(), Error> {
            Err(Error::OpenUrl(url.to_string(), "no browser".to_string()))
        }
    }

    fn clicked() -> Clicked {
        Clicked::new("b", Column::new("COL2")).with_origin(Origin::new(
            vec!["a".into(), "b".into(), "c d".into()],
            vec![Column::new("COL1"), Column::new("COL2"), Column::new("COL3")],
        ))
    }

    #[test]
    fn template_fields_hidden_unless_link() {
        let descriptors = click_behavior_descriptors();
        let menu = ClickSettings::default();
        let link = ClickSettings::link("http://example.com/{{COL1}}");
        let hidden = |settings: &ClickSettings| {
            descriptors
                .iter()
                .filter(|d| d.is_hidden(settings))
                .map(|d| d.key)
                .collect::<Vec<SettingKey>>()
        };
        assert_eq!(
            hidden(&menu),
            vec![SettingKey::ClickLinkTemplate, SettingKey::ClickLinkText]
        );
        assert!(hidden(&link).is_empty());
    }

    #[test]
    fn descriptors_serialize_for_settings_panel() {
        let json = serde_json::to_value(&click_behavior_descriptors()[0]).unwrap();
        assert_eq!(json["key"], json!("click"));
        assert_eq!(json["widget"], json!("radio"));
        assert_eq!(json["options"][1]["value"], json!("link"));
        assert_eq!(json["default"], json!("menu"));
        assert_eq!(json["visibility"], json!("always"));
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: ClickSettings = serde_json::from_value(json!({})).unwrap();
        assert_eq!(settings, ClickSettings::default());
        let settings: ClickSettings = serde_json::from_value(json!({
            "click": "link",
            "click_link_template": "http://example.com/{{COL1}}",
        }))
        .unwrap();
        assert_eq!(settings.click, ClickBehavior::Link);
        assert!(settings.click_link_text.is_none());
    }

    #[test]
    fn menu_action() {
        let renderer = LinkRenderer::default();
        let mut opener = RecordingOpener::default();
        let action = ClickSettings::default().action_for(&renderer, &clicked());
        assert_eq!(action, ClickAction::Menu);
        assert!(!action.perform(&mut opener).unwrap());
        assert!(opener.opened.is_empty());

        // A link behaviour without a template has nowhere to go.
        let action = ClickSettings::link("  ").action_for(&renderer, &clicked());
        assert_eq!(action, ClickAction::Menu);
    }

    #[test]
    fn link_action_opens_rendered_url() {
        let renderer = LinkRenderer::default();
        let mut opener = RecordingOpener::default();
        let action = ClickSettings::link("http://example.com/{{COL1}}/{{col3}}")
            .with_text("Open {{COL2}}")
            .action_for(&renderer, &clicked());
        assert_eq!(
            action,
            ClickAction::Link {
                url: "http://example.com/a/c%20d".to_string(),
                text: Some("Open b".to_string()),
            }
        );
        assert!(action.perform(&mut opener).unwrap());
        assert_eq!(opener.opened, vec!["http://example.com/a/c%20d"]);
    }

    #[test]
    fn opener_failures_propagate() {
        let renderer = LinkRenderer::default();
        let action =
            ClickSettings::link("http://example.com/{{COL1}}").action_for(&renderer, &clicked());
        match action.perform(&mut BrokenOpener) {
            Err(Error::OpenUrl(url, reason)) => {
                assert_eq!(url, "http://example.com/a");
                assert_eq!(reason, "no browser");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        // Menus never reach the opener.
        assert!(!ClickAction::Menu.perform(&mut BrokenOpener).unwrap());
    }

    #[test]
    fn column_view_as_link() {
        let renderer = LinkRenderer::default();
        let settings = ColumnSettings::default().view_as_link("http://example.com/items/{{COL1}}");
        assert_eq!(
            settings.link_for(&renderer, &clicked()),
            Some(Link {
                url: "http://example.com/items/a".to_string(),
                text: "b".to_string(),
            })
        );
        let settings = settings.with_link_text("Item {{COL1}}");
        assert_eq!(settings.link_for(&renderer, &clicked()).unwrap().text, "Item a");
        assert!(ColumnSettings::default()
            .link_for(&renderer, &clicked())
            .is_none());
    }
}
