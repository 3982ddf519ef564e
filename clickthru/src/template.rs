//! Link templates: strings with `{{column}}` placeholders that are filled in
//! from a clicked data point.

use std::borrow::Cow;

use log::warn;

use crate::datetime::format_date_time_for_parameter_with;
use crate::format::format_value;
use crate::{Clicked, Column, Config, Resolved, Resolver, Value};

/// A piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// The name of a column whose value should be inserted.
    Placeholder(String),
}

/// A parsed link template.
///
/// A placeholder is `{{`, followed by one or more characters other than `}`,
/// followed by `}}`. There is no escaping: anything that isn't a well-formed
/// placeholder is kept as literal text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;
        while let Some(start) = rest.find("{{") {
            let after_open = &rest[start + 2..];
            let name_len = after_open.find('}').unwrap_or(after_open.len());
            if name_len > 0 && after_open[name_len..].starts_with("}}") {
                literal.push_str(&rest[..start]);
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                let name = after_open[..name_len].trim();
                segments.push(Segment::Placeholder(name.to_string()));
                rest = &after_open[name_len + 2..];
            } else {
                // Not a placeholder here; the second brace may still open one.
                literal.push_str(&rest[..start + 1]);
                rest = &rest[start + 1..];
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The names of all placeholders, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Whether this template contains no placeholders at all.
    pub fn is_static(&self) -> bool {
        self.placeholders().next().is_none()
    }

    /// Fill in each placeholder with the formatted value of the matching
    /// column. Placeholders that cannot be resolved are left empty.
    pub fn render<F>(&self, resolver: &Resolver<'_>, format: F) -> String
    where
        F: Fn(Resolved<'_>) -> String,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Placeholder(name) => match resolver.resolve(name) {
                    Some(resolved) => out.push_str(&format(resolved)),
                    None => warn!("Missing value for placeholder \"{}\"", name),
                },
            }
        }
        out
    }
}

/// Render a template against a clicked data point using a custom value
/// formatter.
pub fn render_template_for_click<F>(template: &str, clicked: &Clicked, format: F) -> String
where
    F: Fn(Resolved<'_>) -> String,
{
    Template::parse(template).render(&Resolver::new(clicked), format)
}

/// Render a URL template, percent-encoding each inserted value. Bucketed
/// dates are inserted as the whole bucket (see
/// [`crate::format_date_time_for_parameter`]).
pub fn render_link_url_for_click(template: &str, clicked: &Clicked) -> String {
    LinkRenderer::default().url_for_click(template, clicked)
}

/// Render a link text template, inserting display-formatted values.
pub fn render_link_text_for_click(template: &str, clicked: &Clicked) -> String {
    LinkRenderer::default().text_for_click(template, clicked)
}

/// Renders link URLs and texts according to a [`Config`].
#[derive(Debug, Clone)]
pub struct LinkRenderer<'c> {
    config: Cow<'c, Config>,
}

impl Default for LinkRenderer<'static> {
    fn default() -> Self {
        Self {
            config: Cow::Owned(Config::default()),
        }
    }
}

impl<'c> LinkRenderer<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self {
            config: Cow::Borrowed(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn url_for_click(&self, template: &str, clicked: &Clicked) -> String {
        self.url(&Template::parse(template), &Resolver::new(clicked))
    }

    pub fn text_for_click(&self, template: &str, clicked: &Clicked) -> String {
        self.text(&Template::parse(template), &Resolver::new(clicked))
    }

    pub fn url(&self, template: &Template, resolver: &Resolver<'_>) -> String {
        template.render(resolver, |r| self.format_for_url(r.value, r.column))
    }

    pub fn text(&self, template: &Template, resolver: &Resolver<'_>) -> String {
        template.render(resolver, |r| self.format_for_text(r.value, r.column))
    }

    /// The percent-encoded form of a value for insertion into a URL.
    pub fn format_for_url(&self, value: &Value, column: &Column) -> String {
        let raw = match column.unit {
            Some(unit) if column.is_temporal() => {
                format_date_time_for_parameter_with(value, unit, self.config.start_of_week)
            }
            _ => value.to_string(),
        };
        encode_uri_component(&raw)
    }

    /// The display form of a value for insertion into link text.
    pub fn format_for_text(&self, value: &Value, column: &Column) -> String {
        format_value(value, column, &self.config)
    }
}

/// Percent-encodes a URL component, leaving ASCII alphanumerics and
/// `-_.!~*'()` as they are.
fn encode_uri_component(raw: &str) -> String {
    urlencoding::encode(raw)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}
