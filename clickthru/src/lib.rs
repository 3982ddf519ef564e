//! clickthru renders click-through links for data visualizations.
//!
//! When a user clicks a chart element or table cell, the clicked data point
//! (its value, its column, the row it came from and any breakout dimensions)
//! can be rendered into a URL or text template such as
//! `http://example.com/{{COL1}}`. Rendering never fails: placeholders that
//! cannot be resolved are left empty, and values that cannot be formatted are
//! passed through as-is.
//!
//! For the command line interface, see the `clickthru-cli` crate.

mod clicked;
mod column;
mod config;
mod datetime;
mod error;
mod format;
pub mod fs;
mod settings;
mod template;
mod value;

pub use clicked::{Clicked, ColumnIndex, Dimension, Origin, Resolved, Resolver};
pub use column::Column;
pub use config::Config;
pub use datetime::{
    bucket_bounds, format_date_time_for_parameter, format_date_time_for_parameter_with,
    DateTimeUnit, StartOfWeek, Timestamp,
};
pub use error::Error;
pub use format::{format_value, CurrencyStyle, NumberStyle};
pub use settings::{
    click_behavior_descriptors, ClickAction, ClickBehavior, ClickSettings, ColumnSettings, Link,
    RadioOption, SettingDescriptor, SettingKey, UrlOpener, ViewAs, Visibility, Widget,
};
pub use template::{
    render_link_text_for_click, render_link_url_for_click, render_template_for_click,
    LinkRenderer, Segment, Template,
};
pub use value::{Map, Value};
