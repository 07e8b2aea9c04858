//! Terminal styling shared by the screens and tables.

use color_print::cformat;

use crate::model::Health;

pub fn title(text: &str) -> String {
    cformat!("<bold>{}</>", text)
}

pub fn highlight(text: &str) -> String {
    cformat!("<#FF5FD7>{}</>", text)
}

pub fn help(text: &str) -> String {
    cformat!("<dim>{}</>", text)
}

pub fn error(text: &str) -> String {
    cformat!("<red>{}</>", text)
}

pub fn success(text: &str) -> String {
    cformat!("<green>✓</> {}", text)
}

/// `<title>: <value><meta>` once a field has been resolved.
pub fn entered(title: &str, value: &str, meta: &str) -> String {
    cformat!("{}: <green>{}</><dim>{}</>", title, value, meta)
}

pub fn health(text: &str, health: Health) -> String {
    match health {
        Health::Active => cformat!("<green>{}</>", text),
        Health::Pending => cformat!("<yellow>{}</>", text),
        Health::Disabled => cformat!("<red><dim>{}</></>", text),
        Health::Neutral => text.to_string(),
    }
}
