/// Identity strings for log lines
///
/// Every reported line starts with the context it concerns: the monitored
/// store and product, or the store and setup topic. The colorized forms only
/// wrap segments in ANSI styles; stripped of those, they match the plain forms.
use colored::Colorize;

use crate::model::{Link, Store};

/// Renders `[{store}] [{brand} ({series})] {model}`, prefixed with
/// `[{proxy}/{total}]` when the store carries proxy rotation state.
pub fn product(link: &Link, store: &Store, color: bool) -> String {
    let proxy = store
        .proxy_position()
        .map(|(position, total)| format!("[{}/{}]", position, total));
    let product = format!("[{} ({})] {}", link.brand, link.series, link.model);

    match (proxy, color) {
        (Some(proxy), true) => format!(
            "{}{}{}",
            proxy.bright_black(),
            format!(" [{}]", store.name).cyan(),
            format!(" {}", product).bright_black()
        ),
        (None, true) => format!(
            "{}{}",
            format!("[{}]", store.name).cyan(),
            format!(" {}", product).bright_black()
        ),
        (Some(proxy), false) => format!("{} [{}] {}", proxy, store.name, product),
        (None, false) => format!("[{}] {}", store.name, product),
    }
}

/// Renders `[{store}] [setup ({topic})]`.
pub fn setup(topic: &str, store: &Store, color: bool) -> String {
    if color {
        return format!(
            "{}{}",
            format!("[{}]", store.name).cyan(),
            format!(" [setup ({})]", topic).bright_black()
        );
    }

    format!("[{}] [setup ({})]", store.name, topic)
}
