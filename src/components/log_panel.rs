use dioxus::prelude::*;

/// Append-only activity log, newest entry first. Entries arrive already
/// timestamped by the dispatcher.
#[component]
pub fn LogPanel(entries: Vec<String>) -> Element {
    rsx! {
        div {
            class: "panel log-panel",
            h3 { class: "panel-title", "Activity" }
            div {
                class: "log-entries",
                if entries.is_empty() {
                    div { class: "log-empty", "No activity yet" }
                }
                for entry in entries.iter() {
                    div { class: "log-entry", "{entry}" }
                }
            }
        }
    }
}
