//! View Bindings
//!
//! Every node the dashboard writes to is located once, here, and stored
//! under its [`Slot`]. Nothing else in the front end runs selectors.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};
use wattboard::{Slot, TextNode, ViewBindings};

/// A bound DOM element
#[derive(Debug, Clone)]
pub struct DomNode(HtmlElement);

impl TextNode for DomNode {
    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn set_width(&self, css_width: &str) {
        if let Err(e) = self.0.style().set_property("width", css_width) {
            tracing::warn!(error = ?e, "Failed to set progress width");
        }
    }
}

/// Fixed id → slot table
const ID_SLOTS: [(&str, Slot); 10] = [
    ("last-update", Slot::LastUpdate),
    ("predict-value", Slot::Prediction),
    ("totaldayabulanan", Slot::MonthlyEnergy),
    ("tagihanbulan", Slot::MonthlyBill),
    ("totaldayaharian", Slot::DailyEnergy),
    ("biayaharian", Slot::DailyBill),
    ("avgProgress", Slot::DailyProgress),
    ("avgValue", Slot::DailyProgressLabel),
    ("avgProgressbulan", Slot::MonthlyProgress),
    ("avgValuebulan", Slot::MonthlyProgressLabel),
];

/// All elements matching `selector`, in document order
fn select_all(root: &Document, selector: &str) -> Vec<HtmlElement> {
    let Ok(list) = root.query_selector_all(selector) else {
        tracing::warn!(selector, "Invalid selector");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn attr(element: &Element, name: &str) -> String {
    element.get_attribute(name).unwrap_or_default()
}

/// Value span of a footer: the first `span:last-child` under the icon's parent
fn footer_value(icon: &HtmlElement) -> Option<HtmlElement> {
    icon.parent_element()?
        .query_selector("span:last-child")
        .ok()??
        .dyn_into::<HtmlElement>()
        .ok()
}

/// Build the binding table for a document
pub fn build_bindings(document: &Document) -> ViewBindings<DomNode> {
    let mut view = ViewBindings::new();

    for cell in select_all(document, ".bar[data-dept][data-phase][data-metric]") {
        let slot = Slot::from_cell_attrs(
            &attr(&cell, "data-dept"),
            &attr(&cell, "data-phase"),
            &attr(&cell, "data-metric"),
        );
        match slot {
            Some(slot) => {
                view.bind(slot, DomNode(cell));
            }
            None => tracing::debug!("Skipping cell with unknown data attributes"),
        }
    }

    for icon in select_all(document, ".footer-icon[data-dept][data-metric]") {
        let Some(slot) = Slot::from_footer_attrs(&attr(&icon, "data-dept"), &attr(&icon, "data-metric"))
        else {
            continue;
        };
        if let Some(value) = footer_value(&icon) {
            view.bind(slot, DomNode(value));
        }
    }

    let summary_values = select_all(document, ".summary-card .summary-value");
    for (slot, node) in [Slot::SummaryEnergy, Slot::SummaryCost]
        .into_iter()
        .zip(summary_values)
    {
        view.bind(slot, DomNode(node));
    }

    for (selector, slot) in [
        (".summary-header .summary-month", Slot::SummaryMonth),
        (".summary-header .summary-year", Slot::SummaryYear),
    ] {
        if let Some(node) = select_all(document, selector).into_iter().next() {
            view.bind(slot, DomNode(node));
        }
    }

    for (id, slot) in ID_SLOTS {
        if let Some(node) = by_id(document, id) {
            view.bind(slot, DomNode(node));
        }
    }

    for room in 0..wattboard::model::ROOMS.len() {
        if let Some(node) = by_id(document, &format!("r{}", room + 1)) {
            view.bind(Slot::RoomLatest(room), DomNode(node));
        }
    }

    for (room, node) in select_all(document, ".device-unit").into_iter().enumerate() {
        view.bind(Slot::RoomUnit(room), DomNode(node));
    }

    tracing::info!(nodes = view.len(), "View bindings built");
    view
}

fn by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)?
        .dyn_into::<HtmlElement>()
        .ok()
}
