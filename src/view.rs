//! View binding table
//!
//! Every DOM node the dashboard writes to is looked up once at startup and
//! stored under a typed [`Slot`]. Renderers address slots, never selectors;
//! a slot with no bound node is silently skipped.

use std::collections::HashMap;

use crate::model::{FooterMetric, Metric, Phase};

/// A writable position on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Phase cell tagged `data-dept`/`data-phase`/`data-metric`
    Cell {
        dept: String,
        phase: Phase,
        metric: Metric,
    },
    /// Department footer value next to a `.footer-icon`
    Footer { dept: String, metric: FooterMetric },
    SummaryEnergy,
    SummaryCost,
    SummaryMonth,
    SummaryYear,
    LastUpdate,
    Prediction,
    MonthlyEnergy,
    MonthlyBill,
    DailyEnergy,
    DailyBill,
    DailyProgress,
    DailyProgressLabel,
    MonthlyProgress,
    MonthlyProgressLabel,
    /// Latest-value widget for room `n` (zero based)
    RoomLatest(usize),
    /// Unit label under room widget `n` (zero based)
    RoomUnit(usize),
}

impl Slot {
    pub fn cell(dept: impl Into<String>, phase: Phase, metric: Metric) -> Self {
        Slot::Cell {
            dept: dept.into(),
            phase,
            metric,
        }
    }

    pub fn footer(dept: impl Into<String>, metric: FooterMetric) -> Self {
        Slot::Footer {
            dept: dept.into(),
            metric,
        }
    }

    /// Parse the data attributes of a phase cell
    pub fn from_cell_attrs(dept: &str, phase: &str, metric: &str) -> Option<Self> {
        if dept.is_empty() {
            return None;
        }
        Some(Slot::cell(dept, Phase::from_attr(phase)?, Metric::from_attr(metric)?))
    }

    /// Parse the data attributes of a footer icon
    pub fn from_footer_attrs(dept: &str, metric: &str) -> Option<Self> {
        if dept.is_empty() {
            return None;
        }
        Some(Slot::footer(dept, FooterMetric::from_attr(metric)?))
    }
}

/// Something the renderers can write into
pub trait ViewSurface {
    /// Replace the text of a slot. Returns `false` when the slot is unbound.
    fn set_text(&mut self, slot: &Slot, text: &str) -> bool;

    /// Set a progress bar's width in percent. Returns `false` when unbound.
    fn set_width(&mut self, slot: &Slot, percent: f64) -> bool;
}

/// A concrete node the binding table can hold
pub trait TextNode {
    fn set_text(&self, text: &str);
    fn set_width(&self, css_width: &str);
}

/// Slot → node table, built once and then only read
#[derive(Debug, Clone)]
pub struct ViewBindings<N> {
    nodes: HashMap<Slot, N>,
}

impl<N> Default for ViewBindings<N> {
    fn default() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }
}

impl<N: TextNode> ViewBindings<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a node. The first binding for a slot wins, matching a
    /// `querySelector` lookup.
    pub fn bind(&mut self, slot: Slot, node: N) -> bool {
        if self.nodes.contains_key(&slot) {
            tracing::debug!(?slot, "Duplicate binding ignored");
            return false;
        }
        self.nodes.insert(slot, node);
        true
    }

    pub fn get(&self, slot: &Slot) -> Option<&N> {
        self.nodes.get(slot)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of phase cells bound for a department
    pub fn cell_count(&self, dept: &str) -> usize {
        self.nodes
            .keys()
            .filter(|slot| matches!(slot, Slot::Cell { dept: d, .. } if d == dept))
            .count()
    }
}

impl<N: TextNode> ViewSurface for ViewBindings<N> {
    fn set_text(&mut self, slot: &Slot, text: &str) -> bool {
        match self.nodes.get(slot) {
            Some(node) => {
                node.set_text(text);
                true
            }
            None => false,
        }
    }

    fn set_width(&mut self, slot: &Slot, percent: f64) -> bool {
        match self.nodes.get(slot) {
            Some(node) => {
                node.set_width(&format!("{}%", percent));
                true
            }
            None => false,
        }
    }
}
