//! Dashboard
//!
//! Routes poll outcomes to the renderers and chart adapters and reports
//! failures through the status sink. Owns the chart instances for the life
//! of the page.

use chrono::NaiveDateTime;

use crate::chart::{DoughnutHost, HourlyChart, LineChart, PieChart};
use crate::config::DisplayConfig;
use crate::model::ChartUnit;
use crate::poller::{Payload, PollOutcome};
use crate::render::Renderer;
use crate::status::StatusSink;
use crate::view::ViewSurface;

pub struct Dashboard<V, L, D: DoughnutHost, S> {
    renderer: Renderer,
    view: V,
    hourly: HourlyChart<L>,
    pie: PieChart<D>,
    status: S,
}

impl<V, L, D, S> Dashboard<V, L, D, S>
where
    V: ViewSurface,
    L: LineChart,
    D: DoughnutHost,
    S: StatusSink,
{
    pub fn new(display: &DisplayConfig, view: V, line: L, doughnut: D, status: S) -> Self {
        Self {
            renderer: Renderer::new(display),
            view,
            hourly: HourlyChart::new(line, display.history_points),
            pie: PieChart::new(doughnut),
            status,
        }
    }

    /// Apply one poll outcome
    pub fn handle(&mut self, outcome: PollOutcome, now: NaiveDateTime) {
        match outcome {
            PollOutcome::Fetched(payload) => self.apply(payload, now),
            PollOutcome::Failed { task, error } => {
                tracing::error!(%task, %error, "Poll failed");
                self.status.show_error(task.failure_message());
            }
            PollOutcome::Cancelled(task) => {
                tracing::debug!(%task, "Poll cancelled");
            }
        }
    }

    fn apply(&mut self, payload: Payload, now: NaiveDateTime) {
        match payload {
            Payload::Realtime(snapshot) => {
                self.renderer.render_realtime(&mut self.view, &snapshot, now);
                self.status.hide_loading();
                tracing::trace!(departments = snapshot.departments.len(), "Realtime rendered");
            }
            Payload::Prediction(prediction) => {
                self.renderer.render_prediction(&mut self.view, &prediction);
            }
            Payload::Totals(totals) => self.renderer.render_monthly(&mut self.view, &totals),
            Payload::Daily(totals) => self.renderer.render_daily(&mut self.view, &totals),
            Payload::Hourly(hourly) => {
                let latest = self.hourly.apply(&hourly);
                self.renderer.render_rooms(&mut self.view, &latest, None);
            }
            Payload::Pie(pie) => self.pie.apply(&pie),
        }
    }

    /// Switch the hourly chart to another unit without fetching
    pub fn select_unit(&mut self, unit: ChartUnit) {
        let latest = self.hourly.select(unit);
        self.renderer.render_rooms(&mut self.view, &latest, Some(unit));
        tracing::debug!(%unit, "Chart unit selected");
    }

    pub fn selected_unit(&self) -> ChartUnit {
        self.hourly.selected()
    }

    /// Raise the loading banner ahead of a forced refresh
    pub fn show_loading(&mut self) {
        self.status.show_loading();
    }

    /// Release the chart instances
    pub fn teardown(&mut self) {
        self.pie.teardown();
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn status(&self) -> &S {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut S {
        &mut self.status
    }
}
