//! Renderers
//!
//! Map decoded payloads onto view slots. Renderers only ever write text or
//! progress widths; a slot the page does not have is skipped.

use chrono::NaiveDateTime;

use crate::config::DisplayConfig;
use crate::format;
use crate::model::{
    ChartUnit, CostPrediction, Department, DepartmentTotal, FooterMetric, Metric, PeriodTotals,
    Phase, RealtimeSnapshot, Summary,
};
use crate::view::{Slot, ViewSurface};

/// Formats payloads into a [`ViewSurface`] using display settings
#[derive(Debug, Clone)]
pub struct Renderer {
    currency: String,
    rooms: u32,
    daily_target_kwh: f64,
    monthly_target_kwh: f64,
}

impl Renderer {
    pub fn new(display: &DisplayConfig) -> Self {
        Self {
            currency: display.currency.clone(),
            rooms: display.rooms,
            daily_target_kwh: display.daily_target_kwh,
            monthly_target_kwh: display.monthly_target_kwh,
        }
    }

    /// Write one phase cell
    pub fn render_cell<V: ViewSurface + ?Sized>(
        &self,
        view: &mut V,
        dept: &str,
        phase: Phase,
        metric: Metric,
        value: f64,
    ) -> bool {
        view.set_text(
            &Slot::cell(dept, phase, metric),
            &format::format_metric(metric, value),
        )
    }

    /// Write every reported phase of a department plus its footer.
    ///
    /// Phases absent from the payload leave their cells untouched.
    pub fn render_department<V: ViewSurface + ?Sized>(&self, view: &mut V, dept: &Department) {
        for (phase, reading) in &dept.phases {
            for metric in Metric::ALL {
                self.render_cell(view, &dept.id, *phase, metric, reading.value(metric));
            }
        }

        if let Some(total) = &dept.total {
            self.render_footer(view, &dept.id, total);
        }
    }

    /// Write a department's energy and cost footers
    pub fn render_footer<V: ViewSurface + ?Sized>(
        &self,
        view: &mut V,
        dept: &str,
        total: &DepartmentTotal,
    ) {
        for (metric, value) in [
            (FooterMetric::TotalEnergy, total.total_energy),
            (FooterMetric::TotalCost, total.total_cost),
        ] {
            view.set_text(
                &Slot::footer(dept, metric),
                &format::format_footer(metric, value, &self.currency),
            );
        }
    }

    /// Write the month summary card
    pub fn render_summary<V: ViewSurface + ?Sized>(&self, view: &mut V, summary: &Summary) {
        view.set_text(
            &Slot::SummaryEnergy,
            &format!("{} kWh", format::format_grouped(summary.overall_energy, 1)),
        );
        view.set_text(
            &Slot::SummaryCost,
            &format::format_currency(summary.overall_cost, &self.currency),
        );
        view.set_text(
            &Slot::SummaryMonth,
            format::format_month(&summary.month).unwrap_or_default(),
        );
        view.set_text(&Slot::SummaryYear, &summary.year);
    }

    /// Write a full `/realtime` snapshot and stamp the update time
    pub fn render_realtime<V: ViewSurface + ?Sized>(
        &self,
        view: &mut V,
        snapshot: &RealtimeSnapshot,
        now: NaiveDateTime,
    ) {
        for dept in &snapshot.departments {
            self.render_department(view, dept);
        }

        if let Some(summary) = &snapshot.summary {
            self.render_summary(view, summary);
        }

        view.set_text(&Slot::LastUpdate, &format::format_last_update(now));
    }

    pub fn render_prediction<V: ViewSurface + ?Sized>(
        &self,
        view: &mut V,
        prediction: &CostPrediction,
    ) {
        view.set_text(
            &Slot::Prediction,
            &format::format_prediction(prediction.cost_pred),
        );
    }

    /// Month totals card and the monthly progress bar
    pub fn render_monthly<V: ViewSurface + ?Sized>(&self, view: &mut V, totals: &PeriodTotals) {
        view.set_text(
            &Slot::MonthlyEnergy,
            &format!("{:.2} kWh", totals.energy_kwh),
        );
        view.set_text(&Slot::MonthlyBill, &format::format_bill(totals.bill));

        let used = totals.energy_kwh;
        view.set_width(
            &Slot::MonthlyProgress,
            progress_percent(used, self.monthly_target_kwh),
        );
        view.set_text(
            &Slot::MonthlyProgressLabel,
            &format!("{:.2} kWh / {:.2} kWh", used, self.monthly_target_kwh),
        );
    }

    /// Day totals card and the per-room daily average bar
    pub fn render_daily<V: ViewSurface + ?Sized>(&self, view: &mut V, totals: &PeriodTotals) {
        view.set_text(&Slot::DailyEnergy, &format!("{:.2} kWh", totals.energy_kwh));
        view.set_text(&Slot::DailyBill, &format::format_bill(totals.bill));

        let average = totals.energy_kwh / self.rooms as f64;
        view.set_width(
            &Slot::DailyProgress,
            progress_percent(average, self.daily_target_kwh),
        );
        view.set_text(
            &Slot::DailyProgressLabel,
            &format!("{:.2} kWh / {:.2} kWh", average, self.daily_target_kwh),
        );
    }

    /// Latest value per room; unit labels only when the unit changed
    pub fn render_rooms<V: ViewSurface + ?Sized>(
        &self,
        view: &mut V,
        latest: &[Option<f64>],
        unit_label: Option<ChartUnit>,
    ) {
        for (room, point) in latest.iter().enumerate() {
            view.set_text(&Slot::RoomLatest(room), &format::format_latest(*point));
            if let Some(unit) = unit_label {
                view.set_text(&Slot::RoomUnit(room), unit.key());
            }
        }
    }
}

/// Share of `target` reached, clamped to 0..=100
pub fn progress_percent(value: f64, target: f64) -> f64 {
    if !(value.is_finite() && target > 0.0) {
        return 0.0;
    }
    (value / target * 100.0).clamp(0.0, 100.0)
}
