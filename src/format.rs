//! Display formatting
//!
//! Phase cells use a plain decimal point with a fixed number of places.
//! Everything shown in Indonesian locale (summary card, currency, totals)
//! groups thousands with `.` and separates decimals with `,`.

use chrono::NaiveDateTime;

use crate::model::{FooterMetric, Metric};

/// Separator between the currency symbol and the amount in id-ID
pub const NBSP: char = '\u{a0}';

/// Placeholder for a widget with no data
pub const NO_VALUE: &str = "--";

/// Text for a phase cell: `12.3 V`, `1.23 A`, `4.5 kW`, `1.2346 kWh`
pub fn format_metric(metric: Metric, value: f64) -> String {
    match metric {
        Metric::Voltage => format!("{:.1} V", value),
        Metric::Current => format!("{:.2} A", value),
        Metric::Power => format!("{:.1} kW", value),
        Metric::Energy => format!("{:.4} kWh", value),
    }
}

/// Text for a department footer
pub fn format_footer(metric: FooterMetric, value: f64, currency: &str) -> String {
    match metric {
        FooterMetric::TotalEnergy => format!("{:.3} kWh", value),
        FooterMetric::TotalCost => format_currency(value, currency),
    }
}

/// id-ID number with exactly `decimals` places: `1.234.567,8`
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    let fixed = format!("{:.*}", decimals, rounded.abs());

    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac_part) = frac_part {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

/// id-ID number with up to `max_decimals` places, trailing zeros dropped
pub fn format_grouped_max(value: f64, max_decimals: usize) -> String {
    let text = format_grouped(value, max_decimals);
    if !text.contains(',') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches(',').to_string()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Currency amount without decimals: `Rp 150.000` for IDR
pub fn format_currency(amount: f64, code: &str) -> String {
    let amount = format_grouped(amount, 0);
    let symbol = match code {
        "IDR" => "Rp",
        "USD" => "US$",
        "EUR" => "€",
        other => other,
    };
    match amount.strip_prefix('-') {
        Some(magnitude) => format!("-{}{}{}", symbol, NBSP, magnitude),
        None => format!("{}{}{}", symbol, NBSP, amount),
    }
}

/// Bill text used by the totals cards: `Rp 17.828`
pub fn format_bill(amount: f64) -> String {
    format!("Rp {}", format_grouped_max(amount, 3))
}

/// Predicted cost: `Rp 250.000,5`
pub fn format_prediction(amount: f64) -> String {
    format!("Rp {}", format_grouped(amount, 1))
}

/// English month name to Indonesian, `None` for anything else
pub fn format_month(month: &str) -> Option<&'static str> {
    let name = match month {
        "January" => "Januari",
        "February" => "Februari",
        "March" => "Maret",
        "April" => "April",
        "May" => "Mei",
        "June" => "Juni",
        "July" => "Juli",
        "August" => "Agustus",
        "September" => "September",
        "October" => "Oktober",
        "November" => "November",
        "December" => "Desember",
        _ => return None,
    };
    Some(name)
}

/// Footer stamp after a successful live refresh
pub fn format_last_update(at: NaiveDateTime) -> String {
    format!("Terakhir update: {}", at.format("%-d/%-m/%Y, %H.%M.%S"))
}

/// Latest point of a series for the room widgets
pub fn format_latest(point: Option<f64>) -> String {
    match point {
        Some(value) => value.to_string(),
        None => NO_VALUE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_metric_formatting() {
        assert_eq!(format_metric(Metric::Voltage, 12.34), "12.3 V");
        assert_eq!(format_metric(Metric::Current, 1.234), "1.23 A");
        assert_eq!(format_metric(Metric::Power, 4.5), "4.5 kW");
        assert_eq!(format_metric(Metric::Energy, 1.23456), "1.2346 kWh");
        assert_eq!(format_metric(Metric::Voltage, 0.0), "0.0 V");
    }

    #[test]
    fn test_footer_formatting() {
        assert_eq!(format_footer(FooterMetric::TotalEnergy, 28.75, "IDR"), "28.750 kWh");
        assert_eq!(
            format_footer(FooterMetric::TotalCost, 41535.4, "IDR"),
            "Rp\u{a0}41.535"
        );
    }

    #[test]
    fn test_currency_formatting() {
        assert_eq!(format_currency(150000.0, "IDR"), "Rp\u{a0}150.000");
        assert_eq!(format_currency(0.0, "IDR"), "Rp\u{a0}0");
        assert_eq!(format_currency(999.5, "IDR"), "Rp\u{a0}1.000");
        assert_eq!(format_currency(-2500.0, "IDR"), "-Rp\u{a0}2.500");
        assert_eq!(format_currency(1234567.0, "SGD"), "SGD\u{a0}1.234.567");
    }

    #[test]
    fn test_grouped_formatting() {
        assert_eq!(format_grouped(1234567.89, 1), "1.234.567,9");
        assert_eq!(format_grouped(12.0, 1), "12,0");
        assert_eq!(format_grouped(999.0, 0), "999");
        assert_eq!(format_grouped(-0.01, 1), "0,0");
        assert_eq!(format_grouped(f64::NAN, 1), "0,0");
        assert_eq!(format_grouped_max(17828.0, 3), "17.828");
        assert_eq!(format_grouped_max(1234.5, 3), "1.234,5");
    }

    #[test]
    fn test_bill_and_prediction() {
        assert_eq!(format_bill(17828.0), "Rp 17.828");
        assert_eq!(format_prediction(250000.5), "Rp 250.000,5");
        assert_eq!(format_prediction(0.0), "Rp 0,0");
    }

    #[test]
    fn test_month_names() {
        assert_eq!(format_month("March"), Some("Maret"));
        assert_eq!(format_month("August"), Some("Agustus"));
        assert_eq!(format_month("December"), Some("Desember"));
        assert_eq!(format_month("march"), None);
        assert_eq!(format_month(""), None);
    }

    #[test]
    fn test_last_update_stamp() {
        let at = NaiveDate::from_ymd_opt(2026, 3, 5)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        assert_eq!(format_last_update(at), "Terakhir update: 5/3/2026, 14.05.09");
    }

    #[test]
    fn test_latest_point() {
        assert_eq!(format_latest(Some(1.5)), "1.5");
        assert_eq!(format_latest(Some(2.0)), "2");
        assert_eq!(format_latest(None), "--");
    }
}
