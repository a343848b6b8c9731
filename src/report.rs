use crate::aggregate::{Aggregation, Grouped, Selector};
use crate::types::TransferRecord;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write;

pub const INSUFFICIENT_SELECTION: &str = "Please select a specific Season or a specific Team to view the data.";

/// `EUR 1,234,567.50`: two decimals, comma thousands separators.
pub fn format_eur(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("EUR {}{}.{}", sign, grouped, frac)
}

fn label(selector: &Selector, all: &str) -> String {
    selector.specific().unwrap_or(all).to_string()
}

/// Plain-text rendering of an aggregation, with a title in the style of the chart it replaces.
pub fn render_aggregation(result: &Aggregation, season: &Selector, team: &Selector) -> String {
    match result {
        Aggregation::InsufficientSelection => INSUFFICIENT_SELECTION.to_string(),
        Aggregation::BySeason(grouped) => {
            let title = format!("Total Transfer Fees by Season for {}", label(team, "All Teams"));
            render_grouped(&title, "Season", grouped)
        }
        Aggregation::ByTeam(grouped) => {
            let title = format!("Total Transfer Fees for Teams in {}", label(season, "All Seasons"));
            render_grouped(&title, "Team", grouped)
        }
        Aggregation::Total(total) => format!(
            "Total Transfer Fees for {} in {}: {}",
            label(team, "All Teams"),
            label(season, "All Seasons"),
            format_eur(*total)
        ),
    }
}

pub fn render_grouped(title: &str, key_header: &str, grouped: &Grouped) -> String {
    let rows: Vec<Vec<String>> = grouped
        .entries()
        .iter()
        .map(|(key, sum)| vec![key.clone(), format_eur(*sum)])
        .collect();
    let mut out = format!("{}\n", title);
    if rows.is_empty() {
        out.push_str("No transfers with a known fee match this selection.\n");
        return out;
    }
    out.push_str(&render_table(&[key_header, "Total Transfer Fees (EUR)"], &rows));
    out
}

pub fn render_records(records: &[TransferRecord]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.season.clone(),
                r.from_club.clone(),
                r.to_club.clone(),
                r.fee.map(format_eur).unwrap_or_else(|| "-".to_string()),
                r.player_id.clone(),
                r.player_name.clone(),
            ]
        })
        .collect();
    render_table(&["Season", "From", "To", "Fee", "Player ID", "Player"], &rows)
}

/// Left-aligned fixed-width table.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let line = |out: &mut String, cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        let _ = writeln!(out, "{}", padded.join("  ").trim_end());
    };

    line(&mut out, headers.to_vec());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    line(&mut out, rule.iter().map(|s| s.as_str()).collect());
    for row in rows {
        line(&mut out, row.iter().map(|s| s.as_str()).collect());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_eur() {
        assert_eq!(format_eur(Decimal::from(100)), "EUR 100.00");
        assert_eq!(format_eur(Decimal::from(1_234_567)), "EUR 1,234,567.00");
        assert_eq!(format_eur(Decimal::from_str("999.995").unwrap()), "EUR 1,000.00");
        assert_eq!(format_eur(Decimal::from_str("-1500.5").unwrap()), "EUR -1,500.50");
        assert_eq!(format_eur(Decimal::ZERO), "EUR 0.00");
    }

    #[test]
    fn test_render_total() {
        let season = Selector::Specific("10/11".into());
        let team = Selector::Specific("X".into());
        let text = render_aggregation(&Aggregation::Total(Decimal::from(100)), &season, &team);
        assert_eq!(text, "Total Transfer Fees for X in 10/11: EUR 100.00");
    }

    #[test]
    fn test_render_insufficient() {
        let text = render_aggregation(&Aggregation::InsufficientSelection, &Selector::All, &Selector::All);
        assert_eq!(text, INSUFFICIENT_SELECTION);
    }

    #[test]
    fn test_render_grouped_table() {
        let mut grouped = Grouped::default();
        grouped.add("Real Madrid", Decimal::from(100));
        grouped.add("Ajax", Decimal::from(2_000));
        let text = render_grouped("Title", "Team", &grouped);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Title");
        assert_eq!(lines[1], "Team         Total Transfer Fees (EUR)");
        assert_eq!(lines[3], "Real Madrid  EUR 100.00");
        assert_eq!(lines[4], "Ajax         EUR 2,000.00");
    }
}
