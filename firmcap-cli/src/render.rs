//! Plain-text rendering of engine reports.

use firmcap_core::{fmt_pct, Bottleneck, BucketId, ChargeCodeHours, LiveCapacityReport, SimulationReport, WeekHours};
use std::fmt::Write;

fn opt<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "N/A".to_string())
}

fn bottleneck_line(b: Option<&Bottleneck>) -> String {
    match b {
        Some(b) if b.is_tie() => format!("{b} (tie)"),
        Some(b) => b.to_string(),
        None => "N/A".to_string(),
    }
}

pub fn live(report: &LiveCapacityReport) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "# Live capacity\n");
    let _ = writeln!(
        s,
        "Window: {} .. {}\n",
        report.window.start.format("%Y-%m-%d %H:%M"),
        report.window.end.format("%Y-%m-%d %H:%M")
    );

    for b in &report.buckets {
        let snap = &b.snapshot;
        let _ = writeln!(
            s,
            "- {:<9} actual={:>7.1}h capacity={:>7.1}h utilization={:>7} target={:.0}% [{}]",
            snap.bucket.label(),
            snap.hours,
            snap.total_capacity_hours,
            fmt_pct(snap.utilization_pct),
            snap.target_utilization_pct,
            b.status
        );
    }

    let _ = writeln!(
        s,
        "\nLogged: {:.2}h across buckets ({} entries outside any bucket)",
        report.total_actual_hours, report.actuals.unmapped_entries
    );
    let _ = writeln!(s, "Firm utilization: {}", fmt_pct(report.firm_utilization_pct));
    let _ = writeln!(s, "Bottleneck: {}", bottleneck_line(report.bottleneck.as_ref()));
    let _ = writeln!(s, "Status: {}", report.status);
    s
}

pub fn simulation(report: &SimulationReport) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "# Capacity simulation ({} active clients)\n", report.active_clients);

    for b in &report.buckets {
        let snap = &b.snapshot;
        let _ = writeln!(
            s,
            "- {:<9} required={:>7.1}h capacity={:>7.1}h utilization={:>7} max_clients={} open={} hires_needed={} [{}]",
            snap.bucket.label(),
            snap.hours,
            snap.total_capacity_hours,
            fmt_pct(snap.utilization_pct),
            opt(b.max_clients),
            opt(b.open_capacity),
            opt(b.hires_needed),
            b.status
        );
    }

    let _ = writeln!(s, "\nFirm utilization: {}", fmt_pct(report.firm_utilization_pct));
    let _ = writeln!(s, "Bottleneck: {}", bottleneck_line(report.bottleneck.as_ref()));
    let _ = writeln!(s, "Status: {}", report.status);
    let _ = writeln!(
        s,
        "Max clients: {} (open capacity: {})",
        opt(report.firm_max_clients),
        opt(report.firm_open_capacity)
    );

    let f = &report.financials;
    let _ = writeln!(
        s,
        "Monthly: revenue=${:.0} staff=${:.0} margin=${:.0} ({})",
        f.revenue,
        f.staff_cost,
        f.operating_margin,
        fmt_pct(f.margin_pct)
    );

    let _ = writeln!(s, "\n## Projection\n");
    for (i, (period, status)) in report.projected_status.iter().enumerate() {
        let clients = report
            .projections
            .first()
            .and_then(|p| p.points.get(i))
            .map(|p| p.projected_client_count);
        let utils: Vec<String> = report
            .projections
            .iter()
            .filter_map(|p| {
                p.points
                    .get(i)
                    .map(|pt| format!("{}={}", p.bucket.label(), fmt_pct(pt.utilization_pct())))
            })
            .collect();
        let _ = writeln!(
            s,
            "Month {:>2}: clients={:<5} {} [{}]",
            period,
            opt(clients),
            utils.join(" "),
            status
        );
    }

    match report.first_breach {
        Some((period, bucket)) => {
            let _ = writeln!(s, "\nFirst breach: month {} ({})", period, bucket);
        }
        None => {
            let _ = writeln!(s, "\nNo capacity breach within the horizon.");
        }
    }
    s
}

pub fn trend(weeks: &[WeekHours]) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "# Weekly hours\n");
    let _ = writeln!(s, "{:<12} {:>9} {:>9} {:>9} {:>9}", "week", "advisors", "support", "tax", "total");
    for w in weeks {
        let _ = writeln!(
            s,
            "{:<12} {:>9.2} {:>9.2} {:>9.2} {:>9.2}",
            w.week_start.format("%Y-%m-%d").to_string(),
            w.hours.hours_for(BucketId::Advisors),
            w.hours.hours_for(BucketId::Support),
            w.hours.hours_for(BucketId::Tax),
            w.hours.total_hours()
        );
    }
    s
}

pub fn charge_codes(rows: &[ChargeCodeHours], limit: usize) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "# Hours by charge code\n");
    for r in rows.iter().take(limit) {
        let label = if r.charge_code.is_empty() { "(none)" } else { r.charge_code.as_str() };
        let _ = writeln!(s, "- {:<28} {:>8.2}h  entries={}", label, r.hours, r.entry_count);
    }
    if rows.len() > limit {
        let _ = writeln!(s, "... {} more", rows.len() - limit);
    }
    s
}
