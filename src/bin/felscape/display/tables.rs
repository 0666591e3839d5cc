use std::io::{self, Write};

use felscape::{EnergyField, Landscape, RenderConfig, SampleSet};

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

/// Most rows in the ΔG distribution table.
const MAX_BANDS: usize = 8;

pub fn print_sample_summary(samples: &SampleSet) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let mut rows = vec![("Samples", format!("{}", samples.len()))];

    if let Some(bounds) = samples.bounds() {
        rows.push((
            "PC1 range",
            format!("{:.4} … {:.4}", bounds.x_min, bounds.x_max),
        ));
        rows.push((
            "PC2 range",
            format!("{:.4} … {:.4}", bounds.y_min, bounds.y_max),
        ));
    }

    print_kv_table(&mut out, "Sample Summary", &rows);
}

pub fn print_landscape_summary(landscape: &Landscape, config: &RenderConfig) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let Landscape { grid, energy, .. } = landscape;
    let (nx, ny) = energy.shape();
    let total = nx * ny;

    let mut rows = vec![
        ("Grid", format!("{nx} × {ny}")),
        ("Temperature", format!("{} K", config.temperature)),
        ("Ceiling", format!("{} kJ/mol", config.z_max)),
        (
            "Saturated",
            format!(
                "{} ({:.1}%)",
                energy.saturated_count(),
                percent(energy.saturated_count(), total)
            ),
        ),
    ];

    if let Some((i, j, _)) = energy.min_cell() {
        let (x, y) = grid.center(i, j);
        rows.push(("Minimum at", format!("({x:.4}, {y:.4})")));
    }

    print_kv_table(&mut out, "Landscape Summary", &rows);
    print_distribution_table(&mut out, "ΔG Distribution", &energy_bands(energy), total);
}

/// Counts cells per ΔG band; saturated cells get their own row.
fn energy_bands(energy: &EnergyField) -> Vec<(String, usize)> {
    let z_max = energy.z_max();
    let width = (z_max / MAX_BANDS as f64).ceil().max(1.0);
    let count = (z_max / width).ceil() as usize;

    let mut bands: Vec<(String, usize)> = (0..count)
        .map(|k| {
            let lo = k as f64 * width;
            let hi = (lo + width).min(z_max);
            (format!("{lo}–{hi}"), 0)
        })
        .collect();
    let mut saturated = 0;

    let (nx, ny) = energy.shape();
    for i in 0..nx {
        for j in 0..ny {
            if energy.is_saturated(i, j) {
                saturated += 1;
                continue;
            }
            let k = ((energy.value(i, j) / width) as usize).min(count - 1);
            bands[k].1 += 1;
        }
    }

    bands.push((format!("> {z_max}"), saturated));
    bands
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn print_distribution_table(
    out: &mut impl Write,
    title: &str,
    data: &[(String, usize)],
    total: usize,
) {
    let name_w = 10usize;
    let count_w = 8usize;
    let sep_overhead = 6;
    let dist_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + count_w + sep_overhead);
    let max_bar_width = dist_w.saturating_sub(8).min(20);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{name_line}┬{count_line}┬{dist_line}┐",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
        INDENT,
        "kJ/mol",
        "Cells",
        "Share",
    );
    let _ = writeln!(
        out,
        "{}├{name_line}┼{count_line}┼{dist_line}┤",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );

    for (name, count) in data {
        let pct = percent(*count, total);
        let bar = make_bar(pct, max_bar_width);
        let dist_cell = format!("{}  {:>5.1}%", bar, pct);
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            INDENT,
            truncate(name, name_w),
            count,
            dist_cell,
        );
    }

    let _ = writeln!(
        out,
        "{}└{name_line}┴{count_line}┴{dist_line}┘",
        INDENT,
        name_line = "─".repeat(name_w + 2),
        count_line = "─".repeat(count_w + 2),
        dist_line = "─".repeat(dist_w + 2)
    );
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{k_line}┬{v_line}┐",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<key_w$} │ {:>val_w$} │",
        INDENT, "Metric", "Value",
    );
    let _ = writeln!(
        out,
        "{}├{k_line}┼{v_line}┤",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }

    let _ = writeln!(
        out,
        "{}└{k_line}┴{v_line}┘",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
}

fn make_bar(pct: f64, max_width: usize) -> String {
    let filled = ((pct / 100.0) * max_width as f64).round() as usize;
    let empty = max_width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}
