//! Plain-text rendering of a `ViewModel` for the terminal.
//!
//! Colour slots from the projection are mapped to ANSI escapes through a
//! `Palette` picked from the active theme. `Palette::plain()` disables colour.

use std::fmt::Write;

use crate::projection::{BandColor, ScoreRow, TruncatedList, ViewModel};
use crate::theme::ThemePreference;

const BAR_WIDTH: usize = 24;
const LABEL_WIDTH: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    success: &'static str,
    warning: &'static str,
    error: &'static str,
    heading: &'static str,
    reset: &'static str,
}

impl Palette {
    pub fn for_theme(theme: ThemePreference) -> Self {
        match theme {
            // Bright variants read better on dark backgrounds.
            ThemePreference::Dark => Self {
                success: "\x1b[92m",
                warning: "\x1b[93m",
                error: "\x1b[91m",
                heading: "\x1b[1;97m",
                reset: "\x1b[0m",
            },
            ThemePreference::Light => Self {
                success: "\x1b[32m",
                warning: "\x1b[33m",
                error: "\x1b[31m",
                heading: "\x1b[1;30m",
                reset: "\x1b[0m",
            },
        }
    }

    pub fn plain() -> Self {
        Self {
            success: "",
            warning: "",
            error: "",
            heading: "",
            reset: "",
        }
    }

    fn color(&self, slot: BandColor) -> &'static str {
        match slot {
            BandColor::Success => self.success,
            BandColor::Warning => self.warning,
            BandColor::Error => self.error,
        }
    }

    fn paint(&self, code: &'static str, text: &str) -> String {
        if code.is_empty() {
            text.to_string()
        } else {
            format!("{code}{text}{}", self.reset)
        }
    }
}

pub fn render(view: &ViewModel, palette: &Palette) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, view, palette);
    out
}

fn write_report(out: &mut String, view: &ViewModel, p: &Palette) -> std::fmt::Result {
    let overall = &view.overall;
    writeln!(
        out,
        "{} {}  {}",
        p.paint(p.heading, "Overall match:"),
        p.paint(p.color(overall.color), &overall.display),
        p.paint(p.color(overall.color), overall.label),
    )?;
    writeln!(out, "{}", bar(overall.value / 100.0, p.color(overall.color), p))?;

    section(out, p, "Score breakdown")?;
    for row in &view.breakdown {
        score_row(out, row, p)?;
    }

    if let Some(message) = view.no_missing_keywords {
        section(out, p, "Missing keywords")?;
        writeln!(out, "  {}", p.paint(p.success, message))?;
    } else if !view.missing_keywords.items.is_empty() {
        section(out, p, "Missing keywords")?;
        for kw in &view.missing_keywords.items {
            if kw.high_priority {
                writeln!(
                    out,
                    "  {} {} ({})",
                    p.paint(p.error, "!"),
                    p.paint(p.error, &kw.text),
                    kw.importance
                )?;
            } else {
                writeln!(out, "    {} ({})", kw.text, kw.importance)?;
            }
        }
        overflow_line(out, &view.missing_keywords)?;
    }

    if !view.detected_keywords.items.is_empty() {
        section(out, p, "Detected keywords")?;
        writeln!(out, "  {}", view.detected_keywords.items.join(", "))?;
        overflow_line(out, &view.detected_keywords)?;
    }

    section(out, p, "Recommendations")?;
    if let Some(block) = &view.skill_gap {
        writeln!(out, "  {}", p.paint(p.heading, block.title))?;
        writeln!(out, "  {}", block.intro)?;
        writeln!(out, "    {}", block.keywords)?;
        if let Some(focus) = block.focus_high_priority {
            writeln!(out, "  {}", p.paint(p.warning, focus))?;
        }
        writeln!(out, "  {}", block.action)?;
        writeln!(out)?;
    }
    if let Some(block) = &view.semantic_alignment {
        writeln!(out, "  {}", p.paint(p.heading, block.title))?;
        writeln!(out, "  {}", block.summary)?;
        for action in &block.actions {
            writeln!(out, "    - {action}")?;
        }
        writeln!(out)?;
    }
    writeln!(out, "  {}", p.paint(p.heading, view.general_tips.title))?;
    writeln!(out, "  {}", view.general_tips.body)?;

    if !view.tips.is_empty() {
        section(out, p, "Improvement tips")?;
        for tip in &view.tips {
            let label = format!("[{}]", tip.priority_label);
            let label = if tip.urgent {
                p.paint(p.error, &label)
            } else {
                label
            };
            writeln!(out, "  {label} {}: {}", tip.category, tip.tip)?;
        }
    }

    Ok(())
}

fn section(out: &mut String, p: &Palette, title: &str) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{}", p.paint(p.heading, title))
}

fn score_row(out: &mut String, row: &ScoreRow, p: &Palette) -> std::fmt::Result {
    let code = p.color(row.color);
    writeln!(
        out,
        "  {:<width$}{} {}",
        row.label,
        bar(row.bar_fraction, code, p),
        p.paint(code, &row.display),
        width = LABEL_WIDTH,
    )
}

fn overflow_line<T>(out: &mut String, list: &TruncatedList<T>) -> std::fmt::Result {
    match &list.overflow {
        Some(overflow) => writeln!(out, "    {}", overflow.label),
        None => Ok(()),
    }
}

fn bar(fraction: f64, code: &'static str, p: &Palette) -> String {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (fraction * BAR_WIDTH as f64).round() as usize;
    let filled_part = "█".repeat(filled);
    let empty_part = "░".repeat(BAR_WIDTH - filled);
    format!("{}{}", p.paint(code, &filled_part), empty_part)
}
