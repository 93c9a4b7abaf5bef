//! Renders a [`GridModel`] to SVG.
//!
//! Rendering is two steps: [`layout`] places every cell, phase separator and
//! header line in pixel space ([`GridLayout`]), then [`render_svg`] serializes
//! that layout. The PNG exporter rasterizes the same layout, so both outputs
//! agree on geometry and colors.

use chrono::NaiveDate;
use tracing::debug;

use crate::date_math::{ViewGranularity, age_string};
use crate::grid::GridModel;
use crate::tooltip::{TooltipContent, TooltipProvider};

const START_Y: f32 = 30.0;
const LINE_HEIGHT: f32 = 20.0;
const LEFT_PADDING: f32 = 15.0;
const RIGHT_PADDING: f32 = 30.0;
const BOTTOM_PADDING: f32 = 20.0;
const CHAR_WIDTH: f32 = 9.6;
const CELL_SIZE: f32 = 10.0;
const CELL_GAP: f32 = 2.0;
const GROUP_GAP: f32 = 8.0;
const SWATCH_SIZE: f32 = 12.0;
const MIN_HEADER_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub bg: &'static str,
    pub text: &'static str,
    pub key: &'static str,
    pub value: &'static str,
    pub cc: &'static str,
    pub past: &'static str,
    pub future: &'static str,
    pub event: &'static str,
}

impl Theme {
    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Dark => ThemeColors {
                bg: "#161b22",
                text: "#c9d1d9",
                key: "#ffa657",
                value: "#a5d6ff",
                cc: "#616e7f",
                past: "#c9d1d9",
                future: "#30363d",
                event: "#f85149",
            },
            Theme::Light => ThemeColors {
                bg: "#ffffff",
                text: "#24292f",
                key: "#d73a49",
                value: "#0366d6",
                cc: "#6a737d",
                past: "#24292f",
                future: "#eaeef2",
                event: "#d73a49",
            },
        }
    }

    /// Fill for a future cell in the phase with `class_name`.
    pub fn phase_fill(self, class_name: &str) -> &'static str {
        let dark = matches!(self, Theme::Dark);
        match class_name {
            "phase-childhood" => if dark { "#1f4a3a" } else { "#c6f1d6" },
            "phase-adolescence" => if dark { "#1d3f5e" } else { "#cfe6fb" },
            "phase-early-adulthood" => if dark { "#4a3b1a" } else { "#fbe7b5" },
            "phase-middle-age" => if dark { "#4b2a47" } else { "#f1d3ee" },
            "phase-late-adulthood" => if dark { "#4d2626" } else { "#f8d0cc" },
            _ => self.colors().future,
        }
    }
}

/// Cells per row for each granularity.
pub fn columns(granularity: ViewGranularity) -> usize {
    match granularity {
        ViewGranularity::Weeks => 52,
        ViewGranularity::Months => 12,
        ViewGranularity::Years => 10,
    }
}

/// One positioned grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellBox {
    pub index: u32,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub fill: &'static str,
    pub stroke: Option<&'static str>,
    pub classes: Vec<&'static str>,
    pub tooltip: TooltipContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Key,
    Value,
    Muted,
}

/// A positioned run of text; lines are made of several spans.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x: f32,
    pub y: f32,
    pub spans: Vec<(TextStyle, String)>,
    /// Color square drawn left of the text (phase separators and legend rows).
    pub swatch: Option<&'static str>,
}

/// Square in layout space: `x`, `y`, side length and fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swatch {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub fill: &'static str,
}

impl TextLine {
    /// Where the swatch sits, aligned with the text baseline at `y`.
    pub fn swatch_box(&self) -> Option<Swatch> {
        self.swatch.map(|fill| Swatch {
            x: LEFT_PADDING,
            y: self.y - SWATCH_SIZE + 2.0,
            size: SWATCH_SIZE,
            fill,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub width: f32,
    pub height: f32,
    pub colors: ThemeColors,
    pub lines: Vec<TextLine>,
    pub cells: Vec<CellBox>,
}

/// Escapes text for element content and double-quoted attribute values.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn build_stat_row(key: &str, value: &str, align_width: usize) -> (String, String, String) {
    let key_part = format!("{key}: ");
    let base_len = key_part.len() + value.len();
    let available = align_width.saturating_sub(base_len);

    let dots = match available {
        0 => "".to_string(),
        1 => " ".to_string(),
        2 => ". ".to_string(),
        n => ".".repeat(n),
    };

    (key_part, dots, value.to_string())
}

fn header_rows(model: &GridModel, today: NaiveDate) -> Vec<(&'static str, String)> {
    let unit = model.granularity.unit_label().to_lowercase();
    let mut rows = vec![
        ("View", format!("{}s", model.granularity.unit_label())),
        ("Lifespan", format!("{} years", model.lifespan_years)),
        (
            "Passed",
            format!("{} / {} {unit}s", model.units_passed, model.total_units()),
        ),
    ];
    if let Some(birth) = model.birth_date {
        rows.push(("Born", birth.format("%Y-%m-%d").to_string()));
        rows.push(("Age", age_string(birth, today)));
    }
    rows
}

/// Places every element of `model` in pixel space.
pub fn layout(model: &GridModel, today: NaiveDate, theme: Theme) -> GridLayout {
    let colors = theme.colors();
    let columns = columns(model.granularity);
    let mut lines = Vec::new();

    let rows = header_rows(model, today);
    let align_width = rows
        .iter()
        .map(|(k, v)| k.len() + 2 + v.len())
        .max()
        .unwrap_or(0)
        .max(MIN_HEADER_CHARS);

    let mut y = START_Y;
    for (key, value) in &rows {
        let (k, dots, v) = build_stat_row(key, value, align_width);
        lines.push(TextLine {
            x: LEFT_PADDING,
            y,
            spans: vec![
                (TextStyle::Key, k),
                (TextStyle::Muted, dots),
                (TextStyle::Value, v),
            ],
            swatch: None,
        });
        y += LINE_HEIGHT;
    }

    let pitch = CELL_SIZE + CELL_GAP;
    let groups = model.phase_groups();
    let mut cells = Vec::with_capacity(model.total_units());
    for group in &groups {
        if let Some(phase) = group.phase {
            y += LINE_HEIGHT;
            lines.push(TextLine {
                x: LEFT_PADDING + SWATCH_SIZE + 6.0,
                y,
                spans: vec![
                    (TextStyle::Key, phase.name.to_string()),
                    (TextStyle::Muted, format!("  {}", phase.duration_label())),
                ],
                swatch: Some(theme.phase_fill(phase.class_name)),
            });
            y += GROUP_GAP;
        }

        for (i, unit) in group.units.iter().enumerate() {
            let col = (i % columns) as f32;
            let row = (i / columns) as f32;

            let mut classes = vec!["cell"];
            if let Some(phase) = &unit.phase {
                classes.push(phase.class_name);
            }
            if unit.is_past {
                classes.push("past");
            }
            let tooltip = TooltipContent::for_unit(
                format!("{} {}", model.granularity.unit_label(), unit.index + 1),
                &unit.matched_events,
            );
            let has_events = tooltip.has_events();
            if has_events {
                classes.push("event");
            }

            let fill = match (&unit.phase, unit.is_past) {
                (_, true) => colors.past,
                (Some(phase), false) => theme.phase_fill(phase.class_name),
                (None, false) => colors.future,
            };

            cells.push(CellBox {
                index: unit.index,
                x: LEFT_PADDING + col * pitch,
                y: y + row * pitch,
                size: CELL_SIZE,
                fill,
                stroke: has_events.then_some(colors.event),
                classes,
                tooltip,
            });
        }

        let group_rows = group.units.len().div_ceil(columns) as f32;
        y += group_rows * pitch + GROUP_GAP;
    }

    if model.show_phases {
        y += LINE_HEIGHT;
        for phase in groups.iter().filter_map(|g| g.phase) {
            lines.push(TextLine {
                x: LEFT_PADDING + SWATCH_SIZE + 6.0,
                y,
                spans: vec![
                    (TextStyle::Value, phase.name.to_string()),
                    (TextStyle::Muted, format!("  {}", phase.duration_label())),
                ],
                swatch: Some(theme.phase_fill(phase.class_name)),
            });
            y += LINE_HEIGHT;
        }
    }

    let grid_width = LEFT_PADDING * 2.0 + columns as f32 * pitch;
    let text_width = LEFT_PADDING + align_width as f32 * CHAR_WIDTH + RIGHT_PADDING;
    let width = grid_width.max(text_width);
    let height = y + BOTTOM_PADDING;

    debug!(width, height, cells = cells.len(), "laid out grid");

    GridLayout {
        width,
        height,
        colors,
        lines,
        cells,
    }
}

/// Element under construction; tooltip providers decorate cells through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgElement {
    tag: &'static str,
    attrs: Vec<(String, String)>,
    children: Vec<String>,
}

impl SvgElement {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&mut self, name: &str, value: impl ToString) -> &mut Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    /// Appends already-escaped markup.
    pub fn push_child(&mut self, markup: String) -> &mut Self {
        self.children.push(markup);
        self
    }

    pub fn to_markup(&self) -> String {
        let mut out = format!("<{}", self.tag);
        for (name, value) in &self.attrs {
            out.push_str(&format!(" {name}=\"{}\"", escape_xml(value)));
        }
        if self.children.is_empty() {
            out.push_str("/>");
        } else {
            out.push('>');
            for child in &self.children {
                out.push_str(child);
            }
            out.push_str(&format!("</{}>", self.tag));
        }
        out
    }
}

fn text_class(style: TextStyle) -> &'static str {
    match style {
        TextStyle::Key => "key",
        TextStyle::Value => "value",
        TextStyle::Muted => "cc",
    }
}

fn cell_element(cell: &CellBox, tooltips: &dyn TooltipProvider) -> SvgElement {
    let mut rect = SvgElement::new("rect");
    rect.attr("x", cell.x)
        .attr("y", cell.y)
        .attr("width", cell.size)
        .attr("height", cell.size)
        .attr("rx", 2)
        .attr("fill", cell.fill)
        .attr("class", cell.classes.join(" "))
        .attr("data-index", cell.index);
    if let Some(stroke) = cell.stroke {
        rect.attr("stroke", stroke).attr("stroke-width", 1.5);
    }
    tooltips.attach(&mut rect, &cell.tooltip);
    rect
}

/// Main SVG generation function
pub fn render_svg(layout: &GridLayout, tooltips: &dyn TooltipProvider) -> String {
    let colors = layout.colors;

    let mut text = String::new();
    let mut swatches = String::new();
    for line in &layout.lines {
        text.push_str(&format!(r#"<tspan x="{}" y="{}">"#, line.x, line.y));
        for (style, content) in &line.spans {
            text.push_str(&format!(
                r#"<tspan class="{}">{}</tspan>"#,
                text_class(*style),
                escape_xml(content)
            ));
        }
        text.push_str("</tspan>\n");

        if let Some(swatch) = line.swatch_box() {
            swatches.push_str(&format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{size}\" height=\"{size}\" rx=\"2\" fill=\"{}\"/>\n",
                swatch.x,
                swatch.y,
                swatch.fill,
                size = swatch.size
            ));
        }
    }

    let mut grid = String::new();
    for cell in &layout.cells {
        grid.push_str(&cell_element(cell, tooltips).to_markup());
        grid.push('\n');
    }

    format!(
        r#"<?xml version='1.0' encoding='UTF-8'?>
<svg xmlns="http://www.w3.org/2000/svg"
     width="{w}px" height="{h}px"
     font-family="ConsolasFallback,Consolas,monospace"
     font-size="16px">

<style>
.key   {{ fill: {key}; }}
.value {{ fill: {value}; }}
.cc    {{ fill: {cc}; }}
.event {{ cursor: pointer; }}
</style>

<rect width="{w}px" height="{h}px" fill="{bg}" rx="15"/>

<text fill="{text}" xml:space="preserve">
{lines}</text>

{swatches}
<g class="grid">
{grid}</g>

</svg>
"#,
        w = layout.width,
        h = layout.height,
        bg = colors.bg,
        text = colors.text,
        key = colors.key,
        value = colors.value,
        cc = colors.cc,
        lines = text,
        swatches = swatches,
        grid = grid
    )
}
