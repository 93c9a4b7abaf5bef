//! Hover detail for grid cells.
//!
//! Every cell gets a [`TooltipContent`]: a heading naming the unit ("Week 12")
//! and the events that fall inside the cell's range. A [`TooltipProvider`]
//! decides what of that ends up in the output and how.

use crate::events::HistoricalEvent;
use crate::svg::{SvgElement, escape_xml};

/// Text shown when hovering a cell: a heading, then one entry per matched event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    pub heading: String,
    pub entries: Vec<TooltipEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipEntry {
    pub title: String,
    pub date: String,
}

impl TooltipContent {
    pub fn for_unit(heading: String, events: &[HistoricalEvent]) -> Self {
        Self {
            heading,
            entries: events
                .iter()
                .map(|event| TooltipEntry {
                    title: event.title.to_string(),
                    date: event.long_date(),
                })
                .collect(),
        }
    }

    pub fn has_events(&self) -> bool {
        !self.entries.is_empty()
    }
}

pub trait TooltipProvider {
    fn attach(&self, element: &mut SvgElement, content: &TooltipContent);
}

/// Native SVG `<title>` children, shown by any SVG viewer. Every cell gets
/// one, events or not.
#[derive(Debug, Default, Clone, Copy)]
pub struct TitleTooltips;

impl TooltipProvider for TitleTooltips {
    fn attach(&self, element: &mut SvgElement, content: &TooltipContent) {
        let mut text = content.heading.clone();
        for entry in &content.entries {
            text.push_str(&format!("\n{} ({})", entry.title, entry.date));
        }
        element.push_child(format!("<title>{}</title>", escape_xml(&text)));
    }
}

/// HTML fragment in a `data-tooltip` attribute, for a page that wires up its
/// own tooltip widget. Only cells with events get one.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataAttributeTooltips;

impl TooltipProvider for DataAttributeTooltips {
    fn attach(&self, element: &mut SvgElement, content: &TooltipContent) {
        if !content.has_events() {
            return;
        }
        let html: String = content
            .entries
            .iter()
            .map(|entry| {
                format!(
                    r#"<div class="event-tooltip"><div class="event-title">{}</div><div class="event-date">{}</div></div>"#,
                    escape_xml(&entry.title),
                    escape_xml(&entry.date)
                )
            })
            .collect();
        element.attr("data-tooltip", html);
    }
}
