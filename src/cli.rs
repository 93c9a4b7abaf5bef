use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use lifegrid::{Theme, ViewGranularity};

#[derive(Parser)]
#[command(name = "lifegrid")]
#[command(author, version, about = "Render a lifespan as a grid of weeks, months or years")]
pub struct Cli {
    /// Birth date (YYYY-MM-DD). Without it the grid has no past cells
    #[arg(long, env = "LIFEGRID_BIRTHDATE")]
    pub birthdate: Option<String>,

    /// Unit of one cell
    #[arg(long, value_enum, default_value_t = ViewGranularity::Weeks)]
    pub view: ViewGranularity,

    /// Lifespan override in years (1-120); defaults to 80
    #[arg(long, env = "LIFEGRID_LIFESPAN")]
    pub lifespan: Option<u32>,

    /// Group cells into life phases
    #[arg(long)]
    pub phases: bool,

    /// Mark cells that overlap historical events
    #[arg(long)]
    pub events: bool,

    /// Evaluate as of this date (YYYY-MM-DD) instead of the local date
    #[arg(long)]
    pub today: Option<String>,

    /// Only render this theme; both are rendered by default
    #[arg(long, value_enum)]
    pub theme: Option<Theme>,

    /// How event details are attached to cells
    #[arg(long, value_enum, default_value_t = TooltipStyle::Title)]
    pub tooltips: TooltipStyle,

    /// Directory the output files are written to
    #[arg(long, short, default_value = ".")]
    pub out_dir: PathBuf,

    /// Also write the grid model as JSON
    #[arg(long)]
    pub json: bool,

    /// Also export a fixed-size PNG snapshot per theme
    #[arg(long)]
    pub png: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TooltipStyle {
    /// SVG `<title>` elements
    Title,
    /// `data-tooltip` attributes holding an HTML fragment
    DataAttr,
}
