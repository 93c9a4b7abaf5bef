mod cli;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use cli::{Cli, TooltipStyle};
use lifegrid::config::{self, GridInputs};
use lifegrid::export::{self, PngExporter};
use lifegrid::svg::{self, Theme};
use lifegrid::{DEFAULT_PHASES, DataAttributeTooltips, TitleTooltips, TooltipProvider};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let today = match cli.today.as_deref() {
        Some(raw) => config::parse_date(raw)?,
        None => Local::now().date_naive(),
    };

    let request = GridInputs {
        birth_date: cli.birthdate.clone(),
        lifespan_years: cli.lifespan,
        granularity: Some(cli.view),
        show_phases: cli.phases,
        show_events: cli.events,
    }
    .into_request(today)?;

    let events = lifegrid::default_events();
    let model = lifegrid::build(&request, &DEFAULT_PHASES, &events);

    tokio::fs::create_dir_all(&cli.out_dir)
        .await
        .with_context(|| format!("Failed to create {}", cli.out_dir.display()))?;

    let mut written = Vec::new();

    if cli.json {
        let path = cli.out_dir.join("lifegrid.json");
        let json = serde_json::to_string_pretty(&model).context("Failed to serialize grid model")?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }

    let tooltips: &dyn TooltipProvider = match cli.tooltips {
        TooltipStyle::Title => &TitleTooltips,
        TooltipStyle::DataAttr => &DataAttributeTooltips,
    };

    let themes = match cli.theme {
        Some(theme) => vec![theme],
        None => vec![Theme::Dark, Theme::Light],
    };

    for theme in themes {
        let name = match theme {
            Theme::Dark => "dark_mode",
            Theme::Light => "light_mode",
        };
        let layout = svg::layout(&model, today, theme);

        let svg_path = cli.out_dir.join(format!("{name}.svg"));
        tokio::fs::write(&svg_path, svg::render_svg(&layout, tooltips))
            .await
            .with_context(|| format!("Failed to write {}", svg_path.display()))?;
        info!(path = %svg_path.display(), ?theme, "wrote svg");
        written.push(svg_path);

        if cli.png {
            let png_path = cli.out_dir.join(format!("{name}.png"));
            export::export_to_file(&PngExporter, &layout, &png_path).await?;
            written.push(png_path);
        }
    }

    let names: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
    println!("Generated {} successfully.", names.join(", "));

    Ok(())
}
