//! # Ridge
//!
//! Command-line front end for the desktop core: builds a desktop from a
//! description, applies stacking and focus requests, and reports the
//! resulting stack and hit-test results.

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use serde::Serialize;

use ridge::view::{Direction, ViewId};
use ridge::{logging, Desktop, DesktopLayout, HitTest, RidgeConfig};

#[derive(Parser)]
#[command(name = "ridge")]
#[command(about = "View stacking, focus and hit-testing core for a stacking desktop shell")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "~/.config/ridge/ridge.toml")]
    config: String,

    /// Desktop description to build (TOML)
    #[arg(short, long)]
    layout: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Focus and raise a view
    #[arg(long, value_name = "ID")]
    focus: Option<u32>,

    /// Raise a view together with its transient group
    #[arg(long, value_name = "ID")]
    raise: Option<u32>,

    /// Lower a view to the back
    #[arg(long, value_name = "ID")]
    lower: Option<u32>,

    /// Switch to the next (forward) or previous (backward) window
    #[arg(long, value_name = "DIRECTION")]
    cycle: Option<Direction>,

    /// Resolve a point, given as X,Y in layout coordinates
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    hit: Option<(f64, f64)>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {:?}", s))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("bad X: {}", e))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("bad Y: {}", e))?;
    Ok((x, y))
}

#[derive(Serialize)]
struct ViewReport {
    id: ViewId,
    title: String,
    mapped: bool,
    minimized: bool,
    activated: bool,
    focusable: bool,
}

#[derive(Serialize)]
struct Report {
    stack: Vec<ViewReport>,
    focused: Option<ViewId>,
    cycled_to: Option<ViewId>,
    hit: Option<HitTest>,
}

impl Report {
    fn collect(desktop: &Desktop, cycled_to: Option<ViewId>, hit: Option<HitTest>) -> Self {
        let stack = desktop
            .views()
            .iter()
            .map(|v| ViewReport {
                id: v.id(),
                title: v.title().to_string(),
                mapped: v.is_mapped(),
                minimized: v.is_minimized(),
                activated: v.is_activated(),
                focusable: v.is_focusable(),
            })
            .collect();
        Self {
            stack,
            focused: desktop.focused_view(),
            cycled_to,
            hit,
        }
    }

    fn print_text(&self) {
        println!("Stack (front to back):");
        for (i, view) in self.stack.iter().enumerate() {
            let mut flags = Vec::new();
            if view.mapped {
                flags.push("mapped");
            }
            if view.minimized {
                flags.push("minimized");
            }
            if view.activated {
                flags.push("active");
            }
            if Some(view.id) == self.focused {
                flags.push("focused");
            }
            println!("  {:>2}. {} {:?} [{}]", i, view.id, view.title, flags.join(", "));
        }
        if let Some(view) = self.cycled_to {
            println!("Cycled to: {}", view);
        }
        if let Some(hit) = &self.hit {
            match hit.view {
                Some(view) => println!("Hit: {} {:?} at ({:.1}, {:.1})", view, hit.area, hit.sx, hit.sy),
                None => println!("Hit: {:?}", hit.area),
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    // Logging is not up yet, report a bad config after init
    let (config, load_error) = match RidgeConfig::load(&cli.config) {
        Ok(config) => (config, None),
        Err(e) => (RidgeConfig::default(), Some(e)),
    };

    logging::init(cli.debug || config.general.debug);

    info!("Starting Ridge {}", ridge::VERSION);
    info!(
        "Build: {} ({}) for {}",
        option_env!("GIT_COMMIT").unwrap_or("unknown"),
        env!("BUILD_DATE"),
        env!("TARGET_TRIPLE")
    );
    match load_error {
        None => info!("Configuration loaded from: {}", cli.config),
        Some(e) => {
            error!("Failed to load configuration: {:#}", e);
            info!("Using default configuration");
        }
    }

    let mut desktop = match &cli.layout {
        Some(path) => DesktopLayout::load(path)
            .and_then(|layout| layout.build(config))
            .with_context(|| format!("Failed to build desktop from {}", path))?,
        None => Desktop::new(config),
    };

    if let Some(id) = cli.focus {
        let outcome = desktop.focus_and_raise(Some(ViewId(id)));
        info!("Focus {}: {:?}", ViewId(id), outcome);
    }
    if let Some(id) = cli.raise {
        desktop.raise_with_group(Some(ViewId(id)));
    }
    if let Some(id) = cli.lower {
        desktop.lower(Some(ViewId(id)));
    }

    let cycled_to = cli.cycle.and_then(|direction| {
        let current = desktop.focused_view();
        let next = desktop.cycle(current, direction);
        if next.is_none() {
            error!("Nothing to cycle to");
        }
        desktop.focus_and_raise(next);
        next
    });

    let hit = cli.hit.map(|(x, y)| desktop.node_and_view_at(x, y));

    let report = Report::collect(&desktop, cycled_to, hit);
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        report.print_text();
    }

    Ok(())
}
