use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use arcticroute_cli::output::{
    render_classify, render_nearest, render_route, ClassifyReport, NearestReport, OutputFormat,
};
use arcticroute_cli::terminal::ColorPalette;
use arcticroute_lib::{GeoPoint, MarineRouter, RouteSummary, RouterConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Land-avoiding marine route planner")]
struct Cli {
    /// Router seed file describing the region, landmasses, and shipping lanes.
    #[arg(long, env = "ARCTICROUTE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a land-avoiding route between two positions.
    Route {
        /// Start position as LAT,LON.
        #[arg(long = "from", allow_hyphen_values = true)]
        from: GeoPoint,
        /// Destination position as LAT,LON.
        #[arg(long = "to", allow_hyphen_values = true)]
        to: GeoPoint,
    },
    /// Find the navigation node closest to a position.
    Nearest {
        /// Query position as LAT,LON.
        #[arg(long = "at", allow_hyphen_values = true)]
        at: GeoPoint,
        /// Search radius in meters; defaults to the configured node search radius.
        #[arg(long)]
        radius: Option<f64>,
    },
    /// Report whether a position is land or water.
    Classify {
        /// Query position as LAT,LON.
        #[arg(long = "at", allow_hyphen_values = true)]
        at: GeoPoint,
        /// Water search radius in kilometres; defaults to the configured value.
        #[arg(long = "radius-km")]
        radius_km: Option<f64>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config_path = cli.config.as_deref().context(
        "no router configuration given; pass --config or set ARCTICROUTE_CONFIG",
    )?;
    let router = load_router(config_path)?;
    let palette = ColorPalette::detect();

    match cli.command {
        Command::Route { from, to } => handle_route(&router, &from, &to, cli.format, &palette),
        Command::Nearest { at, radius } => {
            let radius_m = radius.unwrap_or(router.options().node_search_radius_m);
            ensure_non_negative("--radius", radius_m)?;
            let report = NearestReport::lookup(router.graph(), &at, radius_m);
            print!("{}", render_nearest(&report, cli.format, &palette)?);
            Ok(())
        }
        Command::Classify { at, radius_km } => {
            let radius_km = radius_km.unwrap_or(router.options().water_search_radius_km);
            ensure_non_negative("--radius-km", radius_km)?;
            let report = ClassifyReport::classify(router.land(), &at, radius_km);
            print!("{}", render_classify(&report, cli.format, &palette)?);
            Ok(())
        }
    }
}

fn load_router(path: &Path) -> Result<MarineRouter> {
    let config = RouterConfig::from_path(path)?;
    config
        .build_router()
        .with_context(|| format!("invalid router configuration in {}", path.display()))
}

fn handle_route(
    router: &MarineRouter,
    from: &GeoPoint,
    to: &GeoPoint,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<()> {
    let route = router.calculate_route(from, to);
    let summary = RouteSummary::from_route(&route);
    print!("{}", render_route(&summary, format, palette)?);

    if !route.is_safe {
        bail!("no safe route from {} to {}: {}", from, to, route.message);
    }
    Ok(())
}

fn ensure_non_negative(flag: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        bail!("{flag} must be a non-negative number, got {value}");
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
