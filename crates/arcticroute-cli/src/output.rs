//! Output formatting for command results.
//!
//! Every command builds a serialisable report and hands it to one of the
//! renderers below together with the requested [`OutputFormat`].

use std::fmt::Write;

use anyhow::Result;
use arcticroute_lib::{GeoPoint, LandMask, NavNode, NavigationGraph, NodeKind, RouteSummary};
use clap::ValueEnum;
use serde::Serialize;

use crate::terminal::ColorPalette;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Nearest navigation node to a query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestNode {
    pub id: String,
    pub kind: NodeKind,
    pub location: GeoPoint,
    pub distance_m: f64,
}

/// Result of the `nearest` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestReport {
    pub query: GeoPoint,
    pub radius_m: f64,
    pub node: Option<NearestNode>,
}

impl NearestReport {
    pub fn lookup(graph: &NavigationGraph, query: &GeoPoint, radius_m: f64) -> Self {
        let node = graph
            .find_nearest_node(query, radius_m)
            .map(|node: &NavNode| NearestNode {
                id: node.id.clone(),
                kind: node.kind,
                location: node.location.clone(),
                distance_m: query.distance_to(&node.location),
            });
        Self {
            query: query.clone(),
            radius_m,
            node,
        }
    }
}

/// Result of the `classify` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifyReport {
    pub point: GeoPoint,
    pub in_region: bool,
    pub is_land: bool,
    /// Nearest water found for a land point, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearest_water: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snap_distance_m: Option<f64>,
}

impl ClassifyReport {
    pub fn classify(land: &LandMask, point: &GeoPoint, radius_km: f64) -> Self {
        let is_land = land.is_land(point);
        let nearest_water = if is_land {
            let candidate = land.find_nearest_water(point, radius_km);
            (!land.is_land(&candidate)).then_some(candidate)
        } else {
            None
        };
        let snap_distance_m = nearest_water
            .as_ref()
            .map(|water| point.distance_to(water));

        Self {
            point: point.clone(),
            in_region: land.region().contains(point),
            is_land,
            nearest_water,
            snap_distance_m,
        }
    }
}

/// Render a route summary.
pub fn render_route(
    summary: &RouteSummary,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(summary),
        OutputFormat::Text => {
            let body = summary.render_plain();
            let (head, rest) = body.split_once('\n').unwrap_or((body.as_str(), ""));
            Ok(format!(
                "{}{}{}\n{}",
                palette.verdict(summary.is_safe),
                head,
                palette.reset,
                rest
            ))
        }
    }
}

/// Render a nearest-node report.
pub fn render_nearest(
    report: &NearestReport,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(report);
    }

    let mut buffer = String::new();
    match &report.node {
        Some(node) => {
            let _ = writeln!(
                buffer,
                "Nearest node: {}{}{} ({}) at {}",
                palette.white_bold, node.id, palette.reset, node.kind, node.location
            );
            let _ = writeln!(
                buffer,
                "{}{:.1} km from {}{}",
                palette.gray,
                node.distance_m / 1_000.0,
                report.query,
                palette.reset
            );
        }
        None => {
            let _ = writeln!(
                buffer,
                "{}No navigation node within {:.1} km of {}{}",
                palette.red,
                report.radius_m / 1_000.0,
                report.query,
                palette.reset
            );
        }
    }
    Ok(buffer)
}

/// Render a land/water classification.
pub fn render_classify(
    report: &ClassifyReport,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(report);
    }

    let mut buffer = String::new();
    let surface = if report.is_land { "land" } else { "water" };
    let _ = writeln!(
        buffer,
        "{}: {}{}{}",
        report.point,
        palette.verdict(!report.is_land),
        surface,
        palette.reset
    );
    if !report.in_region {
        let _ = writeln!(
            buffer,
            "{}outside the configured region{}",
            palette.gray, palette.reset
        );
    }
    if report.is_land {
        match (&report.nearest_water, report.snap_distance_m) {
            (Some(water), Some(distance_m)) => {
                let _ = writeln!(
                    buffer,
                    "Nearest water: {} ({:.1} km)",
                    water,
                    distance_m / 1_000.0
                );
            }
            _ => {
                let _ = writeln!(buffer, "No water within the search radius");
            }
        }
    }
    Ok(buffer)
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut rendered = serde_json::to_string_pretty(value)?;
    rendered.push('\n');
    Ok(rendered)
}
