#![allow(dead_code)]

use std::path::PathBuf;

use arcticroute_lib::{MarineRouter, RouterConfig};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn white_sea_config() -> RouterConfig {
    RouterConfig::from_path(&fixtures_dir().join("white_sea.json")).expect("load white_sea.json")
}

pub fn white_sea_router() -> MarineRouter {
    white_sea_config()
        .build_router()
        .expect("fixture builds a router")
}
