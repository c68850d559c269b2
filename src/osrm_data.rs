//! OSRM dataset preparation per travel mode (download + preprocess).
//!
//! Each mode gets its own directory because `osrm-extract` names its output
//! after the input file and bakes the Lua profile into it.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::traits::RouteMode;

const OSRM_IMAGE: &str = "osrm/osrm-backend";

#[derive(Debug, Clone)]
pub struct GeofabrikRegion {
    /// Geofabrik region path, e.g. "europe/monaco".
    pub path: String,
}

impl GeofabrikRegion {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("region")
    }

    pub fn url(&self) -> String {
        format!("https://download.geofabrik.de/{}-latest.osm.pbf", self.path)
    }
}

/// Routing algorithm the dataset is prepared for; `osrm-routed` must be
/// started with the matching `--algorithm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsrmAlgorithm {
    Mld,
    Ch,
}

impl OsrmAlgorithm {
    pub fn as_arg(&self) -> &'static str {
        match self {
            OsrmAlgorithm::Mld => "mld",
            OsrmAlgorithm::Ch => "ch",
        }
    }
}

/// Lua profile shipped in the OSRM image for `mode`.
pub fn lua_profile(mode: RouteMode) -> &'static str {
    match mode {
        RouteMode::Car => "/opt/car.lua",
        RouteMode::Bike => "/opt/bicycle.lua",
        RouteMode::Foot => "/opt/foot.lua",
    }
}

#[derive(Debug, Clone)]
pub struct OsrmDatasetConfig {
    pub region: GeofabrikRegion,
    pub data_root: PathBuf,
    pub mode: RouteMode,
    pub algorithm: OsrmAlgorithm,
}

impl OsrmDatasetConfig {
    pub fn new(region: GeofabrikRegion, data_root: impl Into<PathBuf>, mode: RouteMode) -> Self {
        Self {
            region,
            data_root: data_root.into(),
            mode,
            algorithm: OsrmAlgorithm::Mld,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmDataset {
    /// Directory to mount as `/data` in the OSRM container.
    pub data_dir: PathBuf,
    pub osrm_base: PathBuf,
    pub mode: RouteMode,
    pub algorithm: OsrmAlgorithm,
}

#[derive(Debug, Error)]
pub enum OsrmDataError {
    #[error("dataset io failed: {0}")]
    Io(#[from] io::Error),
    #[error("dataset download failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    ProcessFailure(String),
}

impl OsrmDataset {
    pub fn ensure(config: &OsrmDatasetConfig) -> Result<Self, OsrmDataError> {
        let data_root = if config.data_root.is_absolute() {
            config.data_root.clone()
        } else {
            std::env::current_dir()?.join(&config.data_root)
        };
        let region_dir = data_root.join(config.region.name());
        let data_dir = region_dir.join(config.mode.as_str());
        fs::create_dir_all(&data_dir)?;

        let pbf_name = format!("{}-latest.osm.pbf", config.region.name());
        let shared_pbf = region_dir.join(&pbf_name);
        if !shared_pbf.exists() {
            tracing::info!("downloading {}", config.region.url());
            download_pbf(&config.region.url(), &shared_pbf)?;
        }
        let pbf_path = data_dir.join(&pbf_name);
        if !pbf_path.exists() && fs::hard_link(&shared_pbf, &pbf_path).is_err() {
            fs::copy(&shared_pbf, &pbf_path)?;
        }

        let osrm_base = data_dir.join(format!("{}-latest.osrm", config.region.name()));
        let osrm_arg = format!("/data/{}", file_name(&osrm_base));
        if !osrm_base.exists() {
            tracing::info!("extracting {} with {}", pbf_name, lua_profile(config.mode));
            run_docker(
                &[
                    "osrm-extract",
                    "-p",
                    lua_profile(config.mode),
                    &format!("/data/{}", file_name(&pbf_path)),
                ],
                &data_dir,
            )?;
        }

        match config.algorithm {
            OsrmAlgorithm::Mld => {
                if !mld_ready(&osrm_base) {
                    run_docker(&["osrm-partition", &osrm_arg], &data_dir)?;
                    run_docker(&["osrm-customize", &osrm_arg], &data_dir)?;
                }
            }
            OsrmAlgorithm::Ch => {
                if !osrm_base.with_extension("osrm.hsgr").exists() {
                    run_docker(&["osrm-contract", &osrm_arg], &data_dir)?;
                }
            }
        }

        Ok(Self {
            data_dir,
            osrm_base,
            mode: config.mode,
            algorithm: config.algorithm,
        })
    }

    /// Arguments for `osrm-routed` inside the container.
    pub fn routed_args(&self) -> Vec<String> {
        vec![
            "osrm-routed".to_string(),
            "--algorithm".to_string(),
            self.algorithm.as_arg().to_string(),
            format!("/data/{}", file_name(&self.osrm_base)),
        ]
    }
}

fn download_pbf(url: &str, dest: &Path) -> Result<(), OsrmDataError> {
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let tmp_path = dest.with_extension("tmp");
    let mut writer = BufWriter::new(File::create(&tmp_path)?);
    writer.write_all(&response.bytes()?)?;
    writer.flush()?;
    fs::rename(tmp_path, dest)?;
    Ok(())
}

fn mld_ready(osrm_base: &Path) -> bool {
    ["osrm.partition", "osrm.mldgr", "osrm.cells"]
        .iter()
        .all(|extension| osrm_base.with_extension(extension).exists())
        && osrm_base.exists()
}

fn run_docker(args: &[&str], data_dir: &Path) -> Result<(), OsrmDataError> {
    let status = Command::new("docker")
        .arg("run")
        .arg("--rm")
        .arg("-t")
        .arg("-v")
        .arg(format!("{}:/data", data_dir.display()))
        .arg(OSRM_IMAGE)
        .args(args)
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(OsrmDataError::ProcessFailure(format!(
            "{} exited with status {}",
            args.first().copied().unwrap_or("docker"),
            status
        )))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string()
}
