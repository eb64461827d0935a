//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - Chooses the file: explicit path, then $TMPALLOC_CONFIG, then the platform default.
//!
//! Notes:
//! - A missing default file is not an error; defaults are used.
//! - Unknown XML fields are rejected to surface misconfigurations early.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::{config_path_from_env, default_config_path};
use super::types::{AllocatorConfig, LogLevel, StrategyChoice};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(rename = "override_var")]
    override_var: Option<String>,
    #[serde(rename = "default_root")]
    default_root: Option<String>,
    #[serde(rename = "strategy")]
    strategy: Option<String>,
    #[serde(rename = "system_dirs")]
    system_dirs: Option<XmlDirs>,
    #[serde(rename = "log_level")]
    log_level: Option<String>,
    #[serde(rename = "log_file")]
    log_file: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct XmlDirs {
    #[serde(rename = "dir", default)]
    dir: Vec<String>,
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

// Map XmlConfig -> AllocatorConfig
fn xml_to_config(parsed: XmlConfig) -> Result<AllocatorConfig> {
    let mut cfg = AllocatorConfig::default();

    if let Some(v) = non_empty(parsed.override_var.as_deref()) {
        cfg.override_var = v.to_string();
    }
    if let Some(r) = non_empty(parsed.default_root.as_deref()) {
        cfg.default_root = r.to_string();
    }
    if let Some(s) = non_empty(parsed.strategy.as_deref()) {
        cfg.strategy = s.parse::<StrategyChoice>().map_err(anyhow::Error::msg)?;
    }
    if let Some(dirs) = parsed.system_dirs {
        let list: Vec<PathBuf> = dirs
            .dir
            .iter()
            .filter_map(|d| non_empty(Some(d)))
            .map(PathBuf::from)
            .collect();
        if list.is_empty() {
            bail!("<system_dirs> must list at least one <dir>");
        }
        cfg.system_dirs = list;
    }
    if let Some(l) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = l.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    cfg.log_file = non_empty(parsed.log_file.as_deref()).map(PathBuf::from);

    Ok(cfg)
}

/// Load an AllocatorConfig from a specific XML file path (quick_xml).
pub fn load_config_from_xml_path(path: &Path) -> Result<AllocatorConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid config xml '{}'", path.display()))
}

/// Load configuration, returning the file it came from (if any).
///
/// Search order:
///  - `explicit` (from the command line); must exist
///  - $TMPALLOC_CONFIG; must exist
///  - platform default path, only if present
pub fn load_config(explicit: Option<&Path>) -> Result<(AllocatorConfig, Option<PathBuf>)> {
    if let Some(p) = explicit.map(Path::to_path_buf).or_else(config_path_from_env) {
        let cfg = load_config_from_xml_path(&p)?;
        debug!(path = %p.display(), "loaded config");
        return Ok((cfg, Some(p)));
    }
    match default_config_path() {
        Some(p) if p.is_file() => {
            let cfg = load_config_from_xml_path(&p)?;
            debug!(path = %p.display(), "loaded default config");
            Ok((cfg, Some(p)))
        }
        _ => Ok((AllocatorConfig::default(), None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, body: &str) -> PathBuf {
        let p = dir.join("config.xml");
        fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn reads_all_fields() {
        let td = tempdir().unwrap();
        let p = write(
            td.path(),
            r#"<config>
  <override_var>MY_TMP</override_var>
  <default_root> scratch </default_root>
  <strategy>retry</strategy>
  <system_dirs><dir>/srv/tmp</dir><dir>/tmp</dir></system_dirs>
  <log_level>debug</log_level>
  <log_file>/var/log/tmpalloc.log</log_file>
</config>"#,
        );
        let cfg = load_config_from_xml_path(&p).unwrap();
        assert_eq!(cfg.override_var, "MY_TMP");
        assert_eq!(cfg.default_root, "scratch");
        assert_eq!(cfg.strategy, StrategyChoice::Retry);
        assert_eq!(cfg.system_dirs, vec![PathBuf::from("/srv/tmp"), PathBuf::from("/tmp")]);
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/var/log/tmpalloc.log")));
    }

    #[test]
    fn empty_config_keeps_defaults() {
        let td = tempdir().unwrap();
        let p = write(td.path(), "<config></config>");
        let cfg = load_config_from_xml_path(&p).unwrap();
        assert_eq!(cfg.override_var, "TMPDIR");
        assert_eq!(cfg.default_root, "shtmp");
        assert_eq!(cfg.strategy, StrategyChoice::Auto);
        assert!(cfg.log_file.is_none());
    }

    #[test]
    fn unknown_field_rejected() {
        let td = tempdir().unwrap();
        let p = write(td.path(), "<config><download_base>/x</download_base></config>");
        assert!(load_config_from_xml_path(&p).is_err());
    }

    #[test]
    fn bad_strategy_rejected() {
        let td = tempdir().unwrap();
        let p = write(td.path(), "<config><strategy>sometimes</strategy></config>");
        let err = load_config_from_xml_path(&p).unwrap_err();
        assert!(format!("{err:#}").contains("invalid strategy"));
    }

    #[test]
    fn explicit_path_wins() {
        let td = tempdir().unwrap();
        let p = write(td.path(), "<config><default_root>explicit</default_root></config>");
        let (cfg, used) = load_config(Some(&p)).unwrap();
        assert_eq!(cfg.default_root, "explicit");
        assert_eq!(used, Some(p));
    }
}
