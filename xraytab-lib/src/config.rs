use std::path::PathBuf;

use directories::ProjectDirs;

/// Environment variable naming the compressed table blob.
pub const DATA_ENV: &str = "XRAYTAB_DATA";

/// Environment variable naming the user materials overlay.
pub const MATERIALS_ENV: &str = "XRAYTAB_MATERIALS";

pub const DATA_FILE_NAME: &str = "xraydb.bin.zst";
pub const MATERIALS_FILE_NAME: &str = "materials.dat";

/// Where an [`XrayDb`](crate::XrayDb) finds its tables and user materials.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XrayDbConfig {
    /// Path to the postcard + zstd table blob written by `xraytab-generate`.
    pub data_path: Option<PathBuf>,
    /// Path to the user materials overlay. `None` keeps additions in memory.
    pub user_materials: Option<PathBuf>,
}

impl XrayDbConfig {
    /// Reads `XRAYTAB_DATA` and `XRAYTAB_MATERIALS`, falling back to the
    /// per-user data and config directories.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key).map(PathBuf::from))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<PathBuf>) -> Self {
        let dirs = project_dirs();
        let data_path = lookup(DATA_ENV).or_else(|| {
            dirs.as_ref()
                .map(|d| d.data_dir().join(DATA_FILE_NAME))
        });
        let user_materials = lookup(MATERIALS_ENV).or_else(|| {
            dirs.as_ref()
                .map(|d| d.config_dir().join(MATERIALS_FILE_NAME))
        });
        XrayDbConfig {
            data_path,
            user_materials,
        }
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    pub fn with_user_materials(mut self, path: Option<PathBuf>) -> Self {
        self.user_materials = path;
        self
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "xraytab", "xraytab")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_defaults() {
        let cfg = XrayDbConfig::from_lookup(|key| match key {
            DATA_ENV => Some(PathBuf::from("/opt/xray/tables.bin.zst")),
            MATERIALS_ENV => Some(PathBuf::from("/tmp/mats.dat")),
            _ => None,
        });
        assert_eq!(
            cfg.data_path.as_deref(),
            Some(std::path::Path::new("/opt/xray/tables.bin.zst"))
        );
        assert_eq!(
            cfg.user_materials.as_deref(),
            Some(std::path::Path::new("/tmp/mats.dat"))
        );
    }

    #[test]
    fn test_default_file_names() {
        let cfg = XrayDbConfig::from_lookup(|_| None);
        if let Some(path) = cfg.data_path {
            assert!(path.ends_with(DATA_FILE_NAME));
        }
        if let Some(path) = cfg.user_materials {
            assert!(path.ends_with(MATERIALS_FILE_NAME));
        }
    }

    #[test]
    fn test_builder_methods() {
        let cfg = XrayDbConfig::default()
            .with_data_path("/data/x.bin.zst")
            .with_user_materials(None);
        assert!(cfg.data_path.is_some());
        assert!(cfg.user_materials.is_none());
    }
}
