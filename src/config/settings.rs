use crate::adapters::snapshot::value_from_toml;
use crate::core::defaults::DefaultsTable;
use crate::utils::error::{PrefError, Result};
use crate::utils::validation::{validate_file_name_component, validate_path, Validate};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Placeholder used for the host identifier in ByHost file names.
pub const DEFAULT_HOST_ID: &str = "xxxx";

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const APP_DIR_NAME: &str = "pref-origin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    pub host_id: Option<String>,
    pub log_format: Option<LogFormat>,
    pub snapshot: Option<PathBuf>,
    /// domain -> key -> factory default
    #[serde(default)]
    pub defaults: BTreeMap<String, toml::Table>,
}

impl Settings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PrefError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content)
            .map_err(|e| PrefError::config(format!("TOML parsing error: {}", e)))
    }

    /// The file [`Settings::load`] reads: the explicit path, else the
    /// per-user default when it exists.
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|path| path.is_file()),
        }
    }

    /// An explicit path must exist; the per-user default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match Self::resolve_path(explicit) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn host_id(&self) -> &str {
        self.host_id.as_deref().unwrap_or(DEFAULT_HOST_ID)
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format.unwrap_or_default()
    }

    pub fn defaults_table(&self) -> Result<DefaultsTable> {
        let mut entries = Vec::new();
        for (domain, keys) in &self.defaults {
            for (key, value) in keys {
                let field = format!("defaults.{}.{}", domain, key);
                entries.push((domain.clone(), key.clone(), value_from_toml(value, &field)?));
            }
        }
        Ok(DefaultsTable::from_entries(entries))
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        if let Some(host_id) = &self.host_id {
            validate_file_name_component("host_id", host_id)?;
        }
        if let Some(snapshot) = &self.snapshot {
            validate_path("snapshot", &snapshot.to_string_lossy())?;
        }
        self.defaults_table().map(|_| ())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// 替換環境變數 (例如 ${HOME}); unknown variables are left as written.
pub fn substitute_env_vars(content: &str) -> String {
    static ENV_VAR: OnceLock<Regex> = OnceLock::new();
    let re = ENV_VAR.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
    });

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PreferenceValue;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_settings() {
        let content = r#"
host_id = "0A1B2C3D"
log_format = "json"

[defaults."com.apple.dock"]
tilesize = 64
autohide = false
"#;

        let settings = Settings::from_toml_str(content).unwrap();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.host_id(), "0A1B2C3D");
        assert_eq!(settings.log_format(), LogFormat::Json);

        let table = settings.defaults_table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get("com.apple.dock", "autohide"),
            Some(&PreferenceValue::Boolean(false))
        );
    }

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings.host_id(), DEFAULT_HOST_ID);
        assert_eq!(settings.log_format(), LogFormat::Compact);
        assert!(settings.snapshot.is_none());
        assert!(settings.defaults_table().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_settings() {
        let bad_host = Settings::from_toml_str(r#"host_id = "a/b""#).unwrap();
        assert!(bad_host.validate().is_err());

        // 未知的日誌格式在解析時就被拒絕
        let err = Settings::from_toml_str(r#"log_format = "pretty""#).unwrap_err();
        assert!(err.to_string().contains("pretty"));

        assert!(Settings::from_toml_str("host_id = [").is_err());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PREF_ORIGIN_TEST_HOST", "FEEDFACE");

        let settings = Settings::from_toml_str(r#"host_id = "${PREF_ORIGIN_TEST_HOST}""#).unwrap();
        assert_eq!(settings.host_id(), "FEEDFACE");

        std::env::remove_var("PREF_ORIGIN_TEST_HOST");

        assert_eq!(
            substitute_env_vars("${PREF_ORIGIN_SURELY_UNSET_VAR}"),
            "${PREF_ORIGIN_SURELY_UNSET_VAR}"
        );
    }

    #[test]
    fn test_settings_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"snapshot = \"/tmp/prefs-snapshot.toml\"\n")
            .unwrap();

        let settings = Settings::load(Some(temp_file.path())).unwrap();
        assert_eq!(
            settings.snapshot,
            Some(PathBuf::from("/tmp/prefs-snapshot.toml"))
        );
    }

    #[test]
    fn test_resolve_path_prefers_explicit() {
        let explicit = Path::new("/etc/pref-origin.toml");
        assert_eq!(
            Settings::resolve_path(Some(explicit)),
            Some(explicit.to_path_buf())
        );
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        assert!(matches!(
            Settings::load(Some(Path::new("/nonexistent/pref-origin.toml"))),
            Err(PrefError::IoError(_))
        ));
    }
}
