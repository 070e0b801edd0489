use crate::error::{CreflectError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, error, info, trace, warn};

pub const CONFIG_FILE_NAME: &str = "creflect.toml";

static ENV_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid env reference regex")
});

/// Format of the generated output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Declarations followed by C name tables
    #[default]
    C,
    /// JSON description of every reflected enum
    Json,
}

/// Settings for locating annotation blocks
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    /// Macro name wrapping reflected declarations
    #[serde(default = "default_annotation")]
    pub annotation: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            annotation: default_annotation(),
        }
    }
}

/// Settings for the generated tables
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmitConfig {
    /// Element type of each generated table
    #[serde(default = "default_table_type")]
    pub table_type: String,
    /// Appended to the enum type name to name its table
    #[serde(default = "default_table_suffix")]
    pub table_suffix: String,
    #[serde(default)]
    pub format: OutputFormat,
    /// Output file; stdout when absent. Supports `${VAR:-default}`.
    #[serde(default)]
    pub output: Option<String>,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            table_type: default_table_type(),
            table_suffix: default_table_suffix(),
            format: OutputFormat::default(),
            output: None,
        }
    }
}

fn default_annotation() -> String {
    "CREFLECT".to_string()
}

fn default_table_type() -> String {
    "const char *".to_string()
}

fn default_table_suffix() -> String {
    "_str".to_string()
}

/// Root configuration, read from `creflect.toml`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreflectConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub emit: EmitConfig,
}

impl CreflectConfig {
    /// Loads configuration from `explicit` if given, otherwise from the
    /// nearest `creflect.toml` in the current directory or its ancestors.
    /// Without any file the defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<CreflectConfig> {
        dotenv::dotenv().ok();
        debug!("Environment variables loaded from .env if present");

        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_config_file_from(&env::current_dir()?),
        };

        match path {
            Some(path) => Self::from_path(&path),
            None => {
                debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                Ok(CreflectConfig::default())
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<CreflectConfig> {
        info!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path).map_err(|e| {
            error!("Failed to read configuration file: {}", e);
            CreflectError::read_input(path, e)
        })?;
        debug!("Configuration file size: {} bytes", contents.len());
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<CreflectConfig> {
        let mut config: CreflectConfig = toml::from_str(contents).map_err(|e| {
            error!("Failed to parse TOML configuration: {}", e);
            CreflectError::config(e.to_string())
        })?;

        config.scan.annotation = Self::substitute_env_vars(&config.scan.annotation)?;
        config.emit.table_type = Self::substitute_env_vars(&config.emit.table_type)?;
        config.emit.table_suffix = Self::substitute_env_vars(&config.emit.table_suffix)?;
        if let Some(output) = config.emit.output.take() {
            config.emit.output = Some(Self::substitute_env_vars(&output)?);
        }

        config.validate()?;
        debug!(
            "Annotation: {}, table: {} <name>{}, format: {:?}",
            config.scan.annotation,
            config.emit.table_type,
            config.emit.table_suffix,
            config.emit.format
        );
        Ok(config)
    }

    /// Checks values that would otherwise produce broken output.
    pub fn validate(&self) -> Result<()> {
        if !is_identifier(&self.scan.annotation) {
            return Err(CreflectError::config(format!(
                "scan.annotation must be a C identifier, got {:?}",
                self.scan.annotation
            )));
        }
        if !self.emit.table_suffix.bytes().all(crate::lexical::is_ident_byte) {
            return Err(CreflectError::config(format!(
                "emit.table_suffix may only contain identifier characters, got {:?}",
                self.emit.table_suffix
            )));
        }
        if self.emit.table_type.trim().is_empty() {
            return Err(CreflectError::config("emit.table_type must not be empty"));
        }
        Ok(())
    }

    /// Searches for `creflect.toml` starting at `start` and walking up to
    /// the root.
    pub fn find_config_file_from(start: &Path) -> Option<PathBuf> {
        debug!("Starting config file search from: {:?}", start);
        for dir in start.ancestors() {
            let candidate = dir.join(CONFIG_FILE_NAME);
            trace!("Checking for config at: {:?}", candidate);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }

    /// Expands `${NAME}` and `${NAME:-fallback}` in a config value. Text
    /// outside a reference, including the value a variable expands to, is
    /// copied through untouched.
    fn substitute_env_vars(value: &str) -> Result<String> {
        let mut expanded = String::with_capacity(value.len());
        let mut copied_up_to = 0;

        for cap in ENV_REFERENCE.captures_iter(value) {
            let Some(reference) = cap.get(0) else {
                continue;
            };
            let name = &cap[1];
            expanded.push_str(&value[copied_up_to..reference.start()]);

            match (env::var(name), cap.get(2)) {
                (Ok(set), _) => expanded.push_str(&set),
                (Err(_), Some(fallback)) => {
                    warn!(
                        variable = name,
                        fallback = fallback.as_str(),
                        "unset variable in config, using fallback"
                    );
                    expanded.push_str(fallback.as_str());
                }
                (Err(_), None) => {
                    error!(variable = name, "unset variable in config has no fallback");
                    return Err(CreflectError::EnvVarNotSet(name.to_string()));
                }
            }
            copied_up_to = reference.end();
        }

        expanded.push_str(&value[copied_up_to..]);
        trace!(%value, %expanded, "expanded config value");
        Ok(expanded)
    }
}

fn is_identifier(s: &str) -> bool {
    crate::lexical::ident_end(s.as_bytes(), 0) == Some(s.len())
}
