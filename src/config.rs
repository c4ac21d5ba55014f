//! # Configuración del Simulador
//!
//! Constantes del simulador y archivo de configuración TOML opcional. Todas
//! las secciones tienen valores por defecto, de modo que un archivo vacío es
//! válido.
//!
//! ## Ejemplo
//!
//! ```toml
//! [simulation]
//! quantum = 4
//!
//! [report]
//! format = "table"
//! compare_fcfs = true
//!
//! [logging]
//! level = "info"
//! ```

use std::num::NonZeroU64;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

/// Código de salida para entradas inválidas (errno `EINVAL`).
pub const EINVAL: i32 = 22;

/// Nivel de log cuando ni la línea de comandos ni el archivo indican otro.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("nivel de log desconocido: '{0}'")]
    InvalidLogLevel(String),
}

/// Configuración completa del simulador.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub simulation: SimulationSection,
    #[serde(default)]
    pub report: ReportSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Parámetros de la simulación.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SimulationSection {
    /// Quantum usado cuando no se pasa por línea de comandos
    #[serde(default)]
    pub quantum: Option<NonZeroU64>,
}

/// Formato de salida de los resultados.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Sólo los dos promedios
    #[default]
    Summary,
    /// Tabla por proceso y estadísticas resumidas
    Table,
    /// Una fila CSV por proceso
    Csv,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReportSection {
    #[serde(default)]
    pub format: ReportFormat,
    /// Incluir los promedios de FCFS como línea base
    #[serde(default)]
    pub compare_fcfs: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingSection {
    /// Convierte el nivel configurado a `tracing::Level`.
    pub fn level(&self) -> Result<Level, ConfigError> {
        Level::from_str(&self.level).map_err(|_| ConfigError::InvalidLogLevel(self.level.clone()))
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Carga y valida el archivo de configuración.
pub fn load_config(path: impl AsRef<Path>) -> Result<SimulatorConfig, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!("Failed to read config file '{}': {}", path.display(), e);
        ConfigError::Io(e)
    })?;

    let config: SimulatorConfig = toml::from_str(&contents).map_err(|e| {
        tracing::error!("Failed to parse config TOML: {}", e);
        ConfigError::Toml(e)
    })?;

    config.logging.level()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = SimulatorConfig::default();
        assert_eq!(config.simulation.quantum, None);
        assert_eq!(config.report.format, ReportFormat::Summary);
        assert!(!config.report.compare_fcfs);
        assert_eq!(config.logging.level().unwrap(), Level::WARN);
    }

    #[test]
    fn test_load_config_success() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("rr.toml");
        let mut file = File::create(&file_path).unwrap();
        writeln!(
            file,
            "[simulation]\nquantum = 4\n[report]\nformat = 'csv'\n[logging]\nlevel = 'debug'"
        )
        .unwrap();
        file.flush().unwrap();

        let config = load_config(&file_path).unwrap();
        assert_eq!(config.simulation.quantum.map(NonZeroU64::get), Some(4));
        assert_eq!(config.report.format, ReportFormat::Csv);
        // Valores por defecto para campos ausentes
        assert!(!config.report.compare_fcfs);
        assert_eq!(config.logging.level().unwrap(), Level::DEBUG);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("empty.toml");
        File::create(&file_path).unwrap();

        assert_eq!(load_config(&file_path).unwrap(), SimulatorConfig::default());
    }

    #[test]
    fn test_zero_quantum_is_rejected() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("zero.toml");
        std::fs::write(&file_path, "[simulation]\nquantum = 0\n").unwrap();

        assert!(matches!(load_config(&file_path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_invalid_log_level() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("level.toml");
        std::fs::write(&file_path, "[logging]\nlevel = 'loud'\n").unwrap();

        assert!(matches!(
            load_config(&file_path),
            Err(ConfigError::InvalidLogLevel(level)) if level == "loud"
        ));
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(matches!(
            load_config("/definitely/not/here.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
