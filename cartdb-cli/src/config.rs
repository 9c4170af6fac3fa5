//! Settings resolution: command line, then environment, then config file.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::CliError;

pub(crate) const DATABASE_ENV: &str = "CARTDB_DATABASE";
pub(crate) const DEFAULT_DATABASE: &str = "nes.db";

/// Which engine runs the assembled query.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Engine {
    /// Embedded SQLite.
    #[default]
    Sqlite,
    /// The external `sqlite3` shell.
    Sqlite3,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Sqlite3 => write!(f, "sqlite3"),
        }
    }
}

/// TOML config file format.
#[derive(Debug, Default, Deserialize, Serialize)]
struct ConfigFile {
    database: Option<PathBuf>,
    engine: Option<Engine>,
}

/// Where a setting's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Source {
    CommandLine,
    EnvVar(&'static str),
    ConfigFile,
    Default,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandLine => write!(f, "command line"),
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub database: PathBuf,
    pub database_source: Source,
    pub engine: Engine,
    pub engine_source: Source,
}

impl Settings {
    /// Resolve settings from the command line, `CARTDB_DATABASE` and the config file.
    pub(crate) fn resolve(
        cli_database: Option<PathBuf>,
        cli_engine: Option<Engine>,
    ) -> Result<Self, CliError> {
        let env_database = std::env::var_os(DATABASE_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let file = load_config_file()?;
        Ok(Self::from_sources(cli_database, cli_engine, env_database, file))
    }

    fn from_sources(
        cli_database: Option<PathBuf>,
        cli_engine: Option<Engine>,
        env_database: Option<PathBuf>,
        file: Option<ConfigFile>,
    ) -> Self {
        let file = file.unwrap_or_default();

        let (database, database_source) = if let Some(path) = cli_database {
            (path, Source::CommandLine)
        } else if let Some(path) = env_database {
            (path, Source::EnvVar(DATABASE_ENV))
        } else if let Some(path) = file.database {
            (path, Source::ConfigFile)
        } else {
            (PathBuf::from(DEFAULT_DATABASE), Source::Default)
        };

        let (engine, engine_source) = match (cli_engine, file.engine) {
            (Some(engine), _) => (engine, Source::CommandLine),
            (None, Some(engine)) => (engine, Source::ConfigFile),
            (None, None) => (Engine::default(), Source::Default),
        };

        Self {
            database,
            database_source,
            engine,
            engine_source,
        }
    }
}

/// Config file location: `<config_dir>/cartdb/config.toml`.
pub(crate) fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cartdb").join("config.toml"))
}

/// Read the config file. A missing file is not an error; a malformed one is.
fn load_config_file() -> Result<Option<ConfigFile>, CliError> {
    let Some(path) = config_path() else {
        return Ok(None);
    };
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    parse_config(&contents)
        .map(Some)
        .map_err(|e| CliError::config(format!("{}: {}", path.display(), e)))
}

fn parse_config(contents: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_wins() {
        let file = parse_config("database = \"/srv/file.db\"\nengine = \"sqlite3\"").unwrap();
        let settings = Settings::from_sources(
            Some(PathBuf::from("cli.db")),
            Some(Engine::Sqlite),
            Some(PathBuf::from("env.db")),
            Some(file),
        );
        assert_eq!(settings.database, PathBuf::from("cli.db"));
        assert_eq!(settings.database_source, Source::CommandLine);
        assert_eq!(settings.engine, Engine::Sqlite);
        assert_eq!(settings.engine_source, Source::CommandLine);
    }

    #[test]
    fn env_beats_config_file() {
        let file = parse_config("database = \"/srv/file.db\"\nengine = \"sqlite3\"").unwrap();
        let settings =
            Settings::from_sources(None, None, Some(PathBuf::from("env.db")), Some(file));
        assert_eq!(settings.database, PathBuf::from("env.db"));
        assert_eq!(settings.database_source, Source::EnvVar(DATABASE_ENV));
        assert_eq!(settings.engine, Engine::Sqlite3);
        assert_eq!(settings.engine_source, Source::ConfigFile);
    }

    #[test]
    fn defaults_without_any_source() {
        let settings = Settings::from_sources(None, None, None, None);
        assert_eq!(settings.database, PathBuf::from(DEFAULT_DATABASE));
        assert_eq!(settings.database_source, Source::Default);
        assert_eq!(settings.engine, Engine::Sqlite);
    }

    #[test]
    fn unknown_engine_is_rejected() {
        assert!(parse_config("engine = \"postgres\"").is_err());
    }
}
