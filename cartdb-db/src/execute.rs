//! Executors that run assembled search queries against a cartridge database.
//!
//! [`SqliteExecutor`] runs in-process through rusqlite. [`Sqlite3ShellExecutor`]
//! hands the query to the `sqlite3` command-line shell. Both bind text
//! arguments as parameters and both return the same [`QueryResult`].

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use cartdb_query::{AssembledQuery, SqlValue};
use rusqlite::Connection;
use rusqlite::types::{Value, ValueRef};
use thiserror::Error;

use crate::schema::{is_outdated, open_read_only};

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Database unavailable at {}: {reason}", .path.display())]
    DataSourceUnavailable { path: PathBuf, reason: String },
    #[error("Query rejected by {engine}: {message}")]
    Rejected {
        engine: &'static str,
        message: String,
    },
    #[error("{engine} not found in PATH")]
    EngineMissing { engine: &'static str },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecutionError {
    fn unavailable(path: &Path, reason: impl fmt::Display) -> Self {
        Self::DataSourceUnavailable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// A single result cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Real(_))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Blob(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

impl From<ValueRef<'_>> for CellValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(n) => Self::Integer(n),
            ValueRef::Real(x) => Self::Real(x),
            ValueRef::Text(bytes) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Self::Blob(bytes.to_vec()),
        }
    }
}

/// Rows returned by a search, with the query's output column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Look up a cell by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }
}

/// Something that can run an assembled query.
///
/// Failures are deterministic for a given query and database, so callers
/// should report them rather than retry.
pub trait QueryExecutor {
    fn execute(&self, query: &AssembledQuery) -> Result<QueryResult, ExecutionError>;
}

// ── In-process SQLite ───────────────────────────────────────────────────────

/// Runs queries through an in-process rusqlite connection.
pub struct SqliteExecutor {
    conn: Connection,
}

impl SqliteExecutor {
    const ENGINE: &'static str = "SQLite";

    /// Open an existing database file read-only.
    pub fn open(path: &Path) -> Result<Self, ExecutionError> {
        if !path.is_file() {
            return Err(ExecutionError::unavailable(path, "no such file"));
        }
        let conn = open_read_only(path).map_err(|e| ExecutionError::unavailable(path, e))?;
        ensure_current(path, &conn)?;
        Ok(Self { conn })
    }

    /// Wrap an already-open connection.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    fn rejected(e: rusqlite::Error) -> ExecutionError {
        ExecutionError::Rejected {
            engine: Self::ENGINE,
            message: e.to_string(),
        }
    }
}

impl QueryExecutor for SqliteExecutor {
    fn execute(&self, query: &AssembledQuery) -> Result<QueryResult, ExecutionError> {
        let mut stmt = self.conn.prepare(query.sql()).map_err(Self::rejected)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let params = rusqlite::params_from_iter(query.args().iter().map(bind_value));
        let mut rows = stmt.query(params).map_err(Self::rejected)?;

        let mut result = QueryResult {
            columns,
            rows: Vec::new(),
        };
        while let Some(row) = rows.next().map_err(Self::rejected)? {
            let mut cells = Vec::with_capacity(result.columns.len());
            for i in 0..result.columns.len() {
                cells.push(CellValue::from(row.get_ref(i).map_err(Self::rejected)?));
            }
            result.rows.push(cells);
        }

        log::debug!("{} rows returned", result.len());
        Ok(result)
    }
}

fn bind_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Integer(n) => Value::Integer(*n),
        SqlValue::Text(s) => Value::Text(s.clone()),
    }
}

// ── sqlite3 shell ───────────────────────────────────────────────────────────

/// Runs queries by piping them to the `sqlite3` command-line shell.
pub struct Sqlite3ShellExecutor {
    database: PathBuf,
    binary: Option<PathBuf>,
}

impl Sqlite3ShellExecutor {
    const ENGINE: &'static str = "sqlite3";

    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            binary: None,
        }
    }

    /// Use a specific shell binary instead of searching `PATH`.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = Some(binary.into());
        self
    }

    fn locate(&self) -> Result<PathBuf, ExecutionError> {
        match &self.binary {
            Some(path) if path.is_file() => Ok(path.clone()),
            Some(_) => Err(ExecutionError::EngineMissing {
                engine: Self::ENGINE,
            }),
            None => find_in_path(Self::ENGINE).ok_or(ExecutionError::EngineMissing {
                engine: Self::ENGINE,
            }),
        }
    }

    /// The script fed to the shell on stdin: JSON output mode, one
    /// `.parameter set` per bound argument, then the query.
    pub fn script(query: &AssembledQuery) -> String {
        let mut script = String::from(".mode json\n");
        for (i, value) in query.args().iter().enumerate() {
            script.push_str(&format!(
                ".parameter set ?{} \"{}\"\n",
                i + 1,
                escape_shell_argument(&sql_literal(value))
            ));
        }
        script.push_str(query.sql());
        script.push_str(";\n");
        script
    }
}

impl QueryExecutor for Sqlite3ShellExecutor {
    fn execute(&self, query: &AssembledQuery) -> Result<QueryResult, ExecutionError> {
        let binary = self.locate()?;
        if !self.database.is_file() {
            return Err(ExecutionError::unavailable(&self.database, "no such file"));
        }
        let conn = open_read_only(&self.database)
            .map_err(|e| ExecutionError::unavailable(&self.database, e))?;
        ensure_current(&self.database, &conn)?;
        drop(conn);

        log::debug!("Running {} on {}", binary.display(), self.database.display());
        let mut child = Command::new(&binary)
            .arg("-bail")
            .arg("-readonly")
            .arg(&self.database)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(Self::script(query).as_bytes())?;
        }
        let output = child.wait_with_output()?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() || !stderr.trim().is_empty() {
            return Err(ExecutionError::Rejected {
                engine: Self::ENGINE,
                message: stderr.trim_end().to_string(),
            });
        }

        parse_json_rows(&output.stdout, query.column_names())
    }
}

/// Refuse databases whose schema still needs migrating.
fn ensure_current(path: &Path, conn: &Connection) -> Result<(), ExecutionError> {
    if is_outdated(conn).map_err(|e| ExecutionError::unavailable(path, e))? {
        return Err(ExecutionError::unavailable(
            path,
            "legacy database without wram.battery; run `searchnes upgrade` \
             or `searchnes import --force`",
        ));
    }
    Ok(())
}

/// Render a value as a SQL literal for `.parameter set`.
fn sql_literal(value: &SqlValue) -> String {
    match value {
        SqlValue::Integer(n) => n.to_string(),
        SqlValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
    }
}

/// Escape text for a double-quoted sqlite3 dot-command argument.
fn escape_shell_argument(arg: &str) -> String {
    let mut escaped = String::with_capacity(arg.len());
    for c in arg.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Parse `.mode json` output into rows ordered like `columns`.
fn parse_json_rows(stdout: &[u8], columns: &[&str]) -> Result<QueryResult, ExecutionError> {
    let mut result = QueryResult {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows: Vec::new(),
    };

    // The shell prints nothing at all for an empty result.
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(result);
    }

    let objects: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_slice(stdout)
        .map_err(|e| ExecutionError::Rejected {
            engine: Sqlite3ShellExecutor::ENGINE,
            message: format!("unreadable output: {e}"),
        })?;

    for object in objects {
        let row = columns
            .iter()
            .map(|c| object.get(*c).map_or(CellValue::Null, json_cell))
            .collect();
        result.rows.push(row);
    }
    Ok(result)
}

fn json_cell(value: &serde_json::Value) -> CellValue {
    match value {
        serde_json::Value::Null => CellValue::Null,
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => CellValue::Integer(i),
            None => n.as_f64().map_or(CellValue::Null, CellValue::Real),
        },
        serde_json::Value::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    let file_name = format!("{name}{}", std::env::consts::EXE_SUFFIX);
    std::env::split_paths(&path)
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file())
}
