//! # Schema Bootstrap
//!
//! Creates the tables Vault needs from a declarative SQL script.
//!
//! ## How Bootstrap Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Bootstrap Process                                  │
//! │                                                                         │
//! │  App Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SchemaSource::load()                                                  │
//! │       ├── Embedded  → sql/init.sql compiled into the binary            │
//! │       ├── File(p)   → read from disk (operator override)               │
//! │       └── Disabled  → nothing to do                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  split_statements(script) → ["CREATE TABLE ...", "CREATE INDEX ..."]   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  execute each statement                                                │
//! │       ├── ok     → applied += 1                                        │
//! │       └── failed → warn!, skipped += 1, keep going                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no version tracking: the script is expected to be idempotent
//! (`CREATE ... IF NOT EXISTS`). A failing statement never aborts startup,
//! except when the bootstrap context itself is cancelled.

use std::borrow::Cow;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::context::RequestContext;
use crate::error::{StorageError, StorageResult};
use crate::storage::Storage;

/// The schema script compiled into the binary.
pub const INIT_SCRIPT: &str = include_str!("../../../sql/init.sql");

/// Where the schema script comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SchemaSource {
    /// The embedded `sql/init.sql`.
    #[default]
    Embedded,
    /// A script read from disk at startup.
    File(PathBuf),
    /// Skip bootstrap entirely.
    Disabled,
}

impl SchemaSource {
    /// Loads the script text, or `None` when bootstrap is disabled.
    ///
    /// ## Errors
    /// `StorageError::Schema` if the file can't be read.
    pub fn load(&self) -> StorageResult<Option<Cow<'static, str>>> {
        match self {
            SchemaSource::Embedded => Ok(Some(Cow::Borrowed(INIT_SCRIPT))),
            SchemaSource::File(path) => std::fs::read_to_string(path)
                .map(|script| Some(Cow::Owned(script)))
                .map_err(|e| StorageError::Schema(format!("{}: {e}", path.display()))),
            SchemaSource::Disabled => Ok(None),
        }
    }
}

/// What a bootstrap run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub applied: usize,
    pub skipped: usize,
}

/// Splits a script into individual statements.
///
/// `--` comments are dropped, `;` ends a statement unless it sits inside a
/// quoted string or identifier, and empty statements are discarded.
pub fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = script.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Some(open) => {
                current.push(c);
                if c == open {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    current.push(c);
                }
                '-' if chars.peek() == Some(&'-') => {
                    // Comment runs to end of line.
                    for skipped in chars.by_ref() {
                        if skipped == '\n' {
                            current.push('\n');
                            break;
                        }
                    }
                }
                ';' => push_statement(&mut statements, &mut current),
                _ => current.push(c),
            },
        }
    }
    push_statement(&mut statements, &mut current);

    statements
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let statement = current.trim();
    if !statement.is_empty() {
        statements.push(statement.to_string());
    }
    current.clear();
}

/// Runs every statement of `script` against `storage`.
///
/// Statement failures are logged and skipped.
///
/// ## Errors
/// Only `Cancelled` / `DeadlineExceeded` from `ctx`.
pub async fn bootstrap<S>(
    storage: &S,
    ctx: &RequestContext,
    script: &str,
) -> StorageResult<BootstrapReport>
where
    S: Storage + ?Sized,
{
    let statements = split_statements(script);
    info!(statements = statements.len(), "Bootstrapping schema");

    let mut report = BootstrapReport::default();
    for statement in &statements {
        match storage.execute(ctx, statement, &[]).await {
            Ok(_) => {
                debug!(statement = %statement, "Schema statement applied");
                report.applied += 1;
            }
            Err(e) if e.is_cancellation() => return Err(e),
            Err(e) => {
                warn!(error = %e, statement = %statement, "Schema statement failed, skipping");
                report.skipped += 1;
            }
        }
    }

    info!(
        applied = report.applied,
        skipped = report.skipped,
        "Schema bootstrap complete"
    );
    Ok(report)
}

// =============================================================================
// Unit Tests
// =============================================================================
