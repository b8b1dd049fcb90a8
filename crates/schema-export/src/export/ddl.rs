//! DDL script generation.
//!
//! [`DdlExporter`] fetches the requested tables, resolves their dependency
//! order, and renders a script through the active [`Dialect`]:
//!
//! 1. `BEGIN` (optional)
//! 2. Drops in reverse dependency order (optional)
//! 3. `CREATE TABLE` in dependency order
//! 4. `CREATE INDEX` for indexes the dialect does not inline
//! 5. `ALTER TABLE ... ADD CONSTRAINT ... FOREIGN KEY` for deferred keys
//! 6. `COMMIT` (optional)
//!
//! The script is built in memory and returned only when every statement
//! rendered; a failure anywhere yields no output at all.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::core::catalog::DialectCatalog;
use crate::core::identifier::{is_numeric_literal, validate_expression, validate_identifier};
use crate::core::schema::{Column, DefaultValue, Table};
use crate::core::traits::{Dialect, SchemaReader};
use crate::error::{ExportError, Result};
use crate::resolver::{self, Resolution};

use super::{fetch_tables, ExportRequest};

/// Script shape options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExportOptions {
    /// Emit `DROP TABLE IF EXISTS` for every table before creating it.
    pub drop_tables: bool,

    /// Wrap the script in the dialect's begin/commit statements.
    pub transaction: bool,

    /// Create every foreign key with `ALTER TABLE` after all tables,
    /// instead of only those that close a cycle or reference an outside table.
    pub defer_foreign_keys: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            drop_tables: true,
            transaction: true,
            defer_foreign_keys: false,
        }
    }
}

/// What a statement does, for callers that post-process the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Begin,
    /// Session settings around the drop block (e.g. foreign key checks).
    Session,
    DropForeignKey,
    DropTable,
    CreateTable,
    CreateIndex,
    AddForeignKey,
    Commit,
}

/// One SQL statement, without terminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub sql: String,
}

/// An ordered DDL script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DdlScript {
    dialect: String,
    terminator: String,
    statements: Vec<Statement>,
}

impl DdlScript {
    fn new(dialect: &dyn Dialect) -> Self {
        Self {
            dialect: dialect.name().to_string(),
            terminator: dialect.statement_terminator().to_string(),
            statements: Vec::new(),
        }
    }

    fn push(&mut self, kind: StatementKind, sql: impl Into<String>) {
        self.statements.push(Statement {
            kind,
            sql: sql.into(),
        });
    }

    /// Name of the dialect the script was rendered for.
    pub fn dialect(&self) -> &str {
        &self.dialect
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Statements of one kind, in script order.
    pub fn of_kind(&self, kind: StatementKind) -> impl Iterator<Item = &Statement> {
        self.statements.iter().filter(move |s| s.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Join statements, each followed by the terminator and a newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for stmt in &self.statements {
            out.push_str(&stmt.sql);
            out.push_str(&self.terminator);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for DdlScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Renders DDL scripts for tables supplied by a [`SchemaReader`].
pub struct DdlExporter<'a> {
    reader: &'a dyn SchemaReader,
    dialect: Arc<dyn Dialect>,
    options: ExportOptions,
}

impl<'a> DdlExporter<'a> {
    /// Create an exporter using the dialect for the reader's engine from the
    /// global catalog.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Dialect` if no dialect exists for the engine.
    pub fn new(reader: &'a dyn SchemaReader) -> Result<Self> {
        Self::with_catalog(reader, DialectCatalog::global())
    }

    /// Create an exporter resolving the reader's engine in `catalog`.
    pub fn with_catalog(reader: &'a dyn SchemaReader, catalog: &DialectCatalog) -> Result<Self> {
        let dialect = catalog.require(reader.engine())?;
        Ok(Self::with_dialect(reader, dialect))
    }

    /// Create an exporter with an explicit dialect, regardless of the reader's engine.
    pub fn with_dialect(reader: &'a dyn SchemaReader, dialect: Arc<dyn Dialect>) -> Self {
        Self {
            reader,
            dialect,
            options: ExportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Fetch the requested tables and render them.
    ///
    /// # Errors
    ///
    /// `UnknownTable`, `InvalidSchema`, `Dialect`, or `Reader`; no script is
    /// returned unless every step succeeded.
    pub fn export(&self, request: &ExportRequest) -> Result<DdlScript> {
        let tables = fetch_tables(self.reader, request)?;
        self.render_tables(&tables)
    }

    /// Render already-built tables.
    pub fn render_tables(&self, tables: &[Table]) -> Result<DdlScript> {
        let dialect = self.dialect.as_ref();
        for table in tables {
            table.validate()?;
            check_renderable(dialect, table)?;
        }
        let resolution = resolver::resolve(tables)?;

        let by_name: HashMap<&str, &Table> = tables.iter().map(|t| (t.name.as_str(), t)).collect();
        let ordered: Vec<&Table> = resolution
            .creation_order
            .iter()
            .filter_map(|name| by_name.get(name.as_str()).copied())
            .collect();

        let mut script = DdlScript::new(dialect);
        if tables.is_empty() {
            return Ok(script);
        }

        if self.options.transaction {
            script.push(StatementKind::Begin, dialect.begin_transaction());
        }

        if self.options.drop_tables {
            self.render_drops(&mut script, &by_name, &resolution);
        }

        for table in &ordered {
            let sql = self.render_create_table(table, &resolution)?;
            script.push(StatementKind::CreateTable, sql);
        }

        for table in &ordered {
            for idx in &table.indexes {
                if dialect.render_inline_index(&table.name, idx).is_none() {
                    script.push(
                        StatementKind::CreateIndex,
                        dialect.render_create_index(&table.name, idx),
                    );
                }
            }
        }

        let mut deferred = 0;
        for table in &ordered {
            for (position, fk) in table.foreign_keys.iter().enumerate() {
                if self.is_deferred(&resolution, &table.name, position) {
                    script.push(
                        StatementKind::AddForeignKey,
                        dialect.render_add_foreign_key(&table.name, fk),
                    );
                    deferred += 1;
                }
            }
        }

        if self.options.transaction {
            script.push(StatementKind::Commit, dialect.commit_transaction());
        }

        info!(
            "Rendered {} DDL for {} tables ({} statements, {} deferred foreign keys)",
            dialect.name(),
            tables.len(),
            script.len(),
            deferred
        );
        Ok(script)
    }

    fn is_deferred(&self, resolution: &Resolution, table: &str, position: usize) -> bool {
        self.options.defer_foreign_keys || resolution.is_deferred(table, position)
    }

    fn render_drops(
        &self,
        script: &mut DdlScript,
        by_name: &HashMap<&str, &Table>,
        resolution: &Resolution,
    ) {
        let dialect = self.dialect.as_ref();
        for sql in dialect.drop_preamble() {
            script.push(StatementKind::Session, sql);
        }

        // Keys closing a cycle would block dropping the table they reference.
        for deferred in resolution.cycle_breaking() {
            let fk = by_name
                .get(deferred.table.as_str())
                .and_then(|t| t.foreign_keys.get(deferred.position));
            if let Some(fk) = fk {
                if let Some(sql) = dialect.render_drop_foreign_key(&deferred.table, fk) {
                    script.push(StatementKind::DropForeignKey, sql);
                }
            }
        }

        for name in resolution.drop_order() {
            script.push(StatementKind::DropTable, dialect.render_drop_table(&name));
        }

        for sql in dialect.drop_postamble() {
            script.push(StatementKind::Session, sql);
        }
    }

    fn render_create_table(&self, table: &Table, resolution: &Resolution) -> Result<String> {
        let dialect = self.dialect.as_ref();
        let pk = table.primary_key();
        let mut clauses = Vec::with_capacity(table.columns.len() + table.indexes.len() + 2);

        for col in &table.columns {
            clauses.push(self.render_column(col, pk.len() == 1)?);
        }

        if pk.len() > 1 {
            let names: Vec<String> = pk.iter().map(|c| dialect.quote_ident(c)).collect();
            clauses.push(format!("PRIMARY KEY ({})", names.join(", ")));
        }

        for idx in &table.indexes {
            if let Some(clause) = dialect.render_inline_index(&table.name, idx) {
                clauses.push(clause);
            }
        }

        for (position, fk) in table.foreign_keys.iter().enumerate() {
            if !self.is_deferred(resolution, &table.name, position) {
                clauses.push(dialect.render_foreign_key(&table.name, fk));
            }
        }

        debug!("Rendered CREATE TABLE for '{}' ({} clauses)", table.name, clauses.len());
        Ok(format!(
            "CREATE TABLE {} (\n  {}\n)",
            dialect.quote_ident(&table.name),
            clauses.join(",\n  ")
        ))
    }

    fn render_column(&self, col: &Column, inline_pk: bool) -> Result<String> {
        let dialect = self.dialect.as_ref();
        let mut parts = vec![dialect.quote_ident(&col.name), dialect.render_column_type(col)?];

        if !col.nullable || col.primary_key {
            parts.push("NOT NULL".to_string());
        }
        if let Some(default) = dialect.render_default(col) {
            parts.push(format!("DEFAULT {}", default));
        }
        if let Some(clause) = dialect.render_auto_increment(col) {
            parts.push(clause);
        }
        if inline_pk && col.primary_key {
            parts.push("PRIMARY KEY".to_string());
        }
        if let Some(check) = dialect.render_enum_clause(col) {
            parts.push(check);
        }

        Ok(parts.join(" "))
    }
}

/// Reject a name the dialect's engine would truncate.
fn check_length(dialect: &dyn Dialect, kind: &str, name: &str) -> Result<()> {
    let max = dialect.max_identifier_length();
    if name.len() > max {
        return Err(ExportError::dialect(
            dialect.name(),
            format!(
                "{} name exceeds {} bytes (got {}): {:?}",
                kind,
                max,
                name.len(),
                name
            ),
        ));
    }
    Ok(())
}

/// Checks that apply to DDL only: identifiers and defaults end up spliced
/// into SQL text.
fn check_renderable(dialect: &dyn Dialect, table: &Table) -> Result<()> {
    validate_identifier(&table.name)?;
    check_length(dialect, "table", &table.name)?;

    for col in &table.columns {
        validate_identifier(&col.name)?;
        check_length(dialect, "column", &col.name)?;

        if col.auto_increment && !col.logical_type.is_integer() {
            return Err(ExportError::InvalidSchema(format!(
                "Column {}.{} is auto-increment but has type '{}'",
                table.name, col.name, col.logical_type
            )));
        }

        match &col.default {
            Some(DefaultValue::Expression(expr)) => validate_expression(expr)?,
            Some(DefaultValue::Number(n)) if !is_numeric_literal(n) => {
                return Err(ExportError::InvalidSchema(format!(
                    "Column {}.{} has a non-numeric number default: {:?}",
                    table.name, col.name, n
                )));
            }
            _ => {}
        }
    }

    for idx in &table.indexes {
        validate_identifier(&idx.name)?;
        check_length(dialect, "index", &idx.name)?;
    }

    for fk in &table.foreign_keys {
        let constraint = fk.constraint_name(&table.name);
        validate_identifier(&constraint)?;
        check_length(dialect, "constraint", &constraint)?;
        for name in fk.columns.iter().chain(&fk.referenced_columns) {
            validate_identifier(name)?;
        }
    }

    Ok(())
}
