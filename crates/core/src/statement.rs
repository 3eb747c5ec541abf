//! The index DDL applied by the runner.
//!
//! The embedded statement is what runs by default. Parsing exists so a
//! migration file can supply the statement instead, with the index name,
//! table, and schema extracted for the catalog check.

use sqlparser::ast::{Ident, ObjectName, Statement};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use crate::StatementError;

pub const EMBEDDED_INDEX_NAME: &str = "idx_orders_shop_cd_shop_ord_no_ord_time";
pub const EMBEDDED_TABLE_NAME: &str = "orders";
pub const EMBEDDED_INDEX_SQL: &str = "CREATE INDEX IF NOT EXISTS idx_orders_shop_cd_shop_ord_no_ord_time
ON orders(shop_cd, shop_ord_no, ord_time);";

/// A single `CREATE INDEX` statement plus the catalog coordinates used to
/// verify it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStatement {
    /// Index name as stored in `pg_indexes.indexname`.
    pub name: String,
    /// Table name as stored in `pg_indexes.tablename`.
    pub table: String,
    /// Schema named in the statement; `None` when the table is unqualified.
    pub schema: Option<String>,
    pub sql: String,
}

impl IndexStatement {
    /// The composite index on `orders(shop_cd, shop_ord_no, ord_time)`.
    pub fn embedded() -> Self {
        Self {
            name: EMBEDDED_INDEX_NAME.to_owned(),
            table: EMBEDDED_TABLE_NAME.to_owned(),
            schema: None,
            sql: EMBEDDED_INDEX_SQL.to_owned(),
        }
    }

    /// Extract the first `CREATE INDEX` statement from migration SQL.
    ///
    /// The whole input is parsed with the PostgreSQL dialect, so comments and
    /// string literals are handled by the tokenizer. The returned SQL is the
    /// matched statement rendered back from the AST. Unquoted identifiers are
    /// folded to lower case the way PostgreSQL stores them.
    pub fn parse(migration_sql: &str) -> Result<Self, StatementError> {
        let statements = Parser::parse_sql(&PostgreSqlDialect {}, migration_sql)
            .map_err(|e| StatementError::Parse(e.to_string()))?;

        let create = statements
            .into_iter()
            .find(|stmt| matches!(stmt, Statement::CreateIndex(_)))
            .ok_or(StatementError::NoCreateIndex)?;
        let Statement::CreateIndex(index) = &create else {
            return Err(StatementError::NoCreateIndex);
        };

        let name_parts = index.name.as_ref().ok_or(StatementError::UnnamedIndex)?;
        let name = last_ident(name_parts)?;
        let (schema, table) = schema_and_table(&index.table_name)?;

        Ok(Self { name, table, schema, sql: format!("{create};") })
    }
}

fn idents(name: &ObjectName) -> Result<Vec<String>, StatementError> {
    name.0
        .iter()
        .map(|part| {
            part.as_ident()
                .map(fold_ident)
                .ok_or_else(|| StatementError::InvalidIdentifier(name.to_string()))
        })
        .collect()
}

fn last_ident(name: &ObjectName) -> Result<String, StatementError> {
    idents(name)?.pop().ok_or_else(|| StatementError::InvalidIdentifier(name.to_string()))
}

fn schema_and_table(name: &ObjectName) -> Result<(Option<String>, String), StatementError> {
    let mut parts = idents(name)?;
    let table = parts.pop().ok_or_else(|| StatementError::InvalidIdentifier(name.to_string()))?;
    Ok((parts.pop(), table))
}

fn fold_ident(ident: &Ident) -> String {
    match ident.quote_style {
        Some(_) => ident.value.clone(),
        None => ident.value.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_statement_is_idempotent_ddl() {
        let stmt = IndexStatement::embedded();
        assert!(stmt.sql.contains("IF NOT EXISTS"));
        assert_eq!(stmt.name, "idx_orders_shop_cd_shop_ord_no_ord_time");
        assert_eq!(stmt.table, "orders");
        assert_eq!(stmt.schema, None);
    }

    #[test]
    fn test_parse_embedded_sql_matches_constants() {
        let parsed = IndexStatement::parse(EMBEDDED_INDEX_SQL).unwrap();
        assert_eq!(parsed.name, EMBEDDED_INDEX_NAME);
        assert_eq!(parsed.table, EMBEDDED_TABLE_NAME);
        assert_eq!(parsed.schema, None);
        assert!(parsed.sql.starts_with("CREATE INDEX IF NOT EXISTS idx_orders_shop_cd_shop_ord_no_ord_time"));
        assert!(parsed.sql.ends_with(';'));
    }

    #[test]
    fn test_parse_skips_comments() {
        let sql = r"
-- Migration: add composite index on orders
-- CREATE INDEX old_idx ON nothing(x);
/* CREATE INDEX also_not ON this(y); */
CREATE INDEX IF NOT EXISTS idx_orders_shop_cd_shop_ord_no_ord_time
ON orders(shop_cd, shop_ord_no, ord_time);

CREATE INDEX IF NOT EXISTS idx_orders_later ON orders(created_at);
";
        let parsed = IndexStatement::parse(sql).unwrap();
        assert_eq!(parsed.name, "idx_orders_shop_cd_shop_ord_no_ord_time");
        assert_eq!(parsed.table, "orders");
        assert!(parsed.sql.starts_with("CREATE INDEX IF NOT EXISTS"));
        assert!(!parsed.sql.contains("idx_orders_later"));
    }

    #[test]
    fn test_parse_block_comment_opener_inside_line_comment() {
        let sql = "-- see /* notes\n\
                   CREATE INDEX IF NOT EXISTS idx_a ON orders(a);\n\
                   -- end */\n\
                   CREATE INDEX IF NOT EXISTS idx_b ON orders(b);";
        let parsed = IndexStatement::parse(sql).unwrap();
        assert_eq!(parsed.name, "idx_a");
        assert!(!parsed.sql.contains("idx_b"));
    }

    #[test]
    fn test_parse_semicolon_inside_string_literal() {
        let sql = "CREATE INDEX IF NOT EXISTS idx_notes ON orders(note) WHERE note <> 'a;b';";
        let parsed = IndexStatement::parse(sql).unwrap();
        assert_eq!(parsed.name, "idx_notes");
        assert!(parsed.sql.contains("'a;b'"), "got {}", parsed.sql);
        assert!(parsed.sql.ends_with("'a;b';"));
    }

    #[test]
    fn test_parse_dashes_inside_string_literal() {
        let sql = "CREATE INDEX IF NOT EXISTS idx_notes ON orders(note) WHERE note <> '--';";
        let parsed = IndexStatement::parse(sql).unwrap();
        assert!(parsed.sql.contains("'--'"), "got {}", parsed.sql);
    }

    #[test]
    fn test_parse_unique_concurrently_schema_qualified() {
        let sql = "create unique index concurrently Idx_Users_Email on public.users using btree (email)";
        let parsed = IndexStatement::parse(sql).unwrap();
        assert_eq!(parsed.name, "idx_users_email");
        assert_eq!(parsed.table, "users");
        assert_eq!(parsed.schema.as_deref(), Some("public"));
        assert!(parsed.sql.ends_with(';'));
    }

    #[test]
    fn test_parse_quoted_identifiers_keep_case() {
        let sql = r#"CREATE INDEX "IdxMixed" ON "Analytics"."Orders" (id);"#;
        let parsed = IndexStatement::parse(sql).unwrap();
        assert_eq!(parsed.name, "IdxMixed");
        assert_eq!(parsed.table, "Orders");
        assert_eq!(parsed.schema.as_deref(), Some("Analytics"));
    }

    #[test]
    fn test_parse_without_create_index() {
        let err = IndexStatement::parse("ALTER TABLE orders ADD COLUMN x int;").unwrap_err();
        assert!(matches!(err, StatementError::NoCreateIndex));
    }

    #[test]
    fn test_parse_unnamed_index() {
        let err = IndexStatement::parse("CREATE INDEX ON orders(a);").unwrap_err();
        assert!(matches!(err, StatementError::UnnamedIndex));
    }

    #[test]
    fn test_parse_invalid_sql() {
        let err = IndexStatement::parse("CREATE INDEX idx_x ON orders(a").unwrap_err();
        assert!(matches!(err, StatementError::Parse(_)));
    }
}
