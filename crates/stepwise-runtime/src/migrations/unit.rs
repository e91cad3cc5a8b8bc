use std::path::Path;

use async_trait::async_trait;

use stepwise_core::{Result, StepwiseError};

use crate::db::Connection;

/// One forward/backward schema change step.
///
/// Error detail travels in the `Err` value of `up`/`down`.
#[async_trait]
pub trait MigrationUnit: Send + Sync {
    /// Unit name, used in progress and error reporting.
    fn name(&self) -> &str;

    /// Apply the migration.
    async fn up(&self, conn: &mut dyn Connection) -> Result<()>;

    /// Revert the migration.
    async fn down(&self, conn: &mut dyn Connection) -> Result<()>;
}

const UP_MARKER: &str = "-- migrate:up";
const DOWN_MARKER: &str = "-- migrate:down";

/// A migration unit backed by a SQL file.
///
/// The file is split into an up section and an optional down section:
///
/// ```sql
/// -- migrate:up
/// CREATE TABLE users (id BIGSERIAL PRIMARY KEY);
///
/// -- migrate:down
/// DROP TABLE users;
/// ```
///
/// Text before the first marker is ignored (header comments). An empty
/// section is a successful no-op. A file with no `-- migrate:up` marker is
/// not a valid migration.
#[derive(Debug, Clone)]
pub struct SqlMigration {
    name: String,
    pub up_statements: Vec<String>,
    pub down_statements: Vec<String>,
}

impl SqlMigration {
    /// Load and parse a migration file.
    pub fn load(path: &Path) -> Result<Self> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("migration")
            .to_string();

        let content = std::fs::read_to_string(path)?;
        Self::parse(name, &content).map_err(|reason| StepwiseError::InvalidMigration {
            path: path.display().to_string(),
            reason,
        })
    }

    fn parse(name: String, content: &str) -> std::result::Result<Self, String> {
        enum Section {
            Preamble,
            Up,
            Down,
        }

        let mut up = String::new();
        let mut down = String::new();
        let mut section = Section::Preamble;
        let mut saw_up_marker = false;

        for line in content.lines() {
            match line.trim() {
                UP_MARKER => {
                    section = Section::Up;
                    saw_up_marker = true;
                }
                DOWN_MARKER => {
                    section = Section::Down;
                }
                _ => {
                    let target = match section {
                        Section::Preamble => continue,
                        Section::Up => &mut up,
                        Section::Down => &mut down,
                    };
                    target.push_str(line);
                    target.push('\n');
                }
            }
        }

        if !saw_up_marker {
            return Err(format!("missing '{}' section", UP_MARKER));
        }

        Ok(Self {
            name,
            up_statements: split_statements(&up),
            down_statements: split_statements(&down),
        })
    }

    async fn execute_all(statements: &[String], conn: &mut dyn Connection) -> Result<()> {
        for statement in statements {
            conn.execute(statement).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl MigrationUnit for SqlMigration {
    fn name(&self) -> &str {
        &self.name
    }

    async fn up(&self, conn: &mut dyn Connection) -> Result<()> {
        Self::execute_all(&self.up_statements, conn).await
    }

    async fn down(&self, conn: &mut dyn Connection) -> Result<()> {
        Self::execute_all(&self.down_statements, conn).await
    }
}

/// Split SQL into individual statements, respecting dollar-quoted strings.
/// PL/pgSQL bodies contain semicolons inside `$$`/`$tag$` delimiters.
fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut dollar_tag: Option<String> = None;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);

        if c == '$' {
            // Scan a possible $tag$ delimiter
            let mut tag = String::from("$");
            while let Some(&next) = chars.peek() {
                if next == '$' {
                    chars.next();
                    current.push('$');
                    tag.push('$');
                    break;
                } else if next.is_alphanumeric() || next == '_' {
                    chars.next();
                    current.push(next);
                    tag.push(next);
                } else {
                    break;
                }
            }

            if tag.len() >= 2 && tag.ends_with('$') {
                match &dollar_tag {
                    Some(open) if *open == tag => dollar_tag = None,
                    None => dollar_tag = Some(tag),
                    _ => {}
                }
            }
        }

        if c == ';' && dollar_tag.is_none() {
            push_statement(&mut statements, &current);
            current.clear();
        }
    }

    // The last statement might not end with ;
    push_statement(&mut statements, &current);
    statements
}

fn push_statement(statements: &mut Vec<String>, raw: &str) {
    let stmt = raw.trim().trim_end_matches(';').trim();
    if stmt.is_empty() || is_comment_only(stmt) {
        return;
    }
    statements.push(stmt.to_string());
}

fn is_comment_only(stmt: &str) -> bool {
    stmt.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with("--")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_up_and_down() {
        let content = r#"-- Migration: add-users
-- migrate:up
CREATE TABLE users (id BIGSERIAL PRIMARY KEY);
CREATE INDEX idx_users ON users (id);

-- migrate:down
DROP TABLE users;
"#;
        let unit = SqlMigration::parse("add-users".to_string(), content).unwrap();
        assert_eq!(unit.name(), "add-users");
        assert_eq!(unit.up_statements.len(), 2);
        assert_eq!(
            unit.up_statements[0],
            "CREATE TABLE users (id BIGSERIAL PRIMARY KEY)"
        );
        assert_eq!(unit.down_statements, vec!["DROP TABLE users".to_string()]);
    }

    #[test]
    fn test_parse_missing_up_marker() {
        let err = SqlMigration::parse("bad".to_string(), "DROP TABLE users;").unwrap_err();
        assert!(err.contains("migrate:up"));
    }

    #[test]
    fn test_parse_empty_sections_are_noops() {
        let content = "-- migrate:up\n\n-- migrate:down\n";
        let unit = SqlMigration::parse("empty".to_string(), content).unwrap();
        assert!(unit.up_statements.is_empty());
        assert!(unit.down_statements.is_empty());
    }

    #[test]
    fn test_parse_missing_down_is_noop() {
        let content = "-- migrate:up\nSELECT 1;\n";
        let unit = SqlMigration::parse("up-only".to_string(), content).unwrap();
        assert_eq!(unit.up_statements.len(), 1);
        assert!(unit.down_statements.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let result = SqlMigration::load(Path::new("/nonexistent/migration-0-x.sql"));
        assert!(matches!(result, Err(StepwiseError::Io(_))));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("migration-0-bad.sql");
        fs::write(&path, "SELECT 1;").unwrap();

        let result = SqlMigration::load(&path);
        assert!(matches!(result, Err(StepwiseError::InvalidMigration { .. })));
    }

    #[test]
    fn test_split_simple_statements() {
        let stmts = split_statements("SELECT 1; SELECT 2; SELECT 3;");
        assert_eq!(stmts, vec!["SELECT 1", "SELECT 2", "SELECT 3"]);
    }

    #[test]
    fn test_split_skips_comment_only_blocks() {
        let stmts = split_statements("-- just a comment\n;\nSELECT 1;");
        assert_eq!(stmts, vec!["SELECT 1"]);
    }

    #[test]
    fn test_split_with_dollar_quoted_function() {
        let sql = r#"
CREATE FUNCTION test() RETURNS void AS $$
BEGIN
    SELECT 1;
    SELECT 2;
END;
$$ LANGUAGE plpgsql;

SELECT 3;
"#;
        let stmts = split_statements(sql);
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].contains("CREATE FUNCTION"));
        assert!(stmts[0].contains("$$ LANGUAGE plpgsql"));
        assert!(stmts[1].contains("SELECT 3"));
    }

    #[test]
    fn test_split_with_tagged_dollar_quote() {
        let sql = r#"
CREATE FUNCTION touch() RETURNS trigger AS $body$
BEGIN
    NEW.updated_at := NOW();
    RETURN NEW;
END;
$body$ LANGUAGE plpgsql;
"#;
        let stmts = split_statements(sql);
        assert_eq!(stmts.len(), 1);
        assert!(stmts[0].contains("NEW.updated_at := NOW()"));
    }
}
