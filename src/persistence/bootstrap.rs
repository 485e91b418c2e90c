//! Startup sequencing of the destructive schema and seed scripts.
//!
//! [`Bootstrapper::prepare`] runs the schema script and then the seed
//! script, each on its own freshly borrowed connection. The first failure
//! stops the sequence. Only a fully successful run flips the shared
//! [`Readiness`] to ready.

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use crate::config::QotdConfig;
use crate::domain::Readiness;
use crate::error::SetupError;

use super::connection::ConnectionSource;

/// Bundled schema script. Drops and recreates the `quotes` table.
pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Bundled seed script.
pub const SEED_SQL: &str = include_str!("../../sql/seed.sql");

/// One bootstrap step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStep {
    /// Schema definition.
    Schema,
    /// Seed data load.
    Seed,
}

impl BootstrapStep {
    /// Steps in execution order.
    pub const ORDER: [Self; 2] = [Self::Schema, Self::Seed];
}

impl fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema => f.write_str("schema"),
            Self::Seed => f.write_str("seed"),
        }
    }
}

/// Where a bootstrap script comes from.
#[derive(Debug, Clone)]
pub enum ScriptSource {
    /// Compiled into the binary.
    Bundled(&'static str),
    /// Read from disk when the step runs.
    File(PathBuf),
    /// Supplied at construction time.
    Inline(String),
}

impl ScriptSource {
    async fn load(&self, step: BootstrapStep) -> Result<Cow<'_, str>, SetupError> {
        match self {
            Self::Bundled(sql) => Ok(Cow::Borrowed(sql)),
            Self::Inline(sql) => Ok(Cow::Borrowed(sql.as_str())),
            Self::File(path) => tokio::fs::read_to_string(path)
                .await
                .map(Cow::Owned)
                .map_err(|source| SetupError::ScriptRead {
                    step,
                    path: path.display().to_string(),
                    source,
                }),
        }
    }
}

/// Applies the schema and seed scripts before the service starts.
#[derive(Debug, Clone)]
pub struct Bootstrapper {
    source: ConnectionSource,
    readiness: Readiness,
    schema: ScriptSource,
    seed: ScriptSource,
}

impl Bootstrapper {
    /// Creates a bootstrapper using the bundled scripts.
    #[must_use]
    pub fn new(source: ConnectionSource, readiness: Readiness) -> Self {
        Self {
            source,
            readiness,
            schema: ScriptSource::Bundled(SCHEMA_SQL),
            seed: ScriptSource::Bundled(SEED_SQL),
        }
    }

    /// Creates a bootstrapper honouring the script overrides in `config`.
    #[must_use]
    pub fn from_config(source: ConnectionSource, readiness: Readiness, config: &QotdConfig) -> Self {
        let mut bootstrapper = Self::new(source, readiness);
        if let Some(path) = &config.schema_script_path {
            bootstrapper = bootstrapper.with_schema(ScriptSource::File(path.clone()));
        }
        if let Some(path) = &config.seed_script_path {
            bootstrapper = bootstrapper.with_seed(ScriptSource::File(path.clone()));
        }
        bootstrapper
    }

    /// Replaces the schema script.
    #[must_use]
    pub fn with_schema(mut self, schema: ScriptSource) -> Self {
        self.schema = schema;
        self
    }

    /// Replaces the seed script.
    #[must_use]
    pub fn with_seed(mut self, seed: ScriptSource) -> Self {
        self.seed = seed;
        self
    }

    /// Runs every step in order, then marks the service ready.
    ///
    /// # Errors
    ///
    /// Returns the [`SetupError`] of the first step that fails; later
    /// steps are not attempted and readiness is left unchanged.
    pub async fn prepare(&self) -> Result<(), SetupError> {
        for step in BootstrapStep::ORDER {
            self.run_step(step).await?;
        }
        self.readiness.mark_ready();
        Ok(())
    }

    async fn run_step(&self, step: BootstrapStep) -> Result<(), SetupError> {
        let script = self.script(step).load(step).await?;

        let mut conn = self
            .source
            .acquire()
            .await
            .map_err(|source| SetupError::Connection { step, source })?;
        let result = sqlx::raw_sql(&script).execute(&mut *conn).await;
        drop(conn);

        let done = result.map_err(|source| SetupError::Script { step, source })?;
        tracing::info!(%step, rows_affected = done.rows_affected(), "bootstrap step applied");
        Ok(())
    }

    fn script(&self, step: BootstrapStep) -> &ScriptSource {
        match step {
            BootstrapStep::Schema => &self.schema,
            BootstrapStep::Seed => &self.seed,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::connection::test_source;

    async fn count_quotes(source: &ConnectionSource) -> Result<i64, sqlx::Error> {
        let mut conn = source.acquire().await?;
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quotes")
            .fetch_one(&mut *conn)
            .await
    }

    #[tokio::test]
    async fn bundled_scripts_create_and_seed() {
        let source = test_source().await;
        let readiness = Readiness::new();
        let bootstrapper = Bootstrapper::new(source.clone(), readiness.clone());

        tokio_test::assert_ok!(bootstrapper.prepare().await);
        assert!(readiness.is_ready());
        assert!(matches!(count_quotes(&source).await, Ok(n) if n > 0));
    }

    #[tokio::test]
    async fn prepare_is_destructive() {
        let source = test_source().await;
        let bootstrapper = Bootstrapper::new(source.clone(), Readiness::new());
        tokio_test::assert_ok!(bootstrapper.prepare().await);
        let Ok(seeded) = count_quotes(&source).await else {
            panic!("count failed");
        };

        let Ok(mut conn) = source.acquire().await else {
            panic!("acquire failed");
        };
        let inserted = sqlx::query("INSERT INTO quotes (text, author) VALUES ('x', 'y')")
            .execute(&mut *conn)
            .await;
        assert!(inserted.is_ok());
        drop(conn);

        tokio_test::assert_ok!(bootstrapper.prepare().await);
        assert!(matches!(count_quotes(&source).await, Ok(n) if n == seeded));
    }

    #[tokio::test]
    async fn schema_failure_skips_seed() {
        let source = test_source().await;
        let readiness = Readiness::new();
        let bootstrapper = Bootstrapper::new(source.clone(), readiness.clone())
            .with_schema(ScriptSource::Inline("CREATE TABLE (".to_string()))
            .with_seed(ScriptSource::Inline(
                "CREATE TABLE seed_ran (x INTEGER);".to_string(),
            ));

        let result = bootstrapper.prepare().await;
        assert!(matches!(
            result,
            Err(SetupError::Script {
                step: BootstrapStep::Schema,
                ..
            })
        ));
        assert!(!readiness.is_ready());

        let Ok(mut conn) = source.acquire().await else {
            panic!("acquire failed");
        };
        let seed_table = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE name = 'seed_ran'",
        )
        .fetch_one(&mut *conn)
        .await;
        assert!(matches!(seed_table, Ok(0)));
    }

    #[tokio::test]
    async fn seed_failure_is_reported() {
        let source = test_source().await;
        let readiness = Readiness::new();
        let bootstrapper = Bootstrapper::new(source, readiness.clone()).with_seed(
            ScriptSource::Inline("INSERT INTO missing_table VALUES (1);".to_string()),
        );

        let result = bootstrapper.prepare().await;
        assert!(matches!(
            result,
            Err(SetupError::Script {
                step: BootstrapStep::Seed,
                ..
            })
        ));
        assert!(!readiness.is_ready());
    }

    #[tokio::test]
    async fn unreadable_script_file_fails_fast() {
        let source = test_source().await;
        let bootstrapper = Bootstrapper::new(source, Readiness::new()).with_schema(
            ScriptSource::File(PathBuf::from("/nonexistent/qotd/schema.sql")),
        );

        let result = bootstrapper.prepare().await;
        assert!(matches!(
            result,
            Err(SetupError::ScriptRead {
                step: BootstrapStep::Schema,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn closed_source_is_a_connection_error() {
        let source = test_source().await;
        source.close().await;
        let bootstrapper = Bootstrapper::new(source, Readiness::new());

        let result = bootstrapper.prepare().await;
        assert!(matches!(
            result,
            Err(SetupError::Connection {
                step: BootstrapStep::Schema,
                ..
            })
        ));
    }

    #[test]
    fn steps_run_schema_first() {
        assert_eq!(
            BootstrapStep::ORDER,
            [BootstrapStep::Schema, BootstrapStep::Seed]
        );
        assert_eq!(BootstrapStep::Seed.to_string(), "seed");
    }
}
