//! Quote persistence on top of the [`ConnectionSource`].
//!
//! Every method borrows its own connection and releases it before
//! returning. The store keeps no connection between calls, so it is
//! safe to clone and call from any number of concurrent requests.

use crate::domain::{NewQuote, Quote, Readiness};
use crate::error::StoreError;

use super::connection::{Connection, ConnectionSource};

type QuoteRow = (i64, String, String);

/// Read-all and insert-one access to the `quotes` table.
#[derive(Debug, Clone)]
pub struct QuoteStore {
    source: ConnectionSource,
    readiness: Readiness,
}

impl QuoteStore {
    /// Creates a store that serves requests once `readiness` is ready.
    #[must_use]
    pub fn new(source: ConnectionSource, readiness: Readiness) -> Self {
        Self { source, readiness }
    }

    /// Returns every stored quote.
    ///
    /// Row order is whatever the backend yields and is not guaranteed to
    /// be stable across calls.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotReady`] before bootstrap, otherwise a
    /// connection or persistence error.
    pub async fn list_all(&self) -> Result<Vec<Quote>, StoreError> {
        let mut conn = self.checkout().await?;
        let rows = sqlx::query_as::<_, QuoteRow>("SELECT quote_id, text, author FROM quotes")
            .fetch_all(&mut *conn)
            .await;
        drop(conn);

        let rows = rows.map_err(StoreError::Persistence)?;
        Ok(rows
            .into_iter()
            .map(|(quote_id, text, author)| Quote::from_row(quote_id, text, author))
            .collect())
    }

    /// Inserts a quote and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotReady`] before bootstrap, otherwise a
    /// connection or persistence error. On error nothing was written.
    pub async fn insert(&self, quote: &NewQuote) -> Result<Quote, StoreError> {
        let mut conn = self.checkout().await?;
        let row = sqlx::query_as::<_, QuoteRow>(
            "INSERT INTO quotes (text, author) VALUES (?1, ?2) RETURNING quote_id, text, author",
        )
        .bind(quote.text())
        .bind(quote.author())
        .fetch_one(&mut *conn)
        .await;
        drop(conn);

        let (quote_id, text, author) = row.map_err(StoreError::Persistence)?;
        tracing::debug!(quote_id, "quote inserted");
        Ok(Quote::from_row(quote_id, text, author))
    }

    /// Returns the quote with the highest identifier, if any.
    ///
    /// # Errors
    ///
    /// Same as [`QuoteStore::list_all`].
    pub async fn latest(&self) -> Result<Option<Quote>, StoreError> {
        let mut conn = self.checkout().await?;
        let row = sqlx::query_as::<_, QuoteRow>(
            "SELECT quote_id, text, author FROM quotes ORDER BY quote_id DESC LIMIT 1",
        )
        .fetch_optional(&mut *conn)
        .await;
        drop(conn);

        let row = row.map_err(StoreError::Persistence)?;
        Ok(row.map(|(quote_id, text, author)| Quote::from_row(quote_id, text, author)))
    }

    async fn checkout(&self) -> Result<Connection, StoreError> {
        if !self.readiness.is_ready() {
            return Err(StoreError::NotReady);
        }
        self.source.acquire().await.map_err(StoreError::Connection)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use super::*;
    use crate::persistence::bootstrap::{Bootstrapper, ScriptSource};
    use crate::persistence::connection::test_source;

    /// Bootstrapped store over a fresh in-memory database.
    pub(crate) async fn ready_store() -> (QuoteStore, ConnectionSource) {
        let source = test_source().await;
        let readiness = Readiness::new();
        let bootstrapper = Bootstrapper::new(source.clone(), readiness.clone());
        let Ok(()) = bootstrapper.prepare().await else {
            panic!("bootstrap failed");
        };
        (QuoteStore::new(source.clone(), readiness), source)
    }

    fn new_quote(text: &str, author: Option<&str>) -> NewQuote {
        let Ok(quote) = NewQuote::new(Some(text.to_string()), author.map(str::to_string)) else {
            panic!("invalid test quote");
        };
        quote
    }

    #[tokio::test]
    async fn refuses_work_before_bootstrap() {
        let source = test_source().await;
        let store = QuoteStore::new(source, Readiness::new());

        assert!(matches!(store.list_all().await, Err(StoreError::NotReady)));
        assert!(matches!(
            store.insert(&new_quote("T", None)).await,
            Err(StoreError::NotReady)
        ));
    }

    #[tokio::test]
    async fn lists_seed_rows() {
        let (store, _) = ready_store().await;
        let Ok(quotes) = store.list_all().await else {
            panic!("list failed");
        };
        assert!(!quotes.is_empty());
        assert!(quotes.iter().all(|q| q.quote_id.is_some() && !q.text.is_empty()));
    }

    #[tokio::test]
    async fn insert_then_list_round_trip() {
        let (store, _) = ready_store().await;

        let Ok(inserted) = store.insert(&new_quote("T", Some("A"))).await else {
            panic!("insert failed");
        };
        assert!(inserted.quote_id.is_some());
        assert_eq!(inserted.text, "T");
        assert_eq!(inserted.author, "A");

        let Ok(quotes) = store.list_all().await else {
            panic!("list failed");
        };
        let matching: Vec<&Quote> = quotes
            .iter()
            .filter(|q| q.text == "T" && q.author == "A")
            .collect();
        assert_eq!(matching, vec![&inserted]);
    }

    #[tokio::test]
    async fn default_author_is_persisted() {
        let (store, _) = ready_store().await;
        let Ok(inserted) = store.insert(&new_quote("no author", None)).await else {
            panic!("insert failed");
        };
        assert_eq!(inserted.author, "Unknown");

        let Ok(Some(latest)) = store.latest().await else {
            panic!("latest failed");
        };
        assert_eq!(latest, inserted);
    }

    #[tokio::test]
    async fn text_is_bound_not_interpolated() {
        let (store, _) = ready_store().await;
        let hostile = "'); DROP TABLE quotes; --";
        let Ok(inserted) = store.insert(&new_quote(hostile, Some("x'y"))).await else {
            panic!("insert failed");
        };
        assert_eq!(inserted.text, hostile);
        assert_eq!(inserted.author, "x'y");
        assert!(store.list_all().await.is_ok());
    }

    #[tokio::test]
    async fn identifiers_increase() {
        let (store, _) = ready_store().await;
        let Ok(first) = store.insert(&new_quote("one", None)).await else {
            panic!("insert failed");
        };
        let Ok(second) = store.insert(&new_quote("two", None)).await else {
            panic!("insert failed");
        };
        assert!(second.quote_id > first.quote_id);
    }

    #[tokio::test]
    async fn concurrent_inserts_all_land() {
        let (store, _) = ready_store().await;
        let Ok(before) = store.list_all().await else {
            panic!("list failed");
        };

        let mut handles = Vec::new();
        for n in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert(&new_quote(&format!("concurrent {n}"), None)).await
            }));
        }
        for handle in handles {
            assert!(matches!(handle.await, Ok(Ok(_))));
        }

        let Ok(after) = store.list_all().await else {
            panic!("list failed");
        };
        assert_eq!(after.len(), before.len() + 8);
    }

    #[tokio::test]
    async fn closed_source_is_a_connection_error() {
        let (store, source) = ready_store().await;
        source.close().await;
        assert!(matches!(
            store.insert(&new_quote("T", None)).await,
            Err(StoreError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn missing_table_is_a_persistence_error() {
        let source = test_source().await;
        let readiness = Readiness::new();
        let bootstrapper = Bootstrapper::new(source.clone(), readiness.clone())
            .with_schema(ScriptSource::Inline("SELECT 1;".to_string()))
            .with_seed(ScriptSource::Inline("SELECT 1;".to_string()));
        let Ok(()) = bootstrapper.prepare().await else {
            panic!("bootstrap failed");
        };
        let store = QuoteStore::new(source, readiness);

        assert!(matches!(
            store.list_all().await,
            Err(StoreError::Persistence(_))
        ));
    }
}
