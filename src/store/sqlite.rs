use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use rusqlite_migration::{Migrations, M};

use crate::app::{HomeError, Result};
use crate::domain::TopSiteEntry;
use crate::store::{Favicons, SiteVisits};

/// Read-only view over the browser's site-visit database.
///
/// Queries run on tokio's blocking pool, never on the calling task.
pub struct SqliteHistory {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteHistory {
    /// Opens an existing database without write access.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Empty database with the history schema applied.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let history = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        history.run_migrations()?;
        Ok(history)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-history/up.sql"
        ))]);

        let mut conn = lock(&self.conn)?;
        migrations
            .to_latest(&mut conn)
            .map_err(|e| HomeError::Other(format!("history migration failed: {}", e)))?;

        Ok(())
    }

    /// Run `query` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, query: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || query(&*lock(&conn)?))
            .await
            .map_err(|e| HomeError::Other(format!("history query task failed: {}", e)))?
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| HomeError::Other(format!("history connection poisoned: {}", e)))
}

#[async_trait]
impl SiteVisits for SqliteHistory {
    async fn top_sites(&self, limit: usize) -> Result<Vec<TopSiteEntry>> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT url, title, thumbnail FROM history
                 ORDER BY visits DESC, last_visited DESC
                 LIMIT ?1",
            )?;

            let sites = stmt
                .query_map(params![limit as i64], |row| {
                    Ok(TopSiteEntry::new(
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<Vec<u8>>>(2)?,
                    ))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(sites)
        })
        .await
    }
}

#[async_trait]
impl Favicons for SqliteHistory {
    async fn favicon_for(&self, url: &str) -> Result<Option<Vec<u8>>> {
        let url = url.to_string();
        self.with_conn(move |conn| {
            let favicon = conn
                .query_row(
                    "SELECT favicon FROM history WHERE url = ?1",
                    params![url],
                    |row| row.get::<_, Option<Vec<u8>>>(0),
                )
                .optional()?;

            Ok(favicon.flatten())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(history: &SqliteHistory, rows: &[(&str, Option<&str>, i64, i64)]) {
        let conn = lock(&history.conn).unwrap();
        for (url, title, visits, last_visited) in rows {
            conn.execute(
                "INSERT INTO history (url, title, visits, last_visited) VALUES (?1, ?2, ?3, ?4)",
                params![url, title, visits, last_visited],
            )
            .unwrap();
        }
    }

    #[tokio::test]
    async fn test_top_sites_ordered_by_visits() {
        let history = SqliteHistory::in_memory().unwrap();
        seed(
            &history,
            &[
                ("https://a.example/", Some("A"), 3, 10),
                ("https://b.example/", Some("B"), 9, 10),
                ("https://c.example/", Some("C"), 3, 20),
            ],
        );

        let sites = history.top_sites(4).await.unwrap();
        let urls: Vec<_> = sites.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://b.example/", "https://c.example/", "https://a.example/"]
        );
    }

    #[tokio::test]
    async fn test_top_sites_respects_limit() {
        let history = SqliteHistory::in_memory().unwrap();
        seed(
            &history,
            &[
                ("https://1.example/", None, 5, 0),
                ("https://2.example/", None, 4, 0),
                ("https://3.example/", None, 3, 0),
                ("https://4.example/", None, 2, 0),
                ("https://5.example/", None, 1, 0),
            ],
        );

        assert_eq!(history.top_sites(4).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_untitled_site_uses_url() {
        let history = SqliteHistory::in_memory().unwrap();
        seed(
            &history,
            &[
                ("https://untitled.example/", None, 2, 0),
                ("https://blank.example/", Some(""), 1, 0),
            ],
        );

        let sites = history.top_sites(4).await.unwrap();
        assert_eq!(sites[0].title, "https://untitled.example/");
        assert_eq!(sites[1].title, "https://blank.example/");
    }

    #[tokio::test]
    async fn test_favicon_lookup() {
        let history = SqliteHistory::in_memory().unwrap();
        {
            let conn = lock(&history.conn).unwrap();
            conn.execute(
                "INSERT INTO history (url, favicon) VALUES (?1, ?2)",
                params!["https://icon.example/", vec![1u8, 2, 3]],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO history (url) VALUES (?1)",
                params!["https://plain.example/"],
            )
            .unwrap();
        }

        assert_eq!(
            history.favicon_for("https://icon.example/").await.unwrap(),
            Some(vec![1, 2, 3])
        );
        assert_eq!(history.favicon_for("https://plain.example/").await.unwrap(), None);
        assert_eq!(history.favicon_for("https://unknown.example/").await.unwrap(), None);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_query_waits_off_the_runtime_thread() {
        let history = Arc::new(SqliteHistory::in_memory().unwrap());
        seed(&history, &[("https://a.example/", Some("A"), 1, 0)]);

        let guard = lock(&history.conn).unwrap();
        let pending = tokio::spawn({
            let history = history.clone();
            async move { history.top_sites(4).await }
        });

        // The query is parked on the blocking pool, so this thread keeps running tasks.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(!pending.is_finished());

        drop(guard);
        let sites = pending.await.unwrap().unwrap();
        assert_eq!(sites.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_database() {
        let history = SqliteHistory::in_memory().unwrap();
        assert!(history.top_sites(4).await.unwrap().is_empty());
    }
}
