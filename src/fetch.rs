use crate::{catalog::Game, config::AppConfig};
use std::{
    fs,
    io,
    path::PathBuf,
    sync::{mpsc::Sender, Arc},
    thread,
    time::Duration,
};

const CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] Box<ureq::Error>),
    #[error("read failed: {0}")]
    Read(#[from] io::Error),
    #[error("invalid catalog data: {0}")]
    Decode(#[from] serde_json::Error),
}

pub trait CatalogSource: Send + Sync {
    fn describe(&self) -> String;
    fn load(&self) -> Result<Vec<Game>, FetchError>;
}

pub struct HttpSource {
    url: String,
    user_agent: String,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(config: &AppConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout_read(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            url: config.catalog_url.clone(),
            user_agent: config.user_agent.clone(),
            agent,
        }
    }
}

impl CatalogSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn load(&self) -> Result<Vec<Game>, FetchError> {
        let response = self
            .agent
            .get(&self.url)
            .set("User-Agent", &self.user_agent)
            .set("Accept", "application/json")
            .call()
            .map_err(Box::new)?;
        let body = response.into_string()?;
        let games = serde_json::from_str::<Option<Vec<Game>>>(&body)?;
        Ok(games.unwrap_or_default())
    }
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<Game>, FetchError> {
        let raw = fs::read_to_string(&self.path)?;
        let games = serde_json::from_str::<Option<Vec<Game>>>(&raw)?;
        Ok(games.unwrap_or_default())
    }
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub games: Vec<Game>,
    pub error: Option<String>,
}

/// Single attempt. A failure degrades to an empty list plus the message the
/// caller shows to the user.
pub fn load_games(source: &dyn CatalogSource) -> FetchOutcome {
    match source.load() {
        Ok(games) => FetchOutcome { games, error: None },
        Err(err) => FetchOutcome {
            games: Vec::new(),
            error: Some(err.to_string()),
        },
    }
}

#[derive(Debug)]
pub enum FetchMessage {
    Completed(Vec<Game>),
    Failed { error: String },
}

pub fn spawn_fetch(source: Arc<dyn CatalogSource>, tx: Sender<FetchMessage>) {
    thread::spawn(move || {
        let outcome = load_games(source.as_ref());
        let message = match outcome.error {
            None => FetchMessage::Completed(outcome.games),
            Some(error) => FetchMessage::Failed { error },
        };
        let _ = tx.send(message);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn temp_catalog(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("dependo-{name}-{}.json", std::process::id()));
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn file_source_reads_catalog() {
        let path = temp_catalog("ok", r#"[{"name": "Quake"}, {"name": "Doom"}]"#);
        let outcome = load_games(&FileSource::new(&path));
        let _ = fs::remove_file(&path);
        assert!(outcome.error.is_none());
        assert_eq!(outcome.games.len(), 2);
    }

    #[test]
    fn null_body_is_an_empty_catalog() {
        let path = temp_catalog("null", "null");
        let outcome = load_games(&FileSource::new(&path));
        let _ = fs::remove_file(&path);
        assert!(outcome.error.is_none());
        assert!(outcome.games.is_empty());
    }

    #[test]
    fn decode_failure_degrades_to_empty() {
        let path = temp_catalog("bad", r#"{"games": "nope"}"#);
        let outcome = load_games(&FileSource::new(&path));
        let _ = fs::remove_file(&path);
        assert!(outcome.games.is_empty());
        let error = outcome.error.unwrap();
        assert!(error.starts_with("invalid catalog data"), "{error}");
    }

    #[test]
    fn missing_file_degrades_to_empty() {
        let source = FileSource::new("/nonexistent/dependo/games.json");
        let outcome = load_games(&source);
        assert!(outcome.games.is_empty());
        assert!(outcome.error.unwrap().starts_with("read failed"));
    }

    #[test]
    fn unreachable_host_degrades_to_empty() {
        let config = AppConfig {
            catalog_url: "http://127.0.0.1:9/games.json".to_string(),
            timeout_secs: 2,
            ..AppConfig::default()
        };
        let outcome = load_games(&HttpSource::new(&config));
        assert!(outcome.games.is_empty());
        assert!(outcome.error.unwrap().starts_with("request failed"));
    }

    #[test]
    fn worker_posts_failure_message() {
        let (tx, rx) = mpsc::channel();
        spawn_fetch(Arc::new(FileSource::new("/nonexistent/games.json")), tx);
        let message = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(message, FetchMessage::Failed { .. }));
    }
}
