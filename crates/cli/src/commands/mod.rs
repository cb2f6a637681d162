//! Command implementations and shared shell plumbing.

pub mod auth;
pub mod orders;
pub mod permissions;
pub mod products;
pub mod store;

use std::io::{BufRead, Write};

use storekeeper_merchant::api::BackendClient;
use storekeeper_merchant::config::AppConfig;
use storekeeper_merchant::images::ImageHostClient;
use storekeeper_merchant::session::{FileSessionStorage, Session, SessionStore};

/// Everything a command needs, built once per invocation.
pub struct Context {
    pub config: AppConfig,
    pub api: BackendClient,
    pub sessions: SessionStore,
    pub images: ImageHostClient,
}

impl Context {
    /// Load configuration and restore the persisted session.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = AppConfig::from_env()?;
        let api = BackendClient::new(&config.api_base_url);
        let sessions = SessionStore::new(
            api.clone(),
            Box::new(FileSessionStorage::new(config.session_file.clone())),
        );
        sessions.restore();

        let images = ImageHostClient::new(&config.image_host);

        Ok(Self {
            config,
            api,
            sessions,
            images,
        })
    }

    /// The signed-in session, or a friendly error telling the user to log in.
    pub fn require_session(&self) -> Result<Session, Box<dyn std::error::Error>> {
        self.sessions
            .current()
            .ok_or_else(|| "not signed in - run `storekeeper login` first".into())
    }
}

/// Print a prompt and read one trimmed line from stdin.
pub fn prompt(label: &str) -> Result<String, Box<dyn std::error::Error>> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{label}")?;
    stdout.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Prompt with a current value shown; empty input keeps it.
pub fn prompt_with_default(
    label: &str,
    current: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let input = prompt(&format!("{label} [{current}]: "))?;
    if input.is_empty() {
        Ok(current.to_string())
    } else {
        Ok(input)
    }
}
