use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;

use crate::domain::session::Session;
use crate::error::{AppError, AppResult};

pub type SessionSnapshot = Option<Arc<Session>>;

/// Shared holder of the current identity.
///
/// Readers take an immutable snapshot; login and logout publish a new value
/// that subscribers observe through a `watch` receiver.
#[derive(Clone)]
pub struct SessionContext {
    sender: Arc<watch::Sender<SessionSnapshot>>,
}

impl SessionContext {
    pub fn new(initial: Option<Session>) -> Self {
        let (sender, _) = watch::channel(initial.map(Arc::new));
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.sender.borrow().clone()
    }

    pub fn require(&self) -> AppResult<Arc<Session>> {
        self.snapshot()
            .ok_or_else(|| AppError::Session("not logged in; run `tiqfix login` first".to_string()))
    }

    pub fn login(&self, session: Session) {
        tracing::debug!(email = %session.email, "session started");
        self.sender.send_replace(Some(Arc::new(session)));
    }

    /// Clears the identity, returning the one that was active.
    pub fn logout(&self) -> SessionSnapshot {
        let previous = self.sender.send_replace(None);
        if let Some(session) = &previous {
            tracing::debug!(email = %session.email, "session ended");
        }
        previous
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.sender.subscribe()
    }
}

/// Keeps the session between CLI invocations.
pub struct SessionStore {
    file_path: PathBuf,
}

impl SessionStore {
    pub fn new(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    pub fn load(&self) -> AppResult<Option<Session>> {
        let contents = match fs::read_to_string(&self.file_path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AppError::Io(err)),
        };
        let session = match serde_json::from_str::<Session>(&contents) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(
                    path = %self.file_path.display(),
                    %err,
                    "unreadable session file, discarding"
                );
                self.clear()?;
                return Ok(None);
            }
        };

        if session.is_expired(Utc::now()) {
            tracing::info!(email = %session.email, "stored session expired, discarding");
            self.clear()?;
            return Ok(None);
        }
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> AppResult<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(session)
            .map_err(|err| AppError::Session(format!("failed to write session: {err}")))?;
        fs::write(&self.file_path, data)?;
        Ok(())
    }

    /// Mirrors a published snapshot: saves a session, clears on logout.
    pub fn sync(&self, snapshot: &SessionSnapshot) -> AppResult<()> {
        match snapshot {
            Some(session) => self.save(session),
            None => self.clear(),
        }
    }

    pub fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.file_path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::Io(err)),
        }
    }
}
