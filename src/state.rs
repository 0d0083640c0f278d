use crate::config::Config;
use crate::session::Session;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(config: Config, session: Session) -> Self {
        Self {
            config: Arc::new(config),
            session: Arc::new(Mutex::new(session)),
        }
    }
}
