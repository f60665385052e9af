//! Local HTTP stub and config helpers shared by the unit tests.

use crate::config::ScraperConfig;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub user_agent: String,
    pub referer: String,
}

/// A tiny_http server answering every request with the same response.
pub struct StubServer {
    pub base_url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl StubServer {
    pub fn spawn(status: u16, content_type: &str, body: &str) -> Self {
        Self::spawn_with(status, Some(content_type), body)
    }

    /// Same as [`StubServer::spawn`] but the response has no Content-Type.
    pub fn spawn_without_content_type(status: u16, body: &str) -> Self {
        Self::spawn_with(status, None, body)
    }

    fn spawn_with(status: u16, content_type: Option<&str>, body: &str) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start stub server");
        let base_url = format!("http://{}", server.server_addr());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let content_type = content_type.map(str::to_string);
        let body = body.to_string();
        let log = Arc::clone(&seen);
        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let header = |name: &'static str| {
                    request
                        .headers()
                        .iter()
                        .find(|h| h.field.equiv(name))
                        .map(|h| h.value.as_str().to_string())
                        .unwrap_or_default()
                };
                let entry = SeenRequest {
                    path: request.url().to_string(),
                    user_agent: header("User-Agent"),
                    referer: header("Referer"),
                };
                log.lock().unwrap().push(entry);

                let mut response = tiny_http::Response::from_data(body.clone().into_bytes())
                    .with_status_code(status);
                if let Some(content_type) = &content_type {
                    response = response.with_header(
                        tiny_http::Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes())
                            .expect("valid content type header"),
                    );
                }
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            seen,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Default config pointed at `base_url` with the politeness delay disabled.
pub fn config_for(base_url: &str) -> ScraperConfig {
    let mut config = ScraperConfig::default();
    config.set_origin(base_url).expect("valid stub origin");
    config.delay_base_secs = 0.0;
    config.delay_jitter_secs = 0.0;
    config.timeout_secs = 5;
    config
}
