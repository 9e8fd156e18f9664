#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::fs;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use async_trait::async_trait;
use spotizerr_auth::{AuthError, CredentialFile, Prompt, SessionCapture, Settings};
use tiny_http::{Response, Server};

pub const CONFIG_PATH: &str = "/api/credentials/spotify_api_config";
pub const BLOB: &str = r#"{"username":"someone","auth_type":1,"auth_data":"c2VjcmV0"}"#;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is not JSON")
    }
}

#[derive(Debug, Clone)]
pub struct Route {
    method: &'static str,
    path: String,
    status: u16,
    body: String,
    delay: Duration,
}

impl Route {
    pub fn new(method: &'static str, path: &str, status: u16, body: &str) -> Route {
        Route {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Holds the response back for `delay` after the request arrived.
    pub fn delayed(mut self, delay: Duration) -> Route {
        self.delay = delay;
        self
    }

    pub fn configured() -> Route {
        Route::new(
            "GET",
            CONFIG_PATH,
            200,
            r#"{"client_id":"abc","client_secret":"def"}"#,
        )
    }

    pub fn unconfigured() -> Route {
        Route::new("GET", CONFIG_PATH, 200, r#"{"client_id":"","client_secret":""}"#)
    }

    pub fn put_config(status: u16) -> Route {
        Route::new("PUT", CONFIG_PATH, status, r#"{"message":"ok"}"#)
    }

    pub fn register(account: &str, status: u16, body: &str) -> Route {
        Route::new(
            "POST",
            &format!("/api/credentials/spotify/{account}"),
            status,
            body,
        )
    }
}

/// A stand-in Spotizerr server answering from a fixed route table and
/// recording every request it sees.
pub struct MockServer {
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    pub base_url: String,
}

impl MockServer {
    pub fn start(routes: Vec<Route>) -> MockServer {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("mock server"));
        let port = server
            .server_addr()
            .to_ip()
            .expect("mock server has an IP address")
            .port();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let handle = {
            let server = Arc::clone(&server);
            let requests = Arc::clone(&requests);
            std::thread::spawn(move || {
                for mut request in server.incoming_requests() {
                    let mut body = String::new();
                    let _ = request.as_reader().read_to_string(&mut body);
                    let method = request.method().to_string();
                    let path = request.url().to_string();

                    let route = routes
                        .iter()
                        .find(|r| r.method == method && r.path == path);
                    let response = route
                        .map(|r| Response::from_string(r.body.clone()).with_status_code(r.status))
                        .unwrap_or_else(|| {
                            Response::from_string("not found").with_status_code(404)
                        });

                    requests.lock().unwrap().push(RecordedRequest { method, path, body });
                    if let Some(route) = route {
                        std::thread::sleep(route.delay);
                    }
                    let _ = request.respond(response);
                }
            })
        };

        MockServer {
            server,
            handle: Some(handle),
            requests,
            base_url: format!("http://127.0.0.1:{port}"),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_with(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Answers questions from a fixed script. Running out of answers behaves
/// like the user pressing Ctrl-C.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> ScriptedPrompt {
        ScriptedPrompt {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }

    pub fn asked_containing(&self, needle: &str) -> usize {
        self.asked.iter().filter(|q| q.contains(needle)).count()
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn ask(&mut self, question: &str) -> Result<String, AuthError> {
        self.asked.push(question.to_string());
        self.answers.pop_front().ok_or(AuthError::Cancelled)
    }
}

/// Capture that writes a canned blob, or nothing at all.
#[derive(Debug, Default)]
pub struct FakeCapture {
    blob: Option<String>,
    calls: Cell<usize>,
}

impl FakeCapture {
    pub fn writing(blob: &str) -> FakeCapture {
        FakeCapture {
            blob: Some(blob.to_string()),
            calls: Cell::new(0),
        }
    }

    pub fn failing() -> FakeCapture {
        FakeCapture::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait(?Send)]
impl SessionCapture for FakeCapture {
    async fn capture(&self, file: &CredentialFile) -> Result<(), AuthError> {
        self.calls.set(self.calls.get() + 1);
        file.remove_stale()?;
        if let Some(blob) = &self.blob {
            fs::write(file.path(), blob).expect("write fake credentials");
        }
        Ok(())
    }
}

/// An interrupt that never fires.
pub fn never() -> std::future::Pending<()> {
    std::future::pending()
}

pub fn settings(base_url: &str, dir: &tempfile::TempDir) -> Settings {
    Settings {
        default_base_url: base_url.to_string(),
        device_name: "test-device".to_string(),
        credentials_dir: dir.path().to_path_buf(),
    }
}
