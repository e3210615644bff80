//! HTTP adapters against a canned local server

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use common::{BOB, bob};
use parking_lot::Mutex;
use profile_editor::infrastructure::ApiClient;
use profile_editor::infrastructure::services::{
    ProfileApiAdapter, ProfileStore, SessionApiAdapter, SessionService,
};
use profile_editor::{AuthError, StoreError};
use profile_model::Profile;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

const PROFILE_PATH: &str = "/api/v1/profiles/bob%40x.com";
const AVATAR_PATH: &str = "/api/v1/profiles/bob%40x.com/avatar";
const LOGOUT_PATH: &str = "/api/v1/auth/logout";

#[derive(Debug, Clone)]
struct SeenRequest {
    method: String,
    path: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl SeenRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// `(method, path, status, body)`
type Route = (&'static str, &'static str, u16, String);

/// Answers each request from `routes` (404 otherwise) and closes the socket
struct CannedServer {
    base_url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl CannedServer {
    async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        let recorder = seen.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = routes.clone();
                let recorder = recorder.clone();
                tokio::spawn(async move { answer(stream, &routes, &recorder).await });
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            seen,
        }
    }

    fn client(&self) -> Arc<ApiClient> {
        Arc::new(ApiClient::new(self.base_url.as_str()).unwrap())
    }

    fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().clone()
    }
}

async fn answer(
    stream: TcpStream,
    routes: &[Route],
    recorder: &Mutex<Vec<SeenRequest>>,
) {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await.unwrap();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let length = headers
        .get("content-length")
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body).await.unwrap();

    let (status, payload) = routes
        .iter()
        .find(|(m, p, _, _)| *m == method && *p == path)
        .map(|(_, _, status, body)| (*status, body.clone()))
        .unwrap_or((404, r#"{"error":"not found"}"#.to_string()));

    recorder.lock().push(SeenRequest {
        method,
        path,
        headers,
        body,
    });

    let response = format!(
        "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        payload.len()
    );
    let mut stream = reader.into_inner();
    stream.write_all(response.as_bytes()).await.unwrap();
    stream.shutdown().await.ok();
}

fn webp_bytes() -> Bytes {
    Bytes::from_static(b"RIFF\x10\x00\x00\x00WEBPVP8L\x00\x00")
}

#[tokio::test]
async fn get_decodes_profile_envelope() {
    let envelope = serde_json::json!({ "success": true, "data": bob() }).to_string();
    let server = CannedServer::start(vec![("GET", PROFILE_PATH, 200, envelope)]).await;
    let client = server.client();
    client.set_token(Some("t0k".into())).await;
    let store = ProfileApiAdapter::new(client);

    assert_eq!(store.get(BOB).await, Ok(Some(bob())));

    let seen = server.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].header("authorization"), Some("Bearer t0k"));
}

#[tokio::test]
async fn missing_profile_is_none() {
    let server = CannedServer::start(Vec::new()).await;
    let store = ProfileApiAdapter::new(server.client());

    assert_eq!(store.get(BOB).await, Ok(None));
    assert_eq!(server.seen()[0].path, PROFILE_PATH);
}

#[tokio::test]
async fn avatar_is_uploaded_before_profile() {
    let server = CannedServer::start(vec![
        ("PUT", AVATAR_PATH, 204, String::new()),
        ("PUT", PROFILE_PATH, 204, String::new()),
    ])
    .await;
    let store = ProfileApiAdapter::new(server.client());
    let edited = bob().with_full_name("Robert");

    store
        .update(edited.clone(), Some(webp_bytes()))
        .await
        .unwrap();

    let seen = server.seen();
    let order: Vec<_> = seen
        .iter()
        .map(|request| (request.method.as_str(), request.path.as_str()))
        .collect();
    assert_eq!(order, vec![("PUT", AVATAR_PATH), ("PUT", PROFILE_PATH)]);

    assert_eq!(seen[0].header("content-type"), Some("image/webp"));
    assert_eq!(seen[0].body, webp_bytes().to_vec());
    let submitted: Profile = serde_json::from_slice(&seen[1].body).unwrap();
    assert_eq!(submitted, edited);
}

#[tokio::test]
async fn failed_avatar_upload_skips_profile_write() {
    let server = CannedServer::start(vec![
        ("PUT", AVATAR_PATH, 500, "disk full".to_string()),
        ("PUT", PROFILE_PATH, 204, String::new()),
    ])
    .await;
    let store = ProfileApiAdapter::new(server.client());

    let result = store.update(bob(), Some(webp_bytes())).await;

    assert_eq!(
        result,
        Err(StoreError::Rejected {
            status: 500,
            message: "disk full".into()
        })
    );
    assert_eq!(server.seen().len(), 1);
}

#[tokio::test]
async fn logout_drops_token_when_server_fails() {
    let server =
        CannedServer::start(vec![("POST", LOGOUT_PATH, 500, "boom".to_string())]).await;
    let client = server.client();
    client.set_token(Some("t0k".into())).await;
    let session = SessionApiAdapter::new(client.clone());

    let result = session.sign_out().await;

    assert!(matches!(result, Err(AuthError::Internal(_))));
    assert_eq!(client.get_token().await, None);
    let seen = server.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].header("authorization"), Some("Bearer t0k"));
}
