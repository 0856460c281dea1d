use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct StallStatusEntry {
    stall_id: String,
    state: String,
    record: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    as_of: String,
    stalls: Vec<StallStatusEntry>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("family_dashboard_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/health")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_family_dashboard"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn status(client: &Client, base_url: &str, as_of: &str) -> StatusResponse {
    client
        .get(format!("{base_url}/api/barn/status?as_of={as_of}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

fn stall<'a>(response: &'a StatusResponse, id: &str) -> &'a StallStatusEntry {
    response
        .stalls
        .iter()
        .find(|entry| entry.stall_id == id)
        .expect("stall listed")
}

#[tokio::test]
async fn http_occupancy_drives_stall_status() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/barn/occupancies", server.base_url))
        .json(&serde_json::json!({
            "stall_id": "S07",
            "horse_name": "Biscuit",
            "owner_name": "Lee",
            "arrival_date": "2024-01-01",
            "departure_date": "2024-03-01"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let during = status(&client, &server.base_url, "2024-02-15").await;
    assert_eq!(during.as_of, "2024-02-15");
    let entry = stall(&during, "S07");
    assert_eq!(entry.state, "occupied");
    assert_eq!(
        entry.record.as_ref().and_then(|r| r["horse_name"].as_str()),
        Some("Biscuit")
    );

    let departed = status(&client, &server.base_url, "2024-03-01").await;
    assert_eq!(stall(&departed, "S07").state, "empty");

    let before = status(&client, &server.base_url, "2023-06-01").await;
    assert_eq!(stall(&before, "S07").state, "scheduled");
}

#[tokio::test]
async fn http_barn_form_redirects_back_to_view() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let response = client
        .post(format!("{}/barn/occupancies", server.base_url))
        .form(&[
            ("stall_id", "S11"),
            ("horse_name", "Maple"),
            ("arrival_date", "2030-05-01"),
            ("view_as_of", "2030-04-01"),
            ("view_filter", "scheduled"),
            ("view_stall", "https://elsewhere.example"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()["location"],
        "/barn?as_of=2030-04-01&filter=scheduled"
    );

    let page = client
        .get(format!("{}/barn?as_of=2030-04-01&stall=S11", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Maple"));
    assert!(page.contains("History &middot; Stall 11"));
}
