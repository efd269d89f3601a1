use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client;
use sea_orm::DatabaseConnection;
use serde_json::Value;

use common::media::MediaStore;
use server::config::{AppConfig, CorsConfig, DatabaseConfig, MediaConfig, ServerConfig};
use server::state::AppState;

/// Upload cap used by test servers; small enough to exercise rejection.
pub const TEST_MAX_UPLOAD_BYTES: u64 = 64 * 1024;

pub mod routes {
    pub const HOME: &str = "/";
    pub const NEW: &str = "/new";

    pub fn post(id: i64) -> String {
        format!("/post/{id}")
    }

    pub fn media(filename: &str) -> String {
        format!("/media/{filename}")
    }
}

/// A running test server backed by a throwaway SQLite database and media
/// directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    media_dir: PathBuf,
    _tmp: tempfile::TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
    /// `Location` header, if present.
    pub location: Option<String>,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let location = res
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            text,
            body,
            location,
        }
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let tmp = tempfile::tempdir().expect("Failed to create tempdir");

        let db_path = tmp.path().join("test.db");
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let db = server::database::init_db(&db_url)
            .await
            .expect("Failed to initialize test database");

        let media_dir = tmp.path().join("media");
        let media = Arc::new(
            MediaStore::new(media_dir.clone(), TEST_MAX_UPLOAD_BYTES)
                .await
                .expect("Failed to create media store"),
        );

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: db_url.clone(),
            },
            media: MediaConfig {
                dir: media_dir.clone(),
                max_upload_bytes: TEST_MAX_UPLOAD_BYTES,
            },
        };

        let state = AppState {
            db: db.clone(),
            media,
            config,
        };
        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Redirects stay visible so tests can assert the 303.
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build client");

        Self {
            addr,
            client,
            db,
            media_dir,
            _tmp: tmp,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn post_form(&self, path: &str, form: reqwest::multipart::Form) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    /// Create a post through the API and return the 303 response.
    pub async fn create_post(&self, title: &str, topic: &str, content: &str) -> TestResponse {
        self.post_form(routes::NEW, text_form(title, topic, content))
            .await
    }

    /// Stored media filenames on disk (excluding the temp area).
    pub fn media_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.media_dir)
            .expect("Failed to read media dir")
            .filter_map(|entry| {
                let entry = entry.ok()?;
                entry
                    .file_type()
                    .ok()?
                    .is_file()
                    .then(|| entry.file_name().to_string_lossy().into_owned())
            })
            .collect();
        names.sort();
        names
    }

    /// Leftover files in the media temp area.
    pub fn temp_files(&self) -> usize {
        std::fs::read_dir(self.media_dir.join(".tmp"))
            .expect("Failed to read media temp dir")
            .count()
    }

    pub fn media_dir(&self) -> &std::path::Path {
        &self.media_dir
    }
}

pub fn text_form(title: &str, topic: &str, content: &str) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .text("title", title.to_owned())
        .text("topic", topic.to_owned())
        .text("content", content.to_owned())
}

pub fn form_with_file(
    title: &str,
    topic: &str,
    content: &str,
    filename: &str,
    data: Vec<u8>,
) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(data).file_name(filename.to_owned());
    text_form(title, topic, content).part("media_file", part)
}
