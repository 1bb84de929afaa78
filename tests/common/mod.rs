//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Start a programmable mock upstream API on an ephemeral port.
///
/// The handler receives the request path and answers with a status and
/// a JSON body.
pub async fn start_mock_upstream<F, Fut>(handler: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        let path = read_request_path(&mut socket).await;
                        let (status, body) = handler(path).await;
                        let status_text = match status {
                            200 => "200 OK",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Read the request head and return the path from the request line.
async fn read_request_path(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            Err(_) => break,
        }
    }

    String::from_utf8_lossy(&buf)
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string()
}

/// A canned upstream song envelope with a rich-text description.
#[allow(dead_code)]
pub fn song_envelope(id: u64) -> String {
    serde_json::json!({
        "response": {
            "song": {
                "id": id,
                "title": "Test Song",
                "full_title": "Test Song by Tester",
                "url": format!("https://lyrics.example.com/songs/{}", id),
                "release_date": "2021-05-01",
                "artist_names": "Tester",
                "song_art_image_url": "https://images.example.com/song.png",
                "album": {
                    "id": 7,
                    "name": "Test Album",
                    "cover_art_url": "https://images.example.com/album.png",
                    "primary_artists": [{"name": "Tester"}, {"name": "Guest"}]
                },
                "description": {
                    "dom": {
                        "tag": "root",
                        "children": [
                            {"tag": "p", "children": [
                                "Plain ",
                                {"tag": "b", "children": ["bold"]}
                            ]}
                        ]
                    }
                }
            }
        }
    })
    .to_string()
}

/// A canned upstream artist envelope.
#[allow(dead_code)]
pub fn artist_envelope(id: u64) -> String {
    serde_json::json!({
        "response": {
            "artist": {
                "id": id,
                "name": "Tester",
                "url": format!("https://lyrics.example.com/artists/{}", id),
                "image_url": "https://images.example.com/artist.png",
                "alternate_names": ["The Tester"],
                "description": {
                    "dom": {"tag": "p", "children": ["A test artist."]}
                }
            }
        }
    })
    .to_string()
}
