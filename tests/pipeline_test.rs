//! End-to-end tests of the request pipeline gates.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use lyrics_proxy::config::ProxyConfig;
use lyrics_proxy::{HttpServer, Shutdown};

mod common;

const SECRET: &str = "s3cret";

fn test_config(upstream_addr: SocketAddr) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.upstream.base_url = format!("http://{}", upstream_addr);
    config.upstream.bearer_token = Some("test-token".to_string());
    config.auth.shared_secret = Some(SECRET.to_string());
    config
}

/// Boot the proxy on an ephemeral port.
async fn start_proxy(mut config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_missing_or_wrong_secret_is_rejected_on_every_path() {
    let upstream = common::start_mock_upstream(|_| async { (200, common::song_envelope(1)) }).await;
    let (proxy, shutdown) = start_proxy(test_config(upstream)).await;
    let client = client();

    for path in ["/", "/song/1", "/artist/1", "/unknown"] {
        let res = client
            .get(format!("http://{}{}", proxy, path))
            .send()
            .await
            .expect("Proxy unreachable");
        assert_eq!(res.status(), 401, "no secret on {}", path);
        assert_eq!(res.text().await.unwrap(), r#"{"error":"Unauthorized"}"#);
    }

    let res = client
        .get(format!("http://{}/song/1", proxy))
        .header("x-proxy-secret", "wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    shutdown.trigger();
}

#[tokio::test]
async fn test_unconfigured_secret_rejects_everything() {
    let upstream = common::start_mock_upstream(|_| async { (200, common::song_envelope(1)) }).await;
    let mut config = test_config(upstream);
    config.auth.shared_secret = None;
    let (proxy, shutdown) = start_proxy(config).await;

    let res = client()
        .get(format!("http://{}/song/1", proxy))
        .header("x-proxy-secret", SECRET)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    shutdown.trigger();
}

#[tokio::test]
async fn test_root_serves_endpoint_listing() {
    let upstream = common::start_mock_upstream(|_| async { (200, String::new()) }).await;
    let (proxy, shutdown) = start_proxy(test_config(upstream)).await;

    let res = client()
        .get(format!("http://{}/", proxy))
        .header("x-proxy-secret", SECRET)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["message"].is_string());
    assert_eq!(body["endpoints"]["song"], "/song/{id}");
    assert_eq!(body["endpoints"]["artist"], "/artist/{id}");

    shutdown.trigger();
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let upstream = common::start_mock_upstream(|_| async { (200, String::new()) }).await;
    let (proxy, shutdown) = start_proxy(test_config(upstream)).await;
    let client = client();

    for path in ["/unknown", "/song/abc", "/song/123/", "/songs/123"] {
        let res = client
            .get(format!("http://{}{}", proxy, path))
            .header("x-proxy-secret", SECRET)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 404, "path {}", path);
        let body: serde_json::Value = res.json().await.unwrap();
        assert!(
            body["error"].as_str().unwrap().starts_with("Not found"),
            "path {}",
            path
        );
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_song_fetch_flattens_description() {
    let upstream =
        common::start_mock_upstream(|path| async move {
            assert_eq!(path, "/songs/123");
            (200, common::song_envelope(123))
        })
        .await;
    let (proxy, shutdown) = start_proxy(test_config(upstream)).await;

    let res = client()
        .get(format!("http://{}/song/123", proxy))
        .header("x-proxy-secret", SECRET)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers().get("x-proxy-cache").unwrap(), "MISS");
    assert_eq!(
        res.headers().get("cache-control").unwrap(),
        "public, s-maxage=86400, max-age=3600"
    );

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["id"], 123);
    assert_eq!(body["album"]["artist"], "Tester");
    assert_eq!(
        body["description"],
        serde_json::json!([
            {"type": "paragraph", "spans": [
                {"text": "Plain ", "styles": [], "link": null},
                {"text": "bold", "styles": ["bold"], "link": null}
            ]}
        ])
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_second_fetch_is_served_from_cache() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let upstream = common::start_mock_upstream(move |_| {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (200, common::song_envelope(123))
        }
    })
    .await;
    let (proxy, shutdown) = start_proxy(test_config(upstream)).await;
    let client = client();

    let first = client
        .get(format!("http://{}/song/123", proxy))
        .header("x-proxy-secret", SECRET)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 200);
    assert_eq!(first.headers().get("x-proxy-cache").unwrap(), "MISS");
    let first_body = first.bytes().await.unwrap();

    // The cache write is detached; give it a moment to land.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let second = client
        .get(format!("http://{}/song/123", proxy))
        .header("x-proxy-secret", SECRET)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), 200);
    assert_eq!(second.headers().get("x-proxy-cache").unwrap(), "HIT");
    assert_eq!(
        second.headers().get("cache-control").unwrap(),
        "public, s-maxage=86400, max-age=3600"
    );
    let second_body = second.bytes().await.unwrap();

    assert_eq!(first_body, second_body, "Replay must be byte-identical");
    assert_eq!(call_count.load(Ordering::SeqCst), 1, "One upstream call only");

    shutdown.trigger();
}

#[tokio::test]
async fn test_cached_response_still_requires_secret() {
    let upstream = common::start_mock_upstream(|_| async { (200, common::song_envelope(5)) }).await;
    let (proxy, shutdown) = start_proxy(test_config(upstream)).await;
    let client = client();

    let warm = client
        .get(format!("http://{}/song/5", proxy))
        .header("x-proxy-secret", SECRET)
        .send()
        .await
        .unwrap();
    assert_eq!(warm.status(), 200);
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    // The secret gate runs ahead of the cache lookup.
    let res = client
        .get(format!("http://{}/song/5", proxy))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    shutdown.trigger();
}

#[tokio::test]
async fn test_artist_fetch() {
    let upstream =
        common::start_mock_upstream(|path| async move {
            assert_eq!(path, "/artists/42");
            (200, common::artist_envelope(42))
        })
        .await;
    let (proxy, shutdown) = start_proxy(test_config(upstream)).await;

    let res = client()
        .get(format!("http://{}/artist/42", proxy))
        .header("x-proxy-secret", SECRET)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], "Tester");
    assert_eq!(body["alternate_names"][0], "The Tester");
    assert_eq!(body["description"][0]["type"], "paragraph");

    shutdown.trigger();
}

#[tokio::test]
async fn test_preflight_and_method_gate() {
    let upstream = common::start_mock_upstream(|_| async { (200, String::new()) }).await;
    let (proxy, shutdown) = start_proxy(test_config(upstream)).await;
    let client = client();

    let preflight = client
        .request(reqwest::Method::OPTIONS, format!("http://{}/song/1", proxy))
        .header("x-proxy-secret", SECRET)
        .send()
        .await
        .unwrap();
    assert_eq!(preflight.status(), 200);
    assert_eq!(
        preflight
            .headers()
            .get("access-control-allow-methods")
            .unwrap(),
        "GET, OPTIONS"
    );
    assert_eq!(
        preflight.headers().get("access-control-max-age").unwrap(),
        "86400"
    );

    let post = client
        .post(format!("http://{}/song/1", proxy))
        .header("x-proxy-secret", SECRET)
        .send()
        .await
        .unwrap();
    assert_eq!(post.status(), 405);
    assert_eq!(post.text().await.unwrap(), "Method not allowed");

    shutdown.trigger();
}

#[tokio::test]
async fn test_rate_limit_exhaustion() {
    let upstream = common::start_mock_upstream(|_| async { (200, String::new()) }).await;
    let mut config = test_config(upstream);
    config.rate_limit.enabled = true;
    config.rate_limit.requests_per_second = 1;
    config.rate_limit.burst_size = 2;
    let (proxy, shutdown) = start_proxy(config).await;
    let client = client();

    for _ in 0..2 {
        let res = client
            .get(format!("http://{}/", proxy))
            .header("x-proxy-secret", SECRET)
            .header("x-real-ip", "203.0.113.9")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }

    let res = client
        .get(format!("http://{}/", proxy))
        .header("x-proxy-secret", SECRET)
        .header("x-real-ip", "203.0.113.9")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 429);
    assert_eq!(res.text().await.unwrap(), r#"{"error":"Too Many Requests"}"#);

    // A different client key is unaffected.
    let res = client
        .get(format!("http://{}/", proxy))
        .header("x-proxy-secret", SECRET)
        .header("x-real-ip", "198.51.100.7")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_error_surfaces_as_500() {
    let upstream = common::start_mock_upstream(|_| async {
        (404, r#"{"error":"song not found"}"#.to_string())
    })
    .await;
    let (proxy, shutdown) = start_proxy(test_config(upstream)).await;

    let res = client()
        .get(format!("http://{}/song/999", proxy))
        .header("x-proxy-secret", SECRET)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("404"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_missing_token_is_a_configuration_error() {
    let upstream = common::start_mock_upstream(|_| async { (200, String::new()) }).await;
    let mut config = test_config(upstream);
    config.upstream.bearer_token = None;
    let (proxy, shutdown) = start_proxy(config).await;

    let res = client()
        .get(format!("http://{}/song/1", proxy))
        .header("x-proxy-secret", SECRET)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("configuration"));

    shutdown.trigger();
}
