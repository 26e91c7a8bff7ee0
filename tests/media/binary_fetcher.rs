use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mediarelay::config::FetchConfig;
use mediarelay::media::{DEFAULT_MIME_TYPE, MediaType};
use mediarelay::{BinaryFetcher, FetchError, MediaFetcher};

fn fetcher(config: FetchConfig) -> BinaryFetcher {
    BinaryFetcher::new(&config).unwrap()
}

#[tokio::test]
async fn payload_is_base64_with_reported_content_type() {
    let server = MockServer::start().await;
    let bytes = b"\x89PNG\r\n\x1a\nfake image body".to_vec();
    Mock::given(method("GET"))
        .and(path("/img/cover.png"))
        .and(header_exists("user-agent"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(bytes.clone()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let media = fetcher(FetchConfig::default())
        .fetch(&format!("{}/img/cover.png", server.uri()))
        .await
        .unwrap();

    assert_eq!(media.mime_type, "image/png");
    assert_eq!(media.media_type(), MediaType::Image);
    assert_eq!(STANDARD.decode(&media.base64).unwrap(), bytes);
    assert_eq!(media.decoded_len(), bytes.len());

    let requests = server.received_requests().await.unwrap();
    let headers = &requests[0].headers;
    assert_eq!(headers.get("accept").unwrap(), "image/*, video/*");
    assert_eq!(headers.get("accept-language").unwrap(), "en-US,en;q=0.9");
}

#[tokio::test]
async fn missing_content_type_falls_back_to_octet_stream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blob"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1_u8, 2, 3]))
        .mount(&server)
        .await;

    let media = fetcher(FetchConfig::default())
        .fetch(&format!("{}/blob", server.uri()))
        .await
        .unwrap();

    assert_eq!(media.mime_type, DEFAULT_MIME_TYPE);
    assert_eq!(media.base64, "AQID");
}

#[tokio::test]
async fn error_status_is_a_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.mp4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetcher(FetchConfig::default())
        .fetch(&format!("{}/gone.mp4", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[tokio::test]
async fn declared_length_over_ceiling_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/big.mp4"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "video/mp4")
                .set_body_bytes(vec![0_u8; 64]),
        )
        .mount(&server)
        .await;

    let config = FetchConfig {
        max_body_bytes: 16,
        ..FetchConfig::default()
    };
    let err = fetcher(config)
        .fetch(&format!("{}/big.mp4", server.uri()))
        .await
        .unwrap_err();

    match err {
        FetchError::TooLarge { limit, received } => {
            assert_eq!(limit, 16);
            assert_eq!(received, 64);
        }
        other => panic!("expected TooLarge, got {other:?}"),
    }
}

#[tokio::test]
async fn body_exactly_at_ceiling_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/edge.mp4"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "video/mp4")
                .set_body_bytes(vec![0_u8; 16]),
        )
        .mount(&server)
        .await;

    let config = FetchConfig {
        max_body_bytes: 16,
        ..FetchConfig::default()
    };
    let media = fetcher(config)
        .fetch(&format!("{}/edge.mp4", server.uri()))
        .await
        .unwrap();

    assert_eq!(media.decoded_len(), 16);
}

async fn mount_redirect_chain(server: &MockServer, hops: usize) {
    for hop in 0..hops {
        Mock::given(method("GET"))
            .and(path(format!("/hop/{hop}")))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", format!("{}/hop/{}", server.uri(), hop + 1)),
            )
            .mount(server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(format!("/hop/{hops}")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "video/mp4")
                .set_body_bytes(vec![0_u8, 0, 0]),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn redirects_within_limit_are_followed() {
    let server = MockServer::start().await;
    mount_redirect_chain(&server, 2).await;

    let config = FetchConfig {
        max_redirects: 3,
        ..FetchConfig::default()
    };
    let media = fetcher(config)
        .fetch(&format!("{}/hop/0", server.uri()))
        .await
        .unwrap();

    assert_eq!(media.base64, "AAAA");
}

#[tokio::test]
async fn redirect_chain_over_limit_fails() {
    let server = MockServer::start().await;
    mount_redirect_chain(&server, 5).await;

    let config = FetchConfig {
        max_redirects: 2,
        ..FetchConfig::default()
    };
    let err = fetcher(config)
        .fetch(&format!("{}/hop/0", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::TooManyRedirects(_)), "got {err:?}");
}

#[tokio::test]
async fn stalled_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.mp4"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let config = FetchConfig {
        timeout_secs: 1,
        ..FetchConfig::default()
    };
    let err = fetcher(config)
        .fetch(&format!("{}/slow.mp4", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Timeout(_)), "got {err:?}");
}
