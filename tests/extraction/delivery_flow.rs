use std::sync::Arc;

use super::stubs::{self, RecordingMessage, StubFetcher, StubResolver, TIKTOK_POST};
use mediarelay::{LinkResolver, MediaExtractor, Platform, ResolvedLinks};

fn extractor_with(
    platform: Platform,
    resolver: Arc<StubResolver>,
    fetcher: Arc<StubFetcher>,
) -> MediaExtractor {
    let links = LinkResolver::default().with_resolver(platform, resolver);
    MediaExtractor::new(links, fetcher)
}

#[tokio::test]
async fn tiktok_post_is_resolved_fetched_and_replied() {
    let resolver = Arc::new(StubResolver::returning(vec![
        "https://cdn.example/video.mp4".to_string(),
    ]));
    let fetcher = Arc::new(
        StubFetcher::new().with("https://cdn.example/video.mp4", stubs::video("AAAA")),
    );
    let extractor = extractor_with(Platform::Tiktok, Arc::clone(&resolver), Arc::clone(&fetcher));

    let message = RecordingMessage::new(&format!("check this out {TIKTOK_POST}"));
    let result = extractor.handle(&message).await;

    assert!(result.processed);
    assert_eq!(result.media_type, Some(Platform::Tiktok));
    assert_eq!(result.url.as_deref(), Some(TIKTOK_POST));
    assert!(result.error.is_none());

    let replies = message.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].mime_type, "video/mp4");
    assert_eq!(replies[0].base64, "AAAA");
    assert_eq!(resolver.calls(), 1);
    assert_eq!(message.typing_count(), 1);
}

#[tokio::test]
async fn result_serialises_with_camel_case_keys() {
    let resolver = Arc::new(StubResolver::returning("https://cdn.example/video.mp4"));
    let fetcher = Arc::new(
        StubFetcher::new().with("https://cdn.example/video.mp4", stubs::video("AAAA")),
    );
    let extractor = extractor_with(Platform::Tiktok, resolver, fetcher);

    let message = RecordingMessage::new(TIKTOK_POST);
    let result = extractor.handle(&message).await;

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "processed": true,
            "mediaType": "tiktok",
            "url": TIKTOK_POST,
        })
    );
}

#[tokio::test]
async fn scalar_and_single_item_sequence_deliver_the_same() {
    let link = "https://cdn.example/video.mp4";
    let mut outcomes = Vec::new();

    for links in [
        ResolvedLinks::from(link),
        ResolvedLinks::from(vec![link.to_string()]),
    ] {
        let fetcher = Arc::new(StubFetcher::new().with(link, stubs::video("AAAA")));
        let extractor = extractor_with(
            Platform::Tiktok,
            Arc::new(StubResolver::returning(links)),
            Arc::clone(&fetcher),
        );
        let message = RecordingMessage::new(TIKTOK_POST);
        let result = extractor.handle(&message).await;
        outcomes.push((result, message.replies(), fetcher.requested()));
    }

    assert_eq!(outcomes[0], outcomes[1]);
    assert!(outcomes[0].0.processed);
}

#[tokio::test]
async fn carousel_items_are_delivered_in_order() {
    let links: Vec<String> = (1..=3)
        .map(|i| format!("https://cdn.example/{i}.jpg"))
        .collect();
    let fetcher = links.iter().enumerate().fold(StubFetcher::new(), |f, (i, link)| {
        f.with(link, stubs::image(&format!("IMG{i}")))
    });
    let fetcher = Arc::new(fetcher);
    let extractor = extractor_with(
        Platform::Instagram,
        Arc::new(StubResolver::returning(links.clone())),
        Arc::clone(&fetcher),
    );

    let message = RecordingMessage::new("look https://www.instagram.com/p/Cabc123/");
    let result = extractor.handle(&message).await;

    assert!(result.processed);
    assert_eq!(fetcher.requested(), links);
    let payloads: Vec<_> = message.replies().into_iter().map(|m| m.base64).collect();
    assert_eq!(payloads, ["IMG0", "IMG1", "IMG2"]);
}

#[tokio::test]
async fn text_without_media_url_is_left_alone() {
    let resolver = Arc::new(StubResolver::returning("https://cdn.example/video.mp4"));
    let fetcher = Arc::new(StubFetcher::new());
    let extractor = extractor_with(Platform::Tiktok, Arc::clone(&resolver), Arc::clone(&fetcher));

    let message = RecordingMessage::new("see https://example.com/watch?v=1 when you can");
    let result = extractor.handle(&message).await;

    assert!(!result.processed);
    assert!(result.media_type.is_none());
    assert!(result.error.is_none());
    assert_eq!(resolver.calls(), 0);
    assert!(fetcher.requested().is_empty());
    assert_eq!(message.typing_count(), 0);
}

#[tokio::test]
async fn empty_or_missing_body_makes_no_calls() {
    let resolver = Arc::new(StubResolver::returning("https://cdn.example/video.mp4"));
    let fetcher = Arc::new(StubFetcher::new());
    let extractor = extractor_with(Platform::Tiktok, Arc::clone(&resolver), Arc::clone(&fetcher));

    for message in [
        RecordingMessage::new(""),
        RecordingMessage::new("   \n"),
        RecordingMessage::without_body(),
    ] {
        let result = extractor.handle(&message).await;
        assert!(!result.processed);
        assert!(result.error.is_none());
        assert_eq!(message.typing_count(), 0);
    }

    assert_eq!(resolver.calls(), 0);
    assert!(fetcher.requested().is_empty());
}

#[tokio::test]
async fn platform_without_resolver_is_skipped_silently() {
    let resolver = Arc::new(StubResolver::returning("https://cdn.example/video.mp4"));
    let fetcher = Arc::new(StubFetcher::new());
    let extractor = extractor_with(Platform::Tiktok, Arc::clone(&resolver), Arc::clone(&fetcher));

    let message = RecordingMessage::new("https://www.facebook.com/watch/?v=1234");
    let result = extractor.handle(&message).await;

    assert!(!result.processed);
    assert!(result.error.is_none());
    assert_eq!(resolver.calls(), 0);
    assert_eq!(message.typing_count(), 0);
}

#[tokio::test]
async fn concurrent_messages_are_handled_independently() {
    let fetcher = Arc::new(
        StubFetcher::new()
            .with("https://cdn.example/a.mp4", stubs::video("AAAA"))
            .with("https://cdn.example/b.jpg", stubs::image("BBBB")),
    );
    let links = LinkResolver::default()
        .with_resolver(
            Platform::Tiktok,
            Arc::new(StubResolver::returning("https://cdn.example/a.mp4")),
        )
        .with_resolver(
            Platform::Instagram,
            Arc::new(StubResolver::returning("https://cdn.example/b.jpg")),
        );
    let extractor = MediaExtractor::new(links, fetcher);

    let first = RecordingMessage::new(TIKTOK_POST);
    let second = RecordingMessage::new("https://www.instagram.com/reel/Cxyz/");
    let (a, b) = tokio::join!(extractor.handle(&first), extractor.handle(&second));

    assert!(a.processed && b.processed);
    assert_eq!(a.media_type, Some(Platform::Tiktok));
    assert_eq!(b.media_type, Some(Platform::Instagram));
    assert_eq!(first.replies()[0].base64, "AAAA");
    assert_eq!(second.replies()[0].base64, "BBBB");
}
