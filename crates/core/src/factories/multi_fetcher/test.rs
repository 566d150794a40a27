use super::*;
use migfetch_test_utils::enable_tracing;
use migfetch_test_utils::fetcher::{MockFetcher, MockOutcome};
use std::sync::Arc;
use std::time::Duration;

const PATH: &str = "fs-repo-11-to-12/versions";

fn chain(members: &[&Arc<MockFetcher>]) -> MultiFetcher {
    chain_with(MultiFetcherConfig::default(), members)
}

fn chain_with(
    config: MultiFetcherConfig,
    members: &[&Arc<MockFetcher>],
) -> MultiFetcher {
    MultiFetcher::new(
        &config,
        members
            .iter()
            .map(|m| {
                let m: DynFetcher = (*m).clone();
                m
            })
            .collect(),
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn first_success_wins() {
    enable_tracing();

    let a = MockFetcher::create("a", MockOutcome::Ok(Bytes::from_static(b"a")));
    let b = MockFetcher::create("b", MockOutcome::Ok(Bytes::from_static(b"b")));
    let f = chain(&[&a, &b]);

    assert_eq!(2, f.len());
    assert!(!f.is_empty());

    let data = f.fetch(PATH, CancellationToken::new()).await.unwrap();
    assert_eq!(&b"a"[..], &data[..]);
    assert_eq!(1, a.calls());
    assert_eq!(0, b.calls());
}

#[tokio::test(flavor = "multi_thread")]
async fn falls_back_in_order_with_same_path() {
    enable_tracing();

    let a = MockFetcher::create("a", MockOutcome::Fail(FailureKind::NotFound));
    let b =
        MockFetcher::create("b", MockOutcome::Fail(FailureKind::Unreachable));
    let c = MockFetcher::create("c", MockOutcome::Ok(Bytes::from_static(b"c")));
    let d = MockFetcher::create("d", MockOutcome::Ok(Bytes::from_static(b"d")));
    let f = chain(&[&a, &b, &c, &d]);

    let data = f.fetch(PATH, CancellationToken::new()).await.unwrap();
    assert_eq!(&b"c"[..], &data[..]);

    for m in [&a, &b, &c] {
        assert_eq!(vec![PATH.to_string()], m.paths());
    }
    assert_eq!(0, d.calls());
}

#[tokio::test(flavor = "multi_thread")]
async fn exhausted_chain_reports_every_member() {
    enable_tracing();

    let a = MockFetcher::create("a", MockOutcome::Fail(FailureKind::NotFound));
    let b =
        MockFetcher::create("b", MockOutcome::Fail(FailureKind::Unreachable));
    let c = MockFetcher::create("c", MockOutcome::Fail(FailureKind::Other));
    let f = chain(&[&a, &b, &c]);

    let err = f.fetch(PATH, CancellationToken::new()).await.unwrap_err();
    let MfError::AllSourcesFailed { failures } = &err else {
        panic!("expected AllSourcesFailed, got {err:?}");
    };

    let got = failures
        .iter()
        .map(|f| (f.source.to_string(), f.kind))
        .collect::<Vec<_>>();
    assert_eq!(
        vec![
            ("gateway a".to_string(), FailureKind::NotFound),
            ("gateway b".to_string(), FailureKind::Unreachable),
            ("gateway c".to_string(), FailureKind::Other),
        ],
        got,
    );

    // mixed kinds do not collapse into a single classification
    assert_eq!(FailureKind::Other, err.failure_kind());
    assert!(err.to_string().contains("gateway b"), "{err}");
}

#[tokio::test(flavor = "multi_thread")]
async fn uniform_failures_keep_their_kind() {
    let a = MockFetcher::create("a", MockOutcome::Fail(FailureKind::NotFound));
    let b = MockFetcher::create("b", MockOutcome::Fail(FailureKind::NotFound));
    let f = chain(&[&a, &b]);

    let err = f.fetch(PATH, CancellationToken::new()).await.unwrap_err();
    assert_eq!(FailureKind::NotFound, err.failure_kind());
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_mid_attempt_stops_the_chain() {
    enable_tracing();

    let a = MockFetcher::create("a", MockOutcome::Hang);
    let b = MockFetcher::create("b", MockOutcome::Ok(Bytes::from_static(b"b")));
    let f = chain(&[&a, &b]);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let err = f.fetch(PATH, cancel).await.unwrap_err();
    assert!(err.is_cancelled(), "{err:?}");
    assert_eq!(1, a.calls());
    assert_eq!(0, b.calls());
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_does_not_wait_for_member_ignoring_token() {
    let a = MockFetcher::create(
        "a",
        MockOutcome::IgnoreCancel(Duration::from_secs(10)),
    );
    let b = MockFetcher::create("b", MockOutcome::Ok(Bytes::from_static(b"b")));
    let f = chain(&[&a, &b]);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let start = std::time::Instant::now();
    let err = f.fetch(PATH, cancel).await.unwrap_err();
    assert!(start.elapsed() < Duration::from_secs(5));
    assert!(err.is_cancelled(), "{err:?}");
    assert_eq!(0, b.calls());
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_with_ordinary_error_does_not_fall_back() {
    let a = MockFetcher::create("a", MockOutcome::CancelThenFail);
    let b = MockFetcher::create("b", MockOutcome::Ok(Bytes::from_static(b"b")));
    let f = chain(&[&a, &b]);

    let err = f.fetch(PATH, CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, MfError::Cancelled), "{err:?}");
    assert_eq!(0, b.calls());
}

#[tokio::test(flavor = "multi_thread")]
async fn already_cancelled_tries_nothing() {
    let a = MockFetcher::create("a", MockOutcome::Ok(Bytes::from_static(b"a")));
    let f = chain(&[&a]);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = f.fetch(PATH, cancel).await.unwrap_err();
    assert!(err.is_cancelled(), "{err:?}");
    assert_eq!(0, a.calls());
}

#[tokio::test(flavor = "multi_thread")]
async fn attempt_timeout_counts_as_unreachable() {
    enable_tracing();

    let a = MockFetcher::create(
        "a",
        MockOutcome::Delay(Duration::from_secs(10), Bytes::from_static(b"a")),
    );
    let b = MockFetcher::create("b", MockOutcome::Fail(FailureKind::NotFound));
    let f = chain_with(
        MultiFetcherConfig {
            attempt_timeout_ms: 50,
        },
        &[&a, &b],
    );

    let start = std::time::Instant::now();
    let err = f.fetch(PATH, CancellationToken::new()).await.unwrap_err();
    assert!(start.elapsed() < Duration::from_secs(5));

    let MfError::AllSourcesFailed { failures } = err else {
        panic!("expected AllSourcesFailed");
    };
    assert_eq!(FailureKind::Unreachable, failures[0].kind);
    assert_eq!(FailureKind::NotFound, failures[1].kind);
}

#[tokio::test(flavor = "multi_thread")]
async fn attempt_timeout_falls_back_to_next() {
    let a = MockFetcher::create(
        "a",
        MockOutcome::Delay(Duration::from_secs(10), Bytes::from_static(b"a")),
    );
    let b = MockFetcher::create("b", MockOutcome::Ok(Bytes::from_static(b"b")));
    let f = chain_with(
        MultiFetcherConfig {
            attempt_timeout_ms: 50,
        },
        &[&a, &b],
    );

    let data = f.fetch(PATH, CancellationToken::new()).await.unwrap();
    assert_eq!(&b"b"[..], &data[..]);
}

#[tokio::test(flavor = "multi_thread")]
async fn close_closes_every_member() {
    let a = MockFetcher::create("a", MockOutcome::Fail(FailureKind::Other));
    let b = MockFetcher::create("b", MockOutcome::Fail(FailureKind::Other));
    let f = chain(&[&a, &b]);

    f.close().await.unwrap();
    assert!(a.closed());
    assert!(b.closed());
}

#[test]
fn info_lists_members_in_order() {
    let a = MockFetcher::create("a", MockOutcome::Hang);
    let b = MockFetcher::create("b", MockOutcome::Hang);
    let f = chain(&[&a, &b]);

    assert_eq!(
        FetcherInfo::Fallback {
            members: vec![
                FetcherInfo::Gateway {
                    gateway: "a".into()
                },
                FetcherInfo::Gateway {
                    gateway: "b".into()
                },
            ],
        },
        f.info()
    );
    assert_eq!("fallback[gateway a, gateway b]", f.info().to_string());
}
