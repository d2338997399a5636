mod common;

use common::{images, run_local, session, session_with, MockFile};
use picknroll_core::config::ViewerConfig;
use picknroll_core::{ImageId, LoadPhase, ShowOptions, ShowOutcome};

fn small_cache(capacity: usize) -> ViewerConfig {
    ViewerConfig {
        cache_capacity: capacity,
        seed: Some(1),
        ..ViewerConfig::default()
    }
}

#[tokio::test]
async fn test_load_returns_increasing_ids() {
    run_local(async {
        let (session, _log) = session();
        session.drop_new_candidates(images(3));

        let a = session.load_candidate(0).unwrap();
        let b = session.load_candidate(0).unwrap();
        let c = session.load_candidate(2).unwrap();
        assert!(a < b && b < c);

        // the load is in flight until the local set gets to run it
        assert_eq!(session.image_phase(c), Some(LoadPhase::Loading));
        assert_eq!(session.wait_settled(c).await, Some(LoadPhase::Ready));
    })
    .await;
}

#[tokio::test]
async fn test_cache_never_exceeds_capacity() {
    run_local(async {
        let (session, _log) = session();
        session.drop_new_candidates(images(50));
        let capacity = session.config().cache_capacity;

        let mut ids = Vec::new();
        for i in 0..50 {
            ids.push(session.load_candidate(i).unwrap());
            assert!(session.cache_len() <= capacity);
        }
        for id in ids.iter().rev().take(capacity) {
            session.wait_settled(*id).await;
        }

        let expected: Vec<ImageId> = ids[ids.len() - capacity..].to_vec();
        assert_eq!(session.cached_ids(), expected);
    })
    .await;
}

#[tokio::test]
async fn test_evict_before_insert_boundary() {
    run_local(async {
        let (session, _log) = session_with(small_cache(3));
        session.drop_new_candidates(images(4));

        let first = session.load_candidate(0).unwrap();
        session.load_candidate(1).unwrap();
        session.load_candidate(2).unwrap();
        assert_eq!(session.cache_len(), 3);
        assert!(session.cached_ids().contains(&first));

        // the fourth load evicts the oldest before it is inserted
        let fourth = session.load_candidate(3).unwrap();
        assert_eq!(session.cache_len(), 3);
        assert!(!session.cached_ids().contains(&first));
        assert!(session.cached_ids().contains(&fourth));
    })
    .await;
}

#[tokio::test]
async fn test_eviction_releases_resource_once() {
    run_local(async {
        let (session, log) = session_with(small_cache(2));
        session.drop_new_candidates(images(3));

        let first = session.load_candidate(0).unwrap();
        assert_eq!(session.wait_settled(first).await, Some(LoadPhase::Ready));
        let second = session.load_candidate(1).unwrap();
        session.wait_settled(second).await;
        assert_eq!(log.total_released(), 0);

        let third = session.load_candidate(2).unwrap();
        session.wait_settled(third).await;

        assert_eq!(log.release_count("100x100"), 1);
        assert_eq!(log.total_released(), 1);
        assert_eq!(session.image_phase(first), None);
    })
    .await;
}

#[tokio::test]
async fn test_evicted_while_loading_releases_on_completion() {
    run_local(async {
        let (session, log) = session_with(small_cache(2));
        let (slow, gate) = MockFile::image("slow.png", 10, 10).gated();
        session.drop_new_candidates(vec![
            slow,
            MockFile::image("a.png", 20, 20),
            MockFile::image("b.png", 30, 30),
        ]);

        let slow_id = session.load_candidate(0).unwrap();
        let a = session.load_candidate(1).unwrap();
        let b = session.load_candidate(2).unwrap();
        assert_eq!(session.cached_ids(), vec![a, b]);
        assert_eq!(session.wait_settled(a).await, Some(LoadPhase::Ready));
        assert_eq!(session.wait_settled(b).await, Some(LoadPhase::Ready));
        assert_eq!(session.wait_settled(slow_id).await, None);

        gate.notify_one();
        // let the slow load finish after its slot is gone
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert_eq!(log.release_count("10x10"), 1);
        assert_eq!(session.cached_ids(), vec![a, b]);
        assert_eq!(log.live(), 2);
    })
    .await;
}

#[tokio::test]
async fn test_read_and_decode_failures_are_terminal() {
    run_local(async {
        let (session, log) = session();
        session.drop_new_candidates(vec![
            MockFile::unreadable("locked.png"),
            MockFile::corrupt("broken.png"),
            MockFile::image("empty.png", 0, 480),
        ]);

        for index in 0..3 {
            let id = session.load_candidate(index).unwrap();
            assert_eq!(session.wait_settled(id).await, Some(LoadPhase::Failed));
        }
        assert_eq!(session.cache_len(), 3);
        // resources created next to a failed decode are released right away
        assert_eq!(log.live(), 0);
    })
    .await;
}

#[tokio::test]
async fn test_failed_entries_are_evictable() {
    run_local(async {
        let (session, _log) = session_with(small_cache(2));
        session.drop_new_candidates(vec![
            MockFile::corrupt("broken.png"),
            MockFile::image("ok.png", 5, 5),
            MockFile::image("also_ok.png", 6, 6),
        ]);

        let broken = session.load_candidate(0).unwrap();
        assert_eq!(session.wait_settled(broken).await, Some(LoadPhase::Failed));
        let ok = session.load_candidate(1).unwrap();
        session.wait_settled(ok).await;
        let also_ok = session.load_candidate(2).unwrap();
        session.wait_settled(also_ok).await;
        assert_eq!(session.cached_ids(), vec![ok, also_ok]);
    })
    .await;
}

#[tokio::test]
async fn test_shown_image_survives_smallest_cache() {
    run_local(async {
        let (session, log) = session_with(small_cache(2));
        session.drop_new_candidates(images(3));

        let shown = session.load_candidate(0).unwrap();
        assert_eq!(session.show(shown, ShowOptions::default()).await, ShowOutcome::Shown(shown));
        session.load_candidate(1).unwrap();
        let newest = session.load_candidate(2).unwrap();
        session.wait_settled(newest).await;
        // the evicted middle load releases when it completes
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert_eq!(session.cache_len(), 2);
        assert_eq!(session.cached_ids(), vec![shown, newest]);
        assert_eq!(log.release_count("101x100"), 1);
        assert_eq!(log.release_count("100x100"), 0);
    })
    .await;
}

#[tokio::test]
async fn test_teardown_releases_all() {
    run_local(async {
        let (session, log) = session();
        session.drop_new_candidates(images(4));
        for i in 0..4 {
            let id = session.load_candidate(i).unwrap();
            session.wait_settled(id).await;
        }

        assert_eq!(session.teardown(), 4);
        assert_eq!(log.total_released(), 4);
        assert_eq!(session.cache_len(), 0);
        drop(session);
        assert_eq!(log.total_released(), 4);
    })
    .await;
}

#[tokio::test]
async fn test_candidate_index_out_of_range() {
    run_local(async {
        let (session, _log) = session();
        session.drop_new_candidates(images(2));
        assert!(session.load_candidate(5).is_err());
        assert_eq!(session.cache_len(), 0);
    })
    .await;
}
