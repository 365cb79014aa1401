//! Concurrency tests for consume-on-read.

use super::*;

fn race_consumers(db: &Database, id: &str, workers: usize) -> Vec<Option<Paste>> {
    let barrier = Arc::new(Barrier::new(workers));
    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let worker_db = db.share().expect("share");
            let barrier = barrier.clone();
            let id = id.to_string();
            thread::spawn(move || {
                barrier.wait();
                worker_db
                    .pastes
                    .consume(&id, base_instant())
                    .expect("consume should not error under contention")
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|handle| handle.join().expect("worker join"))
        .collect()
}

#[test]
fn test_concurrent_consumers_never_exceed_view_budget() {
    let (db, _temp) = setup_test_db();
    let created = db
        .pastes
        .create(limited_draft("contended", Some(5)))
        .expect("create");

    let results = race_consumers(&db, &created.id, 24);
    let successes: Vec<&Paste> = results.iter().flatten().collect();

    assert_eq!(successes.len(), 5, "exactly max_views readers must win");
    assert_eq!(results.len() - successes.len(), 19);

    let mut observed_counts: Vec<u32> = successes.iter().map(|p| p.current_views).collect();
    observed_counts.sort_unstable();
    assert_eq!(
        observed_counts,
        vec![1, 2, 3, 4, 5],
        "each winner must observe a distinct post-increment count"
    );

    let stored = db.pastes.get(&created.id).expect("get").expect("exists");
    assert_eq!(stored.current_views, 5);
}

#[test]
fn test_single_view_paste_has_exactly_one_winner() {
    let (db, _temp) = setup_test_db();
    let created = db
        .pastes
        .create(limited_draft("secret", Some(1)))
        .expect("create");

    let results = race_consumers(&db, &created.id, 16);
    let winners: Vec<&Paste> = results.iter().flatten().collect();
    assert_eq!(winners.len(), 1);
    assert_eq!(winners[0].remaining_views(), Some(0));
}

#[test]
fn test_fewer_consumers_than_budget_all_succeed() {
    let (db, _temp) = setup_test_db();
    let created = db
        .pastes
        .create(limited_draft("roomy", Some(10)))
        .expect("create");

    let results = race_consumers(&db, &created.id, 4);
    assert!(results.iter().all(Option::is_some));

    let stored = db.pastes.get(&created.id).expect("get").expect("exists");
    assert_eq!(stored.current_views, 4);
    assert_eq!(stored.remaining_views(), Some(6));
}

#[test]
fn test_concurrent_creates_are_independent() {
    let (db, _temp) = setup_test_db();
    let workers = 8;
    let barrier = Arc::new(Barrier::new(workers));
    let handles: Vec<_> = (0..workers)
        .map(|i| {
            let worker_db = db.share().expect("share");
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                worker_db
                    .pastes
                    .create(limited_draft(&format!("paste-{}", i), None))
                    .expect("create")
            })
        })
        .collect();

    let mut ids: Vec<String> = handles
        .into_iter()
        .map(|handle| handle.join().expect("join").id)
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), workers);
    assert_eq!(db.pastes.count().expect("count"), workers);
}
