use super::*;

#[test]
fn disabled_for_small_thread_counts() {
    assert_eq!(Pool::new(0).max_submit_depth(), -1);
    assert_eq!(Pool::new(1).max_submit_depth(), -1);
    assert!(!Pool::new(0).should_fork(0));
}

#[test]
fn power_of_two_rounding() {
    // 8 threads -> max_submit_depth = floor(log2(7)) = 2
    let pool = Pool::new(8);
    assert_eq!(pool.max_submit_depth(), 2);
    assert!(pool.should_fork(2));
    assert!(!pool.should_fork(3));
}

#[test]
fn join_runs_both_sides() {
    let pool = Pool::new(4);
    let (a, b) = pool.join(0, || 1 + 1, || 2 + 2);
    assert_eq!((a, b), (2, 4));
}

#[test]
fn join_inline_beyond_depth() {
    let pool = Pool::new(4);
    let depth = (pool.max_submit_depth() + 1) as usize;
    let (a, b) = pool.join(depth, || "left", || "right");
    assert_eq!((a, b), ("left", "right"));
}
