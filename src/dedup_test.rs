use super::*;
use crate::stage::Staging;

#[test]
fn merges_adjacent_duplicates() {
    let mut staging: Staging<char> = Staging::new(8, 2);
    staging.add(&[0, 0], 'a').unwrap();
    staging.add(&[1, 1], 'b').unwrap();
    staging.add(&[0, 1], 'c').unwrap();
    staging.add(&[1, 0], 'd').unwrap();
    staging.add(&[0, 0], 'e').unwrap();

    // Sorted by SuperKey axis 0: (0,0)=idx0, (0,0)=idx4, (0,1)=idx2, (1,0)=idx3, (1,1)=idx1
    let mut reference = vec![0usize, 4, 2, 3, 1];
    let tuples = staging.tuples().to_vec();
    dedup(&mut reference, &tuples, 0, &staging).unwrap();

    assert_eq!(reference, vec![0, 2, 3, 1]);
    let merged = staging.take_values(0).unwrap();
    assert_eq!(merged, vec!['a', 'e']);
}

#[test]
fn out_of_order_is_sort_invariant() {
    let mut staging: Staging<i32> = Staging::new(8, 1);
    staging.add(&[5], 1).unwrap();
    staging.add(&[1], 2).unwrap();
    let mut reference = vec![0usize, 1];
    let tuples = staging.tuples().to_vec();
    let err = dedup(&mut reference, &tuples, 0, &staging).unwrap_err();
    assert!(matches!(err, crate::error::Error::SortInvariant(_)));
}

#[test]
fn no_duplicates_is_a_no_op() {
    let mut staging: Staging<i32> = Staging::new(8, 1);
    staging.add(&[1], 1).unwrap();
    staging.add(&[2], 2).unwrap();
    let mut reference = vec![0usize, 1];
    let tuples = staging.tuples().to_vec();
    dedup(&mut reference, &tuples, 0, &staging).unwrap();
    assert_eq!(reference, vec![0, 1]);
}
