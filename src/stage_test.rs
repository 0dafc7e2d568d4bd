use super::*;

#[test]
fn add_rejects_wrong_dimensions() {
    let mut s: Staging<i32> = Staging::new(4, 2);
    let err = s.add(&[1, 2, 3], 9).unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch(_)));
}

#[test]
fn add_rejects_over_capacity() {
    let mut s: Staging<i32> = Staging::new(1, 2);
    assert_eq!(s.add(&[0, 0], 1).unwrap(), 1);
    let err = s.add(&[1, 1], 2).unwrap_err();
    assert!(matches!(err, Error::CapacityExceeded(_)));
    assert_eq!(s.len(), 1);
}

#[test]
fn merge_values_concatenates_and_empties_source() {
    let mut s: Staging<i32> = Staging::new(4, 1);
    s.add(&[0], 1).unwrap();
    s.add(&[0], 2).unwrap();
    s.merge_values(0, 1);
    let merged = s.take_values(0).unwrap();
    assert_eq!(merged, vec![1, 2]);
    let err = s.take_values(1).unwrap_err();
    assert!(matches!(err, Error::GeometryInvariant(_)));
}

#[test]
fn take_values_twice_is_geometry_invariant() {
    let mut s: Staging<i32> = Staging::new(4, 1);
    s.add(&[0], 1).unwrap();
    s.take_values(0).unwrap();
    assert!(s.take_values(0).is_err());
}
