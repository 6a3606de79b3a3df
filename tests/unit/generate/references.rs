use super::*;

#[test]
fn add_until_limit_then_reject() {
    let mut refs = ReferenceSet::new(2);
    assert_eq!(refs.add(vec![1u8]).unwrap(), 0);
    assert_eq!(refs.add(vec![2u8]).unwrap(), 1);
    assert!(refs.is_full());

    let err = refs.add(vec![3u8]).unwrap_err();
    assert!(matches!(err, CanvasError::Capacity(_)));
    assert!(err.is_user_facing());
    assert_eq!(refs.len(), 2);
}

#[test]
fn remove_by_index_keeps_order() {
    let mut refs = ReferenceSet::new(10);
    for b in 0u8..3 {
        refs.add(vec![b]).unwrap();
    }
    assert_eq!(refs.remove(1).as_deref(), Some(&[1u8][..]));
    let left: Vec<u8> = refs.images().iter().map(|i| i[0]).collect();
    assert_eq!(left, [0, 2]);
    assert!(refs.remove(5).is_none());
}

#[test]
fn clear_empties() {
    let mut refs = ReferenceSet::new(10);
    refs.add(vec![1u8]).unwrap();
    refs.clear();
    assert!(refs.is_empty());
    assert_eq!(refs.limit(), 10);
}
