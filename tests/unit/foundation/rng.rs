use super::*;

#[test]
fn same_seed_same_sequence() {
    let mut a = Rng64::new(7);
    let mut b = Rng64::new(7);
    for _ in 0..16 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn range_stays_in_bounds() {
    let mut r = Rng64::new(42);
    for _ in 0..1000 {
        let v = r.range(-3.0, 5.0);
        assert!((-3.0..5.0).contains(&v));
    }
    assert_eq!(r.range(2.0, 2.0), 2.0);
    assert_eq!(r.range(4.0, 1.0), 4.0);
}

#[test]
fn index_handles_empty() {
    let mut r = Rng64::new(1);
    assert_eq!(r.index(0), None);
    for _ in 0..100 {
        assert!(r.index(3).unwrap() < 3);
    }
}
