extern crate env_logger;
extern crate rand;
extern crate randomized_collections;

use self::rand::Rng;
use randomized_collections::comparator::Natural;
use randomized_collections::error::Error;
use randomized_collections::priority::PriorityGenerator;
use randomized_collections::treap::{TreapMap, TreapSet};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::vec::Vec;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn seeded_set<T: Ord>() -> TreapSet<T> {
    TreapSet::with_generator(Natural, PriorityGenerator::from_seed([2, 3, 5, 7]))
}

#[test]
fn int_test_treap_set() {
    init_logging();
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut set = seeded_set();
    let mut expected = BTreeSet::new();
    for _ in 0..20_000 {
        let key = rng.gen_range(0, 2_000);
        match rng.gen_range(0, 4) {
            0 | 1 => assert_eq!(set.insert(key), expected.insert(key)),
            2 => assert_eq!(set.remove(&key), expected.remove(&key)),
            _ => assert_eq!(set.contains(&key), expected.contains(&key)),
        }
        assert_eq!(set.len(), expected.len());
    }

    assert!(set.is_valid());
    assert_eq!(set.min(), expected.iter().next());
    assert_eq!(set.max(), expected.iter().next_back());
    assert!(set.iter().eq(expected.iter()));
    assert!(set.iter().rev().eq(expected.iter().rev()));

    for _ in 0..1_000 {
        let key = rng.gen_range(0, 2_000);
        assert_eq!(set.floor(&key), expected.range(..=key).next_back());
        assert_eq!(set.ceil(&key), expected.range(key..).next());
    }

    let mut keys: Vec<u32> = expected.iter().cloned().collect();
    rng.shuffle(&mut keys);
    let mut expected_len = keys.len();
    for key in keys {
        assert_eq!(set.take(&key), Some(key));
        expected_len -= 1;
        assert_eq!(set.len(), expected_len);
    }
    assert!(set.is_empty());
    assert!(set.is_valid());
}

#[test]
fn int_test_treap_set_validity() {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut set = seeded_set();
    for _ in 0..2_000 {
        let key = rng.gen_range(0, 200);
        if rng.gen::<bool>() {
            set.insert(key);
        } else {
            set.remove(&key);
        }
        assert!(set.is_valid());
    }
}

#[test]
fn int_test_treap_map() {
    init_logging();
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut map = TreapMap::new();
    let mut expected = BTreeMap::new();
    for _ in 0..10_000 {
        let key = rng.gen::<u32>() % 5_000;
        let val = rng.gen::<u32>();

        let old_entry = map.insert(key, val);
        let old_val = expected.insert(key, val);
        assert_eq!(old_entry, old_val.map(|old_val| (key, old_val)));
    }

    assert_eq!(map.len(), expected.len());
    assert!(map.is_valid());

    for (key, val) in &expected {
        assert!(map.contains_key(key));
        assert_eq!(map.get(key), Some(val));
    }

    for (key, val) in expected.iter_mut() {
        let new_val = rng.gen::<u32>();
        *map.get_mut(key).unwrap() = new_val;
        *val = new_val;
    }
    assert!(map.iter().eq(expected.iter()));

    let mut entries: Vec<(u32, u32)> = expected.into_iter().collect();
    rng.shuffle(&mut entries);
    let mut expected_len = entries.len();
    for entry in entries {
        assert_eq!(map.remove(&entry.0), Some(entry));
        expected_len -= 1;
        assert_eq!(map.len(), expected_len);
    }
    assert!(map.is_valid());
}

#[test]
fn int_test_cursor_removal() {
    init_logging();
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut set = seeded_set();
    let mut expected = BTreeSet::new();
    for _ in 0..5_000 {
        let key = rng.gen::<u32>();
        set.insert(key);
        expected.insert(key);
    }

    let mut removed = Vec::new();
    {
        let mut cursor = set.cursor();
        while cursor.has_next() {
            let key = *cursor.next().unwrap();
            if rng.gen_range(0, 3) == 0 {
                assert_eq!(cursor.remove(), Ok(key));
                assert_eq!(cursor.remove(), Err(Error::InvalidIteratorState));
                removed.push(key);
            }
        }
        assert_eq!(cursor.next(), Err(Error::IteratorExhausted));
    }

    for key in &removed {
        assert!(expected.remove(key));
    }
    assert!(set.is_valid());
    assert!(set.iter().eq(expected.iter()));
}

#[test]
fn int_test_queue_operations() {
    let mut set = seeded_set();
    assert_eq!(set.poll(), None);
    assert_eq!(set.element(), Err(Error::EmptyContainer));
    assert_eq!(set.remove_head(), Err(Error::EmptyContainer));

    for key in 0..1_000u32 {
        assert!(set.offer(key));
    }

    let mut drained = Vec::new();
    while let Some(head) = set.peek().cloned() {
        assert_eq!(set.poll(), Some(head));
        drained.push(head);
        if drained.len() % 100 == 0 {
            assert!(set.is_valid());
        }
    }
    drained.sort();
    assert_eq!(drained, (0..1_000).collect::<Vec<u32>>());
    assert!(set.is_empty());
}

#[test]
fn int_test_custom_comparator() {
    let mut set = TreapSet::with_comparator(|l: &i32, r: &i32| r.cmp(l));
    let mut expected = BTreeSet::new();
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    for _ in 0..1_000 {
        let key = rng.gen_range(-500, 500);
        assert_eq!(set.insert(key), expected.insert(key));
    }
    assert!(set.is_valid());
    assert!(set.iter().eq(expected.iter().rev()));
    assert_eq!(set.min(), expected.iter().next_back());
}

#[test]
fn int_test_case_insensitive_comparator() {
    let mut set = TreapSet::with_comparator(|l: &String, r: &String| {
        l.to_lowercase().cmp(&r.to_lowercase())
    });
    assert!(set.insert(String::from("Apple")));
    assert!(!set.insert(String::from("APPLE")));
    assert!(set.contains(&String::from("apple")));
    assert_eq!(set.get(&String::from("aPpLe")), Some(&String::from("Apple")));
    assert_eq!(set.len(), 1);
}

#[test]
fn int_test_expected_height() {
    const TRIALS: u32 = 10;
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    for &size in &[1_000usize, 10_000] {
        let bound = 3 * (size as f64).log2().ceil() as usize;
        let mut sequential_within = 0;
        let mut random_within = 0;
        for trial in 1..=TRIALS {
            let seed = [trial, trial + 1, trial + 2, trial + 3];
            let mut sequential =
                TreapSet::with_generator(Natural, PriorityGenerator::from_seed(seed));
            let mut random = TreapSet::with_generator(Natural, PriorityGenerator::from_seed(seed));
            for key in 0..size {
                sequential.insert(key);
                random.insert(rng.gen::<usize>());
            }
            if sequential.height() <= bound {
                sequential_within += 1;
            }
            if random.height() <= bound {
                random_within += 1;
            }
        }
        assert!(sequential_within >= TRIALS - 1);
        assert!(random_within >= TRIALS - 1);
    }
}

#[test]
fn int_test_same_seed_same_shape() {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let keys: Vec<u32> = (0..500).map(|_| rng.gen::<u32>()).collect();
    let mut first = seeded_set();
    let mut second = seeded_set();
    for key in &keys {
        first.insert(*key);
        second.insert(*key);
    }
    assert_eq!(first.pretty_print(), second.pretty_print());
    assert_eq!(first.peek(), second.peek());
}

#[test]
fn int_test_retain_all() {
    let mut left: TreapSet<u32> = (0..100).collect();
    let right: TreapSet<u32> = (50..150).collect();
    assert!(left.retain_all(&right));
    assert!(left.iter().cloned().eq(50..100));
    assert_eq!(left.iter().cmp(right.iter().take(50)), Ordering::Equal);
}
