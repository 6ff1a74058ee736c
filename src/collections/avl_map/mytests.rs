use crate::collections::avl_map::*;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::{cell::RefCell, rc::Rc};

const REP: usize = if cfg!(miri) { 2 } else { 10 };
const N: usize = if cfg!(miri) { 100 } else { 10000 };

fn root_key<K: Copy, V>(map: &AvlMap<K, V>) -> K {
    map.tree[map.tree.root.unwrap()].key
}

/// Records the key of each value as it is dropped.
struct DropLog {
    key: usize,
    log: Log,
}
impl Drop for DropLog {
    fn drop(&mut self) {
        self.log.borrow_mut().push(self.key);
    }
}

type Log = Rc<RefCell<Vec<usize>>>;

fn logged_map(keys: impl IntoIterator<Item = usize>) -> (AvlMap<usize, DropLog>, Log) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut map = AvlMap::new();
    for key in keys {
        map.insert(
            key,
            DropLog {
                key,
                log: log.clone(),
            },
        );
    }
    (map, log)
}

#[test]
fn empty_map() {
    let mut map = AvlMap::<i32, i32>::new();
    assert!(!map.contains(&0));
    map.erase(&0);
    assert!(map.is_empty());
    assert_eq!(map.height(), 0);
    assert!(map.begin() == map.end());
    assert!(map.begin().is_exhausted());
    assert_eq!(map.first_key_value(), None);
    assert_eq!(map.last_key_value(), None);
    map.check();
}

#[test]
fn single_rotations() {
    let mut m = AvlMap::new();
    for k in [3, 2, 1] {
        *m.get_or_insert(k) = k * 10;
    }
    assert_eq!(root_key(&m), 2);
    m.check();

    let mut m = AvlMap::new();
    for k in [1, 2, 3] {
        *m.get_or_insert(k) = k * 10;
    }
    assert_eq!(root_key(&m), 2);
    m.check();
}

#[test]
fn double_rotations() {
    let mut m = AvlMap::<i32, i32>::new();
    for k in [3, 1, 2] {
        m.get_or_insert(k);
    }
    assert_eq!(root_key(&m), 2);
    assert_eq!(m.height(), 2);
    m.check();

    let mut m = AvlMap::<i32, i32>::new();
    for k in [1, 3, 2] {
        m.get_or_insert(k);
    }
    assert_eq!(root_key(&m), 2);
    assert_eq!(m.height(), 2);
    m.check();
}

#[test]
fn erase_rebalances() {
    // Right child leans right: single rotation.
    let mut m = AvlMap::<i32, ()>::new();
    for k in [2, 1, 3, 4] {
        m.get_or_insert(k);
    }
    m.erase(&1);
    assert_eq!(root_key(&m), 3);
    m.check();

    // Right child balanced, only possible on erase: still a single rotation.
    let mut m = AvlMap::<i32, ()>::new();
    for k in [2, 1, 4, 3, 5] {
        m.get_or_insert(k);
    }
    m.erase(&1);
    assert_eq!(root_key(&m), 4);
    assert_eq!(m.height(), 3);
    m.check();

    // Right child leans left: double rotation.
    let mut m = AvlMap::<i32, ()>::new();
    for k in [2, 1, 4, 3] {
        m.get_or_insert(k);
    }
    m.erase(&1);
    assert_eq!(root_key(&m), 3);
    m.check();
}

#[test]
fn erase_cases() {
    let mut m: AvlMap<i32, i32> = (1..=7).map(|k| (k, k)).collect();
    assert_eq!(root_key(&m), 4);

    // Two children, successor takes the root position.
    assert_eq!(m.remove_entry(&4), Some((4, 4)));
    assert_eq!(root_key(&m), 5);
    m.check();

    // Leaves.
    m.erase(&7);
    m.erase(&3);
    assert!(!m.contains(&7) && !m.contains(&3));
    m.check();

    // One child.
    m.erase(&2);
    assert!(!m.contains(&2));
    m.check();

    // Absent.
    m.erase(&100);
    assert_eq!(m.len(), 3);
    assert_eq!(m.keys().copied().collect::<Vec<_>>(), [1, 5, 6]);
    for k in [1, 5, 6] {
        assert_eq!(m[&k], k);
    }
}

#[test]
fn drop_is_post_order() {
    let (map, log) = logged_map(1..=7);
    assert_eq!(root_key(&map), 4);
    drop(map);
    assert_eq!(*RefCell::borrow(&log), [1, 3, 2, 5, 7, 6, 4]);
}

#[test]
fn partial_into_iter_drops_rest() {
    let (map, log) = logged_map(0..100);
    let mut it = map.into_iter();
    for i in 0..10 {
        let (k, _v) = it.next().unwrap();
        assert_eq!(k, i);
    }
    assert_eq!(it.len(), 90);
    drop(it);
    let mut dropped = RefCell::borrow(&log).clone();
    dropped.sort_unstable();
    assert_eq!(dropped, (0..100).collect::<Vec<_>>());
}

#[test]
fn slots_are_reused() {
    let mut m = AvlMap::new();
    for i in 0..100 {
        m.insert(i, i);
    }
    for i in 0..50 {
        m.erase(&i);
    }
    for i in 100..150 {
        m.insert(i, i);
    }
    assert_eq!(m.tree.slot_count(), 100);
    m.check();
}

#[test]
fn cursor_test() {
    let m: AvlMap<i32, &str> = AvlMap::from([(2, "b"), (1, "a"), (3, "c")]);
    let mut c = m.begin();
    assert_eq!(c.get(), Ok((&1, &"a")));
    assert!(c != m.end());
    let snapshot = c.clone();
    c.advance();
    assert_eq!(c.current(), Some((&2, &"b")));
    assert!(c != snapshot);
    c.advance();
    c.advance();
    assert!(c.is_exhausted());
    assert!(c == m.end());
    assert_eq!(c.get(), Err(ExhaustedError {}));
    c.advance();
    assert!(c == m.end());

    let other = m.clone();
    assert!(m.begin() != other.begin());
    assert!(m.end() == other.end());
}

#[test]
fn cursor_mut_test() {
    let mut m: AvlMap<usize, usize> = (0..N).map(|i| (i, i)).collect();
    let mut c = m.begin_mut();
    while let Some((k, v)) = c.current_mut() {
        *v = k * 2;
        c.advance();
    }
    assert!(c.get_mut().is_err());
    assert_eq!(c.value_mut(), None);
    for i in 0..N {
        assert_eq!(m[&i], i * 2);
    }
    m.check();
}

#[test]
fn letters_scenario() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut keys: Vec<String> = ('A'..='J').map(String::from).collect();
    let mut b = AvlMap::<String, i32>::new();
    for _rep in 0..100 {
        let mut c = AvlMap::<String, i32>::new();
        keys.shuffle(&mut rng);
        for (j, s) in keys.iter().enumerate() {
            let v = j as i32 + 1;
            *b.get_or_insert(s.clone()) = v;
            *c.get_or_insert(s.clone()) = v;
            assert_eq!(*b.get_or_insert(s.clone()), v);
        }
        for s in &keys {
            assert!(c.contains(s.as_str()));
        }
        let res: String = c.keys().map(String::as_str).collect();
        assert_eq!(res, "ABCDEFGHIJ");
        c.check();
    }
    *b.get_or_insert("fubar".to_string()) = 43;
    *b.get_or_insert("baz".to_string()) = 62;
    assert_eq!(b["fubar"], 43);
    assert_eq!(b["baz"], 62);
    b.check();
}

#[test]
fn exp_random_test() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut m = AvlMap::new();
    let mut s = std::collections::BTreeMap::new();
    for _ in 0..N {
        let k = rng.gen_range(0..1000);
        if rng.gen_bool(0.6) {
            let v = rng.gen::<u32>();
            assert_eq!(m.insert(k, v), s.insert(k, v));
        } else {
            assert_eq!(m.remove(&k), s.remove(&k));
        }
    }
    m.check();
    assert_eq!(m.len(), s.len());
    assert!(m.iter().eq(s.iter()));
    // Worst case height of an AVL tree is about 1.44 log2(n).
    let bound = 1.45 * ((m.len() + 2) as f64).log2();
    assert!((m.height() as f64) <= bound);
}

#[test]
fn exp_insert_fwd() {
    for _rep in 0..REP {
        let mut t = AvlMap::<usize, usize>::default();
        let n = N;
        for i in 0..n {
            t.insert(i, i);
        }
        assert_eq!(t.len(), n);
    }
    print_memory();
}

#[test]
fn std_insert_fwd() {
    for _rep in 0..REP {
        let mut t = std::collections::BTreeMap::<usize, usize>::default();
        let n = N;
        for i in 0..n {
            t.insert(i, i);
        }
        assert_eq!(t.len(), n);
    }
}

#[test]
fn exp_insert_rev() {
    let mut t = AvlMap::<usize, usize>::default();
    let n = N;
    for i in (0..n).rev() {
        t.insert(i, i);
    }
    t.check();
    for (i, (k, v)) in t.iter().enumerate() {
        assert_eq!((i, i), (*k, *v));
    }
}

#[test]
fn exp_get_test() {
    let mut m = AvlMap::new();
    let n = N;
    for i in 0..n {
        *m.get_or_insert(i) = i;
    }
    assert!(m.len() == n);
    print_memory();
    for _rep in 0..REP {
        for i in 0..n {
            assert!(m[&i] == i);
        }
    }
}

#[test]
fn std_get_test() {
    let mut m = std::collections::BTreeMap::new();
    let n = N;
    for i in 0..n {
        *m.entry(i).or_default() = i;
    }
    assert!(m.len() == n);
    for _rep in 0..REP {
        for i in 0..n {
            assert!(m[&i] == i);
        }
    }
}

#[test]
fn exp_remove_test() {
    let mut m: AvlMap<usize, usize> = (0..N).map(|i| (i, i)).collect();
    for i in (0..N).step_by(2) {
        assert_eq!(m.remove(&i), Some(i));
    }
    m.check();
    assert_eq!(m.len(), N / 2);
    assert!(m.keys().all(|k| k % 2 == 1));
    assert_eq!(m.first_key_value(), Some((&1, &1)));
    assert_eq!(m.last_key_value(), Some((&(N - 1), &(N - 1))));
}

#[test]
fn exp_clone_test() {
    let m: AvlMap<usize, usize> = (0..N).map(|i| (i, i)).collect();
    for _rep in 0..REP {
        let cm = m.clone();
        assert!(cm.len() == N);
        assert!(cm == m);
    }
}

#[test]
fn exp_clear_test() {
    let mut map = AvlMap::new();
    for i in 0..N {
        map.insert(i as u32, 1u8);
    }
    map.clear();
    assert!(map.len() == 0);
    map.check();
    map.insert(1, 2);
    assert_eq!(map.len(), 1);
}

#[test]
fn exp_into_iter() {
    let m: AvlMap<usize, usize> = (0..N).rev().map(|i| (i, i * 3)).collect();
    let mut i = 0;
    for (k, v) in m.clone() {
        assert_eq!((k, v), (i, i * 3));
        i += 1;
    }
    assert_eq!(i, N);
    assert!(m.clone().into_keys().eq(0..N));
    assert!(m.into_values().eq((0..N).map(|i| i * 3)));
}

#[test]
#[cfg(feature = "serde")]
fn exp_serde_test() {
    let mut map = AvlMap::new();
    for i in 0..N {
        map.insert(i as u32, 1u8);
    }
    for _i in 0..REP {
        let ser = bincode::serialize(&map).unwrap();
        let de: AvlMap<u32, u8> = bincode::deserialize(&ser).unwrap();
        assert!(de == map);
    }
}

#[test]
fn various_tests() {
    let mut m = AvlMap::from([(3, "c"), (1, "a")]);
    m.extend([(2, "b")]);
    assert_eq!(format!("{m:?}"), r#"{1: "a", 2: "b", 3: "c"}"#);
    assert_eq!(m.get_key_value(&2), Some((&2, &"b")));
    *m.get_mut(&2).unwrap() = "B";
    assert_eq!(m.values().copied().collect::<Vec<_>>(), ["a", "B", "c"]);
    assert_eq!(m.insert(2, "bb"), Some("B"));
    assert_eq!(*m.get_or_insert_with(4, || "d"), "d");
    assert_eq!(*m.get_or_insert_with(4, || "x"), "d");
    assert_eq!(m.iter().len(), 4);
    assert!(m.contains_key(&4));
    let bigger = AvlMap::from([(5, "e")]);
    assert!(m < bigger);
    assert_eq!(
        InvariantError::Unbalanced.to_string(),
        "subtree heights differ by more than one"
    );
}

#[test]
/// Not really a test, just prints the size of various types.
fn sizes() {
    type K = u64;
    type V = u64;
    println!("size of Node={}", std::mem::size_of::<tree::Node<K, V>>());
    println!("size of Cursor={}", std::mem::size_of::<Cursor<K, V>>());
    println!("size of AvlMap={}", std::mem::size_of::<AvlMap<K, V>>());
}
