//! Integration tests for lazy stream pipelines

use std::cell::Cell;
use std::rc::Rc;

use lazystream::prelude::*;
use lazystream::Deferred;

fn collect<T: 'static>(s: &Stream<T>) -> Vec<T> {
    s.to::<Vec<_>>()
}

#[test]
fn test_unique_keeps_first_occurrence() {
    let s = Stream::of(vec![1, 1, 2, 3, 2]).unique();
    assert_eq!(collect(&s), vec![1, 2, 3]);
}

#[test]
fn test_sort_is_stable() {
    let people = Stream::of(vec![("cy", 2), ("al", 1), ("bo", 2), ("di", 1)]);
    let by_age = people.clone().sort_by_key(|p| p.1, false);
    assert_eq!(
        collect(&by_age),
        vec![("al", 1), ("di", 1), ("cy", 2), ("bo", 2)]
    );

    let desc = people.sort_by_key(|p| p.1, true);
    assert_eq!(
        collect(&desc),
        vec![("cy", 2), ("bo", 2), ("al", 1), ("di", 1)]
    );

    assert_eq!(collect(&Stream::of(vec![3, 1, 2]).sort_desc()), vec![3, 2, 1]);
}

#[test]
fn test_reentrancy_carries_through_element_wise_stages() {
    let s = Stream::of(vec![1, 2, 3, 4]).map(|x| x * 2).filter(|x| *x > 2);
    assert!(s.is_reentrant());
    assert_eq!(collect(&s), vec![4, 6, 8]);
    assert_eq!(collect(&s), vec![4, 6, 8]);

    let once = s.nonreentrant();
    assert!(!once.is_reentrant());
    assert_eq!(collect(&once), vec![4, 6, 8]);
    assert!(collect(&once).is_empty());
}

#[test]
fn test_reentrant_caches_single_pass_input() -> Result<()> {
    let s = Stream::single_pass(vec![5, 6]).reentrant()?;
    assert!(s.is_reentrant());
    assert_eq!(collect(&s), vec![5, 6]);
    assert_eq!(collect(&s), vec![5, 6]);

    let endless = Stream::iterate(0, |x| x + 1).nonreentrant().reentrant();
    assert!(matches!(endless, Err(Error::Endless)));
    Ok(())
}

#[test]
fn test_reentrant_rejects_every_endless_shape() -> Result<()> {
    let odd_cycle = Stream::of(vec![1, 2, 3]).filter(|x| x % 2 == 1).cycle();
    assert_eq!(odd_cycle.take(4), vec![1, 3, 1, 3]);
    assert!(matches!(odd_cycle.reentrant(), Err(Error::Endless)));

    let counting = Stream::range_by(5, None, 2)?.nonreentrant();
    assert!(matches!(counting.reentrant(), Err(Error::Endless)));

    let bounded = Stream::range_by(5, None, 2)?.limit(3).nonreentrant().reentrant()?;
    assert_eq!(collect(&bounded), vec![5, 7, 9]);
    Ok(())
}

#[test]
fn test_group_with_and_without_fill() -> Result<()> {
    let short = Stream::range(0..10).group(3, None)?;
    assert_eq!(
        collect(&short),
        vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8], vec![9]]
    );

    let padded = Stream::range(0..10).group(3, Some(0))?;
    assert_eq!(
        collect(&padded),
        vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8], vec![9, 0, 0]]
    );

    let exact = Stream::range(0..6).group(3, Some(0))?;
    assert_eq!(collect(&exact), vec![vec![0, 1, 2], vec![3, 4, 5]]);

    let nothing = Stream::<i64>::empty().group(3, Some(0))?;
    assert!(collect(&nothing).is_empty());

    assert!(Stream::range(0..3).group(0, None).unwrap_err().is_misuse());
    Ok(())
}

#[test]
fn test_zip_shortest_and_longest() {
    let rows = || Stream::of(vec![vec![1, 2, 3], vec![4, 5], vec![6, 7, 8, 9]]);

    assert_eq!(collect(&rows().zip(None)), vec![vec![1, 4, 6], vec![2, 5, 7]]);
    assert_eq!(
        collect(&rows().zip(Some(0))),
        vec![
            vec![1, 4, 6],
            vec![2, 5, 7],
            vec![3, 0, 8],
            vec![0, 0, 9],
        ]
    );
}

#[test]
fn test_deferred_transform_runs_once() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let mut deferred = Deferred::new(vec![3, 1, 2].into_iter(), move |it: std::vec::IntoIter<i32>| {
        counter.set(counter.get() + 1);
        let mut items: Vec<i32> = it.collect();
        items.sort();
        items
    });

    assert_eq!(calls.get(), 0);
    assert_eq!(deferred.next(), Some(1));
    assert_eq!(deferred.by_ref().collect::<Vec<_>>(), vec![2, 3]);
    assert_eq!(deferred.next(), None);
    assert_eq!(deferred.next(), None);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_deferred_stage_runs_once_on_single_pass_stream() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let upstream = Stream::of(vec![2, 1, 3]).nonreentrant();
    let sorted = Stream::lazy_evaluate(upstream, move |it| {
        counter.set(counter.get() + 1);
        let mut items: Vec<i32> = it.collect();
        items.sort();
        items
    });

    assert_eq!(sorted.take_one(), Some(1));
    assert_eq!(collect(&sorted), vec![2, 3]);
    assert!(collect(&sorted).is_empty());
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_group_by_merges_non_adjacent_keys() {
    let words = Stream::of(vec!["apple", "bean", "avocado", "beet", "corn"]);
    let initial = |w: &&str| w.as_bytes()[0];

    let merged = words
        .clone()
        .group_by(initial)
        .map(|(k, g)| (k as char, g.count()))
        .to::<Vec<_>>();
    assert_eq!(merged, vec![('a', 2), ('b', 2), ('c', 1)]);

    let runs = words
        .group_runs(initial)
        .map(|(k, g)| (k as char, g.to::<Vec<_>>()))
        .to::<Vec<_>>();
    assert_eq!(
        runs,
        vec![
            ('a', vec!["apple"]),
            ('b', vec!["bean"]),
            ('a', vec!["avocado"]),
            ('b', vec!["beet"]),
            ('c', vec!["corn"]),
        ]
    );
}

#[test]
fn test_csv_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("rows.csv");

    let rows = vec![(0i64, 0.5f64, "zero"), (1, 1.5, "one"), (2, -2.25, "two")];
    let written = Stream::of(rows.clone()).to_csv(
        &path,
        &[Some("id"), Some("weight"), Some("label")],
        &Dialect::default(),
    )?;
    assert_eq!(written, 3);

    let back = Stream::from_csv(
        &path,
        vec![Column::int(), Column::float(), Column::Text],
        CsvReadOptions::default(),
    )?
    .to::<Result<Vec<Row>>>()?;

    let expected: Vec<Row> = rows
        .iter()
        .map(|(id, weight, label)| vec![Field::Int(*id), Field::Float(*weight), Field::from(*label)])
        .collect();
    assert_eq!(back, expected);
    Ok(())
}

#[test]
fn test_csv_read_is_single_pass() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("plain.csv");
    std::fs::write(&path, "a\tb\nc\td\n")?;

    let rows = Stream::from_csv(&path, Vec::new(), CsvReadOptions::default().has_header(false))?;
    assert!(!rows.is_reentrant());
    assert_eq!(rows.count(), 2);
    assert_eq!(rows.count(), 0);
    Ok(())
}

#[test]
fn test_csv_file_reusable_after_abandoned_read() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("abandoned.csv");
    std::fs::write(&path, "n\n1\n2\n3\n")?;

    let rows = Stream::from_csv(&path, vec![Column::int()], CsvReadOptions::default().has_header(true))?;
    assert_eq!(rows.take_one().transpose()?, Some(vec![Field::Int(1)]));
    drop(rows);

    let rewritten = Stream::of(vec![[9]]).to_csv(&path, &[Some("n")], &Dialect::default())?;
    assert_eq!(rewritten, 1);
    std::fs::remove_file(&path)?;
    assert!(!path.exists());
    Ok(())
}

#[test]
fn test_missing_csv_file_fails_on_open() {
    let err = Stream::from_csv("/definitely/not/here.csv", Vec::new(), CsvReadOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_take_pads_with_default() {
    let s = Stream::of(vec![7, 8]);
    assert_eq!(s.take_padded(5, 0), vec![7, 8, 0, 0, 0]);
    assert_eq!(s.take(5), vec![7, 8]);
}

#[test]
fn test_any_and_all_short_circuit_on_endless_input() {
    let evaluated = Rc::new(Cell::new(0u32));

    let seen = evaluated.clone();
    let found = Stream::iterate(1u64, |x| x * 2).any(move |x| {
        seen.set(seen.get() + 1);
        *x >= 8
    });
    assert!(found);
    assert_eq!(evaluated.get(), 4);

    evaluated.set(0);
    let seen = evaluated.clone();
    let all_small = Stream::iterate(1u64, |x| x + 1).all(move |x| {
        seen.set(seen.get() + 1);
        *x < 3
    });
    assert!(!all_small);
    assert_eq!(evaluated.get(), 3);
}

#[test]
fn test_copy_shares_single_pass_state() {
    let a = Stream::range(0..4).nonreentrant();
    let b = a.clone();
    assert_eq!(a.take_one(), Some(0));
    assert_eq!(b.take_one(), Some(1));
    assert_eq!(collect(&a), vec![2, 3]);
    assert!(collect(&b).is_empty());
}

#[test]
fn test_reverse_of_reversible_source_stays_reentrant() {
    let r = Stream::range(0..4).map(|x| x * x).reverse();
    assert!(r.is_reentrant());
    assert_eq!(collect(&r), vec![9, 4, 1, 0]);
    assert_eq!(collect(&r), vec![9, 4, 1, 0]);

    let g = Stream::single_pass(vec![1, 2, 3]).reverse();
    assert!(!g.is_reentrant());
    assert_eq!(collect(&g), vec![3, 2, 1]);
}

#[test]
fn test_pipeline_with_sink() -> Result<()> {
    let mut sink = CollectSink::new();
    let written = Stream::range(1..6)
        .prepend([vec![0]])
        .append([vec![6, 7]])
        .enumerate()
        .starmap(|i: usize, x: i64| i as i64 * x)
        .drain_into(&mut sink)?;
    assert_eq!(written, 8);
    assert_eq!(sink.into_items(), vec![0, 1, 4, 9, 16, 25, 36, 49]);
    Ok(())
}
