//! Discovery tests against the mock tree.

use crate::common::{MockStorage, paths};
use chrono::NaiveDate;
use pv_discovery::query::{
    AtomicQuery, ColumnRange, ConstantQuery, DateRangeQuery, MembershipQuery, RangeQuery, and,
};
use pv_discovery::{
    AutoGrammar, CollectingOutput, DateColumns, DateRangeGrammar, Discoverer, DiscoveryConfig,
    FixedGrammar, Partition, PvError, discover_partitions,
};
use std::sync::Arc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn pruning_tree() -> MockStorage {
    MockStorage::new(&[
        "t/col1=4/col2=5/colX=a/f1",
        "t/col1=4/col2=6/colX=b/f2",
        "t/col1=9/col2=6/colX=b/f3",
    ])
}

#[tokio::test]
async fn test_generated_levels_skip_pruned_branch() {
    let storage = pruning_tree();
    let grammar = AutoGrammar::from_description("col1=4/col2=[5,6]/colX", None).unwrap();

    let partitions = discover_partitions(
        &ConstantQuery::TRUE,
        &grammar,
        Partition::root("t"),
        &storage,
        &DiscoveryConfig::new(),
    )
    .await
    .unwrap();

    assert_eq!(
        paths(&partitions),
        vec!["t/col1=4/col2=5/colX=a/f1", "t/col1=4/col2=6/colX=b/f2"]
    );
    assert_eq!(partitions[0].column("col2"), Some("5"));
    assert_eq!(partitions[0].column("colX"), Some("a"));
    assert!(!storage.listed_under("t/col1=9"));
    // only the colX levels and the leaves are listed
    assert_eq!(storage.list_calls(), 4);
}

#[tokio::test]
async fn test_query_prunes_before_listing() {
    let storage = pruning_tree();
    let grammar = AutoGrammar::unconstrained();
    let query = MembershipQuery::eq("col1", "4");

    let partitions = discover_partitions(
        &query,
        &grammar,
        Partition::root("t/"),
        &storage,
        &DiscoveryConfig::new(),
    )
    .await
    .unwrap();

    assert_eq!(
        paths(&partitions),
        vec!["t/col1=4/col2=5/colX=a/f1", "t/col1=4/col2=6/colX=b/f2"]
    );
    assert!(storage.listed().contains(&"t/".to_string()));
    assert!(!storage.listed_under("t/col1=9"));
}

#[tokio::test]
async fn test_fully_generated_grammar_never_lists() {
    let storage = MockStorage::new(&["t/a/x/1.csv", "t/a/y/1.csv"]);
    let grammar = FixedGrammar::from_description("c1=[a]/c2=[x,y]", Some("f=[1.csv]")).unwrap();

    let partitions = discover_partitions(
        &ConstantQuery::TRUE,
        &grammar,
        Partition::root("t/"),
        &storage,
        &DiscoveryConfig::new(),
    )
    .await
    .unwrap();

    assert_eq!(paths(&partitions), vec!["t/a/x/1.csv", "t/a/y/1.csv"]);
    assert_eq!(partitions[1].column("c2"), Some("y"));
    assert_eq!(partitions[1].column("f"), Some("1.csv"));
    assert_eq!(storage.list_calls(), 0);
}

#[tokio::test]
async fn test_filename_level_lists_once() {
    let storage = MockStorage::new(&["t/a/x/1.csv", "t/a/x/2.csv"]);
    let grammar = FixedGrammar::from_description("c1=[a]/c2=[x]", Some("f")).unwrap();

    let partitions = discover_partitions(
        &ConstantQuery::TRUE,
        &grammar,
        Partition::root("t/"),
        &storage,
        &DiscoveryConfig::new(),
    )
    .await
    .unwrap();

    assert_eq!(paths(&partitions), vec!["t/a/x/1.csv", "t/a/x/2.csv"]);
    assert_eq!(storage.listed(), vec!["t/a/x/"]);
}

#[tokio::test]
async fn test_auto_filename_level_lists_each_leaf_once() {
    let storage = MockStorage::new(&["t/col1=4/col2=5/a.csv", "t/col1=4/col2=6/b.csv"]);
    let grammar = AutoGrammar::from_description("col1=[4]/col2=[5,6]", Some("fname")).unwrap();

    let partitions = discover_partitions(
        &ConstantQuery::TRUE,
        &grammar,
        Partition::root("t/"),
        &storage,
        &DiscoveryConfig::new(),
    )
    .await
    .unwrap();

    assert_eq!(
        paths(&partitions),
        vec!["t/col1=4/col2=5/a.csv", "t/col1=4/col2=6/b.csv"]
    );
    assert_eq!(partitions[1].column("fname"), Some("b.csv"));
    assert_eq!(storage.listed(), vec!["t/col1=4/col2=5/", "t/col1=4/col2=6/"]);
}

#[tokio::test]
async fn test_auto_generated_filenames_never_list() {
    let storage = MockStorage::new(&["t/col1=4/a.csv"]);
    let grammar = AutoGrammar::from_description("col1=[4]", Some("fname=[a.csv]")).unwrap();

    let partitions = discover_partitions(
        &ConstantQuery::TRUE,
        &grammar,
        Partition::root("t/"),
        &storage,
        &DiscoveryConfig::new(),
    )
    .await
    .unwrap();

    assert_eq!(paths(&partitions), vec!["t/col1=4/a.csv"]);
    assert_eq!(storage.list_calls(), 0);
}

#[tokio::test]
async fn test_directory_below_filename_level_aborts() {
    let storage = MockStorage::new(&["t/2022/a.csv", "t/2022/extra/b.csv"]);
    let grammar = FixedGrammar::from_description("year", Some("fname")).unwrap();

    let result = discover_partitions(
        &ConstantQuery::TRUE,
        &grammar,
        Partition::root("t/"),
        &storage,
        &DiscoveryConfig::new(),
    )
    .await;

    assert!(matches!(result, Err(PvError::GrammarExhausted(_))));
    assert!(!storage.listed_under("t/2022/extra"));
}

#[tokio::test]
async fn test_duplicate_binding_aborts() {
    let storage = MockStorage::new(&["t/c1=4/c1=3/f1"]);
    let grammar = AutoGrammar::from_description("c1=4/c1=3", None).unwrap();

    let result = discover_partitions(
        &ConstantQuery::TRUE,
        &grammar,
        Partition::root("t/"),
        &storage,
        &DiscoveryConfig::new(),
    )
    .await;

    assert!(matches!(
        result,
        Err(PvError::DuplicateColumn { column, .. }) if column == "c1"
    ));
}

#[tokio::test]
async fn test_auto_filename_parsing() {
    let storage = MockStorage::new(&["t/col1=4/a1.csv", "t/col1=4/b1.csv", "t/col1=5/a1.csv"]);
    let grammar = AutoGrammar::from_description("col1", Some("fname")).unwrap();
    let query = and(
        MembershipQuery::eq("col1", "4"),
        AtomicQuery::new(["fname"], |columns| columns["fname"].starts_with("a1")),
    );

    let partitions = discover_partitions(
        &query,
        &grammar,
        Partition::root("t/"),
        &storage,
        &DiscoveryConfig::new(),
    )
    .await
    .unwrap();

    assert_eq!(paths(&partitions), vec!["t/col1=4/a1.csv"]);
    assert_eq!(partitions[0].column("fname"), Some("a1.csv"));
    assert_eq!(storage.listed(), vec!["t/", "t/col1=4/"]);
}

#[tokio::test]
async fn test_fixed_grammar_with_numeric_range() {
    let storage = MockStorage::new(&[
        "t/2020/1/a.csv",
        "t/2021/12/b.csv",
        "t/2022/3/c.csv",
        "t/2023/1/d.csv",
    ]);
    let grammar = FixedGrammar::from_description("year/month", Some("fname")).unwrap();
    let query = RangeQuery::new(vec![ColumnRange::numeric("year", "2021", "2023").unwrap()]);

    let partitions = discover_partitions(
        &query,
        &grammar,
        Partition::root("t/"),
        &storage,
        &DiscoveryConfig::new(),
    )
    .await
    .unwrap();

    assert_eq!(paths(&partitions), vec!["t/2021/12/b.csv", "t/2022/3/c.csv"]);
    assert_eq!(partitions[0].column("month"), Some("12"));
    assert!(!storage.listed_under("t/2020"));
    assert!(!storage.listed_under("t/2023"));
}

#[tokio::test]
async fn test_date_range_grammar_lists_leaves_only() {
    let storage = MockStorage::new(&[
        "t/year=2022/month=4/day=29/f0",
        "t/year=2022/month=4/day=30/f1",
        "t/year=2022/month=5/day=1/f2",
        "t/year=2022/month=5/day=2/f3",
    ]);
    let grammar = DateRangeGrammar::build(
        date(2022, 4, 30),
        date(2022, 5, 2),
        DateColumns::default(),
        true,
    )
    .unwrap();

    let partitions = discover_partitions(
        &ConstantQuery::TRUE,
        &grammar,
        Partition::root("t/"),
        &storage,
        &DiscoveryConfig::new(),
    )
    .await
    .unwrap();

    assert_eq!(
        paths(&partitions),
        vec![
            "t/year=2022/month=4/day=30/f1",
            "t/year=2022/month=5/day=1/f2",
        ]
    );
    assert_eq!(
        storage.listed(),
        vec!["t/year=2022/month=4/day=30/", "t/year=2022/month=5/day=1/"]
    );
}

#[tokio::test]
async fn test_date_range_grammar_without_column_names() {
    let storage = MockStorage::new(&["t/2021/12/31/f0", "t/2022/1/1/f1"]);
    let grammar = DateRangeGrammar::build(
        date(2021, 12, 31),
        date(2022, 1, 2),
        DateColumns::default(),
        false,
    )
    .unwrap();

    let partitions = discover_partitions(
        &ConstantQuery::TRUE,
        &grammar,
        Partition::root("t/"),
        &storage,
        &DiscoveryConfig::new(),
    )
    .await
    .unwrap();

    assert_eq!(paths(&partitions), vec!["t/2021/12/31/f0", "t/2022/1/1/f1"]);
    assert_eq!(partitions[1].column("year"), Some("2022"));
    assert_eq!(partitions[1].column("day"), Some("1"));
}

#[tokio::test]
async fn test_date_range_query_prunes_days() {
    let storage = MockStorage::new(&[
        "t/year=2021/month=4/jaj=30/f4",
        "t/year=2022/month=4/jaj=29/f0",
        "t/year=2022/month=4/jaj=30/f1",
        "t/year=2022/month=5/jaj=1/f2",
        "t/year=2022/month=5/jaj=2/f3",
    ]);
    let grammar = AutoGrammar::from_description("year/month/jaj", None).unwrap();
    let query = DateRangeQuery::new(
        date(2022, 4, 30),
        date(2022, 5, 2),
        DateColumns::new("year", "month", "jaj"),
    );

    let partitions = discover_partitions(
        &query,
        &grammar,
        Partition::root("t/"),
        &storage,
        &DiscoveryConfig::new(),
    )
    .await
    .unwrap();

    assert_eq!(
        paths(&partitions),
        vec![
            "t/year=2022/month=4/jaj=30/f1",
            "t/year=2022/month=5/jaj=1/f2",
        ]
    );
    assert!(!storage.listed_under("t/year=2021"));
    assert!(!storage.listed_under("t/year=2022/month=4/jaj=29"));
    assert!(!storage.listed_under("t/year=2022/month=5/jaj=2"));
}

#[tokio::test]
async fn test_lexicographic_range_end_to_end() {
    let storage = MockStorage::new(&[
        "t/c1=a/c2=z/f",
        "t/c1=b/c2=b/f",
        "t/c1=b/c2=c/f",
        "t/c1=c/c2=a/f",
        "t/c1=d/c2=a/f",
        "t/c1=d/c2=d/f",
    ]);
    let grammar = AutoGrammar::from_description("c1/c2", None).unwrap();
    let query = RangeQuery::new(vec![
        ColumnRange::lexicographic("c1", "b", "d").unwrap(),
        ColumnRange::lexicographic("c2", "c", "d").unwrap(),
    ]);

    let partitions = discover_partitions(
        &query,
        &grammar,
        Partition::root("t/"),
        &storage,
        &DiscoveryConfig::new(),
    )
    .await
    .unwrap();

    assert_eq!(
        paths(&partitions),
        vec!["t/c1=b/c2=c/f", "t/c1=c/c2=a/f", "t/c1=d/c2=a/f"]
    );
    assert!(!storage.listed_under("t/c1=a"));
}

#[tokio::test]
async fn test_missing_generated_directory_fails() {
    let storage = MockStorage::new(&["t/col1=4/col2=1/f"]);
    let grammar = AutoGrammar::from_description("col1=[4,7]/col2", None).unwrap();

    let result = discover_partitions(
        &ConstantQuery::TRUE,
        &grammar,
        Partition::root("t/"),
        &storage,
        &DiscoveryConfig::new(),
    )
    .await;

    assert!(matches!(
        result,
        Err(PvError::StorageNotFound(path)) if path == "t/col1=7/"
    ));
}

#[tokio::test]
async fn test_listing_order_is_sorted_and_depth_first() {
    let storage = MockStorage::new(&[
        "t/c=2/b",
        "t/c=1/z",
        "t/c=1/a",
        "t/c=10/x",
    ]);
    let grammar = AutoGrammar::from_description("c", None).unwrap();

    for config in [
        DiscoveryConfig::new(),
        DiscoveryConfig::new()
            .with_max_concurrent_lists(1)
            .with_max_parallel_directories(1),
    ] {
        let partitions = discover_partitions(
            &ConstantQuery::TRUE,
            &grammar,
            Partition::root("t/"),
            &storage,
            &config,
        )
        .await
        .unwrap();

        assert_eq!(
            paths(&partitions),
            vec!["t/c=1/a", "t/c=1/z", "t/c=10/x", "t/c=2/b"]
        );
    }
}

#[tokio::test]
async fn test_max_partitions() {
    let storage = pruning_tree();
    let grammar = AutoGrammar::unconstrained();

    let partitions = discover_partitions(
        &ConstantQuery::TRUE,
        &grammar,
        Partition::root("t/"),
        &storage,
        &DiscoveryConfig::new().with_max_partitions(2),
    )
    .await
    .unwrap();

    assert_eq!(
        paths(&partitions),
        vec!["t/col1=4/col2=5/colX=a/f1", "t/col1=4/col2=6/colX=b/f2"]
    );
}

#[tokio::test]
async fn test_discoverer_reports_stats() {
    let storage = Arc::new(pruning_tree());
    let grammar = AutoGrammar::unconstrained();
    let query = MembershipQuery::eq("col1", "4");
    let output = CollectingOutput::new();

    let discoverer = Discoverer::new(storage.clone(), DiscoveryConfig::new());
    let stats = discoverer
        .discover_to(&query, &grammar, Partition::root("t/"), &output)
        .await
        .unwrap();

    assert_eq!(output.len(), 2);
    assert_eq!(stats.partitions_emitted, 2);
    assert_eq!(stats.listing_calls, storage.list_calls() as u64);
    assert_eq!(stats.directories_pruned, 1);
    assert!(stats.completed_at.is_some());
}

#[tokio::test]
async fn test_failed_discovery_outputs_nothing() {
    let storage = Arc::new(MockStorage::new(&["t/c1=4/c1=3/f1"]));
    let grammar = AutoGrammar::from_description("c1=4/c1=3", None).unwrap();
    let output = CollectingOutput::new();

    let result = Discoverer::new(storage, DiscoveryConfig::new())
        .discover_to(&ConstantQuery::TRUE, &grammar, Partition::root("t/"), &output)
        .await;

    assert!(result.is_err());
    assert!(output.is_empty());
}
