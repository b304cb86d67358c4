//! Discovery execution logic.

use crate::args::{
    Cli, GrammarKind, parse_date_columns, parse_date_range, parse_filter, parse_range,
};
use anyhow::{Context, Result, anyhow};
use pv_discovery::query::{BooleanOp, BooleanQuery, DateRangeQuery, MembershipQuery, RangeQuery};
use pv_discovery::{
    AutoGrammar, ConstantQuery, DateColumns, DateRangeGrammar, Discoverer, DiscoveryConfig,
    FixedGrammar, Grammar, Partition, Query, StatsSnapshot, StdoutOutput, StorageOptions,
    storage_from_url,
};
use tracing::{debug, info};

/// Execute discovery with the given arguments.
pub async fn execute(args: Cli) -> Result<StatsSnapshot> {
    let grammar = build_grammar(&args)?;
    let query = build_query(&args)?;

    let (storage, root) =
        storage_from_url(&args.root, &storage_options(&args)).context("Failed to open storage")?;

    info!(
        root = %args.root,
        grammar = %grammar.description(),
        query = %query.description(),
        "Starting discovery"
    );

    let config = DiscoveryConfig::new()
        .with_max_concurrent_lists(args.concurrency)
        .with_max_parallel_directories(args.parallel_directories)
        .with_max_partitions(args.max_partitions);

    let output = StdoutOutput::new(args.output_format.into());
    let discoverer = Discoverer::new(storage, config);

    let stats = discoverer
        .discover_to(query.as_ref(), grammar.as_ref(), Partition::root(root), &output)
        .await
        .context("Discovery failed")?;

    Ok(stats)
}

fn storage_options(args: &Cli) -> StorageOptions {
    let mut options = StorageOptions::new();
    if let Some(region) = &args.region {
        options = options.with_region(region);
    }
    if let Some(endpoint) = &args.endpoint {
        options = options.with_endpoint(endpoint);
    }
    if let (Some(access_key), Some(secret_key)) = (&args.access_key, &args.secret_key) {
        options = options.with_credentials(access_key, secret_key, args.session_token.clone());
    }
    options
}

fn date_columns(args: &Cli) -> Result<DateColumns> {
    let (year, month, day) = parse_date_columns(&args.date_columns).map_err(|e| anyhow!(e))?;
    Ok(DateColumns::new(year, month, day))
}

/// Build the grammar from `--grammar`, `--grammar-kind` and `--filename`,
/// or from `--date-range` when `--date-grammar` is set.
pub fn build_grammar(args: &Cli) -> Result<Box<dyn Grammar>> {
    if args.date_grammar {
        let range = args
            .date_range
            .as_deref()
            .ok_or_else(|| anyhow!("--date-grammar needs --date-range"))?;
        let (start, end) = parse_date_range(range).map_err(|e| anyhow!(e))?;
        let grammar =
            DateRangeGrammar::build(start, end, date_columns(args)?, !args.no_column_in_path)?;
        return Ok(Box::new(grammar));
    }

    let filename = args.filename.as_deref();
    let grammar: Box<dyn Grammar> = match args.grammar_kind {
        GrammarKind::Auto => Box::new(AutoGrammar::from_description(&args.grammar, filename)?),
        GrammarKind::Fixed => Box::new(FixedGrammar::from_description(&args.grammar, filename)?),
    };
    Ok(grammar)
}

/// Build the query by AND-combining every filter flag.
///
/// Each `--filter` becomes a membership query, all `--range` flags form one
/// composite-key range, and `--date-range` (without `--date-grammar`) becomes
/// a date query. No filters at all select everything.
pub fn build_query(args: &Cli) -> Result<Box<dyn Query>> {
    let mut queries: Vec<Box<dyn Query>> = Vec::new();

    for filter in &args.filters {
        let (column, values) = parse_filter(filter).map_err(|e| anyhow!(e))?;
        queries.push(Box::new(MembershipQuery::new(column, values)));
    }

    if !args.ranges.is_empty() {
        let ranges = args
            .ranges
            .iter()
            .map(|r| parse_range(r).map_err(|e| anyhow!(e)))
            .collect::<Result<Vec<_>>>()?;
        queries.push(Box::new(RangeQuery::new(ranges)));
    }

    if let (Some(range), false) = (&args.date_range, args.date_grammar) {
        let (start, end) = parse_date_range(range).map_err(|e| anyhow!(e))?;
        queries.push(Box::new(DateRangeQuery::new(start, end, date_columns(args)?)));
    }

    debug!(filters = queries.len(), "Built query");

    let query = queries.into_iter().reduce(|left, right| -> Box<dyn Query> {
        Box::new(BooleanQuery::new(left, right, BooleanOp::And))
    });
    Ok(query.unwrap_or_else(|| Box::new(ConstantQuery::TRUE) as Box<dyn Query>))
}
