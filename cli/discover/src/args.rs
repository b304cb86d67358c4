//! CLI argument definitions for pv-discover.

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use pv_cli_common::LogLevel;
use pv_discovery::query::{ColumnComparator, ColumnRange};

/// Discover the partitions of a partitioned directory tree.
///
/// Walks a `key=value` (or positional) directory tree, pruning every subtree
/// the filters rule out, and prints the matching leaf partitions to stdout in
/// JSONL format (one JSON object per line).
///
/// ## Examples
///
/// Hive-style tree with a value filter:
///   pv-discover --root s3://bucket/table --grammar "year/month" -f "year=2022,2023"
///
/// Generated levels (no listing for col1 and col2):
///   pv-discover --root file:///data/t --grammar "col1=4/col2=[5,6]/colX"
///
/// Date tree enumerated from a range:
///   pv-discover --root s3://bucket/logs --date-range 2022-04-30..2022-05-02 --date-grammar
///
/// Composite-key range:
///   pv-discover --root file:///data/t --grammar "c1/c2" -r "c1=b..d" -r "c2=c..d"
#[derive(Parser, Debug)]
#[command(name = "pv-discover")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === Storage ===
    /// Root URL of the table (file:///abs/path, s3://bucket/prefix, memory://)
    #[arg(long, env = "PV_ROOT")]
    pub root: String,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Custom S3 endpoint URL (for LocalStack or MinIO)
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    pub endpoint: Option<String>,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// AWS session token
    #[arg(long, env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    pub session_token: Option<String>,

    // === Grammar ===
    /// Grammar description, e.g. "col1=4/col2=[5,6]/colX"
    ///
    /// Each level is `name`, `name=value` or `name=[v1,v2]`. Listed values are
    /// generated instead of listed from storage.
    #[arg(long, short = 'g', default_value = "")]
    pub grammar: String,

    /// How directory segments are parsed
    #[arg(long, value_enum, default_value = "auto")]
    pub grammar_kind: GrammarKind,

    /// Column bound from leaf filenames, with the same syntax as a grammar level
    #[arg(long)]
    pub filename: Option<String>,

    // === Filters ===
    /// Value filter "column=v1,v2" (can be specified multiple times)
    #[arg(long = "filter", short = 'f')]
    pub filters: Vec<String>,

    /// Range "column=min..max[:num|:lex]", or "column=*" to match any value
    /// (can be specified multiple times)
    ///
    /// All ranges form one composite key, compared in the order given. The
    /// upper bound is exclusive.
    #[arg(long = "range", short = 'r')]
    pub ranges: Vec<String>,

    /// Date range "YYYY-MM-DD..YYYY-MM-DD" (end exclusive)
    #[arg(long)]
    pub date_range: Option<String>,

    /// Column names for year, month and day
    #[arg(long, default_value = "year,month,day")]
    pub date_columns: String,

    /// Enumerate the date levels from --date-range instead of filtering a listed tree
    #[arg(long, requires = "date_range")]
    pub date_grammar: bool,

    /// Date directories carry bare values ("2022") instead of "year=2022"
    #[arg(long, requires = "date_grammar")]
    pub no_column_in_path: bool,

    // === Parallelism ===
    /// Maximum concurrent listing calls (must be >= 1)
    #[arg(long, default_value = "10", value_parser = parse_positive_usize)]
    pub concurrency: usize,

    /// Maximum sibling directories descended at once (must be >= 1)
    #[arg(long, default_value = "20", value_parser = parse_positive_usize)]
    pub parallel_directories: usize,

    /// Maximum number of partitions to output (0 = unlimited)
    #[arg(long, default_value = "0")]
    pub max_partitions: usize,

    // === Output ===
    /// Output format
    #[arg(long, value_enum, default_value = "jsonl")]
    pub output_format: OutputFormatArg,

    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

/// Grammar kind argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GrammarKind {
    /// Segments look like `name=value`
    Auto,
    /// Segments are bare values named by the grammar
    Fixed,
}

/// Output format argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    /// JSON Lines (one JSON object per line)
    Jsonl,
    /// Pretty-printed JSON
    Json,
}

impl From<OutputFormatArg> for pv_discovery::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Jsonl => pv_discovery::OutputFormat::Jsonl,
            OutputFormatArg::Json => pv_discovery::OutputFormat::Json,
        }
    }
}

/// Parse a positive usize (>= 1).
fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value < 1 {
        return Err("value must be at least 1".to_string());
    }
    Ok(value)
}

/// Parse a value filter `column=v1,v2`.
pub fn parse_filter(s: &str) -> Result<(String, Vec<String>), String> {
    let (column, values) = s
        .split_once('=')
        .ok_or_else(|| format!("filter '{s}' must look like column=v1,v2"))?;
    if column.is_empty() {
        return Err(format!("filter '{s}' has no column name"));
    }
    let values: Vec<String> = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    if values.is_empty() {
        return Err(format!("filter '{s}' has no values"));
    }
    Ok((column.to_string(), values))
}

/// Parse a range `column=min..max[:num|:lex]`, or `column=*` / `column=..:any`.
pub fn parse_range(s: &str) -> Result<ColumnRange, String> {
    let (column, bounds) = s
        .split_once('=')
        .ok_or_else(|| format!("range '{s}' must look like column=min..max"))?;
    if bounds == "*" {
        return Ok(ColumnRange::wildcard(column));
    }

    let (bounds, comparator) = match bounds.rsplit_once(':') {
        Some((bounds, "num")) => (bounds, ColumnComparator::Numeric),
        Some((bounds, "lex")) => (bounds, ColumnComparator::Lexicographic),
        Some((_, "any")) => return Ok(ColumnRange::wildcard(column)),
        Some((_, other)) => return Err(format!("unknown comparator '{other}' in range '{s}'")),
        None => (bounds, ColumnComparator::Lexicographic),
    };
    let (min, max) = bounds
        .split_once("..")
        .ok_or_else(|| format!("range '{s}' must look like column=min..max"))?;

    ColumnRange::new(column, min, max, comparator).map_err(|e| e.to_string())
}

/// Parse a date range `start..end`.
pub fn parse_date_range(s: &str) -> Result<(NaiveDate, NaiveDate), String> {
    let (start, end) = s
        .split_once("..")
        .ok_or_else(|| format!("date range '{s}' must look like YYYY-MM-DD..YYYY-MM-DD"))?;
    let parse = |d: &str| {
        NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").map_err(|e| format!("invalid date '{d}': {e}"))
    };
    Ok((parse(start)?, parse(end)?))
}

/// Parse year, month and day column names.
pub fn parse_date_columns(s: &str) -> Result<(String, String, String), String> {
    let names: Vec<&str> = s.split(',').map(str::trim).collect();
    match names.as_slice() {
        [year, month, day] if !year.is_empty() && !month.is_empty() && !day.is_empty() => {
            Ok((year.to_string(), month.to_string(), day.to_string()))
        }
        _ => Err(format!("date columns '{s}' must be three names, e.g. year,month,day")),
    }
}
