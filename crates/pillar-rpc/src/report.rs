//! Report sinks for a finished [`RewardTable`].
//!
//! - [`CsvReportSink`] — comma-delimited file with a header row
//! - [`JsonReportSink`] — pretty-printed JSON of the whole table
//! - [`ConsoleReport`] — fixed-width text table for a terminal

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use pillar_core::error::ReportError;
use pillar_core::traits::ReportSink;
use pillar_core::types::{RewardRow, RewardTable, SelectionRule, Tier};
use tracing::info;

/// Column names, in output order.
pub const CSV_HEADER: [&str; 15] = [
    "name",
    "MomentumReward%",
    "DelegateReward%",
    "producedMomentums",
    "expectedMomentums",
    "rawWeight",
    "weight",
    "pillarRank",
    "tier",
    "producedRate",
    "epochExpectedMomentums",
    "momentumRewardsForMe",
    "delegationRewardsForMe",
    "epochRewardsForMe",
    "selectionRule",
];

fn tier_label(tier: Tier) -> &'static str {
    match tier {
        Tier::Top => "top",
        Tier::Other => "other",
    }
}

/// Quote a field if it contains the delimiter, a quote, or a line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_line(row: &RewardRow, rule: SelectionRule) -> String {
    [
        escape_field(&row.name),
        format!("{}", row.momentum_reward_share * 100.0),
        format!("{}", row.delegate_reward_share * 100.0),
        row.produced_momentums.to_string(),
        row.expected_momentums.to_string(),
        row.raw_weight.to_string(),
        format!("{}", row.effective_weight),
        row.rank.to_string(),
        tier_label(row.tier).to_string(),
        format!("{}", row.produced_rate),
        row.tier_expected_momentums.to_string(),
        format!("{}", row.momentum_reward),
        format!("{}", row.delegation_reward),
        format!("{}", row.total_reward),
        rule.to_string(),
    ]
    .join(",")
}

/// Write `table` as CSV to any writer.
pub fn write_csv<W: Write>(mut out: W, table: &RewardTable) -> std::io::Result<()> {
    writeln!(out, "{}", CSV_HEADER.join(","))?;
    for row in &table.rows {
        writeln!(out, "{}", csv_line(row, table.simulation.rule))?;
    }
    out.flush()
}

/// Writes the table to a delimited file, replacing any previous contents.
#[derive(Debug, Clone)]
pub struct CsvReportSink {
    path: PathBuf,
}

impl CsvReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for CsvReportSink {
    fn write(&mut self, table: &RewardTable) -> Result<(), ReportError> {
        let file = File::create(&self.path)?;
        write_csv(BufWriter::new(file), table)?;
        info!(path = %self.path.display(), rows = table.rows.len(), "wrote csv report");
        Ok(())
    }
}

/// Writes the full table, summary included, as JSON.
#[derive(Debug, Clone)]
pub struct JsonReportSink {
    path: PathBuf,
}

impl JsonReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for JsonReportSink {
    fn write(&mut self, table: &RewardTable) -> Result<(), ReportError> {
        let mut out = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut out, table)?;
        out.flush()?;
        info!(path = %self.path.display(), rows = table.rows.len(), "wrote json report");
        Ok(())
    }
}

/// Render the summary and the top `limit` rows as text.
pub fn render_table(table: &RewardTable, limit: Option<usize>) -> String {
    let mut s = String::new();
    s.push_str(&format!("Amount of pillars: {}\n", table.rows.len()));
    s.push_str(&format!("Active pillars: {}\n", table.active_producers));
    s.push_str(&format!("Total delegated ZNN: {:.0}\n", table.total_effective_weight));
    s.push_str(&format!(
        "Daily emission: {} ZNN (day {} since genesis)\n",
        table.daily_emission, table.elapsed_days
    ));
    s.push_str(&format!(
        "Expected momentums per day: top 30 = {}, others = {} ({} committees)\n\n",
        table.simulation.top_tier_daily_momentums,
        table.simulation.other_tier_daily_momentums,
        table.simulation.rule,
    ));
    s.push_str(&format!(
        "{:>4}  {:<24} {:>5} {:>12} {:>6} {:>6} {:>6} {:>12} {:>12} {:>12} {:>8}\n",
        "#",
        "pillar",
        "rank",
        "weight",
        "prod%",
        "mom%",
        "del%",
        "momentum",
        "delegation",
        "total",
        "apr%"
    ));

    let shown = limit.unwrap_or(table.rows.len());
    for (i, row) in table.rows.iter().take(shown).enumerate() {
        s.push_str(&format!(
            "{:>4}  {:<24} {:>5} {:>12.0} {:>6.1} {:>6.0} {:>6.0} \
             {:>12.6} {:>12.6} {:>12.6} {:>8.2}\n",
            i + 1,
            truncate(&row.name, 24),
            row.rank,
            row.effective_weight,
            row.produced_rate * 100.0,
            row.momentum_reward_share * 100.0,
            row.delegate_reward_share * 100.0,
            row.momentum_reward,
            row.delegation_reward,
            row.total_reward,
            row.annual_yield_percent(table.holder_balance),
        ));
    }
    if shown < table.rows.len() {
        s.push_str(&format!("... {} more\n", table.rows.len() - shown));
    }
    s
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let mut t: String = name.chars().take(width - 1).collect();
        t.push('~');
        t
    }
}

/// Prints the rendered table to a writer (stdout by default).
pub struct ConsoleReport<W: Write> {
    out: W,
    limit: Option<usize>,
}

impl ConsoleReport<std::io::Stdout> {
    pub fn stdout(limit: Option<usize>) -> Self {
        Self { out: std::io::stdout(), limit }
    }
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W, limit: Option<usize>) -> Self {
        Self { out, limit }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for ConsoleReport<W> {
    fn write(&mut self, table: &RewardTable) -> Result<(), ReportError> {
        self.out.write_all(render_table(table, self.limit).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pillar_core::types::SimulationResult;

    fn row(name: &str, rank: usize, total: f64) -> RewardRow {
        RewardRow {
            name: name.to_string(),
            momentum_reward_share: 0.25,
            delegate_reward_share: 0.8,
            produced_momentums: 9,
            expected_momentums: 10,
            raw_weight: 100_000_000_000,
            effective_weight: 1100.0,
            rank,
            tier: Tier::from_rank(rank),
            produced_rate: 0.9,
            tier_expected_momentums: 144,
            momentum_reward: total / 2.0,
            delegation_reward: total / 2.0,
            total_reward: total,
        }
    }

    fn table() -> RewardTable {
        RewardTable {
            holder_balance: 100.0,
            elapsed_days: 10,
            daily_emission: 14_400.0,
            active_producers: 2,
            total_effective_weight: 2200.0,
            simulation: SimulationResult {
                top_tier_daily_momentums: 144,
                other_tier_daily_momentums: 72,
                rule: SelectionRule::Spillover,
            },
            rows: vec![row("Alpha", 2, 0.5), row("Beta, Inc", 1, 0.25)],
        }
    }

    #[test]
    fn csv_has_header_and_rows() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &table()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].split(',').count(), CSV_HEADER.len());
        assert!(lines[1].starts_with("Alpha,25,80,9,10,100000000000,1100,2,top,0.9,144,"));
        assert!(lines[1].ends_with(",spillover"));
    }

    #[test]
    fn csv_quotes_names_with_commas() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &table()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.lines().nth(2).unwrap().starts_with("\"Beta, Inc\","));
    }

    #[test]
    fn escape_doubles_quotes() {
        assert_eq!(escape_field("a\"b"), "\"a\"\"b\"");
        assert_eq!(escape_field("plain"), "plain");
    }

    #[test]
    fn csv_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let mut sink = CsvReportSink::new(&path);
        sink.write(&table()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("name,MomentumReward%"));
    }

    #[test]
    fn csv_sink_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvReportSink::new(dir.path().join("nope").join("report.csv"));
        assert!(matches!(sink.write(&table()), Err(ReportError::Io(_))));
    }

    #[test]
    fn json_sink_round_trips_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        JsonReportSink::new(&path).write(&table()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let back: RewardTable = serde_json::from_str(&text).unwrap();
        assert_eq!(back, table());
    }

    #[test]
    fn console_renders_summary_and_limit() {
        let mut console = ConsoleReport::new(Vec::new(), Some(1));
        console.write(&table()).unwrap();
        let text = String::from_utf8(console.into_inner()).unwrap();
        assert!(text.contains("Amount of pillars: 2"));
        assert!(text.contains("Total delegated ZNN: 2200"));
        assert!(text.contains("top 30 = 144, others = 72 (spillover committees)"));
        assert!(text.contains("Alpha"));
        assert!(!text.contains("Beta"));
        assert!(text.contains("... 1 more"));
    }

    #[test]
    fn long_names_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc~");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
