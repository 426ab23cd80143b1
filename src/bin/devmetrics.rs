use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

use devmetrics::{
    ActivityInput, Benchmark, ComparisonResult, CompetitiveInsight, Developer, DeveloperMetrics,
    EngineConfig, Insight, InsightContext, MetricKey, MetricsEngine, RankedDeveloper,
    SimilarityMatch, SkillTrend, SkillTrendPoint,
};

#[derive(Parser)]
#[command(name = "devmetrics", about = "Developer metrics and peer comparison")]
struct Cli {
    /// Config file (default: ~/.devmetrics/config.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute metrics from an activity file
    Metrics {
        /// JSON file with raw activity counters
        input: PathBuf,
        /// First activity date (YYYY-MM-DD); overrides weeksActive
        #[arg(long)]
        first_activity: Option<String>,
        /// End of the activity window (YYYY-MM-DD, default: today)
        #[arg(long)]
        as_of: Option<String>,
        /// JSON file with skill usage history
        #[arg(long)]
        history: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize skill usage history into per-skill trends
    Trends {
        history: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Percentile and rank of one developer against the rest of a cohort
    Benchmark {
        /// JSON file with a list of developers
        cohort: PathBuf,
        /// Developer id to benchmark
        #[arg(long)]
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Per-metric distribution across a cohort
    Cohort {
        cohort: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Compare two developers from a cohort
    Compare {
        cohort: PathBuf,
        user1: String,
        user2: String,
        #[arg(long)]
        json: bool,
    },
    /// Rank every developer in a cohort
    Rank {
        cohort: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Find the developers most similar to one member of a cohort
    Similar {
        cohort: PathBuf,
        #[arg(long)]
        id: String,
        /// Maximum matches
        #[arg(long, default_value = "5")]
        top: usize,
        #[arg(long)]
        json: bool,
    },
    /// Competitive position of one developer within a cohort
    Position {
        cohort: PathBuf,
        #[arg(long)]
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Prioritized insights for one developer within a cohort
    Insights {
        cohort: PathBuf,
        #[arg(long)]
        id: String,
        /// JSON file with skill usage history
        #[arg(long)]
        history: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the default config path
    Path,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = EngineConfig::load_or_default(cli.config.as_deref())?;
    let engine = MetricsEngine::new(config)?;

    match cli.command {
        Commands::Metrics {
            input,
            first_activity,
            as_of,
            history,
            json,
        } => {
            let mut activity: ActivityInput = load_json(&input)?;
            if let Some(first) = first_activity {
                let first = parse_date_arg(&first)?;
                let as_of = match as_of {
                    Some(s) => parse_date_arg(&s)?,
                    None => chrono::Local::now().date_naive(),
                };
                activity.weeks_active = ActivityInput::weeks_since(first, as_of);
            }
            let trends = match history {
                Some(path) => engine.skill_trends(&load_json::<Vec<SkillTrendPoint>>(&path)?),
                None => Vec::new(),
            };
            let metrics = engine.developer_metrics(&activity);
            let summary = engine.summary(&metrics, &trends);
            if json {
                let out = serde_json::json!({ "metrics": metrics, "summary": summary });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("Developer Metrics ({:.1} weeks active)", activity.weeks_active);
                print_metrics(&metrics);
                if !summary.is_empty() {
                    println!("  Summary:");
                    for line in &summary {
                        println!("    - {line}");
                    }
                }
            }
        }
        Commands::Trends { history, json } => {
            let points: Vec<SkillTrendPoint> = load_json(&history)?;
            let trends = engine.skill_trends(&points);
            if json {
                println!("{}", serde_json::to_string_pretty(&trends)?);
            } else {
                print_trends(&trends);
            }
        }
        Commands::Benchmark { cohort, id, json } => {
            let developers: Vec<Developer> = load_json(&cohort)?;
            let (subject, peers) = split_subject(&developers, &id)?;
            let benchmarks = engine.benchmarks(&subject.metrics, &peers);
            if json {
                println!("{}", serde_json::to_string_pretty(&benchmarks)?);
            } else {
                println!("Benchmarks: {} against {} peers", subject.name, peers.len());
                print_benchmarks(&subject.metrics, &benchmarks);
            }
        }
        Commands::Cohort { cohort, json } => {
            let developers: Vec<Developer> = load_json(&cohort)?;
            let metrics: Vec<DeveloperMetrics> =
                developers.iter().map(|d| d.metrics.clone()).collect();
            let stats = engine.cohort_statistics(&metrics);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Cohort: {} developers", developers.len());
                println!(
                    "  {:<28} {:>10} {:>10} {:>10} {:>10} {:>10}",
                    "Metric", "Mean", "Median", "P90", "Min", "Max"
                );
                for (key, d) in &stats {
                    println!(
                        "  {:<28} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
                        key.label(),
                        d.mean,
                        d.median,
                        d.p90,
                        d.min,
                        d.max
                    );
                }
            }
        }
        Commands::Compare {
            cohort,
            user1,
            user2,
            json,
        } => {
            let developers: Vec<Developer> = load_json(&cohort)?;
            let a = find_developer(&developers, &user1)?;
            let b = find_developer(&developers, &user2)?;
            let result = engine.compare(a, b)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_comparison(&result);
            }
        }
        Commands::Rank { cohort, json } => {
            let developers: Vec<Developer> = load_json(&cohort)?;
            let ranked = engine.rank(&developers)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ranked)?);
            } else {
                print_ranking(&ranked);
            }
        }
        Commands::Similar {
            cohort,
            id,
            top,
            json,
        } => {
            let developers: Vec<Developer> = load_json(&cohort)?;
            let target = find_developer(&developers, &id)?;
            let candidates: Vec<Developer> =
                developers.iter().filter(|d| d.id != id).cloned().collect();
            let matches = engine.similar(&target.metrics, &candidates, top)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else {
                println!("Developers similar to {}:", target.name);
                print_similar(&matches);
            }
        }
        Commands::Position { cohort, id, json } => {
            let developers: Vec<Developer> = load_json(&cohort)?;
            let (subject, peers) = split_subject(&developers, &id)?;
            let insight = engine.competitive(&subject.metrics, &peers)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&insight)?);
            } else {
                println!("Competitive position: {}", subject.name);
                print_competitive(&insight);
            }
        }
        Commands::Insights {
            cohort,
            id,
            history,
            json,
        } => {
            let developers: Vec<Developer> = load_json(&cohort)?;
            let (subject, peers) = split_subject(&developers, &id)?;
            let trends = match history {
                Some(path) => engine.skill_trends(&load_json::<Vec<SkillTrendPoint>>(&path)?),
                None => Vec::new(),
            };
            let competitive = if peers.is_empty() {
                None
            } else {
                Some(engine.competitive(&subject.metrics, &peers)?)
            };
            let context = InsightContext {
                trends: &trends,
                competitive: competitive.as_ref(),
            };
            let insights = engine.insights_with_context(&subject.metrics, &context);
            if json {
                println!("{}", serde_json::to_string_pretty(&insights)?);
            } else {
                println!("Insights: {}", subject.name);
                print_insights(&insights);
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", serde_json::to_string_pretty(engine.config())?);
            }
            ConfigAction::Path => {
                println!("{}", EngineConfig::default_path()?.display());
            }
        },
    }

    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn parse_date_arg(s: &str) -> anyhow::Result<chrono::NaiveDate> {
    devmetrics::date_util::parse_date(s)
        .ok_or_else(|| anyhow::anyhow!("invalid date '{s}', expected YYYY-MM-DD"))
}

fn find_developer<'a>(developers: &'a [Developer], id: &str) -> anyhow::Result<&'a Developer> {
    developers
        .iter()
        .find(|d| d.id == id)
        .ok_or_else(|| anyhow::anyhow!("developer '{id}' not found in cohort"))
}

fn split_subject<'a>(
    developers: &'a [Developer],
    id: &str,
) -> anyhow::Result<(&'a Developer, Vec<DeveloperMetrics>)> {
    let subject = find_developer(developers, id)?;
    let peers = developers
        .iter()
        .filter(|d| d.id != id)
        .map(|d| d.metrics.clone())
        .collect();
    Ok((subject, peers))
}

fn join_labels(keys: &[MetricKey]) -> String {
    keys.iter().map(|k| k.label()).collect::<Vec<_>>().join(", ")
}

fn print_metrics(m: &DeveloperMetrics) {
    let mut current = None;
    for (key, value) in m.iter() {
        if current != Some(key.dimension()) {
            current = Some(key.dimension());
            println!("  {:?}", key.dimension());
        }
        println!("    {:<26} {:>10.2}", key.label(), value);
    }
}

fn print_trends(trends: &[SkillTrend]) {
    if trends.is_empty() {
        println!("No skill history.");
        return;
    }
    println!(
        "  {:<20} {:<14} {:>8} {:>8} {:>6}",
        "Skill", "Category", "Growth", "Current", "Points"
    );
    for t in trends {
        println!(
            "  {:<20} {:<14} {:>+8.1} {:>8.1} {:>6}",
            t.skill, t.category, t.proficiency_growth, t.current_usage, t.data_points
        );
    }
}

fn print_benchmarks(m: &DeveloperMetrics, benchmarks: &BTreeMap<MetricKey, Benchmark>) {
    println!(
        "  {:<28} {:>10} {:>11} {:>5}",
        "Metric", "Value", "Percentile", "Rank"
    );
    for (key, b) in benchmarks {
        println!(
            "  {:<28} {:>10.2} {:>10.1}% {:>5}",
            key.label(),
            m.get(*key),
            b.percentile,
            b.rank
        );
    }
}

fn print_comparison(r: &ComparisonResult) {
    println!("Comparison: {} vs {}", r.user1.name, r.user2.name);
    println!(
        "  Overall score: {:.1} vs {:.1}",
        r.overall_score.user1, r.overall_score.user2
    );
    for c in &r.comparisons {
        let winner = match c.winner {
            devmetrics::Winner::User1 => r.user1.name.as_str(),
            devmetrics::Winner::User2 => r.user2.name.as_str(),
            devmetrics::Winner::Tie => "tie",
        };
        println!(
            "  {:<28} {:>10.2} {:>10.2}  {:<16} ({:?})",
            c.metric.label(),
            c.user1_value,
            c.user2_value,
            winner,
            c.significance
        );
    }
    println!("  {} leads in: {}", r.user1.name, join_labels(&r.strengths.user1));
    println!("  {} leads in: {}", r.user2.name, join_labels(&r.strengths.user2));
}

fn print_ranking(ranked: &[RankedDeveloper]) {
    for r in ranked {
        println!("  #{:<3} {:<30} {:>6.1}", r.rank, r.name, r.score);
    }
}

fn print_similar(matches: &[SimilarityMatch]) {
    if matches.is_empty() {
        println!("  (no candidates)");
    }
    for m in matches {
        let areas: Vec<&str> = m.matching_areas.iter().map(|k| k.label()).collect();
        println!(
            "  {:<30} {:>5.1}%  {}",
            m.name,
            m.similarity * 100.0,
            areas.join(", ")
        );
    }
}

fn print_competitive(c: &CompetitiveInsight) {
    println!("  Position:   {}", c.position.as_str());
    println!("  Percentile: {:.1}", c.percentile);
    println!("  Ahead in:   {}", join_labels(&c.outperforming_areas));
    println!("  Behind in:  {}", join_labels(&c.underperforming_areas));
    for line in &c.actionable_insights {
        println!("    - {line}");
    }
}

fn print_insights(insights: &[Insight]) {
    if insights.is_empty() {
        println!("  Nothing to report.");
    }
    for i in insights {
        println!("  [{}/{}] {}", i.priority, i.category, i.title);
        println!("    {}", i.description);
        for action in &i.action_items {
            println!("    - {action}");
        }
        println!("    Impact: {}, timeframe: {}", i.estimated_impact, i.timeframe);
    }
}
