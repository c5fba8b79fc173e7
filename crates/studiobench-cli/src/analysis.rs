//! Read-only engine commands: report, rank, market, recommend, compare, tiers.
//!
//! Each handler loads a snapshot, runs the engine and prints either tables or
//! the JSON envelope.

use serde::Serialize;
use studiobench_core::{AppConfig, EngineConfig, Offer};
use studiobench_engine::dashboard::all_offers;
use studiobench_engine::ranking::offers_of;
use studiobench_engine::{
    build_dashboard, comparability_band, market_buckets, overall_position, rank_competitors,
    recommend_all, score_pair, tier_summary, BenchmarkDelta, CompetitorFilter, MarketBucket,
    PairBreakdown, PinSet, PositionSummary, Ranking, Recommendation, TierSummaryRow,
};

use crate::output::{fmt_eur, fmt_percent, print_json, print_warnings, truncate, Output};
use crate::source::load_snapshot;

/// Run the full dashboard.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or the output cannot be
/// serialized.
pub(crate) async fn run_report(
    config: &AppConfig,
    engine: &EngineConfig,
    out: Output,
    selected: Option<&str>,
) -> anyhow::Result<()> {
    let loaded = load_snapshot(config).await?;
    let pins = PinSet::from_ids(loaded.snapshot.pinned_ids.iter(), engine.pin_limit);
    let report = build_dashboard(&loaded.snapshot, &pins, selected, engine);

    if out.is_json() {
        return print_json("report", &loaded.source, &loaded.warnings, &report);
    }

    print_warnings(&loaded.warnings);
    if loaded.snapshot.is_empty() {
        println!("no data available from {}", loaded.source);
        return Ok(());
    }

    println!("== Market ==");
    print_market(&report.market);
    println!();
    println!("== Most similar competitors ==");
    print_ranking(&report.ranking);
    println!();
    println!("== Recommendations ==");
    print_recommendations(&report.recommendations);
    println!();
    print_position(report.position.as_ref());
    println!();
    println!("== Pinned and selected vs. market ==");
    print_benchmark(&report.competitor_benchmark);
    Ok(())
}

/// Rank competitors that pass `filter`.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or the output cannot be
/// serialized.
pub(crate) async fn run_rank(
    config: &AppConfig,
    engine: &EngineConfig,
    out: Output,
    filter: &CompetitorFilter,
) -> anyhow::Result<()> {
    let loaded = load_snapshot(config).await?;
    let (own, offers) = all_offers(&loaded.snapshot, engine);
    let candidates: Vec<_> = filter.apply(&loaded.snapshot.competitors).cloned().collect();
    let ranking = rank_competitors(&candidates, &own, &offers, engine);

    if out.is_json() {
        return print_json("rank", &loaded.source, &loaded.warnings, &ranking);
    }

    print_warnings(&loaded.warnings);
    if !filter.is_empty() {
        println!(
            "{} of {} competitors match the filter",
            candidates.len(),
            loaded.snapshot.competitors.len()
        );
    }
    if own.is_empty() {
        println!("no own offers for '{}'; nothing to rank against", engine.own_studio_id);
        return Ok(());
    }
    print_ranking(&ranking);
    Ok(())
}

/// Print market bucket statistics.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or the output cannot be
/// serialized.
pub(crate) async fn run_market(
    config: &AppConfig,
    engine: &EngineConfig,
    out: Output,
) -> anyhow::Result<()> {
    let loaded = load_snapshot(config).await?;
    let (_, offers) = all_offers(&loaded.snapshot, engine);
    let buckets = market_buckets(&offers);

    if out.is_json() {
        return print_json("market", &loaded.source, &loaded.warnings, &buckets);
    }
    print_warnings(&loaded.warnings);
    print_market(&buckets);
    Ok(())
}

#[derive(Debug, Serialize)]
struct RecommendOutput {
    recommendations: Vec<Recommendation>,
    position: Option<PositionSummary>,
}

/// Recommend a price for every own offer.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or the output cannot be
/// serialized.
pub(crate) async fn run_recommend(
    config: &AppConfig,
    engine: &EngineConfig,
    out: Output,
) -> anyhow::Result<()> {
    let loaded = load_snapshot(config).await?;
    let (own, offers) = all_offers(&loaded.snapshot, engine);
    let result = RecommendOutput {
        recommendations: recommend_all(&own, &offers, engine),
        position: overall_position(&own, &offers, engine),
    };

    if out.is_json() {
        return print_json("recommend", &loaded.source, &loaded.warnings, &result);
    }
    print_warnings(&loaded.warnings);
    print_recommendations(&result.recommendations);
    println!();
    print_position(result.position.as_ref());
    Ok(())
}

#[derive(Debug, Serialize)]
struct ComparedPair {
    own_offer: String,
    competitor_offer: String,
    band: &'static str,
    #[serde(flatten)]
    breakdown: PairBreakdown,
}

/// Score every own offer against every offer of one competitor.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded, the competitor is not
/// listed, or the output cannot be serialized.
pub(crate) async fn run_compare(
    config: &AppConfig,
    engine: &EngineConfig,
    out: Output,
    competitor_id: &str,
) -> anyhow::Result<()> {
    let loaded = load_snapshot(config).await?;
    let snapshot = &loaded.snapshot;
    let competitor = snapshot
        .competitors
        .iter()
        .find(|c| c.competitor_id.as_deref() == Some(competitor_id))
        .ok_or_else(|| anyhow::anyhow!("competitor '{competitor_id}' is not listed"))?;

    let own = snapshot.own_offers(&engine.own_studio_id);
    let theirs: Vec<&Offer> = offers_of(competitor, &snapshot.offers).collect();
    let pairs = compare_pairs(&own, &theirs);

    if out.is_json() {
        return print_json("compare", &loaded.source, &loaded.warnings, &pairs);
    }

    print_warnings(&loaded.warnings);
    println!(
        "{} own offers x {} offers of {}",
        own.len(),
        theirs.len(),
        competitor.display_name()
    );
    if pairs.is_empty() {
        println!("nothing to compare");
        return Ok(());
    }

    println!(
        "{:<28}{:<28}{:>6}  {:<7}FIELDS",
        "OWN OFFER", "THEIR OFFER", "SCORE", "BAND"
    );
    for pair in &pairs {
        let fields: Vec<String> = pair
            .breakdown
            .fields
            .iter()
            .map(|f| format!("{}={}/{}", f.field.as_str(), f.points, f.max_points))
            .collect();
        println!(
            "{:<28}{:<28}{:>6}  {:<7}{}",
            truncate(&pair.own_offer, 26),
            truncate(&pair.competitor_offer, 26),
            pair.breakdown.total,
            pair.band,
            fields.join(" ")
        );
    }
    Ok(())
}

fn compare_pairs(own: &[Offer], theirs: &[&Offer]) -> Vec<ComparedPair> {
    own.iter()
        .flat_map(|mine| {
            theirs.iter().map(move |other| {
                let breakdown = score_pair(mine, other);
                ComparedPair {
                    own_offer: mine.label(),
                    competitor_offer: other.label(),
                    band: comparability_band(breakdown.total).as_str(),
                    breakdown,
                }
            })
        })
        .collect()
}

/// Print per-tier price statistics.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or the output cannot be
/// serialized.
pub(crate) async fn run_tiers(
    config: &AppConfig,
    engine: &EngineConfig,
    out: Output,
) -> anyhow::Result<()> {
    let loaded = load_snapshot(config).await?;
    let rows = tier_summary(&loaded.snapshot.offers, &loaded.snapshot.competitors, engine);

    if out.is_json() {
        return print_json("tiers", &loaded.source, &loaded.warnings, &rows);
    }
    print_warnings(&loaded.warnings);
    print_tiers(&rows);
    Ok(())
}

fn print_market(buckets: &[MarketBucket]) {
    if buckets.is_empty() {
        println!("no priced offers");
        return;
    }
    println!(
        "{:<14}{:<16}{:>6}  {:<8}{:>4}{:>10}{:>10}{:>10}",
        "TYPE", "CLASS", "MIN", "HEAT", "N", "LOW", "MEDIAN", "HIGH"
    );
    for bucket in buckets {
        let key = &bucket.key;
        println!(
            "{:<14}{:<16}{:>6}  {:<8}{:>4}{:>10}{:>10}{:>10}",
            truncate(&key.offer_type, 13),
            truncate(&key.class_type, 15),
            key.class_length_min,
            key.heat,
            bucket.stats.count,
            fmt_eur(Some(bucket.stats.min)),
            fmt_eur(Some(bucket.stats.median)),
            fmt_eur(Some(bucket.stats.max)),
        );
    }
}

fn print_ranking(ranking: &Ranking) {
    if ranking.top.is_empty() {
        println!("no comparable competitors");
        return;
    }
    println!(
        "{:>3}  {:<26}{:<8}{:>6}{:>7}{:>7}{:>6}{:>6}{:>6}  PIN",
        "#", "COMPETITOR", "TIER", "SCORE", "AVG", "PAIRS", "SEG", "TIER", "DIST"
    );
    for row in &ranking.top {
        let b = &row.breakdown;
        println!(
            "{:>3}  {:<26}{:<8}{:>6}{:>7.1}{:>7}{:>6.0}{:>6.0}{:>6.0}  {}",
            row.rank,
            truncate(row.competitor.display_name(), 25),
            row.competitor.tier.map_or("\u{2014}", |t| t.as_str()),
            row.score,
            b.avg_comparability,
            b.pair_count,
            b.segment_bonus,
            b.tier_bonus,
            b.distance_bonus,
            if row.pin_worthy { "*" } else { "" },
        );
    }
    if !ranking.pin_worthy_ids.is_empty() {
        println!("* pin-worthy: {}", ranking.pin_worthy_ids.join(", "));
    }
}

fn print_recommendations(recommendations: &[Recommendation]) {
    if recommendations.is_empty() {
        println!("no own offers to price");
        return;
    }
    for rec in recommendations {
        println!(
            "{} ({} comparable, {} confidence)",
            rec.offer_label,
            rec.comparable_count,
            rec.confidence.as_str()
        );
        println!(
            "  own {}  market median {}  delta {}",
            fmt_eur(rec.own_price_per_class),
            fmt_eur(rec.market.as_ref().map(|m| m.median)),
            fmt_percent(rec.delta_percent),
        );
        println!("  {}: {}", rec.verdict.label(), rec.action);
        if let Some(range) = &rec.suggested_range {
            println!(
                "  target {}  range {} to {}",
                fmt_eur(rec.target_price),
                fmt_eur(Some(range.low)),
                fmt_eur(Some(range.high)),
            );
        }
    }
}

fn print_position(position: Option<&PositionSummary>) {
    match position {
        Some(p) => println!(
            "Overall position: {} (own avg {} vs market avg {}, {})",
            p.position.as_str(),
            fmt_eur(Some(p.own_average)),
            fmt_eur(Some(p.market_average)),
            fmt_percent(Some(p.delta_percent)),
        ),
        None => println!("Overall position: not enough priced offers"),
    }
}

fn print_benchmark(rows: &[BenchmarkDelta]) {
    if rows.is_empty() {
        println!("no pinned or selected competitor offers with market data");
        return;
    }
    println!(
        "{:<24}{:<14}{:<16}{:>10}{:>10}{:>9}",
        "PLAYER", "TYPE", "CLASS", "PRICE", "MEDIAN", "DELTA"
    );
    for row in rows {
        println!(
            "{:<24}{:<14}{:<16}{:>10}{:>10}{:>9}",
            truncate(&row.player, 23),
            truncate(&row.key.offer_type, 13),
            truncate(&row.key.class_type, 15),
            fmt_eur(Some(row.selected_price)),
            fmt_eur(Some(row.market_median)),
            format!("{:+.2}", row.delta),
        );
    }
}

fn print_tiers(rows: &[TierSummaryRow]) {
    if rows.is_empty() {
        println!("no tiered competitor offers with prices");
        return;
    }
    println!(
        "{:<8}{:<14}{:>4}{:>10}{:>10}{:>10}",
        "TIER", "TYPE", "N", "LOW", "MEDIAN", "HIGH"
    );
    for row in rows {
        println!(
            "{:<8}{:<14}{:>4}{:>10}{:>10}{:>10}",
            row.tier.as_str(),
            row.offer_type.as_str(),
            row.stats.count,
            fmt_eur(Some(row.stats.min)),
            fmt_eur(Some(row.stats.median)),
            fmt_eur(Some(row.stats.max)),
        );
    }
}
