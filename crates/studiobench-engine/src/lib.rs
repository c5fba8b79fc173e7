//! Offer comparability and competitor ranking engine.
//!
//! Every function here is pure and synchronous: it derives results from the
//! read-only collections it is given and keeps no state between calls.

pub mod comparability;
pub mod dashboard;
pub mod filter;
pub mod market;
pub mod pins;
pub mod pricing;
pub mod ranking;
pub mod recommendation;
pub mod scorers;
pub mod tiers;

pub use comparability::{
    comparability, comparability_band, comparability_of, score_pair, ComparabilityBand, Field,
    FieldScore, PairBreakdown, PairKind,
};
pub use dashboard::{build_dashboard, DashboardReport};
pub use filter::CompetitorFilter;
pub use market::{competitor_benchmark, market_buckets, median, BenchmarkDelta, MarketBucket, PriceStats};
pub use pins::{PinError, PinSet, Toggle};
pub use pricing::{monthly_equivalent, price_per_class, visit_cadence, VisitCadence, VisitRate};
pub use ranking::{rank_competitors, similarity, RankedCompetitor, Ranking, Similarity};
pub use recommendation::{
    overall_position, recommend, recommend_all, Confidence, MarketPosition, PositionSummary,
    Recommendation, Verdict,
};
pub use tiers::{tier_summary, TierSummaryRow};
