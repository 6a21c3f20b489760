//! Occupancy aggregation.
//!
//! Pure functions that turn per-spot statuses into per-lot summaries and
//! per-lot summaries into dashboard-wide figures. Every screen derives its
//! counts from here; nothing in this module performs I/O or can fail.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{LotId, SpotStatus};

/// Number of lots shown in a top-N ranking when the caller has no preference.
pub const DEFAULT_TOP_N: usize = 5;

/// Counts for one lot at fetch time.
///
/// Spots whose status classified as `unknown` count toward `total_spots`
/// only, so `vacant + occupied + reserved <= total_spots`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotOccupancySummary {
    pub lot_id: LotId,
    pub total_spots: u32,
    pub vacant: u32,
    pub occupied: u32,
    pub reserved: u32,
    /// `occupied / total_spots`, or `0.0` for a lot without spots.
    pub occupancy_rate: f64,
}

impl LotOccupancySummary {
    /// Spots whose status could not be classified.
    pub fn unknown(&self) -> u32 {
        self.total_spots
            .saturating_sub(self.vacant)
            .saturating_sub(self.occupied)
            .saturating_sub(self.reserved)
    }
}

/// Dashboard-wide totals across a set of lots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardAggregate {
    pub total_spots: u32,
    pub total_occupied: u32,
    pub total_vacant: u32,
    pub total_reserved: u32,
    /// Unweighted mean of the per-lot rates: every lot counts once,
    /// whatever its size.
    pub average_occupancy_rate: f64,
}

impl DashboardAggregate {
    /// Spot-weighted rate (`total_occupied / total_spots`).
    ///
    /// Differs from [`average_occupancy_rate`](Self::average_occupancy_rate)
    /// whenever lots have different sizes.
    pub fn weighted_occupancy_rate(&self) -> f64 {
        ratio(self.total_occupied, self.total_spots)
    }
}

/// A lot's position in a top-N ranking, joined with its display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLot {
    /// 1-based position.
    pub rank: usize,
    pub lot_id: LotId,
    pub name: Option<String>,
    pub summary: LotOccupancySummary,
}

// ── Per-lot ─────────────────────────────────────────────────────────

/// Count one lot's statuses. Order-independent and deterministic.
pub fn aggregate_lot(
    lot_id: LotId,
    statuses: impl IntoIterator<Item = SpotStatus>,
) -> LotOccupancySummary {
    let mut summary = LotOccupancySummary {
        lot_id,
        total_spots: 0,
        vacant: 0,
        occupied: 0,
        reserved: 0,
        occupancy_rate: 0.0,
    };

    for status in statuses {
        summary.total_spots = summary.total_spots.saturating_add(1);
        let bucket = match status {
            SpotStatus::Vacant => &mut summary.vacant,
            SpotStatus::Occupied => &mut summary.occupied,
            SpotStatus::Reserved => &mut summary.reserved,
            SpotStatus::Unknown => continue,
        };
        *bucket = bucket.saturating_add(1);
    }

    summary.occupancy_rate = ratio(summary.occupied, summary.total_spots);
    summary
}

/// Aggregate the backend's `spot key → raw status` map for one lot.
///
/// Non-string values (including `null`) classify as unknown.
pub fn aggregate_lot_from_summary(
    lot_id: LotId,
    summary: &HashMap<String, serde_json::Value>,
) -> LotOccupancySummary {
    aggregate_lot(
        lot_id,
        summary
            .values()
            .map(|raw| SpotStatus::classify(raw.as_str())),
    )
}

// ── Cross-lot ───────────────────────────────────────────────────────

/// Sum counts across lots and average their rates. Empty input is all zeros.
pub fn aggregate_dashboard(summaries: &[LotOccupancySummary]) -> DashboardAggregate {
    let mut agg = DashboardAggregate::default();
    if summaries.is_empty() {
        return agg;
    }

    let mut rate_sum = 0.0;
    for s in summaries {
        agg.total_spots = agg.total_spots.saturating_add(s.total_spots);
        agg.total_occupied = agg.total_occupied.saturating_add(s.occupied);
        agg.total_vacant = agg.total_vacant.saturating_add(s.vacant);
        agg.total_reserved = agg.total_reserved.saturating_add(s.reserved);
        rate_sum += s.occupancy_rate;
    }

    let count = u32::try_from(summaries.len()).unwrap_or(u32::MAX);
    agg.average_occupancy_rate = rate_sum / f64::from(count);
    agg
}

/// The `n` busiest lots, highest occupancy rate first.
///
/// The sort is stable, so lots with equal rates keep their input order.
/// `names` joins display names by lot id; lots without an entry get `None`.
pub fn top_lots(
    summaries: &[LotOccupancySummary],
    names: &HashMap<LotId, String>,
    n: usize,
) -> Vec<RankedLot> {
    let mut ranked: Vec<&LotOccupancySummary> = summaries.iter().collect();
    ranked.sort_by(|a, b| b.occupancy_rate.total_cmp(&a.occupancy_rate));

    ranked
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, s)| RankedLot {
            rank: i + 1,
            lot_id: s.lot_id,
            name: names.get(&s.lot_id).cloned(),
            summary: s.clone(),
        })
        .collect()
}

fn ratio(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    const EPS: f64 = 1e-12;

    fn lot(id: i64, occupied: u32, total: u32) -> LotOccupancySummary {
        let mut statuses = vec![SpotStatus::Occupied; occupied as usize];
        statuses.resize(total as usize, SpotStatus::Vacant);
        aggregate_lot(LotId(id), statuses)
    }

    /// Every sequence of length 0..=4 over a mix of classified and raw values.
    fn all_sequences() -> Vec<Vec<SpotStatus>> {
        let raws = [Some("vacant"), Some("occupied"), Some("reserved"), Some("garbage"), None];
        let mut out: Vec<Vec<SpotStatus>> = vec![Vec::new()];
        let mut frontier = out.clone();
        for _ in 0..4 {
            let mut next = Vec::new();
            for seq in &frontier {
                for raw in raws {
                    let mut s = seq.clone();
                    s.push(SpotStatus::classify(raw));
                    next.push(s);
                }
            }
            out.extend(next.iter().cloned());
            frontier = next;
        }
        out
    }

    // ── Per-lot ─────────────────────────────────────────────────────

    #[test]
    fn mixed_lot_example() {
        let statuses = ["occupied", "occupied", "vacant", "reserved", "garbage"]
            .map(|raw| SpotStatus::classify(Some(raw)));
        let summary = aggregate_lot(LotId(1), statuses);

        assert_eq!(
            summary,
            LotOccupancySummary {
                lot_id: LotId(1),
                total_spots: 5,
                vacant: 1,
                occupied: 2,
                reserved: 1,
                occupancy_rate: 0.4,
            }
        );
        assert_eq!(summary.unknown(), 1);
    }

    #[test]
    fn empty_lot_has_zero_rate() {
        let summary = aggregate_lot(LotId(3), []);
        assert_eq!(summary.total_spots, 0);
        assert!(summary.occupancy_rate.abs() < EPS);
    }

    #[test]
    fn counts_hold_for_every_small_sequence() {
        for seq in all_sequences() {
            let summary = aggregate_lot(LotId(1), seq.iter().copied());
            let known = summary.vacant + summary.occupied + summary.reserved;
            let has_unknown = seq.contains(&SpotStatus::Unknown);

            assert_eq!(summary.total_spots as usize, seq.len());
            assert!(known <= summary.total_spots);
            assert_eq!(known == summary.total_spots, !has_unknown, "{seq:?}");
        }
    }

    #[test]
    fn aggregation_is_pure_and_order_independent() {
        for seq in all_sequences() {
            let first = aggregate_lot(LotId(2), seq.iter().copied());
            let again = aggregate_lot(LotId(2), seq.iter().copied());
            let reversed = aggregate_lot(LotId(2), seq.iter().rev().copied());
            assert_eq!(first, again);
            assert_eq!(first, reversed);
        }
    }

    #[test]
    fn summary_map_classifies_values() {
        let map: HashMap<String, serde_json::Value> = [
            ("1", json!("occupied")),
            ("2", json!("vacant")),
            ("3", json!(null)),
            ("4", json!(17)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect();

        let summary = aggregate_lot_from_summary(LotId(8), &map);
        assert_eq!(summary.total_spots, 4);
        assert_eq!(summary.occupied, 1);
        assert_eq!(summary.vacant, 1);
        assert_eq!(summary.unknown(), 2);
        assert!((summary.occupancy_rate - 0.25).abs() < EPS);
    }

    // ── Cross-lot ───────────────────────────────────────────────────

    #[test]
    fn empty_dashboard_is_all_zero() {
        assert_eq!(aggregate_dashboard(&[]), DashboardAggregate::default());
    }

    #[test]
    fn average_is_unweighted() {
        // 0.8 on a 5-spot lot, 0.4 on a 50-spot lot.
        let summaries = [lot(1, 4, 5), lot(2, 20, 50)];
        let agg = aggregate_dashboard(&summaries);

        assert!((agg.average_occupancy_rate - 0.6).abs() < EPS);
        assert_eq!(agg.total_spots, 55);
        assert_eq!(agg.total_occupied, 24);
        assert_eq!(agg.total_vacant, 31);
        assert_eq!(agg.total_reserved, 0);
        assert!((agg.weighted_occupancy_rate() - 24.0 / 55.0).abs() < EPS);
    }

    #[test]
    fn weighted_rate_of_empty_dashboard_is_zero() {
        assert!(DashboardAggregate::default().weighted_occupancy_rate().abs() < EPS);
    }

    // ── Top-N ───────────────────────────────────────────────────────

    #[test]
    fn top_lots_sorted_stable_and_truncated() {
        let summaries = [
            lot(1, 1, 4), // 0.25
            lot(2, 3, 4), // 0.75
            lot(3, 1, 2), // 0.5
            lot(4, 3, 4), // 0.75, after lot 2
            lot(5, 0, 4), // 0.0
        ];
        let names: HashMap<LotId, String> =
            [(LotId(2), "North".to_owned()), (LotId(4), "South".to_owned())]
                .into_iter()
                .collect();

        let top = top_lots(&summaries, &names, 3);
        let ids: Vec<i64> = top.iter().map(|r| r.lot_id.get()).collect();

        assert_eq!(ids, vec![2, 4, 3]);
        assert_eq!(top[0].rank, 1);
        assert_eq!(top[0].name.as_deref(), Some("North"));
        assert_eq!(top[1].name.as_deref(), Some("South"));
        assert_eq!(top[2].name, None);
        for pair in top.windows(2) {
            assert!(pair[0].summary.occupancy_rate >= pair[1].summary.occupancy_rate);
        }
    }

    #[test]
    fn top_lots_never_exceeds_n() {
        let summaries = [lot(1, 1, 2), lot(2, 2, 2)];
        assert_eq!(top_lots(&summaries, &HashMap::new(), DEFAULT_TOP_N).len(), 2);
        assert_eq!(top_lots(&summaries, &HashMap::new(), 1).len(), 1);
        assert!(top_lots(&summaries, &HashMap::new(), 0).is_empty());
        assert!(top_lots(&[], &HashMap::new(), DEFAULT_TOP_N).is_empty());
    }
}
