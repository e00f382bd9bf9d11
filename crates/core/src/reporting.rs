//! Dashboard aggregation over assessments and their scores.
//!
//! All functions are single-pass groupings over rows the caller has already
//! loaded. Assessments without score rows still count towards the assessment
//! and pending counters but never contribute to an average.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, FixedOffset};
use serde::Serialize;

use crate::assessment_status::AssessmentStatus;
use crate::error::CoreError;
use crate::scoring::{ScoreEntry, ScoringScale};
use crate::types::{DbId, Timestamp};

/// Maximum number of entries in the top performers ranking.
pub const TOP_PERFORMER_LIMIT: usize = 5;

/// Largest UTC offset accepted for month bucketing (UTC+14 / UTC-14).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One assessment with everything the dashboard needs to aggregate it.
#[derive(Debug, Clone)]
pub struct AssessmentRecord {
    pub assessment_id: DbId,
    pub subject_id: DbId,
    pub subject_name: Option<String>,
    pub subject_department: Option<String>,
    pub status: AssessmentStatus,
    pub created_at: Timestamp,
    pub scores: Vec<ScoreEntry>,
}

/// Average score for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Short English month name, e.g. `"Dec"`.
    pub label: &'static str,
    /// Mean assessment total, rounded to one decimal.
    pub score: f64,
    pub count: usize,
}

/// A subject's mean assessment total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPerformer {
    pub subject_id: DbId,
    pub full_name: String,
    pub department: Option<String>,
    pub score: f64,
    pub count: usize,
}

/// Everything rendered on the reporting dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub scoring_scale: ScoringScale,
    pub total_assessments: usize,
    pub pending_count: usize,
    /// Mean total across every scored assessment, `0.0` when there are none.
    pub average_score: f64,
    /// Mean total across the caller's own scored assessments as subject.
    pub my_average_score: f64,
    pub monthly_trend: Vec<MonthlyPoint>,
    pub top_performers: Vec<TopPerformer>,
}

/// Build a [`FixedOffset`] from a minute offset east of UTC.
pub fn utc_offset_from_minutes(minutes: i32) -> Result<FixedOffset, CoreError> {
    if minutes.unsigned_abs() > MAX_UTC_OFFSET_MINUTES.unsigned_abs() {
        return Err(CoreError::Validation(format!(
            "tz_offset_minutes must be between -{MAX_UTC_OFFSET_MINUTES} and {MAX_UTC_OFFSET_MINUTES}"
        )));
    }
    FixedOffset::east_opt(minutes * 60)
        .ok_or_else(|| CoreError::Validation(format!("Invalid UTC offset: {minutes} minutes")))
}

/// Short English name for a 1-based calendar month.
pub fn month_label(month: u32) -> &'static str {
    MONTH_LABELS[(month.clamp(1, 12) - 1) as usize]
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Totals for every assessment that has at least one score row.
fn scored<'a>(
    scale: ScoringScale,
    records: &'a [AssessmentRecord],
) -> impl Iterator<Item = (&'a AssessmentRecord, f64)> + 'a {
    records
        .iter()
        .filter_map(move |r| scale.total(&r.scores).map(|total| (r, total)))
}

/// Mean total per calendar month of `created_at`, in chronological order.
///
/// Months are determined in the caller's timezone so that an assessment
/// created late on the last day of a month lands where the caller expects.
pub fn monthly_trend(
    scale: ScoringScale,
    records: &[AssessmentRecord],
    offset: FixedOffset,
) -> Vec<MonthlyPoint> {
    let mut months: BTreeMap<(i32, u32), Accumulator> = BTreeMap::new();
    for (record, total) in scored(scale, records) {
        let local = record.created_at.with_timezone(&offset);
        months
            .entry((local.year(), local.month()))
            .or_default()
            .add(total);
    }

    months
        .into_iter()
        .map(|((year, month), acc)| MonthlyPoint {
            year,
            month,
            label: month_label(month),
            score: round_one_decimal(acc.mean()),
            count: acc.count,
        })
        .collect()
}

/// Subjects ranked by mean total, highest first, truncated to `limit`.
///
/// The sort is stable: subjects with equal means keep the order in which
/// they first appear in `records`.
pub fn top_performers(
    scale: ScoringScale,
    records: &[AssessmentRecord],
    limit: usize,
) -> Vec<TopPerformer> {
    let mut order: Vec<DbId> = Vec::new();
    let mut subjects: HashMap<DbId, (Accumulator, &AssessmentRecord)> = HashMap::new();

    for (record, total) in scored(scale, records) {
        subjects
            .entry(record.subject_id)
            .or_insert_with(|| {
                order.push(record.subject_id);
                (Accumulator::default(), record)
            })
            .0
            .add(total);
    }

    let mut ranked: Vec<TopPerformer> = order
        .into_iter()
        .filter_map(|id| subjects.remove(&id))
        .map(|(acc, first)| TopPerformer {
            subject_id: first.subject_id,
            full_name: first
                .subject_name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            department: first.subject_department.clone(),
            score: acc.mean(),
            count: acc.count,
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(limit);
    ranked
}

/// Compute the full dashboard for `caller_id`.
pub fn build_summary(
    scale: ScoringScale,
    records: &[AssessmentRecord],
    caller_id: DbId,
    offset: FixedOffset,
) -> DashboardSummary {
    let mut overall = Accumulator::default();
    let mut mine = Accumulator::default();
    for (record, total) in scored(scale, records) {
        overall.add(total);
        if record.subject_id == caller_id {
            mine.add(total);
        }
    }

    DashboardSummary {
        scoring_scale: scale,
        total_assessments: records.len(),
        pending_count: records
            .iter()
            .filter(|r| r.status == AssessmentStatus::Pending)
            .count(),
        average_score: overall.mean(),
        my_average_score: mine.mean(),
        monthly_trend: monthly_trend(scale, records, offset),
        top_performers: top_performers(scale, records, TOP_PERFORMER_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn utc() -> FixedOffset {
        utc_offset_from_minutes(0).unwrap()
    }

    fn at(year: i32, month: u32, day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    /// A record whose flat-scale total equals `total`.
    fn record(id: DbId, subject_id: DbId, created_at: Timestamp, total: f64) -> AssessmentRecord {
        AssessmentRecord {
            assessment_id: id,
            subject_id,
            subject_name: Some(format!("Subject {subject_id}")),
            subject_department: None,
            status: AssessmentStatus::Completed,
            created_at,
            scores: vec![ScoreEntry {
                score: total,
                weight: 100,
            }],
        }
    }

    fn unscored(id: DbId, subject_id: DbId, status: AssessmentStatus) -> AssessmentRecord {
        AssessmentRecord {
            scores: Vec::new(),
            status,
            ..record(id, subject_id, at(2025, 1, 1), 0.0)
        }
    }

    #[test]
    fn two_december_assessments_average_into_one_entry() {
        let records = [
            record(1, 10, at(2025, 12, 3), 80.0),
            record(2, 11, at(2025, 12, 20), 90.0),
        ];
        let trend = monthly_trend(ScoringScale::Flat20, &records, utc());
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].label, "Dec");
        assert_eq!(trend[0].score, 85.0);
        assert_eq!(trend[0].count, 2);
    }

    #[test]
    fn monthly_trend_is_chronological_not_first_seen() {
        let records = [
            record(1, 10, at(2025, 3, 1), 60.0),
            record(2, 10, at(2025, 1, 1), 70.0),
            record(3, 10, at(2024, 12, 1), 50.0),
            record(4, 10, at(2025, 3, 9), 61.0),
        ];
        let trend = monthly_trend(ScoringScale::Flat20, &records, utc());
        let keys: Vec<(i32, u32)> = trend.iter().map(|p| (p.year, p.month)).collect();
        assert_eq!(keys, vec![(2024, 12), (2025, 1), (2025, 3)]);
        assert_eq!(trend[2].score, 60.5);
    }

    #[test]
    fn same_month_in_different_years_stays_separate() {
        let records = [
            record(1, 10, at(2024, 5, 1), 40.0),
            record(2, 10, at(2025, 5, 1), 80.0),
        ];
        let trend = monthly_trend(ScoringScale::Flat20, &records, utc());
        assert_eq!(trend.len(), 2);
        assert!(trend.iter().all(|p| p.label == "May"));
    }

    #[test]
    fn monthly_trend_rounds_to_one_decimal() {
        let records = [
            record(1, 10, at(2025, 2, 1), 70.0),
            record(2, 10, at(2025, 2, 2), 70.0),
            record(3, 10, at(2025, 2, 3), 71.0),
        ];
        let trend = monthly_trend(ScoringScale::Flat20, &records, utc());
        assert_eq!(trend[0].score, 70.3);
    }

    #[test]
    fn caller_offset_moves_assessment_into_local_month() {
        let late_utc = Utc.with_ymd_and_hms(2025, 11, 30, 20, 0, 0).unwrap();
        let records = [record(1, 10, late_utc, 50.0)];
        let bangkok = utc_offset_from_minutes(7 * 60).unwrap();
        let trend = monthly_trend(ScoringScale::Flat20, &records, bangkok);
        assert_eq!(trend[0].month, 12);
        assert_eq!(trend[0].label, "Dec");
    }

    #[test]
    fn top_performers_rank_by_mean_descending() {
        let records = [
            record(1, 1, at(2025, 1, 1), 16.0),
            record(2, 1, at(2025, 1, 2), 20.0),
            record(3, 2, at(2025, 1, 3), 20.0),
            record(4, 3, at(2025, 1, 4), 15.0),
        ];
        let ranked = top_performers(ScoringScale::Flat20, &records, TOP_PERFORMER_LIMIT);
        let ids: Vec<DbId> = ranked.iter().map(|p| p.subject_id).collect();
        // A = 1 (avg 18), B = 2 (avg 20), C = 3 (avg 15)
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(ranked[1].score, 18.0);
        assert_eq!(ranked[1].count, 2);
    }

    #[test]
    fn top_performers_ties_keep_first_appearance_order() {
        let records = [
            record(1, 7, at(2025, 1, 1), 50.0),
            record(2, 3, at(2025, 1, 2), 50.0),
            record(3, 5, at(2025, 1, 3), 50.0),
        ];
        let ranked = top_performers(ScoringScale::Flat20, &records, TOP_PERFORMER_LIMIT);
        let ids: Vec<DbId> = ranked.iter().map(|p| p.subject_id).collect();
        assert_eq!(ids, vec![7, 3, 5]);
    }

    #[test]
    fn top_performers_truncate_to_limit() {
        let records: Vec<AssessmentRecord> = (1..=8)
            .map(|i| record(i, i, at(2025, 1, 1), i as f64))
            .collect();
        let ranked = top_performers(ScoringScale::Flat20, &records, TOP_PERFORMER_LIMIT);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].subject_id, 8);
        assert_eq!(ranked[4].subject_id, 4);
    }

    #[test]
    fn missing_subject_name_falls_back_to_unknown() {
        let mut r = record(1, 1, at(2025, 1, 1), 10.0);
        r.subject_name = None;
        let ranked = top_performers(ScoringScale::Flat20, &[r], TOP_PERFORMER_LIMIT);
        assert_eq!(ranked[0].full_name, "Unknown");
    }

    #[test]
    fn weighted_scale_feeds_aggregation() {
        let mut r = record(1, 1, at(2025, 4, 1), 0.0);
        r.scores = vec![
            ScoreEntry {
                score: 10.0,
                weight: 60,
            },
            ScoreEntry {
                score: 5.0,
                weight: 40,
            },
        ];
        let summary = build_summary(ScoringScale::Weighted10, &[r], 1, utc());
        assert_eq!(summary.average_score, 8.0);
        assert_eq!(summary.monthly_trend[0].score, 8.0);
    }

    #[test]
    fn empty_input_yields_zeroed_summary() {
        let summary = build_summary(ScoringScale::Weighted10, &[], 1, utc());
        assert_eq!(summary.total_assessments, 0);
        assert_eq!(summary.pending_count, 0);
        assert_eq!(summary.average_score, 0.0);
        assert_eq!(summary.my_average_score, 0.0);
        assert!(summary.monthly_trend.is_empty());
        assert!(summary.top_performers.is_empty());
    }

    #[test]
    fn unscored_assessments_count_but_do_not_average() {
        let records = [
            record(1, 1, at(2025, 6, 1), 40.0),
            unscored(2, 1, AssessmentStatus::Pending),
            unscored(3, 2, AssessmentStatus::Completed),
        ];
        let summary = build_summary(ScoringScale::Flat20, &records, 1, utc());
        assert_eq!(summary.total_assessments, 3);
        assert_eq!(summary.pending_count, 1);
        assert_eq!(summary.average_score, 40.0);
        assert_eq!(summary.my_average_score, 40.0);
        assert_eq!(summary.monthly_trend.len(), 1);
        assert_eq!(summary.top_performers.len(), 1);
    }

    #[test]
    fn personal_average_only_counts_caller_as_subject() {
        let records = [
            record(1, 1, at(2025, 6, 1), 40.0),
            record(2, 2, at(2025, 6, 2), 80.0),
            record(3, 1, at(2025, 6, 3), 60.0),
        ];
        let summary = build_summary(ScoringScale::Flat20, &records, 1, utc());
        assert_eq!(summary.my_average_score, 50.0);
        assert_eq!(summary.average_score, 60.0);
    }

    #[test]
    fn offsets_beyond_fourteen_hours_are_rejected() {
        assert_matches!(utc_offset_from_minutes(15 * 60), Err(CoreError::Validation(_)));
        assert!(utc_offset_from_minutes(-MAX_UTC_OFFSET_MINUTES).is_ok());
    }

    #[test]
    fn extreme_offsets_are_rejected_without_overflow() {
        assert_matches!(utc_offset_from_minutes(i32::MIN), Err(CoreError::Validation(_)));
        assert_matches!(utc_offset_from_minutes(i32::MAX), Err(CoreError::Validation(_)));
    }

    #[test]
    fn month_labels_cover_calendar() {
        assert_eq!(month_label(1), "Jan");
        assert_eq!(month_label(12), "Dec");
    }
}
