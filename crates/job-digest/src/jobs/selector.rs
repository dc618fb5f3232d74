//! Digest selection: filter, rank and truncate job records.

use super::record::{JobRecord, JobStatus};

/// Whether a record may appear in a digest.
///
/// Records without a score, or with a NaN score, never pass the threshold.
#[must_use]
pub fn is_eligible(job: &JobRecord, min_score: f64) -> bool {
    job.status == JobStatus::New
        && job.score.is_some_and(|s| s >= min_score)
        && !job.is_notified()
}

/// Select at most `top_n` eligible records, highest score first.
///
/// Sorting is stable, so equal scores keep their row order.
#[must_use]
pub fn select_digest(jobs: &[JobRecord], min_score: f64, top_n: usize) -> Vec<JobRecord> {
    let mut eligible: Vec<&JobRecord> = jobs.iter().filter(|j| is_eligible(j, min_score)).collect();

    eligible.sort_by(|a, b| {
        let a = a.score.unwrap_or(f64::NEG_INFINITY);
        let b = b.score.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
    eligible.truncate(top_n);

    tracing::debug!(
        component = "selector",
        total = jobs.len(),
        selected = eligible.len(),
        min_score,
        top_n,
        "Selected digest set"
    );

    eligible.into_iter().cloned().collect()
}
