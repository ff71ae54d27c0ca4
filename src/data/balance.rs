//! Class balancing with within-paper protection.

use std::collections::HashMap;

use polars::prelude::{DataFrame, DataType, IdxCa, IdxSize};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Resample so every class of `column` appears exactly as often as the
/// rarest class.
///
/// Rows are removed one at a time from oversampled classes. Candidate
/// papers are visited round-robin in a seed-shuffled order, and a removal
/// is only allowed when the (paper, class) group still holds at least two
/// rows, so no paper loses its last representative of a class. If a full
/// cycle over every paper removes nothing while removals are still owed,
/// the target is unreachable under that rule and the call fails.
///
/// Returns the balanced frame together with the kept row positions, so
/// callers can subset any row-aligned working state the same way.
pub fn balance(
    df: DataFrame,
    column: &str,
    group_col: &str,
    rng: &mut StdRng,
) -> Result<(DataFrame, Vec<usize>)> {
    let classes = df.column(column)?.cast(&DataType::String)?;
    let classes: Vec<String> = classes
        .str()?
        .into_no_null_iter()
        .map(|s| s.to_string())
        .collect();
    let groups = df.column(group_col)?.cast(&DataType::String)?;
    let groups: Vec<String> = groups
        .str()?
        .into_no_null_iter()
        .map(|s| s.to_string())
        .collect();

    let mut value_counts: HashMap<&str, usize> = HashMap::new();
    for class in &classes {
        *value_counts.entry(class.as_str()).or_insert(0) += 1;
    }
    if value_counts.len() > 6 {
        warn!(
            column,
            classes = value_counts.len(),
            "more than 6 unique values; is this column really categorical?"
        );
    }

    let minimum = value_counts.values().copied().min().unwrap_or(0);
    if minimum * 2 * value_counts.len() < classes.len() {
        warn!(
            column,
            minimum,
            rows = classes.len(),
            "rarest class holds a small share of observations; balancing will shrink the sample severely"
        );
    }

    // Classes visited by descending count, ties broken by label.
    let mut ordered: Vec<(&str, usize)> = value_counts.iter().map(|(k, v)| (*k, *v)).collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    // Paper visitation order: frequency-descending, then shuffled by seed.
    let mut group_counts: HashMap<&str, usize> = HashMap::new();
    for group in &groups {
        *group_counts.entry(group.as_str()).or_insert(0) += 1;
    }
    let mut papers: Vec<&str> = group_counts.keys().copied().collect();
    papers.sort_by(|a, b| group_counts[b].cmp(&group_counts[a]).then(a.cmp(b)));
    papers.shuffle(rng);

    let mut alive = vec![true; classes.len()];
    for (class, count) in ordered {
        if count == minimum {
            continue;
        }
        let mut owed = count - minimum;
        'cycle: loop {
            let mut removed_this_cycle = 0usize;
            for paper in &papers {
                let candidates: Vec<usize> = (0..classes.len())
                    .filter(|&row| alive[row] && groups[row] == *paper && classes[row] == class)
                    .collect();
                if candidates.len() < 2 {
                    continue;
                }
                let victim = candidates[rng.gen_range(0..candidates.len())];
                alive[victim] = false;
                removed_this_cycle += 1;
                owed -= 1;
                if owed == 0 {
                    break 'cycle;
                }
            }
            if removed_this_cycle == 0 {
                return Err(Error::BalanceTargetUnreachable(class.to_string()));
            }
        }
    }

    let kept: Vec<usize> = (0..classes.len()).filter(|&row| alive[row]).collect();
    let indices: Vec<IdxSize> = kept.iter().map(|&row| row as IdxSize).collect();
    let balanced = df.take(&IdxCa::from_vec("idx".into(), indices))?;
    info!(
        column,
        before = classes.len(),
        after = balanced.height(),
        "balanced sample by categorical column"
    );
    Ok((balanced, kept))
}
