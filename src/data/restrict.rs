//! Restriction to papers with a mixed-gender referee pool.

use std::collections::HashMap;

use polars::prelude::{BooleanChunked, DataFrame, DataType, NewChunkedArray};
use tracing::info;

use crate::error::Result;

/// Drop every row belonging to a paper whose referees are all of one gender.
///
/// The per-paper mean of the indicator is evaluated exactly (integer sum
/// against group size), so no floating comparison is involved. Applying the
/// restriction to an already-restricted frame is a no-op.
pub fn mixed_gender_only(df: DataFrame, group_col: &str, indicator_col: &str) -> Result<DataFrame> {
    let groups = df.column(group_col)?.cast(&DataType::String)?;
    let groups = groups.str()?;
    let indicator = df.column(indicator_col)?.cast(&DataType::Int64)?;
    let indicator = indicator.i64()?;

    let mut tallies: HashMap<&str, (i64, i64)> = HashMap::new();
    for (group, value) in groups.into_no_null_iter().zip(indicator.into_no_null_iter()) {
        let entry = tallies.entry(group).or_insert((0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    let keep: Vec<bool> = groups
        .into_no_null_iter()
        .map(|group| {
            let (sum, count) = tallies[group];
            sum != 0 && sum != count
        })
        .collect();

    let before = df.height();
    let filtered = df.filter(&BooleanChunked::from_slice("keep".into(), &keep))?;
    info!(
        before,
        after = filtered.height(),
        "restricted to papers with mixed-gender referees"
    );
    Ok(filtered)
}
