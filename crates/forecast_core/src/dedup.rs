use crate::ForecastEntry;

/// Keeps only the first entry per key, preserving relative order.
///
/// Works in place on `items`; duplicates are swapped past the kept prefix and
/// truncated away, so no allocation happens beyond the vector itself.
pub fn dedup_by_key<T, K, F>(mut items: Vec<T>, key: F) -> Vec<T>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut kept = 0;
    for index in 0..items.len() {
        let candidate = key(&items[index]);
        let seen = items[..kept].iter().any(|item| key(item) == candidate);
        if !seen {
            items.swap(kept, index);
            kept += 1;
        }
    }
    items.truncate(kept);
    items
}

/// Collapses forecast slots to the first slot of each calendar day.
pub fn dedup_by_day(entries: Vec<ForecastEntry>) -> Vec<ForecastEntry> {
    dedup_by_key(entries, ForecastEntry::day)
}
