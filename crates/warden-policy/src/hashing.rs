use std::hash::{DefaultHasher, Hash, Hasher};

/// Feed `items` into `state` so that the result ignores iteration order.
///
/// Set-valued permissions and roles compare as sets, so their hashes must
/// agree for any two equal member collections.
pub(crate) fn hash_unordered<'a, T, I, H>(items: I, state: &mut H)
where
    T: Hash + 'a,
    I: IntoIterator<Item = &'a T>,
    H: Hasher,
{
    let mut combined: u64 = 0;
    let mut count: usize = 0;
    for item in items {
        let mut hasher = DefaultHasher::new();
        item.hash(&mut hasher);
        combined = combined.wrapping_add(hasher.finish());
        count += 1;
    }
    count.hash(state);
    combined.hash(state);
}
