use crate::core::models::configuration::StackConfiguration;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

pub trait Scored {
    fn score(&self) -> f64;
}

impl Scored for StackConfiguration {
    #[inline]
    fn score(&self) -> f64 {
        self.score
    }
}

#[derive(Debug)]
struct Ranked<T> {
    score: f64,
    seq: u64,
    item: T,
}

impl<T> PartialEq for Ranked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl<T> Eq for Ranked<T> {}

impl<T> PartialOrd for Ranked<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Ranked<T> {
    /// Higher score ranks higher; on equal scores the earlier item ranks higher.
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Bounded working set holding the `k` best items seen so far.
///
/// Backed by a min-heap of at most `k` entries, so a stream of `n` items costs
/// O(n log k) time and O(k) space regardless of `n`.
#[derive(Debug)]
pub struct TopK<T> {
    k: usize,
    seen: u64,
    heap: BinaryHeap<Reverse<Ranked<T>>>,
}

impl<T: Scored> TopK<T> {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            seen: 0,
            heap: BinaryHeap::with_capacity(k.min(1024)),
        }
    }

    pub fn push(&mut self, item: T) {
        let ranked = Ranked {
            score: item.score(),
            seq: self.seen,
            item,
        };
        self.seen += 1;

        if self.heap.len() < self.k {
            self.heap.push(Reverse(ranked));
        } else if let Some(mut weakest) = self.heap.peek_mut() {
            if ranked > weakest.0 {
                *weakest = Reverse(ranked);
            }
        }
    }

    /// Retained items, best first.
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(ranked)| ranked.item)
            .collect()
    }
}

/// Returns the `k` highest-scoring items, best first.
pub fn select<T, I>(k: usize, items: I) -> Vec<T>
where
    T: Scored,
    I: IntoIterator<Item = T>,
{
    if k == 0 {
        return Vec::new();
    }
    let mut top = TopK::new(k);
    for item in items {
        top.push(item);
    }
    top.into_sorted_vec()
}

/// Like [`select`], over a fallible stream. The first error is returned and the working
/// set discarded; the stream is consumed even when `k` is zero so a failure is never masked.
pub fn try_select<T, E, I>(k: usize, items: I) -> Result<Vec<T>, E>
where
    T: Scored,
    I: IntoIterator<Item = Result<T, E>>,
{
    let mut items = items.into_iter();
    let mut failure = None;
    let top = select(
        k,
        items.by_ref().map_while(|item| match item {
            Ok(item) => Some(item),
            Err(e) => {
                failure = Some(e);
                None
            }
        }),
    );
    if failure.is_none() && k == 0 {
        failure = items.find_map(Result::err);
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(top),
    }
}
