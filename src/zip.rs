// Lockstep pairing of two sequences.
//
// Unlike the std `zip`, exhaustion of one side does not end the combined
// sequence: the exhausted side yields `None` while the other keeps going,
// and the pairing ends only when both sides come up empty in the same
// step. Each step carries a monotonically increasing index.

use std::iter::Fuse;

/// Pair two iterables in lockstep.
///
/// Yields `(Option<A>, Option<B>, index)` triples, exactly
/// `max(len_a, len_b)` of them, with indices counting up from 0.
pub fn zip_longest<A, B>(a: A, b: B) -> ZipLongest<A::IntoIter, B::IntoIter>
where
    A: IntoIterator,
    B: IntoIterator,
{
    ZipLongest {
        a: a.into_iter().fuse(),
        b: b.into_iter().fuse(),
        index: 0,
    }
}

/// Synchronous lockstep pairing; see [`zip_longest`].
pub struct ZipLongest<A: Iterator, B: Iterator> {
    a: Fuse<A>,
    b: Fuse<B>,
    index: usize,
}

impl<A: Iterator, B: Iterator> Iterator for ZipLongest<A, B> {
    type Item = (Option<A::Item>, Option<B::Item>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let left = self.a.next();
        let right = self.b.next();
        if left.is_none() && right.is_none() {
            return None;
        }
        let step = self.index;
        self.index += 1;
        Some((left, right, step))
    }
}

/// Pull-based asynchronous sequence: the async counterpart of `Iterator`.
///
/// `next` resolves to `Some(item)` or `None` on exhaustion. Implementations
/// are expected to be fused: once `None`, always `None`.
#[allow(async_fn_in_trait)]
pub trait AsyncSequence {
    type Item;

    async fn next(&mut self) -> Option<Self::Item>;
}

/// Adapter lifting any synchronous iterator into an [`AsyncSequence`], so
/// synchronous and asynchronous sources can be zipped together. Never
/// suspends.
pub struct IterSequence<I> {
    inner: Fuse<I>,
}

impl<I: Iterator> IterSequence<I> {
    /// Wrap an iterable.
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> IterSequence<I> {
        IterSequence {
            inner: iter.into_iter().fuse(),
        }
    }
}

impl<I: Iterator> AsyncSequence for IterSequence<I> {
    type Item = I::Item;

    async fn next(&mut self) -> Option<I::Item> {
        self.inner.next()
    }
}

/// Pair two asynchronous sequences in lockstep.
pub fn zip_longest_async<A, B>(a: A, b: B) -> AsyncZipLongest<A, B>
where
    A: AsyncSequence,
    B: AsyncSequence,
{
    AsyncZipLongest {
        a,
        b,
        a_done: false,
        b_done: false,
        index: 0,
    }
}

/// Asynchronous lockstep pairing; see [`zip_longest_async`].
///
/// Each step drives both sides' `next` futures concurrently and suspends
/// until both resolve, so one slow side never lets the other run ahead.
pub struct AsyncZipLongest<A: AsyncSequence, B: AsyncSequence> {
    a: A,
    b: B,
    a_done: bool,
    b_done: bool,
    index: usize,
}

impl<A: AsyncSequence, B: AsyncSequence> AsyncZipLongest<A, B> {
    /// Advance both sides one step.
    pub async fn next(&mut self) -> Option<(Option<A::Item>, Option<B::Item>, usize)> {
        if self.a_done && self.b_done {
            return None;
        }
        let (a, b) = (&mut self.a, &mut self.b);
        let (a_done, b_done) = (self.a_done, self.b_done);
        let (left, right) = tokio::join!(
            async move {
                if a_done {
                    None
                } else {
                    a.next().await
                }
            },
            async move {
                if b_done {
                    None
                } else {
                    b.next().await
                }
            },
        );
        if left.is_none() {
            self.a_done = true;
        }
        if right.is_none() {
            self.b_done = true;
        }
        if left.is_none() && right.is_none() {
            return None;
        }
        let step = self.index;
        self.index += 1;
        Some((left, right, step))
    }
}
