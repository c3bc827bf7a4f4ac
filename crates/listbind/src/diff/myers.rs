//! Identity correspondence between two lists.
//!
//! Linear-space Myers: each range is trimmed of its common prefix and suffix,
//! then split at the middle of a shortest edit path, found by searching
//! forward from the top-left corner and backward from the bottom-right one
//! until the two searches overlap. Time is O((N+M)·D) and space O(N+M),
//! so replacing every row of a long list costs no more memory than the
//! lists themselves. Only the matched pairs are returned; turning them into
//! edit operations is the engine's job.

/// A half-open `old × new` rectangle still to be matched.
#[derive(Debug, Clone, Copy)]
struct Range {
    old_start: usize,
    old_end: usize,
    new_start: usize,
    new_end: usize,
}

/// Furthest-reaching x per diagonal for the forward and backward searches,
/// shared by every range of one run.
struct Frontier {
    forward: Vec<isize>,
    backward: Vec<isize>,
    offset: isize,
}

impl Frontier {
    fn new(old_len: usize, new_len: usize) -> Self {
        let span = old_len + new_len;
        Self {
            forward: vec![0; 2 * span + 3],
            backward: vec![0; 2 * span + 3],
            offset: span as isize + 1,
        }
    }

    fn slot(&self, k: isize) -> usize {
        (self.offset + k) as usize
    }
}

/// Returns the matched `(old, new)` index pairs of a longest common
/// subsequence under `same`, in increasing order of both indices.
///
/// `same(i, j)` compares old item `i` with new item `j`.
pub(crate) fn matching_pairs<F>(old_len: usize, new_len: usize, same: F) -> Vec<(usize, usize)>
where
    F: Fn(usize, usize) -> bool,
{
    let mut frontier = Frontier::new(old_len, new_len);
    let mut pairs = Vec::new();
    let mut pending = vec![Range {
        old_start: 0,
        old_end: old_len,
        new_start: 0,
        new_end: new_len,
    }];

    while let Some(mut range) = pending.pop() {
        while range.old_start < range.old_end
            && range.new_start < range.new_end
            && same(range.old_start, range.new_start)
        {
            pairs.push((range.old_start, range.new_start));
            range.old_start += 1;
            range.new_start += 1;
        }
        while range.old_start < range.old_end
            && range.new_start < range.new_end
            && same(range.old_end - 1, range.new_end - 1)
        {
            range.old_end -= 1;
            range.new_end -= 1;
            pairs.push((range.old_end, range.new_end));
        }
        if range.old_start == range.old_end || range.new_start == range.new_end {
            continue;
        }

        // Both halves cost at least one edit, so each is strictly smaller.
        let (x, y) = middle_point(range, &same, &mut frontier);
        pending.push(Range {
            old_start: x,
            new_start: y,
            ..range
        });
        pending.push(Range {
            old_end: x,
            new_end: y,
            ..range
        });
    }

    pairs.sort_unstable();
    pairs
}

/// A point on some shortest edit path through `range`, strictly inside it.
///
/// `range` must be non-empty on both sides with differing first and last
/// items.
fn middle_point<F>(range: Range, same: &F, frontier: &mut Frontier) -> (usize, usize)
where
    F: Fn(usize, usize) -> bool,
{
    let n = (range.old_end - range.old_start) as isize;
    let m = (range.new_end - range.new_start) as isize;
    let old_at = |x: isize| range.old_start + x as usize;
    let new_at = |y: isize| range.new_start + y as usize;
    let delta = n - m;
    let odd = delta & 1 == 1;

    let start = frontier.slot(1);
    frontier.forward[start] = 0;
    frontier.backward[start] = 0;

    for d in 0..=(n + m + 1) / 2 {
        let mut k = d;
        while k >= -d {
            let (prev_lo, prev_hi) = (frontier.slot(k - 1), frontier.slot(k + 1));
            let mut x = if k == -d
                || (k != d && frontier.forward[prev_lo] < frontier.forward[prev_hi])
            {
                frontier.forward[prev_hi]
            } else {
                frontier.forward[prev_lo] + 1
            };
            let mut y = x - k;
            let (snake_x, snake_y) = (x, y);
            while x < n && y < m && same(old_at(x), new_at(y)) {
                x += 1;
                y += 1;
            }
            let slot = frontier.slot(k);
            frontier.forward[slot] = x;
            if odd
                && (k - delta).abs() < d
                && x + frontier.backward[frontier.slot(delta - k)] >= n
            {
                return (old_at(snake_x), new_at(snake_y));
            }
            k -= 2;
        }

        // Backward coordinates count from the bottom-right corner.
        let mut k = d;
        while k >= -d {
            let (prev_lo, prev_hi) = (frontier.slot(k - 1), frontier.slot(k + 1));
            let mut x = if k == -d
                || (k != d && frontier.backward[prev_lo] < frontier.backward[prev_hi])
            {
                frontier.backward[prev_hi]
            } else {
                frontier.backward[prev_lo] + 1
            };
            let mut y = x - k;
            while x < n && y < m && same(old_at(n - x - 1), new_at(m - y - 1)) {
                x += 1;
                y += 1;
            }
            let slot = frontier.slot(k);
            frontier.backward[slot] = x;
            if !odd
                && (k - delta).abs() <= d
                && x + frontier.forward[frontier.slot(delta - k)] >= n
            {
                return (old_at(n - x), new_at(m - y));
            }
            k -= 2;
        }
    }

    unreachable!("forward and backward searches always meet within (N+M+1)/2 rounds")
}
