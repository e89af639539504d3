use super::Buffer_Structs::Message;

/// Fixed-capacity ring of the last `N` recorded points.
///
/// Meant to live inside a payload next to bulk data: it is `Copy`, so a
/// payload's [`Message::merge_forward`] can carry a whole history across a
/// rotation with one plain assignment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct History<P: Copy, const N: usize> {
    points: [Option<P>; N],
    // Index of the most recent point, `None` until the first push.
    cursor: Option<usize>,
}

impl<P: Copy, const N: usize> Default for History<P, N> {
    fn default() -> Self {
        Self {
            points: [None; N],
            cursor: None,
        }
    }
}

impl<P: Copy, const N: usize> History<P, N> {
    /// Records `point` as the newest entry, overwriting the oldest one when full.
    pub fn push(&mut self, point: P) {
        if N == 0 {
            return;
        }
        let next = match self.cursor {
            Some(cursor) => (cursor + 1) % N,
            None => 0,
        };
        self.points[next] = Some(point);
        self.cursor = Some(next);
    }

    /// The most recently pushed point.
    pub fn latest(&self) -> Option<P> {
        self.cursor.and_then(|cursor| self.points[cursor])
    }

    /// Number of recorded points, at most `N`.
    pub fn len(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cursor.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Recorded points, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = P> + '_ {
        let start = self.cursor.map_or(0, |cursor| cursor + 1);
        (0..N).filter_map(move |i| self.points[(start + i) % N])
    }
}

impl<P: Copy + Send, const N: usize> Message for History<P, N> {
    #[inline]
    fn merge_forward(&self, dest: &mut Self) {
        *dest = *self;
    }
}
