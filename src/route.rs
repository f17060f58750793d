use parse_display::{Display, FromStr};


/// The `/slide/{number}` route, with a 1-based slide number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromStr)]
#[display("/slide/{number}")]
pub struct SlidePath {
    pub number: usize,
}

impl SlidePath {
    /// Canonical route every invalid path redirects to.
    pub const FIRST: SlidePath = SlidePath { number: 1 };

    pub fn from_index(index: usize) -> Self {
        Self { number: index + 1 }
    }

    /// 0-based index, if the number lies in `1..=total`.
    pub fn to_index(self, total: usize) -> Option<usize> {
        if (1..=total).contains(&self.number) {
            Some(self.number - 1)
        } else {
            None
        }
    }
}

/// Outcome of matching an inbound path against a deck of `total` slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Slide(usize),
    Redirect(SlidePath),
}

/// Matches `path` against the route table.
///
/// `/slide/{n}` with `n` in `1..=total` selects slide `n - 1`. The root path, unmatched
/// paths, non-numeric and out-of-range numbers all redirect to [`SlidePath::FIRST`].
pub fn resolve(path: &str, total: usize) -> Resolution {
    match path.parse::<SlidePath>() {
        Ok(p) => match p.to_index(total) {
            Some(index) => Resolution::Slide(index),
            None => Resolution::Redirect(SlidePath::FIRST),
        },
        Err(_) => Resolution::Redirect(SlidePath::FIRST),
    }
}

/// Outbound side of the router.
pub trait RoutePort {
    /// Replaces the current history entry with `path`. Never pushes a new entry.
    fn replace(&self, path: &SlidePath);
}
