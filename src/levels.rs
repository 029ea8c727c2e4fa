//! Find levels in a sounding by pressure, and decide which levels get a wind barb.
use crate::sounding::{DataRow, Sounding};
use metfor::{HectoPascal, Quantity};
use optional::Optioned;
use tracing::warn;

/// Wind barbs are not drawn above this level.
pub const BARB_TOP: HectoPascal = HectoPascal(100.0);

/// How far up the profile wind barbs are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarbCutoff {
    /// Only levels before this index, exclusive.
    UpTo(usize),
    /// The whole profile.
    All,
}

impl BarbCutoff {
    /// The exclusive slice bound for a profile of length `len`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skew_t_analysis::BarbCutoff;
    ///
    /// assert_eq!(BarbCutoff::UpTo(5).bound(10), 5);
    /// assert_eq!(BarbCutoff::UpTo(50).bound(10), 10);
    /// assert_eq!(BarbCutoff::All.bound(10), 10);
    /// ```
    #[inline]
    pub fn bound(self, len: usize) -> usize {
        match self {
            BarbCutoff::UpTo(n) => n.min(len),
            BarbCutoff::All => len,
        }
    }
}

/// Find the index of the level with exactly this pressure.
///
/// Levels with a missing pressure never match.
pub fn level_index(pressure: &[Optioned<HectoPascal>], target: HectoPascal) -> Option<usize> {
    pressure.iter().position(|p| {
        p.map(|p| (p - target).unpack().abs() < std::f64::EPSILON)
            .unwrap_or(false)
    })
}

/// Decide how many levels get a wind barb.
///
/// If the profile has a 100 hPa level at index `k`, barbs go up to and including that level,
/// `UpTo(k + 1)`. Otherwise the whole profile is used.
///
/// # Examples
///
/// ```rust
/// use metfor::HectoPascal;
/// use optional::{none, some};
/// use skew_t_analysis::{barb_cutoff, BarbCutoff};
///
/// let p: Vec<_> = vec![1000.0, 850.0, 500.0, 100.0, 50.0]
///     .into_iter().map(HectoPascal).map(some).collect();
/// assert_eq!(barb_cutoff(&p), BarbCutoff::UpTo(4));
///
/// let p: Vec<_> = vec![1000.0, 850.0, 500.0].into_iter().map(HectoPascal).map(some).collect();
/// assert_eq!(barb_cutoff(&p), BarbCutoff::All);
///
/// assert_eq!(barb_cutoff(&[]), BarbCutoff::All);
/// assert_eq!(barb_cutoff(&[none(), none()]), BarbCutoff::All);
/// ```
pub fn barb_cutoff(pressure: &[Optioned<HectoPascal>]) -> BarbCutoff {
    match level_index(pressure, BARB_TOP) {
        Some(idx) => BarbCutoff::UpTo(idx + 1),
        None => {
            warn!(
                levels = pressure.len(),
                "no 100 hPa level in the profile, drawing barbs for every level"
            );
            BarbCutoff::All
        }
    }
}

/// The levels that get a wind barb: every `stride`th level below the cutoff, skipping levels
/// without a pressure or a wind.
pub fn barb_levels<'a>(
    snd: &'a Sounding,
    cutoff: BarbCutoff,
    stride: usize,
) -> impl Iterator<Item = DataRow> + 'a {
    let bound = cutoff.bound(snd.len());

    snd.bottom_up()
        .take(bound)
        .step_by(stride.max(1))
        .filter(|row| row.pressure.is_some() && row.wind.is_some())
}
