//! Segmentation of data for averaged (Welch) power spectrum estimation
//!
//! A caller asks for either a number of segments or a segment length, with or
//! without 50% overlap. [`resolve_segments`] turns that request into a
//! consistent [`SegmentPlan`]. Requests that cannot be honoured never fail:
//! they fall back to a single segment and record a [`SegmentWarning`].

use std::fmt;

use crate::error::{FourierError, Result};
use crate::transform::{calc_data_length, check_power_of_two, next_power_of_two};

/// What the caller asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentRequest {
    /// No segmentation requested
    #[default]
    Unspecified,

    /// Split the data into this many segments
    Count(usize),

    /// Split the data into segments of this many points
    Length(usize),
}

/// How the data is divided for spectral averaging
///
/// Without overlap `data_length = segment_number * segment_length`; with 50%
/// overlap `data_length = (segment_number + 1) * segment_length / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentPlan {
    pub segment_number: usize,
    pub segment_length: usize,
    pub overlap: bool,
}

impl SegmentPlan {
    /// The whole data as one segment
    pub fn single(length: usize) -> Self {
        Self {
            segment_number: 1,
            segment_length: length,
            overlap: false,
        }
    }

    /// Plan for data that is not held in memory, e.g. read from a stream
    pub fn explicit(segment_length: usize, segment_number: usize, overlap: bool) -> Result<Self> {
        if !is_segment_length(segment_length) {
            return Err(FourierError::NotPowerOfTwo {
                what: "segment length",
                value: segment_length,
            });
        }
        if segment_number == 0 {
            return Err(FourierError::InvalidParameter {
                name: "segment number",
                value: 0.0,
                reason: "at least one segment is required",
            });
        }
        Ok(Self {
            segment_number,
            segment_length,
            overlap,
        })
    }

    /// Distance between the starts of consecutive segments
    pub fn step(&self) -> usize {
        if self.overlap {
            self.segment_length / 2
        } else {
            self.segment_length
        }
    }

    /// Number of data points covered by the plan
    pub fn data_length(&self) -> usize {
        calc_data_length(self.overlap, self.segment_length, self.segment_number)
    }

    /// Number of points in the one-sided power spectrum
    pub fn psd_points(&self) -> usize {
        self.segment_length / 2
    }
}

/// Recoverable segmentation problems, in a fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentWarning {
    OddLengthTruncated,
    SegmentLengthNotPowerOfTwo,
    NotDivisibleBySegmentNumber,
    NotDivisibleBySegmentLength,
    NotDivisibleBySegmentNumberPlusOne,
    TwiceLengthNotDivisibleBySegmentLength,
    OverlapNeedsTwoSegments,
    SegmentedInsteadOfPadded,
    PaddedInsteadOfSegmented,
}

impl SegmentWarning {
    pub const ALL: [SegmentWarning; 9] = [
        SegmentWarning::OddLengthTruncated,
        SegmentWarning::SegmentLengthNotPowerOfTwo,
        SegmentWarning::NotDivisibleBySegmentNumber,
        SegmentWarning::NotDivisibleBySegmentLength,
        SegmentWarning::NotDivisibleBySegmentNumberPlusOne,
        SegmentWarning::TwiceLengthNotDivisibleBySegmentLength,
        SegmentWarning::OverlapNeedsTwoSegments,
        SegmentWarning::SegmentedInsteadOfPadded,
        SegmentWarning::PaddedInsteadOfSegmented,
    ];

    /// Stable position of the warning, 0 to 8
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn message(self) -> &'static str {
        match self {
            SegmentWarning::OddLengthTruncated => {
                "Number of data points must be an even number; the last point was deleted"
            }
            SegmentWarning::SegmentLengthNotPowerOfTwo => {
                "Segment length was not an integer power of two; segment length was reset to total data length, i.e. no segmentation"
            }
            SegmentWarning::NotDivisibleBySegmentNumber => {
                "Total data length divided by the number of segments was not an integer; segment length was reset to total data length, i.e. no segmentation"
            }
            SegmentWarning::NotDivisibleBySegmentLength => {
                "Total data length divided by the segment length was not an integer; segment length was reset to total data length, i.e. no segmentation"
            }
            SegmentWarning::NotDivisibleBySegmentNumberPlusOne => {
                "Total data length divided by the number of segments plus one was not an integer; segment length was reset to total data length, i.e. no segmentation"
            }
            SegmentWarning::TwiceLengthNotDivisibleBySegmentLength => {
                "Twice the total data length divided by the segment length was not an integer; segment length was reset to total data length, i.e. no segmentation"
            }
            SegmentWarning::OverlapNeedsTwoSegments => {
                "Overlap is not possible with less than two segments; overlap option has been reset to 'no overlap'"
            }
            SegmentWarning::SegmentedInsteadOfPadded => {
                "Data length was not an integer power of two; the data could not be transformed as a single segment and has been split into segments"
            }
            SegmentWarning::PaddedInsteadOfSegmented => {
                "Data length was not an integer power of two; data has been padded with zeros to give an integer power of two length"
            }
        }
    }
}

impl fmt::Display for SegmentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Set of warnings raised while resolving a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentWarnings {
    flags: [bool; 9],
}

impl SegmentWarnings {
    fn record(&mut self, warning: SegmentWarning) {
        log::warn!("{}", warning.message());
        self.flags[warning.index()] = true;
    }

    fn clear(&mut self, warning: SegmentWarning) {
        self.flags[warning.index()] = false;
    }

    pub fn contains(&self, warning: SegmentWarning) -> bool {
        self.flags[warning.index()]
    }

    pub fn is_empty(&self) -> bool {
        !self.flags.iter().any(|&f| f)
    }

    pub fn len(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// One flag per warning, indexed by [`SegmentWarning::index`]
    pub fn as_flags(&self) -> [bool; 9] {
        self.flags
    }

    pub fn iter(&self) -> impl Iterator<Item = SegmentWarning> + '_ {
        SegmentWarning::ALL
            .into_iter()
            .filter(move |w| self.flags[w.index()])
    }
}

impl fmt::Display for SegmentWarnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for warning in self.iter() {
            writeln!(f, "WARNING! {}", warning)?;
        }
        Ok(())
    }
}

/// Outcome of [`resolve_segments`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentResolution {
    /// Plan against `data_length`
    pub plan: SegmentPlan,
    /// Length supplied to the resolver
    pub original_length: usize,
    /// Length the plan was resolved against (one less than the original if it was odd)
    pub data_length: usize,
    /// Set when zero padding was preferred over segmentation
    pub padded_length: Option<usize>,
    pub warnings: SegmentWarnings,
}

impl SegmentResolution {
    /// Plan the estimator actually runs
    pub fn effective_plan(&self) -> SegmentPlan {
        match self.padded_length {
            Some(padded) => SegmentPlan::single(padded),
            None => self.plan,
        }
    }

    /// Number of data points the estimator consumes
    pub fn working_length(&self) -> usize {
        self.padded_length.unwrap_or(self.data_length)
    }

    /// Human-readable warnings report
    pub fn report(&self) -> String {
        let mut out = String::new();
        for warning in self.warnings.iter() {
            out.push_str("WARNING!\n");
            out.push_str(warning.message());
            out.push('\n');
            match warning {
                SegmentWarning::SegmentedInsteadOfPadded => {
                    out.push_str(&format!(
                        "The data has been split into {} segment/s of length {} with {}\n",
                        self.plan.segment_number,
                        self.plan.segment_length,
                        if self.plan.overlap { "50% overlap" } else { "no overlap" }
                    ));
                }
                SegmentWarning::PaddedInsteadOfSegmented => {
                    let padded = self.working_length();
                    out.push_str(&format!(
                        "Data has been padded with {} zeros\n",
                        padded.saturating_sub(self.original_length)
                    ));
                }
                _ => {}
            }
            out.push('\n');
        }
        out
    }
}

/// Resolve a segmentation request against a data length
///
/// # Arguments
/// * `length` - Number of data points available
/// * `request` - Requested segment count or segment length
/// * `overlap` - Whether segments overlap by half a segment
/// * `padding_tolerance` - Extra points of segment shortfall accepted before
///   zero padding is preferred over segmenting a non power-of-two length
pub fn resolve_segments(
    length: usize,
    request: SegmentRequest,
    overlap: bool,
    padding_tolerance: usize,
) -> Result<SegmentResolution> {
    if length < 2 {
        return Err(FourierError::InsufficientData { length });
    }
    match request {
        SegmentRequest::Count(0) => {
            return Err(FourierError::InvalidParameter {
                name: "segment number",
                value: 0.0,
                reason: "at least one segment is required",
            })
        }
        SegmentRequest::Length(0) => {
            return Err(FourierError::InvalidParameter {
                name: "segment length",
                value: 0.0,
                reason: "segments must contain at least one point",
            })
        }
        _ => {}
    }

    let mut warnings = SegmentWarnings::default();
    let original_length = length;
    let mut data_length = length;
    let mut altered = false;

    if data_length % 2 != 0 {
        data_length -= 1;
        altered = true;
        warnings.record(SegmentWarning::OddLengthTruncated);
    }

    let l = data_length;
    let mut plan = SegmentPlan::single(l);
    let mut overlap = overlap;

    // Overlap without an explicit request starts from a single segment
    let request = match request {
        SegmentRequest::Unspecified if overlap => SegmentRequest::Count(1),
        other => other,
    };

    match (request, overlap) {
        (SegmentRequest::Count(n), false) => {
            if l % n == 0 {
                let segment_length = l / n;
                if is_segment_length(segment_length) {
                    plan.segment_number = n;
                    plan.segment_length = segment_length;
                } else {
                    warnings.record(SegmentWarning::SegmentLengthNotPowerOfTwo);
                }
            } else {
                warnings.record(SegmentWarning::NotDivisibleBySegmentNumber);
            }
        }
        (SegmentRequest::Length(s), false) => {
            if l % s == 0 {
                if is_segment_length(s) {
                    plan.segment_number = l / s;
                    plan.segment_length = s;
                } else {
                    warnings.record(SegmentWarning::SegmentLengthNotPowerOfTwo);
                }
            } else {
                warnings.record(SegmentWarning::NotDivisibleBySegmentLength);
            }
        }
        (SegmentRequest::Count(n), true) => {
            // n + 1 above l never divides it
            if n < l && l % (n + 1) == 0 {
                let segment_length = 2 * (l / (n + 1));
                if is_segment_length(segment_length) {
                    plan = SegmentPlan {
                        segment_number: n,
                        segment_length,
                        overlap: true,
                    };
                } else {
                    warnings.record(SegmentWarning::SegmentLengthNotPowerOfTwo);
                    overlap = false;
                }
            } else {
                warnings.record(SegmentWarning::NotDivisibleBySegmentNumberPlusOne);
                overlap = false;
            }
        }
        (SegmentRequest::Length(s), true) => {
            let twice = l.checked_mul(2).filter(|twice| twice % s == 0);
            if let Some(twice) = twice {
                if is_segment_length(s) {
                    plan = SegmentPlan {
                        segment_number: twice / s - 1,
                        segment_length: s,
                        overlap: true,
                    };
                } else {
                    warnings.record(SegmentWarning::SegmentLengthNotPowerOfTwo);
                    overlap = false;
                }
            } else {
                warnings.record(SegmentWarning::TwiceLengthNotDivisibleBySegmentLength);
                overlap = false;
            }
        }
        (SegmentRequest::Unspecified, _) => {}
    }

    if overlap && plan.segment_number < 2 {
        warnings.record(SegmentWarning::OverlapNeedsTwoSegments);
        plan = SegmentPlan::single(l);
    }

    let mut padded_length = None;
    if plan.segment_number == 1 && !check_power_of_two(l) {
        let padded = next_power_of_two(original_length);
        match best_segmentation(l) {
            Some(candidate)
                if original_length - candidate.segment_length
                    <= (padded - original_length).saturating_add(padding_tolerance) =>
            {
                plan = candidate;
                warnings.record(SegmentWarning::SegmentedInsteadOfPadded);
            }
            _ => {
                // Padding starts from the original data, so a truncated point is restored
                if altered {
                    warnings.clear(SegmentWarning::OddLengthTruncated);
                }
                padded_length = Some(padded);
                warnings.record(SegmentWarning::PaddedInsteadOfSegmented);
            }
        }
    }

    log::debug!(
        "segment plan: {} segment/s of length {}, overlap {}, working length {}",
        plan.segment_number,
        plan.segment_length,
        plan.overlap,
        padded_length.unwrap_or(data_length)
    );

    Ok(SegmentResolution {
        plan,
        original_length,
        data_length,
        padded_length,
        warnings,
    })
}

/// Power of two of at least two points
fn is_segment_length(length: usize) -> bool {
    length >= 2 && check_power_of_two(length)
}

/// Longest power-of-two segmentation of `length`, with or without overlap
///
/// Segment counts are tried in increasing order for each option; the option
/// with the longer segments wins, no overlap on ties.
fn best_segmentation(length: usize) -> Option<SegmentPlan> {
    let mut no_overlap = None;
    let mut count = 2;
    loop {
        let segment_length = length / count;
        if segment_length < 2 {
            break;
        }
        if check_power_of_two(segment_length) && length % count == 0 {
            no_overlap = Some(SegmentPlan {
                segment_number: count,
                segment_length,
                overlap: false,
            });
            break;
        }
        count += 1;
    }

    let mut with_overlap = None;
    let mut count = 2;
    loop {
        let segment_length = 2 * (length / (count + 1));
        if segment_length < 2 {
            break;
        }
        if check_power_of_two(segment_length) && length % (count + 1) == 0 {
            with_overlap = Some(SegmentPlan {
                segment_number: count,
                segment_length,
                overlap: true,
            });
            break;
        }
        count += 1;
    }

    match (no_overlap, with_overlap) {
        (Some(a), Some(b)) => {
            if b.segment_length > a.segment_length {
                Some(b)
            } else {
                Some(a)
            }
        }
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_request_not_divisible() {
        let r = resolve_segments(100, SegmentRequest::Count(3), false, 0).unwrap();
        assert!(r.warnings.as_flags()[2]);
        assert!(r.warnings.contains(SegmentWarning::NotDivisibleBySegmentNumber));
        assert_eq!(r.plan.segment_number, 1);
        assert_eq!(r.plan.segment_length, 100);
        assert!(!r.plan.overlap);

        // Best segmentation of 100 is 24 overlapping segments of 8, worse than padding to 128
        assert!(r.warnings.contains(SegmentWarning::PaddedInsteadOfSegmented));
        assert_eq!(r.padded_length, Some(128));
        assert_eq!(r.effective_plan(), SegmentPlan::single(128));
    }

    #[test]
    fn test_count_request_valid() {
        let r = resolve_segments(128, SegmentRequest::Count(4), false, 0).unwrap();
        assert!(r.warnings.is_empty());
        assert_eq!(
            r.plan,
            SegmentPlan {
                segment_number: 4,
                segment_length: 32,
                overlap: false
            }
        );
        assert_eq!(r.plan.data_length(), 128);
    }

    #[test]
    fn test_count_request_not_power_of_two() {
        let r = resolve_segments(96, SegmentRequest::Count(4), false, 0).unwrap();
        assert!(r.warnings.contains(SegmentWarning::SegmentLengthNotPowerOfTwo));
        // 96 = two overlapping segments of 64, as cheap as padding to 128
        assert!(r.warnings.contains(SegmentWarning::SegmentedInsteadOfPadded));
        assert_eq!(
            r.plan,
            SegmentPlan {
                segment_number: 2,
                segment_length: 64,
                overlap: true
            }
        );
        assert_eq!(r.plan.data_length(), 96);
    }

    #[test]
    fn test_length_request() {
        let r = resolve_segments(256, SegmentRequest::Length(64), false, 0).unwrap();
        assert!(r.warnings.is_empty());
        assert_eq!(r.plan.segment_number, 4);

        let r = resolve_segments(256, SegmentRequest::Length(48), false, 0).unwrap();
        assert!(r.warnings.contains(SegmentWarning::NotDivisibleBySegmentLength));
        assert_eq!(r.plan, SegmentPlan::single(256));

        let r = resolve_segments(192, SegmentRequest::Length(96), false, 0).unwrap();
        assert!(r.warnings.contains(SegmentWarning::SegmentLengthNotPowerOfTwo));
    }

    #[test]
    fn test_overlap_requests() {
        let r = resolve_segments(128, SegmentRequest::Count(7), true, 0).unwrap();
        assert!(r.warnings.is_empty());
        assert_eq!(
            r.plan,
            SegmentPlan {
                segment_number: 7,
                segment_length: 32,
                overlap: true
            }
        );
        assert_eq!(r.plan.step(), 16);
        assert_eq!(r.plan.data_length(), 128);

        let r = resolve_segments(128, SegmentRequest::Length(32), true, 0).unwrap();
        assert_eq!(r.plan.segment_number, 7);
        assert!(r.plan.overlap);

        let r = resolve_segments(128, SegmentRequest::Count(4), true, 0).unwrap();
        assert!(r.warnings.contains(SegmentWarning::NotDivisibleBySegmentNumberPlusOne));
        assert!(!r.plan.overlap);

        let r = resolve_segments(128, SegmentRequest::Length(48), true, 0).unwrap();
        assert!(r
            .warnings
            .contains(SegmentWarning::TwiceLengthNotDivisibleBySegmentLength));
        assert_eq!(r.plan, SegmentPlan::single(128));
    }

    #[test]
    fn test_overlap_needs_two_segments() {
        let r = resolve_segments(64, SegmentRequest::Unspecified, true, 0).unwrap();
        assert!(r.warnings.contains(SegmentWarning::OverlapNeedsTwoSegments));
        assert_eq!(r.plan, SegmentPlan::single(64));

        let r = resolve_segments(64, SegmentRequest::Length(128), true, 0).unwrap();
        assert!(r.warnings.contains(SegmentWarning::OverlapNeedsTwoSegments));
        assert_eq!(r.plan, SegmentPlan::single(64));
    }

    #[test]
    fn test_odd_length_truncated() {
        let r = resolve_segments(65, SegmentRequest::Unspecified, false, 0).unwrap();
        assert!(r.warnings.contains(SegmentWarning::OddLengthTruncated));
        assert_eq!(r.data_length, 64);
        assert_eq!(r.plan, SegmentPlan::single(64));
        assert_eq!(r.padded_length, None);
    }

    #[test]
    fn test_odd_length_restored_when_padding() {
        // 99 -> 98 = 2 x 49, no power-of-two segmentation; padding wins
        let r = resolve_segments(99, SegmentRequest::Unspecified, false, 0).unwrap();
        assert!(!r.warnings.contains(SegmentWarning::OddLengthTruncated));
        assert!(r.warnings.contains(SegmentWarning::PaddedInsteadOfSegmented));
        assert_eq!(r.working_length(), 128);
    }

    #[test]
    fn test_segmentation_against_padding() {
        // 120: best is 14 overlapping segments of 16, shortfall 104 against 8 padded zeros
        let r = resolve_segments(120, SegmentRequest::Unspecified, false, 0).unwrap();
        assert!(r.warnings.contains(SegmentWarning::PaddedInsteadOfSegmented));
        assert_eq!(r.working_length(), 128);

        let r = resolve_segments(120, SegmentRequest::Unspecified, false, 96).unwrap();
        assert!(r.warnings.contains(SegmentWarning::SegmentedInsteadOfPadded));
        assert_eq!(
            r.plan,
            SegmentPlan {
                segment_number: 14,
                segment_length: 16,
                overlap: true
            }
        );
        assert_eq!(r.plan.data_length(), 120);
        assert_eq!(r.padded_length, None);

        // 192: two overlapping segments of 128, shortfall 64 equals 64 padded zeros
        let r = resolve_segments(192, SegmentRequest::Unspecified, false, 0).unwrap();
        assert!(r.warnings.contains(SegmentWarning::SegmentedInsteadOfPadded));
        assert_eq!(r.effective_plan().segment_length, 128);
        assert_eq!(r.effective_plan().segment_number, 2);
        assert_eq!(r.working_length(), 192);
    }

    #[test]
    fn test_best_segmentation() {
        assert_eq!(
            best_segmentation(100),
            Some(SegmentPlan {
                segment_number: 24,
                segment_length: 8,
                overlap: true
            })
        );
        assert_eq!(
            best_segmentation(96),
            Some(SegmentPlan {
                segment_number: 2,
                segment_length: 64,
                overlap: true
            })
        );
        assert_eq!(
            best_segmentation(24),
            Some(SegmentPlan {
                segment_number: 2,
                segment_length: 16,
                overlap: true
            })
        );
    }

    #[test]
    fn test_invalid_requests() {
        assert!(matches!(
            resolve_segments(1, SegmentRequest::Unspecified, false, 0),
            Err(FourierError::InsufficientData { length: 1 })
        ));
        assert!(resolve_segments(64, SegmentRequest::Count(0), false, 0).is_err());
        assert!(resolve_segments(64, SegmentRequest::Length(0), false, 0).is_err());
    }

    #[test]
    fn test_report() {
        let r = resolve_segments(100, SegmentRequest::Count(3), false, 0).unwrap();
        let report = r.report();
        assert!(report.contains("number of segments was not an integer"));
        assert!(report.contains("padded with 28 zeros"));
        assert_eq!(r.warnings.len(), 2);
        assert_eq!(r.warnings.to_string().lines().count(), 2);
    }

    #[test]
    fn test_explicit_plan() {
        assert!(SegmentPlan::explicit(64, 4, false).is_ok());
        assert!(SegmentPlan::explicit(48, 4, false).is_err());
        assert!(SegmentPlan::explicit(64, 0, false).is_err());
    }

    #[test]
    fn test_single_point_segments_rejected() {
        let r = resolve_segments(64, SegmentRequest::Length(1), false, 0).unwrap();
        assert!(r.warnings.contains(SegmentWarning::SegmentLengthNotPowerOfTwo));
        assert_eq!(r.plan, SegmentPlan::single(64));

        let r = resolve_segments(64, SegmentRequest::Count(64), false, 0).unwrap();
        assert!(r.warnings.contains(SegmentWarning::SegmentLengthNotPowerOfTwo));

        let r = resolve_segments(64, SegmentRequest::Length(1), true, 0).unwrap();
        assert!(r.warnings.contains(SegmentWarning::SegmentLengthNotPowerOfTwo));
        assert!(!r.plan.overlap);
        assert!(SegmentPlan::explicit(1, 1, false).is_err());
    }

    #[test]
    fn test_oversized_requests_fall_back() {
        let r = resolve_segments(64, SegmentRequest::Count(usize::MAX), true, 0).unwrap();
        assert!(r
            .warnings
            .contains(SegmentWarning::NotDivisibleBySegmentNumberPlusOne));
        assert_eq!(r.plan, SegmentPlan::single(64));

        let r = resolve_segments(64, SegmentRequest::Count(64), true, 0).unwrap();
        assert!(r
            .warnings
            .contains(SegmentWarning::NotDivisibleBySegmentNumberPlusOne));

        let r = resolve_segments(64, SegmentRequest::Count(usize::MAX), false, 0).unwrap();
        assert!(r.warnings.contains(SegmentWarning::NotDivisibleBySegmentNumber));

        let r = resolve_segments(64, SegmentRequest::Length(usize::MAX), true, 0).unwrap();
        assert!(r
            .warnings
            .contains(SegmentWarning::TwiceLengthNotDivisibleBySegmentLength));

        let r = resolve_segments(100, SegmentRequest::Unspecified, false, usize::MAX).unwrap();
        assert!(r.warnings.contains(SegmentWarning::SegmentedInsteadOfPadded));
    }
}
