use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::WheelError;

/// Ordered prize values around the wheel. Index order follows increasing rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorTable {
    values: Vec<u32>,
    sector_width: f64,
}

impl SectorTable {
    pub fn new(values: Vec<u32>) -> Result<Self, WheelError> {
        if values.is_empty() {
            return Err(WheelError::EmptySectorTable);
        }
        let sector_width = TAU / values.len() as f64;
        Ok(Self {
            values,
            sector_width,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Radians covered by one sector.
    pub fn sector_width(&self) -> f64 {
        self.sector_width
    }

    /// One full turn, `sector_width * len`.
    pub fn full_turn(&self) -> f64 {
        self.sector_width * self.values.len() as f64
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Index of the sector under the arrow. A sector wins within half a sector
    /// width either side of its midpoint, so the ratio is rounded, not truncated.
    pub fn index_at(&self, orientation: f64) -> usize {
        let steps = (orientation / self.sector_width + 0.5).floor();
        steps.rem_euclid(self.values.len() as f64) as usize % self.values.len()
    }

    pub fn value_at(&self, orientation: f64) -> u32 {
        self.values[self.index_at(orientation)]
    }
}

/// Rotation target and duration for one spin. Immutable once planned.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub sectors_to_travel: u32,
    pub total_rotation: f64,
    pub duration_ms: f64,
}

/// Picks randomized spin plans and maps final orientations back to prizes.
///
/// Landing sectors are only approximately uniform: the extra travel is a
/// uniform draw over whole sector steps, so each sector is hit by either
/// `floor(span / N)` or `ceil(span / N)` of the possible draws.
#[derive(Debug, Clone)]
pub struct SpinEngine {
    sectors: SectorTable,
    min_sectors: u32,
    extra_span: u32,
    min_duration_ms: u64,
    additional_duration_ms: u64,
}

impl SpinEngine {
    pub fn new(
        sectors: SectorTable,
        min_spins: u32,
        min_duration_ms: u64,
        additional_duration_ms: u64,
    ) -> Result<Self, WheelError> {
        let (min_sectors, extra_span) = travel_bounds(min_spins, sectors.len())?;
        Ok(Self {
            sectors,
            min_sectors,
            extra_span,
            min_duration_ms,
            additional_duration_ms,
        })
    }

    pub fn sectors(&self) -> &SectorTable {
        &self.sectors
    }

    /// Sector steps every spin travels at least: `min_spins` full turns.
    pub fn min_sectors(&self) -> u32 {
        self.min_sectors
    }

    /// Number of distinct extra step counts a spin may add on top of the minimum.
    pub fn extra_span(&self) -> u32 {
        self.extra_span
    }

    pub fn plan_spin<R: Rng + ?Sized>(&self, rng: &mut R) -> SpinPlan {
        let span = self.extra_span();
        let extra = if span == 0 { 0 } else { rng.gen_range(0..span) };
        let plan = self.plan_with_extra(extra);
        log::debug!(
            "Planned spin: {} sectors, {:.3} rad over {:.0}ms",
            plan.sectors_to_travel,
            plan.total_rotation,
            plan.duration_ms
        );
        plan
    }

    /// Builds the plan for a specific extra step count. Counts past the span are clamped.
    pub fn plan_with_extra(&self, extra: u32) -> SpinPlan {
        let span = self.extra_span();
        let extra = extra.min(span.saturating_sub(1));
        let extra_fraction = if span == 0 {
            0.0
        } else {
            extra as f64 / span as f64
        };
        let sectors_to_travel = self.min_sectors() + extra;
        SpinPlan {
            sectors_to_travel,
            total_rotation: sectors_to_travel as f64 * self.sectors.sector_width(),
            duration_ms: self.min_duration_ms as f64
                + self.additional_duration_ms as f64 * extra_fraction,
        }
    }

    pub fn resolve_sector(&self, orientation: f64) -> u32 {
        self.sectors.value_at(orientation)
    }
}

/// Minimum travel and extra-travel span, in sector steps, for a wheel of
/// `sectors` sectors. Rejects spin counts whose longest plan would not fit a `u32`.
pub fn travel_bounds(min_spins: u32, sectors: usize) -> Result<(u32, u32), WheelError> {
    if sectors == 0 {
        return Err(WheelError::EmptySectorTable);
    }
    if min_spins == 0 {
        return Err(WheelError::InvalidMinSpins(min_spins));
    }
    let too_long = || WheelError::SpinTooLong { min_spins, sectors };
    let n = u32::try_from(sectors).map_err(|_| too_long())?;
    let min_sectors = min_spins.checked_mul(n).ok_or_else(too_long)?;
    let extra_span = min_spins
        .checked_mul(2)
        .and_then(|spins| (spins - 1).checked_mul(n))
        .map(|steps| steps - 1)
        .ok_or_else(too_long)?;
    // Longest plan travels min_sectors + extra_span - 1 steps
    min_sectors.checked_add(extra_span).ok_or_else(too_long)?;
    Ok((min_sectors, extra_span))
}
