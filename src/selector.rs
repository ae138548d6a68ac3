//! Lepton candidate selection, memoized for the duration of one event

use crate::{
    error::Result,
    event::PrimaryVertex,
    idcut::IdCuts,
    lepton::Lepton,
    momentum::{self, Direction},
    numeric::Float,
};

/// A lepton collection together with the ID decisions taken so far
///
/// Each decision is computed the first time it is asked for, and reused for
/// the rest of the event. The cache is indexed by position in the collection
/// and dies with the selector, i.e. at the end of the event.
///
pub struct CandidateSelector<'ev, L: Lepton> {
    /// Leptons under consideration
    leptons: &'ev [L],

    /// Identification cuts
    cuts: &'ev IdCuts,

    /// Vertex which impact parameters are measured against
    pv: PrimaryVertex<'ev>,

    /// ID decisions, if already taken
    verdicts: Vec<Option<bool>>,
}
//
impl<'ev, L: Lepton> CandidateSelector<'ev, L> {
    /// Start selecting among a lepton collection
    pub fn new(leptons: &'ev [L], cuts: &'ev IdCuts, pv: PrimaryVertex<'ev>) -> Self {
        Self {
            leptons,
            cuts,
            pv,
            verdicts: vec![None; leptons.len()],
        }
    }

    /// Leptons under consideration
    pub fn leptons(&self) -> &'ev [L] {
        self.leptons
    }

    /// Whether the lepton at `index` passes identification
    pub fn passes_id(&mut self, index: usize) -> Result<bool> {
        if let Some(verdict) = self.verdicts[index] {
            return Ok(verdict);
        }
        let verdict = self.leptons[index].passes_id(index, self.cuts, &self.pv)?;
        self.verdicts[index] = Some(verdict);
        Ok(verdict)
    }

    /// Number of ID decisions taken so far
    pub fn num_evaluated(&self) -> usize {
        self.verdicts.iter().filter(|v| v.is_some()).count()
    }

    /// Find the identified lepton closest to `direction`, among those closer
    /// than `max_dr`. Ties go to the first lepton of the collection.
    ///
    /// Returns the lepton's index and its distance to `direction`.
    ///
    pub fn closest(
        &mut self,
        direction: Direction,
        max_dr: Float,
    ) -> Result<Option<(usize, Float)>> {
        let mut best: Option<(usize, Float)> = None;
        for (index, lepton) in self.leptons.iter().enumerate() {
            // Undefined directions (e.g. null momenta) are never close
            let dr = momentum::delta_r(direction, lepton.direction());
            if dr.is_nan() || dr >= max_dr {
                continue;
            }
            if best.map_or(false, |(_, best_dr)| dr >= best_dr) {
                continue;
            }
            if self.passes_id(index)? {
                best = Some((index, dr));
            }
        }
        Ok(best)
    }
}
