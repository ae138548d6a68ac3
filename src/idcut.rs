//! Cuts deciding which leptons are good enough to own an FSR photon

use crate::numeric::Float;
use nalgebra::SMatrix;

/// Electron ID score thresholds, rows are pt bins and columns are |eta| bins
pub type IdTable = SMatrix<Float, NUM_PT_BINS, NUM_ETA_BINS>;

/// Number of pt bins of the electron ID table
pub const NUM_PT_BINS: usize = 2;

/// Number of |eta| bins of the electron ID table
pub const NUM_ETA_BINS: usize = 3;

/// Row of electrons below the ID pt threshold
pub const LOW_PT: usize = 0;

/// Row of electrons above the ID pt threshold
pub const HIGH_PT: usize = 1;

/// Column of central electrons
pub const LOW_ETA: usize = 0;

/// Column of electrons between the two |eta| thresholds
pub const MED_ETA: usize = 1;

/// Column of forward electrons
pub const HIGH_ETA: usize = 2;

/// Kinematic and impact parameter cuts shared by both lepton flavors
#[derive(Clone, Debug, PartialEq)]
pub struct LeptonCuts {
    /// Minimal transverse momentum
    pub pt: Float,

    /// Maximal |eta|
    pub max_eta: Float,

    /// Maximal |SIP3D|
    pub sip: Float,

    /// Maximal |dxy| with respect to the primary vertex
    pub pv_dxy: Float,

    /// Maximal |dz| with respect to the primary vertex
    pub pv_dz: Float,
}

/// Electron selection
#[derive(Clone, Debug, PartialEq)]
pub struct ElectronCuts {
    /// Kinematic and impact parameter cuts
    pub kinematics: LeptonCuts,

    /// Name of the attribute holding the ID score
    pub id_label: String,

    /// Boundary between the low-pt and high-pt ID bins
    pub id_pt_thr: Float,

    /// Boundary between the low-|eta| and medium-|eta| ID bins
    pub id_eta_thr_low: Float,

    /// Boundary between the medium-|eta| and high-|eta| ID bins
    pub id_eta_thr_high: Float,

    /// ID score thresholds
    pub id_table: IdTable,
}
//
impl ElectronCuts {
    /// Pick the ID score threshold for an electron of a given pt and |eta|
    pub fn id_threshold(&self, pt: Float, abs_eta: Float) -> Float {
        let pt_bin = if pt < self.id_pt_thr { LOW_PT } else { HIGH_PT };
        let eta_bin = if abs_eta < self.id_eta_thr_low {
            LOW_ETA
        } else if abs_eta < self.id_eta_thr_high {
            MED_ETA
        } else {
            HIGH_ETA
        };
        self.id_table[(pt_bin, eta_bin)]
    }

    /// Decide whether an ID score passes for an electron of given pt and |eta|
    pub fn keep_score(&self, score: Float, pt: Float, abs_eta: Float) -> bool {
        score > self.id_threshold(pt, abs_eta)
    }
}

/// Full lepton selection
#[derive(Clone, Debug, PartialEq)]
pub struct IdCuts {
    /// Electron selection
    pub electron: ElectronCuts,

    /// Muon selection. Muon ID proper (PF and global or tracker) is fixed.
    pub muon: LeptonCuts,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use nalgebra::matrix;

    /// Electron selection with the producer's default thresholds
    pub(crate) fn default_electron_cuts() -> ElectronCuts {
        ElectronCuts {
            kinematics: LeptonCuts {
                pt: 7.,
                max_eta: 2.5,
                sip: 4.,
                pv_dxy: 0.5,
                pv_dz: 1.,
            },
            id_label: "MVANonTrigCSA14".to_owned(),
            id_pt_thr: 10.,
            id_eta_thr_low: 0.8,
            id_eta_thr_high: 1.479,
            id_table: matrix![0.47, 0.004, 0.295;
                              -0.34, -0.65, 0.6],
        }
    }

    #[test]
    fn id_table_binning() {
        let cuts = default_electron_cuts();
        assert_eq!(cuts.id_threshold(8., 0.3), 0.47);
        assert_eq!(cuts.id_threshold(8., 1.0), 0.004);
        assert_eq!(cuts.id_threshold(8., 2.0), 0.295);
        assert_eq!(cuts.id_threshold(15., 0.5), -0.34);
        assert_eq!(cuts.id_threshold(15., 1.2), -0.65);
        assert_eq!(cuts.id_threshold(15., 2.2), 0.6);
    }

    #[test]
    fn id_bin_boundaries_belong_to_upper_bins() {
        let cuts = default_electron_cuts();
        assert_eq!(cuts.id_threshold(10., 0.8), -0.65);
        assert_eq!(cuts.id_threshold(9.99, 1.479), 0.295);
    }

    #[test]
    fn id_score_must_exceed_threshold() {
        let cuts = default_electron_cuts();
        assert!(cuts.keep_score(0.50, 15., 0.5));
        assert!(!cuts.keep_score(-0.34, 15., 0.5));
        assert!(!cuts.keep_score(0.40, 8., 0.5));
    }
}
