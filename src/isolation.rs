//! Photon isolation

use crate::{
    error::Result,
    event::{user_float, Photon},
    numeric::Float,
};

/// Relative isolation of a photon: the sum of its isolation components
///
/// The components are expected to already be normalized to the photon pt, so
/// this is a plain sum.
///
pub fn relative_isolation(
    photon: &Photon,
    index: usize,
    iso_labels: &[String],
) -> Result<Float> {
    iso_labels.iter().try_fold(0., |sum, label| {
        Ok(sum + user_float(&photon.user_floats, "photon", index, label)?)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::FsrError, momentum::from_pt_eta_phi_m};
    use approx::assert_relative_eq;

    fn labels() -> Vec<String> {
        vec!["chHad".to_owned(), "nHadPho".to_owned()]
    }

    #[test]
    fn components_are_summed() {
        let photon = Photon {
            p4: from_pt_eta_phi_m(5., 0., 0., 0.),
            user_floats: [
                ("chHad".to_owned(), 0.25),
                ("nHadPho".to_owned(), 0.5),
                ("unrelated".to_owned(), 100.),
            ]
            .into_iter()
            .collect(),
        };
        assert_relative_eq!(relative_isolation(&photon, 0, &labels()).unwrap(), 0.75);
    }

    #[test]
    fn missing_component_is_an_input_error() {
        let photon = Photon {
            p4: from_pt_eta_phi_m(5., 0., 0., 0.),
            user_floats: [("chHad".to_owned(), 0.25)].into_iter().collect(),
        };
        let err = relative_isolation(&photon, 7, &labels()).unwrap_err();
        assert!(matches!(
            err,
            FsrError::MissingAttribute { object: "photon", index: 7, ref name } if name == "nHadPho"
        ));
    }
}
