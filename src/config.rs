//! Mechanism for loading and sharing a producer configuration
//!
//! The configuration format is line-oriented: each non-blank line holds an
//! option name followed by its value(s), separated by whitespace. Anything
//! after a `#` is a comment. Option names follow the framework's parameter
//! names (`dRInner`, `electronIDCutHighPtLowEta`, ...).

use crate::{
    error::{FsrError, Result},
    idcut::{ElectronCuts, IdCuts, IdTable, LeptonCuts},
    lepton::Flavor,
    matcher::FsrCuts,
    numeric::Float,
    veto::VetoCuts,
};
use std::{collections::BTreeMap, fmt::Display, str::FromStr};
use tracing::info;

/// Producer configuration
#[derive(Clone, Debug)]
pub struct Configuration {
    /// Flavor of the decorated leptons
    pub flavor: Flavor,

    /// Tag of the decorated lepton collection
    pub src: String,

    /// Tag of the lepton collection of the other flavor
    pub src_alt: String,

    /// Tag of the FSR photon candidate collection
    pub src_pho: String,

    /// Tag of the electron collection used by the cluster veto
    pub src_veto: String,

    /// Tag of the vertex collection, whose first vertex is the primary one
    pub src_vtx: String,

    /// Prefix of the photon references embedded in leptons
    pub label: String,

    /// Names of the photon attributes summed into its isolation
    pub iso_labels: Vec<String>,

    /// Photon selection and association cuts
    pub fsr: FsrCuts,

    /// Cluster veto cuts
    pub veto: VetoCuts,

    /// Lepton identification cuts
    pub id: IdCuts,
}
//
impl Configuration {
    /// Parse a configuration, check it, and print it out
    pub fn parse(config_str: &str) -> Result<Self> {
        let mut items = ConfigItems::new(config_str)?;

        let electron_id_table = IdTable::new(
            items.float_or("electronIDCutLowPtLowEta", 0.47)?,
            items.float_or("electronIDCutLowPtMedEta", 0.004)?,
            items.float_or("electronIDCutLowPtHighEta", 0.295)?,
            items.float_or("electronIDCutHighPtLowEta", -0.34)?,
            items.float_or("electronIDCutHighPtMedEta", -0.65)?,
            items.float_or("electronIDCutHighPtHighEta", 0.6)?,
        );

        // Decode the configuration items into concrete values
        let config = Configuration {
            flavor: items.required("flavor")?.parse_flavor()?,
            src: items.required("src")?.single()?.to_owned(),
            src_alt: items.required("srcAlt")?.single()?.to_owned(),
            src_pho: items.string_or("srcPho", "boostedFsrPhotons")?,
            src_veto: items.string_or("srcVeto", "slimmedElectrons")?,
            src_vtx: items.string_or("srcVtx", "selectedPrimaryVertex")?,
            label: items.string_or("userLabel", "FSRCand")?,
            iso_labels: items.required("isoLabels")?.list(),
            fsr: FsrCuts {
                dr_inner: items.float_or("dRInner", 0.07)?,
                dr_outer: items.float_or("dROuter", 0.5)?,
                iso_inner: items.float_or("isoInner", 9999.9)?,
                iso_outer: items.float_or("isoOuter", 1.0)?,
                pt_inner: items.float_or("ptInner", 2.)?,
                pt_outer: items.float_or("ptOuter", 4.)?,
                max_eta: items.float_or("maxEta", 2.4)?,
            },
            veto: VetoCuts {
                dr: items.float_or("vetoDR", 0.15)?,
                dphi: items.float_or("vetoDPhi", 2.)?,
                deta: items.float_or("vetoDEta", 0.05)?,
                require_id: items.bool_or("vetoRequireID", false)?,
                use_super_cluster: items.bool_or("vetoUseSuperCluster", false)?,
            },
            id: IdCuts {
                electron: ElectronCuts {
                    kinematics: LeptonCuts {
                        pt: items.float_or("electronPt", 7.)?,
                        max_eta: items.float_or("electronMaxEta", 2.5)?,
                        sip: items.float_or("electronSIP", 4.)?,
                        pv_dxy: items.float_or("electronPVDXY", 0.5)?,
                        pv_dz: items.float_or("electronPVDZ", 1.)?,
                    },
                    id_label: items.string_or("electronIDLabel", "MVANonTrigCSA14")?,
                    id_pt_thr: items.float_or("electronIDPtThr", 10.)?,
                    id_eta_thr_low: items.float_or("electronIDEtaThrLow", 0.8)?,
                    id_eta_thr_high: items.float_or("electronIDEtaThrHigh", 1.479)?,
                    id_table: electron_id_table,
                },
                muon: LeptonCuts {
                    pt: items.float_or("muonPt", 5.)?,
                    max_eta: items.float_or("muonMaxEta", 2.4)?,
                    sip: items.float_or("muonSIP", 4.)?,
                    pv_dxy: items.float_or("muonPVDXY", 0.5)?,
                    pv_dz: items.float_or("muonPVDZ", 1.)?,
                },
            },
        };

        // Anything left over is a typo or an option of some other producer
        items.finish()?;

        config.check()?;
        config.print();
        Ok(config)
    }

    /// Check that the options make sense together
    fn check(&self) -> Result<()> {
        if self.iso_labels.is_empty() {
            return Err(FsrError::inconsistent("isoLabels must name at least one attribute"));
        }
        let fsr = &self.fsr;
        if !(fsr.dr_inner > 0. && fsr.dr_inner <= fsr.dr_outer) {
            return Err(FsrError::inconsistent(format!(
                "need 0 < dRInner <= dROuter, got dRInner={} and dROuter={}",
                fsr.dr_inner, fsr.dr_outer
            )));
        }
        let electron = &self.id.electron;
        if electron.id_eta_thr_low > electron.id_eta_thr_high {
            return Err(FsrError::inconsistent(format!(
                "electronIDEtaThrLow ({}) is above electronIDEtaThrHigh ({})",
                electron.id_eta_thr_low, electron.id_eta_thr_high
            )));
        }
        if let Some(bad) = electron.id_table.iter().find(|cut| !cut.is_finite()) {
            return Err(FsrError::inconsistent(format!(
                "electron ID table holds a non-finite threshold ({bad})"
            )));
        }
        let veto = &self.veto;
        let cuts = [
            ("dRInner", fsr.dr_inner),
            ("dROuter", fsr.dr_outer),
            ("ptInner", fsr.pt_inner),
            ("ptOuter", fsr.pt_outer),
            ("maxEta", fsr.max_eta),
            ("vetoDR", veto.dr),
            ("vetoDPhi", veto.dphi),
            ("vetoDEta", veto.deta),
            ("electronIDPtThr", electron.id_pt_thr),
            ("electronIDEtaThrLow", electron.id_eta_thr_low),
            ("electronIDEtaThrHigh", electron.id_eta_thr_high),
        ];
        if let Some((name, value)) = cuts.iter().find(|(_, value)| !value.is_finite()) {
            return Err(FsrError::inconsistent(format!("{name} must be finite, got {value}")));
        }
        // Upper bounds may be arbitrarily loose, but a NaN would disable the cut
        let muon = &self.id.muon;
        let bounds = [
            ("isoInner", fsr.iso_inner),
            ("isoOuter", fsr.iso_outer),
            ("electronPt", electron.kinematics.pt),
            ("electronMaxEta", electron.kinematics.max_eta),
            ("electronSIP", electron.kinematics.sip),
            ("electronPVDXY", electron.kinematics.pv_dxy),
            ("electronPVDZ", electron.kinematics.pv_dz),
            ("muonPt", muon.pt),
            ("muonMaxEta", muon.max_eta),
            ("muonSIP", muon.sip),
            ("muonPVDXY", muon.pv_dxy),
            ("muonPVDZ", muon.pv_dz),
        ];
        if let Some((name, _)) = bounds.iter().find(|(_, value)| value.is_nan()) {
            return Err(FsrError::inconsistent(format!("{name} must be a number, got NaN")));
        }
        Ok(())
    }

    /// Log the configuration
    pub fn print(&self) {
        info!("Flavor         : {:?}", self.flavor);
        info!("src            : {}", self.src);
        info!("srcAlt         : {}", self.src_alt);
        info!("srcPho         : {}", self.src_pho);
        info!("srcVeto        : {}", self.src_veto);
        info!("srcVtx         : {}", self.src_vtx);
        info!("userLabel      : {}", self.label);
        info!("isoLabels      : {}", self.iso_labels.join(" "));
        let fsr = &self.fsr;
        info!("dR inner/outer : {} / {}", fsr.dr_inner, fsr.dr_outer);
        info!("iso inner/outer: {} / {}", fsr.iso_inner, fsr.iso_outer);
        info!("pt inner/outer : {} / {}", fsr.pt_inner, fsr.pt_outer);
        info!("maxEta         : {}", fsr.max_eta);
        let veto = &self.veto;
        info!("veto dR/dPhi/dEta : {} / {} / {}", veto.dr, veto.dphi, veto.deta);
        info!("veto requires ID  : {}", veto.require_id);
        info!("veto superclusters: {}", veto.use_super_cluster);
        let e = &self.id.electron;
        info!("electron cuts  : {:?}", e.kinematics);
        info!(
            "electron ID    : {} (pt thr {}, eta thr {} / {})",
            e.id_label, e.id_pt_thr, e.id_eta_thr_low, e.id_eta_thr_high
        );
        info!(
            "electron ID table (rows: low/high pt, cols: low/med/high eta):{}",
            e.id_table
        );
        info!("muon cuts      : {:?}", self.id.muon);
    }
}

/// The raw options of a configuration file, by name
struct ConfigItems<'data> {
    items: BTreeMap<&'data str, ConfigItem<'data>>,
}
//
impl<'data> ConfigItems<'data> {
    /// Split a configuration file into options
    fn new(config_str: &'data str) -> Result<Self> {
        let mut items = BTreeMap::new();
        for line in config_str.lines() {
            let content = line.split('#').next().unwrap_or_default();
            let mut words = content.split_whitespace();
            let Some(name) = words.next() else {
                continue;
            };
            let item = ConfigItem::new(name, words.collect());
            if items.insert(name, item).is_some() {
                return Err(FsrError::DuplicateOption(name.to_owned()));
            }
        }
        Ok(Self { items })
    }

    /// Fetch an option, if present
    fn take(&mut self, name: &str) -> Option<ConfigItem<'data>> {
        self.items.remove(name)
    }

    /// Fetch an option which has no default value
    fn required(&mut self, name: &'static str) -> Result<ConfigItem<'data>> {
        self.take(name).ok_or(FsrError::MissingOption(name))
    }

    /// Fetch a floating-point option
    fn float_or(&mut self, name: &str, default: Float) -> Result<Float> {
        self.take(name).map_or(Ok(default), |item| item.parse())
    }

    /// Fetch a string option
    fn string_or(&mut self, name: &str, default: &str) -> Result<String> {
        self.take(name)
            .map_or(Ok(default.to_owned()), |item| item.single().map(str::to_owned))
    }

    /// Fetch a boolean option
    fn bool_or(&mut self, name: &str, default: bool) -> Result<bool> {
        self.take(name).map_or(Ok(default), |item| item.parse_bool())
    }

    /// Make sure that every option was recognized
    fn finish(self) -> Result<()> {
        match self.items.into_keys().next() {
            Some(name) => Err(FsrError::UnknownOption(name.to_owned())),
            None => Ok(()),
        }
    }
}

/// A value from the configuration file, tagged with the option name for
/// error reporting purposes.
struct ConfigItem<'data> {
    name: &'data str,
    values: Vec<&'data str>,
}
//
impl<'data> ConfigItem<'data> {
    /// Build a config item from an option name and its raw values
    fn new(name: &'data str, values: Vec<&'data str>) -> Self {
        Self { name, values }
    }

    /// Error out on a malformed value
    fn invalid(&self, reason: impl Display) -> FsrError {
        FsrError::InvalidOption {
            name: self.name.to_owned(),
            value: self.values.join(" "),
            reason: reason.to_string(),
        }
    }

    /// Access the value of a single-valued option
    fn single(&self) -> Result<&'data str> {
        match self.values[..] {
            [value] => Ok(value),
            [] => Err(self.invalid("expected a value")),
            _ => Err(self.invalid("expected a single value")),
        }
    }

    /// Access the values of a list option
    fn list(&self) -> Vec<String> {
        self.values.iter().map(|&value| value.to_owned()).collect()
    }

    /// Parse this data using Rust's standard parsing logic
    fn parse<T: FromStr>(&self) -> Result<T>
    where
        <T as FromStr>::Err: Display,
    {
        self.single()?
            .parse::<T>()
            .map_err(|err| self.invalid(err))
    }

    /// Parse this data using special logic which also handles Fortran's bool
    /// syntax, as older configuration files use it
    fn parse_bool(&self) -> Result<bool> {
        match self.single()?.to_lowercase().as_str() {
            ".true." => Ok(true),
            ".false." => Ok(false),
            _ => self.parse::<bool>(),
        }
    }

    /// Parse a lepton flavor
    fn parse_flavor(&self) -> Result<Flavor> {
        match self.single()? {
            "electron" | "electrons" => Ok(Flavor::Electron),
            "muon" | "muons" => Ok(Flavor::Muon),
            _ => Err(self.invalid("expected electron or muon")),
        }
    }
}
