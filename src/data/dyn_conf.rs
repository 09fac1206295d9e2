//! File/code adapted from https://github.com/jamjamjon/usls

use crate::data::LabelThreshold;

/// Per-class confidence thresholds resolved once at model load.
#[derive(Debug, Clone, PartialEq)]
pub struct DynConf {
    default: f32,
    confs: Vec<f32>,
}

impl Default for DynConf {
    fn default() -> Self {
        Self {
            default: 0.5,
            confs: vec![],
        }
    }
}

impl DynConf {
    /// Builds `nc` thresholds starting from `default`.
    ///
    /// An entry keyed by id wins over one keyed by label for the same class.
    pub fn new(default: f32, per_class: &[LabelThreshold], labels: &[String], nc: usize) -> Self {
        let confs = (0..nc)
            .map(|i| {
                let by_id = per_class.iter().find(|t| t.matches_id(i));
                let by_label = labels
                    .get(i)
                    .and_then(|l| per_class.iter().find(|t| t.id.is_none() && t.matches_label(l)));
                by_id.or(by_label).map(|t| t.threshold).unwrap_or(default)
            })
            .collect();

        Self { default, confs }
    }

    pub fn default_conf(&self) -> f32 {
        self.default
    }

    pub fn get(&self, class_id: usize) -> f32 {
        self.confs.get(class_id).copied().unwrap_or(self.default)
    }

    pub fn len(&self) -> usize {
        self.confs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confs.is_empty()
    }
}
