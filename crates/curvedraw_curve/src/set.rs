// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ordered collections of curves and references into them.

use crate::curve::{CurveError, CurveId, EditorCurve};
use crate::keyframe::{Keyframe, TangentType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identifies a keyframe by the index of its curve and its index on that curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct KeyframeRef {
    /// Index of the curve within its set
    pub curve_idx: usize,
    /// Index of the keyframe on the curve
    pub key_idx: usize,
}

impl KeyframeRef {
    /// Create a new keyframe reference
    pub fn new(curve_idx: usize, key_idx: usize) -> Self {
        Self { curve_idx, key_idx }
    }
}

/// Identifies one tangent handle of a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TangentRef {
    /// Keyframe owning the tangent
    pub keyframe: KeyframeRef,
    /// Which side of the keyframe
    pub tangent_type: TangentType,
}

/// Curves in display order. A curve's position is its curve index.
///
/// Serialized as a list of curves. Tangent modes are written as flag names in
/// a one-element tuple, e.g. `tangent_modes: [("OUT_STEP"), ("IN_FREE | OUT_FREE")]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<EditorCurve>", into = "Vec<EditorCurve>")]
pub struct CurveSet {
    curves: IndexMap<CurveId, EditorCurve>,
}

impl CurveSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a curve, replacing any curve with the same ID in place
    pub fn push(&mut self, curve: EditorCurve) -> CurveId {
        let id = curve.id;
        self.curves.insert(id, curve);
        id
    }

    /// Remove a curve, shifting later curves down by one index
    pub fn remove(&mut self, id: CurveId) -> Option<EditorCurve> {
        self.curves.shift_remove(&id)
    }

    /// Get a curve by ID
    pub fn get(&self, id: CurveId) -> Option<&EditorCurve> {
        self.curves.get(&id)
    }

    /// Get a curve by index
    pub fn get_index(&self, curve_idx: usize) -> Option<&EditorCurve> {
        self.curves.get_index(curve_idx).map(|(_, curve)| curve)
    }

    /// Index of a curve
    pub fn index_of(&self, id: CurveId) -> Option<usize> {
        self.curves.get_index_of(&id)
    }

    /// Look up the keyframe a reference points at
    pub fn keyframe(&self, keyframe: KeyframeRef) -> Option<&Keyframe> {
        self.get_index(keyframe.curve_idx)?
            .keyframes()
            .get(keyframe.key_idx)
    }

    /// Iterate over curves in display order
    pub fn iter(&self) -> impl Iterator<Item = &EditorCurve> {
        self.curves.values()
    }

    /// Get curve count
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Whether the set holds no curves
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Parse a set from RON text
    pub fn from_ron(source: &str) -> Result<Self, CurveError> {
        Ok(ron::from_str(source)?)
    }

    /// Serialize the set to pretty RON
    pub fn to_ron(&self) -> Result<String, CurveError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load a set from a RON file
    pub fn load(path: &Path) -> Result<Self, CurveError> {
        let source = std::fs::read_to_string(path)?;
        let set = Self::from_ron(&source)?;
        tracing::debug!("Loaded {} curves from {:?}", set.len(), path);
        Ok(set)
    }
}

impl From<Vec<EditorCurve>> for CurveSet {
    fn from(curves: Vec<EditorCurve>) -> Self {
        let mut set = Self::new();
        for curve in curves {
            set.push(curve);
        }
        set
    }
}

impl From<CurveSet> for Vec<EditorCurve> {
    fn from(set: CurveSet) -> Self {
        set.curves.into_values().collect()
    }
}

impl FromIterator<EditorCurve> for CurveSet {
    fn from_iter<I: IntoIterator<Item = EditorCurve>>(iter: I) -> Self {
        let mut set = Self::new();
        for curve in iter {
            set.push(curve);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::AnimationCurve;
    use crate::keyframe::TangentMode;

    fn curve(name: &str, values: &[f32]) -> EditorCurve {
        let keys = values
            .iter()
            .enumerate()
            .map(|(i, v)| Keyframe::new(i as f32, *v))
            .collect();
        EditorCurve::from_curve(name, AnimationCurve::new(keys).unwrap())
    }

    #[test]
    fn test_indexing() {
        let mut set = CurveSet::new();
        let a = set.push(curve("a", &[0.0, 1.0]));
        let b = set.push(curve("b", &[5.0]));

        assert_eq!(set.len(), 2);
        assert_eq!(set.index_of(b), Some(1));
        assert_eq!(set.keyframe(KeyframeRef::new(0, 1)).map(|k| k.value), Some(1.0));
        assert!(set.keyframe(KeyframeRef::new(1, 1)).is_none());
        assert!(set.keyframe(KeyframeRef::new(2, 0)).is_none());

        set.remove(a);
        assert_eq!(set.index_of(b), Some(0));
        assert_eq!(set.get_index(0).map(|c| c.name.as_str()), Some("b"));
    }

    #[test]
    fn test_serialization() {
        let mut set = CurveSet::new();
        set.push(curve("position.x", &[0.0, 2.0, -1.0]));

        let ron_str = set.to_ron().unwrap();
        let loaded = CurveSet::from_ron(&ron_str).unwrap();
        assert_eq!(loaded.len(), 1);

        let before = set.get_index(0).unwrap();
        let restored = loaded.get_index(0).unwrap();
        assert_eq!(restored.id, before.id);
        assert_eq!(restored.curve(), before.curve());
    }

    #[test]
    fn test_parse_handwritten() {
        let source = r#"[
            (
                name: "alpha",
                curve: [
                    (time: 0.0, value: 0.0, in_tangent: 0.0, out_tangent: inf),
                    (time: 1.0, value: 1.0, in_tangent: 0.0, out_tangent: 0.0),
                ],
                tangent_modes: [("OUT_STEP"), ("IN_FREE | OUT_FREE")],
            ),
        ]"#;

        let set = CurveSet::from_ron(source).unwrap();
        let alpha = set.get_index(0).unwrap();
        assert_eq!(alpha.name, "alpha");
        assert_eq!(alpha.tangent_mode(0), TangentMode::OUT_STEP);
        assert_eq!(
            alpha.tangent_mode(1),
            TangentMode::IN_FREE | TangentMode::OUT_FREE
        );
        assert_eq!(alpha.evaluate(0.5, false), 0.0);
    }

    #[test]
    fn test_parse_rejects_unsorted() {
        let source = r#"[
            (
                curve: [
                    (time: 2.0, value: 0.0, in_tangent: 0.0, out_tangent: 0.0),
                    (time: 1.0, value: 1.0, in_tangent: 0.0, out_tangent: 0.0),
                ],
            ),
        ]"#;

        assert!(CurveSet::from_ron(source).is_err());
    }
}
