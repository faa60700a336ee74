// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in curves used when no curve file is given.

use curvedraw_curve::{AnimationCurve, CurveError, CurveSet, EditorCurve, Keyframe, TangentMode};

/// A small set covering smooth, stepped and free-tangent segments
pub fn demo_curves() -> Result<CurveSet, CurveError> {
    let mut curves = CurveSet::new();

    curves.push(EditorCurve::from_curve(
        "ease",
        AnimationCurve::new(vec![
            Keyframe::new(0.0, -5.0),
            Keyframe::new(12.0, 6.0).with_tangents(0.8, 0.8),
            Keyframe::new(30.0, 2.0),
            Keyframe::new(48.0, -4.0),
        ])?,
    ));

    curves.push(EditorCurve::new(
        "stepped",
        AnimationCurve::new(vec![
            Keyframe::new(6.0, 1.0).with_tangents(0.0, f32::INFINITY),
            Keyframe::new(20.0, 4.0).with_tangents(0.0, f32::INFINITY),
            Keyframe::new(36.0, -2.0),
        ])?,
        vec![TangentMode::OUT_STEP, TangentMode::IN_STEP | TangentMode::OUT_STEP],
    )?);

    curves.push(EditorCurve::new(
        "free",
        AnimationCurve::new(vec![
            Keyframe::new(10.0, 0.0).with_tangents(-1.0, 1.0),
            Keyframe::new(40.0, 8.0).with_tangents(-0.5, 0.0),
            Keyframe::new(70.0, 3.0),
        ])?,
        vec![TangentMode::FREE, TangentMode::IN_FREE | TangentMode::OUT_FREE],
    )?);

    Ok(curves)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_curves() {
        let curves = demo_curves().unwrap();
        assert_eq!(curves.len(), 3);

        let stepped = curves.get_index(1).unwrap();
        assert_eq!(stepped.tangent_modes().len(), 3);
        assert_eq!(stepped.evaluate(10.0, false), 1.0);

        // Last key of the free curve lies past the default 60s view
        let free = curves.get_index(2).unwrap();
        assert_eq!(free.curve().end_time(), 70.0);
    }
}
