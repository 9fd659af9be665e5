//! Fog parameter bundle and partial-update patches.

/// The live fog configuration.
///
/// One instance exists per scene, owned by [`crate::FogModel`]; every fogged
/// material reads derived uniform values from it. Consumers never mutate the
/// fields directly — changes go through [`crate::FogModel::update_params`] so
/// they propagate to every registered material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FogParams {
    /// Vertical thickness of the height fog band; the height-fog smoothstep
    /// ramps over this distance below the fog plane.
    pub depth: f32,
    /// View distance where distance fog starts ramping in.
    pub start_distance: f32,
    /// View distance where distance fog would reach full strength; at and
    /// beyond it the distance term drops back to zero so far geometry (the sky
    /// sphere above all) resurfaces instead of vanishing.
    pub end_distance: f32,
    /// HSL hue of the fog at close range, in degrees.
    pub close_hue: f32,
    /// HSL hue of the fog at far range, in degrees.
    pub distant_hue: f32,
    /// HSL lightness of the fog at close range, in `[0, 1]`.
    pub close_brightness: f32,
    /// HSL lightness of the fog at far range, in `[0, 1]`.
    pub distant_brightness: f32,
    /// View distance where the close→distant color blend begins.
    pub color_start_distance: f32,
    /// View distance where the color blend reaches the distant tone.
    pub color_end_distance: f32,
    /// World-space Y of the fog plane; fog fills the space below it.
    pub height: f32,
}

impl Default for FogParams {
    fn default() -> Self {
        Self {
            depth: 60.0,
            start_distance: 300.0,
            end_distance: 2400.0,
            close_hue: 210.0,
            distant_hue: 232.0,
            close_brightness: 0.72,
            distant_brightness: 0.55,
            color_start_distance: 200.0,
            color_end_distance: 1600.0,
            height: 40.0,
        }
    }
}

/// A partial update to [`FogParams`]: only `Some` fields are applied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FogParamsPatch {
    pub depth: Option<f32>,
    pub start_distance: Option<f32>,
    pub end_distance: Option<f32>,
    pub close_hue: Option<f32>,
    pub distant_hue: Option<f32>,
    pub close_brightness: Option<f32>,
    pub distant_brightness: Option<f32>,
    pub color_start_distance: Option<f32>,
    pub color_end_distance: Option<f32>,
    pub height: Option<f32>,
}

impl FogParamsPatch {
    /// A patch that changes only the fog plane height.
    pub fn height(height: f32) -> Self {
        Self {
            height: Some(height),
            ..Self::default()
        }
    }

    /// Merge the patch into `params`. Returns `true` if `height` was set.
    pub fn apply(&self, params: &mut FogParams) -> bool {
        if let Some(depth) = self.depth {
            params.depth = depth;
        }
        if let Some(start) = self.start_distance {
            params.start_distance = start;
        }
        if let Some(end) = self.end_distance {
            params.end_distance = end;
        }
        if let Some(hue) = self.close_hue {
            params.close_hue = hue;
        }
        if let Some(hue) = self.distant_hue {
            params.distant_hue = hue;
        }
        if let Some(brightness) = self.close_brightness {
            params.close_brightness = brightness;
        }
        if let Some(brightness) = self.distant_brightness {
            params.distant_brightness = brightness;
        }
        if let Some(start) = self.color_start_distance {
            params.color_start_distance = start;
        }
        if let Some(end) = self.color_end_distance {
            params.color_end_distance = end;
        }
        if let Some(height) = self.height {
            params.height = height;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut params = FogParams::default();
        let before = params;
        let height_changed = FogParamsPatch::default().apply(&mut params);
        assert!(!height_changed);
        assert_eq!(params, before);
    }

    #[test]
    fn test_patch_applies_only_set_fields() {
        let mut params = FogParams::default();
        let patch = FogParamsPatch {
            depth: Some(120.0),
            distant_hue: Some(300.0),
            ..FogParamsPatch::default()
        };
        let height_changed = patch.apply(&mut params);
        assert!(!height_changed);
        assert_eq!(params.depth, 120.0);
        assert_eq!(params.distant_hue, 300.0);
        assert_eq!(params.start_distance, FogParams::default().start_distance);
    }

    #[test]
    fn test_height_patch_reports_height_change() {
        let mut params = FogParams::default();
        assert!(FogParamsPatch::height(85.0).apply(&mut params));
        assert_eq!(params.height, 85.0);
    }
}
