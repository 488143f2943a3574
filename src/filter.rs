//! Vignette filter parameters and shader source.

use serde::{Deserialize, Serialize};

/// Fragment shader applying the vignette while sampling the camera texture
/// through the crop window.
///
/// `crop_offset`/`crop_scale` remap the quad's UVs into the cropped region
/// of the frame; the vignette distance is evaluated in source pixel space so
/// the darkening stays anchored to the frame, not to the window.
pub const FRAGMENT_SHADER: &str = r#"
struct Uniforms {
    crop_offset: vec2<f32>,
    crop_scale: vec2<f32>,
    frame_size: vec2<f32>,
    vignette_center: vec2<f32>,
    vignette_radius: f32,
    vignette_intensity: f32,
    _pad: vec2<f32>,
}

@group(0) @binding(0) var t_frame: texture_2d<f32>;
@group(0) @binding(1) var s_frame: sampler;
@group(0) @binding(2) var<uniform> u: Uniforms;

@fragment
fn fs_main(@location(0) tex_coords: vec2<f32>) -> @location(0) vec4<f32> {
    let uv = u.crop_offset + tex_coords * u.crop_scale;
    let color = textureSample(t_frame, s_frame, uv);
    let pos = uv * u.frame_size;
    let dist = distance(pos, u.vignette_center);
    let falloff = smoothstep(u.vignette_radius * 0.5, u.vignette_radius * 1.5, dist);
    let gain = 1.0 - u.vignette_intensity * falloff;
    return vec4<f32>(color.rgb * gain, color.a);
}
"#;

/// Vignette parameters. `center` and `radius` are in source pixel
/// coordinates and default to the frame center and half the smaller frame
/// dimension when unset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VignetteParams {
    /// Center of the vignette in frame pixels; `None` means frame center.
    pub center: Option<[f32; 2]>,
    /// Radius in pixels at which darkening reaches full strength;
    /// `None` means half the smaller frame dimension.
    pub radius: Option<f32>,
    /// Darkening strength at the edges, 0.0 (off) to 1.0 (black).
    pub intensity: f32,
}

impl Default for VignetteParams {
    fn default() -> Self {
        Self {
            center: None,
            radius: None,
            intensity: 0.8,
        }
    }
}

/// Vignette parameters with defaults filled in for a concrete frame size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedVignette {
    pub center: [f32; 2],
    pub radius: f32,
    pub intensity: f32,
}

impl VignetteParams {
    /// Resolves the parameters against a frame extent.
    pub fn resolve(&self, frame_width: f32, frame_height: f32) -> ResolvedVignette {
        ResolvedVignette {
            center: self
                .center
                .unwrap_or([frame_width / 2.0, frame_height / 2.0]),
            radius: self.radius.unwrap_or(frame_width.min(frame_height) / 2.0),
            intensity: self.intensity.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use naga::valid::{Capabilities, ValidationFlags, Validator};

    #[test]
    fn defaults_resolve_to_frame_center_and_half_min_dimension() {
        let resolved = VignetteParams::default().resolve(1920.0, 1080.0);
        assert_eq!(resolved.center, [960.0, 540.0]);
        assert_eq!(resolved.radius, 540.0);
        assert_eq!(resolved.intensity, 0.8);
    }

    #[test]
    fn explicit_parameters_win_and_intensity_is_clamped() {
        let params = VignetteParams {
            center: Some([100.0, 200.0]),
            radius: Some(50.0),
            intensity: 3.0,
        };
        let resolved = params.resolve(640.0, 480.0);
        assert_eq!(resolved.center, [100.0, 200.0]);
        assert_eq!(resolved.radius, 50.0);
        assert_eq!(resolved.intensity, 1.0);
    }

    #[test]
    fn fragment_shader_is_valid_wgsl() {
        let module = naga::front::wgsl::parse_str(FRAGMENT_SHADER)
            .expect("vignette shader failed to parse");
        Validator::new(ValidationFlags::all(), Capabilities::all())
            .validate(&module)
            .expect("vignette shader failed validation");
    }
}
