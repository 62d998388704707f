//! Data models for generated animations (palette, frames, cadence)

mod animation;
mod palette;

pub use animation::{AnimationData, Frame, RawAnimation, UnresolvedCell, ValidationError, GRID_SIZE};
pub use palette::ResolvedPalette;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_animation_roundtrip() {
        let json = r##"{"palette":["#000000","#FFFFFF"],"frames":[[[0,1],[1,0]]],"cadenceMs":250}"##;
        let anim = AnimationData::from_json(json).unwrap();
        let saved = anim.to_json_pretty().unwrap();
        let reloaded = AnimationData::from_json(&saved).unwrap();
        assert_eq!(anim, reloaded);
        assert!(saved.contains("\"cadenceMs\": 250"));
    }
}
