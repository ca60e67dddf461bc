// SPDX-License-Identifier: MIT OR Apache-2.0
//! Clip and scene object naming shared with the authored assets.

use express_track::SectionId;

/// Armature object carrying both animation channels.
pub const ARMATURE_OBJECT: &str = "loco.armature";

/// Speaker attached to the wheels.
pub const WHEEL_SPEAKER_OBJECT: &str = "loco.wheel.speaker";

/// Horn speaker.
pub const HORN_SPEAKER_OBJECT: &str = "loco.horn.speaker";

/// Looping clip for the rolling wheels.
pub const WHEEL_CLIP: &str = "loco.wheel.action";

/// Prefix of per-section path clips; the decimal section index follows.
pub const SECTION_CLIP_PREFIX: &str = "path.section.";

/// Name of the clip backing `section`.
pub fn section_clip(section: SectionId) -> String {
    format!("{SECTION_CLIP_PREFIX}{section}")
}

/// Extract the section index from a clip name.
///
/// Only the leading decimal digits after the prefix count, so authoring
/// suffixes like `"path.section.2.001"` still resolve to section 2. A
/// name without the prefix, or without digits, is not a section clip.
pub fn parse_section_clip(name: &str) -> Option<SectionId> {
    let rest = name.strip_prefix(SECTION_CLIP_PREFIX)?;
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    rest[..end].parse().ok().map(SectionId)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_clip_name() {
        assert_eq!(section_clip(SectionId(2)), "path.section.2");
        assert_eq!(section_clip(SectionId(12)), "path.section.12");
    }

    #[test]
    fn test_parse_section_clip() {
        assert_eq!(parse_section_clip("path.section.0"), Some(SectionId(0)));
        assert_eq!(parse_section_clip("path.section.12"), Some(SectionId(12)));
        assert_eq!(parse_section_clip("path.section.2.001"), Some(SectionId(2)));
    }

    #[test]
    fn test_parse_rejects_non_section_clips() {
        assert_eq!(parse_section_clip("unrelated.clip.name"), None);
        assert_eq!(parse_section_clip("path.section."), None);
        assert_eq!(parse_section_clip("path.section.x1"), None);
        assert_eq!(parse_section_clip("loco.wheel.action"), None);
    }
}
