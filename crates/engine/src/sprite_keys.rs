use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteKeyError {
    #[error("sheet key must not be empty")]
    Empty,
    #[error("sheet key segment {index} is empty")]
    EmptySegment { index: usize },
    #[error("sheet key must not contain '..'")]
    ParentTraversal,
    #[error("sheet key contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

/// Splits a sheet key such as `hud/control_panel` into its path segments.
///
/// Keys are lowercase ASCII with `_`, `-` and digits, separated by `/`.
pub(crate) fn sheet_key_segments(key: &str) -> Result<Vec<&str>, SpriteKeyError> {
    if key.is_empty() {
        return Err(SpriteKeyError::Empty);
    }
    let mut segments = Vec::new();
    for (index, segment) in key.split('/').enumerate() {
        if segment.is_empty() {
            return Err(SpriteKeyError::EmptySegment { index });
        }
        if segment == ".." || segment.contains("..") {
            return Err(SpriteKeyError::ParentTraversal);
        }
        if let Some(character) = segment
            .chars()
            .find(|ch| !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '-')))
        {
            return Err(SpriteKeyError::InvalidCharacter { character });
        }
        segments.push(segment);
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_valid_keys() {
        assert_eq!(
            sheet_key_segments("hud/control_panel").expect("segments"),
            vec!["hud", "control_panel"]
        );
        assert_eq!(sheet_key_segments("globe-2").expect("segments"), vec!["globe-2"]);
    }

    #[test]
    fn rejects_invalid_keys() {
        assert_eq!(sheet_key_segments(""), Err(SpriteKeyError::Empty));
        assert_eq!(
            sheet_key_segments("/hud"),
            Err(SpriteKeyError::EmptySegment { index: 0 })
        );
        assert_eq!(
            sheet_key_segments("hud//x"),
            Err(SpriteKeyError::EmptySegment { index: 1 })
        );
        assert_eq!(
            sheet_key_segments("hud/../x"),
            Err(SpriteKeyError::ParentTraversal)
        );
        for key in [r"hud\x", "Hud", "hud.png"] {
            assert!(
                matches!(
                    sheet_key_segments(key),
                    Err(SpriteKeyError::InvalidCharacter { .. })
                ),
                "key={key}"
            );
        }
    }
}
