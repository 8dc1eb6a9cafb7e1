#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceSig {
    Backticks,
    Tildes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

/// Fenced code block type. Fences are raw zones: nothing inside them is
/// parsed or matched against vocabulary.
pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";

    pub fn sig(remainder: &str) -> Option<FenceSig> {
        let t = remainder.trim_end_matches(['\r', '\n']);
        if t.starts_with(Self::BACKTICKS) {
            Some(FenceSig::Backticks)
        } else if t.starts_with(Self::TILDES) {
            Some(FenceSig::Tildes)
        } else {
            None
        }
    }

    pub fn kind(sig: FenceSig) -> FenceKind {
        match sig {
            FenceSig::Backticks => FenceKind::Backticks,
            FenceSig::Tildes => FenceKind::Tildes,
        }
    }

    /// The info string language of an opening fence line, if any.
    ///
    /// `opener` must already have any block-id marker stripped.
    pub fn lang(opener: &str) -> Option<String> {
        let t = opener.trim_end_matches(['\r', '\n']);
        let fence_char = t.chars().next()?;
        let info = t.trim_start_matches(fence_char).trim();
        info.split_whitespace().next().map(str::to_string)
    }

    pub fn closes(kind: FenceKind, sig: Option<FenceSig>) -> bool {
        matches!(
            (kind, sig),
            (FenceKind::Backticks, Some(FenceSig::Backticks))
                | (FenceKind::Tildes, Some(FenceSig::Tildes))
        )
    }
}
