use super::{
    classify::LineClass,
    kinds::{CodeFence, FenceKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOpen {
    FencedCode { kind: FenceKind },
    Heading { level: u8, content_offset: usize },
}

pub fn try_open_leaf(c: &LineClass) -> Option<BlockOpen> {
    // Precedence: fence beats everything else.
    if let Some(sig) = c.fence_sig {
        return Some(BlockOpen::FencedCode {
            kind: CodeFence::kind(sig),
        });
    }
    if let Some((level, content_offset)) = c.heading {
        return Some(BlockOpen::Heading {
            level,
            content_offset,
        });
    }
    None
}
