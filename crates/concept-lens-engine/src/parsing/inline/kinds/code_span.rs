/// Code span inline type with owned delimiter constant.
///
/// A span opens with a run of N backticks and closes at the next run of
/// exactly N backticks.
pub struct CodeSpan;

impl CodeSpan {
    pub const TICK: u8 = b'`';
}
