//! Plain-text listing of an annotator's decorations.

use super::annotator::Annotator;
use super::pass::PassName;

/// One section per pass with each range, its status, subject and the text it
/// covers in `source`.
pub fn render_report(source: &str, annotator: &Annotator) -> String {
    let mut out = String::new();
    for pass in PassName::ALL {
        if !annotator.is_enabled(pass) {
            out.push_str(&format!("{pass}: disabled\n"));
            continue;
        }
        let set = annotator.decorations(pass);
        out.push_str(&format!("{pass}: {}\n", set.len()));
        for m in set {
            let covered = source.get(m.range.clone()).unwrap_or("");
            out.push_str(&format!(
                "  {}..{} {} {} {:?}\n",
                m.range.start, m.range.end, m.status, m.subject, covered
            ));
        }
    }
    out
}
