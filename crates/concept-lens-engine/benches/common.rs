// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use concept_lens_engine::annotate::{Vocabulary, VocabularyEntry};

#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title ^t1\n\nParagraph about Machine Learning with some `inline code` and a [[link]].\n\n> Quoted text on Rust and async runtimes\n> continues here.\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_prose(paragraphs: usize) -> String {
    let mut content = String::new();
    for i in 0..paragraphs {
        content.push_str(&format!(
            "## Section {i}\n\nNotes on term {i} covering data science, graph databases and the Tokio runtime. \
             Gradient descent and machine learning show up again in paragraph {i}.\n\n"
        ));
    }
    content
}

#[allow(dead_code)]
pub fn generate_vocabulary(terms: usize) -> Vocabulary {
    let mut entries = vec![
        VocabularyEntry::new("Machine Learning", "concept:ml"),
        VocabularyEntry::new("data science", "concept:ds"),
        VocabularyEntry::new("Tokio", "concept:tokio"),
        VocabularyEntry::new("Rust", "concept:rust"),
    ];
    entries.extend((0..terms).map(|i| VocabularyEntry::new(format!("term {i}"), format!("concept:{i}"))));
    Vocabulary::new(entries)
}
