use anyhow::{Context, Result, bail};
use concept_lens_config::Config;
use concept_lens_engine::{
    EditSession, PassInputs, SubjectRef,
    annotate::render_report,
    io::{self, Vocabularies},
    sync::{
        ConceptProvider, DocumentId, InMemoryMentionStore, StaticConceptProvider, fetch_anchors,
    },
};
use relative_path::RelativePath;
use std::{env, process};

const USAGE: &str = "\
Usage:
  concept-lens-cli annotate <file> [--write]
  concept-lens-cli link <file> <start> <end> <subject>
  concept-lens-cli search <query>

<file> is relative to documents_path in the config file.";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let config = Config::load_or_default().with_context(|| {
        format!(
            "Failed to load config file {}",
            Config::config_path().display()
        )
    })?;

    match args {
        [cmd, file] if cmd == "annotate" => annotate(&config, file, false),
        [cmd, file, flag] if cmd == "annotate" && flag == "--write" => annotate(&config, file, true),
        [cmd, file, start, end, subject] if cmd == "link" => {
            let start = start.parse().context("start must be a byte offset")?;
            let end = end.parse().context("end must be a byte offset")?;
            link(&config, file, start, end, subject)
        }
        [cmd, query] if cmd == "search" => search(&config, query),
        _ => {
            eprintln!("{USAGE}");
            process::exit(2);
        }
    }
}

fn load_vocabularies(config: &Config) -> Result<Vocabularies> {
    match &config.vocabulary_path {
        Some(path) => io::load_vocabulary(path)
            .with_context(|| format!("Failed to load vocabulary {}", path.display())),
        None => {
            log::info!("no vocabulary_path configured, matching no terms");
            Ok(Vocabularies::default())
        }
    }
}

struct Opened {
    session: EditSession,
    doc_id: DocumentId,
    store: InMemoryMentionStore,
}

fn open_session(config: &Config, file: &str) -> Result<Opened> {
    let document = io::read_document(RelativePath::new(file), &config.documents_path)?;
    let vocabularies = load_vocabularies(config)?;
    let store = io::load_anchors(&config.anchors_path)?;
    let doc_id = DocumentId::new(file);

    let inputs = PassInputs::new(
        fetch_anchors(&store, &doc_id),
        vocabularies.known,
        vocabularies.heuristic,
    );
    let session = EditSession::new(document, config.annotation.clone(), inputs);
    Ok(Opened {
        session,
        doc_id,
        store,
    })
}

fn annotate(config: &Config, file: &str, write: bool) -> Result<()> {
    let mut session = open_session(config, file)?.session;

    if write && session.assign_ids().is_some() {
        io::write_document(RelativePath::new(file), &config.documents_path, session.document())?;
        log::info!("wrote block ids to {file}");
    }

    print!(
        "{}",
        render_report(&session.document().text(), session.annotator())
    );
    Ok(())
}

fn link(config: &Config, file: &str, start: usize, end: usize, subject: &str) -> Result<()> {
    let Opened {
        mut session,
        doc_id,
        mut store,
    } = open_session(config, file)?;
    if end > session.document().len() {
        bail!("selection {start}..{end} is past the end of {file}");
    }

    session.select(start..end);
    if session.assign_ids().is_some() {
        io::write_document(RelativePath::new(file), &config.documents_path, session.document())?;
        log::info!("wrote block ids to {file}");
    }

    let anchor = session.link_to(&mut store, &doc_id, SubjectRef::new(subject))?;
    io::save_anchors(&config.anchors_path, &store)?;

    println!(
        "{} {:?} -> {}",
        anchor.anchor_id, anchor.surface_text, anchor.subject
    );
    Ok(())
}

fn search(config: &Config, query: &str) -> Result<()> {
    let provider = StaticConceptProvider::new(load_vocabularies(config)?.known.entries().to_vec());
    for entry in provider.search(query)? {
        println!("{}\t{}", entry.name, entry.subject);
    }
    Ok(())
}
