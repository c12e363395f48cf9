use sift_core::loader::{load_json_dir, load_stopwords, load_text_dir};
use sift_core::trec::{run_topics, write_run, RunLine};
use sift_core::{Analyzer, AnalyzerConfig, Article, Document, InvertedIndex, Query, StopwordSource, Topic, TrecDocument};
use std::fs;
use tempfile::tempdir;

fn lowercase_only() -> Analyzer {
    let config = AnalyzerConfig { lowercase: true, remove_accents: false, perform_stemming: false };
    Analyzer::new(config, None, &StopwordSource::none()).unwrap()
}

#[test]
fn text_dir_is_loaded_in_path_order() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.txt"), "second file").unwrap();
    fs::write(dir.path().join("a.txt"), "first file").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join("c.txt"), "ignored").unwrap();

    let docs = load_text_dir(dir.path()).unwrap();
    let texts: Vec<String> = docs.iter().map(|d| d.relevant_text().into_owned()).collect();
    assert_eq!(texts, vec!["first file", "second file"]);
}

#[test]
fn missing_dir_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(load_text_dir(dir.path().join("nope")).is_err());
}

#[test]
fn json_dir_accepts_objects_and_arrays_and_skips_bad_files() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("1.json"),
        r#"{"headline":"Nový most","opener":"Otevřen","text":"Most v Plzni","tags":["doprava"],"comments":[{"text":"super"}]}"#,
    )
    .unwrap();
    fs::write(dir.path().join("2.json"), r#"[{"headline":"A"},{"headline":"B","extra":1}]"#).unwrap();
    fs::write(dir.path().join("3.json"), "{ not json").unwrap();

    let docs = load_json_dir::<Article, _>(dir.path()).unwrap();
    assert_eq!(docs.len(), 3);
    assert_eq!(docs[0].relevant_text(), "Nový most\nOtevřen\nMost v Plzni\ndoprava \n");
    match &docs[2] {
        Document::Article(article) => assert_eq!(article.headline, "B"),
        other => panic!("unexpected document {other:?}"),
    }
}

#[test]
fn stopwords_file_is_one_word_per_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stop.txt");
    fs::write(&path, "the\n  a  \n\nIN\n").unwrap();

    let analyzer = Analyzer::new(
        AnalyzerConfig { lowercase: true, remove_accents: false, perform_stemming: false },
        None,
        &load_stopwords(&path).unwrap(),
    )
    .unwrap();
    assert_eq!(analyzer.stopwords().len(), 3);
    assert_eq!(analyzer.preprocess_text("The fish in a sea"), vec!["fish", "sea"]);
}

#[test]
fn trec_run_lists_ranked_documents_per_topic() {
    let docs: Vec<Document> = [("d1", "tropical fish"), ("d2", "fish in a sea"), ("d3", "mountain lake")]
        .into_iter()
        .map(|(id, text)| TrecDocument { id: id.into(), title: String::new(), text: text.into(), date: String::new() }.into())
        .collect();
    let mut index = InvertedIndex::new("trec", lowercase_only());
    index.index(docs).unwrap();

    let topics: Vec<Document> = vec![
        Topic { id: "401".into(), title: "sea".into(), ..Default::default() }.into(),
        Topic { id: "402".into(), title: "desert".into(), ..Default::default() }.into(),
    ];
    let lines = run_topics(&index, &topics, 10, "run1").unwrap();

    assert_eq!(lines[0].topic_id, "401");
    assert_eq!(lines[0].doc_id, "d2");
    assert_eq!(lines[0].rank, 0);
    assert!(lines[0].score > 0.0);

    let last = lines.last().unwrap();
    assert_eq!(last.to_string(), "402 Q0 abc 99 0 run1");

    let mut out = Vec::new();
    write_run(&mut out, &lines).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), lines.len());
    assert!(text.starts_with("401 Q0 d2 0 "));
}

#[test]
fn run_line_format() {
    let line = RunLine { topic_id: "7".into(), doc_id: "x".into(), rank: 2, score: 0.5, run_label: "r".into() };
    assert_eq!(line.to_string(), "7 Q0 x 2 0.5 r");
}

#[test]
fn loaded_text_documents_are_searchable() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("0.txt"), "tropical fish").unwrap();
    fs::write(dir.path().join("1.txt"), "fish live in a sea").unwrap();

    let mut index = InvertedIndex::new("disk", lowercase_only());
    index.index(load_text_dir(dir.path()).unwrap()).unwrap();
    let hits = index.boolean_search(&Query::all("sea")).unwrap();
    assert_eq!(hits.documents.iter().map(|h| h.id).collect::<Vec<_>>(), vec![1]);
}
