//! Search command implementation

use anyhow::Result;
use serde::Serialize;

/// Search hit output
#[derive(Serialize)]
struct SearchHit {
    reference: String,
    text: String,
}

/// Search a corpus for matching verses
pub fn search(input: &str, query: &str, limit: usize, json: bool) -> Result<()> {
    let corpus = super::load_corpus(input)?;

    let hits: Vec<SearchHit> = corpus
        .search(query, limit)
        .into_iter()
        .map(|v| SearchHit {
            reference: format!("{} {}:{}", v.book, v.chapter, v.verse),
            text: v.text.clone(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
    } else if hits.is_empty() {
        println!("No matches for '{}'", query);
    } else {
        for hit in &hits {
            println!("{}\t{}", hit.reference, hit.text);
        }
        println!("{} result(s)", hits.len());
    }

    Ok(())
}
