//! Basic usage example for the dblp-cite library.
//!
//! Searches DBLP, then fetches the first hit's BibTeX and prints it with a
//! rewritten citation key.

use dblp_cite::models::{CitationKeyConfig, SearchQuery};
use dblp_cite::sources::{DblpSource, Source};
use dblp_cite::utils::{prepare_bibtex, CitationOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dblp = DblpSource::new()?;

    let query = SearchQuery::new("differential testing compilers").max_results(5);
    let response = dblp.search(&query).await?;

    println!(
        "{} matches, showing {} ({} preprints hidden)\n",
        response.total_hits,
        response.publications.len(),
        response.excluded_count
    );

    for (i, publication) in response.publications.iter().enumerate() {
        println!("{}. {} ({})", i + 1, publication.title, publication.year);
        println!("   Authors: {}", publication.author_line());
        println!("   Venue:   {}", publication.venue);
        if publication.has_doi() {
            println!("   DOI:     {}", publication.doi);
        }
    }

    let Some(first) = response.publications.first() else {
        return Ok(());
    };

    let options = CitationOptions {
        key: CitationKeyConfig::from_tokens(&["author", "dash", "year", "dash", "title"])
            .author_capitalize(true),
        ..Default::default()
    };

    let raw = dblp.fetch_bibtex(&first.bibtex_link).await?;
    println!("\n{}", prepare_bibtex(&raw, &options)?);

    Ok(())
}
