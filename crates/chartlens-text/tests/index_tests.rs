use chartlens_core::traits::DocumentIndex;
use chartlens_core::types::Document;
use chartlens_text::{tokenize, LexicalIndex, MIN_SIMILARITY};

fn doc(id: &str, content: &str) -> Document {
    Document::analysis(id, content)
}

fn ids(docs: &[Document]) -> Vec<&str> {
    docs.iter().map(|d| d.id.as_str()).collect()
}

fn finance_corpus() -> LexicalIndex {
    let mut index = LexicalIndex::new();
    index.add_document(doc("1", "revenue grew year over year driven by pricing"));
    index.add_document(doc("2", "maintenance downtime caused throughput loss this quarter"));
    index.add_document(doc("3", "customer churn rose after the onboarding change"));
    index
}

#[test]
fn revenue_query_finds_the_revenue_analysis() {
    let index = finance_corpus();
    let hits = index.search_scored("revenue pricing trend", 2);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].document.id, "1");
    // q = (revenue, pricing) at tf 1/3; d1 has 7 tokens with "year" twice.
    let expected = (2.0 / 21.0) / (2f64.sqrt() / 7.0);
    assert!((hits[0].score - expected).abs() < 1e-12, "score {}", hits[0].score);
}

#[test]
fn two_document_corpus_weighs_unique_terms_at_zero() {
    // With N = 2 a term found in one document gets ln(2 / 2) = 0, so every
    // vector is all zeros and nothing clears the floor.
    let mut index = LexicalIndex::new();
    index.add_document(doc("1", "revenue grew year over year driven by pricing"));
    index.add_document(doc("2", "maintenance downtime caused throughput loss this quarter"));

    assert!(index.all_documents().iter().all(|d| d.vector.iter().all(|w| *w == 0.0)));
    assert!(index.search_similar("revenue pricing trend", 2).is_empty());
}

#[test]
fn weights_follow_tf_times_idf() {
    let index = finance_corpus();
    let slot = index.vocabulary().iter().position(|t| t == "year").expect("year in vocabulary");
    let d1 = &index.all_documents()[0];
    let expected = (2.0 / 7.0) * (3.0f64 / 2.0).ln();
    assert!((d1.vector[slot] - expected).abs() < 1e-12);
}

#[test]
fn search_is_deterministic() {
    let index = finance_corpus();
    let first = index.search_similar("customer onboarding churn", 3);
    for _ in 0..5 {
        assert_eq!(index.search_similar("customer onboarding churn", 3), first);
    }
}

#[test]
fn vocabulary_grows_monotonically() {
    let mut index = LexicalIndex::new();
    let mut previous = index.vocabulary_len();
    let texts = [
        "revenue grew strongly",
        "revenue grew",
        "churn increased sharply",
        "",
        "Revenue, GREW!",
        "a b c",
    ];
    for (i, text) in texts.iter().enumerate() {
        let unseen = tokenize(text).iter().filter(|t| !index.vocabulary().contains(t)).count();
        index.add_document(doc(&i.to_string(), text));
        let now = index.vocabulary_len();
        assert!(now >= previous);
        assert_eq!(now > previous, unseen > 0, "strict growth iff new tokens for {text:?}");
        previous = now;
    }
    assert_eq!(previous, 6);
}

#[test]
fn every_vector_matches_vocabulary_length_after_insertion() {
    let mut index = LexicalIndex::new();
    for (i, text) in ["alpha beta gamma", "delta epsilon", "alpha zeta eta theta", ""].iter().enumerate() {
        index.add_document(doc(&i.to_string(), text));
        let v = index.vocabulary_len();
        assert!(index.all_documents().iter().all(|d| d.vector.len() == v));
    }
}

#[test]
fn caller_supplied_vector_is_overwritten() {
    let mut index = LexicalIndex::new();
    let mut d = doc("1", "revenue pricing");
    d.vector = vec![9.0; 42];
    index.add_document(d);
    assert_eq!(index.all_documents()[0].vector.len(), 2);
}

#[test]
fn document_matches_its_own_content_first() {
    let index = finance_corpus();
    for d in index.all_documents() {
        let hits = index.search_scored(&d.content, 3);
        assert_eq!(hits[0].document.id, d.id);
        assert!((hits[0].score - 1.0).abs() < 1e-12);
    }
}

#[test]
fn single_document_corpus_still_matches_itself() {
    // N = 1 makes every idf negative; the signs cancel in the cosine.
    let mut index = LexicalIndex::new();
    index.add_document(doc("only", "throughput dipped during maintenance"));
    assert!(index.all_documents()[0].vector.iter().all(|w| *w < 0.0));
    assert_eq!(ids(&index.search_similar("maintenance throughput", 5)), vec!["only"]);
}

#[test]
fn unrelated_query_returns_nothing() {
    let index = finance_corpus();
    assert!(index.search_similar("zebra giraffe savanna", 5).is_empty());
    assert!(index.search_similar("", 5).is_empty());
    assert!(index.search_similar("?! ..", 5).is_empty());
}

#[test]
fn empty_corpus_returns_nothing() {
    let index = LexicalIndex::new();
    assert!(index.search_similar("revenue", 3).is_empty());
    assert!(index.all_documents().is_empty());
}

#[test]
fn top_k_bounds_the_result() {
    let mut index = LexicalIndex::new();
    index.add_document(doc("1", "revenue growth strong"));
    index.add_document(doc("2", "revenue decline weak"));
    index.add_document(doc("3", "maintenance downtime"));
    index.add_document(doc("4", "customer churn"));

    assert!(index.search_similar("revenue", 0).is_empty());
    assert_eq!(ids(&index.search_similar("revenue", 10)), vec!["1", "2"]);
    // Equal scores keep insertion order.
    assert_eq!(ids(&index.search_similar("revenue", 1)), vec!["1"]);
}

#[test]
fn results_are_sorted_and_above_floor() {
    let mut index = LexicalIndex::new();
    index.add_document(doc("a", "pricing pricing pricing revenue"));
    index.add_document(doc("b", "pricing revenue margin cost"));
    index.add_document(doc("c", "downtime maintenance outage"));
    index.add_document(doc("d", "churn onboarding retention"));

    let hits = index.search_scored("pricing", 4);
    assert!(!hits.is_empty());
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(hits.iter().all(|h| h.score > MIN_SIMILARITY));
    assert_eq!(hits[0].document.id, "a");
}

#[test]
fn duplicate_ids_are_separate_entries() {
    let mut index = finance_corpus();
    index.add_document(doc("1", "revenue grew year over year driven by pricing"));
    assert_eq!(index.len(), 4);
    assert_eq!(ids(&index.all_documents()), vec!["1", "2", "3", "1"]);
}

#[test]
fn snapshot_is_detached_from_index() {
    let index = finance_corpus();
    let mut snapshot = index.all_documents();
    snapshot.clear();
    assert_eq!(index.len(), 3);
}

#[test]
fn metadata_passes_through_search() {
    let mut index = finance_corpus();
    index.add_document(Document::chat("c9", "User: why did revenue jump\nAssistant: pricing").with_domain("finance"));
    let hits = index.search_similar("revenue jump", 1);
    assert_eq!(hits[0].id, "c9");
    assert_eq!(hits[0].metadata.domain.as_deref(), Some("finance"));
    assert_eq!(hits[0].metadata.chat_id.as_deref(), Some("c9"));
}

#[test]
fn clear_resets_to_a_fresh_index() {
    let mut index = finance_corpus();
    index.clear();
    assert!(index.is_empty());
    assert_eq!(index.vocabulary_len(), 0);
    index.clear();

    index.add_document(doc("n", "fresh start"));
    assert_eq!(index.vocabulary(), &["fresh".to_string(), "start".to_string()]);
    assert_eq!(index.all_documents()[0].vector.len(), 2);
}

#[test]
fn works_through_the_trait() {
    fn exercise(index: &mut dyn DocumentIndex) -> usize {
        index.add_document(doc("1", "revenue grew"));
        index.add_document(doc("2", "downtime rose"));
        index.add_document(doc("3", "churn fell"));
        let n = index.search_similar("revenue", 3).len();
        index.clear();
        assert!(index.all_documents().is_empty());
        n
    }
    assert_eq!(exercise(&mut LexicalIndex::new()), 1);
}
