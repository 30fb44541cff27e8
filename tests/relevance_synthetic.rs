//! Synthetic relevance suite: programmatically built articles from a seeded RNG.
//! Checks range, exclusion, threshold + ordering, determinism, and that
//! scoring on worker threads matches sequential scoring.

use chrono::{DateTime, Duration, TimeZone, Utc};
use lead_intel::{Article, ScoringEngine};
use rand::{rngs::StdRng, seq::IndexedRandom, Rng, SeedableRng};
use std::sync::Arc;

const SEED: u64 = 0x1EAD_5C0E;

const WORDS: &[&str] = &[
    "boiler", "furnace oil", "diesel", "genset", "kiln", "tender", "expansion", "bitumen",
    "highway", "vessel", "port", "procurement", "plans to", "company", "quarter", "india",
    "plant", "steel", "cement", "new facility", "contract", "marine fuel", "solvent",
];
const EXCLUSIONS: &[&str] = &["stock price", "cricket", "quarterly results", "bollywood"];

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap()
}

fn random_article(rng: &mut StdRng) -> Article {
    let n = rng.random_range(0..9);
    let title = (0..n)
        .filter_map(|_| WORDS.choose(rng).copied())
        .collect::<Vec<_>>()
        .join(" ");
    let mut a = Article::new(title, "");
    match rng.random_range(0..4) {
        0 => {}
        1 => a = a.with_pub_date("garbage"),
        _ => {
            let hours = rng.random_range(-48..24 * 14);
            a = a.with_pub_date((now() - Duration::hours(hours)).to_rfc3339());
        }
    }
    a
}

fn corpus(len: usize) -> Vec<Article> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..len).map(|_| random_article(&mut rng)).collect()
}

#[test]
fn scores_stay_in_range() {
    let eng = ScoringEngine::builtin();
    for a in corpus(500) {
        let s = eng.calculate_relevance_score(&a, now());
        assert!(s <= 100, "score {s} out of range for {:?}", a.title);
    }
}

#[test]
fn any_exclusion_scores_zero() {
    let eng = ScoringEngine::builtin();
    let mut rng = StdRng::seed_from_u64(SEED ^ 1);
    for mut a in corpus(200) {
        let ex = EXCLUSIONS.choose(&mut rng).unwrap();
        a.description = format!("{} {}", a.description, ex.to_uppercase());
        assert_eq!(eng.calculate_relevance_score(&a, now()), 0, "{:?}", a);
    }
}

#[test]
fn filter_respects_threshold_and_order() {
    let eng = ScoringEngine::builtin();
    let out = eng.filter_articles(corpus(300), now());
    assert!(!out.is_empty());
    assert!(out.iter().all(|s| s.relevance_score >= 40));
    assert!(out
        .windows(2)
        .all(|w| w[0].relevance_score >= w[1].relevance_score));
    // reported score matches a fresh evaluation
    for s in &out {
        assert_eq!(eng.calculate_relevance_score(&s.article, now()), s.relevance_score);
    }
}

#[test]
fn scoring_is_deterministic() {
    let eng = ScoringEngine::builtin();
    let a = eng.filter_articles(corpus(150), now());
    let b = eng.filter_articles(corpus(150), now());
    assert_eq!(a, b);
}

#[test]
fn worker_threads_match_sequential() {
    let eng = Arc::new(ScoringEngine::builtin());
    let articles = corpus(400);
    let sequential: Vec<u8> = articles
        .iter()
        .map(|a| eng.calculate_relevance_score(a, now()))
        .collect();

    let chunks: Vec<Vec<Article>> = articles.chunks(50).map(<[Article]>::to_vec).collect();
    let handles: Vec<_> = chunks
        .into_iter()
        .map(|chunk| {
            let eng = Arc::clone(&eng);
            std::thread::spawn(move || {
                chunk
                    .iter()
                    .map(|a| eng.calculate_relevance_score(a, now()))
                    .collect::<Vec<u8>>()
            })
        })
        .collect();
    let parallel: Vec<u8> = handles
        .into_iter()
        .flat_map(|h| h.join().expect("worker panicked"))
        .collect();

    assert_eq!(sequential, parallel);
}
