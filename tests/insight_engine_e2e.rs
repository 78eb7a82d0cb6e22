use std::collections::HashSet;

use vitalsim::{
    Category, Certainty, CertaintyBand, Insight, InsightEngine, InsightFilter, InsightId,
    PersonaId, ViewState,
};

fn insight(
    id: &str,
    persona: &str,
    category: Category,
    certainty: f64,
    sources: &[&str],
    holdout: bool,
) -> Insight {
    Insight::builder()
        .id(id)
        .persona_id(persona)
        .category(category)
        .certainty(Certainty::new(certainty).unwrap())
        .personal_weight(0.55)
        .data_sources(sources.iter().copied())
        .holdout_preview(holdout)
        .build()
        .unwrap()
}

fn corpus() -> Vec<Insight> {
    vec![
        insight("i1", "sarah", Category::Sleep, 0.92, &["oura"], false),
        insight("i2", "sarah", Category::Metabolic, 0.81, &["cgm"], false),
        insight("i3", "sarah", Category::Sleep, 0.64, &["oura", "manual"], true),
        insight("i4", "marcus", Category::Cardio, 0.88, &["whoop"], false),
        insight("i5", "sarah", Category::Stress, 0.81, &["whoop"], false),
        insight("i6", "sarah", Category::Mood, 0.55, &["manual"], true),
        insight("i7", "marcus", Category::Sleep, 0.71, &["oura"], true),
    ]
}

fn ids(insights: &[&Insight]) -> Vec<String> {
    insights.iter().map(|i| i.id.to_string()).collect()
}

#[test]
fn filter_is_the_intersection_of_single_criteria() {
    let engine = InsightEngine::standard();
    let insights = corpus();

    let singles = vec![
        InsightFilter::new().persona("sarah"),
        InsightFilter::new().categories([Category::Sleep, Category::Stress]),
        InsightFilter::new().min_certainty(0.6),
        InsightFilter::new().max_certainty(0.9),
        InsightFilter::new().holdout_preview(false),
        InsightFilter::new().data_sources(["oura", "whoop"]),
    ];

    // Every subset of the six criteria.
    for mask in 0u32..(1 << singles.len()) {
        let mut combined = InsightFilter::new();
        let mut expected: HashSet<InsightId> = insights.iter().map(|i| i.id.clone()).collect();

        for (bit, single) in singles.iter().enumerate() {
            if mask & (1 << bit) == 0 {
                continue;
            }
            if single.persona_id.is_some() {
                combined.persona_id = single.persona_id.clone();
            }
            if !single.categories.is_empty() {
                combined.categories = single.categories.clone();
            }
            if single.min_certainty.is_some() {
                combined.min_certainty = single.min_certainty;
            }
            if single.max_certainty.is_some() {
                combined.max_certainty = single.max_certainty;
            }
            if single.has_holdout_preview.is_some() {
                combined.has_holdout_preview = single.has_holdout_preview;
            }
            if !single.data_sources.is_empty() {
                combined.data_sources = single.data_sources.clone();
            }

            let alone: HashSet<InsightId> = engine
                .filter(&insights, single)
                .into_iter()
                .map(|i| i.id.clone())
                .collect();
            expected.retain(|id| alone.contains(id));
        }

        let got = engine.filter(&insights, &combined);
        let got_ids: HashSet<InsightId> = got.iter().map(|i| i.id.clone()).collect();
        assert_eq!(got_ids, expected, "mask {mask:#b}");

        // Input order is preserved.
        let positions: Vec<usize> = got
            .iter()
            .map(|g| insights.iter().position(|i| i.id == g.id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn filter_does_not_mutate_input() {
    let engine = InsightEngine::standard();
    let insights = corpus();
    let before = insights.clone();
    let _ = engine.filter(&insights, &InsightFilter::new().persona("sarah").min_certainty(0.9));
    assert_eq!(insights, before);
}

#[test]
fn filter_on_empty_collection_is_empty() {
    let engine = InsightEngine::standard();
    assert!(engine.filter(&[], &InsightFilter::new().persona("sarah")).is_empty());
}

#[test]
fn ranked_for_persona_sorts_descending_and_keeps_tie_order() {
    let engine = InsightEngine::standard();
    let insights = corpus();
    let ranked = engine
        .ranked_for_persona(&insights, &PersonaId::new("sarah"), 0.6)
        .unwrap();

    let got: Vec<&str> = ranked.iter().map(|r| r.insight.id.as_str()).collect();
    // i2 and i5 tie at 0.81 and keep their input order.
    assert_eq!(got, vec!["i1", "i2", "i5", "i3"]);
    assert_eq!(ranked[0].display.certainty_band, CertaintyBand::VeryHigh);
    assert_eq!(ranked[3].display.certainty_label, "Developing");
}

#[test]
fn ranked_threshold_is_inclusive() {
    let engine = InsightEngine::standard();
    let insights = corpus();
    let ranked = engine
        .ranked_for_persona(&insights, &PersonaId::new("sarah"), 0.81)
        .unwrap();
    assert_eq!(ranked.len(), 3);
}

#[test]
fn for_view_uses_slider_over_100() {
    let engine = InsightEngine::standard();
    let insights = corpus();
    let view = ViewState::new("marcus", 80).unwrap();
    let ranked = engine.for_view(&insights, &view).unwrap();
    let got: Vec<&str> = ranked.iter().map(|r| r.insight.id.as_str()).collect();
    assert_eq!(got, vec!["i4"]);
}

#[test]
fn certainty_labels_at_band_boundaries() {
    let engine = InsightEngine::standard();
    let cases = [
        (0.95, "Very High"),
        (0.9, "Very High"),
        (0.89, "High"),
        (0.8, "High"),
        (0.7, "Moderate"),
        (0.6, "Developing"),
        (0.59, "Early"),
        (0.0, "Early"),
    ];
    for (c, label) in cases {
        let i = insight("x", "sarah", Category::Sleep, c, &[], false);
        assert_eq!(engine.enhance(&i).unwrap().display.certainty_label, label, "certainty {c}");
    }
}

#[test]
fn enhancement_is_idempotent_for_every_insight() {
    let engine = InsightEngine::standard();
    for i in corpus() {
        let once = engine.enhance(&i).unwrap();
        let twice = engine.enhance(&once.insight).unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn evidence_label_splits_to_100() {
    let engine = InsightEngine::standard();
    let i = Insight::builder()
        .id("x")
        .persona_id("sarah")
        .category(Category::Recovery)
        .certainty(Certainty::new(0.5).unwrap())
        .personal_weight(0.337)
        .build()
        .unwrap();
    let out = engine.enhance(&i).unwrap();
    assert_eq!(out.display.evidence_label, "34% your data, 66% population");
    assert!(!out.display.is_personalized);
}

#[test]
fn related_matches_category_or_source_within_persona() {
    let engine = InsightEngine::standard();
    let insights = corpus();
    let target = &insights[0]; // sarah, sleep, oura

    let related = engine.related(target, &insights, 3);
    // i3 shares category and source; i5/i6 share neither; i7 is another persona.
    assert_eq!(ids(&related), vec!["i3"]);

    let target = &insights[4]; // sarah, stress, whoop
    assert!(engine.related(target, &insights, 3).is_empty());
}

#[test]
fn related_truncates_without_reranking() {
    let engine = InsightEngine::standard();
    let insights = vec![
        insight("t", "sarah", Category::Sleep, 0.5, &["oura"], false),
        insight("r1", "sarah", Category::Sleep, 0.6, &[], false),
        insight("r2", "sarah", Category::Mood, 0.99, &["oura"], false),
        insight("r3", "sarah", Category::Sleep, 0.7, &[], false),
        insight("r4", "sarah", Category::Sleep, 0.8, &[], false),
    ];
    let related = engine.related_default(&insights[0], &insights);
    assert_eq!(ids(&related), vec!["r1", "r2", "r3"]);
    assert_eq!(ids(&engine.related(&insights[0], &insights, 1)), vec!["r1"]);
}

#[test]
fn average_and_counts_per_persona() {
    let engine = InsightEngine::standard();
    let insights = corpus();
    let marcus = PersonaId::new("marcus");

    let avg = engine.average_certainty(&insights, &marcus);
    assert!((avg - (0.88 + 0.71) / 2.0).abs() < 1e-12);

    let counts = engine.counts_by_certainty_band(&insights, &marcus);
    assert_eq!(counts.total, 2);
    assert_eq!(counts.at("0.70"), 2);
    assert_eq!(counts.at("0.75"), 1);
    assert_eq!(counts.at("0.90"), 0);

    let empty = engine.counts_by_certainty_band(&[], &marcus);
    assert_eq!(empty.total, 0);
    assert!(engine.average_certainty(&[], &marcus).abs() < f64::EPSILON);
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = InsightEngine::standard();
    let insights = corpus();
    let sarah = PersonaId::new("sarah");

    let results: Vec<usize> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(|| {
                    engine
                        .ranked_for_persona(&insights, &sarah, 0.6)
                        .unwrap()
                        .len()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(results.iter().all(|&n| n == 4));
}
