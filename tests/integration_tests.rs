// Integration tests for Legacy Match

use actix_web::{test, web, App};
use legacy_match::config::MatchingSettings;
use legacy_match::core::{Cart, CartItem, LineKey, Matcher};
use legacy_match::models::{Candidate, LegacyStory, MatchKind, PhysiqueQuery};
use legacy_match::routes::{configure_routes, AppState};
use legacy_match::services::{CacheManager, CandidateCatalog, CartStore, FileCartStore, MemoryCartStore};
use serde_json::{json, Value};
use std::sync::Arc;

fn create_candidate(id: &str, prime_age: u8, height_cm: u16, weight_kg: u16) -> Candidate {
    Candidate {
        id: id.to_string(),
        name: format!("Legend {}", id),
        role: "Forward".to_string(),
        archetype: "Complete Forward".to_string(),
        prime_age,
        height_cm,
        weight_kg,
        story: LegacyStory {
            spark: "Spark".to_string(),
            breakthrough: "Breakthrough".to_string(),
            peak: "Peak".to_string(),
            legacy: "Legacy".to_string(),
        },
    }
}

fn app_state(candidates: Vec<Candidate>) -> AppState {
    AppState {
        catalog: Arc::new(CandidateCatalog::new(candidates)),
        matcher: Matcher::with_default_weights(),
        cache: Arc::new(CacheManager::in_memory(100, 60)),
        leads: None,
        carts: Arc::new(MemoryCartStore::new()),
        matching: MatchingSettings::default(),
    }
}

#[std::prelude::v1::test]
fn test_scenario_exact_match() {
    let matcher = Matcher::with_default_weights();
    let candidates = vec![
        create_candidate("tall", 30, 190, 85),
        create_candidate("exact", 25, 175, 70),
        create_candidate("small", 22, 165, 60),
    ];

    let result = matcher
        .find_legacy(&PhysiqueQuery::new(25, 175, 70), &candidates)
        .unwrap();

    assert_eq!(result.candidate.id, "exact");
    assert_eq!(result.kind, MatchKind::Exact);
}

#[std::prelude::v1::test]
fn test_scenario_weighted_fallback() {
    let matcher = Matcher::with_default_weights();
    let candidates = vec![
        create_candidate("C1", 28, 170, 65),
        create_candidate("C2", 32, 180, 75),
    ];

    let result = matcher
        .find_legacy(&PhysiqueQuery::new(30, 172, 68), &candidates)
        .unwrap();

    assert_eq!(result.normalized_query, PhysiqueQuery::new(30, 170, 70));
    assert_eq!(result.candidate.id, "C1");
    match result.kind {
        MatchKind::Nearest { score } => assert!((score - 6.2).abs() < 1e-9, "score {}", score),
        other => panic!("expected nearest match, got {:?}", other),
    }
}

#[std::prelude::v1::test]
fn test_scenario_floor_of_ui_range() {
    let matcher = Matcher::with_default_weights();
    let candidates = vec![create_candidate("junior", 12, 150, 45)];

    let result = matcher
        .find_legacy(&PhysiqueQuery::new(6, 140, 35), &candidates)
        .unwrap();

    assert_eq!(result.normalized_query, PhysiqueQuery::new(6, 150, 45));
    assert_eq!(result.query, PhysiqueQuery::new(6, 140, 35));
    assert_eq!(result.candidate.id, "junior");
}

#[std::prelude::v1::test]
fn test_shipped_catalog_parses() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/legends.json");
    let catalog = CandidateCatalog::from_path(path).expect("shipped catalog should parse");
    assert!(!catalog.is_empty());

    let matcher = Matcher::with_default_weights();
    let result = matcher
        .find_legacy(&PhysiqueQuery::new(26, 175, 70), catalog.candidates())
        .unwrap();
    assert_eq!(result.kind, MatchKind::Exact);
    // "overlap" shares this physique further down the document; the earlier entry wins
    assert_eq!(result.candidate.id, "metronome");
}

#[std::prelude::v1::test]
fn test_shipped_catalog_sits_on_the_grid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/legends.json");
    let catalog = CandidateCatalog::from_path(path).unwrap();

    for candidate in catalog.candidates() {
        assert_eq!(candidate.height_cm % 5, 0, "{} height", candidate.id);
        assert_eq!(candidate.weight_kg % 5, 0, "{} weight", candidate.id);

        let own = PhysiqueQuery::new(candidate.prime_age, candidate.height_cm, candidate.weight_kg);
        assert_eq!(own.normalized(), own, "{} is outside the internal ranges", candidate.id);
    }
}

#[actix_web::test]
async fn test_find_legacy_endpoint() {
    let state = app_state(vec![
        create_candidate("C1", 28, 170, 65),
        create_candidate("C2", 32, 180, 75),
    ]);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let body = json!({ "age": 30, "heightCm": 172, "weightKg": 68 });

    let req = test::TestRequest::post()
        .uri("/api/v1/legacy/find")
        .set_json(&body)
        .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp["candidate"]["id"], "C1");
    assert_eq!(resp["normalizedQuery"]["heightCm"], 170);
    assert_eq!(resp["query"]["heightCm"], 172);
    assert_eq!(resp["match"]["kind"], "nearest");
    assert_eq!(resp["cached"], false);
    assert!(resp["leadId"].is_null());

    // Same bucket, different raw input: served from cache with the new raw query
    let req = test::TestRequest::post()
        .uri("/api/v1/legacy/find")
        .set_json(json!({ "age": 30, "heightCm": 171, "weightKg": 69 }))
        .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp["candidate"]["id"], "C1");
    assert_eq!(resp["cached"], true);
    assert_eq!(resp["query"]["heightCm"], 171);
}

#[actix_web::test]
async fn test_find_legacy_rejects_out_of_range() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(vec![create_candidate("a", 25, 175, 70)])))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/legacy/find")
        .set_json(json!({ "age": 5, "heightCm": 175, "weightKg": 70 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let req = test::TestRequest::post()
        .uri("/api/v1/legacy/find")
        .set_json(json!({
            "age": 20, "heightCm": 175, "weightKg": 70,
            "lead": { "name": "Fan", "email": "not-an-email" }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_find_legacy_with_lead_and_no_database() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(vec![create_candidate("a", 25, 175, 70)])))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/legacy/find")
        .set_json(json!({
            "age": 25, "heightCm": 175, "weightKg": 70,
            "lead": { "name": "Fan", "email": "fan@example.com" }
        }))
        .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp["candidate"]["id"], "a");
    assert_eq!(resp["match"]["kind"], "exact");
    assert!(resp["leadId"].is_null());

    let req = test::TestRequest::get().uri("/api/v1/leads").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 503);
}

#[actix_web::test]
async fn test_empty_catalog_is_unavailable() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(vec![])))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/legacy/find")
        .set_json(json!({ "age": 25, "heightCm": 175, "weightKg": 70 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 503);

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["status"], "degraded");
    assert_eq!(resp["candidates"], 0);
}

#[actix_web::test]
async fn test_similar_players_endpoint() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(vec![
                create_candidate("far", 40, 200, 110),
                create_candidate("near", 25, 180, 70),
                create_candidate("exact", 25, 175, 70),
            ])))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/legacy/similar")
        .set_json(json!({ "age": 25, "heightCm": 175, "weightKg": 70, "limit": 2 }))
        .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;

    let players = resp["players"].as_array().unwrap();
    assert_eq!(players.len(), 2);
    assert_eq!(players[0]["candidate"]["id"], "exact");
    assert_eq!(players[0]["isExact"], true);
    assert_eq!(players[1]["candidate"]["id"], "near");
    assert_eq!(resp["total_candidates"], 3);
}

#[actix_web::test]
async fn test_similar_players_limit_defaults_and_cap() {
    let mut state = app_state(
        (0..6)
            .map(|i| create_candidate(&format!("p{}", i), 20 + i as u8, 175, 70))
            .collect(),
    );
    state.matching = MatchingSettings {
        default_limit: 2,
        max_limit: 4,
    };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/legacy/similar")
        .set_json(json!({ "age": 20, "heightCm": 175, "weightKg": 70 }))
        .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["players"].as_array().unwrap().len(), 2);
    assert_eq!(resp["players"][0]["candidate"]["id"], "p0");

    let req = test::TestRequest::post()
        .uri("/api/v1/legacy/similar")
        .set_json(json!({ "age": 20, "heightCm": 175, "weightKg": 70, "limit": 50 }))
        .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["players"].as_array().unwrap().len(), 4);
    assert_eq!(resp["total_candidates"], 6);

    let req = test::TestRequest::post()
        .uri("/api/v1/legacy/similar")
        .set_json(json!({ "age": 20, "heightCm": 175, "weightKg": 70, "limit": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_get_candidate_endpoint() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(vec![create_candidate("flash", 24, 170, 65)])))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/legacy/candidates/flash").to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["primeAge"], 24);
    assert_eq!(resp["story"]["peak"], "Peak");

    let req = test::TestRequest::get().uri("/api/v1/legacy/candidates/ghost").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_web::test]
async fn test_cart_flow() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(vec![])))
            .configure(configure_routes),
    )
    .await;

    let jersey = json!({
        "productId": "home-jersey", "size": "M", "name": "Home Jersey",
        "unitPriceMinor": 149900, "quantity": 1
    });

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/v1/cart/fan-1/items")
            .set_json(&jersey)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    let req = test::TestRequest::get().uri("/api/v1/cart/fan-1").to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["cart"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(resp["totals"]["itemCount"], 2);
    assert_eq!(resp["totals"]["subtotalMinor"], 299800);

    let req = test::TestRequest::put()
        .uri("/api/v1/cart/fan-1/items")
        .set_json(json!({ "productId": "home-jersey", "size": "L", "quantity": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);

    let req = test::TestRequest::put()
        .uri("/api/v1/cart/fan-1/items")
        .set_json(json!({ "productId": "home-jersey", "size": "M", "quantity": 0 }))
        .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["totals"]["itemCount"], 0);

    let req = test::TestRequest::post()
        .uri("/api/v1/cart/fan-1/items")
        .set_json(json!({
            "productId": "scarf", "name": "Scarf", "unitPriceMinor": 49900, "quantity": 0
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let req = test::TestRequest::delete().uri("/api/v1/cart/fan-1").to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["totals"]["subtotalMinor"], 0);
}

fn scarf_line() -> Value {
    json!({ "productId": "scarf", "name": "Scarf", "unitPriceMinor": 49900, "quantity": 1 })
}

#[actix_web::test]
async fn test_concurrent_cart_adds_all_merge() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(vec![])))
            .configure(configure_routes),
    )
    .await;

    let app = &app;
    let add = move || {
        test::call_service(
            app,
            test::TestRequest::post()
                .uri("/api/v1/cart/fan/items")
                .set_json(scarf_line())
                .to_request(),
        )
    };

    for _ in 0..25 {
        let (a, b, c, d) = tokio::join!(add(), add(), add(), add());
        for resp in [a, b, c, d] {
            assert!(resp.status().is_success());
        }
    }

    let req = test::TestRequest::get().uri("/api/v1/cart/fan").to_request();
    let resp: Value = test::call_and_read_body_json(app, req).await;
    assert_eq!(resp["cart"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(resp["totals"]["itemCount"], 100);
}

#[std::prelude::v1::test]
fn test_file_cart_store_under_threads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("carts.json");
    let store = Arc::new(FileCartStore::open(&path).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    store
                        .update(
                            "shared",
                            Box::new(|cart: &mut Cart| {
                                cart.add(CartItem {
                                    key: LineKey::new("scarf", None),
                                    name: "Scarf".to_string(),
                                    unit_price_minor: 49_900,
                                    quantity: 1,
                                })
                            }),
                        )
                        .unwrap();
                    store.flush().unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let reopened = FileCartStore::open(&path).unwrap();
    let cart = reopened.load("shared").unwrap();
    assert_eq!(cart.totals().item_count, 800);
    assert_eq!(cart.totals().subtotal_minor, 800 * 49_900);
}

#[actix_web::test]
async fn test_remove_cart_line() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(vec![])))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/cart/fan-2/items")
        .set_json(scarf_line())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::delete()
        .uri("/api/v1/cart/fan-2/items")
        .set_json(json!({ "productId": "scarf" }))
        .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["totals"]["itemCount"], 0);

    let req = test::TestRequest::delete()
        .uri("/api/v1/cart/fan-2/items")
        .set_json(json!({ "productId": "scarf" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}
