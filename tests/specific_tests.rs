//! Specific-need resolution: named place, inferred amenity, anywhere.

mod fixtures;

use trip_planner::geo::BoundingBox;
use trip_planner::place::PlaceCategory;
use trip_planner::request::GeoRequest;
use trip_planner::specific::SpecificNeedResolver;

use fixtures::*;

#[test]
fn blank_text_makes_no_calls() {
    let client = ScriptedClient::new(|_: &GeoRequest| panic!("no request expected"));
    let config = test_config();
    let resolver = SpecificNeedResolver::new(&client, &config);

    assert!(resolver.resolve_specific(LAHORE_CENTER.coordinate(), 4000, "   ").is_empty());
    assert!(client.calls().is_empty());
}

#[test]
fn named_place_inside_search_box() {
    let museum = &ATTRACTIONS[3];
    let client = ScriptedClient::new(|req: &GeoRequest| {
        assert!(is_bounded(req));
        Ok(nominatim_hit(museum))
    });
    let config = test_config();
    let resolver = SpecificNeedResolver::new(&client, &config);

    let places = resolver.resolve_specific(LAHORE_CENTER.coordinate(), 2000, "Lahore Museum");

    assert_eq!(places.len(), 1);
    assert_eq!(places[0].category, PlaceCategory::Specific);
    assert_eq!(places[0].coordinate, museum.coordinate());
    // box radius is 1.5x the search radius: 3 km
    let expected = BoundingBox::around(LAHORE_CENTER.coordinate(), 3.0).viewbox();
    assert_eq!(client.calls()[0].param_value("viewbox"), Some(expected.as_str()));
}

#[test]
fn pharmacy_resolved_by_amenity_inference() {
    let client = ScriptedClient::new(|req: &GeoRequest| {
        if req.url == NOMINATIM {
            Ok(no_hits())
        } else if req.url.starts_with("http://overpass") {
            Ok(overpass_nodes(PHARMACIES))
        } else {
            panic!("unexpected request to {}", req.url);
        }
    });
    let config = test_config();
    let resolver = SpecificNeedResolver::new(&client, &config);

    let places = resolver.resolve_specific(LAHORE_CENTER.coordinate(), 4000, "pharmacy");

    assert_eq!(places.len(), PHARMACIES.len());
    assert!(places.iter().all(|p| p.category == PlaceCategory::Specific));
    let query = client.calls()[1].body.clone().unwrap_or_default();
    assert!(query.contains("node(around:4000,31.5656,74.3142)[amenity=\"pharmacy\"];"));
    assert!(query.contains("way(around:4000,31.5656,74.3142)[amenity=\"pharmacy\"];"));
    assert!(query.contains("relation(around:4000,31.5656,74.3142)[amenity=\"pharmacy\"];"));
    assert_eq!(client.calls_to(PHOTON), 0);
}

#[test]
fn untagged_amenity_results_named_after_amenity() {
    let client = ScriptedClient::new(|req: &GeoRequest| {
        if req.url == NOMINATIM {
            Ok(no_hits())
        } else {
            Ok(serde_json::json!({"elements": [
                {"type": "node", "id": 5, "lat": 31.52, "lon": 74.35}
            ]}))
        }
    });
    let config = test_config();
    let resolver = SpecificNeedResolver::new(&client, &config);

    let places = resolver.resolve_specific(LAHORE_CENTER.coordinate(), 4000, "need a washroom");

    assert_eq!(places.len(), 1);
    assert_eq!(places[0].name, "Toilets");
}

#[test]
fn no_keyword_skips_amenity_stage() {
    let client = ScriptedClient::new(|req: &GeoRequest| {
        if req.url == PHOTON {
            Ok(photon_hit(&RESTAURANTS[1]))
        } else if req.url == NOMINATIM {
            Ok(no_hits())
        } else {
            panic!("amenity stage should be skipped");
        }
    });
    let config = test_config();
    let resolver = SpecificNeedResolver::new(&client, &config);

    let places = resolver.resolve_specific(LAHORE_CENTER.coordinate(), 4000, "Aylanto");

    assert_eq!(places.len(), 1);
    assert_eq!(places[0].category, PlaceCategory::Specific);
    assert_eq!(places[0].coordinate, RESTAURANTS[1].coordinate());
    // bounded, then unbiased primary, then secondary; never a second bounded call
    let bounded_calls = client.calls().iter().filter(|req| is_bounded(req)).count();
    assert_eq!(bounded_calls, 1);
}

#[test]
fn empty_amenity_search_falls_back_to_geocoding() {
    let client = ScriptedClient::new(|req: &GeoRequest| {
        if req.url == NOMINATIM && !is_bounded(req) {
            Ok(nominatim_hit(&PHARMACIES[0]))
        } else if req.url == NOMINATIM {
            Ok(no_hits())
        } else {
            Ok(overpass_empty())
        }
    });
    let config = test_config();
    let resolver = SpecificNeedResolver::new(&client, &config);

    let places = resolver.resolve_specific(LAHORE_CENTER.coordinate(), 4000, "chemist");

    assert_eq!(places.len(), 1);
    assert_eq!(places[0].name, PHARMACIES[0].name);
    assert_eq!(client.calls_to(OVERPASS_A), 1);
}

#[test]
fn everything_failing_is_empty_not_error() {
    let client = ScriptedClient::new(|req: &GeoRequest| Err(unavailable(req)));
    let config = test_config();
    let resolver = SpecificNeedResolver::new(&client, &config);

    let places = resolver.resolve_specific(LAHORE_CENTER.coordinate(), 4000, "coffee");

    assert!(places.is_empty());
    // bounded + 3 mirrors + primary + secondary
    assert_eq!(client.calls().len(), 6);
}
