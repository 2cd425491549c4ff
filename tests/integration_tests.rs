use httpmock::prelude::*;
use quake_map::{CliConfig, LocalStorage, MapEngine, MapError, MapPipeline, TomlConfig};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn feed_body() -> serde_json::Value {
    serde_json::json!({
        "type": "FeatureCollection",
        "metadata": {"title": "USGS All Earthquakes, Past Day", "count": 3},
        "features": [
            {
                "type": "Feature",
                "id": "ak024f1",
                "properties": {"mag": 4.2, "place": "72 km W of Anchor Point, Alaska", "time": 1700000000000i64},
                "geometry": {"type": "Point", "coordinates": [-152.9, 59.8, 95.3]}
            },
            {
                "type": "Feature",
                "id": "ci40587",
                "properties": {"mag": 1.1, "place": "6 km NE of Ocotillo Wells, CA", "time": 1700000100000i64},
                "geometry": {"type": "Point", "coordinates": [-116.1, 33.2, 10.0]}
            },
            {
                "type": "Feature",
                "id": "us7000l",
                "properties": {"mag": 5.0, "place": "Fiji region", "time": 1700000200000i64},
                "geometry": {"type": "Point", "coordinates": [178.2, -17.9, 70.0]}
            }
        ]
    })
}

fn plates_body() -> serde_json::Value {
    serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"Name": "PA-NA"},
            "geometry": {"type": "LineString", "coordinates": [[-125.0, 40.3], [-124.5, 40.1]]}
        }]
    })
}

fn cli_config(feed_url: String, plates: String, output_path: String) -> CliConfig {
    CliConfig {
        feed_url,
        plates,
        no_plates: false,
        output_path,
        timeout_seconds: 5,
        title: "USGS - All Earthquakes".to_string(),
        subtitle: "From Previous Day".to_string(),
        skip_invalid: false,
        emit_geojson: true,
        verbose: false,
        monitor: false,
        log_json: false,
    }
}

fn read_payload(page: &str) -> serde_json::Value {
    let start = page.find("id=\"map-data\">").unwrap() + "id=\"map-data\">".len();
    let end = start + page[start..].find("</script>").unwrap();
    serde_json::from_str(&page[start..end]).unwrap()
}

#[tokio::test]
async fn test_end_to_end_map_with_plates() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start_async().await;
    let feed_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/all_day.geojson");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(feed_body());
        })
        .await;
    let plates_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/PB2002_boundaries.json");
            then.status(200).json_body(plates_body());
        })
        .await;

    let config = cli_config(
        server.url("/all_day.geojson"),
        server.url("/PB2002_boundaries.json"),
        output_path.clone(),
    );
    let storage = LocalStorage::new(output_path.clone());
    let engine = MapEngine::new(MapPipeline::new(storage, config));

    let result = engine.run().await.unwrap();
    feed_mock.assert_async().await;
    plates_mock.assert_async().await;
    assert!(result.ends_with("index.html"));

    let page = std::fs::read_to_string(temp_dir.path().join("index.html")).unwrap();
    assert!(page.contains("leaflet.js"));

    let payload = read_payload(&page);
    let layers = payload["layers"].as_array().unwrap();
    let names: Vec<&str> = layers
        .iter()
        .map(|l| l["layer"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["Street Map", "Satellite Map", "Earthquakes", "Tectonic Plates"]
    );

    let markers = layers[2]["layer"]["markers"].as_array().unwrap();
    assert_eq!(markers.len(), 3);
    // 95.3 km -> red, 10 km -> green, 70 km -> dark yellow
    assert_eq!(markers[0]["fill_color"], "#FF0000");
    assert_eq!(markers[0]["radius_px"], 21.0);
    assert_eq!(markers[0]["position"], serde_json::json!([59.8, -152.9]));
    assert_eq!(markers[1]["fill_color"], "#00FF00");
    assert_eq!(markers[2]["fill_color"], "#CCCC00");
    assert_eq!(markers[2]["radius_px"], 25.0);

    assert_eq!(layers[3]["layer"]["geometry"], plates_body());

    let geojson: serde_json::Value = serde_json::from_slice(
        &std::fs::read(temp_dir.path().join("earthquakes.geojson")).unwrap(),
    )
    .unwrap();
    assert_eq!(geojson["features"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_missing_plates_still_renders_earthquakes() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/feed");
            then.status(200).json_body(feed_body());
        })
        .await;

    let config = cli_config(
        server.url("/feed"),
        temp_dir
            .path()
            .join("does-not-exist.json")
            .to_str()
            .unwrap()
            .to_string(),
        output_path.clone(),
    );
    let engine = MapEngine::new(MapPipeline::new(LocalStorage::new(output_path), config));
    engine.run().await.unwrap();

    let page = std::fs::read_to_string(temp_dir.path().join("index.html")).unwrap();
    let payload = read_payload(&page);
    let layers = payload["layers"].as_array().unwrap();
    assert_eq!(layers.len(), 3);
    assert_eq!(layers[2]["layer"]["name"], "Earthquakes");

    let legend = payload["controls"][2]["html"].as_str().unwrap();
    assert!(!legend.contains("Tectonic Plates"));
    assert!(legend.contains("90+ km"));
}

#[tokio::test]
async fn test_feed_failure_aborts_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start_async().await;
    let feed_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/feed");
            then.status(500);
        })
        .await;

    let mut config = cli_config(server.url("/feed"), String::new(), output_path.clone());
    config.no_plates = true;

    let engine = MapEngine::new(MapPipeline::new(LocalStorage::new(output_path), config));
    let err = engine.run().await.unwrap_err();

    feed_mock.assert_async().await;
    assert!(matches!(err, MapError::HttpStatusError { status: 500, .. }));
    assert_eq!(err.exit_code(), 2);
    assert!(!temp_dir.path().join("index.html").exists());
}

#[tokio::test]
async fn test_malformed_record_names_index() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let mut body = feed_body();
    body["features"][2]["properties"]["mag"] = serde_json::Value::Null;

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/feed");
            then.status(200).json_body(body);
        })
        .await;

    let mut config = cli_config(server.url("/feed"), String::new(), output_path.clone());
    config.no_plates = true;

    let engine = MapEngine::new(MapPipeline::new(
        LocalStorage::new(output_path.clone()),
        config.clone(),
    ));
    let err = engine.run().await.unwrap_err();
    match &err {
        MapError::InvalidRecordError { index, reason } => {
            assert_eq!(*index, 2);
            assert!(reason.contains("magnitude"));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // --skip-invalid renders the remaining records
    config.skip_invalid = true;
    let engine = MapEngine::new(MapPipeline::new(LocalStorage::new(output_path), config));
    engine.run().await.unwrap();

    let page = std::fs::read_to_string(temp_dir.path().join("index.html")).unwrap();
    let payload = read_payload(&page);
    let markers = payload["layers"][2]["layer"]["markers"].as_array().unwrap();
    assert_eq!(markers.len(), 2);
}

#[tokio::test]
async fn test_toml_config_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("site");

    let mut plates_file = NamedTempFile::new().unwrap();
    plates_file
        .write_all(plates_body().to_string().as_bytes())
        .unwrap();

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/week");
            then.status(200).json_body(feed_body());
        })
        .await;

    let toml_content = format!(
        r#"
[map]
title = "Past Week"
subtitle = ""
zoom = 3

[source]
feed_url = "{}"
plates = "{}"
timeout_seconds = 5

[output]
path = "{}"
"#,
        server.url("/week"),
        plates_file.path().to_str().unwrap().replace('\\', "\\\\"),
        output_path.to_str().unwrap().replace('\\', "\\\\"),
    );
    let config = TomlConfig::from_toml_str(&toml_content).unwrap();

    let storage = LocalStorage::new(output_path.to_str().unwrap().to_string());
    let engine = MapEngine::new_with_monitoring(MapPipeline::new(storage, config), false);
    engine.run().await.unwrap();

    let page = std::fs::read_to_string(output_path.join("index.html")).unwrap();
    assert!(page.contains("<title>Past Week</title>"));
    assert!(!output_path.join("earthquakes.geojson").exists());

    let payload = read_payload(&page);
    assert_eq!(payload["zoom"], 3);
    assert_eq!(payload["controls"][0]["html"], "<h1>Past Week</h1>");
    assert_eq!(payload["layers"][3]["layer"]["name"], "Tectonic Plates");
}
