//! Writes the composed map as a single Leaflet page.
//!
//! Layers and controls travel as one JSON document inside a
//! `<script type="application/json">` block; the inline script turns them into
//! Leaflet objects.

use crate::domain::ports::MapRenderer;
use crate::render::state::LayerEntry;
use crate::render::{Control, Layer, LayerId, MapOptions, MapState};
use crate::utils::error::{MapError, Result};
use crate::utils::html;
use serde::Serialize;

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <link
    rel="stylesheet"
    href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"
    integrity="sha256-p4NxAoJBhIIN+hmNHrzRCf9tD/miZyoHS5obTRR9BMY="
    crossorigin=""
  />
  <style>
    html, body { height: 100%; margin: 0; padding: 0; }
    #map { height: 100%; width: 100%; }
    .info {
      padding: 6px 8px;
      background: rgba(255, 255, 255, 0.85);
      box-shadow: 0 0 15px rgba(0, 0, 0, 0.2);
      border-radius: 5px;
    }
    .info.title h1 { font-size: 16px; margin: 0; text-align: center; }
    .legend { line-height: 18px; color: #555; }
    .legend i {
      width: 18px;
      height: 18px;
      float: left;
      margin-right: 8px;
      opacity: 0.8;
    }
    .legend-item { clear: both; }
  </style>
</head>
<body>
  <div id="map"></div>

  <script type="application/json" id="map-data">{{DATA}}</script>
  <script
    src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"
    integrity="sha256-20nQCchB9co0qIjJZRGuk2/Z9VM+kNiyxNV1lvTlZBo="
    crossorigin=""
  ></script>
  <script>
    const data = JSON.parse(document.getElementById('map-data').textContent);
    const map = L.map('map', { center: data.center, zoom: data.zoom });

    const baseMaps = {};
    const overlayMaps = {};

    function buildLayer(def) {
      switch (def.kind) {
        case 'tiles':
          return L.tileLayer(def.url_template, { attribution: def.attribution });
        case 'markers':
          return L.layerGroup(def.markers.map(m =>
            L.circleMarker(m.position, {
              radius: m.radius_px,
              fillColor: m.fill_color,
              color: def.style.stroke_color,
              weight: def.style.weight,
              opacity: def.style.opacity,
              fillOpacity: def.style.fill_opacity
            }).bindPopup(m.popup_html)));
        case 'boundaries':
          return L.geoJSON(def.geometry, {
            style: () => ({ color: def.color, weight: def.weight })
          });
      }
    }

    data.layers.forEach(entry => {
      const layer = buildLayer(entry.layer);
      (entry.base ? baseMaps : overlayMaps)[entry.layer.name] = layer;
      if (entry.visible) {
        layer.addTo(map);
      }
    });

    function htmlControl(html, className, position) {
      const control = L.control({ position: position });
      control.onAdd = () => {
        const div = L.DomUtil.create('div', className);
        div.innerHTML = html;
        return div;
      };
      control.addTo(map);
    }

    data.controls.forEach(control => {
      switch (control.kind) {
        case 'title':
          htmlControl(control.html, 'info title', 'topright');
          break;
        case 'layer_switcher':
          L.control.layers(baseMaps, overlayMaps).addTo(map);
          break;
        case 'legend':
          htmlControl(control.html, 'info legend', 'bottomright');
          break;
      }
    });
  </script>
</body>
</html>
"#;

#[derive(Serialize)]
struct PagePayload<'a> {
    center: [f64; 2],
    zoom: u8,
    layers: &'a [LayerEntry],
    controls: Vec<ControlPayload>,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ControlPayload {
    Title { html: String },
    LayerSwitcher,
    Legend { html: String },
}

/// [`MapRenderer`] that produces a standalone HTML page.
#[derive(Debug, Clone)]
pub struct LeafletRenderer {
    page_title: String,
    state: MapState,
}

impl LeafletRenderer {
    pub fn new(options: &MapOptions) -> Self {
        Self {
            page_title: options.title.clone(),
            state: MapState::new(options.center, options.zoom),
        }
    }

    fn payload(&self) -> PagePayload<'_> {
        let controls = self
            .state
            .controls()
            .iter()
            .map(|control| match control {
                Control::Title { html } => ControlPayload::Title { html: html.clone() },
                Control::LayerSwitcher => ControlPayload::LayerSwitcher,
                Control::Legend(legend) => ControlPayload::Legend {
                    html: legend.to_html(),
                },
            })
            .collect();

        PagePayload {
            center: self.state.center(),
            zoom: self.state.zoom(),
            layers: self.state.layers(),
            controls,
        }
    }

    pub fn render_html(&self) -> Result<String> {
        let data = serde_json::to_string(&self.payload())?;
        tracing::debug!(
            "Rendering page with {} layers ({} bytes of data)",
            self.state.layers().len(),
            data.len()
        );

        let title = html::escape(&self.page_title);
        let data = html::script_safe_json(&data);
        fill_template(
            PAGE_TEMPLATE,
            &[("{{TITLE}}", title.as_str()), ("{{DATA}}", data.as_str())],
        )
    }
}

/// Substitutes each placeholder once, in template order. Values are never
/// scanned for later placeholders.
fn fill_template(template: &str, values: &[(&str, &str)]) -> Result<String> {
    let mut page = String::with_capacity(template.len());
    let mut rest = template;
    for (placeholder, value) in values {
        let (head, tail) = rest
            .split_once(placeholder)
            .ok_or_else(|| MapError::RenderError {
                message: format!("page template has no {} placeholder", placeholder),
            })?;
        page.push_str(head);
        page.push_str(value);
        rest = tail;
    }
    page.push_str(rest);
    Ok(page)
}

impl MapRenderer for LeafletRenderer {
    fn add_layer(&mut self, layer: Layer) -> LayerId {
        self.state.add_layer(layer)
    }

    fn add_control(&mut self, control: Control) {
        self.state.add_control(control);
    }

    fn toggle_layer(&mut self, id: LayerId, visible: bool) -> Result<()> {
        self.state.toggle_layer(id, visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BoundaryGeometry, DepthColor, MapDataset, MarkerDescriptor};
    use crate::render::compose_map;

    fn extract_payload(page: &str) -> serde_json::Value {
        let start = page.find("id=\"map-data\">").unwrap() + "id=\"map-data\">".len();
        let end = start + page[start..].find("</script>").unwrap();
        serde_json::from_str(&page[start..end]).unwrap()
    }

    fn render_with(options: MapOptions, boundaries: Option<BoundaryGeometry>) -> String {
        let mut renderer = LeafletRenderer::new(&options);
        let dataset = MapDataset {
            markers: vec![MarkerDescriptor {
                position: (61.1, -150.1),
                radius_px: 21.0,
                fill_color: DepthColor::Yellow,
                popup_html: "<h3>Alaska</h3><hr>".to_string(),
            }],
            boundaries,
            skipped_records: 0,
        };
        compose_map(&mut renderer, dataset, &options).unwrap();
        renderer.render_html().unwrap()
    }

    fn rendered(with_plates: bool) -> String {
        render_with(
            MapOptions::default(),
            with_plates.then(|| {
                BoundaryGeometry(serde_json::json!({"type": "FeatureCollection", "features": []}))
            }),
        )
    }

    #[test]
    fn test_page_embeds_markers() {
        let page = rendered(true);
        assert!(page.contains("<title>USGS - All Earthquakes</title>"));

        let payload = extract_payload(&page);
        assert_eq!(payload["center"], serde_json::json!([0.0, 0.0]));
        assert_eq!(payload["zoom"], 2);

        let layers = payload["layers"].as_array().unwrap();
        assert_eq!(layers.len(), 4);

        let quakes = &layers[2];
        assert_eq!(quakes["visible"], true);
        assert_eq!(quakes["layer"]["kind"], "markers");
        assert_eq!(quakes["layer"]["name"], "Earthquakes");
        let marker = &quakes["layer"]["markers"][0];
        assert_eq!(marker["position"], serde_json::json!([61.1, -150.1]));
        assert_eq!(marker["radius_px"], 21.0);
        assert_eq!(marker["fill_color"], "#FFFF00");
        assert_eq!(marker["popup_html"], "<h3>Alaska</h3><hr>");

        let plates = &layers[3];
        assert_eq!(plates["layer"]["kind"], "boundaries");
        assert_eq!(plates["layer"]["color"], "#FFA500");
        assert_eq!(plates["layer"]["geometry"]["type"], "FeatureCollection");
    }

    #[test]
    fn test_base_layers_and_controls() {
        let payload = extract_payload(&rendered(false));
        let layers = payload["layers"].as_array().unwrap();
        assert_eq!(layers[0]["base"], true);
        assert_eq!(layers[0]["visible"], true);
        assert_eq!(layers[0]["layer"]["name"], "Street Map");
        assert_eq!(layers[1]["visible"], false);
        assert_eq!(layers[1]["layer"]["name"], "Satellite Map");

        let kinds: Vec<&str> = payload["controls"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["kind"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, vec!["title", "layer_switcher", "legend"]);
    }

    #[test]
    fn test_embedded_json_cannot_close_script() {
        let page = rendered(false);
        let start = page.find("id=\"map-data\">").unwrap();
        let end = start + page[start..].find("</script>").unwrap();
        // 內嵌 JSON 不應提前結束 script
        assert!(page[start..end].contains("\\u003c/h3\\u003e"));
    }

    #[test]
    fn test_boundary_markup_stays_inside_data_block() {
        let plates = BoundaryGeometry(serde_json::json!({
            "type": "FeatureCollection",
            "features": [],
            "note": "<!--<script>"
        }));
        let page = render_with(MapOptions::default(), Some(plates));

        assert!(!page.contains("<!--<script>"));
        let data_tag = page.find("id=\"map-data\">").unwrap();
        assert_eq!(page.matches("<script").count(), 3);
        let block_end = page[data_tag..].find("</script>").unwrap();
        assert!(block_end < page[data_tag..].find("leaflet.js").unwrap());

        let payload = extract_payload(&page);
        assert_eq!(payload["layers"][3]["layer"]["geometry"]["note"], "<!--<script>");
    }

    #[test]
    fn test_title_placeholder_is_not_expanded() {
        let options = MapOptions {
            title: "{{DATA}} quakes".to_string(),
            ..MapOptions::default()
        };
        let page = render_with(options, None);
        assert!(page.contains("<title>{{DATA}} quakes</title>"));
        assert_eq!(page.matches("id=\"map-data\"").count(), 1);

        let payload = extract_payload(&page);
        assert_eq!(payload["layers"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_fill_template_requires_placeholders() {
        assert_eq!(
            fill_template("<a>{{X}}</a>", &[("{{X}}", "1")]).unwrap(),
            "<a>1</a>"
        );
        let err = fill_template("<a></a>", &[("{{X}}", "1")]).unwrap_err();
        assert!(matches!(err, MapError::RenderError { .. }));
    }
}
