//! ---
//! tfy_section: "05-binaries"
//! tfy_subsection: "binary"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Canvas marker layer for the fleet map view."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use indexmap::IndexMap;
use trackify_common::config::DeviceStatus;
use trackify_core::Device;

/// Half-height of the viewport when zoomed onto a selected device, degrees.
const ZOOM_SPAN: f64 = 0.004;
/// Smallest half-height when fitting the whole fleet, degrees.
const FIT_MIN_SPAN: f64 = 0.01;
/// Margin factor applied around the fleet bounding box.
const FIT_MARGIN: f64 = 1.3;

/// One rendered map marker. Markers are keyed by device id and updated in
/// place when the same id is seen again.
#[derive(Debug, Clone)]
pub struct Marker {
    pub device_id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub status: DeviceStatus,
    /// Popup lines shown for the focused marker.
    pub popup: Vec<String>,
}

/// Visible region of the map in degrees, centered on `(lat, lng)`.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub lat: f64,
    pub lng: f64,
    /// Half-height; the width doubles it to roughly square the cells.
    pub span: f64,
}

impl Viewport {
    pub fn x_bounds(&self) -> [f64; 2] {
        [self.lng - self.span * 2.0, self.lng + self.span * 2.0]
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        [self.lat - self.span, self.lat + self.span]
    }
}

/// Marker collection backing the map canvas: add/update point markers with
/// popup text, and center on the selected device while one is focused.
#[derive(Debug)]
pub struct MarkerLayer {
    markers: IndexMap<String, Marker>,
    viewport: Viewport,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self {
            markers: IndexMap::new(),
            viewport: Viewport {
                lat: 0.0,
                lng: 0.0,
                span: FIT_MIN_SPAN,
            },
        }
    }

    /// Reconcile markers against the current device list, then aim the
    /// viewport: follow the selected device zoomed in, or fit the fleet.
    pub fn sync(&mut self, devices: &[Device], selected: Option<&str>) {
        for device in devices {
            let popup = vec![
                device.name.clone(),
                format!("Speed: {} km/h", device.speed),
                format!("Status: {}", device.status.as_str()),
            ];
            match self.markers.get_mut(&device.id) {
                Some(marker) => {
                    marker.lat = device.lat;
                    marker.lng = device.lng;
                    marker.name = device.name.clone();
                    marker.status = device.status;
                    marker.popup = popup;
                }
                None => {
                    self.markers.insert(
                        device.id.clone(),
                        Marker {
                            device_id: device.id.clone(),
                            name: device.name.clone(),
                            lat: device.lat,
                            lng: device.lng,
                            status: device.status,
                            popup,
                        },
                    );
                }
            }
        }

        match selected.and_then(|id| self.markers.get(id)) {
            Some(marker) => {
                self.viewport = Viewport {
                    lat: marker.lat,
                    lng: marker.lng,
                    span: ZOOM_SPAN,
                };
            }
            None => self.fit_all(),
        }
    }

    fn fit_all(&mut self) {
        if self.markers.is_empty() {
            return;
        }
        let mut lat_min = f64::MAX;
        let mut lat_max = f64::MIN;
        let mut lng_min = f64::MAX;
        let mut lng_max = f64::MIN;
        for marker in self.markers.values() {
            lat_min = lat_min.min(marker.lat);
            lat_max = lat_max.max(marker.lat);
            lng_min = lng_min.min(marker.lng);
            lng_max = lng_max.max(marker.lng);
        }
        let span = ((lat_max - lat_min).max((lng_max - lng_min) / 2.0) / 2.0 * FIT_MARGIN)
            .max(FIT_MIN_SPAN);
        self.viewport = Viewport {
            lat: (lat_min + lat_max) / 2.0,
            lng: (lng_min + lng_max) / 2.0,
            span,
        };
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    pub fn get(&self, device_id: &str) -> Option<&Marker> {
        self.markers.get(device_id)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl Default for MarkerLayer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use trackify_common::config::AppConfig;

    fn devices() -> Vec<Device> {
        AppConfig::default()
            .devices
            .iter()
            .map(|seed| Device::from_seed(seed, Utc::now()))
            .collect()
    }

    #[test]
    fn markers_are_keyed_by_id_and_updated_in_place() {
        let mut layer = MarkerLayer::new();
        let mut fleet = devices();
        layer.sync(&fleet, None);
        assert_eq!(layer.markers().count(), 3);

        fleet[0].lat += 0.5;
        fleet[0].name = "Renamed".to_owned();
        layer.sync(&fleet, None);
        assert_eq!(layer.markers().count(), 3);
        let marker = layer.get("TRK-9901").unwrap();
        assert!((marker.lat - fleet[0].lat).abs() < f64::EPSILON);
        assert_eq!(marker.popup[0], "Renamed");
    }

    #[test]
    fn popup_lines_carry_speed_and_status() {
        let mut layer = MarkerLayer::new();
        layer.sync(&devices(), None);
        let marker = layer.get("TRK-9901").unwrap();
        assert_eq!(marker.popup[1], "Speed: 65 km/h");
        assert_eq!(marker.popup[2], "Status: Online");
    }

    #[test]
    fn selection_zooms_the_viewport_onto_the_device() {
        let mut layer = MarkerLayer::new();
        let fleet = devices();
        layer.sync(&fleet, Some("TRK-4421"));
        let viewport = layer.viewport();
        assert!((viewport.lat - fleet[1].lat).abs() < f64::EPSILON);
        assert!((viewport.lng - fleet[1].lng).abs() < f64::EPSILON);
        assert!(viewport.span <= ZOOM_SPAN);
    }

    #[test]
    fn without_selection_the_viewport_covers_the_fleet() {
        let mut layer = MarkerLayer::new();
        let fleet = devices();
        layer.sync(&fleet, None);
        let viewport = layer.viewport();
        let [y_min, y_max] = viewport.y_bounds();
        for device in &fleet {
            assert!(device.lat >= y_min && device.lat <= y_max);
        }
    }
}
