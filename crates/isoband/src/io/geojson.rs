use geojson::{Feature, FeatureCollection, Geometry, Value};
use geo_types::{Coord, LineString, Polygon};
use crate::{
    error::{IsobandError, Result},
    types::{Extraction, GeometryRecord, ValueRange},
    typed_geojson::{BandGeoJson, BandProperties, TypedFeature, TypedFeatureCollection, TypedGeoJson},
};

fn ring_positions(ring: &LineString<f64>) -> Vec<Vec<f64>> {
    ring.coords().map(|c| vec![c.x, c.y]).collect()
}

fn polygon_value(polygon: &Polygon<f64>) -> Value {
    let mut rings = vec![ring_positions(polygon.exterior())];
    rings.extend(polygon.interiors().iter().map(ring_positions));
    Value::Polygon(rings)
}

fn band_properties(id: usize, record: &GeometryRecord) -> BandProperties {
    BandProperties {
        id,
        band: record.band,
        vmin: record.range.vmin,
        vmax: record.range.vmax,
        area: record.area(),
        hole_count: record.hole_count(),
    }
}

impl Extraction {
    fn foreign_members(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut foreign_members = serde_json::Map::new();
        foreign_members.insert("record_count".to_string(), serde_json::Value::from(self.records.len()));
        foreign_members.insert("failure_count".to_string(), serde_json::Value::from(self.failures.len()));
        foreign_members
    }

    /// Export to typed GeoJSON format
    pub fn to_typed_geojson(&self) -> BandGeoJson {
        let features = self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let geometry = Geometry::new(polygon_value(&record.polygon));
                TypedFeature::new(Some(geometry), band_properties(i, record))
            })
            .collect();

        TypedGeoJson::FeatureCollection(TypedFeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(self.foreign_members()),
        })
    }

    /// One Polygon feature per record with its band and value range as
    /// properties
    pub fn to_geojson(&self) -> Result<FeatureCollection> {
        let mut features = Vec::with_capacity(self.records.len());

        for (i, record) in self.records.iter().enumerate() {
            let properties = match serde_json::to_value(band_properties(i, record))? {
                serde_json::Value::Object(map) => Some(map),
                _ => None,
            };

            features.push(Feature {
                bbox: None,
                geometry: Some(Geometry::new(polygon_value(&record.polygon))),
                id: Some(geojson::feature::Id::Number(serde_json::Number::from(i))),
                properties,
                foreign_members: None,
            });
        }

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(self.foreign_members()),
        })
    }

    /// Export to GeoJSON and serialize to JSON string
    pub fn to_geojson_string(&self) -> Result<String> {
        let geojson = self.to_geojson()?;
        Ok(serde_json::to_string_pretty(&geojson)?)
    }

    /// Save GeoJSON to file
    pub fn save_geojson<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let geojson_string = self.to_geojson_string()?;
        std::fs::write(path, geojson_string)?;
        Ok(())
    }
}

/// Restore records from GeoJSON written by [`Extraction::to_geojson`].
pub fn records_from_geojson_str(geojson_str: &str) -> Result<Vec<GeometryRecord>> {
    let collection: FeatureCollection = geojson_str.parse()?;
    let mut records = Vec::with_capacity(collection.features.len());

    for feature in collection.features {
        let properties: BandProperties = feature
            .properties
            .map(|p| serde_json::from_value(serde_json::Value::Object(p)))
            .transpose()?
            .ok_or_else(|| IsobandError::InvalidGeoJson("feature without band properties".to_string()))?;

        let Some(Geometry { value: Value::Polygon(rings), .. }) = feature.geometry else {
            continue;
        };
        let mut rings = rings.into_iter().map(|ring| {
            LineString::new(
                ring.iter()
                    .filter_map(|p| Some(Coord { x: *p.first()?, y: *p.get(1)? }))
                    .collect(),
            )
        });
        let Some(exterior) = rings.next() else {
            continue;
        };

        records.push(GeometryRecord {
            polygon: Polygon::new(exterior, rings.collect()),
            range: ValueRange::new(properties.vmin, properties.vmax),
            band: properties.band,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::polygon;

    #[test]
    fn test_band_index_is_not_truncated() {
        let band = u32::MAX as usize + 3;
        let extraction = Extraction {
            records: vec![GeometryRecord {
                polygon: polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0)],
                range: ValueRange::new(0.0, 1.0),
                band,
            }],
            failures: Vec::new(),
        };

        let geojson = extraction.to_geojson().expect("Should create GeoJSON");
        let props = geojson.features[0].properties.as_ref().expect("Has properties");
        assert_eq!(props.get("band").and_then(|v| v.as_u64()), Some(band as u64));

        let restored = records_from_geojson_str(&extraction.to_geojson_string().expect("Should serialize"))
            .expect("Should parse");
        assert_eq!(restored[0].band, band);
    }

    #[test]
    fn test_feature_without_properties_rejected() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}, "properties": null}
        ]}"#;
        assert!(matches!(records_from_geojson_str(json), Err(IsobandError::InvalidGeoJson(_))));
    }
}
