use std::marker::PhantomData;
use serde::{Deserialize, Serialize};
use geojson::{Geometry, JsonObject};
use ts_rs::TS;
use schemars::JsonSchema;

/// Properties for contour band features
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS, JsonSchema)]
#[ts(export)]
#[schemars(description = "Properties for contour band features")]
pub struct BandProperties {
    #[schemars(description = "Index of the feature in extraction order")]
    pub id: usize,
    #[schemars(description = "Index of the contour band the polygon belongs to")]
    pub band: usize,
    #[schemars(description = "Lower bound of the band's value range")]
    pub vmin: f64,
    #[schemars(description = "Upper bound of the band's value range")]
    pub vmax: f64,
    #[schemars(description = "Area of the polygon with holes removed")]
    pub area: f64,
    #[schemars(description = "Number of holes in the polygon")]
    pub hole_count: usize,
}

/// Type alias for contour band GeoJSON
pub type BandGeoJson = TypedGeoJson<BandProperties>;

/// A typed GeoJSON Feature that is generic over its properties.
#[derive(Serialize, Deserialize, Debug)]
pub struct TypedFeature<P> {
    #[serde(flatten)]
    pub feature: geojson::Feature,
    #[serde(skip)]
    _properties: PhantomData<P>,
}

impl<P> TypedFeature<P>
where
    for<'de> P: Serialize + Deserialize<'de>,
{
    /// Creates a new TypedFeature.
    pub fn new(geometry: Option<Geometry>, properties: P) -> Self {
        let feature = geojson::Feature {
            bbox: None,
            geometry,
            id: None,
            properties: serde_json::to_value(properties).ok().and_then(|v| v.as_object().cloned()),
            foreign_members: None,
        };
        Self {
            feature,
            _properties: PhantomData,
        }
    }

    /// Tries to access the typed properties of the feature.
    pub fn properties(&self) -> Option<P> {
        self.feature.properties.as_ref().and_then(|p| {
            serde_json::from_value(serde_json::Value::Object(p.clone())).ok()
        })
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TypedFeatureCollection<P> {
    pub bbox: Option<Vec<f64>>,
    pub features: Vec<TypedFeature<P>>,
    pub foreign_members: Option<JsonObject>,
}

#[derive(Serialize, Deserialize, Debug)]
pub enum TypedGeoJson<P> {
    Geometry(Geometry),
    Feature(TypedFeature<P>),
    FeatureCollection(TypedFeatureCollection<P>),
}

impl<P> TypedGeoJson<P> {
    pub fn as_feature_collection(&self) -> Option<&TypedFeatureCollection<P>> {
        match self {
            TypedGeoJson::FeatureCollection(fc) => Some(fc),
            _ => None,
        }
    }
}

impl<P> TypedFeatureCollection<P> {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl BandGeoJson {
    /// Features whose band range overlaps `[vmin, vmax]`
    pub fn features_in_range(&self, vmin: f64, vmax: f64) -> Vec<&TypedFeature<BandProperties>> {
        match self.as_feature_collection() {
            Some(fc) => fc
                .features
                .iter()
                .filter(|feature| {
                    feature
                        .properties()
                        .is_some_and(|props| props.vmax >= vmin && props.vmin <= vmax)
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of features per band, indexed by band
    pub fn band_histogram(&self) -> Vec<usize> {
        let mut counts = Vec::new();
        if let Some(fc) = self.as_feature_collection() {
            for props in fc.features.iter().filter_map(TypedFeature::properties) {
                let band = props.band;
                if counts.len() <= band {
                    counts.resize(band + 1, 0);
                }
                counts[band] += 1;
            }
        }
        counts
    }

    /// Failure count recorded in the foreign members
    pub fn failure_count(&self) -> Option<usize> {
        self.as_feature_collection()
            .and_then(|fc| fc.foreign_members.as_ref())
            .and_then(|foreign| foreign.get("failure_count"))
            .and_then(|v| v.as_u64())
            .and_then(|v| usize::try_from(v).ok())
    }
}
