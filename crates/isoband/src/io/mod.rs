pub mod geojson;

pub use self::geojson::records_from_geojson_str;
