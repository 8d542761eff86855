use serde::{Deserialize, Serialize};

/// Diseases-list tag the backend uses for a clean diagnosis.
pub const HEALTHY_TAG: &str = "healthy";
/// Diseases-list tag the backend uses when it could not process the image.
pub const ERROR_TAG: &str = "error";
/// Diseases-list tag marking a coconut maturity analysis.
pub const MATURITY_TAG: &str = "coconut_maturity_analysis";

pub const SENTINEL_TAGS: [&str; 3] = [HEALTHY_TAG, ERROR_TAG, MATURITY_TAG];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropType {
    #[default]
    Cotton,
    Coconut,
}

impl CropType {
    pub const ALL: [Self; 2] = [Self::Cotton, Self::Coconut];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cotton => "cotton",
            Self::Coconut => "coconut",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Cotton),
            1 => Some(Self::Coconut),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Cotton => 0,
            Self::Coconut => 1,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "cotton" => Some(Self::Cotton),
            "coconut" => Some(Self::Coconut),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Cotton => "Cotton",
            Self::Coconut => "Coconut",
        }
    }
}

/// Body of `POST /detect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionRequest {
    pub image: String,
    #[serde(rename = "cropType")]
    pub crop_type: CropType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    #[serde(default)]
    pub diseases: Vec<String>,
    #[serde(default)]
    pub disease_info: Vec<DiseaseEntry>,
    #[serde(default)]
    pub field_data: Option<FieldData>,
    #[serde(default)]
    pub multiple_detections: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_confidence: Option<Vec<f64>>,
}

impl DetectionResult {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.diseases.iter().any(|disease| disease == tag)
    }

    pub fn is_healthy(&self) -> bool {
        self.has_tag(HEALTHY_TAG)
    }

    pub fn is_error(&self) -> bool {
        self.has_tag(ERROR_TAG)
    }

    pub fn is_maturity_analysis(&self) -> bool {
        self.has_tag(MATURITY_TAG)
    }

    /// True when at least one tag names an actual disease.
    pub fn has_disease(&self) -> bool {
        self.diseases
            .iter()
            .any(|disease| !SENTINEL_TAGS.contains(&disease.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maturity_data: Option<MaturityData>,
    #[serde(default)]
    pub recommended_pesticides: Vec<PesticideEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PesticideEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eco_friendly: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effectiveness: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityData {
    pub maturity_level: MaturityLevel,
    #[serde(default)]
    pub coconut_count: u32,
    #[serde(default)]
    pub harvest_ready: bool,
}

/// Coconut maturity. Values the backend invents later are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaturityLevel {
    Immature,
    Mature,
    ReadyForHarvest,
    Other(String),
}

impl MaturityLevel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Immature => "immature",
            Self::Mature => "mature",
            Self::ReadyForHarvest => "ready_for_harvest",
            Self::Other(value) => value,
        }
    }

    /// Upper-cased label with underscores turned into spaces.
    pub fn display_label(&self) -> String {
        self.as_str().replace('_', " ").to_uppercase()
    }

    pub const fn bears_fruit(&self) -> bool {
        matches!(self, Self::Mature | Self::ReadyForHarvest)
    }
}

impl From<String> for MaturityLevel {
    fn from(value: String) -> Self {
        match value.as_str() {
            "immature" => Self::Immature,
            "mature" => Self::Mature,
            "ready_for_harvest" => Self::ReadyForHarvest,
            _ => Self::Other(value),
        }
    }
}

impl From<MaturityLevel> for String {
    fn from(level: MaturityLevel) -> Self {
        match level {
            MaturityLevel::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldData {
    /// Occupancy grid as sent by the backend. Stored, never interpreted.
    #[serde(default)]
    pub grid: serde_json::Value,
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
    #[serde(default)]
    pub is_maturity_analysis: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maturity: Option<MaturityLevel>,
}

impl Hotspot {
    pub const fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            disease: None,
            maturity: None,
        }
    }

    pub fn tree(x: i32, y: i32, maturity: MaturityLevel) -> Self {
        Self {
            x,
            y,
            disease: None,
            maturity: Some(maturity),
        }
    }
}

/// An image ready to be posted, already encoded as a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_name: String,
    pub byte_len: usize,
    pub data_uri: String,
}

impl UploadedImage {
    pub fn from_bytes(file_name: impl Into<String>, media_type: &str, bytes: &[u8]) -> Self {
        Self {
            file_name: file_name.into(),
            byte_len: bytes.len(),
            data_uri: data_uri(media_type, bytes),
        }
    }
}

pub fn data_uri(media_type: &str, bytes: &[u8]) -> String {
    use base64::Engine as _;

    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{media_type};base64,{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_response() -> Result<(), serde_json::Error> {
        let body = serde_json::json!({
            "diseases": ["cotton_leaf_spot"],
            "disease_info": [{
                "name": "Leaf Spot",
                "description": "Brown lesions on leaves.",
                "confidence": 72.4,
                "severity": "moderate",
                "recommended_pesticides": [{
                    "name": "Copper Oxychloride",
                    "description": "Contact fungicide.",
                    "application_rate": "2 g/L",
                    "effectiveness": 0.85,
                    "eco_friendly": true
                }]
            }],
            "field_data": {
                "grid": [[0, 1], [0, 0]],
                "hotspots": [{"x": 3, "y": 4, "disease": "cotton_leaf_spot"}],
                "is_maturity_analysis": false
            },
            "multiple_detections": false,
            "detection_confidence": [72.4]
        });

        let result: DetectionResult = serde_json::from_value(body)?;
        assert!(result.has_disease());
        assert!(!result.is_healthy());
        let field = result.field_data.as_ref().map(|field| field.hotspots.len());
        assert_eq!(field, Some(1));
        let pesticide = &result.disease_info[0].recommended_pesticides[0];
        assert_eq!(pesticide.eco_friendly, Some(true));
        assert_eq!(pesticide.application_rate.as_deref(), Some("2 g/L"));
        Ok(())
    }

    #[test]
    fn null_field_data_and_missing_lists_are_tolerated() -> Result<(), serde_json::Error> {
        let result: DetectionResult =
            serde_json::from_str(r#"{"diseases": ["healthy"], "field_data": null}"#)?;
        assert!(result.is_healthy());
        assert!(result.field_data.is_none());
        assert!(result.disease_info.is_empty());
        assert!(!result.has_disease());
        Ok(())
    }

    #[test]
    fn unknown_maturity_level_is_kept_verbatim() -> Result<(), serde_json::Error> {
        let data: MaturityData = serde_json::from_str(
            r#"{"maturity_level": "unknown", "coconut_count": 4, "harvest_ready": false}"#,
        )?;
        assert_eq!(data.maturity_level, MaturityLevel::Other("unknown".to_string()));
        assert!(!data.maturity_level.bears_fruit());

        let level: MaturityLevel = serde_json::from_str(r#""ready_for_harvest""#)?;
        assert_eq!(level, MaturityLevel::ReadyForHarvest);
        assert_eq!(level.display_label(), "READY FOR HARVEST");
        assert_eq!(serde_json::to_string(&level)?, r#""ready_for_harvest""#);
        Ok(())
    }

    #[test]
    fn request_uses_camel_case_crop_key() -> Result<(), serde_json::Error> {
        let request = DetectionRequest {
            image: "data:image/png;base64,AA==".to_string(),
            crop_type: CropType::Coconut,
        };
        let value = serde_json::to_value(&request)?;
        assert_eq!(value["cropType"], "coconut");
        assert_eq!(value["image"], "data:image/png;base64,AA==");
        Ok(())
    }

    #[test]
    fn sentinel_only_lists_have_no_disease() {
        let result = DetectionResult {
            diseases: vec![MATURITY_TAG.to_string(), HEALTHY_TAG.to_string()],
            disease_info: Vec::new(),
            field_data: None,
            multiple_detections: true,
            detection_confidence: None,
        };
        assert!(!result.has_disease());
        assert!(result.is_maturity_analysis());
    }

    #[test]
    fn data_uri_is_base64_encoded() {
        let image = UploadedImage::from_bytes("leaf.png", "image/png", b"hi");
        assert_eq!(image.data_uri, "data:image/png;base64,aGk=");
        assert_eq!(image.byte_len, 2);
    }

    #[test]
    fn crop_type_round_trips_through_index_and_parse() {
        for crop in CropType::ALL {
            assert_eq!(CropType::from_index(crop.index()), Some(crop));
            assert_eq!(CropType::parse(crop.label()), Some(crop));
        }
        assert_eq!(CropType::parse("wheat"), None);
    }
}
