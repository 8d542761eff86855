//! Pure rendering of a detection response into display-ready records.
//!
//! Nothing here touches the simulation or the notification stack; the
//! controller decides what to do with the records built here.

use crate::model::{DetectionResult, DiseaseEntry, MaturityData, MaturityLevel, PesticideEntry};

pub const NO_PESTICIDES_LINE: &str = "No pesticides needed at this time.";
pub const NO_RECOMMENDATIONS_LINE: &str = "Unable to provide recommendations.";
pub const NO_TREATMENTS_LINE: &str = "No specific treatments recommended.";

/// Colour family of a badge; front ends map these onto their palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Primary,
    Info,
    Warning,
    Success,
    Secondary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosisView {
    pub title: String,
    pub summary: String,
    pub body: DiagnosisBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosisBody {
    /// Fixed single-line explanations for the healthy and error sentinels.
    Message(String),
    Cards(Vec<DiseaseCard>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseCard {
    pub name: String,
    pub confidence: f64,
    pub description: String,
    pub maturity: Option<MaturityBlock>,
    pub severity: Option<String>,
    pub treatments: Vec<TreatmentLine>,
}

impl DiseaseCard {
    /// "NN% Match", rounded half up like the confidence badge.
    pub fn confidence_label(&self) -> String {
        format!("{}% Match", round_half_up(self.confidence))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaturityBlock {
    pub level_label: String,
    pub level_badge: Badge,
    pub coconut_count: u32,
    pub harvest_ready: bool,
}

impl MaturityBlock {
    pub const fn harvest_label(&self) -> &'static str {
        if self.harvest_ready {
            "READY FOR HARVEST"
        } else {
            "NOT READY"
        }
    }

    pub const fn harvest_badge(&self) -> Badge {
        if self.harvest_ready {
            Badge::Success
        } else {
            Badge::Warning
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TreatmentLine {
    Pesticide {
        name: String,
        description: String,
        application_rate: Option<String>,
        eco_friendly: Option<bool>,
        effectiveness: Option<f64>,
    },
    NoneRecommended,
}

impl TreatmentLine {
    pub fn summary(&self) -> String {
        match self {
            Self::Pesticide {
                name, description, ..
            } => format!("{name}: {description}"),
            Self::NoneRecommended => NO_TREATMENTS_LINE.to_string(),
        }
    }

    /// Secondary lines: application rate, eco label, effectiveness.
    pub fn details(&self) -> Vec<String> {
        let Self::Pesticide {
            application_rate,
            eco_friendly,
            effectiveness,
            ..
        } = self
        else {
            return Vec::new();
        };

        let mut details = Vec::new();
        if let Some(rate) = application_rate {
            details.push(format!("Application Rate: {rate}"));
        }
        if let Some(eco) = eco_friendly {
            details.push(if *eco { "Eco-friendly" } else { "Conventional" }.to_string());
        }
        if let Some(effectiveness) = effectiveness {
            details.push(format!(
                "Effectiveness: {}%",
                round_half_up(effectiveness * 100.0)
            ));
        }
        details
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorMode {
    Pesticide,
    Inspection,
}

impl SelectorMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pesticide => "Pesticide:",
            Self::Inspection => "Inspection Tool:",
        }
    }

    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Pesticide => "Select pesticide...",
            Self::Inspection => "Select inspection tool...",
        }
    }

    pub const fn action_label(self) -> &'static str {
        match self {
            Self::Pesticide => "Spray",
            Self::Inspection => "Inspect",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOption {
    pub value: String,
    pub label: String,
}

impl ToolOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

pub const INSPECTION_TOOLS: [(&str, &str); 3] = [
    ("visual_scanner", "Visual Maturity Scanner"),
    ("coconut_counter", "Coconut Counter Tool"),
    ("harvest_analyzer", "Harvest Readiness Analyzer"),
];

/// The pesticide / inspection-tool dropdown. `selected == None` is the
/// placeholder entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSelector {
    pub mode: SelectorMode,
    pub options: Vec<ToolOption>,
    pub selected: Option<usize>,
}

impl Default for ToolSelector {
    fn default() -> Self {
        Self {
            mode: SelectorMode::Pesticide,
            options: Vec::new(),
            selected: None,
        }
    }
}

impl ToolSelector {
    pub fn for_pesticides(pesticides: &[&PesticideEntry]) -> Self {
        let options = if pesticides.is_empty() {
            vec![ToolOption::new("generic", "Generic Pesticide")]
        } else {
            pesticides
                .iter()
                .map(|pesticide| ToolOption::new(slug(&pesticide.name), pesticide.name.clone()))
                .collect()
        };

        Self {
            mode: SelectorMode::Pesticide,
            options,
            selected: None,
        }
    }

    pub fn for_inspection() -> Self {
        Self {
            mode: SelectorMode::Inspection,
            options: INSPECTION_TOOLS
                .iter()
                .map(|(value, label)| ToolOption::new(*value, *label))
                .collect(),
            selected: None,
        }
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.selected
            .and_then(|index| self.options.get(index))
            .map(|option| option.value.as_str())
    }

    pub fn selected_label(&self) -> &str {
        self.selected
            .and_then(|index| self.options.get(index))
            .map_or(self.mode.placeholder(), |option| option.label.as_str())
    }

    /// Selects `index`; out-of-range indexes fall back to the placeholder.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|index| *index < self.options.len());
    }

    /// Steps through placeholder + options, wrapping at both ends.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn cycle(&mut self, step: isize) {
        let slots = self.options.len() + 1;
        let current = self.selected.map_or(0, |index| index + 1);
        let next = (current as isize + step).rem_euclid(slots as isize) as usize;
        self.selected = next.checked_sub(1);
    }
}

/// Title and description of the simulation panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationCopy {
    pub title: &'static str,
    pub description: &'static str,
}

impl SimulationCopy {
    pub const TREATMENT: Self = Self {
        title: "Disease Treatment Simulation",
        description: "Activate drone simulation to practice applying pesticides to diseased areas",
    };

    pub const MATURITY: Self = Self {
        title: "Coconut Tree Analysis",
        description: "Activate drone simulation to inspect coconut trees and view their maturity levels",
    };
}

/// Everything process-results decides, minus the side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRendering {
    pub diagnosis: DiagnosisView,
    /// `None` leaves the current selector untouched.
    pub selector: Option<ToolSelector>,
    pub simulation_enabled: bool,
    pub simulation_copy: Option<SimulationCopy>,
}

pub fn render_result(result: &DetectionResult) -> ResultRendering {
    let maturity_analysis = result.is_maturity_analysis();

    let (diagnosis, selector) = if result.is_healthy() {
        (
            DiagnosisView {
                title: "No Disease Detected".to_string(),
                summary: "Your crop appears to be healthy.".to_string(),
                body: DiagnosisBody::Message(NO_PESTICIDES_LINE.to_string()),
            },
            None,
        )
    } else if result.is_error() {
        (
            DiagnosisView {
                title: "Detection Error".to_string(),
                summary: "There was an error processing your image. Please try again with a clearer image."
                    .to_string(),
                body: DiagnosisBody::Message(NO_RECOMMENDATIONS_LINE.to_string()),
            },
            None,
        )
    } else {
        let summary = if result.multiple_detections {
            "Multiple potential diseases detected. Ordered by match confidence."
        } else {
            "Single disease detected."
        };

        let selector = if maturity_analysis {
            ToolSelector::for_inspection()
        } else {
            let pesticides: Vec<&PesticideEntry> = result
                .disease_info
                .iter()
                .flat_map(|entry| entry.recommended_pesticides.iter())
                .collect();
            ToolSelector::for_pesticides(&pesticides)
        };

        (
            DiagnosisView {
                title: "Disease Detection Results".to_string(),
                summary: summary.to_string(),
                body: DiagnosisBody::Cards(disease_cards(&result.disease_info)),
            },
            Some(selector),
        )
    };

    let simulation_enabled = result.has_disease() || maturity_analysis;
    let simulation_copy = simulation_enabled.then_some(if maturity_analysis {
        SimulationCopy::MATURITY
    } else {
        SimulationCopy::TREATMENT
    });

    ResultRendering {
        diagnosis,
        selector,
        simulation_enabled,
        simulation_copy,
    }
}

/// One card per entry, highest confidence first. Equal confidences keep
/// their received order.
pub fn disease_cards(entries: &[DiseaseEntry]) -> Vec<DiseaseCard> {
    let mut sorted: Vec<&DiseaseEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    sorted.into_iter().map(disease_card).collect()
}

fn disease_card(entry: &DiseaseEntry) -> DiseaseCard {
    let treatments = if entry.recommended_pesticides.is_empty() {
        vec![TreatmentLine::NoneRecommended]
    } else {
        entry
            .recommended_pesticides
            .iter()
            .map(|pesticide| TreatmentLine::Pesticide {
                name: pesticide.name.clone(),
                description: pesticide.description.clone(),
                application_rate: pesticide.application_rate.clone(),
                eco_friendly: pesticide.eco_friendly,
                effectiveness: pesticide.effectiveness,
            })
            .collect()
    };

    DiseaseCard {
        name: entry.name.clone(),
        confidence: entry.confidence,
        description: entry.description.clone(),
        maturity: entry.maturity_data.as_ref().map(maturity_block),
        severity: entry
            .severity
            .as_deref()
            .filter(|severity| !severity.is_empty())
            .map(capitalize),
        treatments,
    }
}

fn maturity_block(data: &MaturityData) -> MaturityBlock {
    MaturityBlock {
        level_label: data.maturity_level.display_label(),
        level_badge: maturity_badge(&data.maturity_level),
        coconut_count: data.coconut_count,
        harvest_ready: data.harvest_ready,
    }
}

pub const fn maturity_badge(level: &MaturityLevel) -> Badge {
    match level {
        MaturityLevel::Immature => Badge::Info,
        MaturityLevel::Mature => Badge::Warning,
        MaturityLevel::ReadyForHarvest => Badge::Success,
        MaturityLevel::Other(_) => Badge::Secondary,
    }
}

/// Lowercases and turns each whitespace run into one underscore.
pub fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_space = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_whitespace() {
            if !in_space {
                slug.push('_');
            }
            in_space = true;
        } else {
            slug.push(ch);
            in_space = false;
        }
    }
    slug
}

/// `snake_case` value back to "Title Case" for messages.
pub fn title_case(code: &str) -> String {
    if code.is_empty() {
        return "Unknown Pesticide".to_string();
    }
    code.split('_').map(capitalize).collect::<Vec<_>>().join(" ")
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[allow(clippy::cast_possible_truncation)]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HEALTHY_TAG, MATURITY_TAG};

    fn entry(name: &str, confidence: f64) -> DiseaseEntry {
        DiseaseEntry {
            name: name.to_string(),
            description: format!("{name} description"),
            confidence,
            severity: None,
            maturity_data: None,
            recommended_pesticides: Vec::new(),
        }
    }

    fn pesticide(name: &str) -> PesticideEntry {
        PesticideEntry {
            name: name.to_string(),
            description: "kills fungus".to_string(),
            application_rate: None,
            eco_friendly: None,
            effectiveness: None,
        }
    }

    fn result(diseases: &[&str], info: Vec<DiseaseEntry>) -> DetectionResult {
        DetectionResult {
            diseases: diseases.iter().map(ToString::to_string).collect(),
            disease_info: info,
            field_data: None,
            multiple_detections: false,
            detection_confidence: None,
        }
    }

    #[test]
    fn cards_are_sorted_by_confidence_descending() {
        let cards = disease_cards(&[entry("a", 30.0), entry("b", 90.0), entry("c", 60.0)]);
        let confidences: Vec<f64> = cards.iter().map(|card| card.confidence).collect();
        assert_eq!(confidences, [90.0, 60.0, 30.0]);
    }

    #[test]
    fn equal_confidences_keep_received_order() {
        let cards = disease_cards(&[entry("first", 50.0), entry("top", 80.0), entry("second", 50.0)]);
        let names: Vec<&str> = cards.iter().map(|card| card.name.as_str()).collect();
        assert_eq!(names, ["top", "first", "second"]);
    }

    #[test]
    fn healthy_tag_wins_over_everything_else() {
        let mut info = entry("Leaf Spot", 88.0);
        info.recommended_pesticides.push(pesticide("Neem Oil"));
        let rendering = render_result(&result(&[HEALTHY_TAG, "cotton_leaf_spot"], vec![info]));

        assert_eq!(
            rendering.diagnosis.body,
            DiagnosisBody::Message(NO_PESTICIDES_LINE.to_string())
        );
        assert_eq!(rendering.diagnosis.title, "No Disease Detected");
        assert!(rendering.selector.is_none());
    }

    #[test]
    fn pesticides_are_aggregated_without_deduplication() {
        let mut first = entry("Leaf Spot", 70.0);
        first.recommended_pesticides = vec![pesticide("Neem Oil"), pesticide("Copper  Spray")];
        let mut second = entry("Boll Rot", 40.0);
        second.recommended_pesticides = vec![pesticide("Neem Oil")];

        let rendering = render_result(&result(&["cotton_leaf_spot", "cotton_boll_rot"], vec![first, second]));
        let selector = rendering.selector.unwrap_or_default();
        let values: Vec<&str> = selector.options.iter().map(|o| o.value.as_str()).collect();

        assert_eq!(selector.mode, SelectorMode::Pesticide);
        assert_eq!(values, ["neem_oil", "copper_spray", "neem_oil"]);
        assert!(rendering.simulation_enabled);
        assert_eq!(rendering.simulation_copy, Some(SimulationCopy::TREATMENT));
    }

    #[test]
    fn empty_pesticide_list_offers_generic_option() {
        let rendering = render_result(&result(&["cotton_wilt"], vec![entry("Wilt", 55.0)]));
        let selector = rendering.selector.unwrap_or_default();
        assert_eq!(selector.options, [ToolOption::new("generic", "Generic Pesticide")]);

        let DiagnosisBody::Cards(cards) = rendering.diagnosis.body else {
            panic!("expected cards");
        };
        assert_eq!(cards[0].treatments, [TreatmentLine::NoneRecommended]);
    }

    #[test]
    fn maturity_analysis_switches_to_inspection_tools() {
        let mut maturity = entry("Coconut Maturity Analysis", 95.0);
        maturity.maturity_data = Some(MaturityData {
            maturity_level: MaturityLevel::Mature,
            coconut_count: 12,
            harvest_ready: false,
        });
        let rendering = render_result(&result(&[MATURITY_TAG], vec![maturity]));
        let selector = rendering.selector.unwrap_or_default();

        assert_eq!(selector.mode, SelectorMode::Inspection);
        assert_eq!(selector.options.len(), 3);
        assert_eq!(selector.options[2].value, "harvest_analyzer");
        assert!(rendering.simulation_enabled);
        assert_eq!(rendering.simulation_copy, Some(SimulationCopy::MATURITY));

        let DiagnosisBody::Cards(cards) = rendering.diagnosis.body else {
            panic!("expected cards");
        };
        let block = cards[0].maturity.clone();
        assert_eq!(
            block,
            Some(MaturityBlock {
                level_label: "MATURE".to_string(),
                level_badge: Badge::Warning,
                coconut_count: 12,
                harvest_ready: false,
            })
        );
    }

    #[test]
    fn sentinel_only_result_disables_simulation() {
        let rendering = render_result(&result(&["error"], Vec::new()));
        assert!(!rendering.simulation_enabled);
        assert!(rendering.simulation_copy.is_none());
        assert_eq!(rendering.diagnosis.title, "Detection Error");

        let empty = render_result(&result(&[], Vec::new()));
        assert!(!empty.simulation_enabled);
    }

    #[test]
    fn card_formatting_rounds_and_capitalizes() {
        let mut info = entry("Bud Rot", 72.5);
        info.severity = Some("severe".to_string());
        let card = disease_card(&info);
        assert_eq!(card.confidence_label(), "73% Match");
        assert_eq!(card.severity.as_deref(), Some("Severe"));
    }

    #[test]
    fn treatment_details_include_optional_fields() {
        let line = TreatmentLine::Pesticide {
            name: "Copper Oxychloride".to_string(),
            description: "Contact fungicide.".to_string(),
            application_rate: Some("2 g/L".to_string()),
            eco_friendly: Some(false),
            effectiveness: Some(0.85),
        };
        assert_eq!(line.summary(), "Copper Oxychloride: Contact fungicide.");
        assert_eq!(
            line.details(),
            ["Application Rate: 2 g/L", "Conventional", "Effectiveness: 85%"]
        );
    }

    #[test]
    fn selector_cycles_through_placeholder() {
        let mut selector = ToolSelector::for_inspection();
        assert_eq!(selector.selected_label(), "Select inspection tool...");

        selector.cycle(1);
        assert_eq!(selector.selected_value(), Some("visual_scanner"));
        selector.cycle(-2);
        assert_eq!(selector.selected_value(), Some("harvest_analyzer"));
        selector.cycle(1);
        assert_eq!(selector.selected_value(), None);

        selector.select(Some(9));
        assert_eq!(selector.selected, None);
    }

    #[test]
    fn slug_and_title_case() {
        assert_eq!(slug("Copper Oxy  Chloride"), "copper_oxy_chloride");
        assert_eq!(title_case("copper_oxy_chloride"), "Copper Oxy Chloride");
        assert_eq!(title_case(""), "Unknown Pesticide");
    }
}
