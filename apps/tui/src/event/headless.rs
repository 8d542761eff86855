use agrod_core::view::{DiagnosisBody, DiagnosisView};
use agrod_core::Session;
use agrod_tui::upload::load_image;
use agrod_tui::DetectClient;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::path::Path;
use std::time::Duration;

/// Analyze one image without a UI and print the diagnosis
pub async fn run_headless(
    client: &DetectClient,
    session: &mut Session,
    image: &Path,
    json: bool,
) -> Result<()> {
    let report = analyze(client, session, image).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }

    Ok(())
}

async fn analyze(client: &DetectClient, session: &mut Session, path: &Path) -> Result<HeadlessReport> {
    let image = load_image(path)?;
    let file = image.file_name.clone();
    session.upload_image(image);

    let request = session
        .begin_analysis(Duration::ZERO)
        .ok_or_else(|| eyre!("Please upload an image first"))?;
    tracing::info!(file = %file, endpoint = client.endpoint(), "headless analysis");

    let outcome = client.detect(&request).await;
    let failure = outcome.as_ref().err().map(ToString::to_string);
    session.finish_analysis(outcome, Duration::ZERO);
    if let Some(error) = failure {
        return Err(eyre!("Error analyzing image: {error}"));
    }

    let diagnosis = session
        .diagnosis()
        .ok_or_else(|| eyre!("Analysis produced no diagnosis"))?;
    Ok(build_report(
        &file,
        session.crop().as_str(),
        diagnosis,
        session.toggle().enabled,
        session.field().map_or(0, |field| field.hotspots().len()),
    ))
}

fn build_report(
    file: &str,
    crop: &str,
    diagnosis: &DiagnosisView,
    simulation_available: bool,
    hotspots: usize,
) -> HeadlessReport {
    let (message, diseases) = match &diagnosis.body {
        DiagnosisBody::Message(message) => (Some(message.clone()), Vec::new()),
        DiagnosisBody::Cards(cards) => (
            None,
            cards
                .iter()
                .map(|card| HeadlessDisease {
                    name: card.name.clone(),
                    confidence: card.confidence_label(),
                    severity: card.severity.clone(),
                    description: card.description.clone(),
                    maturity: card.maturity.as_ref().map(|block| {
                        format!(
                            "{} | {} coconuts | {}",
                            block.level_label,
                            block.coconut_count,
                            block.harvest_label()
                        )
                    }),
                    treatments: card.treatments.iter().map(|line| line.summary()).collect(),
                })
                .collect(),
        ),
    };

    HeadlessReport {
        analyzed_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        file: file.to_string(),
        crop: crop.to_string(),
        title: diagnosis.title.clone(),
        summary: diagnosis.summary.clone(),
        message,
        diseases,
        simulation_available,
        hotspots,
    }
}

fn format_report(report: &HeadlessReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", report.title));
    out.push_str(&format!("{}\n", "=".repeat(report.title.len())));
    out.push_str(&format!("File: {} ({})\n", report.file, report.crop));
    out.push_str(&format!("Analyzed: {}\n", report.analyzed_at));
    out.push_str(&format!("{}\n", report.summary));

    if let Some(message) = &report.message {
        out.push_str(&format!("- {message}\n"));
    }

    for disease in &report.diseases {
        out.push_str(&format!("\n{} [{}]\n", disease.name, disease.confidence));
        out.push_str(&format!("  {}\n", disease.description));
        if let Some(maturity) = &disease.maturity {
            out.push_str(&format!("  Maturity: {maturity}\n"));
        }
        if let Some(severity) = &disease.severity {
            out.push_str(&format!("  Severity: {severity}\n"));
        }
        out.push_str("  Recommended Treatments:\n");
        for treatment in &disease.treatments {
            out.push_str(&format!("  - {treatment}\n"));
        }
    }

    if report.simulation_available {
        out.push_str(&format!(
            "\nField simulation available: {} hotspot(s)\n",
            report.hotspots
        ));
    }

    out
}

#[derive(Debug, serde::Serialize)]
struct HeadlessReport {
    analyzed_at: String,
    file: String,
    crop: String,
    title: String,
    summary: String,
    message: Option<String>,
    diseases: Vec<HeadlessDisease>,
    simulation_available: bool,
    hotspots: usize,
}

#[derive(Debug, serde::Serialize)]
struct HeadlessDisease {
    name: String,
    confidence: String,
    severity: Option<String>,
    description: String,
    maturity: Option<String>,
    treatments: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrod_core::CropType;
    use serde_json::json;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn backend(body: serde_json::Value, status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/detect"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    fn image_file(dir: &tempfile::TempDir) -> Result<std::path::PathBuf> {
        let path = dir.path().join("palm.jpg");
        std::fs::File::create(&path)?.write_all(&[0xFF, 0xD8])?;
        Ok(path)
    }

    #[tokio::test]
    async fn maturity_analysis_report_lists_tree_details() -> Result<()> {
        let server = backend(
            json!({
                "diseases": ["coconut_maturity_analysis"],
                "disease_info": [{
                    "name": "Coconut Maturity",
                    "description": "Canopy assessment.",
                    "confidence": 91.6,
                    "maturity_data": {
                        "maturity_level": "ready_for_harvest",
                        "coconut_count": 14,
                        "harvest_ready": true
                    },
                    "recommended_pesticides": []
                }],
                "field_data": {
                    "grid": [],
                    "hotspots": [
                        {"x": 1, "y": 2, "maturity": "mature"},
                        {"x": 6, "y": 6, "maturity": "ready_for_harvest"}
                    ],
                    "is_maturity_analysis": true
                },
                "multiple_detections": false
            }),
            200,
        )
        .await;
        let dir = tempfile::tempdir()?;
        let client = DetectClient::new(format!("{}/detect", server.uri()), Duration::from_secs(5))?;
        let mut session = Session::with_simulation(CropType::Coconut, 0);

        let report = analyze(&client, &mut session, &image_file(&dir)?).await?;
        assert_eq!(report.crop, "coconut");
        assert!(report.simulation_available);
        assert_eq!(report.hotspots, 2);
        assert_eq!(report.diseases[0].confidence, "92% Match");
        assert_eq!(
            report.diseases[0].maturity.as_deref(),
            Some("READY FOR HARVEST | 14 coconuts | READY FOR HARVEST")
        );

        let text = format_report(&report);
        assert!(text.contains("Field simulation available: 2 hotspot(s)"));
        assert!(text.contains("- No specific treatments recommended."));
        Ok(())
    }

    #[tokio::test]
    async fn backend_failure_becomes_an_error() -> Result<()> {
        let server = backend(json!({}), 502).await;
        let dir = tempfile::tempdir()?;
        let client = DetectClient::new(format!("{}/detect", server.uri()), Duration::from_secs(5))?;
        let mut session = Session::with_simulation(CropType::Cotton, 0);

        let error = analyze(&client, &mut session, &image_file(&dir)?)
            .await
            .err()
            .map(|e| e.to_string());
        assert_eq!(
            error.as_deref(),
            Some("Error analyzing image: Network response was not ok (HTTP 502)")
        );
        assert!(!session.is_busy());
        Ok(())
    }

    #[test]
    fn healthy_report_prints_fixed_message() {
        let diagnosis = DiagnosisView {
            title: "No Disease Detected".to_string(),
            summary: "Your crop appears to be healthy.".to_string(),
            body: DiagnosisBody::Message("No pesticides needed at this time.".to_string()),
        };
        let report = build_report("leaf.png", "cotton", &diagnosis, false, 0);
        let text = format_report(&report);

        assert!(text.contains("No Disease Detected\n===================\n"));
        assert!(text.contains("- No pesticides needed at this time."));
        assert!(!text.contains("Field simulation"));
    }
}
